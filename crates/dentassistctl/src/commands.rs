//! Command implementations for dentassistctl

use crate::client::PredictionClient;
use crate::config::{ClientConfig, Preferences};
use crate::display::{self, AssessmentOutput};
use anyhow::{Context as _, Result};
use dentassist_shared::symptoms::canonical_symptom;
use dentassist_shared::ui::{self, colors};
use dentassist_shared::{
    AssessmentSession, Language, Localizer, Resolution, ResolverPolicy, Step, UploadedImage,
    WizardError, VERSION,
};
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Shared context for every command
pub struct CliContext {
    pub client: PredictionClient,
    pub policy: ResolverPolicy,
    pub localizer: Localizer,
}

impl CliContext {
    pub fn new(config: &ClientConfig, localizer: Localizer) -> Result<Self> {
        let client =
            PredictionClient::new(&config.proxy_url, Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            client,
            policy: config.policy(),
            localizer,
        })
    }
}

// ============================================================================
// assess
// ============================================================================

/// Non-interactive run through all four steps
pub async fn assess(
    ctx: &CliContext,
    pain: u8,
    symptoms: &[String],
    transcript: Option<&str>,
    image_path: &Path,
    json: bool,
) -> Result<()> {
    let mut session = AssessmentSession::new();
    session.select_pain(pain)?;

    let mut wanted = BTreeSet::new();
    for name in symptoms {
        let symptom =
            canonical_symptom(name).ok_or_else(|| WizardError::UnknownSymptom(name.clone()))?;
        wanted.insert(symptom);
    }
    for symptom in wanted {
        session.toggle_symptom(symptom)?;
    }
    if let Some(text) = transcript {
        let found = session.apply_transcript(text)?;
        debug!("Transcript matched {:?}", found);
    }

    session.next()?;
    session.attach_image(read_image(image_path)?)?;

    let resolution = analyze(ctx, &mut session).await?;
    let report = session.report().ok_or(WizardError::WrongStep(session.step()))?;

    if json {
        let out = AssessmentOutput::new(session.pain_value(), session.symptoms(), resolution, report);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        ui::print_header("DentAssist", VERSION);
        display::print_results(&ctx.localizer, &resolution, report);
        ui::print_footer();
    }
    Ok(())
}

/// Send the attached image and move the session to results
async fn analyze(ctx: &CliContext, session: &mut AssessmentSession) -> Result<Resolution> {
    let report = {
        let image = session.image().ok_or(WizardError::ImageRequired)?;
        ctx.client
            .predict(image, session.pain_value(), session.symptoms())
            .await
    };
    Ok(session.complete(report, &ctx.policy)?)
}

fn read_image(path: &Path) -> Result<UploadedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Cannot read image {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadedImage::new(name, bytes)?)
}

// ============================================================================
// wizard
// ============================================================================

/// Interactive assessment on stdin/stdout
pub async fn wizard(ctx: &CliContext) -> Result<()> {
    let stdin = std::io::stdin();
    let session = run_wizard(ctx, stdin.lock()).await?;
    debug!("Wizard finished at step {}", session.step());
    Ok(())
}

/// Drive the wizard from any line source; ends on EOF or `q` and hands back
/// the session as it was left
pub async fn run_wizard<R: BufRead>(ctx: &CliContext, mut input: R) -> Result<AssessmentSession> {
    let loc = &ctx.localizer;
    let mut session = AssessmentSession::new();

    ui::print_header("DentAssist", VERSION);
    println!("  {}", loc.t("assessYourTeeth"));
    println!();

    loop {
        match session.step() {
            Step::Initial => {
                display::print_pain_scale(loc);
                let Some(line) = prompt(&mut input, "Pain level (1-5)")? else {
                    return Ok(session);
                };
                if line == "q" {
                    return Ok(session);
                }
                match line.parse::<u8>() {
                    Ok(level) => {
                        if let Err(e) = session.select_pain(level) {
                            ui::print_err(&e.to_string());
                        }
                    }
                    Err(_) => ui::print_err("Enter a number from 1 to 5"),
                }
            }
            Step::Symptoms => {
                display::print_symptom_menu(loc, session.symptoms());
                let Some(line) =
                    prompt(&mut input, "Number to toggle, 't <note>', 'n' next, 'b' back")?
                else {
                    return Ok(session);
                };
                match line.as_str() {
                    "q" => return Ok(session),
                    "" | "n" => {
                        session.next()?;
                    }
                    "b" => {
                        session.back()?;
                    }
                    _ => handle_symptom_input(&mut session, &line),
                }
            }
            Step::Upload => {
                ui::print_section("3", loc.t("uploadTeethImages"));
                let Some(line) = prompt(&mut input, "Image path ('b' back)")? else {
                    return Ok(session);
                };
                match line.as_str() {
                    "q" => return Ok(session),
                    "b" => {
                        session.back()?;
                    }
                    path => match read_image(Path::new(path)) {
                        Ok(image) => {
                            ui::print_ok(&format!(
                                "{} ({})",
                                image.file_name(),
                                ui::format_bytes(image.len())
                            ));
                            session.attach_image(image)?;
                            println!("  {}{}{}", colors::MUTED, loc.t("analyzingWithAI"), colors::RESET);
                            analyze(ctx, &mut session).await?;
                        }
                        Err(e) => ui::print_err(&e.to_string()),
                    },
                }
            }
            Step::Results => {
                if let (Some(resolution), Some(report)) = (session.resolution(), session.report()) {
                    display::print_results(loc, resolution, report);
                }
                ui::print_footer();
                let prompt_text = format!("'r' {}, 'q' quit", loc.t("reAssess"));
                match prompt(&mut input, &prompt_text)?.as_deref() {
                    Some("r") => session.reassess(),
                    _ => return Ok(session),
                }
            }
        }
    }
}

fn handle_symptom_input(session: &mut AssessmentSession, line: &str) {
    if let Some(note) = line.strip_prefix("t ") {
        match session.apply_transcript(note) {
            Ok(found) if found.is_empty() => ui::print_err("No known symptoms in that note"),
            Ok(found) => ui::print_ok(&format!("Selected: {}", found.join(", "))),
            Err(e) => ui::print_err(&e.to_string()),
        }
        return;
    }

    let name = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| dentassist_shared::SYMPTOMS.get(i).copied())
        .unwrap_or(line);
    if let Err(e) = session.toggle_symptom(name) {
        ui::print_err(&e.to_string());
    }
}

/// Print a prompt and read one trimmed line; `None` on EOF
fn prompt<R: BufRead>(input: &mut R, text: &str) -> Result<Option<String>> {
    print!("{}{}{} › ", colors::BOLD, text, colors::RESET);
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

// ============================================================================
// model-info / health
// ============================================================================

pub async fn model_info(ctx: &CliContext) -> Result<()> {
    let info = ctx.client.model_info().await;
    display::print_model_info(&info);
    Ok(())
}

pub async fn health(ctx: &CliContext) -> Result<()> {
    ui::print_section("health", ctx.client.base_url());
    match ctx.client.health().await {
        Ok(health) => {
            ui::print_ok(&format!("Proxy {}", health.status));
            ui::print_kv("ML service", &health.ml_service_url, 12);
            ui::print_kv("Checked at", &health.timestamp, 12);
            ui::print_kv("Uptime", &format!("{}s", health.uptime_secs), 12);
            Ok(())
        }
        Err(e) => {
            ui::print_err("Proxy unreachable; assessments will run in demo mode");
            Err(e.into())
        }
    }
}

// ============================================================================
// language
// ============================================================================

/// Show or change the persisted language
pub fn language(code: Option<&str>, prefs_path: &Path) -> Result<()> {
    let mut prefs = Preferences::load_from_path(prefs_path);

    let Some(code) = code else {
        let current = prefs.localizer().language();
        ui::print_section("language", &format!("{} ({})", current.name(), current.code()));
        for lang in Language::ALL {
            let marker = if lang == current { "*" } else { " " };
            println!("  {} {:4} {} / {}", marker, lang.code(), lang.name(), lang.native_name());
        }
        return Ok(());
    };

    let lang: Language = code.parse()?;
    prefs.set_language(lang);
    prefs.save_to_path(prefs_path)?;
    ui::print_ok(&format!("Language set to {}", lang.name()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symptom_input_by_number_and_name() {
        let mut session = AssessmentSession::new();
        session.select_pain(2).unwrap();

        handle_symptom_input(&mut session, "4");
        assert!(session.symptoms().contains("Bleeding gums"));

        handle_symptom_input(&mut session, "bad breath");
        assert!(session.symptoms().contains("Bad breath"));

        handle_symptom_input(&mut session, "4");
        assert!(!session.symptoms().contains("Bleeding gums"));

        handle_symptom_input(&mut session, "t my jaw pain is bad");
        assert!(session.symptoms().contains("Jaw pain"));
    }

    #[test]
    fn test_language_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");

        language(Some("hi"), &path).unwrap();
        assert_eq!(
            Preferences::load_from_path(&path).localizer().language(),
            Language::Hi
        );
        assert!(language(Some("zz"), &path).is_err());
    }
}
