//! Result rendering for the terminal and for `--json`.

use dentassist_shared::scoring::ConfidenceSeverity;
use dentassist_shared::ui::{self, colors, symbols};
use dentassist_shared::{Localizer, ModelInfo, PredictionReport, Resolution, SYMPTOMS};
use serde::Serialize;
use std::collections::BTreeSet;

const KEY_WIDTH: usize = 22;
const BAR_WIDTH: usize = 30;

/// Everything `assess --json` prints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOutput<'a> {
    pub pain_level: u8,
    pub symptoms: Vec<&'a str>,
    pub resolution: Resolution,
    pub report: &'a PredictionReport,
}

impl<'a> AssessmentOutput<'a> {
    pub fn new(
        pain_level: u8,
        symptoms: &'a BTreeSet<String>,
        resolution: Resolution,
        report: &'a PredictionReport,
    ) -> Self {
        Self {
            pain_level,
            symptoms: symptoms.iter().map(String::as_str).collect(),
            resolution,
            report,
        }
    }
}

pub fn print_pain_scale(loc: &Localizer) {
    ui::print_section("1", loc.t("currentPainLevel"));
    for level in dentassist_shared::PainLevel::all() {
        println!(
            "  {}{}{} {} {}- {}{}",
            colors::BOLD,
            level.value(),
            colors::RESET,
            loc.t(level.label_key()),
            colors::MUTED,
            loc.t(level.description_key()),
            colors::RESET
        );
    }
}

pub fn print_symptom_menu(loc: &Localizer, selected: &BTreeSet<String>) {
    ui::print_section("2", loc.t("additionalSymptoms"));
    println!("  {}{}{}", colors::MUTED, loc.t("selectSymptoms"), colors::RESET);
    for (i, symptom) in SYMPTOMS.iter().enumerate() {
        let mark = if selected.contains(*symptom) {
            format!("{}{}{}", colors::OK, symbols::OK, colors::RESET)
        } else {
            " ".to_string()
        };
        println!("  [{}] {} {}", mark, i + 1, symptom);
    }
}

/// Full results view
pub fn print_results(loc: &Localizer, resolution: &Resolution, report: &PredictionReport) {
    let tier_color = ui::tier_color(resolution.tier);

    ui::print_section("results", loc.t(resolution.tier.headline_key()));
    if report.is_demo_mode {
        ui::print_notice(loc.t("demoModeNotice"));
    }
    println!();

    ui::print_kv_colored(
        loc.t("healthScore"),
        &ui::score_gauge(resolution.score, BAR_WIDTH),
        tier_color,
        KEY_WIDTH,
    );
    ui::print_kv(loc.t("detectedCondition"), &report.disease_label, KEY_WIDTH);

    let severity = ConfidenceSeverity::from_confidence(report.confidence);
    ui::print_kv_colored(
        loc.t("confidence"),
        &format!("{:.1}%", report.confidence),
        ui::severity_color(severity),
        KEY_WIDTH,
    );
    ui::print_kv(
        loc.t("modelAccuracy"),
        &format!("{:.1}%", report.model_accuracy),
        KEY_WIDTH,
    );
    ui::print_kv(
        loc.t("trainingAccuracy"),
        &format!("{:.1}%", report.training_accuracy),
        KEY_WIDTH,
    );

    let ranked = report.ranked_classes();
    if !ranked.is_empty() {
        println!();
        ui::print_section("classes", loc.t("classProbabilities"));
        for (label, value) in ranked {
            println!(
                "  {:width$} {} {:5.1}%",
                label,
                ui::progress_bar(value / 100.0, BAR_WIDTH / 2),
                value,
                width = KEY_WIDTH
            );
        }
    }

    println!();
    println!(
        "  {}{}{} {}",
        tier_color,
        symbols::ARROW,
        colors::RESET,
        loc.t(resolution.tier.advice_key())
    );
}

pub fn print_model_info(info: &ModelInfo) {
    ui::print_section("model", "ML service status");
    if info.model_loaded {
        ui::print_ok("Model loaded");
    } else {
        ui::print_err("Model not loaded (showing demo figures)");
    }
    ui::print_kv(
        "Training accuracy",
        &format!("{:.1}%", info.training_accuracy),
        KEY_WIDTH,
    );
    ui::print_kv(
        "Validation accuracy",
        &format!("{:.1}%", info.validation_accuracy),
        KEY_WIDTH,
    );
}
