//! Locale context for user-facing result text.
//!
//! Lookup order: active language, then English, then the key itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Te,
    Mr,
    Gu,
    Bn,
    Pa,
    Mai,
    Ur,
    Or,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::En,
        Language::Hi,
        Language::Te,
        Language::Mr,
        Language::Gu,
        Language::Bn,
        Language::Pa,
        Language::Mai,
        Language::Ur,
        Language::Or,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Te => "te",
            Language::Mr => "mr",
            Language::Gu => "gu",
            Language::Bn => "bn",
            Language::Pa => "pa",
            Language::Mai => "mai",
            Language::Ur => "ur",
            Language::Or => "or",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Te => "Telugu",
            Language::Mr => "Marathi",
            Language::Gu => "Gujarati",
            Language::Bn => "Bengali",
            Language::Pa => "Punjabi",
            Language::Mai => "Maithili",
            Language::Ur => "Urdu",
            Language::Or => "Odia",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिन्दी",
            Language::Te => "తెలుగు",
            Language::Mr => "मराठी",
            Language::Gu => "ગુજરાતી",
            Language::Bn => "বাংলা",
            Language::Pa => "ਪੰਜਾਬੀ",
            Language::Mai => "मैथिली",
            Language::Ur => "اُردُو",
            Language::Or => "ଓଡ଼ିଆ",
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Language::Ur
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language code '{}'", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.code() == code)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Explicit translation context, passed to whatever renders text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Localizer {
    language: Language,
}

impl Localizer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Build from a stored code; unknown or missing codes use the default locale.
    pub fn from_stored(code: Option<&str>) -> Self {
        let language = code
            .and_then(|c| c.parse().ok())
            .unwrap_or_default();
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn dir(&self) -> TextDirection {
        if self.language.is_rtl() {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        lookup(self.language, key)
            .or_else(|| lookup(Language::En, key))
            .unwrap_or(key)
    }
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    table(language)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::En => EN,
        Language::Hi => HI,
        Language::Ur => UR,
        _ => &[],
    }
}

const EN: &[(&str, &str)] = &[
    ("assessYourTeeth", "AI-Powered Teeth Assessment"),
    ("currentPainLevel", "Current Pain Level"),
    ("noPain", "No pain"),
    ("mild", "Mild"),
    ("moderate", "Moderate"),
    ("severe", "Severe"),
    ("extreme", "Extreme"),
    ("perfectlyFine", "Perfectly fine"),
    ("slightDiscomfort", "Slight discomfort"),
    ("noticeablePain", "Noticeable pain"),
    ("hardToManage", "Hard to manage"),
    ("unbearable", "Unbearable"),
    ("additionalSymptoms", "Additional Symptoms?"),
    ("selectSymptoms", "Select any symptoms you are experiencing"),
    ("uploadTeethImages", "Upload Teeth Images for AI Analysis"),
    ("analyzingWithAI", "Analyzing with AI..."),
    ("healthScore", "Health Score"),
    ("detectedCondition", "Detected condition"),
    ("confidence", "Confidence"),
    ("modelAccuracy", "Model accuracy"),
    ("trainingAccuracy", "Training accuracy"),
    ("classProbabilities", "Class probabilities"),
    ("triageGoodTitle", "Great news!"),
    ("triageGoodAdvice", "Your dental health looks good. Keep up regular brushing and check-ups."),
    ("triageAttentionTitle", "Attention needed"),
    ("triageAttentionAdvice", "A dental check-up is recommended in the coming days."),
    ("triageEmergencyTitle", "Immediate care recommended"),
    ("triageEmergencyAdvice", "Please consult a dentist as soon as possible."),
    ("demoModeNotice", "The AI service is unavailable; this result was generated from your answers only."),
    ("reAssess", "Re-assess"),
    ("back", "Back"),
    ("next", "Next"),
];

const HI: &[(&str, &str)] = &[
    ("currentPainLevel", "वर्तमान दर्द स्तर"),
    ("noPain", "कोई दर्द नहीं"),
    ("mild", "हल्का"),
    ("moderate", "मध्यम"),
    ("severe", "गंभीर"),
    ("extreme", "अत्यधिक"),
    ("healthScore", "स्वास्थ्य स्कोर"),
    ("triageGoodTitle", "बढ़िया खबर!"),
    ("triageAttentionTitle", "ध्यान देने की आवश्यकता"),
    ("triageEmergencyTitle", "तुरंत देखभाल की सलाह"),
    ("triageEmergencyAdvice", "कृपया जल्द से जल्द दंत चिकित्सक से परामर्श करें।"),
    ("reAssess", "पुनः मूल्यांकन करें"),
    ("back", "वापस"),
    ("next", "आगे"),
];

const UR: &[(&str, &str)] = &[
    ("healthScore", "صحت اسکور"),
    ("triageGoodTitle", "اچھی خبر!"),
    ("triageEmergencyTitle", "فوری دیکھ بھال کی سفارش"),
    ("back", "واپس"),
    ("next", "آگے"),
];
