//! Transcript language selection.

/// Supported transcript languages, used to pick the input/output file pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// English transcript (`en_chat.txt`)
    En,
    /// Hebrew transcript (`he_chat.txt`)
    He,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "he" => Ok(Language::He),
            _ => Err(format!("unknown language: {} (expected 'en' or 'he')", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::He => write!(f, "he"),
        }
    }
}
