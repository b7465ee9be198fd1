use std::fmt;

use serde::{Deserialize, Serialize};

/// Statutory income-tax regime for an individual salaried taxpayer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Old,
    #[default]
    New,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            _ => None,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_mixed_case_and_whitespace() {
        assert_eq!(Regime::parse("old"), Some(Regime::Old));
        assert_eq!(Regime::parse(" NEW "), Some(Regime::New));
        assert_eq!(Regime::parse("Old"), Some(Regime::Old));
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        assert_eq!(Regime::parse(""), None);
        assert_eq!(Regime::parse("legacy"), None);
    }

    #[test]
    fn as_str_matches_display() {
        assert_eq!(Regime::Old.to_string(), Regime::Old.as_str());
        assert_eq!(Regime::New.to_string(), "new");
    }

    #[test]
    fn default_is_new() {
        assert_eq!(Regime::default(), Regime::New);
    }
}
