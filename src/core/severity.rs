//! Severity tiers derived from numeric status codes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity tier of a log record.
///
/// A tier is never chosen directly; it is always derived from the record's
/// status code through [`Severity::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    #[default]
    Default,
}

/// Half-open status ranges, evaluated in order; the first match wins.
const TIERS: [(u16, u16, Severity); 7] = [
    (100, 200, Severity::Debug),
    (200, 300, Severity::Info),
    (300, 400, Severity::Notice),
    (400, 500, Severity::Warning),
    (500, 502, Severity::Error),
    (502, 509, Severity::Critical),
    (509, 511, Severity::Alert),
];

impl Severity {
    /// Map a status code to its tier. Codes outside every range are `Default`.
    #[must_use]
    pub fn classify(status: u16) -> Self {
        TIERS
            .iter()
            .find(|(start, end, _)| (*start..*end).contains(&status))
            .map(|(_, _, tier)| *tier)
            .unwrap_or(Severity::Default)
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Notice => "NOTICE",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Alert => "ALERT",
            Severity::Default => "DEFAULT",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "NOTICE" => Ok(Severity::Notice),
            "WARN" | "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            "ALERT" => Ok(Severity::Alert),
            "DEFAULT" => Ok(Severity::Default),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_boundaries() {
        assert_eq!(Severity::classify(99), Severity::Default);
        assert_eq!(Severity::classify(100), Severity::Debug);
        assert_eq!(Severity::classify(199), Severity::Debug);
        assert_eq!(Severity::classify(200), Severity::Info);
        assert_eq!(Severity::classify(300), Severity::Notice);
        assert_eq!(Severity::classify(404), Severity::Warning);
        assert_eq!(Severity::classify(500), Severity::Error);
        assert_eq!(Severity::classify(501), Severity::Error);
        assert_eq!(Severity::classify(502), Severity::Critical);
        assert_eq!(Severity::classify(508), Severity::Critical);
        assert_eq!(Severity::classify(509), Severity::Alert);
        assert_eq!(Severity::classify(510), Severity::Alert);
        assert_eq!(Severity::classify(511), Severity::Default);
        assert_eq!(Severity::classify(0), Severity::Default);
    }

    #[test]
    fn test_parse_roundtrip() {
        for status in [150, 250, 350, 450, 500, 505, 510, 600] {
            let tier = Severity::classify(status);
            assert_eq!(tier.to_str().parse::<Severity>().unwrap(), tier);
        }
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
    }

    #[test]
    fn test_default_tier() {
        assert_eq!(Severity::default(), Severity::Default);
        assert_eq!(Severity::default().to_str(), "DEFAULT");
    }
}
