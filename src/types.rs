use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Urgence de la notification, convertie vers le type du backend seulement
/// à sa frontière.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Urgency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Critical => "critical",
        }
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "critical" => Ok(Self::Critical),
            other => Err(format!(
                "unknown urgency: {other} (expected low, normal or critical)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Urgency;
    use std::str::FromStr;

    #[test]
    fn urgency_from_str_accepts_variants() {
        assert_eq!(Urgency::from_str("low"), Ok(Urgency::Low));
        assert_eq!(Urgency::from_str("Normal"), Ok(Urgency::Normal));
        assert_eq!(Urgency::from_str("CRITICAL"), Ok(Urgency::Critical));
        assert!(Urgency::from_str("urgent").is_err());
    }

    #[test]
    fn urgency_defaults_to_normal() {
        assert_eq!(Urgency::default(), Urgency::Normal);
        assert_eq!(Urgency::Critical.to_string(), "critical");
    }
}
