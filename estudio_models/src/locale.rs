use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The languages the site is served in. Spanish is the studio's primary
/// language and acts as the fallback for message templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
    Ja,
}

impl Locale {
    pub const ALL: [Self; 3] = [Self::Es, Self::En, Self::Ja];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
            Self::Ja => "ja",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = InvalidLocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            "ja" => Ok(Self::Ja),
            _ => Err(InvalidLocaleError),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid locale")]
pub struct InvalidLocaleError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        for locale in Locale::ALL {
            assert_eq!(locale.as_str().parse::<Locale>().unwrap(), locale);
        }
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::Ja).unwrap(), "\"ja\"");
        assert_eq!(
            serde_json::from_str::<Locale>("\"en\"").unwrap(),
            Locale::En
        );
    }
}
