//! The preference string stored in the third header field.
//!
//! Password Gorilla writes preferences as whitespace-separated triples of
//! `<kind> <id> <value>`, for example `B 24 1` or `B 22 0 I 7 0`. Only the
//! preferences that change how the file is read or that the importer can
//! carry over are accepted; anything else is reported rather than guessed at.

use crate::error::{ImportError, ImportResult};

const UTF8_CONTENT: (&str, &str) = ("B", "24");
const LOCK_ON_IDLE: (&str, &str) = ("B", "22");
const IDLE_MINUTES: (&str, &str) = ("I", "7");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyPreferences {
    /// Text fields hold UTF-8 rather than Latin-1.
    pub is_utf8: bool,
    pub lock_on_idle_timeout: bool,
    pub idle_timeout_minutes: u32,
}

impl Default for LegacyPreferences {
    fn default() -> Self {
        Self {
            is_utf8: false,
            lock_on_idle_timeout: true,
            idle_timeout_minutes: 0,
        }
    }
}

impl LegacyPreferences {
    pub fn parse(field: &str) -> ImportResult<Self> {
        let unsupported = || ImportError::UnsupportedPreference {
            field: field.to_string(),
        };

        let tokens: Vec<&str> = field.split_whitespace().collect();
        if tokens.is_empty() || tokens.len() % 3 != 0 {
            return Err(unsupported());
        }

        let mut preferences = Self::default();
        for triple in tokens.chunks_exact(3) {
            let key = (triple[0], triple[1]);
            let value = triple[2];
            if key == UTF8_CONTENT {
                preferences.is_utf8 = parse_flag(value).ok_or_else(unsupported)?;
            } else if key == LOCK_ON_IDLE {
                preferences.lock_on_idle_timeout = parse_flag(value).ok_or_else(unsupported)?;
            } else if key == IDLE_MINUTES {
                preferences.idle_timeout_minutes = value.parse().map_err(|_| unsupported())?;
            } else {
                return Err(unsupported());
            }
        }
        Ok(preferences)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_preference() {
        let preferences = LegacyPreferences::parse("B 24 1").unwrap();
        assert!(preferences.is_utf8);
        assert!(preferences.lock_on_idle_timeout);
        assert_eq!(preferences.idle_timeout_minutes, 0);
    }

    #[test]
    fn test_idle_preferences() {
        let preferences = LegacyPreferences::parse("B 22 0 I 7 0").unwrap();
        assert!(!preferences.is_utf8);
        assert!(!preferences.lock_on_idle_timeout);

        let preferences = LegacyPreferences::parse("B 24 0 B 22 1 I 7 15").unwrap();
        assert!(preferences.lock_on_idle_timeout);
        assert_eq!(preferences.idle_timeout_minutes, 15);
    }

    #[test]
    fn test_unsupported_preferences() {
        for field in ["", "B 24", "B 24 yes", "I 7 -3", "B 99 1", "S 1 value"] {
            match LegacyPreferences::parse(field) {
                Err(ImportError::UnsupportedPreference { field: found }) => {
                    assert_eq!(found, field)
                }
                other => panic!("{:?} parsed as {:?}", field, other),
            }
        }
    }
}
