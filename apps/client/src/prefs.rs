//! Display-language preference, persisted under one fixed key.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::kv;

pub const LANGUAGE_KEY: &str = "hitoriok:lang";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppLanguage {
    #[default]
    Ja,
    Ko,
    En,
    Zh,
}

impl AppLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            AppLanguage::Ja => "ja",
            AppLanguage::Ko => "ko",
            AppLanguage::En => "en",
            AppLanguage::Zh => "zh",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "ja" => Some(AppLanguage::Ja),
            "ko" => Some(AppLanguage::Ko),
            "en" => Some(AppLanguage::En),
            "zh" => Some(AppLanguage::Zh),
            _ => None,
        }
    }
}

pub fn load_language(dir: &Path) -> AppLanguage {
    kv::get_item(dir, LANGUAGE_KEY)
        .and_then(|raw| AppLanguage::parse(&raw))
        .unwrap_or_default()
}

pub fn store_language(dir: &Path, lang: AppLanguage) {
    kv::set_item(dir, LANGUAGE_KEY, lang.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_japanese() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_language(dir.path()), AppLanguage::Ja);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        store_language(dir.path(), AppLanguage::Ko);
        assert_eq!(load_language(dir.path()), AppLanguage::Ko);
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        kv::set_item(dir.path(), LANGUAGE_KEY, "fr");
        assert_eq!(load_language(dir.path()), AppLanguage::Ja);
    }
}
