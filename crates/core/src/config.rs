//! Project configuration models.
//!
//! `AppConfig` is committed to version control; `LocalConfig` carries API
//! credentials and stays gitignored.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Voice/tone configuration consumed by copy-generation tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Professional,
    Casual,
    Playful,
    Technical,
    Minimal,
    Witty,
    Custom,
}

/// Voice configuration for generated listing copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub tone: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            tone: Tone::Professional,
            style_notes: None,
            target_audience: None,
        }
    }
}

/// Where release-note changelogs are sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangelogSource {
    Git,
    Manual,
    Both,
}

/// Changelog generation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogConfig {
    pub source: ChangelogSource,
    pub conventional_commits: bool,
}

/// Main project configuration, committed to git.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub bundle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    pub platforms: Vec<String>,
    pub primary_locale: String,
    pub locales: Vec<String>,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<ChangelogConfig>,
}

/// Local credential configuration, gitignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    pub key_id: String,
    pub issuer_id: String,
    pub p8_key_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_round_trips_with_optional_sections_absent() {
        let config = AppConfig {
            bundle_id: "com.example.tracker".to_string(),
            app_id: None,
            platforms: vec!["ios".to_string()],
            primary_locale: "en-US".to_string(),
            locales: vec!["en-US".to_string(), "de-DE".to_string()],
            voice: VoiceConfig::default(),
            changelog: None,
        };

        let json = serde_json::to_string_pretty(&config).expect("serialize config");
        assert!(!json.contains("app_id"));
        assert!(!json.contains("changelog"));

        let back: AppConfig = serde_json::from_str(&json).expect("parse config");
        assert_eq!(back, config);
    }

    #[test]
    fn tone_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Tone::Professional).unwrap(),
            "\"professional\""
        );
    }
}
