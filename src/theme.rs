use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parses `#rrggbb` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() { return None; }
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Semantic colour a renderer should use; the theme turns it into hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Danger,
    Warning,
    Success,
    Primary,
    Neutral,
}

fn default_unlabeled() -> String { "#6c7086".to_owned() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    pub danger: String, pub warning: String, pub success: String,
    pub primary: String, pub neutral: String,
    /// Colour of the synthetic bucket for tasks without labels.
    #[serde(default = "default_unlabeled")]
    pub unlabeled: String,
}

impl ThemeConfig {
    pub fn hex(&self, token: ColorToken) -> &str {
        match token {
            ColorToken::Danger  => &self.danger,
            ColorToken::Warning => &self.warning,
            ColorToken::Success => &self.success,
            ColorToken::Primary => &self.primary,
            ColorToken::Neutral => &self.neutral,
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Reads `theme.toml` from `dir`, falling back to the built-in theme `fallback`.
    pub fn load(dir: &Path, fallback: &str) -> Result<Self> {
        let path = dir.join("theme.toml");
        if path.exists() {
            let theme: ThemeConfig = toml::from_str(&std::fs::read_to_string(&path)?)?;
            tracing::debug!(theme = %theme.name, path = %path.display(), "loaded theme file");
            Ok(theme)
        } else {
            Ok(ThemeConfig::named(fallback).unwrap_or_default())
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join("theme.toml"), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    // ── Theme catalogue ───────────────────────────────────────────────────────

    pub fn all_themes() -> Vec<ThemeConfig> {
        vec![ThemeConfig::default(), ThemeConfig::high_contrast()]
    }

    pub fn named(name: &str) -> Option<ThemeConfig> {
        Self::all_themes().into_iter().find(|t| t.name == name)
    }

    pub fn high_contrast() -> Self { Self {
        name: "high-contrast".into(),
        danger: "#ff0000".into(), warning: "#ffff00".into(), success: "#00ff00".into(),
        primary: "#00ffff".into(), neutral: "#ffffff".into(),
        unlabeled: "#c0c0c0".into(),
    }}
}

impl Default for ThemeConfig {
    fn default() -> Self { Self {
        name: "default".into(),
        danger: "#f03a47".into(), warning: "#ffc107".into(), success: "#4ec1a2".into(),
        primary: "#3f51b5".into(), neutral: "#9e9e9e".into(),
        unlabeled: default_unlabeled(),
    }}
}
