//! Stylesheet system for the diagram palette
//!
//! Colors are looked up by token (`border`, `margin`, `stub-base`, ...).
//! A stylesheet file only needs to list the tokens it overrides; every
//! other token falls back to the built-in Tango palette.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::diagram::AnchorCategory;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping color tokens to concrete values
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Color mappings: token name -> hex color
    pub colors: HashMap<String, String>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Default color palette, taken from the Tango icon theme
const DEFAULT_PALETTE: &str = r##"
[metadata]
name = "Tango"

[colors]
# Anchor markers
border = "#8f5902"
margin = "#f57900"
autosize = "#729fcf"
fixed = "#204a87"
highlight = "#ef2929"

# Children
stub-base = "#eeeeec"
stub-text = "#2e3436"

# Container
background = "#ffffff"
background-alt = "#fce94f"

# Error text
error = "#a40000"
"##;

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
        })
    }

    /// Resolve a color token to a concrete value
    ///
    /// Returns None if the token is not defined in this stylesheet.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a color token with fallback to the default palette
    pub fn resolve_or_default(&self, token: &str) -> String {
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }
        let default = Self::default();
        if let Some(color) = default.resolve(token) {
            return color.to_string();
        }
        "#000000".to_string()
    }

    /// Marker color of an anchor category
    pub fn category_color(&self, category: AnchorCategory) -> String {
        self.resolve_or_default(category.as_str())
    }

    pub fn highlight_color(&self) -> String {
        self.resolve_or_default("highlight")
    }

    /// A fresh sequence of stub fill colors derived from `stub-base`
    pub fn stub_shades(&self) -> StubShades {
        let base = parse_hex(&self.resolve_or_default("stub-base")).unwrap_or([0xee, 0xee, 0xec]);
        StubShades::new(base)
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
    }
}

/// Deterministic sequence of darkened variants of the stub base color.
///
/// Each channel is darkened by a pseudo-random amount below 128. The
/// sequence always starts from the same seed, so the n-th stub of every
/// run gets the same color.
#[derive(Debug, Clone)]
pub struct StubShades {
    base: [u8; 3],
    state: u64,
}

impl StubShades {
    const SEED: u64 = 1;

    pub fn new(base: [u8; 3]) -> Self {
        Self {
            base,
            state: Self::SEED,
        }
    }

    /// Start over from the first color
    pub fn reset(&mut self) {
        self.state = Self::SEED;
    }

    fn next_offset(&mut self) -> u8 {
        // 64-bit LCG (Knuth MMIX constants), top bits are the best mixed
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.state >> 57) & 0x7f) as u8
    }
}

impl Iterator for StubShades {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let [r, g, b] = self.base;
        let r = r.saturating_sub(self.next_offset());
        let g = g.saturating_sub(self.next_offset());
        let b = b.saturating_sub(self.next_offset());
        Some(format!("#{r:02x}{g:02x}{b:02x}"))
    }
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
