//! Font Shorthand
//!
//! Canvas font strings such as `"12px Times New Roman"` or
//! `"bold 16pt 'Fira Sans', sans-serif"`.

use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// Parsed font shorthand
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Size in CSS pixels
    pub size: f32,
    /// First family in the family list
    pub family: String,
    /// Words before the size (`bold`, `italic`, ...)
    pub modifiers: Vec<String>,
}

impl FontSpec {
    pub fn new(size: f32, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
            modifiers: Vec::new(),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.modifiers.iter().any(|m| m == "bold" || m == "bolder")
    }

    pub fn is_italic(&self) -> bool {
        self.modifiers.iter().any(|m| m == "italic" || m == "oblique")
    }

    fn parse_size(token: &str) -> Option<f32> {
        // `16px/1.2` carries a line height we do not use
        let token = token.split('/').next()?;
        let (number, scale) = if let Some(n) = token.strip_suffix("px") {
            (n, 1.0)
        } else if let Some(n) = token.strip_suffix("pt") {
            (n, 4.0 / 3.0)
        } else {
            return None;
        };
        let value: f32 = number.parse().ok()?;
        (value.is_finite() && value > 0.0).then_some(value * scale)
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(10.0, "sans-serif")
    }
}

impl FromStr for FontSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidFont(s.to_string());
        let tokens: Vec<&str> = s.split_whitespace().collect();

        let size_at = tokens
            .iter()
            .position(|t| Self::parse_size(t).is_some())
            .ok_or_else(invalid)?;
        let size = Self::parse_size(tokens[size_at]).ok_or_else(invalid)?;

        let families = tokens[size_at + 1..].join(" ");
        let family = families
            .split(',')
            .next()
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
            .filter(|f| !f.is_empty())
            .ok_or_else(invalid)?;

        Ok(Self {
            size,
            family,
            modifiers: tokens[..size_at]
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
        })
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{modifier} ")?;
        }
        write!(f, "{}px {}", self.size, self.family)
    }
}
