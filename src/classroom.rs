//! Classroom data model.
//!
//! A classroom is identified by its code (e.g. `A204`) and carries a floor,
//! an image reference, a visit counter, and one translation per supported
//! language. Codes are normalized before every store access so that
//! `a 204`, `A%20204` and `A204` all refer to the same room.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;

/// Maximum length of a normalized classroom code.
pub const MAX_CODE_LENGTH: usize = 10;

/// Number of entries returned by the most-visited ranking.
pub const MOST_VISITED_LIMIT: i64 = 5;

// =============================================================================
// Language
// =============================================================================

/// Languages a classroom translation can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Tr,
    Ar,
}

impl Language {
    /// Stored/wire form of the language code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
            Language::Ar => "ar",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "tr" => Ok(Language::Tr),
            "ar" => Ok(Language::Ar),
            other => Err(ValidationError::UnsupportedLanguage {
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Code normalization
// =============================================================================

/// Normalize a classroom code: uppercase, with whitespace and literal `%20`
/// sequences removed.
///
/// The literal `%20` case covers clients that double-encode the path segment.
pub fn normalize_code(raw: &str) -> String {
    raw.replace("%20", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

// =============================================================================
// Read models
// =============================================================================

/// Location information for one classroom in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomInfo {
    pub building: String,
    pub floor: i32,
    pub image_url: String,
    pub description: String,
    /// Empty when the translation has no detail text
    pub detail: String,
}

/// One entry of the most-visited ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitCount {
    pub code: String,
    pub visited: i64,
}

// =============================================================================
// Write models
// =============================================================================

/// A validated classroom registration, ready to be stored.
///
/// Only [`validate_registration`](crate::validate::validate_registration)
/// produces these from client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClassroom {
    /// Normalized code
    pub code: String,
    pub floor: i32,
    pub image_url: String,
    /// Non-empty, at most one entry per language
    pub translations: Vec<NewTranslation>,
}

/// A validated translation belonging to a [`NewClassroom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranslation {
    pub language: Language,
    pub building: String,
    pub description: String,
    pub detail: Option<String>,
}
