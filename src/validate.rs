//! Validation of classroom registration payloads.
//!
//! Client input arrives as [`RegisterClassroomRequest`], where every field is
//! optional or defaulted so that a missing field is reported as a
//! [`ValidationError`] rather than a JSON decoding failure. A successful
//! validation yields a [`NewClassroom`] with a normalized code and typed
//! languages.

use std::collections::HashSet;

use serde::Deserialize;
use url::Url;

use crate::classroom::{normalize_code, Language, NewClassroom, NewTranslation, MAX_CODE_LENGTH};
use crate::error::ValidationError;

/// Body of `POST /classrooms`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClassroomRequest {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub floor: Option<i32>,

    #[serde(default)]
    pub image_url: String,

    #[serde(default)]
    pub translations: Vec<TranslationRequest>,
}

/// One translation inside a [`RegisterClassroomRequest`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationRequest {
    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub building: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub detail: Option<String>,
}

/// Validate a registration request and convert it into a [`NewClassroom`].
///
/// Checks run in field order and the first failure is returned.
pub fn validate_registration(
    request: RegisterClassroomRequest,
) -> Result<NewClassroom, ValidationError> {
    let code = normalize_code(&request.code);
    let code_len = code.chars().count();
    if code_len == 0 || code_len > MAX_CODE_LENGTH {
        return Err(ValidationError::CodeLength {
            actual: code_len,
            max: MAX_CODE_LENGTH,
        });
    }

    let floor = request.floor.ok_or(ValidationError::MissingFloor)?;

    validate_image_url(&request.image_url)?;

    if request.translations.is_empty() {
        return Err(ValidationError::EmptyTranslations);
    }

    let mut seen = HashSet::new();
    let mut translations = Vec::with_capacity(request.translations.len());
    for (index, translation) in request.translations.into_iter().enumerate() {
        let translation = validate_translation(index, translation)?;
        if !seen.insert(translation.language) {
            return Err(ValidationError::DuplicateLanguage {
                language: translation.language.to_string(),
            });
        }
        translations.push(translation);
    }

    Ok(NewClassroom {
        code,
        floor,
        image_url: request.image_url,
        translations,
    })
}

fn validate_image_url(image_url: &str) -> Result<(), ValidationError> {
    if image_url.trim().is_empty() {
        return Err(ValidationError::InvalidImageUrl("missing".to_string()));
    }
    Url::parse(image_url)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidImageUrl(e.to_string()))
}

fn validate_translation(
    index: usize,
    translation: TranslationRequest,
) -> Result<NewTranslation, ValidationError> {
    if translation.language.is_empty() {
        return Err(ValidationError::MissingLanguage { index });
    }
    let language: Language = translation.language.parse()?;

    if translation.building.trim().is_empty() {
        return Err(ValidationError::MissingBuilding { index });
    }
    if translation.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription { index });
    }

    // An empty detail is stored the same as an absent one
    let detail = translation.detail.filter(|d| !d.is_empty());

    Ok(NewTranslation {
        language,
        building: translation.building,
        description: translation.description,
        detail,
    })
}

/// Parse the `language` query parameter of a lookup.
pub fn parse_query_language(language: Option<&str>) -> Result<Language, ValidationError> {
    match language {
        None | Some("") => Err(ValidationError::MissingQueryLanguage),
        Some(value) => value.parse(),
    }
}
