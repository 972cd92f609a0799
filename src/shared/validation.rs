use crate::core::error::ValidationError;
use crate::shared::constants::MAX_CATEGORY_NAME_LENGTH;

/// Trim a category name and reject blank or over-long input.
///
/// Length is counted in characters, not bytes.
pub fn normalize_category_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            max: MAX_CATEGORY_NAME_LENGTH,
        });
    }
    Ok(name.to_string())
}
