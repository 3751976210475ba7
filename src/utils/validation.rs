use crate::utils::error::{ClinicError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ClinicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ClinicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClinicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ClinicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(ClinicError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Supported values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// Checks a user-supplied text field. Length is measured in characters, not bytes.
pub fn validate_text_field(
    field_name: &str,
    value: Option<&str>,
    required: bool,
    max_length: Option<usize>,
) -> Result<()> {
    let value = match value {
        Some(v) => v,
        None if required => {
            return Err(ClinicError::validation(
                field_name,
                format!("'{}' is mandatory", field_name),
            ))
        }
        None => return Ok(()),
    };

    if required && value.trim().is_empty() {
        return Err(ClinicError::validation(
            field_name,
            format!("'{}' is mandatory", field_name),
        ));
    }

    if let Some(max) = max_length {
        let length = value.chars().count();
        if length > max {
            return Err(ClinicError::validation(
                field_name,
                format!(
                    "'{}' is {} characters long; the maximum is {}",
                    field_name, length, max
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.path", "./clinic-data").is_ok());
        assert!(validate_path("storage.path", "").is_err());
        assert!(validate_path("storage.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("booking.default_visit_hour", 9u32, 0, 23).is_ok());
        assert!(validate_range("booking.default_visit_hour", 24u32, 0, 23).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("logging.level", "debug", &["info", "debug"]).is_ok());
        assert!(validate_one_of("logging.level", "loud", &["info", "debug"]).is_err());
    }

    #[test]
    fn test_validate_text_field_required() {
        assert!(validate_text_field("name", Some("Rex"), true, Some(40)).is_ok());
        assert!(validate_text_field("name", None, true, Some(40)).is_err());
        assert!(validate_text_field("name", Some("   "), true, Some(40)).is_err());
        assert!(validate_text_field("notes", None, false, Some(4000)).is_ok());
    }

    #[test]
    fn test_validate_text_field_counts_characters() {
        let forty_accented = "é".repeat(40);
        assert!(validate_text_field("name", Some(&forty_accented), true, Some(40)).is_ok());

        let err = validate_text_field("name", Some(&"x".repeat(41)), true, Some(40)).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("maximum is 40"));
    }
}
