//! Input validation shared by the services.

use chrono::{Datelike, NaiveDate};

use super::errors::DomainError;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_TAG_LENGTH: usize = 64;

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DomainError> {
    let value = value.trim();
    if value.len() != 10 {
        return Err(DomainError::validation(format!(
            "{} must be in YYYY-MM-DD format",
            field
        )));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        DomainError::validation(format!("{} is not a valid date: {}", field, value))
    })
}

/// Birth dates are plain dates within 1900..=2100 and never in the future
pub fn parse_birth_date(value: &str, today: NaiveDate) -> Result<NaiveDate, DomainError> {
    let date = parse_date("Birth date", value)?;
    if date.year() < 1900 || date.year() > 2100 {
        return Err(DomainError::validation("Year must be between 1900 and 2100"));
    }
    if date > today {
        return Err(DomainError::validation("Birth date cannot be in the future"));
    }
    Ok(date)
}

/// Trimmed, non-empty, bounded
pub fn validate_name(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", field)));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            field, MAX_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim each tag, drop empties and case-insensitive duplicates (first spelling wins)
pub fn normalize_tags(field: &str, tags: Vec<String>) -> Result<Vec<String>, DomainError> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.chars().count() > MAX_TAG_LENGTH {
            return Err(DomainError::validation(format!(
                "{} entries cannot exceed {} characters",
                field, MAX_TAG_LENGTH
            )));
        }
        if seen.insert(trimmed.to_lowercase()) {
            result.push(trimmed.to_string());
        }
    }
    Ok(result)
}

pub fn validate_quantity(value: f64) -> Result<f64, DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation("Quantity must be a non-negative number"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_parse_birth_date() {
        assert!(parse_birth_date("2015-06-15", today()).is_err()); // Future
        assert!(parse_birth_date("2015-05-15", today()).is_ok());
        assert!(parse_birth_date("2000-02-29", today()).is_ok()); // Leap year

        assert!(parse_birth_date("2015/05/15", today()).is_err());
        assert!(parse_birth_date("2015-5-15", today()).is_err());
        assert!(parse_birth_date("2015-13-15", today()).is_err());
        assert!(parse_birth_date("2015-02-30", today()).is_err());
        assert!(parse_birth_date("2015-04-31", today()).is_err());
        assert!(parse_birth_date("1899-06-15", today()).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Name", "  Alice ").unwrap(), "Alice");
        assert!(validate_name("Name", "   ").is_err());
        assert!(validate_name("Name", &"x".repeat(101)).is_err());
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(
            "Allergies",
            vec![" gluten".into(), "".into(), "Peanuts".into(), "GLUTEN".into()],
        )
        .unwrap();
        assert_eq!(tags, vec!["gluten".to_string(), "Peanuts".to_string()]);
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0.0).is_ok());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
    }
}
