//! Validation helpers for DTOs.

use std::collections::HashSet;

use time::Date;
use validator::ValidationError;

use crate::state::{schedule::parse_calendar_date, wizard::Team};

/// Rejects names made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a calendar date in `YYYY-MM-DD` form.
///
/// # Examples
///
/// ```ignore
/// validate_iso_date("2024-05-01") // Ok
/// validate_iso_date("01/05/2024") // Err
/// ```
pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    parse_iso_date(value).map(|_| ()).ok_or_else(|| {
        let mut err = ValidationError::new("iso_date");
        err.message = Some(format!("`{value}` is not a YYYY-MM-DD date").into());
        err
    })
}

/// Parse a `YYYY-MM-DD` date. Basic, week and ordinal ISO forms are refused.
pub fn parse_iso_date(value: &str) -> Option<Date> {
    parse_calendar_date(value)
}

/// Accepts identifiers made of ASCII letters, digits, `-` and `_`, so they can be used
/// as a single URL path segment.
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        let mut err = ValidationError::new("identifier");
        err.message = Some(format!("`{value}` is not a valid identifier").into());
        return Err(err);
    }
    Ok(())
}

/// Rejects team lists that contain the same team twice.
pub fn validate_unique_team_ids(teams: &[Team]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if let Some(duplicate) = teams.iter().find(|team| !seen.insert(team.id.as_str())) {
        let mut err = ValidationError::new("duplicate_team");
        err.message = Some(format!("Team `{}` is selected more than once", duplicate.id).into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str) -> Team {
        Team {
            id: id.into(),
            name: id.to_uppercase(),
            logo: None,
            players_count: None,
        }
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Spring Cup").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \t ").is_err());
    }

    #[test]
    fn test_validate_iso_date() {
        assert!(validate_iso_date("2024-05-01").is_ok());
        assert!(validate_iso_date("2024-02-30").is_err()); // not a real day
        assert!(validate_iso_date("01/05/2024").is_err());
        assert!(validate_iso_date("").is_err());
        assert!(validate_iso_date("20240501").is_err());
        assert!(validate_iso_date("2024-W18-3").is_err());
        assert!(validate_iso_date("2024-122").is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("665f1c2ab4e0f3a1d2c4b5e6").is_ok());
        assert!(validate_identifier("spring-cup_2024").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("../../admin/users?x=").is_err());
        assert!(validate_identifier("a b").is_err());
    }

    #[test]
    fn test_validate_unique_team_ids() {
        assert!(validate_unique_team_ids(&[team("a"), team("b")]).is_ok());
        assert!(validate_unique_team_ids(&[]).is_ok());
        assert!(validate_unique_team_ids(&[team("a"), team("b"), team("a")]).is_err());
    }
}
