use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// 查询参数验证错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid type: {0} (must be one of all, movie, tv, anime)")]
    InvalidType(String),

    #[error("Invalid content type: {0} (must be movie or tv)")]
    InvalidContentKind(String),

    #[error("Unknown genre: {0}")]
    InvalidGenre(String),

    #[error("Invalid year: {0} (must be a 4-digit year between 1870 and 2100)")]
    InvalidYear(String),

    #[error("Invalid rating: {0} (must be between 0 and 10)")]
    InvalidRating(String),

    #[error("Invalid sortBy: {0} (must be one of popular, top_rated, newest, trending)")]
    InvalidSort(String),

    #[error("Invalid language code: {0} (must be ISO 639-1 format)")]
    InvalidLanguageCode(String),

    #[error("Invalid page: {0} (must be between 1 and 500)")]
    InvalidPage(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Search query must be at least 2 characters")]
    QueryTooShort,
}

/// 上游允许的最大页码
pub const MAX_PAGE: u32 = 500;

pub struct ParamValidator;

impl ParamValidator {
    /// 哨兵值 `all` 或空串视为未设置
    pub fn is_unset(value: Option<&str>) -> bool {
        match value {
            None => true,
            Some(v) => {
                let v = v.trim();
                v.is_empty() || v.eq_ignore_ascii_case("all")
            }
        }
    }

    pub fn parse_year(value: Option<&str>) -> Result<Option<u16>, ValidationError> {
        if Self::is_unset(value) {
            return Ok(None);
        }
        let raw = value.unwrap_or_default().trim();

        static YEAR_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = YEAR_REGEX.get_or_init(|| {
            Regex::new(r"^\d{4}$").expect("valid year regex")
        });

        if !regex.is_match(raw) {
            return Err(ValidationError::InvalidYear(raw.to_string()));
        }
        match raw.parse::<u16>() {
            Ok(year) if (1870..=2100).contains(&year) => Ok(Some(year)),
            _ => Err(ValidationError::InvalidYear(raw.to_string())),
        }
    }

    pub fn parse_rating(value: Option<&str>) -> Result<Option<f32>, ValidationError> {
        if Self::is_unset(value) {
            return Ok(None);
        }
        let raw = value.unwrap_or_default().trim();
        match raw.parse::<f32>() {
            Ok(r) if r.is_finite() && (0.0..=10.0).contains(&r) => Ok(Some(r)),
            _ => Err(ValidationError::InvalidRating(raw.to_string())),
        }
    }

    pub fn parse_language(value: Option<&str>) -> Result<Option<String>, ValidationError> {
        if Self::is_unset(value) {
            return Ok(None);
        }
        let raw = value.unwrap_or_default().trim().to_lowercase();

        static LANG_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = LANG_REGEX.get_or_init(|| {
            Regex::new(r"^[a-z]{2}$").expect("valid language regex")
        });

        if regex.is_match(&raw) {
            Ok(Some(raw))
        } else {
            Err(ValidationError::InvalidLanguageCode(raw))
        }
    }

    pub fn parse_page(value: Option<&str>) -> Result<u32, ValidationError> {
        let raw = match value.map(str::trim) {
            None | Some("") => return Ok(1),
            Some(v) => v,
        };
        match raw.parse::<u32>() {
            Ok(page) if (1..=MAX_PAGE).contains(&page) => Ok(page),
            _ => Err(ValidationError::InvalidPage(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_values() {
        assert!(ParamValidator::is_unset(None));
        assert!(ParamValidator::is_unset(Some("all")));
        assert!(ParamValidator::is_unset(Some(" ALL ")));
        assert!(ParamValidator::is_unset(Some("")));
        assert!(!ParamValidator::is_unset(Some("2020")));
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(ParamValidator::parse_year(Some("2021")).unwrap(), Some(2021));
        assert_eq!(ParamValidator::parse_year(Some("all")).unwrap(), None);
        assert!(ParamValidator::parse_year(Some("21")).is_err());
        assert!(ParamValidator::parse_year(Some("1700")).is_err());
        assert!(ParamValidator::parse_year(Some("20x1")).is_err());
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(ParamValidator::parse_rating(Some("7.5")).unwrap(), Some(7.5));
        assert!(ParamValidator::parse_rating(Some("11")).is_err());
        assert!(ParamValidator::parse_rating(Some("-1")).is_err());
        assert!(ParamValidator::parse_rating(Some("NaN")).is_err());
    }

    #[test]
    fn test_parse_language_and_page() {
        assert_eq!(
            ParamValidator::parse_language(Some("JA")).unwrap(),
            Some("ja".to_string())
        );
        assert!(ParamValidator::parse_language(Some("jpn")).is_err());

        assert_eq!(ParamValidator::parse_page(None).unwrap(), 1);
        assert_eq!(ParamValidator::parse_page(Some("3")).unwrap(), 3);
        assert!(ParamValidator::parse_page(Some("0")).is_err());
        assert!(ParamValidator::parse_page(Some("501")).is_err());
        assert!(ParamValidator::parse_page(Some("two")).is_err());
    }
}
