//! Validated identifier and ISBN value objects
//!
//! Constructors validate format and reject malformed input up front;
//! everything built from a valid instance is total and side-effect-free.
//! Identifiers compare by value and are immutable once constructed.

use std::fmt;

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

static USER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").expect("valid regex"));
static ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{13}$").expect("valid regex"));

/// Member identifier, exactly 8 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: &str) -> AppResult<Self> {
        if !USER_ID_RE.is_match(value) {
            return Err(AppError::Validation(format!(
                "user_id must be exactly 8 digits, got: {value}"
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// Generates a random 8-digit identifier
    pub(crate) fn generate() -> Self {
        let n: u32 = rand::thread_rng().gen_range(10_000_000..=99_999_999);
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Book identifier, any non-empty string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(value: &str) -> AppResult<Self> {
        if value.is_empty() {
            return Err(AppError::Validation("book_id cannot be empty".to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loan identifier, any non-empty string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct LoanId(String);

impl LoanId {
    pub fn new(value: &str) -> AppResult<Self> {
        if value.is_empty() {
            return Err(AppError::Validation("loan_id cannot be empty".to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized 13-digit ISBN
///
/// Accepts "978-3-16-148410-0" or "9783161484100"; stores the bare
/// digits and renders the hyphenated form on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(value: &str) -> AppResult<Self> {
        let clean: String = value.chars().filter(|c| *c != ' ' && *c != '-').collect();
        if !ISBN_RE.is_match(&clean) {
            return Err(AppError::Validation(format!(
                "isbn must be 13 digits, got: {value}"
            )));
        }
        Ok(Self(clean))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hyphenated display form, e.g. "978-3-16-148410-0"
    pub fn formatted(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            &self.0[0..3],
            &self.0[3..4],
            &self.0[4..6],
            &self.0[6..12],
            &self.0[12..13]
        )
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_accepts_eight_digits() {
        let id = UserId::new("12345678").unwrap();
        assert_eq!(id.as_str(), "12345678");
    }

    #[test]
    fn user_id_rejects_bad_formats() {
        assert!(UserId::new("1234567").is_err());
        assert!(UserId::new("123456789").is_err());
        assert!(UserId::new("1234567a").is_err());
        assert!(UserId::new("").is_err());
    }

    #[test]
    fn generated_user_id_is_valid() {
        let id = UserId::generate();
        assert!(UserId::new(id.as_str()).is_ok());
    }

    #[test]
    fn book_and_loan_ids_reject_empty() {
        assert!(BookId::new("").is_err());
        assert!(LoanId::new("").is_err());
        assert!(BookId::new("b-1").is_ok());
        assert!(LoanId::new("l-1").is_ok());
    }

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(BookId::new("b-1").unwrap(), BookId::new("b-1").unwrap());
        assert_ne!(LoanId::new("l-1").unwrap(), LoanId::new("l-2").unwrap());
    }

    #[test]
    fn isbn_normalizes_hyphens_and_spaces() {
        let isbn = Isbn::new("978-3-16-148410-0").unwrap();
        assert_eq!(isbn.as_str(), "9783161484100");
        let isbn = Isbn::new("978 3 16 148410 0").unwrap();
        assert_eq!(isbn.as_str(), "9783161484100");
    }

    #[test]
    fn isbn_rejects_malformed_input() {
        assert!(Isbn::new("978-3-16").is_err());
        assert!(Isbn::new("97831614841000").is_err());
        assert!(Isbn::new("978316148410a").is_err());
    }

    #[test]
    fn isbn_formats_display_form() {
        let isbn = Isbn::new("9783161484100").unwrap();
        assert_eq!(isbn.formatted(), "978-3-16-148410-0");
    }
}
