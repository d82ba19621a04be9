//! Numeric form identifiers and their versioned survey-archive form.

use regex::Regex;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::LazyLock;

static FORM_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid form id pattern"));

static VERSIONED_FORM_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(v\d+\.\d+)?$").expect("valid versioned form id pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormIdError {
    #[error("Form id does not match the expected pattern: {0}")]
    Malformed(String),

    #[error("Form id is out of range: {0}")]
    OutOfRange(String),
}

/// A form identifier taken from a `^\d+$` path segment.
///
/// Zero parses successfully; callers reject it with [`FormId::is_zero`] before any
/// remote existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(u64);

impl FormId {
    pub fn new(id: u64) -> Self {
        FormId(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Datastore ids are signed 64-bit, so anything past `i64::MAX` cannot exist.
    fn parse_digits(digits: &str) -> Result<Self, FormIdError> {
        digits
            .parse::<i64>()
            .map(|id| FormId(id.unsigned_abs()))
            .map_err(|_| FormIdError::OutOfRange(digits.to_string()))
    }
}

impl FromStr for FormId {
    type Err = FormIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !FORM_ID_PATTERN.is_match(s) {
            return Err(FormIdError::Malformed(s.to_string()));
        }
        Self::parse_digits(s)
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// A survey id with an optional `vMAJOR.MINOR` suffix, e.g. `1234567890v12.0`.
///
/// The numeric prefix is what gets validated; the full string names the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedFormId {
    raw: String,
    form_id: FormId,
}

impl VersionedFormId {
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_versioned(&self) -> bool {
        self.raw.contains('v')
    }
}

impl FromStr for VersionedFormId {
    type Err = FormIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = VERSIONED_FORM_ID_PATTERN
            .captures(s)
            .ok_or_else(|| FormIdError::Malformed(s.to_string()))?;
        let digits = captures
            .get(1)
            .map(|m| m.as_str())
            .ok_or_else(|| FormIdError::Malformed(s.to_string()))?;

        Ok(VersionedFormId {
            raw: s.to_string(),
            form_id: FormId::parse_digits(digits)?,
        })
    }
}

impl Display for VersionedFormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.raw)
    }
}
