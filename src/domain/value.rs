use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway API key.
///
/// Invariant: non-empty after trimming. The key is presented either as a
/// bearer token (SMS1.ir) or as a raw `X-API-KEY` header (SMS.ir v1); the
/// value itself is opaque to this crate.
pub struct ApiKey(String);

impl ApiKey {
    /// Field name used in validation messages.
    pub const FIELD: &'static str = "api_key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Mobile number of a message recipient (`recipient` / `Mobiles` on the wire).
///
/// Invariant: non-empty after trimming. No phone-number validation is done
/// locally; malformed numbers are rejected by the gateway.
pub struct Recipient(String);

impl Recipient {
    /// JSON field name used by SMS1.ir (`recipient`).
    pub const FIELD: &'static str = "recipient";

    /// Create a validated [`Recipient`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated mobile number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`message` / `MessageText` on the wire).
///
/// Invariant: non-empty after trimming. The original value (including
/// whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// JSON field name used by SMS1.ir (`message`).
    pub const FIELD: &'static str = "message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Identifier of a server-stored message template (`templateId` on the wire).
///
/// The template body lives in the gateway account; this crate never renders
/// templates itself.
pub struct TemplateId(u32);

impl TemplateId {
    /// Wrap a template id.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// The numeric id.
    pub fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unix timestamp in seconds, as used by the scheduled-send and archive
/// date-range parameters.
pub struct UnixTimestamp(i64);

impl UnixTimestamp {
    /// Wrap a unix timestamp (seconds).
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The timestamp in seconds.
    pub fn value(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
/// A sending line number.
///
/// The gateway is inconsistent about this value: requests and responses carry
/// it sometimes as a JSON number and sometimes as a string, so both shapes are
/// accepted and round-tripped as-is.
pub enum LineNumber {
    Number(u64),
    Text(String),
}

impl LineNumber {
    /// Field name used in validation messages.
    pub const FIELD: &'static str = "line_number";

    /// Wrap a numeric line number.
    pub fn number(value: u64) -> Self {
        Self::Number(value)
    }

    /// Wrap a textual line number. Invariant: non-empty after trimming.
    pub fn text(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self::Text(trimmed.to_owned()))
    }

    /// Parse a line number from free-form input, preferring the numeric shape.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if let Ok(number) = trimmed.parse::<u64>() {
            return Ok(Self::Number(number));
        }
        Self::text(trimmed)
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}
