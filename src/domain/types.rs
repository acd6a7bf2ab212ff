//! Strongly-typed value objects used by checkout drafts.
//!
//! These wrappers enforce basic invariants (trimmed non-empty text, E.164
//! phone numbers) so that once a value reaches a stored draft it can be
//! treated as trusted.
use std::collections::HashSet;
use std::ops::Deref;

use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value exceeded the allowed length.
    #[error("value is longer than {0} characters")]
    TooLong(u64),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
}

/// A dialog payload field that failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Payload field name as it appears in the stored draft (camelCase).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Wraps a constraint violation for the given field.
    pub fn from_constraint(field: &'static str, err: TypeConstraintError) -> Self {
        Self::new(field, err.to_string())
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(CustomerName, "Customer name enforcing non-empty values.");
non_empty_string_newtype!(BuildingNumber, "House or building number of an address.");
non_empty_string_newtype!(Street, "Street name of an address.");
non_empty_string_newtype!(Town, "Town or city of an address.");
non_empty_string_newtype!(Pincode, "Postal code of an address.");
non_empty_string_newtype!(ScheduledTime, "Requested delivery or pickup time token.");

/// Maximum length of a delivery note, in characters.
pub const MAX_NOTE_LENGTH: u64 = 500;

/// Delivery note as typed, with markup removed. Possibly empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DeliveryNote(String);

impl DeliveryNote {
    /// Strips tags, trims and bounds the note length. Plain text such as
    /// `&` or `<3` is kept verbatim; templates escape it on output.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let stripped = ammonia::Builder::default()
            .tags(HashSet::new())
            .clean(&value.into())
            .to_string();
        let text = unescape_text(&stripped);
        let trimmed = text.trim();
        if trimmed.chars().count() as u64 > MAX_NOTE_LENGTH {
            return Err(TypeConstraintError::TooLong(MAX_NOTE_LENGTH));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Reverses the entity escaping the HTML serializer applies to text nodes.
fn unescape_text(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Extracts the national significant number from a raw dialed value.
///
/// The raw form is `<anything>-<national number>`; without a separator the
/// whole value is taken. A repeated `+<code>`/`00<code>` prefix and a leading
/// trunk `0` are dropped.
fn national_number(raw: &str, calling_code: u16) -> Result<String, TypeConstraintError> {
    let national = match raw.split_once('-') {
        Some((_, rest)) => rest,
        None => raw,
    };
    let digits: String = national
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let code = calling_code.to_string();
    let without_code = digits
        .strip_prefix(&format!("+{code}"))
        .or_else(|| digits.strip_prefix(&format!("00{code}")))
        .unwrap_or(&digits);
    let without_trunk = without_code.strip_prefix('0').unwrap_or(without_code);

    if without_trunk.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    if !without_trunk.chars().all(|c| c.is_ascii_digit()) {
        return Err(TypeConstraintError::InvalidPhone);
    }
    Ok(without_trunk.to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    /// Builds the canonical number from a raw dialed value such as
    /// `+49-15551234` by prefixing the national part with `calling_code`.
    pub fn from_dialed(raw: &str, calling_code: u16) -> Result<Self, TypeConstraintError> {
        let national = national_number(raw, calling_code)?;
        Self::new(format!("+{calling_code}{national}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}
