//! Module: identity
//! Responsibility: validated class/property naming and object identity.
//! Does not own: mapping metadata, relation policy, or property values.
//!
//! Invariants:
//! - Names are ASCII, non-empty, and bounded by MAX_* limits.
//! - All construction paths validate invariants.
//! - `ObjectId` equality is value equality and is stable for the lifetime of a
//!   transaction's universe.


use crate::error::ErrorClass;
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// Constants
///

pub(crate) const MAX_CLASS_NAME_LEN: usize = 128;
pub(crate) const MAX_PROPERTY_NAME_LEN: usize = 64;

///
/// IdentityError
///

#[derive(Debug, ThisError)]
pub enum IdentityError {
    #[error("{kind} name is empty")]
    Empty { kind: &'static str },

    #[error("{kind} name length {len} exceeds max {max}")]
    TooLong {
        kind: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{kind} name '{value}' contains invalid character '{ch}'")]
    InvalidChar {
        kind: &'static str,
        value: String,
        ch: char,
    },

    #[error("{kind} name '{value}' has an empty path segment")]
    EmptySegment { kind: &'static str, value: String },
}

impl IdentityError {
    pub(crate) const fn class(&self) -> ErrorClass {
        ErrorClass::Unsupported
    }
}

// Shared validation for identifier-shaped names.
// `allow_path` admits `::`-separated segments for fully-qualified class
// paths; every segment must independently satisfy the identifier rules, so
// stray or unpaired colons are rejected.
fn validate_name(
    kind: &'static str,
    value: &str,
    max: usize,
    allow_path: bool,
) -> Result<(), IdentityError> {
    if value.is_empty() {
        return Err(IdentityError::Empty { kind });
    }
    if value.len() > max {
        return Err(IdentityError::TooLong {
            kind,
            len: value.len(),
            max,
        });
    }

    let check_segment = |segment: &str| -> Result<(), IdentityError> {
        if segment.is_empty() {
            return Err(IdentityError::EmptySegment {
                kind,
                value: value.to_string(),
            });
        }

        for ch in segment.chars() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                return Err(IdentityError::InvalidChar {
                    kind,
                    value: value.to_string(),
                    ch,
                });
            }
        }

        Ok(())
    };

    if allow_path {
        for segment in value.split("::") {
            check_segment(segment)?;
        }
    } else {
        check_segment(value)?;
    }

    Ok(())
}

///
/// ClassName
///
/// Validated class identifier. May be a fully-qualified path
/// (`module::Class`); segments follow Rust identifier rules.
///

#[derive(Clone, Debug, Deref, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    pub fn try_from_str(value: &str) -> Result<Self, IdentityError> {
        validate_name("class", value, MAX_CLASS_NAME_LEN, true)?;

        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// PropertyName
///

#[derive(Clone, Debug, Deref, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PropertyName(String);

impl PropertyName {
    pub fn try_from_str(value: &str) -> Result<Self, IdentityError> {
        validate_name("property", value, MAX_PROPERTY_NAME_LEN, false)?;

        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// ObjectKey
///
/// Key-value half of an [`ObjectId`]. Ordered and hashable so ids can key
/// ordered maps without extra wrapping.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ObjectKey {
    Ulid(Ulid),
    Uint(u64),
    Text(String),
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ulid(ulid) => write!(f, "{ulid}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

///
/// ObjectId
///
/// (class, key) pair identifying one entity instance. Immutable; value
/// equality; globally unique within a transaction's universe.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ObjectId {
    class: ClassName,
    key: ObjectKey,
}

impl ObjectId {
    #[must_use]
    pub const fn new(class: ClassName, key: ObjectKey) -> Self {
        Self { class, key }
    }

    #[must_use]
    pub const fn class(&self) -> &ClassName {
        &self.class
    }

    #[must_use]
    pub const fn key(&self) -> &ObjectKey {
        &self.key
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.class, self.key)
    }
}
