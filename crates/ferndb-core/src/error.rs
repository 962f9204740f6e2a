use crate::{
    collection::CollectionError, container::ContainerError, endpoint::EndPointError,
    fetch::FetchError, identity::IdentityError, metadata::MetadataError,
    persistence::PersistenceError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// EngineError
///
/// Structured runtime error with a stable internal classification.
/// Module-level errors carry the precise variant; this wrapper adds the
/// class/origin taxonomy used at the transaction boundary.
///

#[derive(Debug, ThisError)]
#[error("{origin}:{class}: {message}")]
pub struct EngineError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl EngineError {
    /// Construct an EngineError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a transaction-origin not-found error.
    pub(crate) fn object_not_found(id: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Transaction,
            format!("object not found: {id}"),
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`EngineError`].
/// This enum is intentionally extensible.
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Identity(IdentityError),
    #[error("{0}")]
    Metadata(MetadataError),
    #[error("{0}")]
    Container(ContainerError),
    #[error("{0}")]
    Collection(CollectionError),
    #[error("{0}")]
    EndPoint(EndPointError),
    #[error("{0}")]
    Fetch(FetchError),
    #[error("{0}")]
    Persistence(PersistenceError),
}

macro_rules! impl_from_detail {
    ($err:ty, $variant:ident, $origin:expr) => {
        impl From<$err> for EngineError {
            fn from(err: $err) -> Self {
                Self {
                    class: err.class(),
                    origin: $origin,
                    message: err.to_string(),
                    detail: Some(ErrorDetail::$variant(err)),
                }
            }
        }
    };
}

impl_from_detail!(IdentityError, Identity, ErrorOrigin::Metadata);
impl_from_detail!(MetadataError, Metadata, ErrorOrigin::Metadata);
impl_from_detail!(ContainerError, Container, ErrorOrigin::Container);
impl_from_detail!(CollectionError, Collection, ErrorOrigin::Collection);
impl_from_detail!(EndPointError, EndPoint, ErrorOrigin::EndPoint);
impl_from_detail!(FetchError, Fetch, ErrorOrigin::Fetch);
impl_from_detail!(PersistenceError, Persistence, ErrorOrigin::Persistence);

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidState,
    NotFound,
    Conflict,
    InvariantViolation,
    Unsupported,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidState => "invalid_state",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InvariantViolation => "invariant_violation",
            Self::Unsupported => "unsupported",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Metadata,
    Container,
    Collection,
    EndPoint,
    Fetch,
    Persistence,
    Transaction,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Metadata => "metadata",
            Self::Container => "container",
            Self::Collection => "collection",
            Self::EndPoint => "end_point",
            Self::Fetch => "fetch",
            Self::Persistence => "persistence",
            Self::Transaction => "transaction",
        };
        write!(f, "{label}")
    }
}
