use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// Lifecycle
///
/// Primary lifecycle of a data container. `Invalid` is terminal for the
/// transaction's remaining lifetime.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Lifecycle {
    NotLoadedYet,
    New,
    Unchanged,
    Changed,
    Deleted,
    Invalid,
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotLoadedYet => "not_loaded_yet",
            Self::New => "new",
            Self::Unchanged => "unchanged",
            Self::Changed => "changed",
            Self::Deleted => "deleted",
            Self::Invalid => "invalid",
        };
        write!(f, "{label}")
    }
}

///
/// ContainerState
///
/// Point-in-time composite state snapshot: lifecycle plus which storage
/// classes have touched data. All exposed predicates derive from this.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContainerState {
    lifecycle: Lifecycle,
    persistent_data_changed: bool,
    non_persistent_data_changed: bool,
}

impl ContainerState {
    #[must_use]
    pub(crate) const fn new(
        lifecycle: Lifecycle,
        persistent_data_changed: bool,
        non_persistent_data_changed: bool,
    ) -> Self {
        Self {
            lifecycle,
            persistent_data_changed,
            non_persistent_data_changed,
        }
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub const fn is_not_loaded_yet(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::NotLoadedYet)
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::New)
    }

    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Unchanged)
    }

    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Changed)
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Deleted)
    }

    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Invalid)
    }

    /// Data has been materialized and the container is still usable state-wise.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(
            self.lifecycle,
            Lifecycle::New | Lifecycle::Unchanged | Lifecycle::Changed | Lifecycle::Deleted
        )
    }

    #[must_use]
    pub const fn is_persistent_data_changed(&self) -> bool {
        self.persistent_data_changed
    }

    #[must_use]
    pub const fn is_non_persistent_data_changed(&self) -> bool {
        self.non_persistent_data_changed
    }

    /// Any property value differs from its original, or the container as a
    /// whole represents a pending creation or deletion.
    #[must_use]
    pub const fn is_data_changed(&self) -> bool {
        self.persistent_data_changed
            || self.non_persistent_data_changed
            || matches!(self.lifecycle, Lifecycle::New | Lifecycle::Deleted)
    }

    /// The container would leave no trace after a rollback.
    #[must_use]
    pub const fn is_discardable(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::New | Lifecycle::Invalid)
    }
}
