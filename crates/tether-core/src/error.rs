use thiserror::Error;

use crate::Capabilities;

/// Why a listener could not be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("event name must not be empty")]
    EmptyEventName,
    #[error("target cannot bind '{event}': missing {missing:?}")]
    MissingCapability {
        event: String,
        missing: Capabilities,
    },
    #[error("target does not emit '{event}'")]
    UnsupportedEvent { event: String },
    #[error("callback is already bound to '{event}' on this target")]
    AlreadyBound { event: String },
    #[error("no active scope; listeners must be registered during setup")]
    NoActiveScope,
}
