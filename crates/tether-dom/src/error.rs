use thiserror::Error;

use crate::document::NodeId;
use tether_core::BindError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node {0:?} does not belong to this document")]
    UnknownNode(NodeId),
    #[error("cannot append {child:?} under {parent:?}: it would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no element matches '{selector}'")]
    HostNotFound { selector: String },
    #[error("'{selector}' already hosts a mounted app")]
    HostOccupied { selector: String },
    #[error("app is already mounted")]
    AlreadyMounted,
    #[error("setup failed: {0}")]
    Setup(String),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("invalid app config: {0}")]
    Config(#[from] serde_json::Error),
}
