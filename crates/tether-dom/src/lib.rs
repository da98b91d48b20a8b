//! In-memory hosts for Tether: a `Window`, a `Document` of elements, and the
//! app bootstrap that mounts components onto them.
//!
//! Every target here is an `EventHub`, so `tether_core::bind_scoped_listener`
//! and `use_event_listener` work on windows and elements alike.

pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod hub;
pub mod window;


pub use app::{App, AppContext, Component, MountHandle, Plugin, SetupContext, create_app};
pub use config::AppConfig;
pub use document::{Document, NodeId};
pub use error::{AppError, DomError};
pub use hub::EventHub;
pub use window::{DomEvent, Window};
