//! # Scopes, Listeners, and Signals
//!
//! Tether keeps side-effects tied to the lifetime of whatever owns them. There
//! are three main pieces:
//!
//! - `Scope` — a lifetime window owner with activation and deactivation.
//! - `bind_scoped_listener` / `use_event_listener` — listener registrations
//!   that are removed with the exact callback they were added with.
//! - `Signal<T>` — a plain value with an explicit subscriber list.
//!
//! ## Signals
//!
//! ```rust
//! use tether_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! ## Lifetime windows
//!
//! Setup code runs inside `Scope::run` and registers hooks. Each
//! `activate()` runs them; each `deactivate()` runs the cleanups they returned:
//!
//! ```rust
//! use tether_core::*;
//!
//! let scope = Scope::new();
//! scope.run(|| {
//!     on_active(|| {
//!         log::info!("active");
//!         on_deactivate(|| log::info!("inactive"))
//!     });
//! });
//! scope.activate();
//! scope.deactivate();
//! ```
//!
//! ## Listeners
//!
//! `use_event_listener(target, "mousemove", cb)` registers `cb` on every
//! activation and removes that same `cb` on deactivation. Outside setup, use
//! `bind_scoped_listener` and keep the returned `ListenerHandle`; dropping the
//! handle unbinds. `use_mouse` and `PositionTracker` build pointer tracking on
//! top of both.

pub mod effects;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod listener;
pub mod mouse;
pub mod prelude;
pub mod scope;
pub mod signal;
pub mod tests;

pub use prelude::*;
