//! # Scoped listeners
//!
//! [`bind_scoped_listener`] registers a callback on a target and hands back a
//! [`ListenerHandle`]. The handle keeps the exact `Listener` it registered, so
//! disposing it always removes that same registration. Dropping the handle
//! disposes it.
//!
//! ```rust
//! use std::rc::Rc;
//! use tether_core::*;
//!
//! fn track(target: &Rc<impl EventTarget<MouseEvent> + 'static>) -> Result<(), BindError> {
//!     let handle = bind_scoped_listener(target, MOUSE_MOVE, |e: &MouseEvent| {
//!         log::info!("pointer at {:?}", e.page);
//!     })?;
//!     // ...
//!     handle.dispose();
//!     Ok(())
//! }
//! ```
//!
//! [`use_event_listener`] is the setup-time form: it attaches the binding to
//! every lifetime window of the current [`Scope`](crate::Scope).

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::BindError;
use crate::event::{Capabilities, EventTarget, Listener};
use crate::scope::{current_scope, on_active};
use crate::Dispose;

/// What to do when a target refuses a binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BindPolicy {
    /// Surface the error.
    #[default]
    Strict,
    /// Log it and continue with an inert handle.
    Lenient,
}

thread_local! {
    static POLICY_STACK: RefCell<Vec<BindPolicy>> = const { RefCell::new(Vec::new()) };
}

/// Runs `f` with `policy` as the current bind policy.
pub fn with_bind_policy<R>(policy: BindPolicy, f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            POLICY_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    POLICY_STACK.with(|st| st.borrow_mut().push(policy));
    let _guard = Guard;
    f()
}

pub fn bind_policy() -> BindPolicy {
    POLICY_STACK.with(|st| st.borrow().last().copied().unwrap_or_default())
}

/// One live registration of a listener on a target.
pub struct ListenerHandle<E: 'static> {
    event: String,
    listener: Listener<E>,
    remove: RefCell<Option<Box<dyn FnOnce() -> bool>>>,
}

impl<E: 'static> ListenerHandle<E> {
    /// A handle that owns no registration.
    pub fn inert(event: impl Into<String>, listener: Listener<E>) -> Self {
        Self {
            event: event.into(),
            listener,
            remove: RefCell::new(None),
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn listener(&self) -> &Listener<E> {
        &self.listener
    }

    pub fn is_bound(&self) -> bool {
        self.remove.borrow().is_some()
    }

    /// Removes the registration. Returns `true` only for the call that
    /// actually removed it; later calls are no-ops.
    pub fn dispose(&self) -> bool {
        let remove = self.remove.borrow_mut().take();
        match remove {
            Some(remove) => remove(),
            None => false,
        }
    }

    /// Leaves the registration in place for the target's whole life.
    pub fn forget(self) {
        self.remove.borrow_mut().take();
    }

    /// Wraps the handle into a `Dispose` for scope cleanup lists.
    pub fn into_dispose(self) -> Dispose {
        Dispose::new(move || {
            self.dispose();
        })
    }
}

impl<E: 'static> Drop for ListenerHandle<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<E: 'static> std::fmt::Debug for ListenerHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("event", &self.event)
            .field("listener", &self.listener)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Registers `callback` under `event` on `target`.
///
/// Fails if the name is empty, if the target cannot both add and remove
/// listeners, if it rejects the event, or if this exact callback is already
/// registered there.
pub fn bind_scoped_listener<E, T>(
    target: &Rc<T>,
    event: &str,
    callback: impl Into<Listener<E>>,
) -> Result<ListenerHandle<E>, BindError>
where
    E: 'static,
    T: EventTarget<E> + ?Sized + 'static,
{
    if event.is_empty() {
        return Err(BindError::EmptyEventName);
    }
    let target_ref: &T = target;
    let missing = Capabilities::all().difference(EventTarget::<E>::capabilities(target_ref));
    if !missing.is_empty() {
        return Err(BindError::MissingCapability {
            event: event.to_string(),
            missing,
        });
    }

    let listener = callback.into();
    if !target_ref.add_listener(event, &listener)? {
        return Err(BindError::AlreadyBound {
            event: event.to_string(),
        });
    }
    log::debug!("bound {listener:?} to '{event}'");

    let weak = Rc::downgrade(target);
    let name = event.to_string();
    let registered = listener.clone();
    let remove = move || match weak.upgrade() {
        Some(target) => {
            let removed = (*target).remove_listener(&name, &registered);
            log::debug!("unbound {registered:?} from '{name}' (removed: {removed})");
            removed
        }
        None => {
            log::debug!("target of '{name}' already dropped; nothing to unbind");
            false
        }
    };

    Ok(ListenerHandle {
        event: event.to_string(),
        listener,
        remove: RefCell::new(Some(Box::new(remove))),
    })
}

/// Like [`bind_scoped_listener`], but under [`BindPolicy::Lenient`] a refused
/// binding becomes an inert handle and a warning.
pub fn bind_with_policy<E, T>(
    target: &Rc<T>,
    event: &str,
    callback: impl Into<Listener<E>>,
    policy: BindPolicy,
) -> Result<ListenerHandle<E>, BindError>
where
    E: 'static,
    T: EventTarget<E> + ?Sized + 'static,
{
    let listener = callback.into();
    match bind_scoped_listener(target, event, listener.clone()) {
        Ok(handle) => Ok(handle),
        Err(err) if policy == BindPolicy::Lenient => {
            log::warn!("listener for '{event}' not bound: {err}");
            Ok(ListenerHandle::inert(event, listener))
        }
        Err(err) => Err(err),
    }
}

/// Binds `callback` for every lifetime window of the current scope.
///
/// Each activation registers the same callback; the matching deactivation
/// removes it. Failures at activation time are logged and, under
/// [`BindPolicy::Strict`], recorded on the scope (see
/// [`Scope::take_errors`](crate::Scope::take_errors)).
pub fn use_event_listener<E, T>(
    target: &Rc<T>,
    event: &str,
    callback: impl Into<Listener<E>>,
) -> Result<(), BindError>
where
    E: 'static,
    T: EventTarget<E> + ?Sized + 'static,
{
    if event.is_empty() {
        return Err(BindError::EmptyEventName);
    }
    if current_scope().is_none() {
        return Err(BindError::NoActiveScope);
    }

    let target = target.clone();
    let event = event.to_string();
    let listener = callback.into();
    let policy = bind_policy();

    on_active(move || {
        match bind_with_policy(&target, &event, listener.clone(), policy) {
            Ok(handle) => handle.into_dispose(),
            Err(err) => {
                log::warn!("use_event_listener('{event}'): {err}");
                if let Some(scope) = current_scope() {
                    scope.record_error(err);
                }
                Dispose::noop()
            }
        }
    });
    Ok(())
}
