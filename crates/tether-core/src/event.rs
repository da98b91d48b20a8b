use std::rc::Rc;

use bitflags::bitflags;

use crate::error::BindError;

bitflags! {
    /// What a target lets callers do with its listener list.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const ADD_LISTENER = 1 << 0;
        const REMOVE_LISTENER = 1 << 1;
    }
}

/// A callback registered on a target.
///
/// Identity is the `Rc` allocation: two listeners built from identical
/// closures are different listeners. Removal only succeeds with a clone of
/// the listener that was added.
pub struct Listener<E: 'static>(Rc<dyn Fn(&E)>);

impl<E: 'static> Listener<E> {
    pub fn new(f: impl Fn(&E) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &E) {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &Listener<E>) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl<E: 'static> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<E: 'static> std::fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

impl<E: 'static, F: Fn(&E) + 'static> From<F> for Listener<E> {
    fn from(f: F) -> Self {
        Listener::new(f)
    }
}

/// Anything that keeps named listener lists.
pub trait EventTarget<E: 'static> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    /// Registers `listener` under `event`. `Ok(false)` means this exact
    /// listener was already registered there and nothing changed.
    fn add_listener(&self, event: &str, listener: &Listener<E>) -> Result<bool, BindError>;

    /// Removes this exact listener. Returns `false` if it was not registered.
    fn remove_listener(&self, event: &str, listener: &Listener<E>) -> bool;

    fn has_listener(&self, event: &str, listener: &Listener<E>) -> bool;

    fn listener_count(&self, event: &str) -> usize;
}
