//! Pointer position tracking built on the scoped listener binder.

use std::rc::Rc;

use crate::error::BindError;
use crate::event::{EventTarget, Listener};
use crate::input::{MOUSE_MOVE, PagePosition};
use crate::listener::{ListenerHandle, bind_scoped_listener, use_event_listener};
use crate::{Signal, SubId, Vec2, signal};

/// Last known page position. Starts at `(0, 0)`; each delivered event
/// overwrites both coordinates before observers are notified.
#[derive(Clone, Debug)]
pub struct MousePosition {
    pos: Signal<Vec2>,
}

impl MousePosition {
    pub fn new() -> Self {
        Self {
            pos: signal(Vec2::ZERO),
        }
    }

    pub fn x(&self) -> f32 {
        self.pos.with(|p| p.x)
    }

    pub fn y(&self) -> f32 {
        self.pos.with(|p| p.y)
    }

    pub fn get(&self) -> Vec2 {
        self.pos.get()
    }

    pub fn signal(&self) -> &Signal<Vec2> {
        &self.pos
    }

    pub fn subscribe(&self, f: impl Fn(&Vec2) + 'static) -> SubId {
        self.pos.subscribe(f)
    }

    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.pos.unsubscribe(id)
    }

    /// The listener that feeds this position. Payloads without a page
    /// position are ignored.
    pub fn listener<E: PagePosition + 'static>(&self) -> Listener<E> {
        let pos = self.pos.clone();
        Listener::new(move |e: &E| {
            if let Some(p) = e.page_position() {
                pos.set(p);
            }
        })
    }
}

impl Default for MousePosition {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks `mousemove` on `target` for every lifetime window of the current
/// scope.
pub fn use_mouse<E, T>(target: &Rc<T>) -> Result<MousePosition, BindError>
where
    E: PagePosition + 'static,
    T: EventTarget<E> + ?Sized + 'static,
{
    let position = MousePosition::new();
    use_event_listener(target, MOUSE_MOVE, position.listener::<E>())?;
    Ok(position)
}

/// Explicitly owned tracker; detaches when dropped.
pub struct PositionTracker<E: 'static> {
    position: MousePosition,
    handle: ListenerHandle<E>,
}

impl<E: PagePosition + 'static> PositionTracker<E> {
    pub fn attach<T>(target: &Rc<T>) -> Result<Self, BindError>
    where
        T: EventTarget<E> + ?Sized + 'static,
    {
        let position = MousePosition::new();
        let handle = bind_scoped_listener(target, MOUSE_MOVE, position.listener::<E>())?;
        Ok(Self { position, handle })
    }

    pub fn position(&self) -> &MousePosition {
        &self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x()
    }

    pub fn y(&self) -> f32 {
        self.position.y()
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_bound()
    }

    /// Stops tracking; the last position stays readable.
    pub fn detach(&self) -> bool {
        self.handle.dispose()
    }
}
