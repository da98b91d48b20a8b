pub use crate::effects::{Dispose, effect, on_deactivate};
pub use crate::error::BindError;
pub use crate::event::{Capabilities, EventTarget, Listener};
pub use crate::geometry::{Size, Vec2};
pub use crate::input::{
    KEY_DOWN, KEY_UP, Key, KeyEvent, MOUSE_DOWN, MOUSE_MOVE, MOUSE_UP, Modifiers, MouseEvent,
    PagePosition, PointerButton, PointerEventKind, PointerId, PointerKind, RESIZE,
};
pub use crate::listener::{
    BindPolicy, ListenerHandle, bind_policy, bind_scoped_listener, bind_with_policy,
    use_event_listener, with_bind_policy,
};
pub use crate::mouse::{MousePosition, PositionTracker, use_mouse};
pub use crate::scope::{Scope, ScopeState, current_scope, on_active, on_mounted, on_unmounted};
pub use crate::signal::{Signal, SubId, signal};
