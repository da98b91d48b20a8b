use web_time::Instant;

use crate::Vec2;

pub const MOUSE_MOVE: &str = "mousemove";
pub const MOUSE_DOWN: &str = "mousedown";
pub const MOUSE_UP: &str = "mouseup";
pub const KEY_DOWN: &str = "keydown";
pub const KEY_UP: &str = "keyup";
pub const RESIZE: &str = "resize";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down(PointerButton),
    Up(PointerButton),
    Move,
}

impl PointerEventKind {
    /// The event name this pointer event is dispatched under.
    pub fn event_name(&self) -> &'static str {
        match self {
            PointerEventKind::Down(_) => MOUSE_DOWN,
            PointerEventKind::Up(_) => MOUSE_UP,
            PointerEventKind::Move => MOUSE_MOVE,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win key on Windows
}

/// Pointer payload. `page` is document-relative, `client` viewport-relative.
#[derive(Clone, Debug)]
pub struct MouseEvent {
    pub id: PointerId,
    pub kind: PointerKind,
    pub event: PointerEventKind,
    pub page: Vec2,
    pub client: Vec2,
    pub modifiers: Modifiers,
    pub time_stamp: Instant,
}

impl MouseEvent {
    pub fn moved_to(page: Vec2) -> Self {
        Self {
            id: PointerId(0),
            kind: PointerKind::Mouse,
            event: PointerEventKind::Move,
            page,
            client: page,
            modifiers: Modifiers::default(),
            time_stamp: Instant::now(),
        }
    }

    pub fn with_client(mut self, client: Vec2) -> Self {
        self.client = client;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
}

#[derive(Clone, Debug)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub is_repeat: bool,
}

/// Payloads that carry a document-relative pointer position.
pub trait PagePosition {
    fn page_position(&self) -> Option<Vec2>;
}

impl PagePosition for MouseEvent {
    fn page_position(&self) -> Option<Vec2> {
        Some(self.page)
    }
}

impl PagePosition for Vec2 {
    fn page_position(&self) -> Option<Vec2> {
        Some(*self)
    }
}
