use std::cell::Cell;
use std::rc::Rc;

use tether_core::{
    BindError, Capabilities, EventTarget, KEY_DOWN, Key, KeyEvent, Listener, Modifiers,
    MouseEvent, PagePosition, RESIZE, Size, Vec2,
};

use crate::hub::EventHub;

/// Payload delivered by window and element targets.
#[derive(Clone, Debug)]
pub enum DomEvent {
    Mouse(MouseEvent),
    Key(KeyEvent),
    Resize(Size),
}

impl PagePosition for DomEvent {
    fn page_position(&self) -> Option<Vec2> {
        match self {
            DomEvent::Mouse(m) => Some(m.page),
            _ => None,
        }
    }
}

/// The top-level target. Closing it withdraws the ability to bind new
/// listeners; existing registrations can still be removed.
pub struct Window {
    hub: EventHub<DomEvent>,
    size: Cell<Size>,
    scroll: Cell<Vec2>,
    closed: Cell<bool>,
}

impl Window {
    pub fn new(size: Size) -> Rc<Self> {
        Rc::new(Self {
            hub: EventHub::new(),
            size: Cell::new(size),
            scroll: Cell::new(Vec2::ZERO),
            closed: Cell::new(false),
        })
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    pub fn scroll_offset(&self) -> Vec2 {
        self.scroll.get()
    }

    pub fn scroll_to(&self, offset: Vec2) {
        self.scroll.set(offset);
    }

    pub fn dispatch(&self, event: &str, payload: &DomEvent) -> usize {
        if self.closed.get() {
            log::debug!("window closed; dropping '{event}'");
            return 0;
        }
        self.hub.dispatch(event, payload)
    }

    /// Delivers a pointer event at viewport position `client`; the page
    /// position adds the current scroll offset.
    pub fn pointer(&self, mut ev: MouseEvent, client: Vec2) -> usize {
        let scroll = self.scroll.get();
        ev.client = client;
        ev.page = Vec2::new(client.x + scroll.x, client.y + scroll.y);
        let name = ev.event.event_name();
        self.dispatch(name, &DomEvent::Mouse(ev))
    }

    pub fn pointer_move(&self, client: Vec2) -> usize {
        self.pointer(MouseEvent::moved_to(client), client)
    }

    pub fn key_down(&self, key: Key) -> usize {
        self.dispatch(
            KEY_DOWN,
            &DomEvent::Key(KeyEvent {
                key,
                modifiers: Modifiers::default(),
                is_repeat: false,
            }),
        )
    }

    pub fn resize(&self, size: Size) -> usize {
        self.size.set(size);
        self.dispatch(RESIZE, &DomEvent::Resize(size))
    }

    pub fn close(&self) {
        self.closed.set(true);
        self.hub.set_capabilities(Capabilities::REMOVE_LISTENER);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn total_listeners(&self) -> usize {
        self.hub.total_listeners()
    }
}

impl EventTarget<DomEvent> for Window {
    fn capabilities(&self) -> Capabilities {
        self.hub.capabilities()
    }

    fn add_listener(&self, event: &str, listener: &Listener<DomEvent>) -> Result<bool, BindError> {
        self.hub.add_listener(event, listener)
    }

    fn remove_listener(&self, event: &str, listener: &Listener<DomEvent>) -> bool {
        self.hub.remove_listener(event, listener)
    }

    fn has_listener(&self, event: &str, listener: &Listener<DomEvent>) -> bool {
        self.hub.has_listener(event, listener)
    }

    fn listener_count(&self, event: &str) -> usize {
        self.hub.listener_count(event)
    }
}
