//! Lifetime windows.
//!
//! A [`Scope`] is owned by whoever decides when a unit is live (an app mount,
//! a test). Setup code runs inside [`Scope::run`] and registers activation
//! hooks; [`Scope::activate`] opens a window and runs them, and
//! [`Scope::deactivate`] closes it by running the cleanups that window produced.
//!
//! Hooks are kept across windows, so `activate -> deactivate -> activate` runs
//! every hook again and produces fresh resources each time.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::Dispose;
use crate::error::BindError;

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeState {
    Inactive,
    Active,
    Disposed,
}

type Hook = Rc<dyn Fn() -> Dispose>;

pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    state: Cell<ScopeState>,
    hooks: RefCell<Vec<Hook>>,
    // cleanups produced by the currently open window
    window: RefCell<Vec<Dispose>>,
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
    children: RefCell<Vec<Scope>>,
    errors: RefCell<Vec<BindError>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                state: Cell::new(ScopeState::Inactive),
                hooks: RefCell::new(Vec::new()),
                window: RefCell::new(Vec::new()),
                disposers: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
                errors: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Runs `f` with this scope as the current one.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<Weak<ScopeInner>>);
        impl Drop for Restore {
            fn drop(&mut self) {
                let prev = self.0.take();
                CURRENT_SCOPE.with(|current| *current.borrow_mut() = prev);
            }
        }

        let prev = CURRENT_SCOPE.with(|current| {
            current
                .borrow_mut()
                .replace(Rc::downgrade(&self.inner))
        });
        let _restore = Restore(prev);
        f()
    }

    pub fn state(&self) -> ScopeState {
        self.inner.state.get()
    }

    pub fn is_active(&self) -> bool {
        self.state() == ScopeState::Active
    }

    /// Registers a hook that runs on every activation; the returned `Dispose`
    /// runs on the matching deactivation. If the window is already open the
    /// hook runs immediately.
    pub fn add_hook(&self, hook: impl Fn() -> Dispose + 'static) {
        if self.state() == ScopeState::Disposed {
            log::warn!("hook registered on a disposed scope; ignoring");
            return;
        }
        let hook: Hook = Rc::new(hook);
        self.inner.hooks.borrow_mut().push(hook.clone());
        if self.is_active() {
            let d = self.run(|| hook());
            self.inner.window.borrow_mut().push(d);
        }
    }

    pub fn hook_count(&self) -> usize {
        self.inner.hooks.borrow().len()
    }

    /// Runs once, when the scope is disposed or dropped.
    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    pub fn child(&self) -> Scope {
        let child = Scope::new();
        self.inner.children.borrow_mut().push(child.clone());
        if self.is_active() {
            child.activate();
        }
        child
    }

    /// Opens a lifetime window: runs all hooks, then activates children.
    pub fn activate(&self) {
        match self.state() {
            ScopeState::Active => {
                log::warn!("scope already active; activate ignored");
                return;
            }
            ScopeState::Disposed => {
                log::warn!("cannot activate a disposed scope");
                return;
            }
            ScopeState::Inactive => {}
        }
        self.inner.state.set(ScopeState::Active);

        // Snapshot: hooks may register more hooks while running.
        let hooks: Vec<Hook> = self.inner.hooks.borrow().clone();
        log::debug!("scope activate: {} hook(s)", hooks.len());
        for hook in hooks {
            let d = self.run(|| hook());
            self.inner.window.borrow_mut().push(d);
        }

        let children: Vec<Scope> = self.inner.children.borrow().clone();
        for child in children {
            child.activate();
        }
    }

    /// Closes the current window. Children first, then this scope's cleanups
    /// in reverse order. A no-op when no window is open.
    pub fn deactivate(&self) {
        if self.state() != ScopeState::Active {
            log::debug!("scope not active; deactivate is a no-op");
            return;
        }

        let children: Vec<Scope> = self.inner.children.borrow().clone();
        for child in children {
            child.deactivate();
        }

        let window = std::mem::take(&mut *self.inner.window.borrow_mut());
        for d in window.into_iter().rev() {
            d.run();
        }
        self.inner.state.set(ScopeState::Inactive);
    }

    pub fn dispose(self) {
        self.deactivate();

        // Dispose children first
        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        for child in children {
            child.dispose();
        }

        // Run disposers
        let disposers = std::mem::take(&mut *self.inner.disposers.borrow_mut());
        for disposer in disposers {
            disposer();
        }
        self.inner.hooks.borrow_mut().clear();
        self.inner.state.set(ScopeState::Disposed);
    }

    pub fn record_error(&self, err: BindError) {
        self.inner.errors.borrow_mut().push(err);
    }

    /// Errors collected from hooks that could not bind, in this scope and
    /// all of its descendants.
    pub fn take_errors(&self) -> Vec<BindError> {
        let mut errors = std::mem::take(&mut *self.inner.errors.borrow_mut());
        let children: Vec<Scope> = self.inner.children.borrow().clone();
        for child in children {
            errors.extend(child.take_errors());
        }
        errors
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("state", &self.state())
            .field("hooks", &self.hook_count())
            .finish()
    }
}

pub fn current_scope() -> Option<Scope> {
    CURRENT_SCOPE.with(|current| {
        current
            .borrow()
            .as_ref()
            .and_then(|weak| weak.upgrade().map(|inner| Scope { inner }))
    })
}

/// Pairs `f` with every lifetime window of the current scope. Returns `false`
/// when called outside a scope.
pub fn on_active(f: impl Fn() -> Dispose + 'static) -> bool {
    match current_scope() {
        Some(scope) => {
            scope.add_hook(f);
            true
        }
        None => {
            log::warn!("on_active called outside a scope; hook dropped");
            false
        }
    }
}

/// Runs `f` each time the current scope is activated.
pub fn on_mounted(f: impl Fn() + 'static) -> bool {
    on_active(move || {
        f();
        Dispose::noop()
    })
}

/// Runs `f` each time the current scope is deactivated.
pub fn on_unmounted(f: impl Fn() + 'static) -> bool {
    let f = Rc::new(f);
    on_active(move || {
        let f = f.clone();
        Dispose::new(move || f())
    })
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            drop(child);
        }

        if self.state.get() == ScopeState::Active {
            let window = std::mem::take(&mut *self.window.borrow_mut());
            for d in window.into_iter().rev() {
                d.run();
            }
        }

        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers {
            disposer();
        }
    }
}
