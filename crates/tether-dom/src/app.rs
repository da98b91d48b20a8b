//! # Apps
//!
//! An [`App`] pairs a root [`Component`] with plugins and config. Mounting
//! runs the root's setup inside a fresh [`Scope`], then opens its lifetime
//! window. The returned [`MountHandle`] owns that scope; unmounting (or
//! dropping the handle) closes the window and disposes it.
//!
//! ```rust
//! use tether_core::*;
//! use tether_dom::*;
//!
//! let doc = Document::new();
//! let host = doc.create_element("div");
//! doc.set_id(host, "app").unwrap();
//! doc.append_child(doc.body(), host).unwrap();
//!
//! let window = Window::new(Size { width: 800.0, height: 600.0 });
//! let root = {
//!     let window = window.clone();
//!     move |_cx: &SetupContext| -> Result<(), AppError> {
//!         let mouse = use_mouse::<DomEvent, _>(&window)?;
//!         on_unmounted(move || log::info!("last position {:?}", mouse.get()));
//!         Ok(())
//!     }
//! };
//!
//! let handle = create_app(root).mount(&doc, "#app").unwrap();
//! window.pointer_move(Vec2::new(10.0, 20.0));
//! handle.unmount();
//! ```

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tether_core::{BindError, BindPolicy, Scope, with_bind_policy};

use crate::config::AppConfig;
use crate::document::{Document, NodeId};
use crate::error::AppError;
use crate::hub::EventHub;
use crate::window::DomEvent;

/// A unit whose setup registers hooks on the current scope.
pub trait Component: 'static {
    fn setup(&self, cx: &SetupContext) -> Result<(), AppError>;
}

impl<F> Component for F
where
    F: Fn(&SetupContext) -> Result<(), AppError> + 'static,
{
    fn setup(&self, cx: &SetupContext) -> Result<(), AppError> {
        self(cx)
    }
}

/// Extends an app before it mounts.
pub trait Plugin: 'static {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn install(&self, cx: &mut AppContext);
}

/// Values shared by every component of one app.
#[derive(Clone, Default)]
pub struct AppContext {
    provided: HashMap<TypeId, Rc<dyn Any>>,
    config: AppConfig,
    plugins: Vec<&'static str>,
}

impl AppContext {
    /// Makes `value` injectable; returns the value it replaced, if any.
    pub fn provide<T: 'static>(&mut self, value: T) -> Option<Rc<T>> {
        self.provide_rc(Rc::new(value))
    }

    pub fn provide_rc<T: 'static>(&mut self, value: Rc<T>) -> Option<Rc<T>> {
        let prev = self.provided.insert(TypeId::of::<T>(), value)?;
        log::warn!(
            "provide: {} was already provided; replacing",
            std::any::type_name::<T>()
        );
        prev.downcast::<T>().ok()
    }

    pub fn inject<T: 'static>(&self) -> Option<Rc<T>> {
        self.provided.get(&TypeId::of::<T>())?.clone().downcast::<T>().ok()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Names of installed plugins, in install order.
    pub fn plugins(&self) -> &[&'static str] {
        &self.plugins
    }
}

/// What a component sees during setup.
#[derive(Clone)]
pub struct SetupContext {
    app: Rc<AppContext>,
    document: Rc<Document>,
    host: NodeId,
    scope: Scope,
}

impl SetupContext {
    pub fn inject<T: 'static>(&self) -> Option<Rc<T>> {
        self.app.inject::<T>()
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    pub fn document(&self) -> &Rc<Document> {
        &self.document
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// Listener list of the host element.
    pub fn host_target(&self) -> Option<Rc<EventHub<DomEvent>>> {
        self.document.target(self.host)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Sets up `child` in a child scope; it is activated and deactivated with
    /// this component.
    pub fn mount_child(&self, child: &dyn Component) -> Result<(), AppError> {
        let scope = self.scope.child();
        let cx = SetupContext {
            scope: scope.clone(),
            ..self.clone()
        };
        scope.run(|| child.setup(&cx))
    }
}

pub struct App {
    root: Rc<dyn Component>,
    cx: AppContext,
    installed: HashSet<TypeId>,
    mounted: Rc<Cell<bool>>,
}

pub fn create_app(root: impl Component) -> App {
    App {
        root: Rc::new(root),
        cx: AppContext::default(),
        installed: HashSet::new(),
        mounted: Rc::new(Cell::new(false)),
    }
}

impl App {
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.cx.config = config;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.cx.config
    }

    pub fn context(&self) -> &AppContext {
        &self.cx
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Installs `plugin` once; a second plugin of the same type is skipped.
    pub fn use_plugin<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        if !self.installed.insert(TypeId::of::<P>()) {
            log::warn!("plugin {} already installed; skipping", plugin.name());
            return self;
        }
        plugin.install(&mut self.cx);
        self.cx.plugins.push(plugin.name());
        log::debug!("installed plugin {}", plugin.name());
        self
    }

    pub fn mount_default(&mut self, document: &Rc<Document>) -> Result<MountHandle, AppError> {
        let selector = self.cx.config.mount_selector.clone();
        self.mount(document, &selector)
    }

    /// Runs the root's setup and opens its first lifetime window on the
    /// element matching `selector`.
    pub fn mount(
        &mut self,
        document: &Rc<Document>,
        selector: &str,
    ) -> Result<MountHandle, AppError> {
        if self.mounted.get() {
            return Err(AppError::AlreadyMounted);
        }
        let host = document
            .query(selector)
            .ok_or_else(|| AppError::HostNotFound {
                selector: selector.to_string(),
            })?;
        if !document.claim_host(host) {
            return Err(AppError::HostOccupied {
                selector: selector.to_string(),
            });
        }

        let policy = self.cx.config.bind_policy;
        let scope = Scope::new();
        let cx = SetupContext {
            app: Rc::new(self.cx.clone()),
            document: document.clone(),
            host,
            scope: scope.clone(),
        };

        let setup = with_bind_policy(policy, || scope.run(|| self.root.setup(&cx)));
        if let Err(err) = setup {
            scope.dispose();
            document.release_host(host);
            return Err(err);
        }

        let mut handle = MountHandle {
            scope: Some(scope),
            document: document.clone(),
            host,
            policy,
            mounted: self.mounted.clone(),
        };
        self.mounted.set(true);
        handle.resume()?;
        log::info!("app mounted on '{selector}'");
        Ok(handle)
    }
}

/// Owns a mounted app's scope.
pub struct MountHandle {
    scope: Option<Scope>,
    document: Rc<Document>,
    host: NodeId,
    policy: BindPolicy,
    mounted: Rc<Cell<bool>>,
}

impl std::fmt::Debug for MountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountHandle")
            .field("host", &self.host)
            .field("mounted", &self.mounted.get())
            .finish_non_exhaustive()
    }
}

impl MountHandle {
    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn is_active(&self) -> bool {
        self.scope.as_ref().is_some_and(Scope::is_active)
    }

    /// Closes the current lifetime window without tearing the app down.
    pub fn suspend(&self) {
        if let Some(scope) = &self.scope {
            scope.deactivate();
        }
    }

    /// Opens a new lifetime window. Under [`BindPolicy::Strict`] a binding
    /// that fails during activation closes the window again and is returned.
    pub fn resume(&mut self) -> Result<(), AppError> {
        let Some(scope) = &self.scope else {
            return Ok(());
        };
        with_bind_policy(self.policy, || scope.activate());

        let errors: Vec<BindError> = scope.take_errors();
        if self.policy == BindPolicy::Strict
            && let Some(first) = errors.into_iter().next()
        {
            self.unmount_in_place();
            return Err(first.into());
        }
        Ok(())
    }

    pub fn unmount(mut self) {
        self.unmount_in_place();
    }

    fn unmount_in_place(&mut self) {
        if let Some(scope) = self.scope.take() {
            scope.dispose();
            self.document.release_host(self.host);
            self.mounted.set(false);
            log::info!("app unmounted");
        }
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.unmount_in_place();
    }
}
