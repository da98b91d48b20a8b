#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::*;

    /// Minimal target: a flat list of (event, listener) pairs.
    struct Recorder {
        caps: Cell<Capabilities>,
        listeners: RefCell<Vec<(String, Listener<MouseEvent>)>>,
    }

    impl Recorder {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                caps: Cell::new(Capabilities::all()),
                listeners: RefCell::new(Vec::new()),
            })
        }

        fn emit(&self, event: &str, payload: &MouseEvent) {
            let snapshot: Vec<Listener<MouseEvent>> = self
                .listeners
                .borrow()
                .iter()
                .filter(|(e, _)| e == event)
                .map(|(_, l)| l.clone())
                .collect();
            for l in snapshot {
                l.call(payload);
            }
        }
    }

    impl EventTarget<MouseEvent> for Recorder {
        fn capabilities(&self) -> Capabilities {
            self.caps.get()
        }

        fn add_listener(
            &self,
            event: &str,
            listener: &Listener<MouseEvent>,
        ) -> Result<bool, BindError> {
            if self.has_listener(event, listener) {
                return Ok(false);
            }
            self.listeners
                .borrow_mut()
                .push((event.to_string(), listener.clone()));
            Ok(true)
        }

        fn remove_listener(&self, event: &str, listener: &Listener<MouseEvent>) -> bool {
            let mut ls = self.listeners.borrow_mut();
            let before = ls.len();
            ls.retain(|(e, l)| !(e == event && l.ptr_eq(listener)));
            ls.len() != before
        }

        fn has_listener(&self, event: &str, listener: &Listener<MouseEvent>) -> bool {
            self.listeners
                .borrow()
                .iter()
                .any(|(e, l)| e == event && l.ptr_eq(listener))
        }

        fn listener_count(&self, event: &str) -> usize {
            self.listeners
                .borrow()
                .iter()
                .filter(|(e, _)| e == event)
                .count()
        }
    }

    fn moved(x: f32, y: f32) -> MouseEvent {
        MouseEvent::moved_to(Vec2::new(x, y))
    }

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let id = {
            let seen = seen.clone();
            sig.subscribe(move |v| seen.borrow_mut().push(*v))
        };

        sig.set(42);
        assert!(sig.unsubscribe(id));
        assert!(!sig.unsubscribe(id));
        sig.set(7);

        assert_eq!(*seen.borrow(), vec![42]);
        assert_eq!(sig.subscriber_count(), 0);
    }

    #[test]
    fn test_signal_subscriber_can_write_back() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let clamp = sig.clone();
            let seen = seen.clone();
            sig.subscribe(move |v| {
                seen.borrow_mut().push(*v);
                if *v > 5 {
                    clamp.set(5);
                }
            });
        }

        sig.set(10);
        assert_eq!(sig.get(), 5);
        assert_eq!(*seen.borrow(), vec![10, 5]);
    }

    #[test]
    fn test_dispose_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let d = {
            let runs = runs.clone();
            Dispose::new(move || runs.set(runs.get() + 1))
        };
        let d2 = d.clone();
        d.run();
        d2.run();
        assert_eq!(runs.get(), 1);
        assert!(d.is_spent());
    }

    #[test]
    fn test_effects_clean_up_with_scope() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let scope = Scope::new();
        scope.run(|| {
            let l = log.clone();
            effect(move || {
                l.borrow_mut().push("effect");
                let l = l.clone();
                on_deactivate(move || l.borrow_mut().push("effect cleanup"))
            });
        });

        assert_eq!(*log.borrow(), vec!["effect"]);
        scope.dispose();
        assert_eq!(*log.borrow(), vec!["effect", "effect cleanup"]);
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(Cell::new(false));

        let scope = Scope::new();
        {
            let cleaned_up = cleaned_up.clone();
            scope.add_disposer(move || cleaned_up.set(true));
        }

        assert!(!cleaned_up.get());
        scope.dispose();
        assert!(cleaned_up.get());
    }

    #[test]
    fn test_scope_window_hooks_pair_up() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let scope = Scope::new();
        scope.run(|| {
            let log = log.clone();
            on_active(move || {
                log.borrow_mut().push("on");
                let log = log.clone();
                on_deactivate(move || log.borrow_mut().push("off"))
            })
        });

        assert!(log.borrow().is_empty());
        scope.activate();
        scope.activate(); // ignored
        scope.deactivate();
        scope.deactivate(); // no-op
        scope.activate();
        scope.deactivate();

        assert_eq!(*log.borrow(), vec!["on", "off", "on", "off"]);
    }

    #[test]
    fn test_mounted_unmounted_hooks() {
        let mounted = Rc::new(Cell::new(0));
        let unmounted = Rc::new(Cell::new(0));
        let scope = Scope::new();
        scope.run(|| {
            let m = mounted.clone();
            assert!(on_mounted(move || m.set(m.get() + 1)));
            let u = unmounted.clone();
            assert!(on_unmounted(move || u.set(u.get() + 1)));
        });

        scope.activate();
        assert_eq!((mounted.get(), unmounted.get()), (1, 0));
        scope.deactivate();
        assert_eq!((mounted.get(), unmounted.get()), (1, 1));
    }

    #[test]
    fn test_hooks_outside_scope_are_rejected() {
        assert!(!on_mounted(|| {}));
        assert!(current_scope().is_none());
    }

    #[test]
    fn test_child_scope_follows_parent() {
        let parent = Scope::new();
        let child = parent.child();
        let hits = Rc::new(Cell::new(0));
        child.run(|| {
            let hits = hits.clone();
            on_mounted(move || hits.set(hits.get() + 1));
        });

        parent.activate();
        assert!(child.is_active());
        assert_eq!(hits.get(), 1);

        parent.deactivate();
        assert!(!child.is_active());

        parent.dispose();
        assert_eq!(child.state(), ScopeState::Disposed);
    }

    #[test]
    fn test_bind_registers_exactly_once() {
        let target = Recorder::new();
        let handle = bind_scoped_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}).unwrap();

        assert_eq!(target.listener_count(MOUSE_MOVE), 1);
        assert!(target.has_listener(MOUSE_MOVE, handle.listener()));
        assert!(handle.is_bound());
    }

    #[test]
    fn test_dispose_removes_and_is_idempotent() {
        let target = Recorder::new();
        let handle = bind_scoped_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}).unwrap();

        assert!(handle.dispose());
        assert_eq!(target.listener_count(MOUSE_MOVE), 0);
        assert!(!handle.dispose());
        assert_eq!(target.listener_count(MOUSE_MOVE), 0);
    }

    #[test]
    fn test_drop_unbinds() {
        let target = Recorder::new();
        {
            let _handle =
                bind_scoped_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}).unwrap();
            assert_eq!(target.listener_count(MOUSE_MOVE), 1);
        }
        assert_eq!(target.listener_count(MOUSE_MOVE), 0);
    }

    #[test]
    fn test_forget_keeps_registration() {
        let target = Recorder::new();
        let handle = bind_scoped_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}).unwrap();
        handle.forget();
        assert_eq!(target.listener_count(MOUSE_MOVE), 1);
    }

    #[test]
    fn test_equivalent_closure_does_not_remove() {
        let target = Recorder::new();
        let _handle = bind_scoped_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}).unwrap();

        let lookalike: Listener<MouseEvent> = Listener::new(|_: &MouseEvent| {});
        assert!(!target.remove_listener(MOUSE_MOVE, &lookalike));
        assert_eq!(target.listener_count(MOUSE_MOVE), 1);
    }

    #[test]
    fn test_same_listener_twice_is_rejected() {
        let target = Recorder::new();
        let listener: Listener<MouseEvent> = Listener::new(|_: &MouseEvent| {});
        let _first = bind_scoped_listener(&target, MOUSE_MOVE, listener.clone()).unwrap();

        let err = bind_scoped_listener(&target, MOUSE_MOVE, listener).unwrap_err();
        assert_eq!(
            err,
            BindError::AlreadyBound {
                event: MOUSE_MOVE.to_string()
            }
        );
        assert_eq!(target.listener_count(MOUSE_MOVE), 1);
    }

    #[test]
    fn test_empty_event_name() {
        let target = Recorder::new();
        let err = bind_scoped_listener(&target, "", |_: &MouseEvent| {}).unwrap_err();
        assert_eq!(err, BindError::EmptyEventName);
    }

    #[test]
    fn test_missing_capability_strict_and_lenient() {
        let target = Recorder::new();
        target.caps.set(Capabilities::ADD_LISTENER);

        let err = bind_scoped_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}).unwrap_err();
        assert_eq!(
            err,
            BindError::MissingCapability {
                event: MOUSE_MOVE.to_string(),
                missing: Capabilities::REMOVE_LISTENER,
            }
        );

        let handle = bind_with_policy(
            &target,
            MOUSE_MOVE,
            |_: &MouseEvent| {},
            BindPolicy::Lenient,
        )
        .unwrap();
        assert!(!handle.is_bound());
        assert_eq!(target.listener_count(MOUSE_MOVE), 0);
    }

    #[test]
    fn test_dispose_after_target_dropped() {
        let target = Recorder::new();
        let handle = bind_scoped_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}).unwrap();
        drop(target);
        assert!(!handle.dispose());
    }

    #[test]
    fn test_use_event_listener_follows_windows() {
        let target = Recorder::new();
        let scope = Scope::new();
        let hits = Rc::new(Cell::new(0));

        scope
            .run(|| {
                let hits = hits.clone();
                use_event_listener(&target, MOUSE_MOVE, move |_: &MouseEvent| {
                    hits.set(hits.get() + 1)
                })
            })
            .unwrap();

        assert_eq!(target.listener_count(MOUSE_MOVE), 0);

        scope.activate();
        assert_eq!(target.listener_count(MOUSE_MOVE), 1);
        target.emit(MOUSE_MOVE, &moved(1.0, 1.0));
        assert_eq!(hits.get(), 1);

        scope.deactivate();
        assert_eq!(target.listener_count(MOUSE_MOVE), 0);
        scope.deactivate();
        assert_eq!(target.listener_count(MOUSE_MOVE), 0);

        // rebind: exactly one registration, not two
        scope.activate();
        assert_eq!(target.listener_count(MOUSE_MOVE), 1);
        target.emit(MOUSE_MOVE, &moved(2.0, 2.0));
        assert_eq!(hits.get(), 2);

        scope.dispose();
        assert_eq!(target.listener_count(MOUSE_MOVE), 0);
    }

    #[test]
    fn test_use_event_listener_needs_scope() {
        let target = Recorder::new();
        let err = use_event_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}).unwrap_err();
        assert_eq!(err, BindError::NoActiveScope);
    }

    #[test]
    fn test_use_event_listener_records_strict_failures() {
        let target = Recorder::new();
        target.caps.set(Capabilities::empty());
        let scope = Scope::new();
        scope
            .run(|| use_event_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}))
            .unwrap();

        scope.activate();
        let errors = scope.take_errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], BindError::MissingCapability { .. }));

        let lenient = Scope::new();
        with_bind_policy(BindPolicy::Lenient, || {
            lenient.run(|| use_event_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}))
        })
        .unwrap();
        lenient.activate();
        assert!(lenient.take_errors().is_empty());
    }

    #[test]
    fn test_take_errors_collects_from_children() {
        let target = Recorder::new();
        target.caps.set(Capabilities::empty());
        let parent = Scope::new();
        let child = parent.child();
        child
            .run(|| use_event_listener(&target, MOUSE_MOVE, |_: &MouseEvent| {}))
            .unwrap();

        parent.activate();
        let errors = parent.take_errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], BindError::MissingCapability { .. }));
        assert!(child.take_errors().is_empty());
    }

    #[test]
    fn test_position_tracker_updates_synchronously() {
        let target = Recorder::new();
        let tracker = PositionTracker::<MouseEvent>::attach(&target).unwrap();
        assert_eq!((tracker.x(), tracker.y()), (0.0, 0.0));

        let observed = Rc::new(RefCell::new(Vec::new()));
        {
            let observed = observed.clone();
            tracker
                .position()
                .subscribe(move |p| observed.borrow_mut().push((p.x, p.y)));
        }

        target.emit(MOUSE_MOVE, &moved(10.0, 20.0));
        assert_eq!((tracker.x(), tracker.y()), (10.0, 20.0));
        // one notification carrying both coordinates
        assert_eq!(*observed.borrow(), vec![(10.0, 20.0)]);

        assert!(tracker.detach());
        target.emit(MOUSE_MOVE, &moved(99.0, 99.0));
        assert_eq!(tracker.position().get(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_use_mouse_in_scope() {
        let target = Recorder::new();
        let scope = Scope::new();
        let mouse = scope.run(|| use_mouse::<MouseEvent, _>(&target)).unwrap();

        target.emit(MOUSE_MOVE, &moved(5.0, 5.0));
        assert_eq!(mouse.get(), Vec2::ZERO);

        scope.activate();
        target.emit(MOUSE_MOVE, &moved(10.0, 20.0));
        assert_eq!((mouse.x(), mouse.y()), (10.0, 20.0));

        scope.deactivate();
        assert_eq!(target.listener_count(MOUSE_MOVE), 0);
    }
}
