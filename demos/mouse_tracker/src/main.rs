use std::rc::Rc;

use tether_core::prelude::*;
use tether_dom::*;

/// Shared click counter handed to components through the app context.
#[derive(Clone)]
struct Clicks(Signal<u32>);

struct ClicksPlugin;

impl Plugin for ClicksPlugin {
    fn install(&self, cx: &mut AppContext) {
        cx.provide(Clicks(signal(0)));
    }
}

fn tracker_app(window: &Rc<Window>) -> impl Component + use<> {
    let window = window.clone();
    move |cx: &SetupContext| -> Result<(), AppError> {
        let mouse = use_mouse::<DomEvent, _>(&window)?;
        mouse.subscribe(|p| log::info!("mouse at ({}, {})", p.x, p.y));

        if let Some(clicks) = cx.inject::<Clicks>() {
            use_event_listener(&window, MOUSE_DOWN, move |_: &DomEvent| {
                clicks.0.update(|n| *n += 1);
            })?;
        }

        on_unmounted(move || log::info!("tracker stopped at {:?}", mouse.get()));
        Ok(())
    }
}

fn greeter_app(name: &'static str) -> impl Component {
    move |cx: &SetupContext| -> Result<(), AppError> {
        let host = cx.host();
        on_mounted(move || log::info!("{name} mounted on {host:?}"));
        on_unmounted(move || log::info!("{name} unmounted"));
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let window = Window::new(Size {
        width: 1280.0,
        height: 800.0,
    });
    let doc = Document::new();

    let app_host = doc.create_element("div");
    doc.set_id(app_host, "app")?;
    doc.append_child(doc.body(), app_host)?;

    // Nested hosts, one app each.
    let mut parent = doc.body();
    for tag in ["div1", "div2", "div3"] {
        let node = doc.create_element(tag);
        parent = doc.append_child(parent, node)?;
    }

    let config = AppConfig::from_json_str(r##"{ "mount_selector": "#app" }"##)?;
    let mut app = create_app(tracker_app(&window)).with_config(config);
    app.use_plugin(ClicksPlugin);
    let tracker = app.mount_default(&doc)?;

    let greeters = ["div1", "div2", "div3"]
        .into_iter()
        .map(|sel| create_app(greeter_app(sel)).mount(&doc, sel))
        .collect::<Result<Vec<_>, _>>()?;

    for (x, y) in [(10.0, 20.0), (120.0, 45.5), (640.0, 400.0)] {
        window.pointer_move(Vec2::new(x, y));
    }
    window.scroll_to(Vec2::new(0.0, 300.0));
    window.pointer_move(Vec2::new(5.0, 5.0));

    let press = MouseEvent {
        event: PointerEventKind::Down(PointerButton::Primary),
        ..MouseEvent::moved_to(Vec2::ZERO)
    };
    window.pointer(press, Vec2::new(5.0, 5.0));

    if let Some(clicks) = app.context().inject::<Clicks>() {
        log::info!("clicks so far: {}", clicks.0.get());
    }

    drop(greeters);
    tracker.unmount();
    log::info!(
        "listeners left on window after unmount: {}",
        window.total_listeners()
    );
    Ok(())
}
