// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end dispatch: scope resolution, unknown commands, recovery, clipboard routing and
//! re-entrancy.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use understory_focus::Direction;
use understory_kernel::{
    Command, Context, DispatchStatus, EffectAction, Kernel, Payload, Reaction, Scope,
    SharedKernel, State,
};
use understory_zone::{Hook, ItemId, ZoneConfig, ZoneDescriptor, ZoneId};

#[derive(Clone, Debug, Default, PartialEq)]
struct App {
    opened: Vec<String>,
    clipboard: Option<String>,
}

fn sidebar_kernel() -> Kernel<App> {
    let mut kernel = Kernel::new(App::default());
    kernel.register_zone(
        "sidebar",
        ZoneDescriptor::new(ZoneConfig::default()).with_items(["a", "b", "c"]),
    );
    kernel
}

fn focused(kernel: &Kernel<App>) -> Option<&str> {
    kernel.state().os.focused_item().map(ItemId::as_str)
}

fn open(tag: &'static str) -> impl Fn(&Context<'_>, &mut State<App>, &Payload) -> Reaction {
    move |_, state, _| {
        state.data.opened.push(tag.to_owned());
        Reaction::none()
    }
}

#[test]
fn sidebar_walk_stops_at_the_last_item() {
    let mut kernel = sidebar_kernel();
    kernel.dispatch(Command::focus("sidebar", "a"));
    assert_eq!(focused(&kernel), Some("a"));
    kernel.dispatch(Command::navigate(Direction::Down));
    kernel.dispatch(Command::navigate(Direction::Down));
    assert_eq!(focused(&kernel), Some("c"));
    kernel.dispatch(Command::navigate(Direction::Down));
    assert_eq!(focused(&kernel), Some("c"));
}

#[test]
fn toggling_twice_restores_an_empty_selection() {
    let mut kernel = Kernel::new(App::default());
    kernel.register_zone(
        "files",
        ZoneDescriptor::new(ZoneConfig::multiselect()).with_items(["a", "b", "c"]),
    );
    kernel.goto("files", None);

    kernel.dispatch(Command::toggle_selection("b"));
    let zone = ZoneId::from("files");
    assert_eq!(
        kernel.state().os.zone(&zone).map(|s| s.selection.clone()),
        Some(vec![ItemId::from("b")])
    );
    kernel.dispatch(Command::toggle_selection("b"));
    assert!(kernel.state().os.zone(&zone).is_some_and(|s| s.selection.is_empty()));
}

#[test]
fn ancestor_handlers_resolve_from_descendants() {
    let mut kernel = Kernel::new(App::default());
    kernel.register_zone(
        "app",
        ZoneDescriptor::new(ZoneConfig::default()).with_items(["toolbar"]),
    );
    kernel.register_zone(
        "list",
        ZoneDescriptor::new(ZoneConfig::default())
            .with_parent("app")
            .with_items(["x"]),
    );
    kernel.register_zone(
        "other",
        ZoneDescriptor::new(ZoneConfig::default()).with_items(["y"]),
    );
    kernel.on(Scope::Zone(ZoneId::from("app")), "OPEN", open("app"));

    kernel.goto("list", None);
    assert_eq!(kernel.dispatch(Command::new("OPEN")), DispatchStatus::Handled);
    assert_eq!(kernel.data().opened, ["app"]);

    // The deepest registration shadows the ancestor's.
    kernel.on(Scope::Zone(ZoneId::from("list")), "OPEN", open("list"));
    kernel.dispatch(Command::new("OPEN"));
    assert_eq!(kernel.data().opened, ["app", "list"]);

    // Global is the fallback; zones off the path are never searched.
    kernel.on(Scope::Global, "OPEN", open("global"));
    kernel.goto("other", None);
    kernel.dispatch(Command::new("OPEN"));
    assert_eq!(kernel.data().opened, ["app", "list", "global"]);
}

#[test]
fn zone_shadows_a_builtin() {
    let mut kernel = sidebar_kernel();
    kernel.on(
        Scope::Zone(ZoneId::from("sidebar")),
        understory_kernel::os::NAVIGATE,
        open("custom"),
    );
    kernel.dispatch(Command::focus("sidebar", "a"));
    kernel.dispatch(Command::navigate(Direction::Down));
    assert_eq!(focused(&kernel), Some("a"));
    assert_eq!(kernel.data().opened, ["custom"]);
}

#[derive(Clone, Debug)]
struct CapturedEvent {
    level: Level,
    fields: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct WarnCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for WarnCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let layer = WarnCapture::default();
    let events = Arc::clone(&layer.events);
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    let out = tracing::subscriber::with_default(subscriber, f);
    let events = events.lock().unwrap().clone();
    (out, events)
}

#[test]
fn unknown_command_warns_once_and_changes_nothing() {
    let mut kernel = sidebar_kernel();
    kernel.dispatch(Command::focus("sidebar", "b"));
    let os_before = kernel.state().os.clone();
    let effects_before = kernel.pending_effects().len();

    let (status, events) = capture(|| kernel.dispatch(Command::new("RENAME_FILE")));

    assert_eq!(status, DispatchStatus::Unresolved);
    let warnings: Vec<_> = events.iter().filter(|e| e.level == Level::WARN).collect();
    assert_eq!(warnings.len(), 1, "expected one warning, got {events:?}");
    assert_eq!(
        warnings[0].fields.get("command").map(String::as_str),
        Some("RENAME_FILE")
    );
    assert_eq!(
        warnings[0].fields.get("scope_chain").map(String::as_str),
        Some("sidebar > global")
    );
    assert_eq!(kernel.state().os, os_before);
    assert_eq!(kernel.data(), &App::default());
    assert_eq!(kernel.pending_effects().len(), effects_before);
    assert!(!kernel.state().history.can_undo());
}

#[test]
fn removing_the_focused_middle_item_focuses_its_successor() {
    let mut kernel = sidebar_kernel();
    kernel.dispatch(Command::focus("sidebar", "b"));
    kernel.set_items("sidebar", ["a", "c"]);
    assert_eq!(focused(&kernel), Some("c"));

    kernel.set_items("sidebar", ["a"]);
    assert_eq!(focused(&kernel), Some("a"));
}

#[test]
fn removing_the_focused_last_item_falls_back_to_the_new_last() {
    let mut kernel = sidebar_kernel();
    kernel.dispatch(Command::focus("sidebar", "c"));
    kernel.set_items("sidebar", ["a", "b"]);
    assert_eq!(focused(&kernel), Some("b"));
    assert_eq!(
        kernel.pending_effects().last().map(|r| r.action),
        Some(EffectAction::Scroll)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    // With `next` recovery the replacement is the item that followed the removed one, or the
    // new last item when the removed one was last.
    #[test]
    fn next_recovery_picks_the_successor(len in 2usize..20, seed in any::<usize>()) {
        let items: Vec<String> = (0..len).map(|i| format!("i{i}")).collect();
        let index = seed % len;
        let mut kernel = Kernel::new(App::default());
        kernel.register_zone(
            "z",
            ZoneDescriptor::new(ZoneConfig::default()).with_items(items.iter().map(String::as_str)),
        );
        kernel.dispatch(Command::focus("z", items[index].as_str()));

        let remaining: Vec<&str> = items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, s)| s.as_str())
            .collect();
        kernel.set_items("z", remaining.iter().copied());

        let expected = remaining[index.min(remaining.len() - 1)];
        prop_assert_eq!(focused(&kernel), Some(expected));
    }
}

#[test]
fn clipboard_routes_through_the_active_zone() {
    let mut kernel = sidebar_kernel();
    kernel.set_zone_callback(&ZoneId::from("sidebar"), Hook::Copy, |cx| {
        cx.item
            .map(|item| Command::new("COPY_NAME").with_target(item.clone()))
    });
    kernel.on(Scope::Global, "COPY_NAME", |_, state, payload| {
        state.data.clipboard = payload
            .item(understory_kernel::keys::TARGET)
            .map(|item| item.as_str().to_owned());
        Reaction::none()
    });

    // Nothing active: ignored without a warning-level miss.
    assert_eq!(kernel.dispatch(Command::copy()), DispatchStatus::Handled);
    assert_eq!(kernel.data().clipboard, None);

    kernel.dispatch(Command::focus("sidebar", "b"));
    kernel.dispatch(Command::copy());
    assert_eq!(kernel.data().clipboard.as_deref(), Some("b"));

    // A native editor keeps its own clipboard.
    kernel.set_host_editing(true);
    kernel.dispatch(Command::focus("sidebar", "c"));
    kernel.dispatch(Command::copy());
    assert_eq!(kernel.data().clipboard.as_deref(), Some("b"));
}

#[test]
fn nested_dispatch_from_a_handler_is_dropped() {
    let shared = SharedKernel::new(sidebar_kernel());
    let inner = shared.clone();
    let nested = Rc::new(Cell::new(None));
    let seen = Rc::clone(&nested);
    shared.with_mut(|kernel| {
        kernel.on(Scope::Global, "OUTER", move |_, state, _| {
            seen.set(Some(inner.dispatch(Command::new("OUTER"))));
            state.data.opened.push("outer".to_owned());
            Reaction::none()
        });
    });

    assert_eq!(shared.dispatch(Command::new("OUTER")), DispatchStatus::Handled);
    assert_eq!(nested.get(), Some(DispatchStatus::Dropped));
    assert_eq!(shared.with(|k| k.data().opened.len()), Some(1));
}
