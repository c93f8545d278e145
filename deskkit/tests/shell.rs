//! Tests for the responsive shell.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use deskkit::shell::{
    Activation, Align, Close, Content, DeviceClass, FixedDevice, ItemProps, Outline,
    OutlineNode, Primitive, ShellError, ShellRoot, Trigger, Viewport, ViewportConfig,
};

fn desktop() -> Arc<FixedDevice> {
    Arc::new(FixedDevice(DeviceClass::Desktop))
}

fn mobile() -> Arc<FixedDevice> {
    Arc::new(FixedDevice(DeviceClass::Mobile))
}

#[test]
fn test_trigger_follows_device_class() {
    for (device, expected) in [
        (desktop(), Primitive::DropdownMenu),
        (mobile(), Primitive::BottomSheet),
    ] {
        let menu = ShellRoot::menu(device);
        let scope = menu.scope();
        let _item = scope.register(ItemProps::new("edit", "Edit")).unwrap();

        let node = Trigger::new(&scope, "Actions")
            .render(&Outline)
            .unwrap()
            .unwrap();
        assert_eq!(node.primitive(), expected);
    }
}

#[test]
fn test_content_items_match_across_devices() {
    let items = |device: Arc<FixedDevice>| {
        let menu = ShellRoot::menu(device);
        let scope = menu.scope();
        let _edit = scope.register(ItemProps::new("edit", "Edit")).unwrap();
        let _hidden = scope
            .register(ItemProps::new("archive", "Archive").hidden(true))
            .unwrap();
        let _delete = scope
            .register(ItemProps::new("delete", "Delete").destructive())
            .unwrap();
        menu.open();
        let view = Content::new(&scope).view().unwrap().unwrap();
        view.items
            .into_iter()
            .map(|item| (item.value, item.label, item.variant))
            .collect::<Vec<_>>()
    };

    let on_desktop = items(desktop());
    assert_eq!(on_desktop.len(), 2);
    assert_eq!(on_desktop, items(mobile()));
}

#[test]
fn test_viewport_resize_switches_presentation() {
    let viewport = Viewport::new(ViewportConfig::default(), 1280);
    let dialog = ShellRoot::dialog(Arc::new(viewport.clone())).title("Edit customer");
    let scope = dialog.scope();
    dialog.open();

    let content = Content::new(&scope);
    assert_eq!(content.view().unwrap().unwrap().primitive, Primitive::Modal);

    viewport.set_width(390);
    assert_eq!(content.view().unwrap().unwrap().primitive, Primitive::Drawer);
    assert!(dialog.is_open());
}

#[test]
fn test_empty_menu_renders_no_trigger() {
    let menu = ShellRoot::menu(desktop());
    let scope = menu.scope();
    let trigger = Trigger::new(&scope, "Actions");

    assert!(trigger.render(&Outline).unwrap().is_none());
    assert!(!trigger.click().unwrap());
    assert!(!menu.is_open());

    let hidden = scope
        .register(ItemProps::new("refund", "Refund").hidden(true))
        .unwrap();
    assert!(trigger.view().unwrap().is_none());

    hidden.set_hidden(false).unwrap();
    assert!(trigger.view().unwrap().is_some());
}

#[test]
fn test_dropping_handle_unregisters_item() {
    let menu = ShellRoot::menu(mobile());
    let scope = menu.scope();
    let edit = scope.register(ItemProps::new("edit", "Edit")).unwrap();
    let refund = scope.register(ItemProps::new("refund", "Refund")).unwrap();
    assert_ne!(edit.id(), refund.id());
    assert_eq!(menu.registered_items(), 2);

    drop(refund);
    assert_eq!(menu.registered_items(), 1);
    assert_eq!(Content::new(&scope).items().unwrap(), ["edit"]);

    drop(edit);
    assert!(Trigger::new(&scope, "Actions").view().unwrap().is_none());
}

#[test]
fn test_update_keeps_position() {
    let menu = ShellRoot::menu(desktop());
    let scope = menu.scope();
    let first = scope.register(ItemProps::new("edit", "Edit")).unwrap();
    let _second = scope.register(ItemProps::new("print", "Print")).unwrap();

    first
        .update(ItemProps::new("edit", "Edit details"))
        .unwrap();
    menu.open();

    let view = Content::new(&scope).view().unwrap().unwrap();
    assert_eq!(view.items[0].label, "Edit details");
    assert_eq!(view.items[1].value, "print");
}

#[test]
fn test_select_toggles_off_current_value() {
    for device in [desktop(), mobile()] {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        let select = ShellRoot::select(device)
            .placeholder("Choose a status")
            .on_change(move |value| sink.lock().unwrap().push(value.map(str::to_string)));
        let scope = select.scope();
        let _active = scope.register(ItemProps::new("active", "Active")).unwrap();
        let _paused = scope.register(ItemProps::new("paused", "Paused")).unwrap();
        let content = Content::new(&scope);
        let trigger = Trigger::new(&scope, "Status");

        assert_eq!(trigger.view().unwrap().unwrap().label, "Choose a status");

        trigger.click().unwrap();
        assert_eq!(
            content.activate("paused").unwrap(),
            Activation::Selected("paused".into())
        );
        assert!(!select.is_open());
        assert_eq!(trigger.view().unwrap().unwrap().label, "Paused");

        trigger.click().unwrap();
        assert_eq!(content.activate("paused").unwrap(), Activation::Cleared);
        assert_eq!(select.selected(), None);
        assert!(!select.is_open());

        assert_eq!(
            *changes.lock().unwrap(),
            [Some("paused".to_string()), None]
        );
    }
}

#[test]
fn test_menu_activation_runs_action_and_closes() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let menu = ShellRoot::menu(mobile());
    let scope = menu.scope();
    let _refund = scope
        .register(
            ItemProps::new("refund", "Refund")
                .destructive()
                .on_select(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        )
        .unwrap();
    let _locked = scope
        .register(ItemProps::new("void", "Void").disabled(true))
        .unwrap();
    let content = Content::new(&scope).align(Align::End);

    menu.open();
    assert_eq!(content.activate("void").unwrap(), Activation::Ignored);
    assert!(menu.is_open());

    assert_eq!(
        content.activate("refund").unwrap(),
        Activation::Selected("refund".into())
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(!menu.is_open());

    assert_eq!(
        content.activate("missing"),
        Err(ShellError::UnknownItem("missing".into()))
    );
}

#[test]
fn test_close_forwards_click_and_closes() {
    for device in [desktop(), mobile()] {
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&clicks);
        let dialog = ShellRoot::dialog(device).title("Delete driver");
        let scope = dialog.scope();
        let close = Close::new(&scope, "Cancel").on_click(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        dialog.open();
        assert!(close.click().unwrap());
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert!(!dialog.is_open());

        // Clicking while closed still forwards the handler.
        assert!(!close.click().unwrap());
        assert_eq!(clicks.load(Ordering::SeqCst), 2);
    }
}

#[test]
fn test_disabled_shell_does_not_open() {
    let opened = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&opened);
    let dialog = ShellRoot::dialog(desktop())
        .disabled(true)
        .on_open_change(move |open| sink.lock().unwrap().push(open));
    let scope = dialog.scope();
    let trigger = Trigger::new(&scope, "Edit");

    assert!(trigger.view().unwrap().unwrap().disabled);
    assert!(!trigger.click().unwrap());
    assert!(!dialog.open());

    dialog.set_disabled(false);
    assert!(trigger.click().unwrap());
    dialog.set_disabled(true);
    assert!(!dialog.is_open());
    assert_eq!(*opened.lock().unwrap(), [true, false]);
}

#[test]
fn test_parts_fail_outside_root() {
    let dialog = ShellRoot::dialog(desktop());
    let scope = dialog.scope();
    let trigger = Trigger::new(&scope, "Edit");
    let content = Content::new(&scope);
    let close = Close::new(&scope, "Cancel");
    drop(dialog);

    assert!(!scope.is_attached());
    assert_eq!(
        trigger.render(&Outline).err(),
        Some(ShellError::OutsideRoot { component: "Trigger" })
    );
    assert_eq!(
        content.view().err(),
        Some(ShellError::OutsideRoot { component: "Content" })
    );
    assert_eq!(
        close.click().err(),
        Some(ShellError::OutsideRoot { component: "Close" })
    );
    assert!(matches!(
        scope.register(ItemProps::new("edit", "Edit")),
        Err(ShellError::OutsideRoot { .. })
    ));
}

#[test]
fn test_handle_outliving_root_drops_quietly() {
    let menu = ShellRoot::menu(desktop());
    let handle = menu.scope().register(ItemProps::new("edit", "Edit")).unwrap();
    drop(menu);

    assert!(handle.set_hidden(true).is_err());
    drop(handle);
}

#[test]
fn test_outline_shows_dialog_chrome() {
    let dialog = ShellRoot::dialog(desktop())
        .title("Edit customer")
        .description("Changes apply to future orders.");
    let scope = dialog.scope();
    dialog.open();

    let node = Content::new(&scope).render(&Outline).unwrap().unwrap();
    let text = node.to_string();
    assert!(matches!(node, OutlineNode::Content(_)));
    assert!(text.starts_with("[modal] align=center"));
    assert!(text.contains("# Edit customer"));
    assert!(text.ends_with("[x]"));
}
