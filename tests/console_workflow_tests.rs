//! Console workflow tests
//!
//! Drive the [`Console`] controller against an in-memory backend the way the
//! TUI does and check both the rendered state and the requests that reached
//! the server.

mod mock_backend;

use keybrame_console::api::Backend;
use keybrame_console::config::ConsoleConfig;
use keybrame_console::console::{Console, PendingAction, PickerTarget};
use keybrame_console::models::*;
use keybrame_console::realtime::EventHub;
use mock_backend::{MemoryBackend, MockErrorInjection, keybinding};
use std::time::{Duration, Instant};
use tempfile::TempDir;

async fn console(backend: MemoryBackend) -> Console<MemoryBackend> {
    let mut console = Console::new(backend, ConsoleConfig::default(), EventHub::new());
    console.load_all().await;
    console.backend().clear_calls();
    console
}

fn latest_toast(console: &Console<MemoryBackend>) -> Option<(ToastKind, String)> {
    console
        .state
        .toasts
        .latest()
        .map(|t| (t.kind, t.message.clone()))
}

/// Invalid ports are rejected locally and never reach the server
#[tokio::test]
async fn test_port_bounds_are_enforced_before_any_request() {
    let mut console = console(MemoryBackend::new()).await;
    assert_eq!(console.state.settings_form.port_input, "5000");

    for bad in ["0", "65536", ""] {
        console.state.settings_form.port_input = bad.to_string();
        assert!(!console.save_settings(false).await, "{:?} accepted", bad);
        let (kind, message) = latest_toast(&console).unwrap();
        assert_eq!(kind, ToastKind::Error);
        assert!(message.contains("between 1 and 65535"));
    }
    assert!(console.backend().calls().is_empty());

    for good in ["1", "65535"] {
        console.state.settings_form.port_input = good.to_string();
        assert!(console.save_settings(false).await);
    }
    assert_eq!(
        console.backend().calls(),
        vec![
            "update_settings 1 assets/idle.png",
            "reload",
            "update_settings 65535 assets/idle.png",
            "reload",
        ]
    );
}

/// Typing in the port field auto-saves once after the idle delay
#[tokio::test]
async fn test_port_debounce_saves_silently_after_idle() {
    let mut console = console(MemoryBackend::new()).await;
    console.on_port_backspace();
    console.on_port_char('1');
    console.on_port_char('x');
    assert_eq!(console.state.settings_form.port_input, "5001");

    console.tick(Instant::now()).await;
    assert!(console.backend().calls().is_empty());

    console.tick(Instant::now() + Duration::from_secs(3)).await;
    assert_eq!(
        console.backend().calls(),
        vec!["update_settings 5001 assets/idle.png", "reload"]
    );
    assert!(
        console
            .state
            .toasts
            .iter()
            .all(|t| t.kind != ToastKind::Success)
    );

    console.tick(Instant::now() + Duration::from_secs(6)).await;
    assert_eq!(console.backend().calls().len(), 2);
}

/// A port change that requires a restart rebases after the fixed wait
#[tokio::test]
async fn test_port_change_restarts_then_redirects() {
    let backend = MemoryBackend::with_errors(MockErrorInjection {
        reload_required: true,
        fail_restart: true,
        ..Default::default()
    });
    let mut console = console(backend).await;
    console.state.settings_form.port_input = "5050".into();

    assert!(console.save_settings(false).await);
    assert_eq!(
        console.backend().calls(),
        vec!["update_settings 5050 assets/idle.png", "reload", "restart"]
    );
    assert!(console.state.redirect_at.is_some());
    assert_eq!(console.state.settings_form.obs_url, "http://localhost:5050/");

    console.tick(Instant::now()).await;
    assert_eq!(console.backend().base_url(), "http://localhost:5000");

    console.tick(Instant::now() + Duration::from_secs(5)).await;
    assert!(console.state.redirect_at.is_none());
    assert_eq!(console.backend().base_url(), "http://localhost:5050");
    assert!(console.backend().calls().contains(&"rebase 5050".to_string()));
}

/// Export then import restores identical settings and keybinding caches
#[tokio::test]
async fn test_export_then_import_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keybrame-config.json");
    let backend = MemoryBackend::new();
    let mut scene = keybinding(2, &["shift", "f2"], "scene.png");
    scene.binding_type = BindingType::Hold;
    scene.description = Some("scene".into());
    scene.transition_in = Some(Transition {
        image: "assets/in.gif".into(),
        duration: Some(600),
    });
    backend.seed_keybindings(vec![keybinding(1, &["ctrl", "f1"], "brb.png"), scene]);
    {
        let mut data = backend.data.lock().unwrap();
        data.settings.port = Some(5123);
        data.settings.default_image = "assets/brb.png".into();
    }
    let mut console = console(backend).await;
    let settings_before = console.state.settings.clone();
    let keybindings_before = console.state.keybindings.clone();
    assert_eq!(keybindings_before.len(), 2);

    assert!(console.export_config(&path).await);
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\n  \""), "export should be pretty-printed");

    // diverge the server from the exported snapshot
    {
        let mut data = console.backend().data.lock().unwrap();
        data.keybindings.clear();
        data.settings.port = Some(6000);
        data.settings.default_image = String::new();
    }
    console.load_all().await;
    assert!(console.state.keybindings.is_empty());

    assert!(console.import_config(&path).await);
    assert_eq!(console.state.settings, settings_before);
    assert_eq!(console.state.keybindings, keybindings_before);
    assert_eq!(console.state.settings_form.port_input, "5123");
}

#[tokio::test]
async fn test_import_of_invalid_json_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let mut console = console(MemoryBackend::new()).await;

    assert!(!console.import_config(&path).await);
    assert!(console.backend().calls().is_empty());
    assert_eq!(latest_toast(&console).unwrap().0, ToastKind::Error);

    assert!(!console.import_config(&dir.path().join("missing.json")).await);
    assert!(console.backend().calls().is_empty());
}

/// A keybinding with no keys is never submitted
#[tokio::test]
async fn test_zero_keys_never_submitted() {
    let mut console = console(MemoryBackend::new()).await;
    console.open_editor(None);
    console.state.editor.as_mut().unwrap().image = "idle.png".into();

    assert!(!console.save_keybinding().await);
    assert!(console.state.editor.is_some());
    assert_eq!(
        latest_toast(&console),
        Some((ToastKind::Error, "Please select at least one key".into()))
    );
    assert!(console.backend().calls().is_empty());
}

#[tokio::test]
async fn test_edit_existing_keybinding_puts_prefixed_paths() {
    let backend = MemoryBackend::new();
    backend.seed_keybindings(vec![keybinding(7, &["ctrl", "f1"], "old.png")]);
    let mut console = console(backend).await;

    console.open_editor(Some(7));
    let form = console.state.editor.as_mut().unwrap();
    assert_eq!(form.image, "old.png");
    form.image = "new.png".into();
    form.transition_in.enabled = true;
    form.transition_in.image = "in.gif".into();
    form.transition_in.duration = "350".into();

    assert!(console.save_keybinding().await);
    assert!(console.state.editor.is_none());
    assert_eq!(
        console.backend().calls(),
        vec!["update_keybinding 7", "reload"]
    );

    let payload = console
        .backend()
        .data
        .lock()
        .unwrap()
        .last_payload
        .clone()
        .unwrap();
    assert_eq!(payload.image, "assets/new.png");
    assert_eq!(
        payload.transition_in,
        Some(Some(Transition {
            image: "assets/in.gif".into(),
            duration: Some(350),
        }))
    );
    assert_eq!(payload.transition_out, Some(None));
    assert_eq!(console.state.keybindings[0].image, "assets/new.png");
}

/// Recording captures distinct known keys and stops on save
#[tokio::test]
async fn test_recording_then_save_creates_keybinding() {
    let mut console = console(MemoryBackend::new()).await;
    console.open_editor(None);
    assert!(console.start_recording());

    for key in ["shift", "<unknown>", "shift", "a", "unknown"] {
        console.hub().publish(ServerEvent::KeyPressed { key: key.into() });
    }
    console.tick(Instant::now()).await;
    assert_eq!(console.state.recorder.captured(), ["shift", "a"]);

    console.state.editor.as_mut().unwrap().image = "idle.png".into();
    assert!(console.save_keybinding().await);
    assert!(!console.state.recorder.is_recording());
    assert_eq!(console.state.keybindings.len(), 1);
    assert_eq!(console.state.keybindings[0].keys, vec!["shift", "a"]);
}

#[tokio::test]
async fn test_closing_editor_cancels_recording() {
    let mut console = console(MemoryBackend::new()).await;
    console.open_editor(None);
    console.start_recording();
    console.close_editor();
    assert!(!console.state.recorder.is_recording());

    console.hub().publish(ServerEvent::KeyPressed { key: "f9".into() });
    console.tick(Instant::now()).await;
    assert!(console.state.recorder.captured().is_empty());
}

/// Any sequence of moves yields a permutation of the original ids
#[tokio::test]
async fn test_reorder_keeps_a_permutation() {
    let backend = MemoryBackend::new();
    backend.seed_keybindings((1..=5).map(|id| keybinding(id, &["a"], "x.png")).collect());
    let mut console = console(backend).await;

    let moves = [(0, false), (1, false), (4, true), (2, true), (0, true), (3, false)];
    for (cursor, up) in moves {
        console.state.keybinding_cursor = cursor;
        console.move_keybinding(up).await;
    }

    let mut order = console.state.keybinding_order();
    assert_eq!(order, console.backend().server_order());
    order.sort_unstable();
    assert_eq!(order, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_failed_reorder_restores_server_order() {
    let backend = MemoryBackend::with_errors(MockErrorInjection {
        fail_reorder: true,
        ..Default::default()
    });
    backend.seed_keybindings(vec![
        keybinding(1, &["a"], "a.png"),
        keybinding(2, &["b"], "b.png"),
    ]);
    let mut console = console(backend).await;

    console.move_keybinding(false).await;
    assert_eq!(console.backend().calls(), vec!["reorder [2, 1]"]);
    assert_eq!(console.state.keybinding_order(), vec![1, 2]);
    let (kind, message) = latest_toast(&console).unwrap();
    assert_eq!(kind, ToastKind::Error);
    assert!(message.contains("database is locked"));
}

#[tokio::test]
async fn test_upload_dropped_skips_non_images() {
    let dir = TempDir::new().unwrap();
    let png = dir.path().join("scene.png");
    let txt = dir.path().join("readme.txt");
    std::fs::write(&png, [0x89, b'P', b'N', b'G']).unwrap();
    std::fs::write(&txt, "notes").unwrap();
    let mut console = console(MemoryBackend::new()).await;

    console.upload_dropped(&[png, txt]).await;
    assert_eq!(console.backend().calls(), vec!["upload scene.png image/png"]);
    assert_eq!(console.state.images.len(), 1);
    assert_eq!(
        latest_toast(&console),
        Some((ToastKind::Success, "Uploaded: scene.png".into()))
    );
}

#[tokio::test]
async fn test_delete_image_after_confirmation() {
    let backend = MemoryBackend::new();
    backend.seed_images(&["a.png", "b.gif"]);
    let mut console = console(backend).await;

    console.request_delete_image("b.gif");
    console.resolve_confirm(false).await;
    assert!(console.backend().calls().is_empty());

    console.request_delete_image("b.gif");
    assert_eq!(
        console.state.confirm.as_ref().map(|d| d.action().clone()),
        Some(PendingAction::DeleteImage("b.gif".into()))
    );
    console.resolve_confirm(true).await;
    assert_eq!(console.backend().calls(), vec!["delete_image b.gif"]);
    assert_eq!(console.state.images.len(), 1);
}

/// Choosing a default image saves settings without a success toast
#[tokio::test]
async fn test_default_image_pick_saves_silently() {
    let backend = MemoryBackend::new();
    backend.seed_images(&["idle.png", "brb.png"]);
    let mut console = console(backend).await;

    console.open_picker(PickerTarget::Default);
    assert_eq!(console.state.picker.as_ref().unwrap().selected, 0);
    console.state.picker.as_mut().unwrap().next(2);
    console.pick_selected().await;

    assert_eq!(
        console.backend().calls(),
        vec!["update_settings 5000 assets/brb.png", "reload"]
    );
    assert!(console.state.toasts.is_empty());
}

#[tokio::test]
async fn test_restart_schedules_full_reload() {
    let mut console = console(MemoryBackend::new()).await;
    console.request_restart();
    console.resolve_confirm(true).await;
    assert_eq!(console.backend().calls(), vec!["restart"]);
    assert!(console.state.reload_at.is_some());

    console.tick(Instant::now() + Duration::from_secs(3)).await;
    assert!(console.state.reload_at.is_none());
}

#[tokio::test]
async fn test_shutdown_then_disconnect_shows_offline() {
    let mut console = console(MemoryBackend::new()).await;
    console.handle_server_event(ServerEvent::Disconnected).await;
    assert_eq!(console.state.overlay, Overlay::None);

    console.request_shutdown();
    console.resolve_confirm(true).await;
    assert!(console.state.server_stopping);
    console.handle_server_event(ServerEvent::Disconnected).await;
    assert_eq!(console.state.overlay, Overlay::Offline);
}

/// Update announce, install, progress, restart and recovery
#[tokio::test]
async fn test_update_lifecycle() {
    let mut console = console(MemoryBackend::new()).await;
    for _ in 0..2 {
        console
            .handle_server_event(ServerEvent::UpdateAvailable {
                version: "2.2.0".into(),
            })
            .await;
    }
    assert_eq!(
        console.state.update_banner.as_ref().unwrap().status_text(),
        "Update now"
    );
    console.dismiss_update_banner();
    console
        .handle_server_event(ServerEvent::UpdateAvailable {
            version: "2.2.0".into(),
        })
        .await;
    assert!(console.state.update_banner.is_none());

    // a fresh session shows it again
    console.full_reload().await;
    console
        .handle_server_event(ServerEvent::UpdateAvailable {
            version: "2.2.0".into(),
        })
        .await;
    console.request_install_update();
    console.resolve_confirm(true).await;
    assert!(console.backend().calls().contains(&"install_update".to_string()));
    assert!(console.state.update_banner.as_ref().unwrap().downloading);

    console
        .handle_server_event(ServerEvent::UpdateProgress { progress: 40 })
        .await;
    assert_eq!(
        console.state.update_banner.as_ref().unwrap().status_text(),
        "40%"
    );

    console.handle_server_event(ServerEvent::UpdateInstalling).await;
    console.handle_server_event(ServerEvent::Disconnected).await;
    assert_eq!(console.state.overlay, Overlay::Updating);

    console.handle_server_event(ServerEvent::Connected).await;
    assert_eq!(console.state.overlay, Overlay::None);
    assert!(!console.state.server_updating);
    assert!(console.state.update_banner.is_none());
}

#[tokio::test]
async fn test_pressed_keys_are_distinct() {
    let mut console = console(MemoryBackend::new()).await;
    for key in ["ctrl", "ctrl", "space"] {
        console
            .handle_server_event(ServerEvent::KeyPressed { key: key.into() })
            .await;
    }
    assert_eq!(console.state.pressed_keys, vec!["ctrl", "space"]);

    console
        .handle_server_event(ServerEvent::KeyReleased { key: "ctrl".into() })
        .await;
    assert_eq!(console.state.pressed_keys, vec!["space"]);
}
