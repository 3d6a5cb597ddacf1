//! TUI event loop and handling

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

use crate::api::Backend;
use crate::cli::tui::ui::ui;
use crate::console::{
    Console, EditorField, PathPrompt, PickerTarget, PromptPurpose, parse_dropped_paths,
};
use crate::models::{AppEvent, FocusedPane, Overlay};

/// Run the main TUI event loop
pub async fn run_tui_event_loop<B: Backend>(mut console: Console<B>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel();

    // Spawn tick generator
    let tx_tick = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            if tx_tick.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Forward real-time events into the loop
    let mut subscription = console.hub().subscribe();
    let tx_server = tx.clone();
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            if tx_server.send(AppEvent::Server(event)).is_err() {
                break;
            }
        }
    });

    terminal.draw(|f| {
        ui(f, &console.state, &console.backend().base_url());
    })?;
    console.start().await;

    let result: Result<()> = loop {
        let server_url = console.backend().base_url();
        let mut rows = Vec::new();
        terminal.draw(|f| rows = ui(f, &console.state, &server_url))?;
        console.state.row_layout = rows;

        tokio::select! {
            _ = tokio::task::spawn_blocking(|| event::poll(Duration::from_millis(50))) => {
                if event::poll(Duration::from_millis(0))? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            handle_key(&mut console, key).await;
                        }
                        Event::Mouse(mouse) => handle_mouse(&mut console, mouse).await,
                        Event::Paste(text) => handle_paste(&mut console, &text).await,
                        _ => {}
                    }
                }
            }
            Some(app_event) = rx.recv() => match app_event {
                AppEvent::Tick => console.tick(Instant::now()).await,
                AppEvent::Server(event) => {
                    log::trace!("server event {}", event.name());
                    console.handle_server_event(event).await;
                }
            },
        }

        if console.state.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

/// Dispatch a key press, innermost modal first
pub async fn handle_key<B: Backend>(console: &mut Console<B>, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        console.state.should_quit = true;
        return;
    }

    if console.state.confirm.is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => console.resolve_confirm(true).await,
            KeyCode::Esc | KeyCode::Char('n') => console.resolve_confirm(false).await,
            _ => {}
        }
        return;
    }

    if console.state.overlay != Overlay::None {
        if key.code == KeyCode::Char('q') {
            console.state.should_quit = true;
        }
        return;
    }

    if console.state.prompt.is_some() {
        handle_prompt_key(console, key).await;
        return;
    }

    if console.state.picker.is_some() {
        handle_picker_key(console, key).await;
        return;
    }

    if console.state.show_help {
        console.state.show_help = false;
        return;
    }

    if console.state.editor.is_some() {
        handle_editor_key(console, key).await;
        return;
    }

    handle_main_key(console, key).await;
}

async fn handle_prompt_key<B: Backend>(console: &mut Console<B>, key: KeyEvent) {
    let Some(prompt) = console.state.prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => console.state.prompt = None,
        KeyCode::Backspace => {
            prompt.input.pop();
        }
        KeyCode::Char(c) => prompt.input.push(c),
        KeyCode::Enter => {
            if let Some(prompt) = console.state.prompt.take() {
                submit_prompt(console, prompt).await;
            }
        }
        _ => {}
    }
}

async fn submit_prompt<B: Backend>(console: &mut Console<B>, prompt: PathPrompt) {
    let input = prompt.input.trim();
    if input.is_empty() {
        return;
    }
    match prompt.purpose {
        PromptPurpose::Upload => {
            let paths = parse_dropped_paths(input);
            console.upload_images(&paths).await;
        }
        PromptPurpose::Import => {
            console.import_config(&PathBuf::from(input)).await;
        }
        PromptPurpose::Export => {
            console.export_config(&PathBuf::from(input)).await;
        }
    }
}

async fn handle_picker_key<B: Backend>(console: &mut Console<B>, key: KeyEvent) {
    let len = console.state.images.len();
    let Some(picker) = console.state.picker.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => picker.previous(len),
        KeyCode::Down | KeyCode::Char('j') => picker.next(len),
        KeyCode::Enter => console.pick_selected().await,
        KeyCode::Esc => console.close_picker(),
        KeyCode::Char('u') => {
            console.state.prompt = Some(PathPrompt {
                purpose: PromptPurpose::Upload,
                input: String::new(),
            });
        }
        _ => {}
    }
}

async fn handle_editor_key<B: Backend>(console: &mut Console<B>, key: KeyEvent) {
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        console.save_keybinding().await;
        return;
    }
    let Some(form) = console.state.editor.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => console.close_editor(),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Delete if form.focus == EditorField::Keys => console.clear_selected_keys(),
        KeyCode::Enter | KeyCode::Char(' ') => match form.focus {
            EditorField::Keys => {
                console.toggle_recording();
            }
            EditorField::Image => console.open_picker(PickerTarget::Main),
            EditorField::TransitionInImage => console.open_picker(PickerTarget::TransitionIn),
            EditorField::TransitionOutImage => console.open_picker(PickerTarget::TransitionOut),
            EditorField::Description if key.code == KeyCode::Char(' ') => form.input_char(' '),
            EditorField::Description => {
                console.save_keybinding().await;
            }
            _ => form.activate_focused(),
        },
        KeyCode::Char(c) if form.focused_is_text() => form.input_char(c),
        _ => {}
    }
}

async fn handle_main_key<B: Backend>(console: &mut Console<B>, key: KeyEvent) {
    if console.state.focus == FocusedPane::Settings {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                console.on_port_char(c);
                return;
            }
            KeyCode::Backspace => {
                console.on_port_backspace();
                return;
            }
            KeyCode::Enter | KeyCode::Char('s') => {
                console.save_settings(false).await;
                return;
            }
            KeyCode::Char('i') => {
                console.open_picker(PickerTarget::Default);
                return;
            }
            KeyCode::Char('c') => {
                console.copy_obs_url();
                return;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('q') => console.state.should_quit = true,
        KeyCode::Tab => console.state.focus = console.state.focus.next(),
        KeyCode::Char('?') => console.state.show_help = true,
        KeyCode::Esc => {
            console.state.toasts.dismiss_latest();
        }
        KeyCode::Char('r') => console.reload_config().await,
        KeyCode::Char('R') => console.request_restart(),
        KeyCode::Char('X') => console.request_shutdown(),
        KeyCode::Char('U') => console.request_install_update(),
        KeyCode::Char('b') => console.dismiss_update_banner(),
        KeyCode::Char('E') => {
            let input = console.config().export_path.display().to_string();
            console.state.prompt = Some(PathPrompt {
                purpose: PromptPurpose::Export,
                input,
            });
        }
        KeyCode::Char('I') => {
            console.state.prompt = Some(PathPrompt {
                purpose: PromptPurpose::Import,
                input: String::new(),
            });
        }
        _ => match console.state.focus {
            FocusedPane::Keybindings => handle_keybindings_key(console, key).await,
            FocusedPane::Images => handle_images_key(console, key),
            FocusedPane::Settings => {}
        },
    }
}

async fn handle_keybindings_key<B: Backend>(console: &mut Console<B>, key: KeyEvent) {
    let len = console.state.keybindings.len();
    let selected = console.state.selected_keybinding().map(|kb| kb.id);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            console.state.keybinding_cursor = console.state.keybinding_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if console.state.keybinding_cursor + 1 < len {
                console.state.keybinding_cursor += 1;
            }
        }
        KeyCode::Char('K') => console.move_keybinding(true).await,
        KeyCode::Char('J') => console.move_keybinding(false).await,
        KeyCode::Char('a') | KeyCode::Char('n') => console.open_editor(None),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = selected {
                console.open_editor(Some(id));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = selected {
                console.request_delete_keybinding(id);
            }
        }
        _ => {}
    }
}

fn handle_images_key<B: Backend>(console: &mut Console<B>, key: KeyEvent) {
    let len = console.state.images.len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            console.state.image_cursor = console.state.image_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if console.state.image_cursor + 1 < len {
                console.state.image_cursor += 1;
            }
        }
        KeyCode::Char('u') => {
            console.state.prompt = Some(PathPrompt {
                purpose: PromptPurpose::Upload,
                input: String::new(),
            });
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(filename) = console.state.selected_image().map(|img| img.filename.clone()) {
                console.request_delete_image(&filename);
            }
        }
        _ => {}
    }
}

/// Press, drag and release on the keybinding list reorders it
pub async fn handle_mouse<B: Backend>(console: &mut Console<B>, mouse: MouseEvent) {
    if console.state.modal_open() || console.state.overlay != Overlay::None {
        return;
    }
    let row = mouse.row as f32 + 0.5;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if console.begin_drag(row) {
                console.state.focus = FocusedPane::Keybindings;
                if let Some(drag) = console.state.drag {
                    if let Some(index) = console
                        .state
                        .keybindings
                        .iter()
                        .position(|kb| kb.id == drag.dragging)
                    {
                        console.state.keybinding_cursor = index;
                    }
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => console.drag_to(row),
        MouseEventKind::Up(MouseButton::Left) => {
            let dragged = console.state.drag.map(|d| d.dragging);
            console.finish_drag().await;
            if let Some(id) = dragged {
                if let Some(index) = console.state.keybindings.iter().position(|kb| kb.id == id) {
                    console.state.keybinding_cursor = index;
                }
            }
        }
        _ => {}
    }
}

/// Terminals deliver dropped files as a paste of their paths
pub async fn handle_paste<B: Backend>(console: &mut Console<B>, text: &str) {
    if let Some(prompt) = console.state.prompt.as_mut() {
        prompt.input.push_str(text);
        return;
    }
    // the open picker takes dropped images and lists them on arrival
    if console.state.picker.is_some() {
        let paths = parse_dropped_paths(text);
        if !paths.is_empty() {
            console.upload_dropped(&paths).await;
        }
        return;
    }
    if let Some(form) = console.state.editor.as_mut() {
        if form.focus == EditorField::Description {
            form.description.push_str(text.trim_end_matches(['\r', '\n']));
        }
        return;
    }
    if console.state.modal_open() {
        return;
    }
    let paths = parse_dropped_paths(text);
    if paths.is_empty() {
        return;
    }
    console.state.focus = FocusedPane::Images;
    console.upload_dropped(&paths).await;
}
