//! TUI rendering logic

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::console::{
    ConsoleState, EditorField, KeybindingForm, PickerTarget, RowBox, TransitionFields,
};
use crate::models::{FocusedPane, Overlay, format_key_name, remove_images_prefix};

/// Render the whole console. Returns the screen rows occupied by keybinding
/// entries so mouse drags can be hit-tested against what was drawn.
pub fn ui(f: &mut Frame, state: &ConsoleState, server_url: &str) -> Vec<RowBox> {
    let banner_height = if state.update_banner.is_some() { 1 } else { 0 };
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, state, server_url, main_chunks[0]);
    render_update_banner(f, state, main_chunks[1]);
    render_pressed_keys(f, state, main_chunks[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[3]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(7)])
        .split(body[1]);

    let rows = render_keybindings(f, state, body[0]);
    render_images(f, state, right[0]);
    render_settings(f, state, right[1]);
    render_help_bar(f, state, main_chunks[4]);

    if let Some(form) = &state.editor {
        render_editor(f, state, form);
    }
    if state.picker.is_some() {
        render_picker(f, state);
    }
    if state.prompt.is_some() {
        render_prompt(f, state);
    }
    if state.confirm.is_some() {
        render_confirm(f, state);
    }
    if state.show_help {
        render_help(f);
    }
    render_overlay(f, state);
    render_toasts(f, state);

    rows
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn key_chip(key: &str) -> Span<'static> {
    Span::styled(
        format!(" {} ", format_key_name(key)),
        Style::default().bg(Color::DarkGray).fg(Color::White),
    )
}

fn chips(keys: &[String]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" + "));
        }
        spans.push(key_chip(key));
    }
    spans
}

fn render_header(f: &mut Frame, state: &ConsoleState, server_url: &str, area: Rect) {
    let (symbol, color, label) = if state.connected {
        ("●", Color::Green, "live")
    } else {
        ("○", Color::Red, "offline")
    };
    let version = state
        .version
        .as_ref()
        .map(|v| format!(" v{}", v))
        .unwrap_or_default();

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Keybrame Console",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(version, Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(symbol, Style::default().fg(color)),
        Span::raw(format!(" {} {}", label, server_url)),
    ]));
    f.render_widget(header, area);
}

fn render_update_banner(f: &mut Frame, state: &ConsoleState, area: Rect) {
    let Some(banner) = &state.update_banner else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" ⬆ New version available: v{} ", banner.version),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(
            format!("[U] {}", banner.status_text()),
            Style::default().fg(Color::Green),
        ),
        Span::styled("  [b] Dismiss", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_pressed_keys(f: &mut Frame, state: &ConsoleState, area: Rect) {
    let line = if state.pressed_keys.is_empty() {
        Line::from(Span::styled(
            "No keys pressed",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(
            state
                .pressed_keys
                .iter()
                .flat_map(|key| [key_chip(key), Span::raw(" ")])
                .collect::<Vec<_>>(),
        )
    };
    let widget = Paragraph::new(line).block(
        Block::default()
            .title("Pressed keys")
            .borders(Borders::ALL),
    );
    f.render_widget(widget, area);
}

fn render_keybindings(f: &mut Frame, state: &ConsoleState, area: Rect) -> Vec<RowBox> {
    let focused = state.focus == FocusedPane::Keybindings;
    let block = Block::default()
        .title(format!("Keybindings ({})", state.keybindings.len()))
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let inner = block.inner(area);

    if state.keybindings.is_empty() {
        let empty = Paragraph::new("No keybindings yet. Press [a] to add one.")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(empty, area);
        return Vec::new();
    }

    let visible = inner.height.max(1) as usize;
    let offset = state.keybinding_cursor.saturating_sub(visible - 1);
    let dragging = state.drag.map(|d| d.dragging);

    let items: Vec<ListItem> = state
        .keybindings
        .iter()
        .map(|kb| {
            let mut spans = vec![
                Span::styled(
                    kb.binding_type.symbol(),
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(" "),
            ];
            spans.extend(chips(&kb.keys));
            spans.push(Span::raw(format!(
                "  → {}",
                remove_images_prefix(&kb.image)
            )));
            if let Some(t) = &kb.transition_in {
                spans.push(Span::styled(
                    format!(" ↘{}", remove_images_prefix(&t.image)),
                    Style::default().fg(Color::Gray),
                ));
            }
            if let Some(t) = &kb.transition_out {
                spans.push(Span::styled(
                    format!(" ↗{}", remove_images_prefix(&t.image)),
                    Style::default().fg(Color::Gray),
                ));
            }
            if !kb.description_text().is_empty() {
                spans.push(Span::styled(
                    format!("  {}", kb.description_text()),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                ));
            }

            let mut style = Style::default();
            if !kb.enabled {
                style = style.add_modifier(Modifier::DIM);
            }
            if dragging == Some(kb.id) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let mut list_state = ListState::default()
        .with_offset(offset)
        .with_selected(focused.then_some(state.keybinding_cursor));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, area, &mut list_state);

    state
        .keybindings
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, kb)| RowBox {
            id: kb.id,
            top: (inner.y as usize + index - offset) as f32,
            height: 1.0,
        })
        .collect()
}

fn render_images(f: &mut Frame, state: &ConsoleState, area: Rect) {
    let focused = state.focus == FocusedPane::Images;
    let block = Block::default()
        .title(format!("Images ({})  drop files here", state.images.len()))
        .borders(Borders::ALL)
        .border_style(focus_style(focused));

    if state.images.is_empty() {
        let empty = Paragraph::new("No images. Press [u] or drop files to upload.")
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let default_image = &state.settings_form.default_image;
    let items: Vec<ListItem> = state
        .images
        .iter()
        .map(|image| {
            let mut spans = vec![Span::raw(image.label())];
            if remove_images_prefix(&image.path) == default_image.as_str() {
                spans.push(Span::styled(" (default)", Style::default().fg(Color::Green)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut list_state = ListState::default().with_selected(focused.then_some(state.image_cursor));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_settings(f: &mut Frame, state: &ConsoleState, area: Rect) {
    let focused = state.focus == FocusedPane::Settings;
    let form = &state.settings_form;
    let pending = if form.debounce_pending() {
        Span::styled(" (unsaved)", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };
    let default_image = if form.default_image.is_empty() {
        "(none)".to_string()
    } else {
        form.default_image.clone()
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Port:          ", Style::default().fg(Color::Gray)),
            Span::raw(form.port_input.clone()),
            pending,
        ]),
        Line::from(vec![
            Span::styled("Default image: ", Style::default().fg(Color::Gray)),
            Span::raw(default_image),
        ]),
        Line::from(vec![
            Span::styled("OBS URL:       ", Style::default().fg(Color::Gray)),
            Span::styled(form.obs_url.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            "[0-9] port  [Enter] save  [i] image  [c] copy URL",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let widget = Paragraph::new(lines).block(
        Block::default()
            .title("Settings")
            .borders(Borders::ALL)
            .border_style(focus_style(focused)),
    );
    f.render_widget(widget, area);
}

fn render_help_bar(f: &mut Frame, state: &ConsoleState, area: Rect) {
    let mut help_text = match state.focus {
        FocusedPane::Keybindings => vec![
            Span::styled("[a]Add ", Style::default().fg(Color::Green)),
            Span::styled("[e]Edit ", Style::default().fg(Color::Cyan)),
            Span::styled("[d]Delete ", Style::default().fg(Color::Red)),
            Span::styled("[K/J]Move ", Style::default().fg(Color::Cyan)),
        ],
        FocusedPane::Images => vec![
            Span::styled("[u]Upload ", Style::default().fg(Color::Green)),
            Span::styled("[d]Delete ", Style::default().fg(Color::Red)),
        ],
        FocusedPane::Settings => vec![
            Span::styled("[Enter]Save ", Style::default().fg(Color::Green)),
            Span::styled("[i]Default image ", Style::default().fg(Color::Cyan)),
            Span::styled("[c]Copy OBS URL ", Style::default().fg(Color::Cyan)),
        ],
    };
    help_text.extend([
        Span::styled("[Tab]Pane ", Style::default().fg(Color::Yellow)),
        Span::styled("[r]Reload ", Style::default().fg(Color::Cyan)),
        Span::styled("[E/I]Export/Import ", Style::default().fg(Color::Cyan)),
        Span::styled("[R]Restart ", Style::default().fg(Color::Magenta)),
        Span::styled("[X]Shutdown ", Style::default().fg(Color::Red)),
        Span::styled("[?]Help ", Style::default().fg(Color::Yellow)),
        Span::styled("[q]Quit", Style::default().fg(Color::Red)),
    ]);

    let help = Paragraph::new(Line::from(help_text))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(help, area);
}

fn field_line(
    label: &str,
    value: Vec<Span<'static>>,
    field: EditorField,
    form: &KeybindingForm,
) -> Line<'static> {
    let focused = form.focus == field;
    let marker = if focused { "▶ " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(format!("{:<16}", label), label_style),
    ];
    spans.extend(value);
    Line::from(spans)
}

fn image_value(image: &str) -> Vec<Span<'static>> {
    if image.is_empty() {
        vec![Span::styled("(choose...)", Style::default().fg(Color::DarkGray))]
    } else {
        vec![Span::raw(image.to_string())]
    }
}

fn transition_lines(
    lines: &mut Vec<Line<'static>>,
    form: &KeybindingForm,
    title: &str,
    fields: &TransitionFields,
    ids: [EditorField; 3],
) {
    let checkbox = if fields.enabled { "[x]" } else { "[ ]" };
    lines.push(field_line(title, vec![Span::raw(checkbox)], ids[0], form));
    if fields.enabled {
        lines.push(field_line("  image", image_value(&fields.image), ids[1], form));
        let duration = if fields.duration.is_empty() {
            Span::styled("(auto)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(format!("{} ms", fields.duration))
        };
        lines.push(field_line("  duration", vec![duration], ids[2], form));
    }
}

fn render_editor(f: &mut Frame, state: &ConsoleState, form: &KeybindingForm) {
    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);

    let mut keys = chips(&form.selected_keys);
    if keys.is_empty() {
        keys.push(Span::styled("(no keys)", Style::default().fg(Color::DarkGray)));
    }
    if state.recorder.is_recording() {
        keys.push(Span::styled(
            "  ● recording",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        let captured = state.recorder.captured();
        if !captured.is_empty() {
            keys.push(Span::raw(" "));
            keys.extend(chips(captured));
        }
    }

    let mut lines = vec![
        field_line("Keys", keys, EditorField::Keys, form),
        field_line(
            "Type",
            vec![Span::raw(format!(
                "{} {}",
                form.binding_type.symbol(),
                form.binding_type.label()
            ))],
            EditorField::Type,
            form,
        ),
        field_line("Image", image_value(&form.image), EditorField::Image, form),
        field_line(
            "Description",
            vec![Span::raw(form.description.clone())],
            EditorField::Description,
            form,
        ),
    ];
    transition_lines(
        &mut lines,
        form,
        "Enter transition",
        &form.transition_in,
        [
            EditorField::TransitionInEnabled,
            EditorField::TransitionInImage,
            EditorField::TransitionInDuration,
        ],
    );
    transition_lines(
        &mut lines,
        form,
        "Exit transition",
        &form.transition_out,
        [
            EditorField::TransitionOutEnabled,
            EditorField::TransitionOutImage,
            EditorField::TransitionOutDuration,
        ],
    );
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("[Tab/↑↓]", Style::default().fg(Color::Cyan)),
        Span::raw(" Field "),
        Span::styled("[Enter]", Style::default().fg(Color::Cyan)),
        Span::raw(" Record/Toggle/Choose "),
        Span::styled("[Del]", Style::default().fg(Color::Cyan)),
        Span::raw(" Clear keys "),
        Span::styled("[Ctrl+S]", Style::default().fg(Color::Green)),
        Span::raw(" Save "),
        Span::styled("[ESC]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]));

    let editor = Paragraph::new(lines)
        .block(
            Block::default()
                .title(form.title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(editor, area);
}

fn render_picker(f: &mut Frame, state: &ConsoleState) {
    let Some(picker) = &state.picker else {
        return;
    };
    let area = centered_rect(50, 60, f.area());
    f.render_widget(Clear, area);

    let title = match picker.target {
        PickerTarget::Main => "Choose image",
        PickerTarget::TransitionIn => "Choose enter transition",
        PickerTarget::TransitionOut => "Choose exit transition",
        PickerTarget::Default => "Choose default image",
    };

    let items: Vec<ListItem> = state
        .images
        .iter()
        .map(|image| {
            let current = picker.is_current(image);
            let marker = if current { "✓ " } else { "  " };
            let style = if current {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(image.label(), style),
            ]))
        })
        .collect();

    let mut list_state = ListState::default().with_selected(Some(picker.selected));
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!("{}  [Enter] pick  [u] upload  [ESC] cancel", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_prompt(f: &mut Frame, state: &ConsoleState) {
    let Some(prompt) = &state.prompt else {
        return;
    };
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);

    let widget = Paragraph::new(vec![
        Line::from(vec![Span::raw(prompt.input.clone()), Span::styled("█", Style::default().fg(Color::Gray))]),
        Line::raw(""),
        Line::from(Span::styled(
            "[Enter] OK  [ESC] Cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .title(prompt.purpose.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_confirm(f: &mut Frame, state: &ConsoleState) {
    let Some(dialog) = &state.confirm else {
        return;
    };
    let area = centered_rect(50, 25, f.area());
    f.render_widget(Clear, area);

    let widget = Paragraph::new(vec![
        Line::raw(dialog.message.clone()),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[Enter/y]", Style::default().fg(Color::Green)),
            Span::raw(" Confirm "),
            Span::styled("[ESC/n]", Style::default().fg(Color::Red)),
            Span::raw(" Cancel"),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(dialog.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(widget, area);
}

fn render_help(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let entries = [
        ("Tab", "Switch pane"),
        ("a / e / d", "Add, edit, delete keybinding"),
        ("K / J", "Move keybinding up / down (or drag with the mouse)"),
        ("u", "Upload images (or drop files on the terminal)"),
        ("0-9 / Enter", "Edit port / save settings"),
        ("i", "Choose default image"),
        ("c", "Copy OBS URL"),
        ("r", "Reload server configuration"),
        ("E / I", "Export / import configuration"),
        ("R / X", "Restart / shut down server"),
        ("U / b", "Install / dismiss update"),
        ("Esc", "Dismiss latest notification"),
        ("q", "Quit"),
    ];
    let lines: Vec<Line> = entries
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", keys), Style::default().fg(Color::Cyan)),
                Span::raw(*what),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .title("Help (any key to close)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(help, area);
}

fn render_overlay(f: &mut Frame, state: &ConsoleState) {
    let (title, message, color) = match state.overlay {
        Overlay::None => return,
        Overlay::Updating => (
            "Updating",
            "Installing the update. The console reloads when the server is back.",
            Color::Blue,
        ),
        Overlay::Offline => (
            "Server offline",
            "The server has been shut down. Press [q] to quit.",
            Color::Red,
        ),
    };
    let area = f.area();
    f.render_widget(Clear, area);
    let inner = centered_rect(60, 20, area);
    let widget = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(widget, inner);
}

fn render_toasts(f: &mut Frame, state: &ConsoleState) {
    let area = f.area();
    let width = (area.width / 3).max(30).min(area.width);
    let mut y = area.y + 1;
    for toast in state.toasts.iter() {
        let lines: u16 = (toast.message.chars().count() as u16 / width.saturating_sub(4).max(1)) + 1;
        let height = lines + 2;
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width - width,
            y,
            width,
            height,
        };
        f.render_widget(Clear, rect);
        let widget = Paragraph::new(format!("{} {}", toast.kind.symbol(), toast.message))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(toast.kind.color())),
            );
        f.render_widget(widget, rect);
        y += height;
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
