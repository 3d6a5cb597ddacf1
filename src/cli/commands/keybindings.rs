//! `list` command - print keybindings in priority order

use anyhow::Result;

use crate::api::Backend;
use crate::models::{Keybinding, format_key_name, remove_images_prefix};

pub async fn execute_list_command(backend: &impl Backend) -> Result<()> {
    let keybindings = backend.keybindings().await?;
    log::debug!("fetched {} keybindings", keybindings.len());

    if keybindings.is_empty() {
        println!("⚠️  No keybindings configured");
        return Ok(());
    }

    println!("⌨️  Keybindings ({}):", keybindings.len());
    for (index, keybinding) in keybindings.iter().enumerate() {
        println!("{:>3}. {}", index + 1, describe(keybinding));
    }
    Ok(())
}

/// One-line summary, e.g. `Ctrl + Space  [toggle] bg.png - scene (#3)`
pub fn describe(keybinding: &Keybinding) -> String {
    let keys = keybinding
        .keys
        .iter()
        .map(|k| format_key_name(k))
        .collect::<Vec<_>>()
        .join(" + ");
    let mut line = format!(
        "{}  [{}] {}",
        keys,
        keybinding.binding_type.label(),
        remove_images_prefix(&keybinding.image)
    );
    if !keybinding.description_text().is_empty() {
        line.push_str(" - ");
        line.push_str(keybinding.description_text());
    }
    if let Some(t) = &keybinding.transition_in {
        line.push_str(&format!(" in:{}", remove_images_prefix(&t.image)));
    }
    if let Some(t) = &keybinding.transition_out {
        line.push_str(&format!(" out:{}", remove_images_prefix(&t.image)));
    }
    if !keybinding.enabled {
        line.push_str(" (disabled)");
    }
    line.push_str(&format!(" (#{})", keybinding.id));
    line
}
