//! `watch` command - stream real-time events to stdout

use anyhow::Result;
use chrono::Local;
use std::time::Duration;

use crate::api::Backend;
use crate::config::ConsoleConfig;
use crate::models::ServerEvent;
use crate::realtime::{self, Backoff, EventHub};

pub async fn execute_watch_command(backend: &impl Backend, config: &ConsoleConfig) -> Result<()> {
    let hub = EventHub::new();
    let mut events = hub.subscribe();
    let backoff = Backoff {
        initial: Duration::from_millis(config.reconnect_delay_ms),
        max: Duration::from_millis(config.reconnect_max_delay_ms),
    };
    let handle = realtime::spawn(&backend.base_url(), hub.clone(), backoff)?;
    println!("📡 Watching {} (Ctrl+C to stop)", handle.url());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            event = events.recv() => match event {
                Some(event) => println!("{} {}", Local::now().format("%H:%M:%S%.3f"), render(&event)),
                None => break,
            },
        }
    }

    handle.stop();
    Ok(())
}

fn render(event: &ServerEvent) -> String {
    match event {
        ServerEvent::Connected => "🟢 connected".to_string(),
        ServerEvent::Disconnected => "🔴 disconnected".to_string(),
        ServerEvent::KeyPressed { key } => format!("⬇  {}", key),
        ServerEvent::KeyReleased { key } => format!("⬆  {}", key),
        ServerEvent::UpdateAvailable { version } => format!("update available: v{}", version),
        ServerEvent::UpdateProgress { progress } => format!("update progress: {}%", progress),
        ServerEvent::UpdateInstalling => "update installing".to_string(),
        ServerEvent::UpdateError { error } => format!("update error: {}", error),
        ServerEvent::ImageChange { image } => format!("image: {}", image),
        ServerEvent::ConfigReloaded => "config reloaded".to_string(),
        ServerEvent::Other { name, data } => format!("{} {}", name, data),
    }
}
