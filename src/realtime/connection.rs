//! Socket.IO client connection over the Engine.IO WebSocket transport

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use super::codec::{EnginePacket, SocketPacket};
use super::hub::EventHub;
use crate::errors::{ConsoleError, Result};
use crate::models::ServerEvent;

/// Reconnect back-off: doubles from `initial` up to `max`, resets after a
/// successful connect
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Backoff {
    pub fn next(&self, current: Duration) -> Duration {
        (current * 2).min(self.max)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(5),
        }
    }
}

/// Socket.IO endpoint for an HTTP base URL
pub fn socket_url(http_base: &str) -> Result<String> {
    let mut url = Url::parse(http_base)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ConsoleError::Config(format!(
                "unsupported scheme '{}' for real-time channel",
                other
            )));
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| ConsoleError::Config(format!("cannot convert {} to {}", http_base, scheme)))?;
    url.set_path("/socket.io/");
    url.set_query(Some("EIO=4&transport=websocket"));
    Ok(url.to_string())
}

/// Owns the background connection task; dropping it closes the channel
#[derive(Debug)]
pub struct RealtimeHandle {
    url: String,
    task: JoinHandle<()>,
}

impl RealtimeHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for RealtimeHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a reconnecting connection that publishes into `hub`
pub fn spawn(http_base: &str, hub: EventHub, backoff: Backoff) -> Result<RealtimeHandle> {
    let url = socket_url(http_base)?;
    log::info!("Opening real-time channel {}", url);
    let task_url = url.clone();
    let task = tokio::spawn(async move {
        run(task_url, hub, backoff).await;
    });
    Ok(RealtimeHandle { url, task })
}

async fn run(url: String, hub: EventHub, backoff: Backoff) {
    let mut delay = backoff.initial;
    loop {
        let (connected, result) = session(&url, &hub).await;
        if let Err(e) = result {
            log::debug!("real-time session ended: {}", e);
        }
        if connected {
            delay = backoff.initial;
        }
        tokio::time::sleep(delay).await;
        delay = backoff.next(delay);
    }
}

/// One WebSocket session. Returns whether the namespace connect succeeded, so
/// the caller can reset its back-off.
async fn session(url: &str, hub: &EventHub) -> (bool, Result<()>) {
    let ws_stream = match connect_async(url).await {
        Ok((stream, _)) => stream,
        Err(e) => return (false, Err(e.into())),
    };
    let (mut sink, mut stream) = ws_stream.split();

    let handshake = match stream.next().await {
        Some(Ok(Message::Text(text))) => match EnginePacket::decode(&text) {
            Ok(EnginePacket::Open(handshake)) => handshake,
            Ok(other) => {
                return (
                    false,
                    Err(ConsoleError::Protocol(format!(
                        "expected open packet, got {:?}",
                        other
                    ))),
                );
            }
            Err(e) => return (false, Err(e)),
        },
        Some(Ok(other)) => {
            return (
                false,
                Err(ConsoleError::Protocol(format!(
                    "expected text handshake, got {:?}",
                    other
                ))),
            );
        }
        Some(Err(e)) => return (false, Err(e.into())),
        None => {
            return (
                false,
                Err(ConsoleError::Transport("closed before handshake".into())),
            );
        }
    };
    log::debug!(
        "Engine.IO open sid={} ping={}ms/{}ms",
        handshake.sid,
        handshake.ping_interval,
        handshake.ping_timeout
    );

    let connect = EnginePacket::Message(SocketPacket::connect().encode()).encode();
    if let Err(e) = sink.send(Message::Text(connect)).await {
        return (false, Err(e.into()));
    }

    let liveness = Duration::from_millis(handshake.ping_interval + handshake.ping_timeout);
    let mut connected = false;

    let result = loop {
        let message = match tokio::time::timeout(liveness, stream.next()).await {
            Err(_) => break Err(ConsoleError::Transport("ping timeout".into())),
            Ok(None) => break Ok(()),
            Ok(Some(Err(e))) => break Err(e.into()),
            Ok(Some(Ok(message))) => message,
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break Ok(()),
            Message::Ping(payload) => {
                if let Err(e) = sink.send(Message::Pong(payload)).await {
                    break Err(e.into());
                }
                continue;
            }
            _ => continue,
        };

        let packet = match EnginePacket::decode(&text) {
            Ok(packet) => packet,
            Err(e) => {
                log::warn!("ignoring frame: {}", e);
                continue;
            }
        };

        match packet {
            EnginePacket::Ping(data) => {
                let pong = EnginePacket::Pong(data).encode();
                if let Err(e) = sink.send(Message::Text(pong)).await {
                    break Err(e.into());
                }
            }
            EnginePacket::Close => break Ok(()),
            EnginePacket::Message(payload) => match SocketPacket::decode(&payload) {
                Ok(SocketPacket::Connect { .. }) => {
                    connected = true;
                    log::info!("Real-time channel connected");
                    hub.publish(ServerEvent::Connected);
                }
                Ok(SocketPacket::Event { name, data, .. }) => {
                    hub.publish(ServerEvent::from_socket_event(&name, data));
                }
                Ok(SocketPacket::Disconnect { .. }) => break Ok(()),
                Ok(SocketPacket::ConnectError { data, .. }) => {
                    break Err(ConsoleError::Protocol(format!(
                        "namespace connect refused: {}",
                        data
                    )));
                }
                Ok(SocketPacket::Ack { .. }) => {}
                Err(e) => log::warn!("ignoring Socket.IO packet: {}", e),
            },
            EnginePacket::Open(_) | EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {}
        }
    };

    if connected {
        log::info!("Real-time channel disconnected");
        hub.publish(ServerEvent::Disconnected);
    }
    (connected, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_url_from_http_base() {
        assert_eq!(
            socket_url("http://localhost:5000").unwrap(),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            socket_url("https://overlay.example:8443/").unwrap(),
            "wss://overlay.example:8443/socket.io/?EIO=4&transport=websocket"
        );
        assert!(socket_url("ftp://localhost").is_err());
    }

    #[test]
    fn test_backoff_caps() {
        let backoff = Backoff {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(3),
        };
        let second = backoff.next(backoff.initial);
        assert_eq!(second, Duration::from_secs(1));
        assert_eq!(backoff.next(Duration::from_secs(2)), Duration::from_secs(3));
        assert_eq!(backoff.next(Duration::from_secs(3)), Duration::from_secs(3));
    }
}
