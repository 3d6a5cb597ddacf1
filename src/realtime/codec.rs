//! Engine.IO v4 / Socket.IO v4 text packet codec
//!
//! Only the text subset used by Flask-SocketIO over the WebSocket transport is
//! supported. Binary attachments are rejected as protocol errors.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{ConsoleError, Result};

/// Handshake payload of the Engine.IO `open` packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(frame: &str) -> Result<Self> {
        let mut chars = frame.chars();
        let kind = chars
            .next()
            .ok_or_else(|| ConsoleError::Protocol("empty Engine.IO frame".into()))?;
        let body = chars.as_str();

        let packet = match kind {
            '0' => EnginePacket::Open(serde_json::from_str(body).map_err(|e| {
                ConsoleError::Protocol(format!("invalid handshake '{}': {}", body, e))
            })?),
            '1' => EnginePacket::Close,
            '2' => EnginePacket::Ping(body.to_string()),
            '3' => EnginePacket::Pong(body.to_string()),
            '4' => EnginePacket::Message(body.to_string()),
            '5' => EnginePacket::Upgrade,
            '6' => EnginePacket::Noop,
            other => {
                return Err(ConsoleError::Protocol(format!(
                    "unknown Engine.IO packet type '{}'",
                    other
                )));
            }
        };
        Ok(packet)
    }

    /// Encode client-originated packets
    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(_) => "0".to_string(),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(data) => format!("2{}", data),
            EnginePacket::Pong(data) => format!("3{}", data),
            EnginePacket::Message(data) => format!("4{}", data),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

pub const DEFAULT_NAMESPACE: &str = "/";

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack: Option<u64>,
        name: String,
        data: Value,
    },
    Ack {
        namespace: String,
        ack: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        data: Value,
    },
}

impl SocketPacket {
    pub fn connect() -> Self {
        SocketPacket::Connect {
            namespace: DEFAULT_NAMESPACE.to_string(),
            data: None,
        }
    }

    pub fn decode(payload: &str) -> Result<Self> {
        let mut chars = payload.chars();
        let kind = chars
            .next()
            .ok_or_else(|| ConsoleError::Protocol("empty Socket.IO packet".into()))?;
        let mut rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            return Err(ConsoleError::Protocol(
                "binary Socket.IO packets are not supported".into(),
            ));
        }

        let namespace = if rest.starts_with('/') {
            let end = rest.find(',').unwrap_or(rest.len());
            let ns = rest[..end].to_string();
            rest = rest.get(end + 1..).unwrap_or("");
            ns
        } else {
            DEFAULT_NAMESPACE.to_string()
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let ack = if digits > 0 {
            let id = rest[..digits]
                .parse::<u64>()
                .map_err(|e| ConsoleError::Protocol(format!("bad ack id: {}", e)))?;
            rest = &rest[digits..];
            Some(id)
        } else {
            None
        };

        let data: Option<Value> = if rest.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(rest)
                    .map_err(|e| ConsoleError::Protocol(format!("bad packet data: {}", e)))?,
            )
        };

        match kind {
            '0' => Ok(SocketPacket::Connect { namespace, data }),
            '1' => Ok(SocketPacket::Disconnect { namespace }),
            '2' => {
                let mut args = match data {
                    Some(Value::Array(items)) => items.into_iter(),
                    _ => {
                        return Err(ConsoleError::Protocol(
                            "event payload must be an array".into(),
                        ));
                    }
                };
                let name = match args.next() {
                    Some(Value::String(name)) => name,
                    _ => {
                        return Err(ConsoleError::Protocol(
                            "event payload must start with a name".into(),
                        ));
                    }
                };
                let data = args.next().unwrap_or(Value::Null);
                Ok(SocketPacket::Event {
                    namespace,
                    ack,
                    name,
                    data,
                })
            }
            '3' => {
                let ack = ack.ok_or_else(|| ConsoleError::Protocol("ack without id".into()))?;
                let args = match data {
                    Some(Value::Array(items)) => items,
                    Some(other) => vec![other],
                    None => Vec::new(),
                };
                Ok(SocketPacket::Ack {
                    namespace,
                    ack,
                    args,
                })
            }
            '4' => Ok(SocketPacket::ConnectError {
                namespace,
                data: data.unwrap_or(Value::Null),
            }),
            other => Err(ConsoleError::Protocol(format!(
                "unknown Socket.IO packet type '{}'",
                other
            ))),
        }
    }

    pub fn encode(&self) -> String {
        fn ns_prefix(namespace: &str) -> String {
            if namespace == DEFAULT_NAMESPACE {
                String::new()
            } else {
                format!("{},", namespace)
            }
        }

        match self {
            SocketPacket::Connect { namespace, data } => {
                let body = data.as_ref().map(Value::to_string).unwrap_or_default();
                format!("0{}{}", ns_prefix(namespace), body)
            }
            SocketPacket::Disconnect { namespace } => format!("1{}", ns_prefix(namespace)),
            SocketPacket::Event {
                namespace,
                ack,
                name,
                data,
            } => {
                let args = Value::Array(vec![Value::String(name.clone()), data.clone()]);
                let ack = ack.map(|id| id.to_string()).unwrap_or_default();
                format!("2{}{}{}", ns_prefix(namespace), ack, args)
            }
            SocketPacket::Ack {
                namespace,
                ack,
                args,
            } => format!(
                "3{}{}{}",
                ns_prefix(namespace),
                ack,
                Value::Array(args.clone())
            ),
            SocketPacket::ConnectError { namespace, data } => {
                format!("4{}{}", ns_prefix(namespace), data)
            }
        }
    }
}
