//! Real-time channel: Socket.IO client, packet codec and event hub

pub mod codec;
pub mod connection;
pub mod hub;

pub use connection::{Backoff, RealtimeHandle, socket_url, spawn};
pub use hub::{EventHub, Subscription};
