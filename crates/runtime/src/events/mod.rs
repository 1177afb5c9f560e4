//! Topic-based event bus for runtime events.
//!
//! Engine events are published to the topic they belong to, and consumers
//! subscribe only to the topics they need.

mod bus;

pub use bus::{Event, EventBus, Topic};
