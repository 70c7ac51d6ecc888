//! Factory layer: configuration and construction of event trees.
//!
//! Internal modules:
//! - `config`: [`EventConfig`], settings shared by a tree;
//! - `builder`: [`SingleEvent`] / [`SingleEventBuilder`] and the `create_single_event`
//!   / `single_event` shorthands.

mod builder;
mod config;

pub use builder::{SingleEvent, SingleEventBuilder, create_single_event, single_event};
pub use config::EventConfig;
