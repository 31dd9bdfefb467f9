//! Dispatcher console core: resource ranking, selection, and the console
//! state machine driven by discrete events.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod geo;
pub mod intake;
#[cfg(feature = "journal")]
pub mod journal;
#[cfg(feature = "llm")]
pub mod llm;
pub mod ranking;
pub mod resources;
pub mod rules;
pub mod selection;
pub mod services;
pub mod state;

pub use error::ConsoleError;
pub use state::{reduce, ConsoleEvent, ConsoleState};
