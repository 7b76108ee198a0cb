//! Flashcard study core: deck, filtering, navigation, feedback and storage.
//!
//! The terminal front end in `main.rs` drives a [`session::StudySession`];
//! everything it needs to render or persist is reachable from here.

pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod session;
pub mod sink;
pub mod store;
