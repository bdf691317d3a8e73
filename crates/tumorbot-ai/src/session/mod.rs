//! Conversation session management.
//!
//! A `Session` holds the bounded turn history and the latest reference
//! snippets, and runs one exchange at a time against an `AiClient`.
//! Locking lives one level up in `TumorBot`.

mod chat;
mod manager;
mod types;

#[cfg(test)]
mod tests;

pub use manager::Session;
pub use types::SessionSettings;
