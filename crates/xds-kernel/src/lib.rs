//! Session core of the xds editor.
//!
//! Everything here is synchronous and free of I/O: the [`controller::SessionController`] reacts to
//! [`action::AppAction`]s, mutates the owned [`state::SessionState`], and talks to the outside world
//! only through the collaborator traits in [`ports`]. Completions of collaborator requests come
//! back as further actions on the same queue.

pub mod action;
pub mod controller;
pub mod error;
pub mod git;
pub mod media;
pub mod ports;
pub mod settings;
pub mod state;
pub mod terminal;
