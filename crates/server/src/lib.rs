//! Playshelf server library.
//!
//! Exposed as a library so integration tests can build the router in-process
//! with mock dependencies; the `playshelf` binary lives in `main.rs`.

pub mod api;
pub mod metrics;
pub mod sessions;
pub mod state;
