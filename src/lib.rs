//! Library entrypoint for upload-steam.
//!
//! The primary interface is the `upload-steam` binary. This lib target
//! exists to expose the internal modules to integration tests.

pub mod config;
pub mod error;
pub mod output;
pub mod resolve;
pub mod steamcmd;
