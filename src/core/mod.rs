//! Core library components.
//!
//! Configuration loading, path resolution, the storage backends with their
//! dispatcher, and the sync operations built on top of them.

pub mod config;
pub mod constants;
pub mod domain;
pub mod local;
pub mod path;
pub mod storage;
pub mod sync;
