//! Shared CLAP ABI types and dual-width sandbox primitives used throughout the WCLAP bridge.
//!
//! This crate has no opinion on *how* a struct crosses the sandbox boundary — that is
//! [`wclap-marshal`](https://docs.rs/wclap-marshal)'s job. It only defines the data that is common
//! to both sides of that boundary: the native CLAP ABI structures (straight from `clap-sys`),
//! the sandbox's dual-width pointer representation, and small value types (versions, ids,
//! cookies) that appear unmodified on both sides.

pub mod abi;
pub mod events;
pub mod extensions;
pub mod factory;
pub mod plugin;
pub mod ports;
pub mod process;
pub mod stream;
pub mod utils;
pub mod version;
