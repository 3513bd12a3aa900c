//! The WebAssembly engine, module shape detection, and sandboxed instance lifecycle.
//!
//! This crate implements components A–D of the WCLAP bridge: [`Engine`] (one process-wide
//! `wasmtime` engine with an optional epoch ticker), [`Module`] (compiled bundle bytes plus
//! discovered shape), [`Instance`] (one live execution context), and [`Arena`] (the bump
//! allocator pair used to marshal one logical call). [`wclap-marshal`](https://docs.rs/wclap-marshal)
//! builds the per-struct translation on top of the primitives exposed here.

mod arena;
mod engine;
mod error;
mod instance;
mod module;

pub use arena::{Arena, ArenaPool, ArenaScope, ARENA_SIZE};
pub use engine::Engine;
pub use error::{EngineError, InstanceError};
pub use instance::{Instance, WasiDirs};
pub use module::{Module, ModuleShape};
