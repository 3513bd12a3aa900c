//! The Bridge (`spec.md` §4.F): the outward-facing plugin factory and plugin objects a real CLAP
//! host sees, backed internally by calls into a sandboxed WCLAP bundle. `wclap-ffi` builds the
//! raw `extern "C"` vtables a host actually links against and calls through to the types here.

mod config;
mod entry;
mod error;
mod factory;
mod index_lookup;
mod metadata_cache;
mod plugin;
mod webview;

pub use config::BridgeConfig;
pub use entry::Entry;
pub use error::BridgeError;
pub use factory::{Factory, PLUGIN_FACTORY_ID};
pub use index_lookup::{IndexHandle, IndexLookup};
pub use metadata_cache::{CacheEntry, MetadataCache};
pub use plugin::{HostCallbackTable, Plugin, PluginState};
pub use webview::{NullWebviewHost, WebviewHost, WindowHandle};
