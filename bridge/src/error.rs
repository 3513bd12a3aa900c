//! Error types raised by the Bridge (`spec.md` §4.F, §7).

use wclap_engine::{EngineError, InstanceError};
use wclap_marshal::MarshalError;

/// A failure raised while the Bridge is servicing a host call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// The sandbox module could not be opened or is malformed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// A sandbox instance failed to start, trapped, or was poisoned by a prior trap.
    #[error(transparent)]
    Instance(#[from] InstanceError),
    /// Translating a value across the sandbox boundary failed.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
    /// `createPlugin` was asked for a plugin id the bundle does not advertise.
    #[error("no plugin with id {0:?} in this bundle")]
    PluginNotFound(String),
    /// The sandbox's `create_plugin` export returned a null pointer.
    #[error("sandbox rejected plugin instantiation")]
    InstantiationFailed,
    /// The sandbox's `init` returned `false`.
    #[error("plugin failed to initialize")]
    InitFailed,
    /// A host-side IndexLookup slot was resolved after release, or never allocated.
    #[error("stale or unknown host index {0}")]
    StaleIndex(u32),
}
