//! Error kinds surfaced by the engine, module, and instance layers (`spec.md` §7).

/// Failures that can occur before any sandbox code has run: engine lifecycle misuse, or a
/// bundle whose shape doesn't satisfy the sandbox ABI contract.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `globalInit` was called with a different deadline while a module is still alive.
    #[error("engine is already initialized with a different deadline")]
    DeadlineMismatch,
    /// The module's exports/imports don't satisfy the required shape.
    #[error("{0}")]
    Configuration(String),
    /// Compiling the bundle's wasm bytes failed.
    #[error("failed to compile module: {0}")]
    Compile(String),
}

impl EngineError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Failures that can occur once an instance is live (`spec.md` §7, kinds 2–4).
///
/// An [`Instance`](crate::Instance) remembers the *first* such error verbatim and refuses
/// further calls afterward — this type is that preserved error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InstanceError {
    /// A WASI grant or directory preopen failed during setup.
    #[error("link error: {0}")]
    Link(String),
    /// The sandbox trapped (division by zero, out-of-bounds, unreachable, etc).
    #[error("trapped: {0}")]
    Trap(String),
    /// The per-call epoch deadline expired before the sandbox call returned.
    #[error("timeout")]
    Timeout,
    /// `_initialize` or another required setup call failed; per spec.md §9(c) this is fatal.
    #[error("initialization failed: {0}")]
    InitializationFailed(String),
}

impl InstanceError {
    /// Whether this error's message contains the given substring, for callers that need to
    /// pattern-match on `getError()`'s text (e.g. the "trapped" substring in scenario 4).
    pub fn message_contains(&self, needle: &str) -> bool {
        self.to_string().contains(needle)
    }
}
