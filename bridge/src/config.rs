//! Bridge configuration (`spec.md` §6.2, ADDED ambient configuration surface).

/// Configuration applied when a bundle is opened. Every field has a spec-mandated default so a
/// bridge can be opened with `BridgeConfig::default()`.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Prepended to every plugin id exposed to the real host, so a bundle's ids can never
    /// collide with a native plugin shipped alongside it.
    pub id_prefix: String,
    /// Prepended to every plugin name exposed to the real host.
    pub name_prefix: String,
    /// Appended to every plugin name exposed to the real host.
    pub name_suffix: String,
    /// Upper bound, in bytes, on any string read out of sandbox memory via the Marshaller.
    pub max_log_string_len: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            id_prefix: String::new(),
            name_prefix: String::new(),
            name_suffix: " (WCLAP)".to_string(),
            max_log_string_len: wclap_common::abi::layout::DEFAULT_MAX_STRING_LEN,
        }
    }
}

impl From<&BridgeConfig> for wclap_marshal::DescriptorNamespace {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            id_prefix: config.id_prefix.clone(),
            name_prefix: config.name_prefix.clone(),
            name_suffix: config.name_suffix.clone(),
        }
    }
}
