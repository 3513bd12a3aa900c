//! Plugin descriptor translation (`spec.md` §4.E.6, nested struct) and the id/name namespacing
//! applied to every descriptor crossing the boundary (`spec.md` §4.E, "Plugin descriptor name
//! suffix").
//!
//! Every descriptor translated out of the sandbox gets its id prefixed and its name suffixed, so
//! a bundle's ids can never collide with a native plugin's. `createPlugin` reverses the id
//! translation before calling into the sandbox.

use crate::array::string_array_from_sandbox;
use crate::error::MarshalError;
use crate::string::default_string_from_sandbox;
use crate::wire::read_word;
use wclap_common::abi::layout::plugin_descriptor::*;
use wclap_common::abi::layout::DEFAULT_MAX_ARRAY_LEN;
use wclap_common::abi::SandboxWord;
use wclap_engine::Instance;

/// One plugin descriptor, already translated to native strings (`spec.md` §3, `CacheEntry`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub url: String,
    pub manual_url: String,
    pub support_url: String,
    pub version: String,
    pub description: String,
    pub features: Vec<String>,
}

/// Configured namespacing applied to every descriptor crossing the boundary.
#[derive(Debug, Clone)]
pub struct DescriptorNamespace {
    pub id_prefix: String,
    pub name_prefix: String,
    pub name_suffix: String,
}

impl Default for DescriptorNamespace {
    fn default() -> Self {
        Self { id_prefix: String::new(), name_prefix: String::new(), name_suffix: " (WCLAP)".to_string() }
    }
}

/// `wasmToNative`: reads the `wclap_plugin_descriptor` record at `ptr` field by field. Each
/// string field is read through [`default_string_from_sandbox`]; a missing (null) string
/// translates to an empty native string, since `PluginDescriptor`'s fields are not optional.
pub fn descriptor_from_sandbox(instance: &Instance, ptr: SandboxWord) -> Result<PluginDescriptor, MarshalError> {
    let width = if instance.is_sixty_four_bit() { 8 } else { 4 };
    let field_ptr = |offset_words: u64| -> Result<SandboxWord, MarshalError> {
        let raw = instance.read_memory(ptr.offset(offset_words * width as u64), width)?;
        Ok(read_word(&raw, instance.is_sixty_four_bit()))
    };
    let field_string = |offset_words: u64| -> Result<String, MarshalError> {
        Ok(default_string_from_sandbox(instance, field_ptr(offset_words)?)?.unwrap_or_default())
    };

    Ok(PluginDescriptor {
        id: field_string(ID_OFFSET_WORDS)?,
        name: field_string(NAME_OFFSET_WORDS)?,
        vendor: field_string(VENDOR_OFFSET_WORDS)?,
        url: field_string(URL_OFFSET_WORDS)?,
        manual_url: field_string(MANUAL_URL_OFFSET_WORDS)?,
        support_url: field_string(SUPPORT_URL_OFFSET_WORDS)?,
        version: field_string(VERSION_OFFSET_WORDS)?,
        description: field_string(DESCRIPTION_OFFSET_WORDS)?,
        features: string_array_from_sandbox(instance, field_ptr(FEATURES_OFFSET_WORDS)?, DEFAULT_MAX_ARRAY_LEN)?,
    })
}

impl DescriptorNamespace {
    /// `wasmToNative`: applies the prefix/suffix to a descriptor freshly read out of a bundle.
    pub fn apply(&self, mut descriptor: PluginDescriptor) -> PluginDescriptor {
        descriptor.id = format!("{}{}", self.id_prefix, descriptor.id);
        descriptor.name = format!("{}{}{}", self.name_prefix, descriptor.name, self.name_suffix);
        descriptor
    }

    /// `createPlugin`'s id translation: strips the configured prefix before the id is passed into
    /// the sandbox. Returns `None` if `id` does not carry the prefix at all (the host asked for a
    /// plugin id the bridge never advertised).
    pub fn strip_id_prefix<'a>(&self, id: &'a str) -> Option<&'a str> {
        id.strip_prefix(self.id_prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PluginDescriptor {
        PluginDescriptor {
            id: "com.example.synth".into(),
            name: "Example Synth".into(),
            vendor: "Example".into(),
            url: String::new(),
            manual_url: String::new(),
            support_url: String::new(),
            version: "1.0.0".into(),
            description: String::new(),
            features: vec!["instrument".into()],
        }
    }

    #[test]
    fn apply_prefixes_id_and_suffixes_name() {
        let ns = DescriptorNamespace { id_prefix: "wclap.".into(), name_prefix: String::new(), name_suffix: " (WCLAP)".into() };
        let translated = ns.apply(sample());
        assert_eq!(translated.id, "wclap.com.example.synth");
        assert_eq!(translated.name, "Example Synth (WCLAP)");
    }

    #[test]
    fn strip_id_prefix_round_trips_with_apply() {
        let ns = DescriptorNamespace { id_prefix: "wclap.".into(), name_prefix: String::new(), name_suffix: " (WCLAP)".into() };
        let translated = ns.apply(sample());
        assert_eq!(ns.strip_id_prefix(&translated.id), Some("com.example.synth"));
    }

    #[test]
    fn strip_id_prefix_rejects_foreign_ids() {
        let ns = DescriptorNamespace { id_prefix: "wclap.".into(), name_prefix: String::new(), name_suffix: String::new() };
        assert_eq!(ns.strip_id_prefix("com.other.plugin"), None);
    }
}
