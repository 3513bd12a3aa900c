//! The plugin factory (`spec.md` §4.F "Factory"): constructed lazily when the outer C ABI's
//! `getFactory(PLUGIN_FACTORY_ID)` is called, enumerates the bundle's plugin descriptors once by
//! calling into the sandbox, and caches them in native memory for the Module's lifetime.

use crate::config::BridgeConfig;
use crate::entry::Entry;
use crate::error::BridgeError;
use std::sync::OnceLock;
use wclap_common::abi::layout::plugin_factory::{
    CREATE_PLUGIN_FN_OFFSET, GET_PLUGIN_COUNT_FN_OFFSET, GET_PLUGIN_DESCRIPTOR_FN_OFFSET,
};
use wclap_common::abi::SandboxWord;
use wclap_engine::{Arena, ArenaPool, Instance};
use wclap_marshal::{descriptor_from_sandbox, string_to_sandbox, DescriptorNamespace, PluginDescriptor};

/// The standard CLAP plugin-factory id this bridge answers `getFactory` requests for.
pub const PLUGIN_FACTORY_ID: &str = "clap.plugin-factory";

/// Function table indices resolved once from the bundle's `wclap_plugin_factory` record.
struct FactoryFns {
    get_plugin_count: u32,
    get_plugin_descriptor: u32,
    create_plugin: u32,
}

/// The Bridge's plugin factory, lazily populated the first time a host asks for it.
pub struct Factory<'a> {
    instance: &'a Instance,
    namespace: DescriptorNamespace,
    fns: FactoryFns,
    descriptors: OnceLock<Vec<PluginDescriptor>>,
}

impl<'a> Factory<'a> {
    /// Looks up the bundle's plugin factory through its [`Entry`]. Returns `Ok(None)` if the
    /// bundle does not implement `clap.plugin-factory`, matching `getFactory`'s "id not
    /// supported" outcome rather than erroring.
    pub fn open(instance: &'a Instance, entry: &Entry, config: &BridgeConfig) -> Result<Option<Self>, BridgeError> {
        let mut pool = ArenaPool::new();
        let mut arena = pool.claim(|| instance.malloc_arena())?;
        let mut scope = arena.scope();
        let id_ptr = string_to_sandbox(&mut scope, Some(PLUGIN_FACTORY_ID), PLUGIN_FACTORY_ID.len() + 1)?;
        drop(scope);
        arena.flush(instance)?;
        let factory_ptr = entry.get_factory(instance, id_ptr)?;
        if factory_ptr.is_null() {
            return Ok(None);
        }

        let fns = FactoryFns {
            get_plugin_count: read_fn_index(instance, factory_ptr, GET_PLUGIN_COUNT_FN_OFFSET)?,
            get_plugin_descriptor: read_fn_index(instance, factory_ptr, GET_PLUGIN_DESCRIPTOR_FN_OFFSET)?,
            create_plugin: read_fn_index(instance, factory_ptr, CREATE_PLUGIN_FN_OFFSET)?,
        };

        Ok(Some(Self { instance, namespace: config.into(), fns, descriptors: OnceLock::new() }))
    }

    /// The namespaced plugin descriptors exposed by this bundle, enumerated once and cached for
    /// the Module's lifetime (`spec.md` §4.F).
    pub fn descriptors(&self) -> Result<&[PluginDescriptor], BridgeError> {
        if let Some(cached) = self.descriptors.get() {
            return Ok(cached);
        }
        let count = self.instance.call_table_fn_u32(self.fns.get_plugin_count, &[])?;
        let mut descriptors = Vec::with_capacity(count as usize);
        for index in 0..count {
            let index_word = SandboxWord::from_u64(u64::from(index), self.instance.is_sixty_four_bit());
            let ptr = self.instance.call_table_fn_word(self.fns.get_plugin_descriptor, &[index_word])?;
            if ptr.is_null() {
                continue;
            }
            let descriptor = descriptor_from_sandbox(self.instance, ptr)?;
            descriptors.push(self.namespace.apply(descriptor));
        }
        Ok(self.descriptors.get_or_init(|| descriptors))
    }

    /// `createPlugin`: strips the configured id prefix and calls the sandbox's `create_plugin`,
    /// returning the sandbox pointer to the newly created plugin object. `host` is the sandbox
    /// pointer to the proxy host struct the Bridge already built for this connection.
    pub fn create_plugin(
        &self,
        arena: &mut Arena,
        plugin_id: &str,
        host: SandboxWord,
    ) -> Result<SandboxWord, BridgeError> {
        let stripped = self
            .namespace
            .strip_id_prefix(plugin_id)
            .ok_or_else(|| BridgeError::PluginNotFound(plugin_id.to_string()))?;

        let mut scope = arena.scope();
        let id_ptr = string_to_sandbox(&mut scope, Some(stripped), stripped.len() + 1)?;
        drop(scope);
        arena.flush(self.instance)?;

        let ptr = self.instance.call_table_fn_word(self.fns.create_plugin, &[host, id_ptr])?;
        if ptr.is_null() {
            return Err(BridgeError::InstantiationFailed);
        }
        Ok(ptr)
    }
}

fn read_fn_index(instance: &Instance, ptr: SandboxWord, offset: u64) -> Result<u32, BridgeError> {
    let bytes = instance.read_memory(ptr.offset(offset), 4)?;
    Ok(u32::from_le_bytes(bytes[..4].try_into().unwrap()))
}
