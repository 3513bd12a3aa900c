//! The `wclap_plugin_entry` proxy (`spec.md` §3 "Module", §4.F): the three function-table
//! indices baked into every bundle's `clap_entry` export, read once when a [`Module`] is opened
//! and an [`Instance`] is live.

use crate::error::BridgeError;
use wclap_common::abi::layout::entry::{DEINIT_FN_OFFSET, GET_FACTORY_FN_OFFSET, INIT_FN_OFFSET};
use wclap_common::abi::SandboxWord;
use wclap_engine::Instance;

fn read_table_index(instance: &Instance, ptr: SandboxWord, offset: u64) -> Result<u32, BridgeError> {
    let bytes = instance.read_memory(ptr.offset(offset), 4)?;
    Ok(u32::from_le_bytes(bytes[..4].try_into().unwrap()))
}

/// The entry point exposed by a bundle: `init`, `deinit`, `get_factory`, resolved once per
/// [`Instance`] from the `clap_entry` global's target struct.
pub struct Entry {
    init_fn: u32,
    deinit_fn: u32,
    get_factory_fn: u32,
}

impl Entry {
    /// Reads the three function table indices out of the `wclap_plugin_entry` record.
    pub fn resolve(instance: &Instance) -> Result<Self, BridgeError> {
        let ptr = instance.entry_pointer();
        Ok(Self {
            init_fn: read_table_index(instance, ptr, INIT_FN_OFFSET)?,
            deinit_fn: read_table_index(instance, ptr, DEINIT_FN_OFFSET)?,
            get_factory_fn: read_table_index(instance, ptr, GET_FACTORY_FN_OFFSET)?,
        })
    }

    /// Calls `init(plugin_path)`. Per `spec.md` §4.C, a `false` return is a distinct failure from
    /// a trap: the caller should treat it as [`BridgeError::InitFailed`], not retry.
    pub fn init(&self, instance: &Instance, plugin_path: SandboxWord) -> Result<bool, BridgeError> {
        Ok(instance.call_table_fn_bool(self.init_fn, &[plugin_path])?)
    }

    /// Calls `deinit()`.
    pub fn deinit(&self, instance: &Instance) -> Result<(), BridgeError> {
        Ok(instance.call_table_fn_void(self.deinit_fn, &[])?)
    }

    /// Calls `get_factory(factory_id)`, returning a null [`SandboxWord`] if the bundle does not
    /// support the requested factory id.
    pub fn get_factory(&self, instance: &Instance, factory_id: SandboxWord) -> Result<SandboxWord, BridgeError> {
        Ok(instance.call_table_fn_word(self.get_factory_fn, &[factory_id])?)
    }
}
