//! The bridge-side `Plugin` object (`spec.md` §3 "Plugin (bridge-side)", §4.F "Plugin creation").
//!
//! Mirrors the split between `clack-host`'s safe `Plugin`/`PluginInstance` wrapper and its raw
//! vtable: here, [`Plugin`] is the typed, safe layer that locks the right [`Instance`], opens an
//! arena scope, marshals arguments in, calls the sandbox, marshals results out, and releases —
//! `wclap-ffi` builds the `extern "C" clap_plugin_t` that calls through to these methods, and
//! also owns the four host-callback trampolines this Plugin's proxy host struct points at.

use crate::error::BridgeError;
use crate::index_lookup::IndexHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wclap_common::abi::layout::host_proxy::{
    GET_EXTENSION_FN_OFFSET_WORDS, HOST_DATA_OFFSET_WORDS, REQUEST_CALLBACK_FN_OFFSET_WORDS,
    REQUEST_PROCESS_FN_OFFSET_WORDS, REQUEST_RESTART_FN_OFFSET_WORDS,
};
use wclap_common::abi::layout::plugin::{
    ACTIVATE_FN_OFFSET, DEACTIVATE_FN_OFFSET, DESTROY_FN_OFFSET, GET_EXTENSION_FN_OFFSET,
    INIT_FN_OFFSET, PROCESS_FN_OFFSET, RESET_FN_OFFSET, START_PROCESSING_FN_OFFSET,
    STOP_PROCESSING_FN_OFFSET,
};
use wclap_common::abi::SandboxWord;
use wclap_engine::{Arena, ArenaPool, Instance};
use wclap_marshal::{string_to_sandbox, PluginDescriptor};

/// The four host-callback function table indices a [`Plugin`]'s proxy host struct points at.
/// Registered once (typically per [`Instance`]) by `wclap-ffi`, which owns the actual trampoline
/// bodies since it is the layer with the freedom to dispatch back out to the real host.
#[derive(Debug, Clone, Copy)]
pub struct HostCallbackTable {
    pub get_extension_fn: u32,
    pub request_restart_fn: u32,
    pub request_process_fn: u32,
    pub request_callback_fn: u32,
}

/// `spec.md` §4.F "State machine per Plugin". Transitions are driven by host calls and are not
/// re-validated here: "Violations are reported by the sandboxed plugin, not checked again by the
/// bridge" — this enum exists so the Bridge can route `process` to the right arena/instance and
/// so [`Plugin::drop`] can assert the one invariant that *is* the Bridge's to enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    Created,
    Initialized,
    Activated,
    Processing,
}

/// A native plugin object wrapping one sandboxed `clap_plugin` (`spec.md` §3). Created by
/// [`crate::Factory::create_plugin`], destroyed only through [`Plugin::destroy`].
pub struct Plugin {
    instance: Arc<Instance>,
    audio_instance: Arc<Instance>,
    sandbox_ptr: SandboxWord,
    host_ptr: SandboxWord,
    descriptor: PluginDescriptor,
    index: IndexHandle,
    persistent_arena: Arena,
    state: PluginState,
    destroy_was_called: AtomicBool,
}

impl Plugin {
    /// Builds the sandbox-side host proxy in a freshly claimed persistent arena, then wraps an
    /// already-created sandbox plugin pointer (`spec.md` §4.F "Plugin creation"). `index` is the
    /// [`crate::IndexLookup`] slot the caller already reserved for this Plugin, so that the
    /// `host_data` word baked into the proxy resolves sandbox-to-host callbacks back to it.
    pub fn build_host_proxy(
        instance: &Instance,
        pool: &mut ArenaPool,
        index: IndexHandle,
        callbacks: HostCallbackTable,
    ) -> Result<(Arena, SandboxWord), BridgeError> {
        let mut arena = pool.claim(|| instance.malloc_arena())?;
        let width = arena.is_sixty_four_bit() as u64 * 4 + 4;
        let host_ptr = {
            let mut scope = arena.scope();
            let (base_offset, host_ptr) = scope.array(5, width as usize, width as usize)?;
            let word_at = |w: u64| SandboxWord::from_u64(w, arena.is_sixty_four_bit());
            scope.write_native(
                base_offset + (HOST_DATA_OFFSET_WORDS * width) as usize,
                &encode_word(word_at(u64::from(index.as_raw())), width as usize),
            );
            scope.write_native(
                base_offset + (GET_EXTENSION_FN_OFFSET_WORDS * width) as usize,
                &encode_word(word_at(u64::from(callbacks.get_extension_fn)), width as usize),
            );
            scope.write_native(
                base_offset + (REQUEST_RESTART_FN_OFFSET_WORDS * width) as usize,
                &encode_word(word_at(u64::from(callbacks.request_restart_fn)), width as usize),
            );
            scope.write_native(
                base_offset + (REQUEST_PROCESS_FN_OFFSET_WORDS * width) as usize,
                &encode_word(word_at(u64::from(callbacks.request_process_fn)), width as usize),
            );
            scope.write_native(
                base_offset + (REQUEST_CALLBACK_FN_OFFSET_WORDS * width) as usize,
                &encode_word(word_at(u64::from(callbacks.request_callback_fn)), width as usize),
            );
            scope.commit();
            host_ptr
        };
        arena.flush(instance)?;
        Ok((arena, host_ptr))
    }

    /// Wraps a sandbox plugin pointer already returned by `create_plugin`, per
    /// `spec.md` §4.F "Plugin creation". `audio_instance` is the dedicated realtime instance used
    /// for `process`/`start_processing`/`stop_processing`/`reset`/`params.flush` on a
    /// multi-threaded bundle, or the same instance as `instance` on a single-threaded one
    /// (`spec.md` §4, "Multi-threaded bundle").
    pub fn new(
        instance: Arc<Instance>,
        audio_instance: Arc<Instance>,
        sandbox_ptr: SandboxWord,
        host_ptr: SandboxWord,
        descriptor: PluginDescriptor,
        index: IndexHandle,
        persistent_arena: Arena,
    ) -> Self {
        Self {
            instance,
            audio_instance,
            sandbox_ptr,
            host_ptr,
            descriptor,
            index,
            persistent_arena,
            state: PluginState::Created,
            destroy_was_called: AtomicBool::new(false),
        }
    }

    pub fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> PluginState {
        self.state
    }

    pub fn index(&self) -> IndexHandle {
        self.index
    }

    fn call_void(&self, instance: &Instance, offset: u64) -> Result<(), BridgeError> {
        let table_index = self.vtable_fn(instance, offset)?;
        Ok(instance.call_table_fn_void(table_index, &[self.sandbox_ptr])?)
    }

    fn call_bool(&self, instance: &Instance, offset: u64) -> Result<bool, BridgeError> {
        let table_index = self.vtable_fn(instance, offset)?;
        Ok(instance.call_table_fn_bool(table_index, &[self.sandbox_ptr])?)
    }

    fn vtable_fn(&self, instance: &Instance, offset: u64) -> Result<u32, BridgeError> {
        let bytes = instance.read_memory(self.sandbox_ptr.offset(offset), 4)?;
        Ok(u32::from_le_bytes(bytes[..4].try_into().unwrap()))
    }

    /// `init()`. Transitions `Created -> Initialized`.
    pub fn init(&mut self) -> Result<bool, BridgeError> {
        let ok = self.call_bool(&self.instance, INIT_FN_OFFSET)?;
        if ok {
            self.state = PluginState::Initialized;
        }
        Ok(ok)
    }

    /// `activate(sample_rate, min_frames, max_frames)`. Transitions to `Activated`.
    pub fn activate(&mut self, sample_rate: f64, min_frames: u32, max_frames: u32) -> Result<bool, BridgeError> {
        let table_index = self.vtable_fn(&self.instance, ACTIVATE_FN_OFFSET)?;
        let mut pool = ArenaPool::new();
        let mut arena = pool.claim(|| self.instance.malloc_arena())?;
        let mut scope = arena.scope();
        let (offset, args_ptr) = scope.reserve(16, 8)?;
        scope.write_native(offset, &sample_rate.to_le_bytes());
        scope.write_native(offset + 8, &min_frames.to_le_bytes());
        scope.write_native(offset + 12, &max_frames.to_le_bytes());
        drop(scope);
        arena.flush(&self.instance)?;
        let ok = self.instance.call_table_fn_bool(table_index, &[self.sandbox_ptr, args_ptr])?;
        if ok {
            self.state = PluginState::Activated;
        }
        Ok(ok)
    }

    /// `deactivate()`. Transitions back to `Initialized`.
    pub fn deactivate(&mut self) -> Result<(), BridgeError> {
        self.call_void(&self.instance, DEACTIVATE_FN_OFFSET)?;
        self.state = PluginState::Initialized;
        Ok(())
    }

    /// `start_processing()`, called on the audio instance. Transitions to `Processing`.
    pub fn start_processing(&mut self) -> Result<bool, BridgeError> {
        let ok = self.call_bool(&self.audio_instance, START_PROCESSING_FN_OFFSET)?;
        if ok {
            self.state = PluginState::Processing;
        }
        Ok(ok)
    }

    /// `stop_processing()`, called on the audio instance. Transitions back to `Activated`.
    pub fn stop_processing(&mut self) -> Result<(), BridgeError> {
        self.call_void(&self.audio_instance, STOP_PROCESSING_FN_OFFSET)?;
        self.state = PluginState::Activated;
        Ok(())
    }

    /// `reset()`, called on the audio instance.
    pub fn reset(&self) -> Result<(), BridgeError> {
        self.call_void(&self.audio_instance, RESET_FN_OFFSET)
    }

    /// `process(process_ptr)`: forwards an already-marshalled `clap_process` struct pointer
    /// (built by the caller via `wclap_marshal::audio_buffer_to_sandbox`/`event_to_sandbox` into
    /// a realtime arena scope) to the sandbox's `process` export on the audio instance, per
    /// `spec.md` §4.F/§10 "Realtime safety". Returns the plugin's CLAP process status code.
    pub fn process(&self, process_ptr: SandboxWord) -> Result<u32, BridgeError> {
        let table_index = self.vtable_fn(&self.audio_instance, PROCESS_FN_OFFSET)?;
        Ok(self
            .audio_instance
            .call_table_fn_u32(table_index, &[self.sandbox_ptr, process_ptr])?)
    }

    /// `get_extension(name)`: per `spec.md` §4.F "Extension handshake", calls the sandbox once
    /// per supported extension name and returns the raw sandbox pointer (null if unsupported).
    /// Caching the result across repeated calls is the caller's responsibility (the handshake
    /// only needs to happen once per name per Plugin).
    pub fn get_extension(&self, name: &str) -> Result<SandboxWord, BridgeError> {
        let table_index = self.vtable_fn(&self.instance, GET_EXTENSION_FN_OFFSET)?;
        let mut pool = ArenaPool::new();
        let mut arena = pool.claim(|| self.instance.malloc_arena())?;
        let mut scope = arena.scope();
        let name_ptr = string_to_sandbox(&mut scope, Some(name), name.len() + 1)?;
        drop(scope);
        arena.flush(&self.instance)?;
        Ok(self.instance.call_table_fn_word(table_index, &[self.sandbox_ptr, name_ptr])?)
    }

    /// `destroy()`: the only legal way to end a Plugin's life (`spec.md` §3). Must be called
    /// exactly once; failing to call it before the Plugin is dropped is treated as the bundle
    /// tearing itself down abnormally, per `spec.md` §4, "For every Plugin, `destroy` is called
    /// exactly once before the Plugin is released, or the process aborts."
    pub fn destroy(&mut self) -> Result<(), BridgeError> {
        self.call_void(&self.instance, DESTROY_FN_OFFSET)?;
        self.destroy_was_called.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for Plugin {
    fn drop(&mut self) {
        if !self.destroy_was_called.load(Ordering::SeqCst) {
            log::error!(
                "plugin {:?} dropped without destroy() having been called; aborting per spec.md §4",
                self.descriptor.id
            );
            std::process::abort();
        }
    }
}

fn encode_word(word: SandboxWord, width: usize) -> Vec<u8> {
    match word {
        SandboxWord::W64(v) if width == 8 => v.to_le_bytes().to_vec(),
        SandboxWord::W32(v) => v.to_le_bytes().to_vec(),
        SandboxWord::W64(v) => u32::try_from(v).unwrap_or(u32::MAX).to_le_bytes().to_vec(),
    }
}
