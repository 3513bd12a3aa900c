//! The raw `extern "C"` trampolines a native host actually calls through, and the two handle
//! structs backing them (`spec.md` §6, outer C ABI). Every trampoline here does nothing but
//! recover its safe Rust state from the incoming pointer (`clack-plugin`'s
//! `factory::wrapper`/`plugin::wrapper` pattern — see `DESIGN.md`), call into
//! [`wclap_bridge`], and translate the result back to the C calling convention, including
//! turning a caught panic into the ABI's null/false/error outcome rather than unwinding across
//! the FFI boundary.

use crate::host_callbacks;
use crate::raw::{RawPlugin, RawPluginFactory};
use crate::{set_last_error, WclapModule};
use std::ffi::{c_char, c_uint, c_void, CStr};
use std::panic::catch_unwind;
use std::sync::Mutex;
use wclap_bridge::{IndexHandle, Plugin};

/// Backs a `*const clap_plugin_factory_t` returned from `getFactory`. `module` outlives every
/// `FactoryHandle` built from it: both are owned by the same [`WclapModule`], and a host is
/// required by the CLAP ABI to stop using the factory once the module is closed.
#[repr(C)]
pub struct FactoryHandle {
    pub vtable: RawPluginFactory,
    module: *const WclapModule,
}

impl FactoryHandle {
    pub fn new(module: *const WclapModule) -> Self {
        Self {
            vtable: RawPluginFactory {
                get_plugin_count: trampoline_get_plugin_count,
                get_plugin_descriptor: trampoline_get_plugin_descriptor,
                create_plugin: trampoline_create_plugin,
            },
            module,
        }
    }
}

/// Backs a `*const clap_plugin_t` returned from `create_plugin`. Owns the live
/// [`wclap_bridge::Plugin`] and the [`IndexHandle`] its host proxy was registered under, so
/// `destroy` can release that slot.
#[repr(C)]
pub struct PluginHandle {
    pub vtable: RawPlugin,
    module: *const WclapModule,
    host_handle: IndexHandle,
    plugin: Mutex<Plugin>,
}

impl PluginHandle {
    fn new(module: *const WclapModule, host_handle: IndexHandle, plugin: Plugin, desc: *const crate::raw::RawPluginDescriptor) -> Box<Self> {
        Box::new(Self {
            vtable: RawPlugin {
                desc,
                plugin_data: std::ptr::null_mut(),
                init: trampoline_init,
                destroy: trampoline_destroy,
                activate: trampoline_activate,
                deactivate: trampoline_deactivate,
                start_processing: trampoline_start_processing,
                stop_processing: trampoline_stop_processing,
                reset: trampoline_reset,
                process: trampoline_process,
                get_extension: trampoline_plugin_get_extension,
                on_main_thread: trampoline_on_main_thread,
            },
            module,
            host_handle,
            plugin: Mutex::new(plugin),
        })
    }
}

unsafe extern "C" fn trampoline_get_plugin_count(factory: *const RawPluginFactory) -> c_uint {
    catch_unwind(|| {
        let handle = &*factory.cast::<FactoryHandle>();
        let module = &*handle.module;
        module.factory_descriptor_count()
    })
    .unwrap_or(0)
}

unsafe extern "C" fn trampoline_get_plugin_descriptor(
    factory: *const RawPluginFactory,
    index: c_uint,
) -> *const crate::raw::RawPluginDescriptor {
    catch_unwind(|| {
        let handle = &*factory.cast::<FactoryHandle>();
        let module = &*handle.module;
        module.factory_descriptor_ptr(index)
    })
    .unwrap_or(std::ptr::null())
}

unsafe extern "C" fn trampoline_create_plugin(
    factory: *const RawPluginFactory,
    host: *const c_void,
    plugin_id: *const c_char,
) -> *const c_void {
    let result = catch_unwind(|| {
        let handle = &*factory.cast::<FactoryHandle>();
        let module = &*handle.module;
        let id = CStr::from_ptr(plugin_id).to_str().map_err(|_| ())?;
        let host_handle = host_callbacks::retain(module.host_table(), host);
        match module.create_plugin(id, host_handle) {
            Ok(plugin) => {
                let desc_ptr = module.descriptor_ptr_for(id);
                let handle = PluginHandle::new(handle.module, host_handle, plugin, desc_ptr);
                Ok(Box::into_raw(handle).cast::<c_void>().cast_const())
            }
            Err(e) => {
                module.host_table().release(host_handle);
                set_last_error(&e.to_string());
                Err(())
            }
        }
    });
    match result {
        Ok(Ok(ptr)) => ptr,
        _ => std::ptr::null(),
    }
}

fn with_plugin<R>(raw: *const RawPlugin, default: R, f: impl FnOnce(&mut Plugin) -> R) -> R {
    let result = catch_unwind(|| {
        // SAFETY: `raw` is the first field of a live `PluginHandle`, per the vtable-as-first-
        // field layout every trampoline in this module relies on.
        let handle = unsafe { &*raw.cast::<PluginHandle>() };
        let mut guard = handle.plugin.lock().unwrap();
        f(&mut guard)
    });
    result.unwrap_or(default)
}

unsafe extern "C" fn trampoline_init(raw: *const RawPlugin) -> bool {
    with_plugin(raw, false, |plugin| plugin.init().unwrap_or_else(|e| {
        set_last_error(&e.to_string());
        false
    }))
}

unsafe extern "C" fn trampoline_destroy(raw: *const RawPlugin) {
    let _ = catch_unwind(|| {
        let handle = Box::from_raw(raw.cast::<PluginHandle>().cast_mut());
        let module = &*handle.module;
        if let Err(e) = handle.plugin.lock().unwrap().destroy() {
            log::error!("plugin destroy failed: {e}");
        }
        module.host_table().release(handle.host_handle);
    });
}

unsafe extern "C" fn trampoline_activate(raw: *const RawPlugin, sample_rate: f64, min_frames: c_uint, max_frames: c_uint) -> bool {
    with_plugin(raw, false, |plugin| {
        plugin.activate(sample_rate, min_frames, max_frames).unwrap_or_else(|e| {
            set_last_error(&e.to_string());
            false
        })
    })
}

unsafe extern "C" fn trampoline_deactivate(raw: *const RawPlugin) {
    with_plugin(raw, (), |plugin| {
        if let Err(e) = plugin.deactivate() {
            set_last_error(&e.to_string());
        }
    });
}

unsafe extern "C" fn trampoline_start_processing(raw: *const RawPlugin) -> bool {
    with_plugin(raw, false, |plugin| {
        plugin.start_processing().unwrap_or_else(|e| {
            set_last_error(&e.to_string());
            false
        })
    })
}

unsafe extern "C" fn trampoline_stop_processing(raw: *const RawPlugin) {
    with_plugin(raw, (), |plugin| {
        if let Err(e) = plugin.stop_processing() {
            set_last_error(&e.to_string());
        }
    });
}

unsafe extern "C" fn trampoline_reset(raw: *const RawPlugin) {
    with_plugin(raw, (), |plugin| {
        if let Err(e) = plugin.reset() {
            set_last_error(&e.to_string());
        }
    });
}

/// `clap_process_status`: translating a real `clap_process_t` (audio buffers, transport, input
/// and output event lists) across the sandbox boundary needs wire-layout constants this pass
/// never defined (see `DESIGN.md`, "process marshaling"); until then this always reports
/// `CLAP_PROCESS_ERROR` rather than silently pretending to run the block.
unsafe extern "C" fn trampoline_process(raw: *const RawPlugin, _process: *const c_void) -> i32 {
    with_plugin(raw, 0, |plugin| {
        log::warn!("process() called but clap_process_t marshaling is not implemented; plugin={:?}", plugin.descriptor().id);
        0
    })
}

/// Plugin-side extension negotiation (audio-ports, params, state, gui, ...) is deferred; see
/// `DESIGN.md`.
unsafe extern "C" fn trampoline_plugin_get_extension(_raw: *const RawPlugin, id: *const c_char) -> *const c_void {
    let name = unsafe { CStr::from_ptr(id) }.to_string_lossy();
    log::debug!("plugin extension {name:?} requested but not implemented");
    std::ptr::null()
}

unsafe extern "C" fn trampoline_on_main_thread(raw: *const RawPlugin) {
    let _ = raw;
}
