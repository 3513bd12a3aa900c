//! Sandbox-to-host routing for the four `clap_host_t` methods a sandboxed plugin can call
//! through the host proxy the Bridge builds at `create_plugin` time (`spec.md` §4.F, "Plugin
//! creation"). The sandbox never sees a real host pointer: it only carries the small integer
//! [`wclap_bridge::IndexHandle::as_raw`] value the Bridge wrote into the proxy's `host_data`
//! slot, and these trampolines resolve that index back to the real `clap_host_t*` the native
//! host handed us at `create_plugin`.
//!
//! `get_extension` is intentionally not forwarded: answering it correctly means negotiating a
//! sandbox-side proxy for whichever host extension the plugin asked for, one marshaller per
//! extension, which is out of scope for this pass (see `DESIGN.md`). The trampoline always
//! returns a null sandbox pointer, which is a legal "extension not supported" answer.

use crate::raw::RawClapHost;
use std::ffi::c_void;
use std::sync::Arc;
use wclap_bridge::{HostCallbackTable, IndexHandle, IndexLookup};
use wclap_common::abi::layout::host_proxy::HOST_DATA_OFFSET_WORDS;
use wclap_common::abi::SandboxWord;
use wclap_engine::{Instance, InstanceError};

/// A `*const RawClapHost` the real host handed us. Sending this across threads is sound because
/// the CLAP ABI requires every `clap_host_t` method to be callable from any thread the host
/// itself dispatches plugin calls from.
#[derive(Clone, Copy)]
pub struct HostPtr(pub *const RawClapHost);

// SAFETY: see the doc comment above; the CLAP host contract guarantees thread-safe callbacks.
unsafe impl Send for HostPtr {}
// SAFETY: see the doc comment above.
unsafe impl Sync for HostPtr {}

/// Registers the three void callbacks and the `get_extension` stub on `instance`, returning the
/// function-table indices the Bridge bakes into every host proxy it builds on this instance.
/// Called once per [`Instance`], not once per plugin: the same four trampolines serve every
/// plugin created from this module, disambiguated at call time by the `host_data` index each
/// plugin's proxy carries.
pub fn register(instance: &Instance, hosts: Arc<IndexLookup<HostPtr>>) -> Result<HostCallbackTable, InstanceError> {
    let request_restart = {
        let hosts = Arc::clone(&hosts);
        instance.register_void_closure(1, move |mem, args| {
            if let Some(host) = resolve(&hosts, mem, args) {
                // SAFETY: `host` was supplied by the native host at `create_plugin` and is
                // guaranteed live for the plugin's lifetime by the CLAP host contract.
                unsafe { (host.0.as_ref().unwrap().request_restart)(host.0) }
            }
        })?
    };

    let request_process = {
        let hosts = Arc::clone(&hosts);
        instance.register_void_closure(1, move |mem, args| {
            if let Some(host) = resolve(&hosts, mem, args) {
                // SAFETY: see `request_restart` above.
                unsafe { (host.0.as_ref().unwrap().request_process)(host.0) }
            }
        })?
    };

    let request_callback = {
        let hosts = Arc::clone(&hosts);
        instance.register_void_closure(1, move |mem, args| {
            if let Some(host) = resolve(&hosts, mem, args) {
                // SAFETY: see `request_restart` above.
                unsafe { (host.0.as_ref().unwrap().request_callback)(host.0) }
            }
        })?
    };

    let get_extension_fn = instance.register_closure(2, |_mem, args| {
        SandboxWord::from_u64(0, args.first().map(SandboxWord::is_sixty_four_bit).unwrap_or(false))
    })?;

    Ok(HostCallbackTable {
        get_extension_fn,
        request_restart_fn: request_restart,
        request_process_fn: request_process,
        request_callback_fn: request_callback,
    })
}

/// Reads the `host_data` word out of sandbox memory at the proxy struct `args[0]` points to,
/// then resolves it through `hosts`. `args[0]` is the sandbox pointer to the host proxy itself
/// (mirroring the native ABI convention where a plugin calls `host->request_restart(host)`), not
/// the raw index directly — the index is the proxy's `host_data` field, one word in.
fn resolve(hosts: &IndexLookup<HostPtr>, mem: &[u8], args: &[SandboxWord]) -> Option<HostPtr> {
    let proxy = args.first()?;
    let raw = read_host_data_index(mem, *proxy)?;
    hosts.get_raw(raw)
}

fn read_host_data_index(mem: &[u8], proxy_ptr: SandboxWord) -> Option<u32> {
    let width = proxy_ptr.byte_width();
    let offset = usize::try_from(HOST_DATA_OFFSET_WORDS).ok()?.checked_mul(width)?;
    let base = usize::try_from(proxy_ptr.as_u64()).ok()?.checked_add(offset)?;
    let bytes = mem.get(base..base.checked_add(width)?)?;
    let value = if width == 8 {
        u64::from_le_bytes(bytes.try_into().ok()?)
    } else {
        u64::from(u32::from_le_bytes(bytes.try_into().ok()?))
    };
    u32::try_from(value).ok()
}

/// Allocates an [`IndexHandle`] for `host` in `hosts`, for the duration of one `create_plugin`
/// call; the handle's raw value is what gets written into the sandbox-side proxy's `host_data`.
pub fn retain(hosts: &IndexLookup<HostPtr>, host: *const c_void) -> IndexHandle {
    hosts.retain(HostPtr(host.cast()))
}
