//! The `#[repr(C)]` shapes this crate hands back to a native host, mirroring the standard CLAP
//! `clap_plugin_factory_t`/`clap_plugin_descriptor_t`/`clap_plugin_t` vtables field-for-field so
//! that a real host reading these pointers sees exactly the ABI it expects (`spec.md` §6).
//!
//! Every raw struct embeds its vtable as its first field, so a pointer the host hands back to a
//! later call (e.g. `create_plugin`'s `factory` argument, or `process`'s `plugin` argument) is
//! also a valid pointer to the whole owning struct — the same "vtable as first field" technique
//! `clack-plugin`'s `factory::wrapper`/`plugin::wrapper` use to recover their safe state from a
//! raw pointer the host passes back in.

use std::ffi::{c_char, c_void, CString};
use std::os::raw::c_uint;
use wclap_marshal::PluginDescriptor;

#[repr(C)]
pub struct RawVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

/// Field-for-field equivalent of `clap_plugin_descriptor_t`.
#[repr(C)]
pub struct RawPluginDescriptor {
    pub clap_version: RawVersion,
    pub id: *const c_char,
    pub name: *const c_char,
    pub vendor: *const c_char,
    pub url: *const c_char,
    pub manual_url: *const c_char,
    pub support_url: *const c_char,
    pub version: *const c_char,
    pub description: *const c_char,
    pub features: *const *const c_char,
}

/// Owned backing storage for one [`RawPluginDescriptor`]: the `CString`s and feature-pointer
/// array the raw struct's pointers address. Must outlive every `RawPluginDescriptor` built from
/// it, which is why [`crate::WclapModule`] keeps a `Vec<OwnedDescriptor>` for as long as the
/// module itself is alive.
pub struct OwnedDescriptor {
    id: CString,
    name: CString,
    vendor: CString,
    url: CString,
    manual_url: CString,
    support_url: CString,
    version: CString,
    description: CString,
    features: Vec<CString>,
    feature_ptrs: Vec<*const c_char>,
}

fn cstring_lossy(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}

impl OwnedDescriptor {
    pub fn new(descriptor: &PluginDescriptor) -> Self {
        let features: Vec<CString> = descriptor.features.iter().map(|f| cstring_lossy(f)).collect();
        let mut feature_ptrs: Vec<*const c_char> = features.iter().map(|f| f.as_ptr()).collect();
        feature_ptrs.push(std::ptr::null());

        Self {
            id: cstring_lossy(&descriptor.id),
            name: cstring_lossy(&descriptor.name),
            vendor: cstring_lossy(&descriptor.vendor),
            url: cstring_lossy(&descriptor.url),
            manual_url: cstring_lossy(&descriptor.manual_url),
            support_url: cstring_lossy(&descriptor.support_url),
            version: cstring_lossy(&descriptor.version),
            description: cstring_lossy(&descriptor.description),
            features,
            feature_ptrs,
        }
    }

    /// Builds the raw, ABI-exact descriptor. Borrows `self`: the returned struct's pointers are
    /// only valid while this [`OwnedDescriptor`] (and the module owning it) is alive.
    pub fn as_raw(&self) -> RawPluginDescriptor {
        RawPluginDescriptor {
            clap_version: RawVersion { major: 1, minor: 2, revision: 2 },
            id: self.id.as_ptr(),
            name: self.name.as_ptr(),
            vendor: self.vendor.as_ptr(),
            url: self.url.as_ptr(),
            manual_url: self.manual_url.as_ptr(),
            support_url: self.support_url.as_ptr(),
            version: self.version.as_ptr(),
            description: self.description.as_ptr(),
            features: self.feature_ptrs.as_ptr(),
        }
    }
}

/// Field-for-field equivalent of `clap_plugin_factory_t`. Embedded as the first field of
/// [`crate::FactoryHandle`] so a `*const RawPluginFactory` the host received from `getFactory`
/// is also a valid `*const FactoryHandle`.
#[repr(C)]
pub struct RawPluginFactory {
    pub get_plugin_count: unsafe extern "C" fn(*const RawPluginFactory) -> c_uint,
    pub get_plugin_descriptor: unsafe extern "C" fn(*const RawPluginFactory, c_uint) -> *const RawPluginDescriptor,
    pub create_plugin:
        unsafe extern "C" fn(*const RawPluginFactory, *const c_void, *const c_char) -> *const c_void,
}

/// Field-for-field equivalent of `clap_plugin_t`. Embedded as the first field of
/// [`crate::vtables::PluginHandle`], in the exact field order the real ABI declares, so a
/// pointer the host calls back through (e.g. inside `process`) is also a valid
/// `*const PluginHandle`.
#[repr(C)]
pub struct RawPlugin {
    pub desc: *const RawPluginDescriptor,
    pub plugin_data: *mut c_void,
    pub init: unsafe extern "C" fn(*const RawPlugin) -> bool,
    pub destroy: unsafe extern "C" fn(*const RawPlugin),
    pub activate: unsafe extern "C" fn(*const RawPlugin, f64, c_uint, c_uint) -> bool,
    pub deactivate: unsafe extern "C" fn(*const RawPlugin),
    pub start_processing: unsafe extern "C" fn(*const RawPlugin) -> bool,
    pub stop_processing: unsafe extern "C" fn(*const RawPlugin),
    pub reset: unsafe extern "C" fn(*const RawPlugin),
    pub process: unsafe extern "C" fn(*const RawPlugin, *const c_void) -> i32,
    pub get_extension: unsafe extern "C" fn(*const RawPlugin, *const c_char) -> *const c_void,
    pub on_main_thread: unsafe extern "C" fn(*const RawPlugin),
}

/// Field-for-field prefix of `clap_host_t`: the parts of the real host object our sandbox-to-host
/// trampolines need to call through. `request_restart`/`request_process`/`request_callback` take
/// no payload beyond the host pointer itself, matching the native ABI exactly.
#[repr(C)]
pub struct RawClapHost {
    pub clap_version: RawVersion,
    pub host_data: *mut c_void,
    pub name: *const c_char,
    pub vendor: *const c_char,
    pub url: *const c_char,
    pub version: *const c_char,
    pub get_extension: unsafe extern "C" fn(*const RawClapHost, *const c_char) -> *const c_void,
    pub request_restart: unsafe extern "C" fn(*const RawClapHost),
    pub request_process: unsafe extern "C" fn(*const RawClapHost),
    pub request_callback: unsafe extern "C" fn(*const RawClapHost),
}
