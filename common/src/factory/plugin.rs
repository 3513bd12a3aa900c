//! The [`PluginFactory`], the standard CLAP factory used to list and instantiate plugins.

use crate::factory::{Factory, RawFactoryPointer};
use clap_sys::factory::plugin_factory::{CLAP_PLUGIN_FACTORY_ID, clap_plugin_factory};
use core::ffi::CStr;

/// The standard CLAP plugin factory, exposed by every bundle's entry point.
///
/// Lets a host enumerate the plugins a bundle implements, and instantiate one of them.
#[derive(Copy, Clone)]
pub struct PluginFactory<'a>(RawFactoryPointer<'a, clap_plugin_factory>);

// SAFETY: CLAP_PLUGIN_FACTORY_ID is indeed the standard identifier for clap_plugin_factory.
unsafe impl<'a> Factory<'a> for PluginFactory<'a> {
    const IDENTIFIERS: &'static [&'static CStr] = &[CLAP_PLUGIN_FACTORY_ID];
    type Raw = clap_plugin_factory;

    #[inline]
    unsafe fn from_raw(raw: RawFactoryPointer<'a, Self::Raw>) -> Self {
        Self(raw)
    }
}

impl<'a> PluginFactory<'a> {
    /// Returns the raw, C-FFI compatible factory pointer.
    #[inline]
    pub fn as_raw(&self) -> RawFactoryPointer<'a, clap_plugin_factory> {
        self.0
    }

    /// The number of plugins exposed by this factory.
    pub fn plugin_count(&self) -> u32 {
        let Some(get_plugin_count) = self.0.get().get_plugin_count else {
            return 0;
        };

        // SAFETY: this type can only be constructed from a plugin-provided pointer, so the CLAP
        // spec enforces that this function pointer is valid to call.
        unsafe { get_plugin_count(self.0.as_raw().as_ptr()) }
    }
}
