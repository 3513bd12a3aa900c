//! The dual-width sandbox pointer representation, and the layout of the WCLAP sandbox ABI.
//!
//! A bundle's linear memory is addressed by 32-bit or 64-bit integers depending on whether the
//! bundle was compiled for `wasm32` or `wasm64` (see [`Module`](https://docs.rs/wclap-engine)'s
//! shape detection). Every pointer that crosses the boundary is represented here as a
//! [`SandboxWord`], so that translation code is written once and is correct for both widths
//! without per-field branching, per the dual-width ABI design note.

use std::fmt::{Display, Formatter};

/// An unsigned integer of the bundle's pointer width, used to address the sandbox's linear
/// memory or function table.
///
/// This is a plain value type, not a generic parameter: a bundle's width is a runtime fact
/// (discovered by inspecting its `clap_entry` export), so [`SandboxWord`] carries its own width
/// rather than being `SandboxWord<W>`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SandboxWord {
    /// A 32-bit sandbox address, for bundles compiled to `wasm32`.
    W32(u32),
    /// A 64-bit sandbox address, for bundles compiled to `wasm64`.
    W64(u64),
}

impl SandboxWord {
    /// The null sandbox pointer of the given width.
    #[inline]
    pub const fn null(is_sixty_four_bit: bool) -> Self {
        if is_sixty_four_bit { Self::W64(0) } else { Self::W32(0) }
    }

    /// Whether this value is the null pointer.
    #[inline]
    pub const fn is_null(&self) -> bool {
        match self {
            Self::W32(v) => *v == 0,
            Self::W64(v) => *v == 0,
        }
    }

    /// Whether this word belongs to a 64-bit sandbox.
    #[inline]
    pub const fn is_sixty_four_bit(&self) -> bool {
        matches!(self, Self::W64(_))
    }

    /// The byte width of this word (4 or 8).
    #[inline]
    pub const fn byte_width(&self) -> usize {
        match self {
            Self::W32(_) => 4,
            Self::W64(_) => 8,
        }
    }

    /// Widens or narrows this value as a plain `u64`, regardless of its declared width.
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        match self {
            Self::W32(v) => *v as u64,
            Self::W64(v) => *v,
        }
    }

    /// Builds a [`SandboxWord`] of the given width from a `u64` value.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if `value` does not fit in a 32-bit word and
    /// `is_sixty_four_bit` is `false`. This indicates a host pointer that is wider than the
    /// sandbox can represent, which is a bridge programming error, not a plugin-triggerable one.
    #[inline]
    pub fn from_u64(value: u64, is_sixty_four_bit: bool) -> Self {
        if is_sixty_four_bit {
            Self::W64(value)
        } else {
            debug_assert!(
                value <= u32::MAX as u64,
                "sandbox word overflow: value {value} does not fit in 32 bits"
            );
            Self::W32(value as u32)
        }
    }

    /// Adds a byte offset to this pointer, saturating rather than wrapping on overflow.
    #[inline]
    pub fn offset(&self, bytes: u64) -> Self {
        match self {
            Self::W32(v) => Self::W32(v.saturating_add(bytes as u32)),
            Self::W64(v) => Self::W64(v.saturating_add(bytes)),
        }
    }

    /// Converts this word to a `usize` offset into a native `&[u8]` buffer.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.as_u64() as usize
    }
}

impl Display for SandboxWord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::W32(v) => write!(f, "0x{v:08x}"),
            Self::W64(v) => write!(f, "0x{v:016x}"),
        }
    }
}

/// A cookie (opaque, host-owned pointer) as seen from the sandbox side.
///
/// Mirrors [`crate::utils::Cookie`] on the native side. The native cookie always fits in a
/// sandbox word: a host pointer is assumed to be at least as wide as the sandbox's own pointer
/// width, per the Cookie translation invariant.
pub type SandboxCookie = SandboxWord;

/// Byte offsets and sizes of the fixed WCLAP sandbox ABI records, as laid out by the bundle
/// compiler. These are not discovered at runtime (unlike [`ModuleShape`](https://docs.rs/wclap-engine)):
/// they are a fixed contract between the bridge and any compliant bundle.
pub mod layout {
    /// Layout of the `wclap_plugin_entry` record pointed to by the `clap_entry` export: one
    /// inline CLAP version triple, followed by three function table indices.
    pub mod entry {
        /// `clap_version_t` (3 x u32).
        pub const VERSION_OFFSET: u64 = 0;
        pub const VERSION_SIZE: u64 = 12;
        /// Function table index of `init(const char *plugin_path) -> bool`.
        pub const INIT_FN_OFFSET: u64 = VERSION_OFFSET + VERSION_SIZE;
        /// Function table index of `deinit(void)`.
        pub const DEINIT_FN_OFFSET: u64 = INIT_FN_OFFSET + 4;
        /// Function table index of `get_factory(const char *factory_id) -> wclap_ptr`.
        pub const GET_FACTORY_FN_OFFSET: u64 = DEINIT_FN_OFFSET + 4;
    }

    /// Layout of the `wclap_plugin_factory` record returned by `clap_entry.get_factory`: three
    /// function table indices, in the same order as the native `clap_plugin_factory` vtable.
    pub mod plugin_factory {
        /// Function table index of `get_plugin_count(void) -> u32`.
        pub const GET_PLUGIN_COUNT_FN_OFFSET: u64 = 0;
        /// Function table index of `get_plugin_descriptor(u32 index) -> wclap_ptr`.
        pub const GET_PLUGIN_DESCRIPTOR_FN_OFFSET: u64 = 4;
        /// Function table index of `create_plugin(wclap_ptr host, const char *plugin_id) -> wclap_ptr`.
        pub const CREATE_PLUGIN_FN_OFFSET: u64 = 8;
    }

    /// Layout of the `wclap_plugin_descriptor` record returned by `get_plugin_descriptor`: eight
    /// NUL-terminated string pointers (sandbox-word width each) followed by one NUL-sentinel
    /// pointer array for `features`.
    pub mod plugin_descriptor {
        pub const ID_OFFSET_WORDS: u64 = 0;
        pub const NAME_OFFSET_WORDS: u64 = 1;
        pub const VENDOR_OFFSET_WORDS: u64 = 2;
        pub const URL_OFFSET_WORDS: u64 = 3;
        pub const MANUAL_URL_OFFSET_WORDS: u64 = 4;
        pub const SUPPORT_URL_OFFSET_WORDS: u64 = 5;
        pub const VERSION_OFFSET_WORDS: u64 = 6;
        pub const DESCRIPTION_OFFSET_WORDS: u64 = 7;
        pub const FEATURES_OFFSET_WORDS: u64 = 8;
    }

    /// Layout of the `wclap_plugin` vtable a sandboxed plugin object points to: ten function
    /// table indices, in the order the native `clap_plugin_t` vtable declares them (the
    /// descriptor and `plugin_data` fields are not mirrored here since the Bridge already keeps
    /// its own `PluginDescriptor` and never needs to read `plugin_data` back).
    pub mod plugin {
        pub const DESTROY_FN_OFFSET: u64 = 0;
        pub const INIT_FN_OFFSET: u64 = 4;
        pub const ACTIVATE_FN_OFFSET: u64 = 8;
        pub const DEACTIVATE_FN_OFFSET: u64 = 12;
        pub const START_PROCESSING_FN_OFFSET: u64 = 16;
        pub const STOP_PROCESSING_FN_OFFSET: u64 = 20;
        pub const RESET_FN_OFFSET: u64 = 24;
        pub const PROCESS_FN_OFFSET: u64 = 28;
        pub const GET_EXTENSION_FN_OFFSET: u64 = 32;
        pub const ON_MAIN_THREAD_FN_OFFSET: u64 = 36;
    }

    /// Layout of the `wclap_host` proxy the Bridge builds in a Plugin's persistent arena before
    /// calling `create_plugin` (`spec.md` §4.F "Plugin creation"): one sandbox-word `host_data`
    /// slot carrying the plugin's [`IndexLookup`](https://docs.rs/wclap-bridge) index, followed by
    /// four function table indices.
    pub mod host_proxy {
        pub const HOST_DATA_OFFSET_WORDS: u64 = 0;
        pub const GET_EXTENSION_FN_OFFSET_WORDS: u64 = 1;
        pub const REQUEST_RESTART_FN_OFFSET_WORDS: u64 = 2;
        pub const REQUEST_PROCESS_FN_OFFSET_WORDS: u64 = 3;
        pub const REQUEST_CALLBACK_FN_OFFSET_WORDS: u64 = 4;
    }

    /// Default bound, in bytes, for NUL-terminated string translation (`spec.md` §4.E.3).
    pub const DEFAULT_MAX_STRING_LEN: usize = 2048;
    /// Default bound, in elements, for NUL-sentinel pointer array translation (features lists).
    pub const DEFAULT_MAX_ARRAY_LEN: usize = 1000;
    /// Hard cap, in bytes, for a sysex event's payload.
    pub const MAX_SYSEX_LEN: usize = 1024;
    /// Chunk size, in bytes, used by the state stream relay per round-trip.
    pub const STREAM_CHUNK_LEN: usize = 1024;
    /// Soft output limiter threshold: `|sample| < OUTPUT_CLIP_THRESHOLD` or it is zeroed.
    pub const OUTPUT_CLIP_THRESHOLD: f64 = 100.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_word_roundtrips() {
        let w = SandboxWord::from_u64(0x1234, false);
        assert_eq!(w, SandboxWord::W32(0x1234));
        assert_eq!(w.as_u64(), 0x1234);
        assert!(!w.is_sixty_four_bit());
        assert_eq!(w.byte_width(), 4);
    }

    #[test]
    fn wide_word_roundtrips() {
        let w = SandboxWord::from_u64(0x1_0000_0001, true);
        assert_eq!(w, SandboxWord::W64(0x1_0000_0001));
        assert!(w.is_sixty_four_bit());
        assert_eq!(w.byte_width(), 8);
    }

    #[test]
    #[should_panic]
    fn narrow_word_overflow_panics_in_debug() {
        let _ = SandboxWord::from_u64(u64::MAX, false);
    }

    #[test]
    fn null_is_null() {
        assert!(SandboxWord::null(false).is_null());
        assert!(SandboxWord::null(true).is_null());
        assert!(!SandboxWord::from_u64(1, false).is_null());
    }

    #[test]
    fn offset_saturates_instead_of_wrapping() {
        let w = SandboxWord::W32(u32::MAX - 1);
        assert_eq!(w.offset(10), SandboxWord::W32(u32::MAX));
    }
}
