//! The Marshaller (`spec.md` §4.E): bit-exact translation of CLAP ABI values across the wasm
//! sandbox boundary.
//!
//! Every native CLAP struct crossing into or out of a sandboxed plugin passes through one of
//! these modules rather than being reinterpreted in place, since the sandbox's pointers are
//! either 32- or 64-bit words into an address space the host process cannot dereference
//! directly. The bridge builds one [`wclap_engine::ArenaScope`] per logical call, translates the
//! call's arguments through `*_to_sandbox`, invokes the sandboxed function, then translates any
//! output through `*_from_sandbox` before the scope drops.

mod array;
mod audio_buffer;
mod cookie;
mod descriptor;
mod error;
mod event;
mod string;
mod stream;
mod wire;

pub use array::{read_inline_char_array, string_array_from_sandbox, string_array_to_sandbox, write_inline_char_array};
pub use audio_buffer::{audio_buffer_to_sandbox, f32_channels_from_sandbox, f64_channels_from_sandbox, AudioBuffer};
pub use cookie::{cookie_from_sandbox, cookie_to_sandbox};
pub use descriptor::{descriptor_from_sandbox, DescriptorNamespace, PluginDescriptor};
pub use error::MarshalError;
pub use event::{event_from_sandbox, event_to_sandbox};
pub use string::{default_string_from_sandbox, string_from_sandbox, string_to_sandbox};
pub use stream::{relay_read, relay_write};
