//! NUL-sentinel pointer arrays (`spec.md` §4.E.4, e.g. plugin `features[]`) and fixed-length
//! inline char arrays (`spec.md` §4.E.5, e.g. `name`, `module`, `path`).

use crate::error::MarshalError;
use crate::string::{string_from_sandbox, string_to_sandbox};
use crate::wire::{read_word, write_word};
use wclap_common::abi::layout::{DEFAULT_MAX_ARRAY_LEN, DEFAULT_MAX_STRING_LEN};
use wclap_common::abi::SandboxWord;
use wclap_engine::{ArenaScope, Instance};

/// `nativeToWasm` for a NUL-sentinel array of strings: writes each string, then an array of
/// sandbox pointers terminated by a null entry. Bounded to `max_len` elements, per the recursion
/// bound in `spec.md` §4.E.4.
pub fn string_array_to_sandbox(
    scope: &mut ArenaScope<'_>,
    items: &[String],
    max_len: usize,
) -> Result<SandboxWord, MarshalError> {
    let truncated = &items[..items.len().min(max_len)];
    let width = if scope.is_sixty_four_bit() { 8 } else { 4 };

    let mut pointers = Vec::with_capacity(truncated.len());
    for item in truncated {
        pointers.push(string_to_sandbox(scope, Some(item), DEFAULT_MAX_STRING_LEN)?);
    }

    let (array_native_offset, array_ptr) = scope.array(truncated.len() + 1, width, width)?;
    for (i, ptr) in pointers.iter().enumerate() {
        write_word(scope, array_native_offset + i * width, *ptr, width);
    }
    write_word(scope, array_native_offset + truncated.len() * width, SandboxWord::null(scope.is_sixty_four_bit()), width);

    Ok(array_ptr)
}

/// `wasmToNative` for a NUL-sentinel array of strings, bounded to `max_len` elements. Stops at
/// the first null entry or the bound, whichever comes first.
pub fn string_array_from_sandbox(
    instance: &Instance,
    ptr: SandboxWord,
    max_len: usize,
) -> Result<Vec<String>, MarshalError> {
    if ptr.is_null() {
        return Ok(Vec::new());
    }
    let width = if instance.is_sixty_four_bit() { 8 } else { 4 };
    let mut out = Vec::new();

    for i in 0..max_len.min(DEFAULT_MAX_ARRAY_LEN) {
        let slot = ptr.offset((i * width) as u64);
        let raw = instance.read_memory(slot, width)?;
        let entry = read_word(&raw, instance.is_sixty_four_bit());
        if entry.is_null() {
            break;
        }
        if let Some(s) = string_from_sandbox(instance, entry, DEFAULT_MAX_STRING_LEN)? {
            out.push(s);
        }
    }
    Ok(out)
}

/// Copies `s` into a fixed-length inline char array, NUL-padding any remainder. Used for ABI
/// fields like `name`/`module`/`path` that are embedded directly in the struct rather than
/// pointed to.
pub fn write_inline_char_array(dest: &mut [u8], s: &str) {
    let bytes = s.as_bytes();
    let n = bytes.len().min(dest.len().saturating_sub(1));
    dest[..n].copy_from_slice(&bytes[..n]);
    dest[n..].fill(0);
}

/// Reads a fixed-length inline char array back into a `String`, stopping at the first NUL.
pub fn read_inline_char_array(src: &[u8]) -> String {
    let len = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..len]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wclap_engine::{Arena, Engine, Module, WasiDirs};

    const MINIMAL_WAT: &str = r#"
        (module
            (memory (export "memory") 1)
            (global (export "clap_entry") i32 (i32.const 0))
            (func (export "malloc") (param i32) (result i32) (local.get 0))
            (table (export "wclap_table") 1 70000 funcref)
        )
    "#;

    #[test]
    fn inline_char_array_round_trips() {
        let mut buf = [0u8; 8];
        write_inline_char_array(&mut buf, "clap");
        assert_eq!(read_inline_char_array(&buf), "clap");
    }

    #[test]
    fn inline_char_array_truncates() {
        let mut buf = [0u8; 4];
        write_inline_char_array(&mut buf, "clap");
        assert_eq!(read_inline_char_array(&buf), "cla");
    }

    #[test]
    fn string_array_round_trips_and_stops_at_sentinel() {
        let engine = Engine::global_init(None).unwrap();
        let bytes = wat::parse_str(MINIMAL_WAT).unwrap();
        let module = Module::open(engine, &bytes).unwrap();
        let instance = Instance::new(&module, WasiDirs::default()).unwrap();
        let base = instance.malloc_arena().unwrap();
        let mut arena = Arena::new(base);
        let mut scope = arena.scope();

        let items = vec!["synth".to_string(), "stereo".to_string()];
        let ptr = string_array_to_sandbox(&mut scope, &items, 10).unwrap();

        // Materialize the arena's native scratch contents into sandbox memory so the read-back
        // below observes what was written (mirrors what the bridge does after a scope is built).
        let flat = scope.read_native(0, wclap_engine::ARENA_SIZE as usize);
        instance.write_memory(base, flat).unwrap();

        let restored = string_array_from_sandbox(&instance, ptr, 10).unwrap();
        assert_eq!(restored, items);
    }
}
