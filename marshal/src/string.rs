//! NUL-terminated string translation (`spec.md` §4.E.3): length-bounded in both directions, with
//! a null input pointer yielding a null output pointer.

use crate::error::MarshalError;
use wclap_common::abi::layout::DEFAULT_MAX_STRING_LEN;
use wclap_common::abi::SandboxWord;
use wclap_engine::{ArenaScope, Instance};

/// `nativeToWasm` for a string: writes `s` into the destination arena, truncating to `max_len`
/// bytes including the NUL terminator. Returns [`SandboxWord::null`] for `None`.
pub fn string_to_sandbox(
    scope: &mut ArenaScope<'_>,
    s: Option<&str>,
    max_len: usize,
) -> Result<SandboxWord, MarshalError> {
    let Some(s) = s else {
        return Ok(SandboxWord::null(scope.is_sixty_four_bit()));
    };
    let (_, ptr) = scope.write_string(s, max_len)?;
    Ok(ptr)
}

/// `wasmToNative` for a string: reads at most `max_len` bytes from sandbox memory starting at
/// `ptr`, stopping at the first NUL. A null `ptr` yields `None`.
pub fn string_from_sandbox(
    instance: &Instance,
    ptr: SandboxWord,
    max_len: usize,
) -> Result<Option<String>, MarshalError> {
    if ptr.is_null() {
        return Ok(None);
    }
    let bytes = instance.read_memory(ptr, max_len)?;
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    Ok(Some(String::from_utf8_lossy(&bytes[..len]).into_owned()))
}

/// Convenience wrapper over [`string_from_sandbox`] using the default bound (`spec.md` §4.E.3).
pub fn default_string_from_sandbox(
    instance: &Instance,
    ptr: SandboxWord,
) -> Result<Option<String>, MarshalError> {
    string_from_sandbox(instance, ptr, DEFAULT_MAX_STRING_LEN)
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
    fn string_truncates_past_the_bound() {
        let engine = Engine::global_init(None).unwrap();
        let bytes = wat::parse_str(MINIMAL_WAT).unwrap();
        let module = Module::open(engine, &bytes).unwrap();
        let instance = Instance::new(&module, WasiDirs::default()).unwrap();
        let base = instance.malloc_arena().unwrap();
        let mut arena = Arena::new(base);
        let mut scope = arena.scope();

        let ptr = string_to_sandbox(&mut scope, Some("hello world"), 6).unwrap();
        instance
            .write_memory(ptr, scope.read_native(0, 6))
            .unwrap();
        let restored = string_from_sandbox(&instance, ptr, 6).unwrap();
        assert_eq!(restored.as_deref(), Some("hello"));
    }

    #[test]
    fn null_input_yields_null_pointer() {
        let mut arena = Arena::new(SandboxWord::W32(0x1000));
        let mut scope = arena.scope();
        let ptr = string_to_sandbox(&mut scope, None, 64).unwrap();
        assert!(ptr.is_null());
    }
}
