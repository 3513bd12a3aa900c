//! Shared little-endian packing helpers for sandbox-word-sized fields. The wire format has no
//! padding: every struct's byte layout is whatever these helpers produce, concatenated in field
//! order, independent of the host's native struct layout.

use wclap_common::abi::SandboxWord;
use wclap_engine::ArenaScope;

pub fn write_word(scope: &mut ArenaScope<'_>, native_offset: usize, word: SandboxWord, width: usize) {
    if width == 8 {
        scope.write_native(native_offset, &word.as_u64().to_le_bytes());
    } else {
        scope.write_native(native_offset, &(word.as_u64() as u32).to_le_bytes());
    }
}

pub fn read_word(bytes: &[u8], is_sixty_four_bit: bool) -> SandboxWord {
    if is_sixty_four_bit {
        SandboxWord::W64(u64::from_le_bytes(bytes[..8].try_into().unwrap()))
    } else {
        SandboxWord::W32(u32::from_le_bytes(bytes[..4].try_into().unwrap()))
    }
}
