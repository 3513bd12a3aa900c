//! Cookie translation (`spec.md` §4.E.2): an opaque host pointer the sandbox must carry but
//! never dereference, cast to and from the sandbox's integer word width.

use crate::error::MarshalError;
use wclap_common::abi::SandboxWord;
use wclap_common::utils::Cookie;

/// Casts a native [`Cookie`] down to a sandbox word. Fails if the host pointer's bits don't fit
/// in a 32-bit sandbox word — the spec requires the host pointer size to be at least the
/// sandbox's, so this only trips on a genuinely oversized pointer.
pub fn cookie_to_sandbox(cookie: Cookie, is_sixty_four_bit: bool) -> Result<SandboxWord, MarshalError> {
    let raw = cookie.as_raw() as usize as u64;
    if !is_sixty_four_bit && raw > u64::from(u32::MAX) {
        return Err(MarshalError::PointerWidth(32));
    }
    Ok(SandboxWord::from_u64(raw, is_sixty_four_bit))
}

/// Casts a sandbox word back to a native [`Cookie`]. The sandbox never dereferences this value,
/// so any bit pattern round-trips losslessly.
pub fn cookie_from_sandbox(word: SandboxWord) -> Cookie {
    Cookie::from_raw(word.as_u64() as usize as *mut std::ffi::c_void)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_both_widths() {
        let cookie = Cookie::from_raw(0x1234 as *mut std::ffi::c_void);
        for width in [false, true] {
            let word = cookie_to_sandbox(cookie, width).unwrap();
            assert_eq!(cookie_from_sandbox(word), cookie);
        }
    }

    #[test]
    fn empty_cookie_is_null_word() {
        let word = cookie_to_sandbox(Cookie::empty(), false).unwrap();
        assert!(word.is_null());
    }
}
