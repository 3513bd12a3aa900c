//! The scoped bump-allocator pair used to marshal the arguments of one logical call
//! (`spec.md` §4.D).
//!
//! An [`Arena`] tracks two address spaces: a native scratch buffer (plain host memory, used to
//! stage values before they're copied into the sandbox or after they're read out of it) and a
//! region of sandbox memory that was `malloc`'d once by the [`Instance`](crate::Instance) and is
//! never freed. [`ArenaScope`] marks a reversible allocation window over both.

use crate::error::InstanceError;
use crate::instance::Instance;
use wclap_common::abi::SandboxWord;

/// Fixed size, in bytes, of both halves of an [`Arena`].
pub const ARENA_SIZE: u64 = 64 * 1024;

/// One bump-allocated native buffer paired with one `malloc`'d sandbox buffer of the same size.
pub struct Arena {
    native: Box<[u8]>,
    native_floor: usize,
    native_pos: usize,
    sandbox_base: SandboxWord,
    sandbox_floor: u64,
    sandbox_pos: u64,
    /// Incremented on every [`Arena::scope`] call, decremented on scope drop. Used to detect
    /// the "commit while an inner scope is still live" programming error (`spec.md` §3).
    depth: usize,
}

impl Arena {
    /// Creates a new arena over a 64 KiB sandbox region already `malloc`'d by the owning
    /// instance (typically via [`ArenaPool::claim`]).
    pub fn new(sandbox_base: SandboxWord) -> Self {
        Self {
            native: vec![0u8; ARENA_SIZE as usize].into_boxed_slice(),
            native_floor: 0,
            native_pos: 0,
            sandbox_base,
            sandbox_floor: 0,
            sandbox_pos: 0,
            depth: 0,
        }
    }

    /// Whether this arena's sandbox region belongs to a 64-bit sandbox.
    pub fn is_sixty_four_bit(&self) -> bool {
        self.sandbox_base.is_sixty_four_bit()
    }

    /// Copies this arena's entire native scratch buffer into its sandbox region. Every value a
    /// scope writes via [`ArenaScope::write_native`] lives only in the native buffer until this
    /// is called, so the bridge flushes once per logical call, after marshalling inputs and
    /// before invoking the sandbox function that reads them.
    pub fn flush(&self, instance: &Instance) -> Result<(), InstanceError> {
        instance.write_memory(self.sandbox_base, &self.native)
    }

    /// Opens a new reversible allocation window. Allocations made through the returned
    /// [`ArenaScope`] are reverted when it drops, unless [`ArenaScope::commit`] is called first.
    pub fn scope(&mut self) -> ArenaScope<'_> {
        self.depth += 1;
        ArenaScope {
            native_entry: self.native_pos,
            sandbox_entry: self.sandbox_pos,
            depth_at_entry: self.depth,
            committed: false,
            arena: self,
        }
    }

    /// Whether this arena has no outstanding allocations at all (used by [`ArenaPool`] to
    /// decide whether an arena is eligible for recycling).
    pub fn is_fully_reset(&self) -> bool {
        self.native_pos == 0 && self.sandbox_pos == 0
    }

    fn reserve(
        native_pos: &mut usize,
        sandbox_pos: &mut u64,
        sandbox_base: SandboxWord,
        len: usize,
        align: usize,
    ) -> Result<(usize, SandboxWord), InstanceError> {
        let aligned_native = native_pos.next_multiple_of(align);
        let aligned_sandbox = (*sandbox_pos).next_multiple_of(align as u64);
        let end_native = aligned_native + len;
        let end_sandbox = aligned_sandbox + len as u64;
        if end_native as u64 > ARENA_SIZE || end_sandbox > ARENA_SIZE {
            return Err(InstanceError::Link(
                "arena exhausted: call requires more scratch space than one 64 KiB arena provides"
                    .into(),
            ));
        }
        *native_pos = end_native;
        *sandbox_pos = end_sandbox;
        Ok((aligned_native, sandbox_base.offset(aligned_sandbox)))
    }
}

/// A reversible allocation window over an [`Arena`].
pub struct ArenaScope<'a> {
    arena: &'a mut Arena,
    native_entry: usize,
    sandbox_entry: u64,
    depth_at_entry: usize,
    committed: bool,
}

impl<'a> ArenaScope<'a> {
    /// Whether this scope's arena belongs to a 64-bit sandbox.
    pub fn is_sixty_four_bit(&self) -> bool {
        self.arena.is_sixty_four_bit()
    }

    /// Reserves `len` bytes aligned to `align` in both halves of the arena, returning the
    /// sandbox pointer to the reserved region. The matching native scratch bytes are reachable
    /// through [`ArenaScope::native_mut`] at the same offset.
    pub fn reserve(&mut self, len: usize, align: usize) -> Result<(usize, SandboxWord), InstanceError> {
        Arena::reserve(
            &mut self.arena.native_pos,
            &mut self.arena.sandbox_pos,
            self.arena.sandbox_base,
            len,
            align,
        )
    }

    /// Writes `bytes` into the native scratch buffer starting at `native_offset`.
    pub fn write_native(&mut self, native_offset: usize, bytes: &[u8]) {
        self.arena.native[native_offset..native_offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Reads `len` bytes from the native scratch buffer starting at `native_offset`.
    pub fn read_native(&self, native_offset: usize, len: usize) -> &[u8] {
        &self.arena.native[native_offset..native_offset + len]
    }

    /// A NUL-terminated string write, bounded to `max_len` bytes (including the terminator),
    /// per `spec.md` §4.E.3. Truncates rather than erroring when `s` exceeds the bound.
    pub fn write_string(&mut self, s: &str, max_len: usize) -> Result<(usize, SandboxWord), InstanceError> {
        let bound = max_len.saturating_sub(1);
        let bytes = s.as_bytes();
        let truncated = &bytes[..bytes.len().min(bound)];
        let (native_offset, sandbox_ptr) = self.reserve(truncated.len() + 1, 1)?;
        self.write_native(native_offset, truncated);
        self.write_native(native_offset + truncated.len(), &[0u8]);
        Ok((native_offset, sandbox_ptr))
    }

    /// Allocates a contiguous region for `count` elements of `elem_size` bytes, aligned to
    /// `align`.
    pub fn array(
        &mut self,
        count: usize,
        elem_size: usize,
        align: usize,
    ) -> Result<(usize, SandboxWord), InstanceError> {
        self.reserve(count * elem_size, align)
    }

    /// Promotes every byte allocated so far within this scope (and any uncommitted nested
    /// scopes that already dropped) to permanent: it survives this scope's drop and any
    /// ancestor scope's revert.
    ///
    /// # Panics
    /// Panics if an inner scope is still alive, per the "may not be persisted while an inner
    /// scope is still live" invariant (`spec.md` §3) — this is a programming error, not a
    /// plugin-triggerable one.
    pub fn commit(mut self) {
        assert_eq!(
            self.depth_at_entry, self.arena.depth,
            "cannot commit an arena scope while an inner scope is still live"
        );
        self.arena.native_floor = self.arena.native_pos;
        self.arena.sandbox_floor = self.arena.sandbox_pos;
        self.committed = true;
    }
}

impl<'a> Drop for ArenaScope<'a> {
    fn drop(&mut self) {
        self.arena.depth -= 1;
        if !self.committed {
            self.arena.native_pos = self.native_entry.max(self.arena.native_floor);
            self.arena.sandbox_pos = self.sandbox_entry.max(self.arena.sandbox_floor);
        }
    }
}

/// A per-[`Instance`](crate::Instance) free-list of [`Arena`]s, recycled once fully reset.
#[derive(Default)]
pub struct ArenaPool {
    free: Vec<Arena>,
}

impl ArenaPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops a reusable arena, or allocates a new sandbox region via `alloc_sandbox` (expected to
    /// call the instance's `malloc` export once, for [`ARENA_SIZE`] bytes).
    pub fn claim(
        &mut self,
        alloc_sandbox: impl FnOnce() -> Result<SandboxWord, InstanceError>,
    ) -> Result<Arena, InstanceError> {
        match self.free.pop() {
            Some(arena) => Ok(arena),
            None => Ok(Arena::new(alloc_sandbox()?)),
        }
    }

    /// Returns an arena to the pool if it carries no permanent (committed) content; otherwise
    /// the arena is dropped, since handing its sandbox region to a new owner with leftover
    /// persistent data would be unsound.
    pub fn release(&mut self, arena: Arena) {
        if arena.is_fully_reset() {
            self.free.push(arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_reverts_on_drop() {
        let mut arena = Arena::new(SandboxWord::W32(0x1000));
        {
            let mut scope = arena.scope();
            scope.reserve(128, 8).unwrap();
        }
        assert!(arena.is_fully_reset());
    }

    #[test]
    fn committed_scope_persists_past_drop() {
        let mut arena = Arena::new(SandboxWord::W32(0x1000));
        {
            let mut scope = arena.scope();
            scope.reserve(64, 8).unwrap();
            scope.commit();
        }
        assert!(!arena.is_fully_reset());
    }

    #[test]
    fn nested_scopes_revert_independently() {
        let mut arena = Arena::new(SandboxWord::W32(0x1000));
        let mut outer = arena.scope();
        let (outer_off, _) = outer.reserve(16, 8).unwrap();
        {
            let mut inner = outer.scope();
            inner.reserve(16, 8).unwrap();
        }
        // Inner scope reverted; outer's own allocation is untouched.
        let (next_off, _) = outer.reserve(16, 8).unwrap();
        assert_eq!(next_off, outer_off + 16);
    }

    #[test]
    #[should_panic]
    fn commit_while_inner_scope_live_panics() {
        let mut arena = Arena::new(SandboxWord::W32(0x1000));
        let mut outer = arena.scope();
        let _inner = outer.scope();
        outer.commit();
    }

    #[test]
    fn string_write_truncates_to_bound() {
        let mut arena = Arena::new(SandboxWord::W32(0x1000));
        let mut scope = arena.scope();
        let (offset, _) = scope.write_string("hello world", 6).unwrap();
        assert_eq!(scope.read_native(offset, 6), b"hello\0");
    }
}
