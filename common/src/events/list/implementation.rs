use crate::events::UnknownEvent;

/// A Rust-side backing store an [`InputEvents`](super::InputEvents) can present to a plugin.
pub trait InputEventBuffer {
    fn len(&self) -> u32;
    fn get(&self, index: u32) -> Option<&UnknownEvent>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A Rust-side backing store an [`OutputEvents`](super::OutputEvents) can append events into.
pub trait OutputEventBuffer {
    /// Appends an event to this buffer. Returns `false` if the buffer refused the event (e.g. it
    /// is full).
    fn try_push(&mut self, event: &UnknownEvent) -> bool;
}

impl InputEventBuffer for Vec<Box<[u8]>> {
    #[inline]
    fn len(&self) -> u32 {
        self.as_slice().len() as u32
    }

    #[inline]
    fn get(&self, index: u32) -> Option<&UnknownEvent> {
        // SAFETY: each boxed slice was populated from a valid event's `as_bytes()`.
        self.as_slice()
            .get(index as usize)
            .map(|bytes| unsafe { UnknownEvent::from_bytes(bytes) })
    }
}

impl OutputEventBuffer for Vec<Box<[u8]>> {
    #[inline]
    fn try_push(&mut self, event: &UnknownEvent) -> bool {
        self.push(event.as_bytes().into());
        true
    }
}
