//! Wrappers around the CLAP input/output event list ABI structures.

use crate::events::UnknownEvent;
use clap_sys::events::{clap_event_header, clap_input_events, clap_output_events};
use std::marker::PhantomData;

mod implementation;
pub use implementation::{InputEventBuffer, OutputEventBuffer};

/// A read-only, C-FFI compatible view of a sequence of timestamp-ordered events, as provided to
/// a plugin's `process` call.
#[repr(C)]
pub struct InputEvents<'a> {
    inner: clap_input_events,
    _lifetime: PhantomData<&'a clap_input_events>,
}

impl<'a> InputEvents<'a> {
    /// # Safety
    /// The given pointer must be valid for the requested lifetime.
    #[inline]
    pub unsafe fn from_raw(raw: &'a clap_input_events) -> &'a Self {
        // SAFETY: InputEvents is repr(C) and ABI-compatible with clap_input_events.
        &*(raw as *const clap_input_events as *const Self)
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_input_events {
        &self.inner
    }

    #[inline]
    pub fn len(&self) -> u32 {
        // SAFETY: this type can only be constructed from a host-provided pointer, so the CLAP
        // spec enforces that this function pointer is valid to call.
        unsafe { (self.inner.size)(&self.inner) }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, index: u32) -> Option<&'a UnknownEvent<'a>> {
        // SAFETY: same as above; a null result means out-of-bounds.
        let raw: *const clap_event_header = unsafe { (self.inner.get)(&self.inner, index) };
        if raw.is_null() {
            return None;
        }

        // SAFETY: the host guarantees the returned pointer is valid for this call's lifetime.
        Some(unsafe { UnknownEvent::from_raw(&*raw) })
    }

    #[inline]
    pub fn iter(&self) -> InputEventsIter<'a, '_> {
        InputEventsIter {
            events: self,
            index: 0,
        }
    }

    /// Builds a new [`InputEvents`] view over a Rust-side [`InputEventBuffer`].
    pub fn from_buffer<B: InputEventBuffer>(buffer: &'a B) -> OwnedInputEvents<'a, B> {
        OwnedInputEvents {
            inner: clap_input_events {
                ctx: buffer as *const B as *mut std::ffi::c_void,
                size: size::<B>,
                get: get::<B>,
            },
            _buffer: PhantomData,
        }
    }
}

impl<'a> IntoIterator for &'a InputEvents<'a> {
    type Item = &'a UnknownEvent<'a>;
    type IntoIter = InputEventsIter<'a, 'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct InputEventsIter<'a, 'e> {
    events: &'e InputEvents<'a>,
    index: u32,
}

impl<'a, 'e> Iterator for InputEventsIter<'a, 'e> {
    type Item = &'a UnknownEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.get(self.index)?;
        self.index += 1;
        Some(event)
    }
}

/// An owned, Rust-backed [`InputEvents`] view, built from a [`InputEventBuffer`].
#[repr(C)]
pub struct OwnedInputEvents<'a, B> {
    inner: clap_input_events,
    _buffer: PhantomData<&'a B>,
}

impl<'a, B: InputEventBuffer> OwnedInputEvents<'a, B> {
    #[inline]
    pub fn as_input_events(&self) -> &InputEvents<'a> {
        // SAFETY: OwnedInputEvents and InputEvents share the same repr(C) layout.
        unsafe { &*(self as *const Self as *const InputEvents<'a>) }
    }
}

unsafe extern "C" fn size<B: InputEventBuffer>(list: *const clap_input_events) -> u32 {
    // SAFETY: ctx was set from a valid &B in from_buffer, and outlives this call.
    let buffer = unsafe { &*((*list).ctx as *const B) };
    buffer.len()
}

unsafe extern "C" fn get<B: InputEventBuffer>(
    list: *const clap_input_events,
    index: u32,
) -> *const clap_event_header {
    // SAFETY: same as above.
    let buffer = unsafe { &*((*list).ctx as *const B) };
    buffer
        .get(index)
        .map(|e| e.as_raw() as *const _)
        .unwrap_or(std::ptr::null())
}

/// A write-only, C-FFI compatible sink of timestamp-ordered events, as provided to a plugin's
/// `process` call for it to emit new events into (e.g. note-end, or a parameter value pulled from
/// an automation curve).
#[repr(C)]
pub struct OutputEvents<'a> {
    inner: clap_output_events,
    _lifetime: PhantomData<&'a mut clap_output_events>,
}

impl<'a> OutputEvents<'a> {
    /// # Safety
    /// The given pointer must be valid for the requested lifetime.
    #[inline]
    pub unsafe fn from_raw(raw: &'a clap_output_events) -> &'a Self {
        // SAFETY: OutputEvents is repr(C) and ABI-compatible with clap_output_events.
        &*(raw as *const clap_output_events as *const Self)
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_output_events {
        &self.inner
    }

    /// Attempts to push an event onto this output list. Returns `false` if the host rejected it.
    #[inline]
    pub fn try_push(&self, event: &UnknownEvent) -> bool {
        // SAFETY: this type can only be constructed from a host-provided pointer, so the CLAP
        // spec enforces that this function pointer is valid to call.
        unsafe { (self.inner.try_push)(&self.inner, event.as_raw()) }
    }

    /// Builds a new [`OutputEvents`] view over a Rust-side [`OutputEventBuffer`].
    pub fn from_buffer<B: OutputEventBuffer>(buffer: &'a mut B) -> OwnedOutputEvents<'a, B> {
        OwnedOutputEvents {
            inner: clap_output_events {
                ctx: buffer as *mut B as *mut std::ffi::c_void,
                try_push: try_push::<B>,
            },
            _buffer: PhantomData,
        }
    }
}

/// An owned, Rust-backed [`OutputEvents`] view, built from a [`OutputEventBuffer`].
#[repr(C)]
pub struct OwnedOutputEvents<'a, B> {
    inner: clap_output_events,
    _buffer: PhantomData<&'a mut B>,
}

impl<'a, B: OutputEventBuffer> OwnedOutputEvents<'a, B> {
    #[inline]
    pub fn as_output_events(&self) -> &OutputEvents<'a> {
        // SAFETY: OwnedOutputEvents and OutputEvents share the same repr(C) layout.
        unsafe { &*(self as *const Self as *const OutputEvents<'a>) }
    }
}

unsafe extern "C" fn try_push<B: OutputEventBuffer>(
    list: *const clap_output_events,
    event: *const clap_event_header,
) -> bool {
    // SAFETY: ctx was set from a valid &mut B in from_buffer; the host only calls try_push
    // re-entrantly from within the same `process` call that owns this borrow.
    let buffer = unsafe { &mut *((*list).ctx as *mut B) };
    // SAFETY: the host guarantees the event pointer is valid for the duration of this call.
    let event = unsafe { UnknownEvent::from_raw(&*event) };
    buffer.try_push(event)
}

/// A simple, growable, timestamp-ordered in-memory event buffer, suitable for backing an
/// [`InputEvents`] or [`OutputEvents`] view.
#[derive(Default)]
pub struct EventBuffer {
    events: Vec<Box<[u8]>>,
}

impl EventBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.events.clear()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl InputEventBuffer for EventBuffer {
    #[inline]
    fn len(&self) -> u32 {
        self.events.len() as u32
    }

    #[inline]
    fn get(&self, index: u32) -> Option<&UnknownEvent> {
        self.events
            .get(index as usize)
            .map(|bytes| unsafe { UnknownEvent::from_bytes(bytes) })
    }
}

impl OutputEventBuffer for EventBuffer {
    #[inline]
    fn try_push(&mut self, event: &UnknownEvent) -> bool {
        self.events.push(event.as_bytes().into());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types::NoteOnEvent;

    #[test]
    fn buffer_roundtrips_events() {
        let mut buffer = EventBuffer::new();
        let event = NoteOnEvent::new(3, 0, 0, 60, -1, 1.0);
        assert!(OutputEventBuffer::try_push(&mut buffer, event.as_unknown()));

        let input = InputEvents::from_buffer(&buffer);
        let views = input.as_input_events();
        assert_eq!(views.len(), 1);
        let roundtripped = views.get(0).unwrap().as_event::<NoteOnEvent>().unwrap();
        assert_eq!(*roundtripped, event);
    }
}
