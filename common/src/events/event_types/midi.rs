//! The raw MIDI 1.0, MIDI 2.0 and System Exclusive passthrough events.

use crate::events::{CoreEventSpace, Event, EventFlags, EventHeader};
use clap_sys::events::{
    CLAP_EVENT_MIDI, CLAP_EVENT_MIDI2, CLAP_EVENT_MIDI_SYSEX, clap_event_midi, clap_event_midi2,
    clap_event_midi_sysex,
};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// A single raw MIDI 1.0 message, passed through to or from a plugin untouched.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct MidiEvent {
    inner: clap_event_midi,
}

impl MidiEvent {
    #[inline]
    pub fn new(time: u32, port_index: u16, data: [u8; 3]) -> Self {
        Self {
            inner: clap_event_midi {
                header: EventHeader::<Self>::new(time, EventFlags::empty()).into_raw(),
                port_index,
                data,
            },
        }
    }

    #[inline]
    pub fn from_raw(raw: clap_event_midi) -> Self {
        Self { inner: raw }
    }

    #[inline]
    pub fn into_raw(self) -> clap_event_midi {
        self.inner
    }

    #[inline]
    pub fn port_index(&self) -> u16 {
        self.inner.port_index
    }

    #[inline]
    pub fn data(&self) -> [u8; 3] {
        self.inner.data
    }
}

// SAFETY: CLAP_EVENT_MIDI is the correct type ID for this event in the core event space.
unsafe impl<'a> Event<'a> for MidiEvent {
    const TYPE_ID: u16 = CLAP_EVENT_MIDI as u16;
    type EventSpace = CoreEventSpace<'a>;
}

impl PartialEq for MidiEvent {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.data == other.inner.data && self.inner.port_index == other.inner.port_index
    }
}

impl Debug for MidiEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiEvent")
            .field("port_index", &self.inner.port_index)
            .field("data", &self.inner.data)
            .finish()
    }
}

/// A single raw MIDI 2.0 Universal MIDI Packet message.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct Midi2Event {
    inner: clap_event_midi2,
}

impl Midi2Event {
    #[inline]
    pub fn new(time: u32, port_index: u16, data: [u32; 4]) -> Self {
        Self {
            inner: clap_event_midi2 {
                header: EventHeader::<Self>::new(time, EventFlags::empty()).into_raw(),
                port_index,
                data,
            },
        }
    }

    #[inline]
    pub fn from_raw(raw: clap_event_midi2) -> Self {
        Self { inner: raw }
    }

    #[inline]
    pub fn into_raw(self) -> clap_event_midi2 {
        self.inner
    }

    #[inline]
    pub fn port_index(&self) -> u16 {
        self.inner.port_index
    }

    #[inline]
    pub fn data(&self) -> [u32; 4] {
        self.inner.data
    }
}

// SAFETY: CLAP_EVENT_MIDI2 is the correct type ID for this event in the core event space.
unsafe impl<'a> Event<'a> for Midi2Event {
    const TYPE_ID: u16 = CLAP_EVENT_MIDI2 as u16;
    type EventSpace = CoreEventSpace<'a>;
}

impl PartialEq for Midi2Event {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.data == other.inner.data && self.inner.port_index == other.inner.port_index
    }
}

impl Debug for Midi2Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Midi2Event")
            .field("port_index", &self.inner.port_index)
            .field("data", &self.inner.data)
            .finish()
    }
}

/// A System Exclusive MIDI message. The payload buffer is borrowed for the event's lifetime,
/// since sysex buffers are not bounded by the fixed event struct size (`spec.md` §4.E.4).
#[repr(C)]
#[derive(Copy, Clone)]
pub struct MidiSysExEvent<'buf> {
    inner: clap_event_midi_sysex,
    _buffer_lifetime: PhantomData<&'buf [u8]>,
}

impl<'buf> MidiSysExEvent<'buf> {
    #[inline]
    pub fn new(time: u32, port_index: u16, buffer: &'buf [u8]) -> Self {
        Self {
            _buffer_lifetime: PhantomData,
            inner: clap_event_midi_sysex {
                header: EventHeader::<Self>::new(time, EventFlags::empty()).into_raw(),
                port_index,
                buffer: buffer.as_ptr(),
                size: buffer.len() as u32,
            },
        }
    }

    /// Reconstructs a borrowed sysex event from its raw, C-FFI compatible struct.
    ///
    /// # Safety
    ///
    /// The caller must ensure `raw.buffer` is valid for `raw.size` bytes, for the `'buf`
    /// lifetime.
    #[inline]
    pub unsafe fn from_raw(raw: clap_event_midi_sysex) -> Self {
        Self {
            _buffer_lifetime: PhantomData,
            inner: raw,
        }
    }

    #[inline]
    pub fn port_index(&self) -> u16 {
        self.inner.port_index
    }

    #[inline]
    pub fn data(&self) -> &'buf [u8] {
        if self.inner.size == 0 {
            return &[];
        }
        // SAFETY: this struct ensures the buffer is valid and for the required lifetime
        unsafe { ::core::slice::from_raw_parts(self.inner.buffer, self.inner.size as usize) }
    }

    #[inline]
    pub fn into_raw(self) -> clap_event_midi_sysex {
        self.inner
    }
}

// SAFETY: CLAP_EVENT_MIDI_SYSEX is the correct type ID for this event in the core event space.
unsafe impl<'a> Event<'a> for MidiSysExEvent<'a> {
    const TYPE_ID: u16 = CLAP_EVENT_MIDI_SYSEX as u16;
    type EventSpace = CoreEventSpace<'a>;
}

impl<'a> PartialEq for MidiSysExEvent<'a> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.port_index == other.inner.port_index && self.data() == other.data()
    }
}

impl<'a> Debug for MidiSysExEvent<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiSysExEvent")
            .field("port_index", &self.inner.port_index)
            .field("data", &self.data())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysex_roundtrips_through_raw() {
        let payload = [0xF0, 0x7E, 0x00, 0xF7];
        let event = MidiSysExEvent::new(0, 0, &payload);
        let raw = event.into_raw();
        // SAFETY: `payload` outlives `raw` here.
        let restored = unsafe { MidiSysExEvent::from_raw(raw) };
        assert_eq!(restored.data(), &payload);
    }
}
