//! The four note lifecycle events: `NoteOn`, `NoteOff`, `NoteChoke`, `NoteEnd`.

use crate::events::{CoreEventSpace, Event, EventFlags, EventHeader};
use clap_sys::events::{
    CLAP_EVENT_NOTE_CHOKE, CLAP_EVENT_NOTE_END, CLAP_EVENT_NOTE_OFF, CLAP_EVENT_NOTE_ON,
    clap_event_note,
};
use std::fmt::{Debug, Formatter};

macro_rules! note_event {
    ($name:ident, $type_id:expr, $doc:expr) => {
        #[doc = $doc]
        #[repr(C)]
        #[derive(Copy, Clone)]
        pub struct $name {
            inner: clap_event_note,
        }

        impl $name {
            /// Creates a new note event targeting the given port, channel and key.
            ///
            /// A `note_id` of `-1` means this event does not carry a specific note ID.
            #[inline]
            pub fn new(
                time: u32,
                port_index: i16,
                channel: i16,
                key: i16,
                note_id: i32,
                velocity: f64,
            ) -> Self {
                Self {
                    inner: clap_event_note {
                        header: EventHeader::<Self>::new(time, EventFlags::empty()).into_raw(),
                        note_id,
                        port_index,
                        channel,
                        key,
                        velocity,
                    },
                }
            }

            #[inline]
            pub fn from_raw(raw: clap_event_note) -> Self {
                Self { inner: raw }
            }

            #[inline]
            pub fn into_raw(self) -> clap_event_note {
                self.inner
            }

            #[inline]
            pub fn port_index(&self) -> i16 {
                self.inner.port_index
            }

            #[inline]
            pub fn channel(&self) -> i16 {
                self.inner.channel
            }

            #[inline]
            pub fn key(&self) -> i16 {
                self.inner.key
            }

            #[inline]
            pub fn note_id(&self) -> i32 {
                self.inner.note_id
            }

            #[inline]
            pub fn velocity(&self) -> f64 {
                self.inner.velocity
            }
        }

        // SAFETY: the type ID matches the event space this event belongs to, and the struct is
        // `repr(C)` with a `clap_event_header`-compatible layout as its first field.
        unsafe impl<'a> Event<'a> for $name {
            const TYPE_ID: u16 = $type_id as u16;
            type EventSpace = CoreEventSpace<'a>;
        }

        impl PartialEq for $name {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.inner.key == other.inner.key
                    && self.inner.channel == other.inner.channel
                    && self.inner.port_index == other.inner.port_index
                    && self.inner.note_id == other.inner.note_id
                    && self.inner.velocity == other.inner.velocity
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("port_index", &self.inner.port_index)
                    .field("channel", &self.inner.channel)
                    .field("key", &self.inner.key)
                    .field("note_id", &self.inner.note_id)
                    .field("velocity", &self.inner.velocity)
                    .finish()
            }
        }
    };
}

note_event!(NoteOnEvent, CLAP_EVENT_NOTE_ON, "A note starts playing.");
note_event!(NoteOffEvent, CLAP_EVENT_NOTE_OFF, "A note stops playing.");
note_event!(
    NoteChokeEvent,
    CLAP_EVENT_NOTE_CHOKE,
    "A note stops playing immediately, without a release phase."
);
note_event!(
    NoteEndEvent,
    CLAP_EVENT_NOTE_END,
    "The plugin reports that a note has finished playing, to let the host reclaim its voice."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_raw() {
        let event = NoteOnEvent::new(12, 0, 1, 60, -1, 0.8);
        let raw = event.into_raw();
        let restored = NoteOnEvent::from_raw(raw);
        assert_eq!(event, restored);
    }

    #[test]
    fn type_ids_are_distinct() {
        assert_ne!(NoteOnEvent::TYPE_ID, NoteOffEvent::TYPE_ID);
        assert_ne!(NoteChokeEvent::TYPE_ID, NoteEndEvent::TYPE_ID);
    }
}
