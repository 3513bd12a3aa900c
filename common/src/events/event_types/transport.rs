//! The transport event, carrying the host's current play-head position and tempo.

use crate::events::{CoreEventSpace, Event, EventHeader};
use bitflags::bitflags;
use clap_sys::events::{
    CLAP_EVENT_TRANSPORT, CLAP_TRANSPORT_HAS_BEATS_TIMELINE, CLAP_TRANSPORT_HAS_SECONDS_TIMELINE,
    CLAP_TRANSPORT_HAS_TEMPO, CLAP_TRANSPORT_HAS_TIME_SIGNATURE, CLAP_TRANSPORT_IS_LOOP_ACTIVE,
    CLAP_TRANSPORT_IS_PLAYING, CLAP_TRANSPORT_IS_RECORDING, CLAP_TRANSPORT_IS_WITHIN_PRE_ROLL,
    clap_event_transport,
};
use std::fmt::{Debug, Formatter};

bitflags! {
    #[repr(C)]
    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    pub struct TransportEventFlags: u32 {
        const HAS_TEMPO = CLAP_TRANSPORT_HAS_TEMPO;
        const HAS_BEATS_TIMELINE = CLAP_TRANSPORT_HAS_BEATS_TIMELINE;
        const HAS_SECONDS_TIMELINE = CLAP_TRANSPORT_HAS_SECONDS_TIMELINE;
        const HAS_TIME_SIGNATURE = CLAP_TRANSPORT_HAS_TIME_SIGNATURE;
        const IS_PLAYING = CLAP_TRANSPORT_IS_PLAYING;
        const IS_RECORDING = CLAP_TRANSPORT_IS_RECORDING;
        const IS_LOOP_ACTIVE = CLAP_TRANSPORT_IS_LOOP_ACTIVE;
        const IS_WITHIN_PRE_ROLL = CLAP_TRANSPORT_IS_WITHIN_PRE_ROLL;
    }
}

/// Reports the host's transport (play-head) state: position, tempo, loop and time signature.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct TransportEvent {
    inner: clap_event_transport,
}

impl TransportEvent {
    #[inline]
    pub fn from_raw(raw: clap_event_transport) -> Self {
        Self { inner: raw }
    }

    #[inline]
    pub fn into_raw(self) -> clap_event_transport {
        self.inner
    }

    #[inline]
    pub fn header(&self) -> &EventHeader<Self> {
        // SAFETY: this type is repr(C) over clap_event_transport, whose first field is the header.
        unsafe { EventHeader::from_raw(&self.inner.header) }
    }

    #[inline]
    pub fn flags(&self) -> TransportEventFlags {
        TransportEventFlags::from_bits_truncate(self.inner.flags)
    }

    #[inline]
    pub fn song_pos_beats(&self) -> i64 {
        self.inner.song_pos_beats
    }

    #[inline]
    pub fn song_pos_seconds(&self) -> i64 {
        self.inner.song_pos_seconds
    }

    #[inline]
    pub fn tempo(&self) -> f64 {
        self.inner.tempo
    }

    #[inline]
    pub fn tempo_inc(&self) -> f64 {
        self.inner.tempo_inc
    }

    #[inline]
    pub fn bar_start(&self) -> i64 {
        self.inner.bar_start
    }

    #[inline]
    pub fn bar_number(&self) -> i32 {
        self.inner.bar_number
    }

    #[inline]
    pub fn loop_start_beats(&self) -> i64 {
        self.inner.loop_start_beats
    }

    #[inline]
    pub fn loop_end_beats(&self) -> i64 {
        self.inner.loop_end_beats
    }

    #[inline]
    pub fn loop_start_seconds(&self) -> i64 {
        self.inner.loop_start_seconds
    }

    #[inline]
    pub fn loop_end_seconds(&self) -> i64 {
        self.inner.loop_end_seconds
    }

    #[inline]
    pub fn time_signature(&self) -> (i16, i16) {
        (
            self.inner.time_signature_numerator,
            self.inner.time_signature_denominator,
        )
    }
}

// SAFETY: CLAP_EVENT_TRANSPORT is the correct type ID for this event in the core event space.
unsafe impl<'a> Event<'a> for TransportEvent {
    const TYPE_ID: u16 = CLAP_EVENT_TRANSPORT as u16;
    type EventSpace = CoreEventSpace<'a>;
}

impl PartialEq for TransportEvent {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.flags == other.inner.flags
            && self.inner.song_pos_beats == other.inner.song_pos_beats
            && self.inner.song_pos_seconds == other.inner.song_pos_seconds
            && self.inner.tempo == other.inner.tempo
            && self.inner.bar_number == other.inner.bar_number
    }
}

impl Debug for TransportEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportEvent")
            .field("flags", &self.flags())
            .field("song_pos_beats", &self.inner.song_pos_beats)
            .field("tempo", &self.inner.tempo)
            .field("bar_number", &self.inner.bar_number)
            .finish()
    }
}
