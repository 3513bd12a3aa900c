//! The note-expression event, for continuous per-voice modulation (pressure, vibrato, etc.).

use crate::events::{CoreEventSpace, Event, EventFlags, EventHeader};
use clap_sys::events::*;
use std::fmt::{Debug, Formatter};

#[non_exhaustive]
#[repr(i32)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NoteExpressionType {
    Volume = CLAP_NOTE_EXPRESSION_VOLUME,
    Pan = CLAP_NOTE_EXPRESSION_PAN,
    Tuning = CLAP_NOTE_EXPRESSION_TUNING,
    Vibrato = CLAP_NOTE_EXPRESSION_VIBRATO,
    Brightness = CLAP_NOTE_EXPRESSION_BRIGHTNESS,
    Breath = CLAP_NOTE_EXPRESSION_BREATH,
    Pressure = CLAP_NOTE_EXPRESSION_PRESSURE,
    Timbre = CLAP_NOTE_EXPRESSION_TIMBRE,
}

impl NoteExpressionType {
    #[inline]
    pub fn from_raw(raw: clap_note_expression) -> Option<Self> {
        use NoteExpressionType::*;
        match raw {
            CLAP_NOTE_EXPRESSION_VOLUME => Some(Volume),
            CLAP_NOTE_EXPRESSION_PAN => Some(Pan),
            CLAP_NOTE_EXPRESSION_TUNING => Some(Tuning),
            CLAP_NOTE_EXPRESSION_VIBRATO => Some(Vibrato),
            CLAP_NOTE_EXPRESSION_BRIGHTNESS => Some(Brightness),
            CLAP_NOTE_EXPRESSION_BREATH => Some(Breath),
            CLAP_NOTE_EXPRESSION_PRESSURE => Some(Pressure),
            CLAP_NOTE_EXPRESSION_TIMBRE => Some(Timbre),
            _ => None,
        }
    }

    #[inline]
    pub fn into_raw(self) -> clap_note_expression {
        self as clap_note_expression
    }
}

/// Reports a continuous, per-voice expression change (pressure, vibrato, pan, ...).
#[repr(C)]
#[derive(Copy, Clone)]
pub struct NoteExpressionEvent {
    inner: clap_event_note_expression,
}

impl NoteExpressionEvent {
    #[inline]
    pub fn new(
        time: u32,
        expression_type: NoteExpressionType,
        port_index: i16,
        channel: i16,
        key: i16,
        note_id: i32,
        value: f64,
    ) -> Self {
        Self {
            inner: clap_event_note_expression {
                header: EventHeader::<Self>::new(time, EventFlags::empty()).into_raw(),
                expression_id: expression_type.into_raw(),
                note_id,
                port_index,
                channel,
                key,
                value,
            },
        }
    }

    #[inline]
    pub fn from_raw(raw: clap_event_note_expression) -> Self {
        Self { inner: raw }
    }

    #[inline]
    pub fn into_raw(self) -> clap_event_note_expression {
        self.inner
    }

    #[inline]
    pub fn expression_type(&self) -> Option<NoteExpressionType> {
        NoteExpressionType::from_raw(self.inner.expression_id)
    }

    #[inline]
    pub fn note_id(&self) -> i32 {
        self.inner.note_id
    }

    #[inline]
    pub fn port_index(&self) -> i16 {
        self.inner.port_index
    }

    #[inline]
    pub fn key(&self) -> i16 {
        self.inner.key
    }

    #[inline]
    pub fn channel(&self) -> i16 {
        self.inner.channel
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.inner.value
    }
}

// SAFETY: CLAP_EVENT_NOTE_EXPRESSION is the correct type ID for this event in the core event space.
unsafe impl<'a> Event<'a> for NoteExpressionEvent {
    const TYPE_ID: u16 = CLAP_EVENT_NOTE_EXPRESSION as u16;
    type EventSpace = CoreEventSpace<'a>;
}

impl PartialEq for NoteExpressionEvent {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.key == other.inner.key
            && self.inner.expression_id == other.inner.expression_id
            && self.inner.channel == other.inner.channel
            && self.inner.port_index == other.inner.port_index
            && self.inner.note_id == other.inner.note_id
            && self.inner.value == other.inner.value
    }
}

impl Debug for NoteExpressionEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteExpressionEvent")
            .field("port_index", &self.inner.port_index)
            .field("channel", &self.inner.channel)
            .field("key", &self.inner.key)
            .field("note_id", &self.inner.note_id)
            .field("expression_id", &self.inner.expression_id)
            .field("value", &self.inner.value)
            .finish()
    }
}
