//! Parameter value and modulation events.

use crate::events::{CoreEventSpace, Event, EventFlags, EventHeader};
use crate::utils::Cookie;
use clap_sys::events::{
    CLAP_EVENT_PARAM_MOD, CLAP_EVENT_PARAM_VALUE, clap_event_param_mod, clap_event_param_value,
};
use std::fmt::{Debug, Formatter};

/// Sets a parameter to an absolute value.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct ParamValueEvent {
    inner: clap_event_param_value,
}

impl ParamValueEvent {
    #[inline]
    pub fn new(
        time: u32,
        param_id: u32,
        cookie: Cookie,
        port_index: i16,
        channel: i16,
        key: i16,
        note_id: i32,
        value: f64,
    ) -> Self {
        Self {
            inner: clap_event_param_value {
                header: EventHeader::<Self>::new(time, EventFlags::empty()).into_raw(),
                param_id,
                cookie: cookie.as_raw(),
                note_id,
                port_index,
                channel,
                key,
                value,
            },
        }
    }

    #[inline]
    pub fn from_raw(raw: clap_event_param_value) -> Self {
        Self { inner: raw }
    }

    #[inline]
    pub fn into_raw(self) -> clap_event_param_value {
        self.inner
    }

    #[inline]
    pub fn param_id(&self) -> u32 {
        self.inner.param_id
    }

    #[inline]
    pub fn cookie(&self) -> Cookie {
        Cookie::from_raw(self.inner.cookie)
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
    pub fn channel(&self) -> i16 {
        self.inner.channel
    }

    #[inline]
    pub fn key(&self) -> i16 {
        self.inner.key
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.inner.value
    }
}

// SAFETY: CLAP_EVENT_PARAM_VALUE is the correct type ID for this event in the core event space.
unsafe impl<'a> Event<'a> for ParamValueEvent {
    const TYPE_ID: u16 = CLAP_EVENT_PARAM_VALUE as u16;
    type EventSpace = CoreEventSpace<'a>;
}

impl PartialEq for ParamValueEvent {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.key == other.inner.key
            && self.inner.channel == other.inner.channel
            && self.inner.port_index == other.inner.port_index
            && self.inner.note_id == other.inner.note_id
            && self.inner.param_id == other.inner.param_id
            && self.inner.value == other.inner.value
    }
}

impl Debug for ParamValueEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamValueEvent")
            .field("port_index", &self.inner.port_index)
            .field("channel", &self.inner.channel)
            .field("key", &self.inner.key)
            .field("note_id", &self.inner.note_id)
            .field("param_id", &self.inner.param_id)
            .field("value", &self.inner.value)
            .finish()
    }
}

/// Reports a modulation amount applied on top of a parameter's value, from a modulation source
/// external to the plugin (e.g. a host-side MIDI CC mapping).
#[repr(C)]
#[derive(Copy, Clone)]
pub struct ParamModEvent {
    inner: clap_event_param_mod,
}

impl ParamModEvent {
    #[inline]
    pub fn new(
        time: u32,
        param_id: u32,
        cookie: Cookie,
        port_index: i16,
        channel: i16,
        key: i16,
        note_id: i32,
        amount: f64,
    ) -> Self {
        Self {
            inner: clap_event_param_mod {
                header: EventHeader::<Self>::new(time, EventFlags::empty()).into_raw(),
                param_id,
                cookie: cookie.as_raw(),
                note_id,
                port_index,
                channel,
                key,
                amount,
            },
        }
    }

    #[inline]
    pub fn from_raw(raw: clap_event_param_mod) -> Self {
        Self { inner: raw }
    }

    #[inline]
    pub fn into_raw(self) -> clap_event_param_mod {
        self.inner
    }

    #[inline]
    pub fn param_id(&self) -> u32 {
        self.inner.param_id
    }

    #[inline]
    pub fn cookie(&self) -> Cookie {
        Cookie::from_raw(self.inner.cookie)
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
    pub fn channel(&self) -> i16 {
        self.inner.channel
    }

    #[inline]
    pub fn key(&self) -> i16 {
        self.inner.key
    }

    #[inline]
    pub fn amount(&self) -> f64 {
        self.inner.amount
    }
}

// SAFETY: CLAP_EVENT_PARAM_MOD is the correct type ID for this event in the core event space.
unsafe impl<'a> Event<'a> for ParamModEvent {
    const TYPE_ID: u16 = CLAP_EVENT_PARAM_MOD as u16;
    type EventSpace = CoreEventSpace<'a>;
}

impl PartialEq for ParamModEvent {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.key == other.inner.key
            && self.inner.channel == other.inner.channel
            && self.inner.port_index == other.inner.port_index
            && self.inner.note_id == other.inner.note_id
            && self.inner.param_id == other.inner.param_id
            && self.inner.amount == other.inner.amount
    }
}

impl Debug for ParamModEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamModEvent")
            .field("port_index", &self.inner.port_index)
            .field("channel", &self.inner.channel)
            .field("key", &self.inner.key)
            .field("note_id", &self.inner.note_id)
            .field("param_id", &self.inner.param_id)
            .field("amount", &self.inner.amount)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_event_roundtrips() {
        let event = ParamValueEvent::new(0, 7, Cookie::empty(), -1, -1, -1, -1, 0.5);
        assert_eq!(event, ParamValueEvent::from_raw(event.into_raw()));
    }
}
