//! Parameter gesture events, marking the start/end of a continuous UI-driven parameter edit.

use crate::events::{CoreEventSpace, Event, EventFlags, EventHeader};
use clap_sys::events::{
    CLAP_EVENT_PARAM_GESTURE_BEGIN, CLAP_EVENT_PARAM_GESTURE_END, clap_event_param_gesture,
};
use std::fmt::{Debug, Formatter};

macro_rules! param_gesture_event {
    ($name:ident, $type_id:expr, $doc:expr) => {
        #[doc = $doc]
        #[repr(C)]
        #[derive(Copy, Clone)]
        pub struct $name {
            inner: clap_event_param_gesture,
        }

        impl $name {
            #[inline]
            pub fn new(time: u32, param_id: u32) -> Self {
                Self {
                    inner: clap_event_param_gesture {
                        header: EventHeader::<Self>::new(time, EventFlags::empty()).into_raw(),
                        param_id,
                    },
                }
            }

            #[inline]
            pub fn from_raw(raw: clap_event_param_gesture) -> Self {
                Self { inner: raw }
            }

            #[inline]
            pub fn into_raw(self) -> clap_event_param_gesture {
                self.inner
            }

            #[inline]
            pub fn param_id(&self) -> u32 {
                self.inner.param_id
            }
        }

        // SAFETY: the type ID matches the event space this event belongs to, and the struct is
        // `repr(C)` over `clap_event_param_gesture`.
        unsafe impl<'a> Event<'a> for $name {
            const TYPE_ID: u16 = $type_id as u16;
            type EventSpace = CoreEventSpace<'a>;
        }

        impl PartialEq for $name {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.inner.param_id == other.inner.param_id
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("param_id", &self.inner.param_id)
                    .finish()
            }
        }
    };
}

param_gesture_event!(
    ParamGestureBeginEvent,
    CLAP_EVENT_PARAM_GESTURE_BEGIN,
    "A UI-driven continuous edit of a parameter (e.g. dragging a knob) has begun."
);
param_gesture_event!(
    ParamGestureEndEvent,
    CLAP_EVENT_PARAM_GESTURE_END,
    "A UI-driven continuous edit of a parameter has ended."
);
