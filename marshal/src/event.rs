//! Event translation (`spec.md` §4.E.8): a tagged variant dispatch over the twelve core event
//! types. The sandbox wire layout is packed (no padding) and uses a [`SandboxWord`] wherever the
//! native struct carries a [`Cookie`]; every other field is a plain little-endian integer or
//! float at the native struct's own width.
//!
//! `nativeToWasm` inspects the native event through [`CoreEventSpace`] and re-encodes it into
//! this wire layout. `wasmToNative` does the reverse by reconstructing a native event through its
//! `new()` constructor and handing back its ABI bytes via [`Event::as_unknown`] — the bridge never
//! builds a native event struct by hand.

use crate::cookie::{cookie_from_sandbox, cookie_to_sandbox};
use crate::error::MarshalError;
use crate::wire::read_word;
use wclap_common::abi::layout::MAX_SYSEX_LEN;
use wclap_common::abi::SandboxWord;
use wclap_common::events::event_types::*;
use wclap_common::events::{CoreEventSpace, Event, EventHeader, UnknownEvent};
use wclap_common::utils::Cookie;
use wclap_engine::{ArenaScope, Instance};

const HEADER_LEN: usize = 16;

fn encode_header(buf: &mut Vec<u8>, time: u32, type_id: u16, flags: u32) {
    // `size` is filled in by the caller once the whole payload is known.
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&time.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes()); // space_id: always the core space on this wire.
    buf.extend_from_slice(&type_id.to_le_bytes());
    buf.extend_from_slice(&flags.to_le_bytes());
}

fn finalize_size(buf: &mut Vec<u8>) {
    let len = buf.len() as u32;
    buf[0..4].copy_from_slice(&len.to_le_bytes());
}

struct WireHeader {
    time: u32,
    type_id: u16,
}

fn decode_header(bytes: &[u8]) -> Result<WireHeader, MarshalError> {
    if bytes.len() < HEADER_LEN {
        return Err(MarshalError::Truncated { expected: HEADER_LEN, actual: bytes.len() });
    }
    let time = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
    let type_id = u16::from_le_bytes(bytes[12..14].try_into().unwrap());
    Ok(WireHeader { time, type_id })
}

/// `nativeToWasm` for one event: re-encodes `event` into the sandbox wire layout inside `scope`,
/// returning the sandbox pointer to the encoded bytes. Sysex payloads are capped at
/// [`MAX_SYSEX_LEN`] bytes; anything longer is truncated, never rejected.
pub fn event_to_sandbox(
    scope: &mut ArenaScope<'_>,
    event: &UnknownEvent<'_>,
) -> Result<SandboxWord, MarshalError> {
    // SAFETY: every event the bridge hands to this function was constructed by the host side of
    // the CLAP ABI, so it genuinely belongs to the core event space.
    let core = unsafe { CoreEventSpace::from_unknown(event) }
        .ok_or_else(|| MarshalError::UnknownEventType(event.header().type_id()))?;

    let is_64 = scope.is_sixty_four_bit();
    let mut wire = Vec::new();

    match core {
        CoreEventSpace::NoteOn(e) => encode_note(&mut wire, e.header().time(), NoteOnEvent::TYPE_ID, e.port_index(), e.channel(), e.key(), e.note_id(), e.velocity()),
        CoreEventSpace::NoteOff(e) => encode_note(&mut wire, e.header().time(), NoteOffEvent::TYPE_ID, e.port_index(), e.channel(), e.key(), e.note_id(), e.velocity()),
        CoreEventSpace::NoteChoke(e) => encode_note(&mut wire, e.header().time(), NoteChokeEvent::TYPE_ID, e.port_index(), e.channel(), e.key(), e.note_id(), e.velocity()),
        CoreEventSpace::NoteEnd(e) => encode_note(&mut wire, e.header().time(), NoteEndEvent::TYPE_ID, e.port_index(), e.channel(), e.key(), e.note_id(), e.velocity()),
        CoreEventSpace::NoteExpression(e) => {
            encode_header(&mut wire, e.header().time(), NoteExpressionEvent::TYPE_ID, 0);
            wire.extend_from_slice(&e.expression_type().map(|t| t.into_raw()).unwrap_or(-1).to_le_bytes());
            wire.extend_from_slice(&e.note_id().to_le_bytes());
            wire.extend_from_slice(&e.port_index().to_le_bytes());
            wire.extend_from_slice(&e.channel().to_le_bytes());
            wire.extend_from_slice(&e.key().to_le_bytes());
            wire.extend_from_slice(&e.value().to_le_bytes());
        }
        CoreEventSpace::ParamValue(e) => encode_param(&mut wire, e.header().time(), ParamValueEvent::TYPE_ID, e.param_id(), e.cookie(), e.port_index(), e.channel(), e.key(), e.note_id(), e.value(), is_64)?,
        CoreEventSpace::ParamMod(e) => encode_param(&mut wire, e.header().time(), ParamModEvent::TYPE_ID, e.param_id(), e.cookie(), e.port_index(), e.channel(), e.key(), e.note_id(), e.amount(), is_64)?,
        CoreEventSpace::ParamGestureBegin(e) => {
            encode_header(&mut wire, e.header().time(), ParamGestureBeginEvent::TYPE_ID, 0);
            wire.extend_from_slice(&e.param_id().to_le_bytes());
        }
        CoreEventSpace::ParamGestureEnd(e) => {
            encode_header(&mut wire, e.header().time(), ParamGestureEndEvent::TYPE_ID, 0);
            wire.extend_from_slice(&e.param_id().to_le_bytes());
        }
        CoreEventSpace::Transport(e) => {
            encode_header(&mut wire, e.header().time(), TransportEvent::TYPE_ID, e.flags().bits());
            wire.extend_from_slice(&e.song_pos_beats().to_le_bytes());
            wire.extend_from_slice(&e.song_pos_seconds().to_le_bytes());
            wire.extend_from_slice(&e.tempo().to_le_bytes());
            wire.extend_from_slice(&e.tempo_inc().to_le_bytes());
            wire.extend_from_slice(&e.bar_start().to_le_bytes());
            wire.extend_from_slice(&e.bar_number().to_le_bytes());
            wire.extend_from_slice(&e.loop_start_beats().to_le_bytes());
            wire.extend_from_slice(&e.loop_end_beats().to_le_bytes());
            wire.extend_from_slice(&e.loop_start_seconds().to_le_bytes());
            wire.extend_from_slice(&e.loop_end_seconds().to_le_bytes());
            let (num, den) = e.time_signature();
            wire.extend_from_slice(&num.to_le_bytes());
            wire.extend_from_slice(&den.to_le_bytes());
        }
        CoreEventSpace::Midi(e) => {
            encode_header(&mut wire, e.header().time(), MidiEvent::TYPE_ID, 0);
            wire.extend_from_slice(&e.port_index().to_le_bytes());
            wire.extend_from_slice(&e.data());
        }
        CoreEventSpace::Midi2(e) => {
            encode_header(&mut wire, e.header().time(), Midi2Event::TYPE_ID, 0);
            wire.extend_from_slice(&e.port_index().to_le_bytes());
            for word in e.data() {
                wire.extend_from_slice(&word.to_le_bytes());
            }
        }
        CoreEventSpace::MidiSysEx(e) => {
            encode_header(&mut wire, e.header().time(), MidiSysExEvent::TYPE_ID, 0);
            wire.extend_from_slice(&e.port_index().to_le_bytes());
            let data = &e.data()[..e.data().len().min(MAX_SYSEX_LEN)];
            let (offset, ptr) = scope.array(data.len(), 1, 1)?;
            scope.write_native(offset, data);
            if scope_word_width(scope) == 8 {
                wire.extend_from_slice(&ptr.as_u64().to_le_bytes());
            } else {
                wire.extend_from_slice(&(ptr.as_u64() as u32).to_le_bytes());
            }
            wire.extend_from_slice(&(data.len() as u32).to_le_bytes());
        }
    }

    finalize_size(&mut wire);
    let (offset, ptr) = scope.array(wire.len(), 1, 8)?;
    scope.write_native(offset, &wire);
    Ok(ptr)
}

#[allow(clippy::too_many_arguments)]
fn encode_note(wire: &mut Vec<u8>, time: u32, type_id: u16, port_index: i16, channel: i16, key: i16, note_id: i32, velocity: f64) {
    encode_header(wire, time, type_id, 0);
    wire.extend_from_slice(&note_id.to_le_bytes());
    wire.extend_from_slice(&port_index.to_le_bytes());
    wire.extend_from_slice(&channel.to_le_bytes());
    wire.extend_from_slice(&key.to_le_bytes());
    wire.extend_from_slice(&velocity.to_le_bytes());
}

#[allow(clippy::too_many_arguments)]
fn encode_param(
    wire: &mut Vec<u8>,
    time: u32,
    type_id: u16,
    param_id: u32,
    cookie: Cookie,
    port_index: i16,
    channel: i16,
    key: i16,
    note_id: i32,
    value: f64,
    is_64: bool,
) -> Result<(), MarshalError> {
    encode_header(wire, time, type_id, 0);
    wire.extend_from_slice(&param_id.to_le_bytes());
    let word = cookie_to_sandbox(cookie, is_64)?;
    if is_64 {
        wire.extend_from_slice(&word.as_u64().to_le_bytes());
    } else {
        wire.extend_from_slice(&(word.as_u64() as u32).to_le_bytes());
    }
    wire.extend_from_slice(&note_id.to_le_bytes());
    wire.extend_from_slice(&port_index.to_le_bytes());
    wire.extend_from_slice(&channel.to_le_bytes());
    wire.extend_from_slice(&key.to_le_bytes());
    wire.extend_from_slice(&value.to_le_bytes());
    Ok(())
}

fn scope_word_width(scope: &ArenaScope<'_>) -> usize {
    if scope.is_sixty_four_bit() { 8 } else { 4 }
}

/// `wasmToNative` for one event: reads the sandbox wire bytes at `ptr`, dispatches on the tagged
/// `type` field, and returns the owned native ABI bytes (`Event::as_unknown().as_bytes()`) ready
/// to push onto a host event list. Unknown tags are dropped per `spec.md` §9.
pub fn event_from_sandbox(instance: &Instance, ptr: SandboxWord) -> Result<Option<Vec<u8>>, MarshalError> {
    let header_bytes = instance.read_memory(ptr, HEADER_LEN)?;
    let header = decode_header(&header_bytes)?;
    let is_64 = instance.is_sixty_four_bit();
    let word_width = if is_64 { 8 } else { 4 };

    macro_rules! field {
        ($bytes:expr, $range:expr, $t:ty) => {
            <$t>::from_le_bytes($bytes[$range].try_into().unwrap())
        };
    }

    let event = match header.type_id {
        t if t == NoteOnEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 34)?;
            NoteOnEvent::new(header.time, field!(b, 20..22, i16), field!(b, 22..24, i16), field!(b, 24..26, i16), field!(b, 16..20, i32), field!(b, 26..34, f64)).into_raw().into()
        }
        t if t == NoteOffEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 34)?;
            NoteOffEvent::new(header.time, field!(b, 20..22, i16), field!(b, 22..24, i16), field!(b, 24..26, i16), field!(b, 16..20, i32), field!(b, 26..34, f64)).into_raw().into()
        }
        t if t == NoteChokeEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 34)?;
            NoteChokeEvent::new(header.time, field!(b, 20..22, i16), field!(b, 22..24, i16), field!(b, 24..26, i16), field!(b, 16..20, i32), field!(b, 26..34, f64)).into_raw().into()
        }
        t if t == NoteEndEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 34)?;
            NoteEndEvent::new(header.time, field!(b, 20..22, i16), field!(b, 22..24, i16), field!(b, 24..26, i16), field!(b, 16..20, i32), field!(b, 26..34, f64)).into_raw().into()
        }
        t if t == NoteExpressionEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 38)?;
            let expr = NoteExpressionType::from_raw(field!(b, 16..20, i32));
            return Ok(expr.map(|expr| {
                NoteExpressionEvent::new(header.time, expr, field!(b, 24..26, i16), field!(b, 26..28, i16), field!(b, 28..30, i16), field!(b, 20..24, i32), field!(b, 30..38, f64))
                    .as_unknown()
                    .as_bytes()
                    .to_vec()
            }));
        }
        t if t == ParamValueEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 16 + 4 + word_width + 4 + 2 + 2 + 2 + 8)?;
            let cookie = cookie_from_sandbox(read_word(&b[20..20 + word_width], is_64));
            let tail = 20 + word_width;
            ParamValueEvent::new(
                header.time,
                field!(b, 16..20, u32),
                cookie,
                field!(b, tail + 4..tail + 6, i16),
                field!(b, tail + 6..tail + 8, i16),
                field!(b, tail + 8..tail + 10, i16),
                field!(b, tail..tail + 4, i32),
                field!(b, tail + 10..tail + 18, f64),
            )
            .into_raw()
            .into()
        }
        t if t == ParamModEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 16 + 4 + word_width + 4 + 2 + 2 + 2 + 8)?;
            let cookie = cookie_from_sandbox(read_word(&b[20..20 + word_width], is_64));
            let tail = 20 + word_width;
            ParamModEvent::new(
                header.time,
                field!(b, 16..20, u32),
                cookie,
                field!(b, tail + 4..tail + 6, i16),
                field!(b, tail + 6..tail + 8, i16),
                field!(b, tail + 8..tail + 10, i16),
                field!(b, tail..tail + 4, i32),
                field!(b, tail + 10..tail + 18, f64),
            )
            .into_raw()
            .into()
        }
        t if t == ParamGestureBeginEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 20)?;
            ParamGestureBeginEvent::new(header.time, field!(b, 16..20, u32)).into_raw().into()
        }
        t if t == ParamGestureEndEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 20)?;
            ParamGestureEndEvent::new(header.time, field!(b, 16..20, u32)).into_raw().into()
        }
        t if t == MidiEvent::TYPE_ID => {
            let b = instance.read_memory(ptr, 21)?;
            MidiEvent::new(header.time, field!(b, 16..18, u16), [b[18], b[19], b[20]]).into_raw().into()
        }
        t if t == Midi2Event::TYPE_ID => {
            let b = instance.read_memory(ptr, 34)?;
            let data = [
                field!(b, 18..22, u32),
                field!(b, 22..26, u32),
                field!(b, 26..30, u32),
                field!(b, 30..34, u32),
            ];
            Midi2Event::new(header.time, field!(b, 16..18, u16), data).into_raw().into()
        }
        t if t == MidiSysExEvent::TYPE_ID => {
            let head = instance.read_memory(ptr, 18 + word_width + 4)?;
            let port_index = field!(head, 16..18, u16);
            let buf_ptr = read_word(&head[18..18 + word_width], is_64);
            let size = field!(head, 18 + word_width..22 + word_width, u32) as usize;
            let size = size.min(MAX_SYSEX_LEN);
            let payload = instance.read_memory(buf_ptr, size)?;
            return Ok(Some(
                // SAFETY: `payload` outlives the call below; the resulting bytes are copied out
                // via `as_bytes` before `payload` drops.
                unsafe { MidiSysExEvent::new(header.time, port_index, &payload) }
                    .as_unknown()
                    .as_bytes()
                    .to_vec(),
            ));
        }
        other => return Err(MarshalError::UnknownEventType(other)),
    };

    Ok(Some(as_bytes(&event)))
}

/// A translated event awaiting its `as_bytes()` copy, sidestepping the lifetime of a stack local.
enum RawEvent {
    Note(clap_sys::events::clap_event_note),
    ParamValue(clap_sys::events::clap_event_param_value),
    ParamMod(clap_sys::events::clap_event_param_mod),
    ParamGesture(clap_sys::events::clap_event_param_gesture),
    Midi(clap_sys::events::clap_event_midi),
    Midi2(clap_sys::events::clap_event_midi2),
}

impl From<clap_sys::events::clap_event_note> for RawEvent {
    fn from(v: clap_sys::events::clap_event_note) -> Self {
        Self::Note(v)
    }
}
impl From<clap_sys::events::clap_event_param_value> for RawEvent {
    fn from(v: clap_sys::events::clap_event_param_value) -> Self {
        Self::ParamValue(v)
    }
}
impl From<clap_sys::events::clap_event_param_mod> for RawEvent {
    fn from(v: clap_sys::events::clap_event_param_mod) -> Self {
        Self::ParamMod(v)
    }
}
impl From<clap_sys::events::clap_event_param_gesture> for RawEvent {
    fn from(v: clap_sys::events::clap_event_param_gesture) -> Self {
        Self::ParamGesture(v)
    }
}
impl From<clap_sys::events::clap_event_midi> for RawEvent {
    fn from(v: clap_sys::events::clap_event_midi) -> Self {
        Self::Midi(v)
    }
}
impl From<clap_sys::events::clap_event_midi2> for RawEvent {
    fn from(v: clap_sys::events::clap_event_midi2) -> Self {
        Self::Midi2(v)
    }
}

fn as_bytes(event: &RawEvent) -> Vec<u8> {
    fn raw<T>(value: &T) -> Vec<u8> {
        // SAFETY: every variant of `RawEvent` is a `repr(C)` CLAP event struct whose first field
        // is a `clap_event_header` with an accurate `size`.
        unsafe { std::slice::from_raw_parts(value as *const T as *const u8, std::mem::size_of::<T>()) }.to_vec()
    }
    match event {
        RawEvent::Note(v) => raw(v),
        RawEvent::ParamValue(v) => raw(v),
        RawEvent::ParamMod(v) => raw(v),
        RawEvent::ParamGesture(v) => raw(v),
        RawEvent::Midi(v) => raw(v),
        RawEvent::Midi2(v) => raw(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wclap_engine::{Arena, Engine, Module, WasiDirs};

    const MINIMAL_WAT: &str = r#"
        (module
            (memory (export "memory") 1)
            (global (export "clap_entry") i32 (i32.const 0))
            (func (export "malloc") (param i32) (result i32) (local.get 0))
            (table (export "wclap_table") 1 70000 funcref)
        )
    "#;

    fn instance() -> (wclap_engine::Instance,) {
        let engine = Engine::global_init(None).unwrap();
        let bytes = wat::parse_str(MINIMAL_WAT).unwrap();
        let module = Module::open(engine, &bytes).unwrap();
        (Instance::new(&module, WasiDirs::default()).unwrap(),)
    }

    #[test]
    fn note_on_round_trips_through_the_wire() {
        let (instance,) = instance();
        let base = instance.malloc_arena().unwrap();
        let mut arena = Arena::new(base);
        let mut scope = arena.scope();

        let original = NoteOnEvent::new(12, 0, 1, 60, -1, 0.8);
        let ptr = event_to_sandbox(&mut scope, original.as_unknown()).unwrap();

        let flat = scope.read_native(0, wclap_engine::ARENA_SIZE as usize);
        instance.write_memory(base, flat).unwrap();

        let native_bytes = event_from_sandbox(&instance, ptr).unwrap().unwrap();
        // SAFETY: `native_bytes` was produced by `as_bytes()` on a real NoteOnEvent above.
        let header = unsafe { EventHeader::<()>::from_raw(&*(native_bytes.as_ptr() as *const _)) };
        assert_eq!(header.type_id(), NoteOnEvent::TYPE_ID);
        assert_eq!(header.time(), 12);
    }

    #[test]
    fn param_value_preserves_the_cookie() {
        let (instance,) = instance();
        let base = instance.malloc_arena().unwrap();
        let mut arena = Arena::new(base);
        let mut scope = arena.scope();

        let cookie = Cookie::from_raw(0x42 as *mut std::ffi::c_void);
        let original = ParamValueEvent::new(0, 7, cookie, -1, -1, -1, -1, 0.5);
        let ptr = event_to_sandbox(&mut scope, original.as_unknown()).unwrap();

        let flat = scope.read_native(0, wclap_engine::ARENA_SIZE as usize);
        instance.write_memory(base, flat).unwrap();

        let native_bytes = event_from_sandbox(&instance, ptr).unwrap().unwrap();
        let raw: clap_sys::events::clap_event_param_value =
            unsafe { std::ptr::read(native_bytes.as_ptr() as *const _) };
        assert_eq!(ParamValueEvent::from_raw(raw).cookie(), cookie);
    }
}
