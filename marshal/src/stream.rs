//! Stream relay (`spec.md` §4.E, "Stream relay"): the sandbox's `clap_istream`/`clap_ostream`
//! trampolines never touch the host's stream directly. Every call is relayed through a bounded
//! native staging buffer, chunked to at most [`STREAM_CHUNK_LEN`] bytes per round trip, since the
//! sandbox side only ever supplies a buffer pointer plus a length and the host stream lives in a
//! completely different address space.

use crate::error::MarshalError;
use wclap_common::abi::layout::STREAM_CHUNK_LEN;
use wclap_common::abi::SandboxWord;
use wclap_common::stream::{InputStream, OutputStream};
use wclap_engine::Instance;
use std::io::{Read, Write};

/// Relays one `clap_istream.read` call: reads up to `requested_len` bytes (capped to
/// [`STREAM_CHUNK_LEN`]) from `source` and copies them into the sandbox at `sandbox_buf`.
/// Returns the byte count read, or `-1` on I/O error, matching the `clap_istream.read` ABI.
pub fn relay_read(
    instance: &Instance,
    source: &mut InputStream<'_>,
    sandbox_buf: SandboxWord,
    requested_len: usize,
) -> Result<i64, MarshalError> {
    let chunk_len = requested_len.min(STREAM_CHUNK_LEN);
    let mut staging = vec![0u8; chunk_len];
    match source.read(&mut staging) {
        Ok(read) => {
            instance.write_memory(sandbox_buf, &staging[..read])?;
            Ok(read as i64)
        }
        Err(_) => Ok(-1),
    }
}

/// Relays one `clap_ostream.write` call: copies up to `len` bytes (capped to
/// [`STREAM_CHUNK_LEN`]) out of the sandbox at `sandbox_buf` and writes them to `sink`. Returns
/// the byte count written, or `-1` on I/O error, matching the `clap_ostream.write` ABI.
pub fn relay_write(
    instance: &Instance,
    sink: &mut OutputStream<'_>,
    sandbox_buf: SandboxWord,
    len: usize,
) -> Result<i64, MarshalError> {
    let chunk_len = len.min(STREAM_CHUNK_LEN);
    let staging = instance.read_memory(sandbox_buf, chunk_len)?;
    match sink.write(&staging) {
        Ok(written) => Ok(written as i64),
        Err(_) => Ok(-1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wclap_engine::{Engine, Module, WasiDirs};
    use std::io::Cursor;

    const MINIMAL_WAT: &str = r#"
        (module
            (memory (export "memory") 1)
            (global (export "clap_entry") i32 (i32.const 0))
            (func (export "malloc") (param i32) (result i32) (local.get 0))
            (table (export "wclap_table") 1 70000 funcref)
        )
    "#;

    fn instance() -> Instance {
        let engine = Engine::global_init(None).unwrap();
        let bytes = wat::parse_str(MINIMAL_WAT).unwrap();
        let module = Module::open(engine, &bytes).unwrap();
        Instance::new(&module, WasiDirs::default()).unwrap()
    }

    #[test]
    fn read_relay_chunks_to_the_stream_bound() {
        let instance = instance();
        let mut cursor = Cursor::new(vec![7u8; STREAM_CHUNK_LEN * 2]);
        let mut source = InputStream::from_reader(&mut cursor);
        let read = relay_read(&instance, &mut source, SandboxWord::W32(0), STREAM_CHUNK_LEN * 2).unwrap();
        assert_eq!(read as usize, STREAM_CHUNK_LEN);
    }

    #[test]
    fn write_relay_copies_sandbox_bytes_to_the_sink() {
        let instance = instance();
        instance.write_memory(SandboxWord::W32(0), b"hello").unwrap();
        let mut buf = Vec::new();
        let mut sink = OutputStream::from_writer(&mut buf);
        let written = relay_write(&instance, &mut sink, SandboxWord::W32(0), 5).unwrap();
        assert_eq!(written, 5);
        assert_eq!(buf, b"hello");
    }
}
