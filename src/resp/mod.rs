// https://redis.io/docs/reference/protocol-spec

pub mod parser;
pub mod writer;

pub use parser::Parser;
pub use writer::Writer;

use thiserror::Error as ThisError;

/// A malformed byte stream. Protocol errors are fatal to the connection that
/// produced them.
#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    #[error("protocol error; malformed length")]
    BadLength,
    #[error("protocol error; bad bulk string length")]
    BadBulkLength,
    #[error("protocol error; bad array length")]
    BadArrayLength,
    #[error("protocol error; carriage return without newline")]
    MissingNewline,
}

/// Streaming view of a RESP value sequence.
///
/// The parser pushes one `begin_*`/`end_*` pair per value, with zero or more
/// `chars` calls in between carrying the payload. For bulk strings the
/// declared `len` is the exact concatenated `chars` length; for arrays,
/// exactly `len` nested values are emitted between the begin and end calls
/// (`len == -1` encodes a nil with no nested values, likewise a nil bulk
/// string carries no payload).
pub trait Handler {
    fn begin_simple_string(&mut self);
    fn end_simple_string(&mut self);

    fn begin_error(&mut self);
    fn end_error(&mut self);

    fn begin_integer(&mut self);
    fn end_integer(&mut self);

    fn begin_bulk_string(&mut self, len: i64);
    fn end_bulk_string(&mut self);

    fn begin_array(&mut self, len: i64);
    fn end_array(&mut self);

    fn chars(&mut self, bytes: &[u8]);
}

/// Handler that discards every event.
pub struct NullHandler;

impl Handler for NullHandler {
    fn begin_simple_string(&mut self) {}
    fn end_simple_string(&mut self) {}
    fn begin_error(&mut self) {}
    fn end_error(&mut self) {}
    fn begin_integer(&mut self) {}
    fn end_integer(&mut self) {}
    fn begin_bulk_string(&mut self, _len: i64) {}
    fn end_bulk_string(&mut self) {}
    fn begin_array(&mut self, _len: i64) {}
    fn end_array(&mut self) {}
    fn chars(&mut self, _bytes: &[u8]) {}
}
