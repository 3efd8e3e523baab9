use std::io::Write;

use crate::resp::Handler;

/// [`Handler`] that serializes its event stream as RESP bytes into an
/// [`std::io::Write`] sink.
///
/// Sink failures are latched rather than propagated: the first error marks
/// the writer bad and every later event is discarded. Callers that care about
/// delivery inspect [`is_bad`](Writer::is_bad) once the stream is complete.
pub struct Writer<W> {
    sink: W,
    bad: bool,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W) -> Writer<W> {
        Writer { sink, bad: false }
    }

    pub fn is_bad(&self) -> bool {
        self.bad
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn flush(&mut self) {
        if !self.bad && self.sink.flush().is_err() {
            self.bad = true;
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        if self.bad {
            return;
        }
        if self.sink.write_all(bytes).is_err() {
            self.bad = true;
        }
    }

    fn put_fmt(&mut self, args: std::fmt::Arguments) {
        if self.bad {
            return;
        }
        if self.sink.write_fmt(args).is_err() {
            self.bad = true;
        }
    }
}

impl<W: Write> Handler for Writer<W> {
    fn begin_simple_string(&mut self) {
        self.put(b"+");
    }

    fn end_simple_string(&mut self) {
        self.put(b"\r\n");
    }

    fn begin_error(&mut self) {
        self.put(b"-");
    }

    fn end_error(&mut self) {
        self.put(b"\r\n");
    }

    fn begin_integer(&mut self) {
        self.put(b":");
    }

    fn end_integer(&mut self) {
        self.put(b"\r\n");
    }

    fn begin_bulk_string(&mut self, len: i64) {
        if len == -1 {
            self.put_fmt(format_args!("${}", len));
        } else {
            self.put_fmt(format_args!("${}\r\n", len));
        }
    }

    fn end_bulk_string(&mut self) {
        self.put(b"\r\n");
    }

    fn begin_array(&mut self, len: i64) {
        self.put_fmt(format_args!("*{}\r\n", len));
    }

    fn end_array(&mut self) {}

    fn chars(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }
}
