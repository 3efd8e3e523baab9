use bytes::{Bytes, BytesMut};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::commands::{Command, Executable};
use crate::frame::Frame;
use crate::resp::Handler;
use crate::store::Store;

// Upper bound on how much a single declared length may pre-allocate. Data
// beyond the hint still accumulates normally.
const MAX_RESERVE: usize = 1 << 20;

/// Assembles one command's arguments from RESP events: payload bytes pile up
/// in a single scratch buffer and each argument records its end offset, so
/// materializing the argument vector is a handful of cheap sub-slices of the
/// frozen buffer.
#[derive(Default)]
pub(crate) struct ArgAssembler {
    buf: BytesMut,
    ends: Vec<usize>,
}

impl ArgAssembler {
    pub(crate) fn begin(&mut self, len: i64) {
        self.buf.clear();
        self.ends.clear();
        if len > 0 {
            self.ends.reserve((len as usize).min(1024));
        }
    }

    pub(crate) fn reserve(&mut self, len: i64) {
        if len > 0 {
            self.buf.reserve((len as usize).min(MAX_RESERVE));
        }
    }

    pub(crate) fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn end_arg(&mut self) {
        self.ends.push(self.buf.len());
    }

    pub(crate) fn finish(&mut self) -> Vec<Bytes> {
        let data = self.buf.split().freeze();
        let mut args = Vec::with_capacity(self.ends.len());
        let mut begin = 0;
        for &end in &self.ends {
            args.push(data.slice(begin..end));
            begin = end;
        }
        self.ends.clear();
        args
    }
}

/// RESP handler that buffers one array-of-bulk-strings command at a time,
/// dispatches it against the shared store, and emits the reply into its sink.
///
/// Top-level simple strings, errors and integers cannot start a command and
/// mark the handler fatal; the connection is expected to check
/// [`is_fatal`](CommandHandler::is_fatal) and drop. Stray bulk strings outside
/// an array accumulate harmlessly and are discarded when the next command
/// starts.
pub struct CommandHandler<O> {
    store: Arc<Mutex<Store>>,
    out: O,
    args: ArgAssembler,
    assembling: bool,
    fatal: bool,
}

impl<O: Handler> CommandHandler<O> {
    pub fn new(store: Arc<Mutex<Store>>, out: O) -> CommandHandler<O> {
        CommandHandler {
            store,
            out,
            args: ArgAssembler::default(),
            assembling: false,
            fatal: false,
        }
    }

    /// The reply sink.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.out
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }
}

impl<O: Handler> Handler for CommandHandler<O> {
    fn begin_simple_string(&mut self) {
        self.fatal = true;
    }

    fn end_simple_string(&mut self) {}

    fn begin_error(&mut self) {
        self.fatal = true;
    }

    fn end_error(&mut self) {}

    fn begin_integer(&mut self) {
        self.fatal = true;
    }

    fn end_integer(&mut self) {}

    fn begin_array(&mut self, len: i64) {
        if self.fatal {
            return;
        }
        if self.assembling {
            // A nested array can't be a command argument.
            self.fatal = true;
            return;
        }
        self.assembling = true;
        self.args.begin(len);
    }

    fn end_array(&mut self) {
        if self.fatal {
            return;
        }
        self.assembling = false;

        let args = self.args.finish();
        let Some(name) = args.first() else {
            // A blank inline line; nothing to answer.
            return;
        };
        debug!(command = %String::from_utf8_lossy(name), "dispatching");

        let reply = match Command::try_from(&args[..]) {
            Ok(command) => {
                let mut store = self.store.lock().unwrap();
                command.exec(&mut store)
            }
            Err(e) => Frame::Error(e.to_string()),
        };
        reply.emit(&mut self.out);
    }

    fn begin_bulk_string(&mut self, len: i64) {
        if !self.fatal {
            self.args.reserve(len);
        }
    }

    fn end_bulk_string(&mut self) {
        if !self.fatal {
            self.args.end_arg();
        }
    }

    fn chars(&mut self, bytes: &[u8]) {
        if !self.fatal {
            self.args.append(bytes);
        }
    }
}
