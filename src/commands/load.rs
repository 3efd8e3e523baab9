use bytes::Bytes;
use std::io::Read;

use crate::buffer::RingBuffer;
use crate::commands::{Command, CommandError, Executable};
use crate::frame::Frame;
use crate::handler::ArgAssembler;
use crate::resp::{Handler, Parser};
use crate::store::Store;

/// Clears the keyspace and replays the persisted state stream through the
/// RESP parser, discarding the replies of the replayed commands.
#[derive(Debug, PartialEq)]
pub struct Load;

impl Executable for Load {
    fn exec(self, store: &mut Store) -> Frame {
        let mut reader = match store.state_reader() {
            Ok(reader) => reader,
            Err(_) => return Frame::Error("ERR failed to load db state".to_string()),
        };

        store.clear();

        let mut ring = RingBuffer::with_capacity(1 << 13);
        let mut parser = Parser::new();
        let mut replayer = Replayer {
            store,
            args: ArgAssembler::default(),
        };

        loop {
            let free = ring.writable();
            if free.is_empty() {
                // A single length line larger than the buffer; the stream is
                // not something SAVE produced.
                return Frame::Error("ERR failed to load db state".to_string());
            }

            let n = match reader.read(free) {
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => return Frame::Error("ERR failed to load db state".to_string()),
            };
            if n == 0 {
                break;
            }
            ring.commit(n);

            let consumed = match parser.parse(ring.readable(), &mut replayer) {
                Ok(consumed) => consumed,
                Err(_) => return Frame::Error("ERR failed to load db state".to_string()),
            };
            ring.consume(consumed);
        }

        Frame::Simple("OK".to_string())
    }
}

impl TryFrom<&[Bytes]> for Load {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [_] => Ok(Self),
            _ => Err(CommandError::WrongArity),
        }
    }
}

/// Assembles and executes the replayed command arrays against the
/// already-locked store; replies are dropped on the floor.
struct Replayer<'a> {
    store: &'a mut Store,
    args: ArgAssembler,
}

impl Handler for Replayer<'_> {
    fn begin_simple_string(&mut self) {}
    fn end_simple_string(&mut self) {}
    fn begin_error(&mut self) {}
    fn end_error(&mut self) {}
    fn begin_integer(&mut self) {}
    fn end_integer(&mut self) {}

    fn begin_array(&mut self, len: i64) {
        self.args.begin(len);
    }

    fn end_array(&mut self) {
        let args = self.args.finish();
        if args.is_empty() {
            return;
        }
        match Command::try_from(&args[..]) {
            // A snapshot only ever contains SET and RPUSH; honoring a stray
            // SAVE or LOAD would recurse into the state stream.
            Ok(Command::Save(_)) | Ok(Command::Load(_)) | Err(_) => {}
            Ok(command) => {
                command.exec(self.store);
            }
        }
    }

    fn begin_bulk_string(&mut self, len: i64) {
        self.args.reserve(len);
    }

    fn end_bulk_string(&mut self) {
        self.args.end_arg();
    }

    fn chars(&mut self, bytes: &[u8]) {
        self.args.append(bytes);
    }
}
