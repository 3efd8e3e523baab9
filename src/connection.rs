use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::buffer::RingBuffer;
use crate::handler::CommandHandler;
use crate::resp::{Parser, Writer};
use crate::store::Store;

/// Per-client pipeline: socket bytes land in the ring buffer, the parser
/// pushes events into the command handler, and the replies buffered by the
/// writer are flushed back to the socket once the parser has gone as far as
/// the input allows.
pub struct Connection {
    stream: TcpStream,
    buffer: RingBuffer,
    parser: Parser,
    handler: CommandHandler<Writer<Vec<u8>>>,
}

impl Connection {
    pub fn new(stream: TcpStream, store: Arc<Mutex<Store>>) -> Connection {
        Connection {
            stream,
            buffer: RingBuffer::with_capacity(1 << 13),
            parser: Parser::new(),
            handler: CommandHandler::new(store, Writer::new(Vec::new())),
        }
    }

    /// Serves the connection until the peer hangs up or faults. Any error is
    /// the caller's cue to drop the client; other clients are unaffected.
    pub async fn run(&mut self) -> crate::Result<()> {
        loop {
            let free = self.buffer.writable();
            if free.is_empty() {
                // The parser could not make progress through a full buffer.
                return Err("input buffer overflow".into());
            }

            let n = self.stream.read(free).await?;
            if n == 0 {
                return Ok(()); // peer hung up
            }
            self.buffer.commit(n);

            let consumed = self
                .parser
                .parse(self.buffer.readable(), &mut self.handler)?;
            self.buffer.consume(consumed);
            debug!(read = n, consumed, "parsed input chunk");

            if self.handler.is_fatal() {
                return Err("unexpected top-level frame".into());
            }

            self.flush().await?;
        }
    }

    async fn flush(&mut self) -> crate::Result<()> {
        let out = self.handler.output_mut().get_mut();
        if !out.is_empty() {
            self.stream.write_all(out).await?;
            out.clear();
        }
        Ok(())
    }
}
