use memchr::memchr;

use crate::resp::{Error, Handler};

/// Push-based RESP parser.
///
/// [`parse`](Parser::parse) consumes a prefix of its input, firing [`Handler`]
/// events as value boundaries and payload bytes become available, and returns
/// how many bytes it consumed. The unconsumed suffix must be presented again
/// once more bytes have arrived; the parser keeps its position in the value
/// grammar across calls, so the input may be split at any byte boundary.
/// Payload bytes already handed to `chars` are counted as consumed even while
/// the value they belong to is still open.
pub struct Parser {
    stack: Vec<State>,
}

#[derive(Clone, Copy)]
enum State {
    /// Waiting for the leading type byte of a value. The bottom frame is
    /// terminal: it never pops, so the parser accepts an unbounded sequence
    /// of top-level values.
    Value { terminal: bool },
    Simple(SimpleKind),
    Length(LengthKind),
    BulkString { remaining: i64 },
    Array { remaining: i64 },
    InlineCommand,
}

#[derive(Clone, Copy)]
enum SimpleKind {
    SimpleString,
    Error,
    Integer,
}

#[derive(Clone, Copy)]
enum LengthKind {
    BulkString,
    Array,
}

enum Step {
    Continue(usize),
    Yield(usize),
}

impl Parser {
    pub fn new() -> Parser {
        Parser {
            stack: vec![State::Value { terminal: true }],
        }
    }

    pub fn parse<H: Handler>(&mut self, input: &[u8], handler: &mut H) -> Result<usize, Error> {
        let mut pos = 0;
        loop {
            let state = *self.stack.last().expect("bottom parser frame never pops");
            let step = match state {
                State::Value { terminal } => self.value(input, pos, terminal, handler),
                State::Simple(kind) => self.simple(input, pos, kind, handler)?,
                State::Length(kind) => self.length(input, pos, kind, handler)?,
                State::BulkString { remaining } => self.bulk_string(input, pos, remaining, handler),
                State::Array { remaining } => self.array(pos, remaining, handler),
                State::InlineCommand => self.inline_command(input, pos, handler),
            };
            match step {
                Step::Continue(next) => pos = next,
                Step::Yield(next) => return Ok(next),
            }
        }
    }

    fn value<H: Handler>(
        &mut self,
        input: &[u8],
        pos: usize,
        terminal: bool,
        handler: &mut H,
    ) -> Step {
        let Some(&byte) = input.get(pos) else {
            return Step::Yield(pos);
        };

        if !terminal {
            self.stack.pop();
        }

        match byte {
            b'+' => {
                handler.begin_simple_string();
                self.stack.push(State::Simple(SimpleKind::SimpleString));
            }
            b'-' => {
                handler.begin_error();
                self.stack.push(State::Simple(SimpleKind::Error));
            }
            b':' => {
                handler.begin_integer();
                self.stack.push(State::Simple(SimpleKind::Integer));
            }
            b'$' => self.stack.push(State::Length(LengthKind::BulkString)),
            b'*' => self.stack.push(State::Length(LengthKind::Array)),
            _ => {
                // Telnet-style input: the whole line, including this byte, is
                // re-read as an inline command.
                self.stack.push(State::InlineCommand);
                return Step::Continue(pos);
            }
        }
        Step::Continue(pos + 1)
    }

    fn simple<H: Handler>(
        &mut self,
        input: &[u8],
        pos: usize,
        kind: SimpleKind,
        handler: &mut H,
    ) -> Result<Step, Error> {
        if pos == input.len() {
            return Ok(Step::Yield(pos));
        }

        let payload_end = match memchr(b'\r', &input[pos..]) {
            Some(cr) => pos + cr,
            None => input.len(),
        };
        handler.chars(&input[pos..payload_end]);

        if input.len() - payload_end < 2 {
            return Ok(Step::Yield(payload_end));
        }
        if input[payload_end + 1] != b'\n' {
            return Err(Error::MissingNewline);
        }

        match kind {
            SimpleKind::SimpleString => handler.end_simple_string(),
            SimpleKind::Error => handler.end_error(),
            SimpleKind::Integer => handler.end_integer(),
        }
        self.stack.pop();
        Ok(Step::Continue(payload_end + 2))
    }

    fn length<H: Handler>(
        &mut self,
        input: &[u8],
        pos: usize,
        kind: LengthKind,
        handler: &mut H,
    ) -> Result<Step, Error> {
        let Some(cr) = find_crlf(&input[pos..]) else {
            return Ok(Step::Yield(pos));
        };
        let len = parse_length(&input[pos..pos + cr])?;

        self.stack.pop();
        match kind {
            LengthKind::BulkString => {
                if len < -1 {
                    return Err(Error::BadBulkLength);
                }
                handler.begin_bulk_string(len);
                self.stack.push(State::BulkString { remaining: len });
            }
            LengthKind::Array => {
                if len < -1 {
                    return Err(Error::BadArrayLength);
                }
                handler.begin_array(len);
                self.stack.push(State::Array { remaining: len });
            }
        }
        Ok(Step::Continue(pos + cr + 2))
    }

    fn bulk_string<H: Handler>(
        &mut self,
        input: &[u8],
        pos: usize,
        remaining: i64,
        handler: &mut H,
    ) -> Step {
        if remaining == -1 {
            handler.end_bulk_string();
            self.stack.pop();
            return Step::Continue(pos);
        }

        if pos == input.len() {
            return Step::Yield(pos);
        }

        let available = input.len() - pos;
        let take = (remaining as usize).min(available);
        handler.chars(&input[pos..pos + take]);
        let remaining = remaining - take as i64;

        // The frame only completes once the payload and its trailing CRLF are
        // both buffered.
        if remaining == 0 && available >= take + 2 {
            handler.end_bulk_string();
            self.stack.pop();
            Step::Continue(pos + take + 2)
        } else {
            *self.stack.last_mut().expect("bulk frame on top") =
                State::BulkString { remaining };
            Step::Yield(pos + take)
        }
    }

    fn array<H: Handler>(&mut self, pos: usize, remaining: i64, handler: &mut H) -> Step {
        if remaining == 0 || remaining == -1 {
            handler.end_array();
            self.stack.pop();
        } else {
            *self.stack.last_mut().expect("array frame on top") = State::Array {
                remaining: remaining - 1,
            };
            self.stack.push(State::Value { terminal: false });
        }
        Step::Continue(pos)
    }

    fn inline_command<H: Handler>(&mut self, input: &[u8], pos: usize, handler: &mut H) -> Step {
        let Some(cr) = find_crlf(&input[pos..]) else {
            return Step::Yield(pos);
        };
        let line = &input[pos..pos + cr];

        let tokens: Vec<&[u8]> = line
            .split(|byte: &u8| byte.is_ascii_whitespace())
            .filter(|token| !token.is_empty())
            .collect();

        handler.begin_array(tokens.len() as i64);
        for token in &tokens {
            handler.begin_bulk_string(token.len() as i64);
            handler.chars(token);
            handler.end_bulk_string();
        }
        handler.end_array();

        self.stack.pop();
        Step::Continue(pos + cr + 2)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of the first complete CRLF in `window`, or `None` if one has not
/// arrived yet.
fn find_crlf(window: &[u8]) -> Option<usize> {
    let mut from = 0;
    while let Some(i) = memchr(b'\r', &window[from..]) {
        let at = from + i;
        match window.get(at + 1) {
            Some(b'\n') => return Some(at),
            Some(_) => from = at + 1,
            None => return None,
        }
    }
    None
}

fn parse_length(line: &[u8]) -> Result<i64, Error> {
    let s = std::str::from_utf8(line).map_err(|_| Error::BadLength)?;
    // `i64::from_str` tolerates a leading '+', the protocol does not.
    if s.is_empty() || s.starts_with('+') {
        return Err(Error::BadLength);
    }
    s.parse().map_err(|_| Error::BadLength)
}
