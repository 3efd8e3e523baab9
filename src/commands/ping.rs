use bytes::Bytes;

use crate::commands::{CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Returns PONG, or a copy of the argument as a bulk string.
///
/// Ref: <https://redis.io/docs/latest/commands/ping>
#[derive(Debug, PartialEq)]
pub struct Ping {
    pub payload: Option<Bytes>,
}

impl Executable for Ping {
    fn exec(self, _store: &mut Store) -> Frame {
        match self.payload {
            None => Frame::Simple("PONG".to_string()),
            Some(payload) => Frame::Bulk(payload),
        }
    }
}

impl TryFrom<&[Bytes]> for Ping {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [_] => Ok(Self { payload: None }),
            [_, payload] => Ok(Self {
                payload: Some(payload.clone()),
            }),
            _ => Err(CommandError::WrongArity),
        }
    }
}
