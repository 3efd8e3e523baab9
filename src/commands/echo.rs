use bytes::Bytes;

use crate::commands::{CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Returns the message as a bulk string.
///
/// Ref: <https://redis.io/docs/latest/commands/echo>
#[derive(Debug, PartialEq)]
pub struct Echo {
    pub message: Bytes,
}

impl Executable for Echo {
    fn exec(self, _store: &mut Store) -> Frame {
        Frame::Bulk(self.message)
    }
}

impl TryFrom<&[Bytes]> for Echo {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [_, message] => Ok(Self {
                message: message.clone(),
            }),
            _ => Err(CommandError::WrongArity),
        }
    }
}
