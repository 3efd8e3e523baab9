use bytes::Bytes;

use crate::commands::{CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Get the value of key.
///
/// Ref: <https://redis.io/docs/latest/commands/get/>
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: Bytes,
}

impl Executable for Get {
    fn exec(self, store: &mut Store) -> Frame {
        let now = store.now();
        match store.get_string(&self.key, now) {
            Ok(Some(value)) => Frame::Bulk(value),
            Ok(None) => Frame::Null,
            Err(_) => Frame::Error("WRONGTYPE".to_string()),
        }
    }
}

impl TryFrom<&[Bytes]> for Get {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        // Arguments beyond the key are tolerated.
        match args {
            [] | [_] => Err(CommandError::WrongArity),
            [_, key, ..] => Ok(Self { key: key.clone() }),
        }
    }
}
