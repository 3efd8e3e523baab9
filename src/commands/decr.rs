use bytes::Bytes;

use crate::commands::{incr_or_decr, CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Decrements the number stored at key by one, treating a missing key as "0".
///
/// Ref: <https://redis.io/docs/latest/commands/decr/>
#[derive(Debug, PartialEq)]
pub struct Decr {
    pub key: Bytes,
}

impl Executable for Decr {
    fn exec(self, store: &mut Store) -> Frame {
        incr_or_decr(store, &self.key, -1)
    }
}

impl TryFrom<&[Bytes]> for Decr {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [_, key] => Ok(Self { key: key.clone() }),
            _ => Err(CommandError::ExpectedOneKey),
        }
    }
}
