use bytes::Bytes;

use crate::commands::{CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Counts how many of the given keys hold a live entry, of either variant.
///
/// Ref: <https://redis.io/docs/latest/commands/exists/>
#[derive(Debug, PartialEq)]
pub struct Exists {
    pub keys: Vec<Bytes>,
}

impl Executable for Exists {
    fn exec(self, store: &mut Store) -> Frame {
        let now = store.now();
        let mut count = 0;
        for key in &self.keys {
            if store.exists(key, now) {
                count += 1;
            }
        }
        Frame::Integer(count)
    }
}

impl TryFrom<&[Bytes]> for Exists {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [] | [_] => Err(CommandError::ExpectedKeys),
            [_, keys @ ..] => Ok(Self {
                keys: keys.to_vec(),
            }),
        }
    }
}
