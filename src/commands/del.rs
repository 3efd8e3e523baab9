use bytes::Bytes;

use crate::commands::{CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Removes the given keys, answering how many live entries were removed.
///
/// Ref: <https://redis.io/docs/latest/commands/del/>
#[derive(Debug, PartialEq)]
pub struct Del {
    pub keys: Vec<Bytes>,
}

impl Executable for Del {
    fn exec(self, store: &mut Store) -> Frame {
        let now = store.now();
        let mut count = 0;
        for key in &self.keys {
            if store.del(key, now) {
                count += 1;
            }
        }
        Frame::Integer(count)
    }
}

impl TryFrom<&[Bytes]> for Del {
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
