use bytes::Bytes;

use crate::commands::{CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Prepends values to the head of the list at key, creating it if absent.
/// Each value lands in front of the previous one, so the arguments end up in
/// reverse order.
///
/// Ref: <https://redis.io/docs/latest/commands/lpush/>
#[derive(Debug, PartialEq)]
pub struct Lpush {
    pub key: Bytes,
    pub values: Vec<Bytes>,
}

impl Executable for Lpush {
    fn exec(self, store: &mut Store) -> Frame {
        match store.get_or_create_list(self.key) {
            Err(_) => Frame::Error("WRONGTYPE key refers to object of the wrong type".to_string()),
            Ok(list) => {
                for value in self.values {
                    list.push_front(value);
                }
                Frame::Integer(list.len() as i64)
            }
        }
    }
}

impl TryFrom<&[Bytes]> for Lpush {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [_, key, values @ ..] if !values.is_empty() => Ok(Self {
                key: key.clone(),
                values: values.to_vec(),
            }),
            _ => Err(CommandError::WrongArity),
        }
    }
}
