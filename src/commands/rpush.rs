use bytes::Bytes;

use crate::commands::{CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Appends values to the tail of the list at key, creating it if absent.
///
/// Ref: <https://redis.io/docs/latest/commands/rpush/>
#[derive(Debug, PartialEq)]
pub struct Rpush {
    pub key: Bytes,
    pub values: Vec<Bytes>,
}

impl Executable for Rpush {
    fn exec(self, store: &mut Store) -> Frame {
        match store.get_or_create_list(self.key) {
            Err(_) => Frame::Error("WRONGTYPE key refers to object of the wrong type".to_string()),
            Ok(list) => {
                for value in self.values {
                    list.push_back(value);
                }
                Frame::Integer(list.len() as i64)
            }
        }
    }
}

impl TryFrom<&[Bytes]> for Rpush {
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
