use bytes::Bytes;

use crate::commands::{CommandError, Executable};
use crate::frame::Frame;
use crate::resp::Writer;
use crate::store::{Store, Value};

/// Writes the whole keyspace to the state stream as a replayable sequence of
/// SET and RPUSH command arrays; string expiries are carried as absolute
/// PXAT timestamps.
///
/// Ref: <https://redis.io/docs/latest/commands/save/>
#[derive(Debug, PartialEq)]
pub struct Save;

impl Executable for Save {
    fn exec(self, store: &mut Store) -> Frame {
        let sink = match store.state_writer() {
            Ok(sink) => sink,
            Err(_) => return Frame::Error("ERR failed to save db state".to_string()),
        };
        let mut writer = Writer::new(sink);

        store.visit(|key, value| {
            let command = match value {
                Value::String { data, expiry: None } => Frame::Array(vec![
                    Frame::Bulk(Bytes::from_static(b"SET")),
                    Frame::Bulk(key.clone()),
                    Frame::Bulk(data.clone()),
                ]),
                Value::String {
                    data,
                    expiry: Some(at),
                } => Frame::Array(vec![
                    Frame::Bulk(Bytes::from_static(b"SET")),
                    Frame::Bulk(key.clone()),
                    Frame::Bulk(data.clone()),
                    Frame::Bulk(Bytes::from_static(b"PXAT")),
                    Frame::Bulk(Bytes::from(at.to_string())),
                ]),
                Value::List(items) => {
                    let mut parts = Vec::with_capacity(items.len() + 2);
                    parts.push(Frame::Bulk(Bytes::from_static(b"RPUSH")));
                    parts.push(Frame::Bulk(key.clone()));
                    parts.extend(items.iter().map(|item| Frame::Bulk(item.clone())));
                    Frame::Array(parts)
                }
            };
            command.emit(&mut writer);
            !writer.is_bad()
        });

        writer.flush();
        if writer.is_bad() {
            Frame::Error("ERR failed to save db state".to_string())
        } else {
            Frame::Simple("OK".to_string())
        }
    }
}

impl TryFrom<&[Bytes]> for Save {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [_] => Ok(Self),
            _ => Err(CommandError::WrongArity),
        }
    }
}
