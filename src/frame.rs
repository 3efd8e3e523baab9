use bytes::Bytes;

use crate::resp::{Handler, Writer};

/// A complete RESP reply value.
///
/// Commands build their reply as a `Frame`; emitting it replays the value as
/// handler events, which the per-connection [`Writer`] turns back into wire
/// bytes. `Null` is the RESP2 nil bulk string (`$-1`).
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

impl Frame {
    /// Replays this value as a sequence of handler events.
    pub fn emit<H: Handler>(&self, handler: &mut H) {
        match self {
            Frame::Simple(s) => {
                handler.begin_simple_string();
                handler.chars(s.as_bytes());
                handler.end_simple_string();
            }
            Frame::Error(s) => {
                handler.begin_error();
                handler.chars(s.as_bytes());
                handler.end_error();
            }
            Frame::Integer(i) => {
                handler.begin_integer();
                handler.chars(i.to_string().as_bytes());
                handler.end_integer();
            }
            Frame::Bulk(bytes) => {
                handler.begin_bulk_string(bytes.len() as i64);
                handler.chars(bytes);
                handler.end_bulk_string();
            }
            Frame::Null => {
                handler.begin_bulk_string(-1);
                handler.end_bulk_string();
            }
            Frame::Array(items) => {
                handler.begin_array(items.len() as i64);
                for item in items {
                    item.emit(handler);
                }
                handler.end_array();
            }
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = Writer::new(Vec::new());
        self.emit(&mut writer);
        writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_simple_string() {
        assert_eq!(Frame::Simple("OK".to_string()).serialize(), b"+OK\r\n");
    }

    #[test]
    fn serialize_error() {
        assert_eq!(
            Frame::Error("Error message".to_string()).serialize(),
            b"-Error message\r\n"
        );
    }

    #[test]
    fn serialize_integer() {
        assert_eq!(Frame::Integer(1000).serialize(), b":1000\r\n");
        assert_eq!(Frame::Integer(-42).serialize(), b":-42\r\n");
    }

    #[test]
    fn serialize_bulk_string() {
        assert_eq!(
            Frame::Bulk(Bytes::from("foobar")).serialize(),
            b"$6\r\nfoobar\r\n"
        );
        assert_eq!(Frame::Bulk(Bytes::from("")).serialize(), b"$0\r\n\r\n");
    }

    #[test]
    fn serialize_null() {
        assert_eq!(Frame::Null.serialize(), b"$-1\r\n");
    }

    #[test]
    fn serialize_array() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("hello")),
            Frame::Null,
            Frame::Bulk(Bytes::from("world")),
        ]);
        assert_eq!(
            frame.serialize(),
            b"*3\r\n$5\r\nhello\r\n$-1\r\n$5\r\nworld\r\n"
        );
    }

    #[test]
    fn serialize_nested_array() {
        let frame = Frame::Array(vec![
            Frame::Array(vec![Frame::Integer(1), Frame::Integer(2)]),
            Frame::Simple("Hello".to_string()),
        ]);
        assert_eq!(frame.serialize(), b"*2\r\n*2\r\n:1\r\n:2\r\n+Hello\r\n");
    }
}
