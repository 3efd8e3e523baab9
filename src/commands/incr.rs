use bytes::Bytes;

use crate::commands::{incr_or_decr, CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Increments the number stored at key by one, treating a missing key as "0".
///
/// Ref: <https://redis.io/docs/latest/commands/incr/>
#[derive(Debug, PartialEq)]
pub struct Incr {
    pub key: Bytes,
}

impl Executable for Incr {
    fn exec(self, store: &mut Store) -> Frame {
        incr_or_decr(store, &self.key, 1)
    }
}

impl TryFrom<&[Bytes]> for Incr {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [_, key] => Ok(Self { key: key.clone() }),
            _ => Err(CommandError::ExpectedOneKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::args;

    #[test]
    fn existing_key() {
        let mut store = Store::new();
        store.set(Bytes::from("key1"), Bytes::from("1"), None);

        let cmd = Incr::try_from(&args(&["iNCR", "key1"])[..]).unwrap();
        assert_eq!(cmd.exec(&mut store), Frame::Integer(2));
        assert_eq!(
            store.get_string(b"key1", 0).unwrap(),
            Some(Bytes::from("2"))
        );
    }

    #[test]
    fn non_existing_key() {
        let mut store = Store::new();

        let cmd = Incr::try_from(&args(&["INCR", "key1"])[..]).unwrap();
        assert_eq!(cmd.exec(&mut store), Frame::Integer(1));
        assert_eq!(
            store.get_string(b"key1", 0).unwrap(),
            Some(Bytes::from("1"))
        );
    }

    #[test]
    fn invalid_value() {
        let mut store = Store::new();
        store.set(Bytes::from("key1"), Bytes::from("value"), None);

        let cmd = Incr::try_from(&args(&["INCR", "key1"])[..]).unwrap();
        assert_eq!(
            cmd.exec(&mut store),
            Frame::Error("ERR value is not an integer or out of range".to_string())
        );
        assert_eq!(
            store.get_string(b"key1", 0).unwrap(),
            Some(Bytes::from("value"))
        );
    }

    #[test]
    fn out_of_range() {
        let mut store = Store::new();
        store.set(
            Bytes::from("key1"),
            Bytes::from("999223372036854775808"),
            None,
        );

        let cmd = Incr::try_from(&args(&["INCR", "key1"])[..]).unwrap();
        assert_eq!(
            cmd.exec(&mut store),
            Frame::Error("ERR value is not an integer or out of range".to_string())
        );
    }

    #[test]
    fn list_key_is_a_wrong_type() {
        let mut store = Store::new();
        store
            .get_or_create_list(Bytes::from("key1"))
            .unwrap()
            .push_back(Bytes::from("a"));

        let cmd = Incr::try_from(&args(&["INCR", "key1"])[..]).unwrap();
        assert_eq!(
            cmd.exec(&mut store),
            Frame::Error("WRONGTYPE key refers to object of the wrong type".to_string())
        );
    }

    #[test]
    fn wrong_arity() {
        assert_eq!(
            Incr::try_from(&args(&["INCR"])[..]).unwrap_err(),
            CommandError::ExpectedOneKey
        );
        assert_eq!(
            Incr::try_from(&args(&["INCR", "a", "b"])[..]).unwrap_err(),
            CommandError::ExpectedOneKey
        );
    }
}
