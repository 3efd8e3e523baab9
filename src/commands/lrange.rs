use bytes::Bytes;

use crate::commands::{parse_int, CommandError, Executable};
use crate::frame::Frame;
use crate::store::Store;

/// Returns an inclusive range of list elements. Negative indices count back
/// from the end of the list; out-of-range bounds clamp, and an inverted range
/// is an empty array, as is a missing key.
///
/// Ref: <https://redis.io/docs/latest/commands/lrange/>
#[derive(Debug, PartialEq)]
pub struct Lrange {
    pub key: Bytes,
    pub start: Bytes,
    pub stop: Bytes,
}

impl Executable for Lrange {
    fn exec(self, store: &mut Store) -> Frame {
        // The key's type is checked before the index arguments are even
        // looked at, so a wrong-type key wins over a malformed index.
        let list = match store.get_list(&self.key) {
            Err(_) => {
                return Frame::Error(
                    "WRONGTYPE key refers to object of the wrong type".to_string(),
                )
            }
            Ok(list) => list,
        };

        let (Some(start), Some(stop)) = (parse_int(&self.start), parse_int(&self.stop)) else {
            return Frame::Error("ERR bad argument".to_string());
        };

        let Some(list) = list else {
            return Frame::Array(Vec::new());
        };

        let len = list.len() as i64;
        let normalise = |index: i64| if index < 0 { len + index } else { index };

        let start = normalise(start).max(0);
        let stop = (normalise(stop) + 1).min(len);

        if stop <= start {
            return Frame::Array(Vec::new());
        }

        let items = list
            .iter()
            .skip(start as usize)
            .take((stop - start) as usize)
            .map(|item| Frame::Bulk(item.clone()))
            .collect();
        Frame::Array(items)
    }
}

impl TryFrom<&[Bytes]> for Lrange {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [_, key, start, stop] => Ok(Self {
                key: key.clone(),
                start: start.clone(),
                stop: stop.clone(),
            }),
            _ => Err(CommandError::WrongArity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::args;

    fn store_with_list(items: &[&str]) -> Store {
        let mut store = Store::new();
        let list = store.get_or_create_list(Bytes::from("key")).unwrap();
        for item in items {
            list.push_back(Bytes::copy_from_slice(item.as_bytes()));
        }
        store
    }

    fn range(store: &mut Store, start: &str, stop: &str) -> Frame {
        Lrange::try_from(&args(&["lrange", "key", start, stop])[..])
            .unwrap()
            .exec(store)
    }

    fn bulks(items: &[&str]) -> Frame {
        Frame::Array(
            items
                .iter()
                .map(|item| Frame::Bulk(Bytes::copy_from_slice(item.as_bytes())))
                .collect(),
        )
    }

    #[test]
    fn whole_list() {
        let mut store = store_with_list(&["a", "b", "c"]);
        assert_eq!(range(&mut store, "0", "2"), bulks(&["a", "b", "c"]));
        assert_eq!(range(&mut store, "0", "-1"), bulks(&["a", "b", "c"]));
    }

    #[test]
    fn partial_windows() {
        let mut store = store_with_list(&["a", "b", "c"]);
        assert_eq!(range(&mut store, "0", "1"), bulks(&["a", "b"]));
        assert_eq!(range(&mut store, "1", "2"), bulks(&["b", "c"]));
    }

    #[test]
    fn negative_indices() {
        let mut store = store_with_list(&["a", "b", "c"]);
        assert_eq!(range(&mut store, "-2", "-1"), bulks(&["b", "c"]));
    }

    #[test]
    fn bounds_clamp() {
        let mut store = store_with_list(&["a", "b", "c"]);
        assert_eq!(range(&mut store, "-10", "10"), bulks(&["a", "b", "c"]));
    }

    #[test]
    fn inverted_range_is_empty() {
        let mut store = store_with_list(&["a", "b", "c"]);
        assert_eq!(range(&mut store, "2", "1"), bulks(&[]));
    }

    #[test]
    fn missing_key_is_empty() {
        let mut store = Store::new();
        assert_eq!(range(&mut store, "-2", "-1"), bulks(&[]));
    }

    #[test]
    fn string_key_is_a_wrong_type() {
        let mut store = Store::new();
        store.set(Bytes::from("key"), Bytes::from("v"), None);
        assert_eq!(
            range(&mut store, "0", "1"),
            Frame::Error("WRONGTYPE key refers to object of the wrong type".to_string())
        );
    }

    #[test]
    fn non_integer_index() {
        let mut store = store_with_list(&["a", "b", "c"]);
        assert_eq!(
            range(&mut store, "zero", "1"),
            Frame::Error("ERR bad argument".to_string())
        );
    }

    #[test]
    fn non_integer_index_on_a_missing_key() {
        let mut store = Store::new();
        assert_eq!(
            range(&mut store, "zero", "one"),
            Frame::Error("ERR bad argument".to_string())
        );
    }

    #[test]
    fn wrong_type_wins_over_a_bad_index() {
        let mut store = Store::new();
        store.set(Bytes::from("key"), Bytes::from("v"), None);
        assert_eq!(
            range(&mut store, "abc", "def"),
            Frame::Error("WRONGTYPE key refers to object of the wrong type".to_string())
        );
    }

    #[test]
    fn wrong_arity() {
        assert_eq!(
            Lrange::try_from(&args(&["LRANGE", "key", "0"])[..]).unwrap_err(),
            CommandError::WrongArity
        );
    }
}
