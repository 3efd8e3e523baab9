use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error as ThisError;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

const STATE_FILE: &str = "state.db";

/// The key holds the other value variant than the operation expects.
#[derive(Debug, ThisError, PartialEq)]
#[error("wrong type")]
pub struct WrongType;

#[derive(Debug, ThisError, PartialEq)]
pub enum IncrError {
    #[error("wrong type")]
    WrongType,
    #[error("value is not an integer or out of range")]
    NotAnInteger,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String {
        data: Bytes,
        expiry: Option<Timestamp>,
    },
    List(VecDeque<Bytes>),
}

pub type Clock = Box<dyn Fn() -> SystemTime + Send>;
pub type OpenReader = Box<dyn Fn() -> std::io::Result<Box<dyn Read + Send>> + Send>;
pub type OpenWriter = Box<dyn Fn() -> std::io::Result<Box<dyn Write + Send>> + Send>;

/// The keyspace. Keys are opaque byte strings compared byte for byte; each
/// key holds either a string (with optional expiry) or a list.
///
/// Expiry is lazy: an expired string is evicted by whichever read or delete
/// touches it next, never by a background task. The clock and the snapshot
/// streams are injected so tests can pin time and keep snapshots in memory.
pub struct Store {
    map: HashMap<Bytes, Value>,
    clock: Clock,
    open_reader: OpenReader,
    open_writer: OpenWriter,
}

impl Store {
    pub fn new() -> Store {
        Store::with_hooks(
            Box::new(SystemTime::now),
            Box::new(|| Ok(Box::new(File::open(STATE_FILE)?) as Box<dyn Read + Send>)),
            Box::new(|| Ok(Box::new(File::create(STATE_FILE)?) as Box<dyn Write + Send>)),
        )
    }

    pub fn with_hooks(clock: Clock, open_reader: OpenReader, open_writer: OpenWriter) -> Store {
        Store {
            map: HashMap::with_capacity(1 << 16),
            clock,
            open_reader,
            open_writer,
        }
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> Timestamp {
        (self.clock)()
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_millis() as u64)
            .unwrap_or(0)
    }

    /// A fresh reader over the persisted state.
    pub fn state_reader(&self) -> std::io::Result<Box<dyn Read + Send>> {
        (self.open_reader)()
    }

    /// A fresh writer replacing the persisted state.
    pub fn state_writer(&self) -> std::io::Result<Box<dyn Write + Send>> {
        (self.open_writer)()
    }

    /// Looks up a string value, evicting it first if its expiry has passed.
    pub fn get_string(&mut self, key: &[u8], now: Timestamp) -> Result<Option<Bytes>, WrongType> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::List(_)) => Err(WrongType),
            Some(Value::String { data, expiry }) => {
                if expiry.is_some_and(|at| now >= at) {
                    self.map.remove(key);
                    Ok(None)
                } else {
                    Ok(Some(data.clone()))
                }
            }
        }
    }

    /// Inserts or replaces `key` with a string value, discarding any previous
    /// variant and expiry.
    pub fn set(&mut self, key: Bytes, value: Bytes, expiry: Option<Timestamp>) {
        self.map.insert(key, Value::String { data: value, expiry });
    }

    /// Removes `key`, reporting whether a live entry was removed. An expired
    /// string is removed too, but counts as already absent.
    pub fn del(&mut self, key: &[u8], now: Timestamp) -> bool {
        match self.map.remove(key) {
            None => false,
            Some(Value::String {
                expiry: Some(at), ..
            }) => now < at,
            Some(_) => true,
        }
    }

    /// True if `key` holds a live entry of either variant. An expired string
    /// is evicted on the way through.
    pub fn exists(&mut self, key: &[u8], now: Timestamp) -> bool {
        match self.map.get(key) {
            None => false,
            Some(Value::List(_)) => true,
            Some(Value::String { expiry, .. }) => {
                if expiry.is_some_and(|at| now >= at) {
                    self.map.remove(key);
                    false
                } else {
                    true
                }
            }
        }
    }

    /// Adjusts the integer stored at `key` by `delta`, treating a missing key
    /// as "0", and stores the result back in its decimal form.
    pub fn incr_by(&mut self, key: &[u8], delta: i64, now: Timestamp) -> Result<i64, IncrError> {
        let current = match self.get_string(key, now) {
            Err(WrongType) => return Err(IncrError::WrongType),
            Ok(None) => 0,
            Ok(Some(data)) => std::str::from_utf8(&data)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or(IncrError::NotAnInteger)?,
        };
        let next = current.checked_add(delta).ok_or(IncrError::NotAnInteger)?;

        self.set(
            Bytes::copy_from_slice(key),
            Bytes::from(next.to_string()),
            None,
        );
        Ok(next)
    }

    pub fn get_list(&self, key: &[u8]) -> Result<Option<&VecDeque<Bytes>>, WrongType> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::List(list)) => Ok(Some(list)),
            Some(Value::String { .. }) => Err(WrongType),
        }
    }

    /// The list at `key`, creating an empty one if the key is absent.
    pub fn get_or_create_list(&mut self, key: Bytes) -> Result<&mut VecDeque<Bytes>, WrongType> {
        match self
            .map
            .entry(key)
            .or_insert_with(|| Value::List(VecDeque::new()))
        {
            Value::List(list) => Ok(list),
            Value::String { .. } => Err(WrongType),
        }
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Visits every entry in unspecified order until the callback returns
    /// false.
    pub fn visit(&self, mut visitor: impl FnMut(&Bytes, &Value) -> bool) {
        for (key, value) in &self.map {
            if !visitor(key, value) {
                break;
            }
        }
    }

    pub fn ex(now: Timestamp, seconds: i64) -> Timestamp {
        now.saturating_add((seconds as u64).saturating_mul(1000))
    }

    pub fn exat(seconds: i64) -> Timestamp {
        (seconds as u64).saturating_mul(1000)
    }

    pub fn px(now: Timestamp, millis: i64) -> Timestamp {
        now.saturating_add(millis as u64)
    }

    pub fn pxat(millis: i64) -> Timestamp {
        millis as u64
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn set_and_get_no_expiry() {
        let mut store = Store::new();
        store.set(Bytes::from("key"), Bytes::from("value"), None);

        let result = store.get_string(b"key", 0).unwrap();
        assert_eq!(result, Some(Bytes::from("value")));
    }

    #[test]
    fn set_and_expired_get() {
        let mut store = Store::new();
        store.set(Bytes::from("key"), Bytes::from("value"), Some(1_000));

        assert_eq!(store.get_string(b"key", 2_000).unwrap(), None);
        // Evicted for good, not just hidden.
        assert!(!store.exists(b"key", 0));
    }

    #[test]
    fn set_and_unexpired_get() {
        let mut store = Store::new();
        store.set(Bytes::from("key"), Bytes::from("value"), Some(2_000));

        let result = store.get_string(b"key", 1_000).unwrap();
        assert_eq!(result, Some(Bytes::from("value")));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let mut store = Store::new();
        store.set(Bytes::from("key"), Bytes::from("value"), Some(1_000));

        assert_eq!(store.get_string(b"key", 1_000).unwrap(), None);
    }

    #[test]
    fn set_replaces_any_variant() {
        let mut store = Store::new();
        store
            .get_or_create_list(Bytes::from("key"))
            .unwrap()
            .push_back(Bytes::from("a"));

        store.set(Bytes::from("key"), Bytes::from("value"), None);
        assert_eq!(
            store.get_string(b"key", 0).unwrap(),
            Some(Bytes::from("value"))
        );
    }

    #[test]
    fn del_counts_only_live_entries() {
        let mut store = Store::new();
        store.set(Bytes::from("live"), Bytes::from("v"), None);
        store.set(Bytes::from("expired"), Bytes::from("v"), Some(500));

        assert!(store.del(b"live", 1_000));
        assert!(!store.del(b"expired", 1_000));
        assert!(!store.del(b"missing", 1_000));
        // The expired entry is still gone afterwards.
        assert_eq!(store.get_string(b"expired", 1_000).unwrap(), None);
    }

    #[test]
    fn exists_counts_lists() {
        let mut store = Store::new();
        store.set(Bytes::from("string"), Bytes::from("v"), None);
        store
            .get_or_create_list(Bytes::from("list"))
            .unwrap()
            .push_back(Bytes::from("a"));

        assert!(store.exists(b"string", 0));
        assert!(store.exists(b"list", 0));
        assert!(!store.exists(b"missing", 0));
    }

    #[test]
    fn wrong_type_on_string_and_list_mismatch() {
        let mut store = Store::new();
        store.set(Bytes::from("string"), Bytes::from("v"), None);
        store
            .get_or_create_list(Bytes::from("list"))
            .unwrap()
            .push_back(Bytes::from("a"));

        assert_eq!(store.get_string(b"list", 0), Err(WrongType));
        assert_eq!(store.get_list(b"string"), Err(WrongType));
        assert_eq!(
            store.get_or_create_list(Bytes::from("string")),
            Err(WrongType)
        );
    }

    #[test]
    fn incr_by_from_missing_key() {
        let mut store = Store::new();
        assert_eq!(store.incr_by(b"key", 1, 0), Ok(1));
        assert_eq!(store.get_string(b"key", 0).unwrap(), Some(Bytes::from("1")));
    }

    #[test]
    fn incr_by_existing_value() {
        let mut store = Store::new();
        store.set(Bytes::from("key"), Bytes::from("41"), None);

        assert_eq!(store.incr_by(b"key", 1, 0), Ok(42));
        assert_eq!(
            store.get_string(b"key", 0).unwrap(),
            Some(Bytes::from("42"))
        );
    }

    #[test]
    fn incr_by_non_integer() {
        let mut store = Store::new();
        store.set(Bytes::from("key"), Bytes::from("value"), None);

        assert_eq!(store.incr_by(b"key", 1, 0), Err(IncrError::NotAnInteger));
        // Untouched on failure.
        assert_eq!(
            store.get_string(b"key", 0).unwrap(),
            Some(Bytes::from("value"))
        );
    }

    #[test]
    fn incr_by_overflow() {
        let mut store = Store::new();
        store.set(
            Bytes::from("key"),
            Bytes::from(i64::MAX.to_string()),
            None,
        );

        assert_eq!(store.incr_by(b"key", 1, 0), Err(IncrError::NotAnInteger));
    }

    #[test]
    fn incr_by_wrong_type() {
        let mut store = Store::new();
        store
            .get_or_create_list(Bytes::from("key"))
            .unwrap()
            .push_back(Bytes::from("a"));

        assert_eq!(store.incr_by(b"key", 1, 0), Err(IncrError::WrongType));
    }

    #[test]
    fn expiry_helpers() {
        assert_eq!(Store::ex(0, 1), 1_000);
        assert_eq!(Store::px(0, 1), 1);
        assert_eq!(Store::exat(42), 42_000);
        assert_eq!(Store::pxat(42), 42);
        assert_eq!(Store::ex(500, 2), 2_500);
    }

    #[test]
    fn visit_stops_when_asked() {
        let mut store = Store::new();
        store.set(Bytes::from("a"), Bytes::from("1"), None);
        store.set(Bytes::from("b"), Bytes::from("2"), None);
        store.set(Bytes::from("c"), Bytes::from("3"), None);

        let mut visited = 0;
        store.visit(|_, _| {
            visited += 1;
            false
        });
        assert_eq!(visited, 1);
    }

    #[test]
    fn clear_removes_everything() {
        let mut store = Store::new();
        store.set(Bytes::from("a"), Bytes::from("1"), None);
        store
            .get_or_create_list(Bytes::from("b"))
            .unwrap()
            .push_back(Bytes::from("x"));

        store.clear();
        assert!(!store.exists(b"a", 0));
        assert!(!store.exists(b"b", 0));
    }

    #[test]
    fn now_reads_the_injected_clock() {
        let (store, now, _) = test_hooks::memory_store();
        assert_eq!(store.now(), 0);

        now.store(1_234, Ordering::SeqCst);
        assert_eq!(store.now(), 1_234);
    }
}
