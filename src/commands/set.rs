use bytes::Bytes;

use crate::commands::{parse_int, CommandError, Executable};
use crate::frame::Frame;
use crate::store::{Store, Timestamp};

/// Set key to hold a string value, optionally with an expiry.
///
/// Ref: <https://redis.io/docs/latest/commands/set/>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: Bytes,
    pub value: Bytes,
    pub expiry: Option<Expiry>,
}

/// The expiry option as it appeared on the wire: relative to now (EX/PX) or
/// an absolute Unix time (EXAT/PXAT).
#[derive(Debug, PartialEq)]
pub enum Expiry {
    Ex(i64),
    Px(i64),
    ExAt(i64),
    PxAt(i64),
}

impl Expiry {
    fn resolve(&self, now: Timestamp) -> Timestamp {
        match *self {
            Expiry::Ex(seconds) => Store::ex(now, seconds),
            Expiry::Px(millis) => Store::px(now, millis),
            Expiry::ExAt(seconds) => Store::exat(seconds),
            Expiry::PxAt(millis) => Store::pxat(millis),
        }
    }
}

impl Executable for Set {
    fn exec(self, store: &mut Store) -> Frame {
        let expiry = self.expiry.as_ref().map(|e| e.resolve(store.now()));
        store.set(self.key, self.value, expiry);
        Frame::Simple("OK".to_string())
    }
}

impl TryFrom<&[Bytes]> for Set {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        match args {
            [_, key, value] => Ok(Self {
                key: key.clone(),
                value: value.clone(),
                expiry: None,
            }),
            [_, key, value, option, amount] => {
                let amount = parse_int(amount)
                    .filter(|n| *n >= 0)
                    .ok_or(CommandError::MalformedExpiry)?;

                let expiry = if option.eq_ignore_ascii_case(b"EX") {
                    Expiry::Ex(amount)
                } else if option.eq_ignore_ascii_case(b"EXAT") {
                    Expiry::ExAt(amount)
                } else if option.eq_ignore_ascii_case(b"PX") {
                    Expiry::Px(amount)
                } else if option.eq_ignore_ascii_case(b"PXAT") {
                    Expiry::PxAt(amount)
                } else {
                    return Err(CommandError::UnrecognisedOption);
                };

                Ok(Self {
                    key: key.clone(),
                    value: value.clone(),
                    expiry: Some(expiry),
                })
            }
            _ => Err(CommandError::SetArity),
        }
    }
}
