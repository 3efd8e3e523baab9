pub mod decr;
pub mod del;
pub mod echo;
pub mod exists;
pub mod get;
pub mod incr;
pub mod load;
pub mod lpush;
pub mod lrange;
pub mod ping;
pub mod rpush;
pub mod save;
pub mod set;

use bytes::Bytes;
use thiserror::Error as ThisError;

use crate::frame::Frame;
use crate::store::{IncrError, Store};

use decr::Decr;
use del::Del;
use echo::Echo;
use exists::Exists;
use get::Get;
use incr::Incr;
use load::Load;
use lpush::Lpush;
use lrange::Lrange;
use ping::Ping;
use rpush::Rpush;
use save::Save;
use set::Set;

/// A command executes against the locked store and produces its reply frame.
pub trait Executable {
    fn exec(self, store: &mut Store) -> Frame;
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Ping(Ping),
    Echo(Echo),
    Get(Get),
    Set(Set),
    Del(Del),
    Exists(Exists),
    Incr(Incr),
    Decr(Decr),
    Rpush(Rpush),
    Lpush(Lpush),
    Lrange(Lrange),
    Save(Save),
    Load(Load),
}

impl Executable for Command {
    fn exec(self, store: &mut Store) -> Frame {
        match self {
            Command::Ping(cmd) => cmd.exec(store),
            Command::Echo(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Del(cmd) => cmd.exec(store),
            Command::Exists(cmd) => cmd.exec(store),
            Command::Incr(cmd) => cmd.exec(store),
            Command::Decr(cmd) => cmd.exec(store),
            Command::Rpush(cmd) => cmd.exec(store),
            Command::Lpush(cmd) => cmd.exec(store),
            Command::Lrange(cmd) => cmd.exec(store),
            Command::Save(cmd) => cmd.exec(store),
            Command::Load(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<&[Bytes]> for Command {
    type Error = CommandError;

    fn try_from(args: &[Bytes]) -> Result<Self, Self::Error> {
        // Command names are ASCII case-insensitive; keys are not.
        let name = args
            .first()
            .ok_or(CommandError::UnknownCommand)?
            .to_ascii_uppercase();

        match name.as_slice() {
            b"PING" => Ping::try_from(args).map(Command::Ping),
            b"ECHO" => Echo::try_from(args).map(Command::Echo),
            b"GET" => Get::try_from(args).map(Command::Get),
            b"SET" => Set::try_from(args).map(Command::Set),
            b"DEL" => Del::try_from(args).map(Command::Del),
            b"EXISTS" => Exists::try_from(args).map(Command::Exists),
            b"INCR" => Incr::try_from(args).map(Command::Incr),
            b"DECR" => Decr::try_from(args).map(Command::Decr),
            b"RPUSH" => Rpush::try_from(args).map(Command::Rpush),
            b"LPUSH" => Lpush::try_from(args).map(Command::Lpush),
            b"LRANGE" => Lrange::try_from(args).map(Command::Lrange),
            b"SAVE" => Save::try_from(args).map(Command::Save),
            b"LOAD" => Load::try_from(args).map(Command::Load),
            _ => Err(CommandError::UnknownCommand),
        }
    }
}

/// Failure to turn an argument vector into a command. Each variant renders as
/// an error reply; the connection stays open.
#[derive(Debug, ThisError, PartialEq)]
pub enum CommandError {
    #[error("ERR wrong number of arguments")]
    WrongArity,
    #[error("ERR wrong number of arguments to SET command")]
    SetArity,
    #[error("ERR expected at least one key argument")]
    ExpectedKeys,
    #[error("ERR expected one key argument")]
    ExpectedOneKey,
    #[error("ERR malformed expiry, which must be a positive integer")]
    MalformedExpiry,
    #[error("ERR unrecognised option")]
    UnrecognisedOption,
    #[error("ERR unknown command")]
    UnknownCommand,
}

pub(crate) fn parse_int(arg: &[u8]) -> Option<i64> {
    std::str::from_utf8(arg).ok()?.parse().ok()
}

/// Shared body of INCR and DECR.
pub(crate) fn incr_or_decr(store: &mut Store, key: &[u8], delta: i64) -> Frame {
    let now = store.now();
    match store.incr_by(key, delta, now) {
        Ok(value) => Frame::Integer(value),
        Err(IncrError::WrongType) => {
            Frame::Error("WRONGTYPE key refers to object of the wrong type".to_string())
        }
        Err(IncrError::NotAnInteger) => {
            Frame::Error("ERR value is not an integer or out of range".to_string())
        }
    }
}

#[cfg(test)]
pub(crate) fn args(parts: &[&str]) -> Vec<Bytes> {
    parts
        .iter()
        .map(|part| Bytes::copy_from_slice(part.as_bytes()))
        .collect()
}
