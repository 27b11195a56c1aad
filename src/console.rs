//! Console Front End
//!
//! Line-oriented command interface over a `KvStore`:
//!
//! ```text
//! PUT key value [ttl_ms]   -> OK
//! GET key                  -> value | (nil)
//! EXIT                     -> Exiting...
//! ```

use crate::cache::KvStore;
use crate::error::{CacheError, Result};

/// Printed for a GET that misses.
pub const NIL: &str = "(nil)";

// == Command ==
/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put {
        key: String,
        value: String,
        ttl_ms: Option<i64>,
    },
    Get {
        key: String,
    },
    Exit,
    /// Anything whose first word is not a known command
    Unknown(String),
}

impl Command {
    /// Parses one input line. Returns `Ok(None)` for a blank line.
    ///
    /// Command names are case-insensitive; arguments are split on whitespace.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(name) = tokens.first() else {
            return Ok(None);
        };

        let command = match name.to_uppercase().as_str() {
            "PUT" => {
                if !(3..=4).contains(&tokens.len()) {
                    return Err(CacheError::InvalidRequest(
                        "Usage: PUT key value [ttl]".to_string(),
                    ));
                }
                let ttl_ms = match tokens.get(3) {
                    Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                        CacheError::InvalidRequest(
                            "TTL must be a number (milliseconds)".to_string(),
                        )
                    })?),
                    None => None,
                };
                Command::Put {
                    key: tokens[1].to_string(),
                    value: tokens[2].to_string(),
                    ttl_ms,
                }
            }
            "GET" => {
                if tokens.len() != 2 {
                    return Err(CacheError::InvalidRequest("Usage: GET key".to_string()));
                }
                Command::Get {
                    key: tokens[1].to_string(),
                }
            }
            "EXIT" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        };

        Ok(Some(command))
    }
}

// == Outcome ==
/// What the console should print, and whether it should keep reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Exit(String),
    /// Blank input; print nothing
    Empty,
}

/// Parses and executes one line against the store.
pub fn handle_line(store: &KvStore, line: &str) -> Outcome {
    match Command::parse(line).and_then(|command| execute(store, command)) {
        Ok(outcome) => outcome,
        Err(e) => Outcome::Reply(format!("Error: {}", e)),
    }
}

fn execute(store: &KvStore, command: Option<Command>) -> Result<Outcome> {
    let Some(command) = command else {
        return Ok(Outcome::Empty);
    };

    let outcome = match command {
        Command::Put { key, value, ttl_ms } => {
            match ttl_ms {
                Some(ttl) => store.put_with_ttl(key, value, ttl)?,
                None => store.put(key, value)?,
            }
            Outcome::Reply("OK".to_string())
        }
        Command::Get { key } => {
            Outcome::Reply(store.get(&key).unwrap_or_else(|| NIL.to_string()))
        }
        Command::Exit => Outcome::Exit("Exiting...".to_string()),
        Command::Unknown(_) => Outcome::Reply("Unknown command".to_string()),
    };

    Ok(outcome)
}
