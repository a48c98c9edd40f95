//! Terminal front end for vidlist
//!
//! The console is the presentation layer: it parses typed commands into
//! controller intents and renders the controller's derived state. It
//! never touches playlist internals directly.

mod view;

pub use view::{render_playlist, render_transport};

use crate::utils::error::{PlayerError, Result};
use crate::utils::parse_time;
use std::path::PathBuf;

/// A parsed user command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Queue files or directories
    Add(Vec<PathBuf>),

    /// Play/pause toggle
    TogglePlay,

    Stop,

    Next,

    Previous,

    /// Flip shuffle mode
    Shuffle,

    /// Remove entry (0-based)
    Remove(usize),

    /// Remove every entry
    Clear,

    /// Jump to entry (0-based) and play it
    Goto(usize),

    /// Seek to an absolute position in milliseconds
    Seek(u64),

    /// Set volume in percent
    Volume(u8),

    /// Print the playlist
    List,

    /// Print the transport line
    Status,

    Help,

    Quit,
}

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  add, a <path>...      queue video files or directories
  play, p               play / pause
  stop, s               stop playback
  next, n               next video
  prev, b               previous video
  shuffle, z            toggle shuffle mode
  remove, rm <n>        remove entry n
  clear                 remove every entry
  goto, g <n>           play entry n
  seek <time>           seek to SS, M:SS or H:MM:SS
  volume, vol <0-100>   set volume
  list, ls              show the playlist
  status                show the transport line
  help, h, ?            show this help
  quit, q               exit";

impl Command {
    /// Parse one input line; entry numbers are 1-based on input
    ///
    /// # Returns
    ///
    /// `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "add" | "a" => {
                if args.is_empty() {
                    return Err(invalid("add needs at least one path"));
                }
                Command::Add(args.iter().map(PathBuf::from).collect())
            }
            "play" | "pause" | "p" => Command::TogglePlay,
            "stop" | "s" => Command::Stop,
            "next" | "n" => Command::Next,
            "prev" | "previous" | "b" => Command::Previous,
            "shuffle" | "z" => Command::Shuffle,
            "remove" | "rm" => Command::Remove(entry_number(&args)?),
            "clear" => Command::Clear,
            "goto" | "g" => Command::Goto(entry_number(&args)?),
            "seek" => Command::Seek(parse_time(single(&args, "seek needs a time")?)?),
            "volume" | "vol" => {
                let raw = single(&args, "volume needs a value")?;
                let percent: u8 = raw
                    .parse()
                    .map_err(|_| invalid(format!("Invalid volume '{}'", raw)))?;
                if percent > 100 {
                    return Err(invalid("Volume must be between 0 and 100"));
                }
                Command::Volume(percent)
            }
            "list" | "ls" => Command::List,
            "status" => Command::Status,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(invalid(format!("Unknown command '{}'", other))),
        };

        Ok(Some(command))
    }
}

fn invalid<S: Into<String>>(message: S) -> PlayerError {
    PlayerError::InvalidInput(message.into())
}

fn single<'a>(args: &[&'a str], missing: &str) -> Result<&'a str> {
    match args {
        [value] => Ok(*value),
        _ => Err(invalid(missing)),
    }
}

fn entry_number(args: &[&str]) -> Result<usize> {
    let raw = single(args, "expected an entry number")?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(invalid(format!("Invalid entry number '{}'", raw))),
    }
}
