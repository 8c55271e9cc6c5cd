//! Textual command layer: parsing command lines and processing command
//! files end to end.
//!
//! Commands are the ten forms the reservation engine understands, e.g.
//! `Initialize(10)`, `Reserve(101, 3)`, `PrintReservations()`. Lines that
//! match no form are skipped, and `Quit()` stops processing.

use std::format;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::string::{String, ToString};
use std::sync::OnceLock;
use std::vec;
use std::vec::Vec;

use regex::Regex;
use thiserror::Error;

use crate::desk::{Event, TicketDesk};
use crate::trace::{info_log, warn_log};

/// A parsed command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Initialize(u32),
    Available,
    Reserve(u32, u32),
    Cancel(u32, u32),
    ExitWaitlist(u32),
    UpdatePriority(u32, u32),
    AddSeats(u32),
    PrintReservations,
    ReleaseSeats(u32, u32),
    Quit,
}

/// The ten anchored command patterns, compiled once.
fn patterns() -> &'static [(Regex, Shape)] {
    static PATTERNS: OnceLock<Vec<(Regex, Shape)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"^Initialize\((\d+)\)\s*$", Shape::Initialize),
            (r"^Available\(\)\s*$", Shape::Available),
            (r"^Reserve\((\d+),\s*(\d+)\)\s*$", Shape::Reserve),
            (r"^Cancel\((\d+),\s*(\d+)\)\s*$", Shape::Cancel),
            (r"^ExitWaitlist\((\d+)\)\s*$", Shape::ExitWaitlist),
            (r"^UpdatePriority\((\d+),\s*(\d+)\)\s*$", Shape::UpdatePriority),
            (r"^AddSeats\((\d+)\)\s*$", Shape::AddSeats),
            (r"^PrintReservations\(\)\s*$", Shape::PrintReservations),
            (r"^ReleaseSeats\((\d+),\s*(\d+)\)\s*$", Shape::ReleaseSeats),
            (r"^Quit\(\)\s*$", Shape::Quit),
        ]
        .into_iter()
        .map(|(pattern, shape)| {
            (Regex::new(pattern).expect("command pattern is valid"), shape)
        })
        .collect()
    })
}

#[derive(Clone, Copy)]
enum Shape {
    Initialize,
    Available,
    Reserve,
    Cancel,
    ExitWaitlist,
    UpdatePriority,
    AddSeats,
    PrintReservations,
    ReleaseSeats,
    Quit,
}

impl Command {
    /// Parses one command line. Returns `None` for lines that match no
    /// command form (including numbers too large for their argument type).
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_start();
        for (regex, shape) in patterns() {
            let Some(captures) = regex.captures(line) else {
                continue;
            };
            let arg = |index: usize| captures.get(index).and_then(|m| m.as_str().parse::<u32>().ok());
            return match shape {
                Shape::Initialize => Some(Self::Initialize(arg(1)?)),
                Shape::Available => Some(Self::Available),
                Shape::Reserve => Some(Self::Reserve(arg(1)?, arg(2)?)),
                Shape::Cancel => Some(Self::Cancel(arg(1)?, arg(2)?)),
                Shape::ExitWaitlist => Some(Self::ExitWaitlist(arg(1)?)),
                Shape::UpdatePriority => Some(Self::UpdatePriority(arg(1)?, arg(2)?)),
                Shape::AddSeats => Some(Self::AddSeats(arg(1)?)),
                Shape::PrintReservations => Some(Self::PrintReservations),
                Shape::ReleaseSeats => Some(Self::ReleaseSeats(arg(1)?, arg(2)?)),
                Shape::Quit => Some(Self::Quit),
            };
        }
        None
    }
}

/// Applies one command to the engine, returning its response events.
pub fn apply(desk: &mut TicketDesk, command: Command) -> Vec<Event> {
    match command {
        Command::Initialize(count) => vec![desk.initialize(count)],
        Command::Available => vec![desk.available()],
        Command::Reserve(user, priority) => vec![desk.reserve(user, priority)],
        Command::Cancel(seat, user) => desk.cancel(seat, user),
        Command::ExitWaitlist(user) => vec![desk.exit_waitlist(user)],
        Command::UpdatePriority(user, priority) => vec![desk.update_priority(user, priority)],
        Command::AddSeats(count) => desk.add_seats(count),
        Command::PrintReservations => desk.print_reservations(),
        Command::ReleaseSeats(low, high) => desk.release_seats(low, high),
        Command::Quit => vec![desk.quit()],
    }
}

/// Error from [`process_file`].
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read or write a command file: {0}")]
    Io(#[from] io::Error),
}

/// Derives the response-file path: `<stem>_output_file.<ext>` beside the
/// input, defaulting the extension to `txt`.
#[must_use]
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let extension = input.extension().map_or_else(|| "txt".into(), |e| e.to_string_lossy());
    input.with_file_name(format!("{stem}_output_file.{extension}"))
}

/// Runs a command file against a fresh engine and writes the response file.
///
/// Unrecognized lines are skipped; `Quit()` emits its response and stops
/// processing. Returns the response-file path.
///
/// # Errors
///
/// [`ScriptError::Io`] if the input cannot be read or the output written.
pub fn process_file(input: &Path) -> Result<PathBuf, ScriptError> {
    info_log!("processing command file {}", input.display());

    let text = fs::read_to_string(input)?;
    let mut desk = TicketDesk::new();
    let mut responses: Vec<String> = Vec::new();

    for line in text.lines() {
        match Command::parse(line) {
            Some(Command::Quit) => {
                responses.push(apply(&mut desk, Command::Quit)[0].to_string());
                break;
            }
            Some(command) => {
                responses.extend(apply(&mut desk, command).iter().map(Event::to_string));
            }
            None => {
                if !line.trim().is_empty() {
                    warn_log!("skipping unrecognized line: {line}");
                }
            }
        }
    }

    let output = output_path(input);
    let mut file = fs::File::create(&output)?;
    for response in &responses {
        writeln!(file, "{response}")?;
    }

    info_log!("wrote {} responses to {}", responses.len(), output.display());
    Ok(output)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn every_command_form_parses() {
        assert_eq!(Command::parse("Initialize(10)"), Some(Command::Initialize(10)));
        assert_eq!(Command::parse("Available()"), Some(Command::Available));
        assert_eq!(Command::parse("Reserve(101, 3)"), Some(Command::Reserve(101, 3)));
        assert_eq!(Command::parse("Reserve(101,3)"), Some(Command::Reserve(101, 3)));
        assert_eq!(Command::parse("Cancel(4, 101)"), Some(Command::Cancel(4, 101)));
        assert_eq!(Command::parse("ExitWaitlist(9)"), Some(Command::ExitWaitlist(9)));
        assert_eq!(
            Command::parse("UpdatePriority(9, 2)"),
            Some(Command::UpdatePriority(9, 2))
        );
        assert_eq!(Command::parse("AddSeats(5)"), Some(Command::AddSeats(5)));
        assert_eq!(Command::parse("PrintReservations()"), Some(Command::PrintReservations));
        assert_eq!(
            Command::parse("ReleaseSeats(100, 200)"),
            Some(Command::ReleaseSeats(100, 200))
        );
        assert_eq!(Command::parse("Quit()"), Some(Command::Quit));
    }

    #[test]
    fn malformed_lines_do_not_parse() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("Reserve()"), None);
        assert_eq!(Command::parse("Reserve(1)"), None);
        assert_eq!(Command::parse("Reserve(a, b)"), None);
        assert_eq!(Command::parse("Initialize(-3)"), None);
        assert_eq!(Command::parse("Initialize(99999999999999999999)"), None);
        assert_eq!(Command::parse("Frobnicate(1)"), None);
    }

    #[test]
    fn output_path_is_derived_beside_the_input() {
        assert_eq!(
            output_path(Path::new("/tmp/run1.txt")),
            PathBuf::from("/tmp/run1_output_file.txt")
        );
        assert_eq!(
            output_path(Path::new("commands")),
            PathBuf::from("commands_output_file.txt")
        );
    }
}
