// frame.rs
// Parsing of one log line into an ordered list of particle positions.

use std::fmt;
use ultraviolet::Vec2;

/// Why a line could not be parsed as a frame.
///
/// The frame source treats both kinds as end-of-stream (matching the
/// original tool's stop-silently behavior), but they are distinct here so
/// they can be logged and tested separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A token failed to parse as a number; the rest of the line is abandoned.
    MalformedNumber,
    /// The line held an odd number of tokens, leaving an unpaired coordinate.
    OddTokenCount,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedNumber => write!(f, "can't recognize number"),
            ParseError::OddTokenCount => write!(f, "odd coordinate count in line"),
        }
    }
}

/// Parse a whitespace-separated list of numbers into `(x, y)` pairs, in the
/// order they appear. `dest` is cleared first so buffer slots can be reused
/// across frames without reallocating.
///
/// An all-whitespace line yields an empty frame; the caller's constant
/// particle-count check is what rejects that mid-run.
pub fn parse_frame_line(line: &str, dest: &mut Vec<Vec2>) -> Result<(), ParseError> {
    dest.clear();
    let mut pending: Option<f32> = None;
    for token in line.split_whitespace() {
        let value: f32 = token.parse().map_err(|_| ParseError::MalformedNumber)?;
        match pending.take() {
            Some(x) => dest.push(Vec2::new(x, value)),
            None => pending = Some(value),
        }
    }
    if pending.is_some() {
        return Err(ParseError::OddTokenCount);
    }
    Ok(())
}
