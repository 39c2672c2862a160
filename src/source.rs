// source.rs
// Streams pairs of consecutive frames out of a simulation log file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;
use ultraviolet::Vec2;

use crate::frame::{self, ParseError};

/// Result of one `advance` unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// `previous` and `current` hold the next renderable frame pair.
    Ready,
    /// End of stream: EOF, a read failure, or a malformed line. Terminal for
    /// the run; nothing is retried.
    Finished,
}

/// Owns the log cursor and a two-slot double buffer of frames.
///
/// The slots swap roles by index on every advance; the renderer only ever
/// borrows them read-only via `previous`/`current`.
pub struct FrameSource {
    reader: Option<BufReader<File>>,
    slots: [Vec<Vec2>; 2],
    cur: usize,
    primed: bool,
    line: String,
}

impl FrameSource {
    pub fn new() -> Self {
        Self {
            reader: None,
            slots: [Vec::new(), Vec::new()],
            cur: 0,
            primed: false,
            line: String::new(),
        }
    }

    /// Bind a log file as the frame source. Clears the buffer slots and the
    /// cursor state so a previously attached file can be re-bound safely.
    /// On failure no state is touched.
    pub fn attach<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let file = File::open(path)?;
        self.reader = Some(BufReader::new(file));
        self.reset_buffers();
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.reader.is_some()
    }

    /// Rewind the cursor to the start of the log so the run can replay.
    pub fn rewind(&mut self) {
        if let Some(reader) = self.reader.as_mut() {
            if let Err(e) = reader.seek(SeekFrom::Start(0)) {
                eprintln!("rewind failed: {}", e);
            }
        }
        self.reset_buffers();
    }

    fn reset_buffers(&mut self) {
        self.slots[0].clear();
        self.slots[1].clear();
        self.cur = 0;
        self.primed = false;
    }

    /// Perform one unit of streaming work.
    ///
    /// The first successful call parses two lines (previous and current);
    /// every later call swaps the slot roles and parses exactly one line
    /// into the slot that is now current.
    pub fn advance(&mut self) -> Advance {
        if self.reader.is_none() {
            return Advance::Finished;
        }
        if !self.primed {
            self.cur = 1;
            if !self.read_frame(0) {
                return Advance::Finished;
            }
            self.primed = true;
        } else {
            self.cur ^= 1;
        }
        let slot = self.cur;
        if !self.read_frame(slot) {
            return Advance::Finished;
        }
        Advance::Ready
    }

    /// The older of the two buffered frames. Meaningful only after a
    /// successful `advance`.
    pub fn previous(&self) -> &[Vec2] {
        &self.slots[self.cur ^ 1]
    }

    /// The newer of the two buffered frames. Meaningful only after a
    /// successful `advance`.
    pub fn current(&self) -> &[Vec2] {
        &self.slots[self.cur]
    }

    // A malformed line is conflated with end-of-stream on purpose: the
    // original tool stopped silently either way. The kinds still get
    // distinct console messages.
    fn read_frame(&mut self, slot: usize) -> bool {
        let Some(reader) = self.reader.as_mut() else {
            return false;
        };
        self.line.clear();
        match reader.read_line(&mut self.line) {
            Ok(0) => false,
            Ok(_) => match frame::parse_frame_line(&self.line, &mut self.slots[slot]) {
                Ok(()) => true,
                Err(ParseError::MalformedNumber) => {
                    eprintln!("can't recognize number in log line");
                    false
                }
                Err(ParseError::OddTokenCount) => {
                    eprintln!("odd coordinate count in log line");
                    false
                }
            },
            Err(e) => {
                eprintln!("log read failed: {}", e);
                false
            }
        }
    }
}

impl Default for FrameSource {
    fn default() -> Self {
        Self::new()
    }
}
