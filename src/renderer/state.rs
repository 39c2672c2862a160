use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::atomic::AtomicBool;

use crate::source::FrameSource;

/// The one frame source, shared between the GUI thread and the streaming
/// thread. Never contended: the streaming thread only locks it during an
/// advance, and an advance is only requested after the GUI finished reading
/// the previous pair.
pub static FRAME_SOURCE: Lazy<Mutex<FrameSource>> = Lazy::new(|| Mutex::new(FrameSource::new()));

/// Set by the GUI; read by the frame-ready handler to decide whether to
/// request the next advance.
pub static PAUSED: Lazy<AtomicBool> = Lazy::new(|| AtomicBool::new(false));

// Commands from the GUI thread to the streaming thread. Each Advance yields
// exactly one StreamEvent back, echoing the run generation it was issued
// for so the GUI can discard events from an abandoned run.
#[derive(Debug, Clone, Copy)]
pub enum StreamCommand {
    Advance { generation: u64 },
    Rewind,
}

// Replies from the streaming thread, consumed exactly once by the GUI.
#[derive(Debug, Clone, Copy)]
pub enum StreamEvent {
    FrameReady { generation: u64 },
    EndOfStream { generation: u64 },
}

/// Serializes tests that touch the shared statics above.
#[cfg(test)]
pub static FRAME_SOURCE_TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
