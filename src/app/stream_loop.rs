// stream_loop.rs
// The background streaming thread: one advance per command, never more.

use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crate::config::REPLAY_CONFIG;
use crate::renderer::state::{StreamCommand, StreamEvent, FRAME_SOURCE};
use crate::source::Advance;

/// Block on the command channel and perform exactly one unit of work per
/// command. Each `Advance` is answered with exactly one event echoing the
/// run generation the command was issued for; the GUI only requests the next
/// advance from its event handler, so advances are never in flight
/// concurrently.
pub fn run_stream_loop(rx: Receiver<StreamCommand>, tx: Sender<StreamEvent>) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            StreamCommand::Advance { generation } => {
                let outcome = FRAME_SOURCE.lock().advance();
                let event = match outcome {
                    Advance::Ready => {
                        // The delay lives inside the unit of work so it
                        // composes with pause/resume instead of racing a
                        // separate timer.
                        let delay = REPLAY_CONFIG.lock().frame_delay_ms;
                        std::thread::sleep(Duration::from_millis(delay));
                        StreamEvent::FrameReady { generation }
                    }
                    Advance::Finished => StreamEvent::EndOfStream { generation },
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            StreamCommand::Rewind => {
                FRAME_SOURCE.lock().rewind();
            }
        }
    }
}
