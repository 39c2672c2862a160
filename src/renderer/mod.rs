pub mod color;
pub mod gui;
pub mod state;

#[cfg(test)]
mod tests;

use std::fmt;
use ultraviolet::Vec2;

use crate::config::{self, ReplayConfig};
use crate::surface::PlotSurface;

/// Fatal frame-consistency errors. Either one halts the run and leaves the
/// last good frame on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The frame length changed mid-run; particle identity is positional, so
    /// nothing sensible can be drawn.
    ParticleCountChanged { previous: usize, current: usize },
    /// The allocated tracks no longer match the frame length. Catches reset
    /// ordering bugs that slip past the count check.
    TrackMismatch { tracks: usize, particles: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::ParticleCountChanged { previous, current } => {
                write!(f, "number of points changed: {} -> {}", previous, current)
            }
            FrameError::TrackMismatch { tracks, particles } => {
                write!(
                    f,
                    "track count {} isn't equal to number of points {}",
                    tracks, particles
                )
            }
        }
    }
}

/// Turns a previous/current frame pair into track updates and a speed
/// sample. Owns the run-scoped state the plot panels read from: track count,
/// frame counter, speed series and the speed plot's axis maxima.
pub struct Renderer {
    config: ReplayConfig,
    tracks: usize,
    frame: usize,
    speed_series: Vec<[f64; 2]>,
    time_axis_max: f64,
    speed_axis_max: f64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_config(config::REPLAY_CONFIG.lock().clone())
    }

    pub fn with_config(config: ReplayConfig) -> Self {
        Self {
            config,
            tracks: 0,
            frame: 0,
            speed_series: Vec::new(),
            time_axis_max: config::INITIAL_TIME_AXIS_MAX,
            speed_axis_max: config::INITIAL_SPEED_AXIS_MAX,
        }
    }

    /// Clear all run-scoped state. Called when a run starts so a finished or
    /// aborted run leaves its last frame visible until then.
    pub fn reset(&mut self) {
        self.tracks = 0;
        self.frame = 0;
        self.speed_series.clear();
        self.time_axis_max = config::INITIAL_TIME_AXIS_MAX;
        self.speed_axis_max = config::INITIAL_SPEED_AXIS_MAX;
    }

    pub fn track_count(&self) -> usize {
        self.tracks
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn speed_series(&self) -> &[[f64; 2]] {
        &self.speed_series
    }

    /// Current upper bounds of the speed plot axes (time, speed).
    pub fn speed_axis_max(&self) -> (f64, f64) {
        (self.time_axis_max, self.speed_axis_max)
    }

    /// Consume one frame pair: classify every particle as segment or wrap
    /// point, issue the draws, and append one speed sample.
    pub fn on_frames_ready(
        &mut self,
        prev: &[Vec2],
        cur: &[Vec2],
        surface: &mut dyn PlotSurface,
    ) -> Result<(), FrameError> {
        if prev.len() != cur.len() {
            return Err(FrameError::ParticleCountChanged {
                previous: prev.len(),
                current: cur.len(),
            });
        }
        if self.tracks == 0 {
            while self.tracks < cur.len() {
                surface.add_track();
                self.tracks += 1;
            }
        }
        if self.tracks != cur.len() {
            return Err(FrameError::TrackMismatch {
                tracks: self.tracks,
                particles: cur.len(),
            });
        }

        let wrap_sq = self.config.wrap_distance_sq();
        let mut displacement_sum = Vec2::zero();
        let mut moved = 0u32;
        for i in 0..cur.len() {
            let d = cur[i] - prev[i];
            // Strictly greater: a displacement of exactly the threshold is
            // still treated as genuine motion.
            if d.mag_sq() > wrap_sq {
                surface.set_point(i, cur[i], config::WRAP_POINT_COLOR);
            } else {
                let color = if self.config.color_by_direction {
                    color::color_from_direction(d.x, d.y)
                } else {
                    config::SEGMENT_COLOR
                };
                surface.set_segment(i, prev[i], cur[i], color);
                displacement_sum += d;
                moved += 1;
            }
        }

        // Wrap jumps are artifacts, not motion, so the mean velocity only
        // covers segment-classified particles. A frame where everything
        // wrapped counts as zero speed.
        let speed = if moved == 0 {
            0.0
        } else {
            (displacement_sum / moved as f32).mag() as f64
        };
        let t = self.frame as f64;
        self.speed_series.push([t, speed]);
        self.rescale_axes(t, speed);
        self.frame += 1;

        surface.commit();
        Ok(())
    }

    fn rescale_axes(&mut self, t: f64, speed: f64) {
        while t > config::AXIS_HEADROOM * self.time_axis_max {
            self.time_axis_max *= config::AXIS_GROWTH;
        }
        while speed > config::AXIS_HEADROOM * self.speed_axis_max {
            self.speed_axis_max *= config::AXIS_GROWTH;
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
