// surface.rs
// Seam between the frame renderer and whatever actually draws the tracks.

use ultraviolet::Vec2;

/// What a track currently displays: a two-point segment for local motion or
/// a lone point for a boundary wrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackShape {
    Segment { a: Vec2, b: Vec2, color: [u8; 4] },
    Point { p: Vec2, color: [u8; 4] },
}

/// The plot collaborator the renderer draws into: a fixed set of
/// independently drawable one-or-two point tracks, one per particle index
/// for the duration of a run.
pub trait PlotSurface {
    /// Allocate one more track and return its index.
    fn add_track(&mut self) -> usize;
    fn track_count(&self) -> usize;
    fn set_segment(&mut self, track: usize, a: Vec2, b: Vec2, color: [u8; 4]);
    fn set_point(&mut self, track: usize, p: Vec2, color: [u8; 4]);
    /// Drop all tracks; used when a new run starts.
    fn clear_tracks(&mut self);
    /// A full frame of track updates is complete and may be displayed.
    fn commit(&mut self);
}
