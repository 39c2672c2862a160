use ultraviolet::Vec2;

use crate::config::ReplayConfig;
use crate::renderer::{color, FrameError, Renderer};
use crate::source::{Advance, FrameSource};
use crate::surface::{PlotSurface, TrackShape};

/// Test double for the plot surface: records shapes and commits.
#[derive(Default)]
struct RecordingSurface {
    shapes: Vec<Option<TrackShape>>,
    commits: usize,
}

impl PlotSurface for RecordingSurface {
    fn add_track(&mut self) -> usize {
        self.shapes.push(None);
        self.shapes.len() - 1
    }

    fn track_count(&self) -> usize {
        self.shapes.len()
    }

    fn set_segment(&mut self, track: usize, a: Vec2, b: Vec2, color: [u8; 4]) {
        self.shapes[track] = Some(TrackShape::Segment { a, b, color });
    }

    fn set_point(&mut self, track: usize, p: Vec2, color: [u8; 4]) {
        self.shapes[track] = Some(TrackShape::Point { p, color });
    }

    fn clear_tracks(&mut self) {
        self.shapes.clear();
    }

    fn commit(&mut self) {
        self.commits += 1;
    }
}

fn renderer() -> Renderer {
    Renderer::with_config(ReplayConfig::default())
}

fn is_segment(shape: &Option<TrackShape>) -> bool {
    matches!(shape, Some(TrackShape::Segment { .. }))
}

fn is_point(shape: &Option<TrackShape>) -> bool {
    matches!(shape, Some(TrackShape::Point { .. }))
}

#[test]
fn first_frame_allocates_one_track_per_particle() {
    let mut r = renderer();
    let mut surface = RecordingSurface::default();
    let prev = vec![Vec2::zero(), Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
    let cur = vec![Vec2::new(0.5, 0.0), Vec2::new(1.5, 1.0), Vec2::new(2.5, 2.0)];

    r.on_frames_ready(&prev, &cur, &mut surface).unwrap();
    assert_eq!(r.track_count(), 3);
    assert_eq!(surface.track_count(), 3);
    assert_eq!(surface.commits, 1);
}

#[test]
fn threshold_edges_are_deterministic() {
    // Squared threshold is 2500; strictly-greater means exactly 2500 is
    // still a segment.
    let mut r = renderer();
    let mut surface = RecordingSurface::default();
    let prev = vec![Vec2::zero(), Vec2::zero(), Vec2::zero()];
    let cur = vec![
        Vec2::new(49.99, 0.0), // 2499.0001 -> segment
        Vec2::new(30.0, 40.0), // exactly 2500 -> segment
        Vec2::new(50.01, 0.0), // 2501.0001 -> point
    ];

    r.on_frames_ready(&prev, &cur, &mut surface).unwrap();
    assert!(is_segment(&surface.shapes[0]), "2499 must draw a segment");
    assert!(is_segment(&surface.shapes[1]), "exactly 2500 must draw a segment");
    assert!(is_point(&surface.shapes[2]), "2501 must draw a lone point");
}

#[test]
fn boundary_rule_is_symmetric() {
    let a = vec![Vec2::new(5.0, 5.0)];
    let b = vec![Vec2::new(90.0, 5.0)];

    let mut forward = RecordingSurface::default();
    renderer().on_frames_ready(&a, &b, &mut forward).unwrap();
    let mut backward = RecordingSurface::default();
    renderer().on_frames_ready(&b, &a, &mut backward).unwrap();

    assert_eq!(
        is_point(&forward.shapes[0]),
        is_point(&backward.shapes[0]),
        "distance is symmetric, so the wrap classification must be too"
    );
}

#[test]
fn particle_count_change_is_fatal() {
    let mut r = renderer();
    let mut surface = RecordingSurface::default();
    let prev = vec![Vec2::zero(), Vec2::new(1.0, 1.0)];
    let cur = vec![Vec2::zero()];

    let err = r.on_frames_ready(&prev, &cur, &mut surface).unwrap_err();
    assert_eq!(
        err,
        FrameError::ParticleCountChanged { previous: 2, current: 1 }
    );
    assert!(r.speed_series().is_empty(), "no sample for a rejected frame");
}

#[test]
fn track_mismatch_is_fatal_even_when_lengths_agree() {
    let mut r = renderer();
    let mut surface = RecordingSurface::default();
    let two = vec![Vec2::zero(), Vec2::new(1.0, 0.0)];
    r.on_frames_ready(&two, &two, &mut surface).unwrap();

    // A shorter pair with matching prev/cur lengths sneaks past the count
    // check but not the allocation guard.
    let one = vec![Vec2::zero()];
    let err = r.on_frames_ready(&one, &one, &mut surface).unwrap_err();
    assert_eq!(err, FrameError::TrackMismatch { tracks: 2, particles: 1 });
}

#[test]
fn mean_speed_excludes_wrapped_particles() {
    let mut r = renderer();
    let mut surface = RecordingSurface::default();
    let prev = vec![Vec2::zero(), Vec2::zero()];
    // One genuine move of length 2, one wrap jump.
    let cur = vec![Vec2::new(2.0, 0.0), Vec2::new(90.0, 0.0)];

    r.on_frames_ready(&prev, &cur, &mut surface).unwrap();
    let sample = r.speed_series()[0];
    assert_eq!(sample[0], 0.0);
    assert!(
        (sample[1] - 2.0).abs() < 1e-6,
        "wrap jumps must not dilute the mean, got {}",
        sample[1]
    );
}

#[test]
fn all_wrapped_frame_counts_as_zero_speed() {
    let mut r = renderer();
    let mut surface = RecordingSurface::default();
    let prev = vec![Vec2::zero(), Vec2::zero()];
    let cur = vec![Vec2::new(90.0, 0.0), Vec2::new(0.0, 90.0)];

    r.on_frames_ready(&prev, &cur, &mut surface).unwrap();
    assert_eq!(r.speed_series(), &[[0.0, 0.0]]);
}

#[test]
fn speed_axis_grows_by_fixed_factor() {
    let mut r = renderer();
    let mut surface = RecordingSurface::default();
    let (_, initial_max) = r.speed_axis_max();
    assert_eq!(initial_max, 1.0);

    // 0.9 exceeds 75% of the visible range, so the range doubles once.
    let prev = vec![Vec2::zero()];
    let cur = vec![Vec2::new(0.9, 0.0)];
    r.on_frames_ready(&prev, &cur, &mut surface).unwrap();
    let (_, speed_max) = r.speed_axis_max();
    assert_eq!(speed_max, 2.0);
}

#[test]
fn direction_coloring_applies_to_segments_only() {
    let mut cfg = ReplayConfig::default();
    cfg.color_by_direction = true;
    let mut r = Renderer::with_config(cfg);
    let mut surface = RecordingSurface::default();
    let prev = vec![Vec2::zero(), Vec2::zero()];
    let cur = vec![Vec2::new(1.0, 0.0), Vec2::new(90.0, 0.0)];

    r.on_frames_ready(&prev, &cur, &mut surface).unwrap();
    match surface.shapes[0] {
        Some(TrackShape::Segment { color, .. }) => {
            assert_eq!(color, color::color_from_direction(1.0, 0.0));
        }
        ref other => panic!("expected a segment, got {:?}", other),
    }
    match surface.shapes[1] {
        Some(TrackShape::Point { color, .. }) => {
            assert_eq!(color, crate::config::WRAP_POINT_COLOR, "wraps stay neutral");
        }
        ref other => panic!("expected a point, got {:?}", other),
    }
}

#[test]
fn reset_clears_run_scoped_state() {
    let mut r = renderer();
    let mut surface = RecordingSurface::default();
    let prev = vec![Vec2::zero()];
    let cur = vec![Vec2::new(1.0, 0.0)];
    r.on_frames_ready(&prev, &cur, &mut surface).unwrap();

    r.reset();
    assert_eq!(r.track_count(), 0);
    assert_eq!(r.frame(), 0);
    assert!(r.speed_series().is_empty());
}

// End-to-end scenarios through FrameSource.

fn write_log(name: &str, lines: &[&str]) -> std::path::PathBuf {
    use std::io::Write;
    let mut path = std::env::temp_dir();
    path.push(format!(
        "particle_replay_renderer_{}_{}.log",
        name,
        std::process::id()
    ));
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

#[test]
fn count_change_in_the_log_halts_without_panicking() {
    let path = write_log("count_change", &["0 0 1 1", "0 0"]);
    let mut source = FrameSource::new();
    source.attach(&path).unwrap();
    assert_eq!(source.advance(), Advance::Ready);

    let mut r = renderer();
    let mut surface = RecordingSurface::default();
    let err = r
        .on_frames_ready(source.previous(), source.current(), &mut surface)
        .unwrap_err();
    assert!(matches!(err, FrameError::ParticleCountChanged { .. }));
    std::fs::remove_file(path).ok();
}

#[test]
fn replay_is_bit_for_bit_reproducible() {
    let path = write_log(
        "replay",
        &["0 0 10 10", "1 0 10 12", "2 0 95 12", "3 1 94 11"],
    );
    let mut source = FrameSource::new();
    source.attach(&path).unwrap();

    let run = |source: &mut FrameSource| {
        let mut r = renderer();
        let mut surface = RecordingSurface::default();
        let mut classifications = Vec::new();
        while source.advance() == Advance::Ready {
            r.on_frames_ready(source.previous(), source.current(), &mut surface)
                .unwrap();
            classifications.push(surface.shapes.clone());
        }
        (classifications, r.speed_series().to_vec())
    };

    let first = run(&mut source);
    source.rewind();
    let second = run(&mut source);
    assert_eq!(first, second, "same input must replay identically");
    std::fs::remove_file(path).ok();
}
