// gui.rs
// eframe shell: the two plot panels and the transport controls.

use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, Sender};

use eframe::egui::{self, Color32};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, Points};
use ultraviolet::Vec2;

use crate::config;
use crate::renderer::state::{StreamCommand, StreamEvent, FRAME_SOURCE, PAUSED};
use crate::renderer::Renderer;
use crate::surface::{PlotSurface, TrackShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Stopped,
    Running,
    Paused,
}

/// Plot surface backed by retained per-track shapes; the particle panel
/// repaints them every egui frame.
#[derive(Default)]
pub struct EguiSurface {
    tracks: Vec<Option<TrackShape>>,
}

impl EguiSurface {
    pub fn shapes(&self) -> impl Iterator<Item = &TrackShape> {
        self.tracks.iter().flatten()
    }
}

impl PlotSurface for EguiSurface {
    fn add_track(&mut self) -> usize {
        self.tracks.push(None);
        self.tracks.len() - 1
    }

    fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn set_segment(&mut self, track: usize, a: Vec2, b: Vec2, color: [u8; 4]) {
        self.tracks[track] = Some(TrackShape::Segment { a, b, color });
    }

    fn set_point(&mut self, track: usize, p: Vec2, color: [u8; 4]) {
        self.tracks[track] = Some(TrackShape::Point { p, color });
    }

    fn clear_tracks(&mut self) {
        self.tracks.clear();
    }

    fn commit(&mut self) {
        // Retained shapes are repainted on the next egui pass; nothing to
        // flush here.
    }
}

pub struct ViewerApp {
    renderer: Renderer,
    surface: EguiSurface,
    commands: Sender<StreamCommand>,
    events: Receiver<StreamEvent>,
    run_state: RunState,
    attached: bool,
    path_input: String,
    // Run generation: bumped whenever the loop is cut over (Open, Start).
    // Events echoing an older generation belong to a dead run.
    generation: u64,
    // At most one advance may be outstanding; cleared when any event lands.
    advance_in_flight: bool,
}

impl ViewerApp {
    pub fn new(commands: Sender<StreamCommand>, events: Receiver<StreamEvent>) -> Self {
        let mut app = Self {
            renderer: Renderer::new(),
            surface: EguiSurface::default(),
            commands,
            events,
            run_state: RunState::Stopped,
            attached: false,
            path_input: String::new(),
            generation: 0,
            advance_in_flight: false,
        };
        if let Some(path) = std::env::args().nth(1) {
            app.path_input = path;
            app.attach();
        }
        app
    }

    /// Bind the entered log path and reset the run display to its
    /// ready-to-start state. An open failure is a logged no-op: no state is
    /// mutated and no run starts.
    fn attach(&mut self) {
        match FRAME_SOURCE.lock().attach(Path::new(&self.path_input)) {
            Ok(()) => {
                self.attached = true;
                self.run_state = RunState::Stopped;
                self.generation += 1;
                self.renderer.reset();
                self.surface.clear_tracks();
            }
            Err(e) => eprintln!("failed to open {}: {}", self.path_input, e),
        }
    }

    fn start_run(&mut self) {
        self.renderer.reset();
        self.surface.clear_tracks();
        PAUSED.store(false, Ordering::Relaxed);
        self.run_state = RunState::Running;
        self.generation += 1;
        // An advance queued by a dead run may still touch the cursor before
        // this rewind lands; command order guarantees the rewind wins.
        self.send(StreamCommand::Rewind);
        self.request_advance();
    }

    fn control_clicked(&mut self) {
        match self.run_state {
            RunState::Stopped => {
                if self.attached {
                    self.start_run();
                }
            }
            RunState::Running => {
                // The in-flight frame still renders; the ready handler just
                // stops requesting more.
                PAUSED.store(true, Ordering::Relaxed);
                self.run_state = RunState::Paused;
            }
            RunState::Paused => {
                PAUSED.store(false, Ordering::Relaxed);
                self.run_state = RunState::Running;
                // If the pre-pause frame is still in flight, its handler
                // continues the loop instead.
                self.request_advance();
            }
        }
    }

    fn control_label(&self) -> &'static str {
        match self.run_state {
            RunState::Stopped => "Start",
            RunState::Running => "Pause",
            RunState::Paused => "Resume",
        }
    }

    fn handle_frame_ready(&mut self) {
        // A paused run still renders its in-flight frame.
        if self.run_state == RunState::Stopped {
            return;
        }
        let result = {
            let source = FRAME_SOURCE.lock();
            self.renderer
                .on_frames_ready(source.previous(), source.current(), &mut self.surface)
        };
        match result {
            Ok(()) => {
                if self.run_state == RunState::Running && !PAUSED.load(Ordering::Relaxed) {
                    self.request_advance();
                }
            }
            Err(e) => {
                // Fatal stream error: halt, keep the last good frame.
                eprintln!("error: {}", e);
                self.finish_run();
            }
        }
    }

    /// End of stream or fatal error: stop the loop, rewind for the next
    /// start, keep everything drawn so far on screen.
    fn finish_run(&mut self) {
        if self.run_state == RunState::Stopped {
            return;
        }
        self.run_state = RunState::Stopped;
        self.send(StreamCommand::Rewind);
    }

    /// Request the next advance unless one is already outstanding.
    fn request_advance(&mut self) {
        if self.advance_in_flight {
            return;
        }
        self.advance_in_flight = true;
        self.send(StreamCommand::Advance {
            generation: self.generation,
        });
    }

    fn send(&self, cmd: StreamCommand) {
        if self.commands.send(cmd).is_err() {
            eprintln!("streaming thread is gone");
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            // Any event frees the one in-flight slot, even a stale one.
            self.advance_in_flight = false;
            let generation = match event {
                StreamEvent::FrameReady { generation } => generation,
                StreamEvent::EndOfStream { generation } => generation,
            };
            if generation != self.generation {
                // Leftover from a run that Open or Start cut over. Discard
                // it, but keep the current run fed if it was waiting on the
                // slot the stale advance occupied.
                if self.run_state == RunState::Running && !PAUSED.load(Ordering::Relaxed) {
                    self.request_advance();
                }
                continue;
            }
            match event {
                StreamEvent::FrameReady { .. } => self.handle_frame_ready(),
                StreamEvent::EndOfStream { .. } => self.finish_run(),
            }
        }
    }

    fn particle_panel(&self, ui: &mut egui::Ui) {
        Plot::new("particle_plot")
            .data_aspect(1.0)
            .allow_drag(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [config::DOMAIN_AXIS_MIN, config::DOMAIN_AXIS_MIN],
                    [config::DOMAIN_AXIS_MAX, config::DOMAIN_AXIS_MAX],
                ));
                for shape in self.surface.shapes() {
                    match *shape {
                        TrackShape::Segment { a, b, color } => {
                            let points = vec![
                                [a.x as f64, a.y as f64],
                                [b.x as f64, b.y as f64],
                            ];
                            plot_ui.line(
                                Line::new(PlotPoints::from(points))
                                    .color(to_color32(color))
                                    .width(2.0),
                            );
                        }
                        TrackShape::Point { p, color } => {
                            let points = vec![[p.x as f64, p.y as f64]];
                            plot_ui.points(
                                Points::new(PlotPoints::from(points))
                                    .color(to_color32(color))
                                    .radius(3.0),
                            );
                        }
                    }
                }
            });
    }

    fn speed_panel(&self, ui: &mut egui::Ui) {
        ui.label("Average speed");
        Plot::new("speed_plot")
            .height(360.0)
            .allow_drag(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                let (t_max, speed_max) = self.renderer.speed_axis_max();
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [0.0, 0.0],
                    [t_max, speed_max],
                ));
                if !self.renderer.speed_series().is_empty() {
                    plot_ui.line(Line::new(PlotPoints::from(
                        self.renderer.speed_series().to_vec(),
                    )));
                }
            });
    }
}

fn to_color32(c: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Log file:");
                ui.text_edit_singleline(&mut self.path_input);
                if ui.button("Open").clicked() {
                    self.attach();
                }
                if ui.button(self.control_label()).clicked() {
                    self.control_clicked();
                }
                if self.attached {
                    ui.label(format!("frame {}", self.renderer.frame()));
                } else {
                    ui.label("no file attached");
                }
            });
        });

        egui::SidePanel::right("speed_panel")
            .resizable(true)
            .show(ctx, |ui| {
                self.speed_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.particle_panel(ui);
        });

        // Keep polling the event channel even while the user is idle.
        ctx.request_repaint();
    }
}
