//! Interactive Collatz graph viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (graph, active runs, configuration) and implements [`eframe::App`]
//! to drive and render the simulation through an egui UI.

use collatz_core::{
    collatz::CollatzRun,
    config::Config,
    graph::Graph,
    phases,
    types::NodeId,
};
use eframe::App;
use glam::Vec2;
use rand::Rng;
use rand::rng;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Graph`], the active [`CollatzRun`]s, [`Config`].
/// - UI state (pan/zoom camera, run/pause, the currently dragged node).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The per-frame update is the driver loop from the core's contract:
/// 1. Read the wall-clock `dt` for this frame.
/// 2. [`phases::generator_phase`] — all runs advance, finished ones are
///    pruned.
/// 3. [`phases::physics_phase`] — all nodes relax one step.
/// 4. While a node is held, write the pointer's world position into it.
/// 5. Draw edges, then nodes.
pub struct Viewer {
    graph: Graph,
    runs: Vec<CollatzRun>,
    cfg: Config,

    rng: rand::rngs::ThreadRng,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    dragged: Option<NodeId>,
}

impl Viewer {
    /// Creates a new viewer with an empty graph.
    ///
    /// The first sequences are spawned by the user: clicking empty canvas
    /// starts a run at the clicked point, and the top bar can spawn runs
    /// at the gravity center.
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            runs: Vec::new(),
            cfg: Config::default(),
            rng: rng(),
            running: true,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            dragged: None,
        }
    }

    /// Begins a new Collatz run at `start`, anchored near `pos`.
    ///
    /// If a node for `start` already exists it is reused, so new runs
    /// merge into the existing graph.
    pub fn spawn_sequence(&mut self, start: u64, pos: Vec2) {
        let run = CollatzRun::spawn(&mut self.graph, start, pos, &self.cfg);
        self.runs.push(run);
    }

    /// Spawns a run with a random start value near the gravity center.
    fn spawn_random(&mut self) {
        let start = self.rng.random_range(1..100_000u64);
        let jitter = Vec2::new(
            self.rng.random_range(-0.5..0.5),
            self.rng.random_range(-0.5..0.5),
        ) * self.cfg.spawn_jitter;
        self.spawn_sequence(start, self.cfg.center + jitter);
    }

    /// Clears all simulation data: every node, edge, and active run.
    fn clear(&mut self) {
        log::debug!(
            "clearing {} nodes and {} runs",
            self.graph.len(),
            self.runs.len()
        );
        self.graph.clear();
        self.runs.clear();
        self.dragged = None;
    }

    /// Grabs a node: its position becomes driver-set until release.
    pub fn begin_drag(&mut self, id: NodeId) {
        self.end_drag();
        self.graph.nodes[id].dragged = true;
        self.dragged = Some(id);
    }

    /// Moves the held node. Forces keep accumulating into its velocity,
    /// only integration is suspended while held.
    pub fn set_drag_position(&mut self, pos: Vec2) {
        if let Some(id) = self.dragged {
            self.graph.nodes[id].pos = pos;
        }
    }

    /// Releases the held node; physics takes its position over again.
    pub fn end_drag(&mut self) {
        if let Some(id) = self.dragged.take() {
            self.graph.nodes[id].dragged = false;
        }
    }

    /// Returns the topmost node under `world`, if any.
    fn node_at(&self, world: Vec2) -> Option<NodeId> {
        self.graph
            .nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, n)| (n.pos - world).length() < n.radius)
            .map(|(id, _)| id)
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y + p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// Inverse of [`Viewer::world_to_screen`] up to floating point
    /// rounding.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (p.y - center.y - self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, spawning, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Spawn random").clicked() {
                    self.spawn_random();
                }

                if ui.button("Clear").clicked() {
                    self.clear();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (node/edge counts, active runs).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("runs = {}", self.runs.len()));
                ui.separator();
                ui.label(format!("nodes = {}", self.graph.len()));
                ui.label(format!("edges = {}", self.graph.edge_count()));
            });
        });
    }

    /// Builds the right-hand configuration panel for simulation parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Repulsion");
                Self::labeled_drag_f32(
                    ui,
                    "radius:",
                    &mut self.cfg.repulsion_radius,
                    1.0..=2000.0,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "force:",
                    &mut self.cfg.repulsion_force,
                    0.0..=100.0,
                    0.1,
                );

                ui.separator();
                ui.label("Springs");
                Self::labeled_drag_f32(
                    ui,
                    "length:",
                    &mut self.cfg.spring_length,
                    1.0..=500.0,
                    1.0,
                );
                Self::labeled_drag_f32(ui, "force:", &mut self.cfg.spring_force, 0.0..=5.0, 0.01);

                ui.separator();
                ui.label("Gravity / motion");
                Self::labeled_drag_f32(
                    ui,
                    "center gravity:",
                    &mut self.cfg.center_gravity,
                    0.0..=2.0,
                    0.005,
                );
                Self::labeled_drag_f32(ui, "center.x:", &mut self.cfg.center.x, -2000.0..=2000.0, 1.0);
                Self::labeled_drag_f32(ui, "center.y:", &mut self.cfg.center.y, -2000.0..=2000.0, 1.0);
                Self::labeled_drag_f32(ui, "max speed:", &mut self.cfg.max_speed, 1.0..=2000.0, 1.0);
                Self::labeled_drag_f32(ui, "friction:", &mut self.cfg.friction, 0.0..=1.0, 0.005);

                ui.separator();
                ui.label("Nodes");
                Self::labeled_drag_f32(ui, "radius:", &mut self.cfg.node_radius, 1.0..=64.0, 0.5);
                Self::labeled_drag_f32(
                    ui,
                    "growth rate:",
                    &mut self.cfg.growth_rate,
                    0.1..=50.0,
                    0.1,
                );
                Self::labeled_drag_f32(
                    ui,
                    "spawn jitter:",
                    &mut self.cfg.spawn_jitter,
                    0.0..=200.0,
                    1.0,
                );

                ui.separator();
                ui.label("Generator timing");
                Self::labeled_drag_f32(
                    ui,
                    "initial delay:",
                    &mut self.cfg.initial_delay,
                    0.0..=5.0,
                    0.01,
                );
                Self::labeled_drag_f32(ui, "min delay:", &mut self.cfg.min_delay, 0.0..=1.0, 0.005);
                Self::labeled_drag_f32(
                    ui,
                    "delay decay:",
                    &mut self.cfg.delay_decay,
                    0.5..=1.0,
                    0.005,
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });
    }

    /// Advances the simulation by one frame worth of wall-clock time.
    fn step_frame(&mut self, dt: f32) {
        phases::generator_phase(&mut self.graph, &mut self.runs, &self.cfg, dt, &mut self.rng);
        phases::physics_phase(&mut self.graph, &self.cfg, dt);
    }

    /// Builds the central canvas: input handling, stepping, and drawing.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            let hover_world = response.hover_pos().map(|p| self.screen_to_world(p, rect));

            // Grab a node, or fall back to panning the camera.
            if response.drag_started() {
                let grabbed = response
                    .interact_pointer_pos()
                    .map(|p| self.screen_to_world(p, rect))
                    .and_then(|world| self.node_at(world));
                if let Some(id) = grabbed {
                    self.begin_drag(id);
                }
            }

            if response.dragged() {
                if self.dragged.is_some() {
                    if let Some(world) = response
                        .interact_pointer_pos()
                        .map(|p| self.screen_to_world(p, rect))
                    {
                        self.set_drag_position(world);
                    }
                } else {
                    self.pan += response.drag_delta();
                }
            }

            if response.drag_stopped() {
                self.end_drag();
            }

            // Click on empty canvas: start a new run there.
            if response.clicked()
                && let Some(world) = hover_world
                && self.node_at(world).is_none()
            {
                let start = self.rng.random_range(1..100_000u64);
                self.spawn_sequence(start, world);
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());

                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            // Advance the simulation with this frame's wall-clock delta.
            if self.running {
                let dt = ctx.input(|i| i.stable_dt).clamp(0.0, 0.1);
                self.step_frame(dt);
            }

            // Draw edges first so nodes sit on top of them.
            let edge_stroke = egui::Stroke::new(
                (3.0 * self.zoom).max(1.0),
                egui::Color32::from_rgb(247, 240, 213),
            );
            for (i, node) in self.graph.nodes.iter().enumerate() {
                for &j in &node.connections {
                    if j <= i {
                        continue;
                    }
                    let a = self.world_to_screen(node.pos, rect);
                    let b = self.world_to_screen(self.graph.nodes[j].pos, rect);
                    painter.line_segment([a, b], edge_stroke);
                }
            }

            // Draw nodes, colored by value.
            for node in self.graph.nodes.iter() {
                let p = self.world_to_screen(node.pos, rect);
                let r = (node.radius * self.zoom).max(1.0);
                let hue = node.hue() / 360.0;

                let fill = egui::ecolor::Hsva::new(hue, 0.45, 0.95, 1.0);
                let stroke_color = egui::ecolor::Hsva::new(hue, 0.55, 0.80, 1.0);

                painter.circle(
                    p,
                    r,
                    fill,
                    egui::Stroke::new((2.0 * self.zoom).max(0.5), stroke_color),
                );

                // Value label, shrunk to fit small nodes.
                let font_size = (r * 0.7).clamp(4.0, 14.0 * self.zoom.max(1.0));
                painter.text(
                    p,
                    egui::Align2::CENTER_CENTER,
                    node.value.to_string(),
                    egui::FontId::proportional(font_size),
                    egui::Color32::from_gray(38),
                );
            }

            if self.running && (!self.runs.is_empty() || !self.graph.is_empty()) {
                ctx.request_repaint();
            }
        });
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
