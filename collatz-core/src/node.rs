use crate::types::NodeId;
use glam::Vec2;

/// Remaining gap below which the spawn animation snaps to the target radius.
const RADIUS_SNAP_EPSILON: f32 = 0.1;

/// A graph vertex representing one integer value visited by a Collatz run.
#[derive(Debug)]
pub struct Node {
    /// The Collatz value this node stands for; unique within a graph.
    pub value: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current radius; grows from zero toward `target_radius` after spawn.
    pub radius: f32,
    pub target_radius: f32,
    /// Ids of connected nodes. Undirected: if `b` is in here, this node's
    /// id is in `b.connections` too (enforced by `Graph::connect`).
    pub connections: Vec<NodeId>,
    /// While set, the integrator leaves `pos` alone (the driver writes it
    /// directly); forces still accumulate into `vel`.
    pub dragged: bool,
}

impl Node {
    pub fn new(value: u64, pos: Vec2, target_radius: f32) -> Self {
        Self {
            value,
            pos,
            vel: Vec2::ZERO,
            radius: 0.0,
            target_radius,
            connections: Vec::with_capacity(4),
            dragged: false,
        }
    }

    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.connections.contains(&other)
    }

    /// Advances the spawn-in animation: the radius exponentially approaches
    /// the target and snaps to it once the gap drops below
    /// [`RADIUS_SNAP_EPSILON`]. No-op once at the target.
    pub fn grow_radius(&mut self, dt: f32, growth_rate: f32) {
        if self.radius == self.target_radius {
            return;
        }
        let t = (growth_rate * dt).min(1.0);
        self.radius = lerp(self.radius, self.target_radius, t);
        if self.target_radius - self.radius < RADIUS_SNAP_EPSILON {
            self.radius = self.target_radius;
        }
    }

    /// Rescales the velocity to `max_speed` if it is faster, preserving
    /// direction.
    pub fn cap_speed(&mut self, max_speed: f32) {
        self.vel = self.vel.clamp_length_max(max_speed);
    }

    /// Color input for the render layer.
    pub fn hue(&self) -> f32 {
        (self.value % 360) as f32
    }
}

fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}
