use glam::Vec2;

/// Tunable simulation parameters.
///
/// All fields are public and intended to be edited live by the UI; the
/// physics and generator code reads them fresh every frame, so changes
/// take effect immediately.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Target radius of newly spawned nodes.
    pub node_radius: f32,
    /// Range within which nodes push each other apart.
    pub repulsion_radius: f32,
    /// Peak repulsion strength (reached when two nodes coincide).
    pub repulsion_force: f32,
    /// Rest length of an edge spring. Shorter edges push apart,
    /// longer edges pull together.
    pub spring_length: f32,
    /// Spring stiffness.
    pub spring_force: f32,
    /// Pull toward [`Config::center`], keeping the graph from drifting away.
    pub center_gravity: f32,
    /// Focal point of the center gravity.
    pub center: Vec2,
    /// Velocity magnitude cap.
    pub max_speed: f32,
    /// Flat velocity multiplier applied once per step, not per second,
    /// so damping depends on frame rate (kept from the original design).
    pub friction: f32,
    /// Lerp rate of the spawn-in radius animation.
    pub growth_rate: f32,
    /// Seconds between a generator's first steps.
    pub initial_delay: f32,
    /// Floor the step delay decays toward.
    pub min_delay: f32,
    /// Multiplier applied to the step delay after every successful step.
    pub delay_decay: f32,
    /// Span of the random offset given to newly derived node positions.
    pub spawn_jitter: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_radius: 16.0,
            repulsion_radius: 256.0,
            repulsion_force: 8.0,
            spring_length: 60.0,
            spring_force: 0.5,
            center_gravity: 0.1,
            center: Vec2::ZERO,
            max_speed: 100.0,
            friction: 0.9,
            growth_rate: 10.0,
            initial_delay: 0.5,
            min_delay: 0.02,
            delay_decay: 0.95,
            spawn_jitter: 40.0,
        }
    }
}
