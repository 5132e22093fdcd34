//! Per-frame simulation pipeline.
//!
//! The driver calls, once per display frame with the wall-clock delta:
//! 1. [`generator_phase`] — every active Collatz run advances (possibly
//!    adding nodes and edges), then finished runs are pruned.
//! 2. [`physics_phase`] — every node accumulates repulsion, spring and
//!    gravity contributions into its velocity, then friction, the speed
//!    cap and integration are applied.
//!
//! All generator mutation strictly precedes the physics pass, so a node
//! created this frame is force-integrated in the same frame from its
//! just-created position, and the node collection is never resized while
//! the physics sweep iterates it.

use crate::{collatz::CollatzRun, config::Config, graph::Graph, node::Node, types::NodeId};
use glam::Vec2;
use rand::Rng;

/// Distance floor used when two nodes (nearly) coincide, so force
/// magnitudes stay finite and directions stay defined.
const MIN_DISTANCE: f32 = 0.1;

/// Advances every active run and removes the finished ones.
///
/// Runs advance in insertion order; each performs at most one sequence
/// step per frame (see [`CollatzRun::advance`]). Pruning happens here in
/// the driver phase, never inside a run itself.
pub fn generator_phase(
    graph: &mut Graph,
    runs: &mut Vec<CollatzRun>,
    cfg: &Config,
    dt: f32,
    rng: &mut impl Rng,
) {
    for run in runs.iter_mut() {
        run.advance(graph, cfg, dt, rng);
    }
    runs.retain(|run| !run.finished);
}

/// Steps the physics of every node for one time slice.
///
/// Nodes are processed in index order and each sees earlier nodes'
/// already-integrated positions, matching a sequential per-node sweep.
/// Per node, in fixed order: spawn animation, repulsion, spring, gravity
/// (all accumulated into velocity), then friction, speed cap, and
/// position integration. Friction and the cap therefore act on the
/// combined per-frame force response, not on individual forces.
///
/// Dragged nodes skip integration only: their position is driver-set,
/// but forces still accumulate so motion resumes naturally on release.
pub fn physics_phase(graph: &mut Graph, cfg: &Config, dt: f32) {
    for i in 0..graph.nodes.len() {
        let dv = repulsion_velocity(&graph.nodes, i, cfg)
            + spring_velocity(&graph.nodes, i, cfg)
            + gravity_velocity(&graph.nodes[i], cfg);

        let node = &mut graph.nodes[i];
        node.grow_radius(dt, cfg.growth_rate);
        node.vel += dv;
        node.vel *= cfg.friction;
        node.cap_speed(cfg.max_speed);
        if !node.dragged {
            node.pos += node.vel * dt;
        }
    }
}

/// Repulsive velocity contribution on node `i` from all other nodes.
///
/// Each node within `Config::repulsion_radius` pushes `i` directly away
/// with magnitude `(1 - d / radius) * repulsion_force`: zero at and
/// beyond the radius, maximal when coincident. The distance is floored
/// to [`MIN_DISTANCE`] so coincident nodes never yield NaN.
pub fn repulsion_velocity(nodes: &[Node], i: NodeId, cfg: &Config) -> Vec2 {
    let pos = nodes[i].pos;
    let mut dv = Vec2::ZERO;

    for (j, other) in nodes.iter().enumerate() {
        if j == i {
            continue;
        }
        let delta = pos - other.pos;
        let dist = delta.length().max(MIN_DISTANCE);
        if dist > cfg.repulsion_radius {
            continue;
        }
        let force = (1.0 - dist / cfg.repulsion_radius) * cfg.repulsion_force;
        dv += delta.normalize_or_zero() * force;
    }

    dv
}

/// Spring velocity contribution on node `i` from its connected nodes.
///
/// A linear, unclamped spring per edge: `(d - rest) * spring_force`
/// directed toward the neighbor, so stretched edges pull together and
/// compressed edges push apart, with zero contribution exactly at the
/// rest length.
pub fn spring_velocity(nodes: &[Node], i: NodeId, cfg: &Config) -> Vec2 {
    let pos = nodes[i].pos;
    let mut dv = Vec2::ZERO;

    for &j in &nodes[i].connections {
        let delta = nodes[j].pos - pos;
        let dist = delta.length().max(MIN_DISTANCE);
        let stretch = dist - cfg.spring_length;
        dv += delta.normalize_or_zero() * (stretch * cfg.spring_force);
    }

    dv
}

/// Gentle pull toward the shared focal point.
pub fn gravity_velocity(node: &Node, cfg: &Config) -> Vec2 {
    (cfg.center - node.pos) * cfg.center_gravity
}
