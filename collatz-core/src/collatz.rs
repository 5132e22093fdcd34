use crate::{config::Config, graph::Graph, types::NodeId};
use glam::Vec2;
use rand::Rng;

/// One application of the Collatz rule.
pub fn collatz_next(v: u64) -> u64 {
    if v % 2 == 0 { v / 2 } else { v * 3 + 1 }
}

/// A single Collatz run walking the graph from a starting value.
///
/// Each run owns a cursor into the graph and advances it on a decaying
/// timer: steps start `Config::initial_delay` seconds apart and speed up
/// by `Config::delay_decay` per step down to `Config::min_delay`, so a
/// run visibly accelerates. Nodes already present in the graph are
/// reused, which makes concurrent runs merge into one shared structure.
///
/// A run finishes the first time it would re-traverse an existing edge.
/// For Collatz sequences this fires when the run closes the terminal
/// 4 → 2 → 1 → 4 loop; it is a heuristic tied to that structure, not a
/// general cycle detector. Once `finished` is set the run never mutates
/// the graph again and should be pruned by the driver.
#[derive(Debug)]
pub struct CollatzRun {
    /// The node currently representing "where this run is".
    pub cursor: NodeId,
    /// Seconds until the next step fires.
    pub delay: f32,
    /// Time accumulated toward the next step.
    pub timer: f32,
    /// Terminal flag; permanent once set.
    pub finished: bool,
}

impl CollatzRun {
    /// Starts a run at `start`, reusing the existing node for that value
    /// or creating one at `pos`.
    pub fn spawn(graph: &mut Graph, start: u64, pos: Vec2, cfg: &Config) -> Self {
        let cursor = graph
            .find_by_value(start)
            .unwrap_or_else(|| graph.add_node(start, pos, cfg.node_radius));
        log::info!("collatz run spawned at {start}");
        Self {
            cursor,
            delay: cfg.initial_delay,
            timer: 0.0,
            finished: false,
        }
    }

    /// Accumulates `dt` and performs at most one sequence step.
    ///
    /// 1. No-op when finished, or while `timer` has not reached `delay`.
    /// 2. On firing, the remainder is carried (`timer -= delay`, not reset
    ///    to zero), preserving long-run timing accuracy.
    /// 3. If the cursor already has an edge to a node of the next value,
    ///    the run finishes without touching the graph.
    /// 4. Otherwise the node for the next value is found or created
    ///    (new nodes spawn near the cursor with random jitter), connected
    ///    to the cursor, and the cursor moves onto it; the step delay
    ///    decays toward its floor.
    pub fn advance(&mut self, graph: &mut Graph, cfg: &Config, dt: f32, rng: &mut impl Rng) {
        if self.finished {
            return;
        }

        self.timer += dt;
        if self.timer < self.delay {
            return;
        }
        self.timer -= self.delay;

        let current = graph.nodes[self.cursor].value;
        let next = collatz_next(current);

        if graph.has_edge_to_value(self.cursor, next) {
            self.finished = true;
            log::info!("collatz run finished at {current}");
            return;
        }

        let next_id = match graph.find_by_value(next) {
            Some(id) => id,
            None => {
                let jitter = Vec2::new(
                    rng.random_range(-0.5..0.5),
                    rng.random_range(-0.5..0.5),
                ) * cfg.spawn_jitter;
                let pos = graph.nodes[self.cursor].pos + jitter;
                graph.add_node(next, pos, cfg.node_radius)
            }
        };

        graph.connect(self.cursor, next_id);
        self.cursor = next_id;
        self.delay = (self.delay * cfg.delay_decay).max(cfg.min_delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Config whose delays never gate stepping, so every `advance` fires.
    fn eager_cfg() -> Config {
        Config {
            initial_delay: 0.0,
            min_delay: 0.0,
            ..Config::default()
        }
    }

    /// Drives `run` until it finishes, returning the values its cursor
    /// visited (including the starting value).
    fn run_to_completion(graph: &mut Graph, run: &mut CollatzRun, cfg: &Config) -> Vec<u64> {
        let mut rng = rng();
        let mut visited = vec![graph.nodes[run.cursor].value];
        for _ in 0..10_000 {
            let before = run.cursor;
            run.advance(graph, cfg, 1.0, &mut rng);
            if run.finished {
                return visited;
            }
            if run.cursor != before {
                visited.push(graph.nodes[run.cursor].value);
            }
        }
        panic!("run did not finish");
    }

    #[test]
    fn collatz_next_applies_the_rule() {
        assert_eq!(collatz_next(6), 3);
        assert_eq!(collatz_next(3), 10);
        assert_eq!(collatz_next(16), 8);
        assert_eq!(collatz_next(1), 4);
    }

    #[test]
    fn run_from_6_visits_the_known_sequence_and_finishes() {
        let cfg = eager_cfg();
        let mut graph = Graph::new();
        let mut run = CollatzRun::spawn(&mut graph, 6, Vec2::ZERO, &cfg);

        let visited = run_to_completion(&mut graph, &mut run, &cfg);

        // The cursor walks down to 1, steps back onto the existing 4, and
        // the next step would re-traverse the 4-2 edge, ending the run.
        assert_eq!(visited, vec![6, 3, 10, 5, 16, 8, 4, 2, 1, 4]);
        assert!(run.finished);

        // Only nine distinct values were ever materialized.
        assert_eq!(graph.len(), 9);
        // The loop-closing edge 1 <-> 4 exists exactly once.
        let one = graph.find_by_value(1).unwrap();
        assert!(graph.has_edge_to_value(one, 4));
        assert!(graph.has_edge_to_value(one, 2));
        assert_eq!(graph.nodes[one].connections.len(), 2);
    }

    #[test]
    fn finished_run_performs_no_further_mutation() {
        let cfg = eager_cfg();
        let mut graph = Graph::new();
        let mut run = CollatzRun::spawn(&mut graph, 6, Vec2::ZERO, &cfg);
        run_to_completion(&mut graph, &mut run, &cfg);

        let nodes = graph.len();
        let edges = graph.edge_count();
        let cursor = run.cursor;

        let mut rng = rng();
        for _ in 0..10 {
            run.advance(&mut graph, &cfg, 1.0, &mut rng);
        }

        assert!(run.finished);
        assert_eq!(run.cursor, cursor);
        assert_eq!(graph.len(), nodes);
        assert_eq!(graph.edge_count(), edges);
    }

    #[test]
    fn no_step_fires_before_the_delay_elapses() {
        let cfg = Config::default(); // initial_delay = 0.5
        let mut graph = Graph::new();
        let mut run = CollatzRun::spawn(&mut graph, 6, Vec2::ZERO, &cfg);
        let mut rng = rng();

        run.advance(&mut graph, &cfg, 0.3, &mut rng);
        assert_eq!(graph.len(), 1, "still waiting");
        assert_eq!(graph.nodes[run.cursor].value, 6);

        run.advance(&mut graph, &cfg, 0.3, &mut rng);
        assert_eq!(graph.len(), 2, "delay elapsed, one step fired");
        assert_eq!(graph.nodes[run.cursor].value, 3);
    }

    #[test]
    fn timer_carries_the_remainder_instead_of_resetting() {
        let cfg = Config::default();
        let mut graph = Graph::new();
        let mut run = CollatzRun::spawn(&mut graph, 6, Vec2::ZERO, &cfg);
        let mut rng = rng();

        run.advance(&mut graph, &cfg, 0.3, &mut rng);
        run.advance(&mut graph, &cfg, 0.3, &mut rng);

        // 0.6 accumulated, 0.5 consumed by the step.
        assert!((run.timer - 0.1).abs() < 1e-6);
    }

    #[test]
    fn delay_decays_exponentially_toward_the_floor() {
        let cfg = Config::default(); // 0.5 start, 0.95 decay, 0.02 floor
        let mut graph = Graph::new();
        let mut run = CollatzRun::spawn(&mut graph, 27, Vec2::ZERO, &cfg);
        let mut rng = rng();

        let mut steps = 0u32;
        for _ in 0..200 {
            let before = run.cursor;
            // Large dt so the pending delay always elapses in one call.
            run.advance(&mut graph, &cfg, 10.0, &mut rng);
            if run.finished {
                break;
            }
            if run.cursor != before {
                steps += 1;
                let expected = (0.5f32 * 0.95f32.powi(steps as i32)).max(0.02);
                assert!(
                    (run.delay - expected).abs() < 1e-5,
                    "after {steps} steps: delay {} != {expected}",
                    run.delay
                );
            }
        }
        assert!(steps > 0);
    }

    #[test]
    fn spawn_reuses_an_existing_node() {
        let cfg = eager_cfg();
        let mut graph = Graph::new();
        let first = CollatzRun::spawn(&mut graph, 6, Vec2::ZERO, &cfg);
        let second = CollatzRun::spawn(&mut graph, 6, Vec2::new(100.0, 0.0), &cfg);

        assert_eq!(graph.len(), 1);
        assert_eq!(first.cursor, second.cursor);
        // The reused node keeps its original position.
        assert_eq!(graph.nodes[second.cursor].pos, Vec2::ZERO);
    }

    #[test]
    fn new_nodes_spawn_near_their_predecessor() {
        let cfg = eager_cfg();
        let mut graph = Graph::new();
        let origin = Vec2::new(500.0, -200.0);
        let mut run = CollatzRun::spawn(&mut graph, 6, origin, &cfg);
        let mut rng = rng();

        run.advance(&mut graph, &cfg, 1.0, &mut rng);

        let child = &graph.nodes[run.cursor];
        assert_eq!(child.value, 3);
        let offset = child.pos - origin;
        assert!(offset.x.abs() <= cfg.spawn_jitter / 2.0);
        assert!(offset.y.abs() <= cfg.spawn_jitter / 2.0);
    }

    #[test]
    fn two_runs_merge_into_a_shared_graph() {
        let cfg = eager_cfg();
        let mut graph = Graph::new();

        let mut a = CollatzRun::spawn(&mut graph, 6, Vec2::ZERO, &cfg);
        run_to_completion(&mut graph, &mut a, &cfg);

        let mut b = CollatzRun::spawn(&mut graph, 7, Vec2::new(300.0, 0.0), &cfg);
        let visited = run_to_completion(&mut graph, &mut b, &cfg);

        // 7's trajectory reaches 10, which the first run already created;
        // the next edge (10-5) exists, so the second run stops there.
        assert_eq!(visited.last(), Some(&10));
        assert!(b.finished);

        // Values stay unique across both runs.
        let mut values: Vec<u64> = graph.nodes.iter().map(|n| n.value).collect();
        values.sort_unstable();
        let before = values.len();
        values.dedup();
        assert_eq!(values.len(), before);

        // The shared node 10 carries edges from both predecessor chains.
        let ten = graph.find_by_value(10).unwrap();
        assert!(graph.has_edge_to_value(ten, 3), "edge from the run at 6");
        assert!(graph.has_edge_to_value(ten, 20), "edge from the run at 7");
        assert!(graph.has_edge_to_value(ten, 5), "edge down the shared tail");

        // And there is exactly one node for the terminal value 1.
        assert!(graph.find_by_value(1).is_some());
    }
}
