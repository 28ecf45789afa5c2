use std::f64::consts::TAU;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vivi_schema::{AffinityEdge, FrameAnchor, FrameNode, LayoutFrame, NodeSetFingerprint, SeededRng};

use crate::arena::{LayoutNode, NodeArena, NodeId, Vec2};
use crate::config::LayoutConfig;

/// Floor for the repulsion softening term so a zero override cannot divide by zero.
const MIN_REPULSION_EPSILON: f64 = 1e-6;
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize { pub width: f64, pub height: f64 }

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        SurfaceSize { width: clean(width), height: clean(height) }
    }
    pub fn center(&self) -> Vec2 { Vec2::new(self.width / 2.0, self.height / 2.0) }
    pub fn min_side(&self) -> f64 { self.width.min(self.height) }
}

/// People become anchors, activities become simulated nodes, edges are springs between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutGraph {
    pub anchors: Vec<String>,
    pub activities: Vec<String>,
    pub edges: Vec<AffinityEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase { Detached, Running }

/// Owns all kinematic state for one drawing surface. Only `step`/`tick` move nodes;
/// pointer queries read positions and never write them.
#[derive(Debug)]
pub struct LayoutSimulator {
    config: LayoutConfig,
    seed: u64,
    phase: Phase,
    surface: SurfaceSize,
    graph: LayoutGraph,
    fingerprint: Option<NodeSetFingerprint>,
    arena: NodeArena,
    anchors: Vec<Vec2>,
    hovered: Option<NodeId>,
    pending: Duration,
    ticks: u64,
}

impl LayoutSimulator {
    pub fn new(config: LayoutConfig, seed: u64) -> Self {
        LayoutSimulator {
            config,
            seed,
            phase: Phase::Detached,
            surface: SurfaceSize::default(),
            graph: LayoutGraph::default(),
            fingerprint: None,
            arena: NodeArena::default(),
            anchors: Vec::new(),
            hovered: None,
            pending: Duration::ZERO,
            ticks: 0,
        }
    }

    pub fn phase(&self) -> Phase { self.phase }
    pub fn is_running(&self) -> bool { self.phase == Phase::Running }
    pub fn config(&self) -> &LayoutConfig { &self.config }
    pub fn ticks(&self) -> u64 { self.ticks }

    pub fn attach(&mut self, size: SurfaceSize) {
        self.phase = Phase::Running;
        self.on_resize(size);
        if self.fingerprint.is_none() { self.reseed(); }
        tracing::debug!(width = self.surface.width, height = self.surface.height, nodes = self.arena.len(), "layout attached");
    }

    /// Moves the anchor ring to the new surface. Activity nodes keep their
    /// positions and drift to the new center under the regular forces.
    pub fn on_resize(&mut self, size: SurfaceSize) {
        self.surface = size;
        self.place_anchors();
    }

    /// Replaces the graph. Returns true when the activity list changed identity
    /// and the arena was swapped.
    pub fn load(&mut self, graph: LayoutGraph) -> bool {
        let LayoutGraph { anchors, activities, edges } = graph;
        let edges = edges
            .into_iter()
            .filter(|e| e.person_index < anchors.len() && e.activity_index < activities.len() && e.weight.is_finite())
            .collect();
        let fingerprint = NodeSetFingerprint::of(&activities);
        let changed = self.fingerprint != Some(fingerprint);
        self.graph = LayoutGraph { anchors, activities, edges };
        self.place_anchors();
        if changed {
            self.fingerprint = None;
            if self.is_running() { self.reseed(); }
        }
        changed
    }

    pub fn detach(&mut self) {
        self.phase = Phase::Detached;
        self.arena = NodeArena::default();
        self.fingerprint = None;
        self.hovered = None;
        self.pending = Duration::ZERO;
        tracing::debug!(ticks = self.ticks, "layout detached");
    }

    /// Advances by however many fixed steps fit into `elapsed` plus leftover time
    /// from earlier calls, capped per call. Returns the number of steps run.
    pub fn tick(&mut self, elapsed: Duration) -> u32 {
        if !self.is_running() { return 0; }
        let step = self.config.step_duration();
        self.pending += elapsed;
        let mut steps = 0;
        while self.pending >= step && steps < self.config.max_steps_per_tick {
            self.pending -= step;
            self.step();
            steps += 1;
        }
        if self.pending >= step { self.pending = Duration::ZERO; }
        steps
    }

    /// One fixed integration step: repulsion, springs, centering, then damped symplectic Euler.
    pub fn step(&mut self) {
        if !self.is_running() || self.arena.is_empty() { return; }
        let cfg = &self.config;
        let center = self.surface.center();
        let epsilon = cfg.repulsion_epsilon.max(MIN_REPULSION_EPSILON);
        let nodes = self.arena.nodes_mut();

        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let delta = nodes[i].position - nodes[j].position;
                let dist_sq = delta.length_sq();
                let dir = if dist_sq > f64::EPSILON { delta * (1.0 / dist_sq.sqrt()) } else { separation(i, j) };
                let push = dir * (cfg.repulsion / (dist_sq + epsilon));
                nodes[i].velocity += push;
                nodes[j].velocity -= push;
            }
        }

        for e in &self.graph.edges {
            let (Some(anchor), Some(node)) = (self.anchors.get(e.person_index), nodes.get_mut(e.activity_index)) else { continue };
            node.velocity += (*anchor - node.position) * (cfg.spring * e.weight);
        }

        for node in nodes.iter_mut() {
            node.velocity += (center - node.position) * cfg.centering;
            node.velocity *= cfg.damping;
            node.position += node.velocity;
        }
        self.ticks += 1;
    }

    /// Nearest node within the hit radius of `pointer`, ties going to the lower id.
    pub fn hit_test(&self, pointer: Vec2) -> Option<NodeId> {
        if !self.is_running() || !pointer.is_finite() { return None; }
        let radius = self.config.hit_radius;
        self.arena
            .iter()
            .map(|(id, _, node)| (id, node.position.distance(pointer)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn hit_test_id(&self, pointer: Vec2) -> Option<&str> { self.hit_test(pointer).and_then(|id| self.arena.id_of(id)) }

    /// Records what the pointer is over and returns its logical id.
    pub fn pointer_move(&mut self, pointer: Vec2) -> Option<&str> {
        self.hovered = self.hit_test(pointer);
        self.hovered_id()
    }

    pub fn hovered_id(&self) -> Option<&str> { self.hovered.and_then(|id| self.arena.id_of(id)) }

    /// The logical id to dispatch for a click, if the pointer is over a node.
    pub fn click(&self) -> Option<String> { self.hovered_id().map(str::to_owned) }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &str, &LayoutNode)> { self.arena.iter() }

    pub fn anchors(&self) -> impl Iterator<Item = (&str, Vec2)> {
        self.graph.anchors.iter().map(String::as_str).zip(self.anchors.iter().copied())
    }

    pub fn snapshot(&self) -> LayoutFrame {
        LayoutFrame {
            tick: self.ticks,
            nodes: self.nodes().map(|(_, id, n)| FrameNode { id: id.to_owned(), x: n.position.x, y: n.position.y, radius: n.radius }).collect(),
            anchors: self.anchors().map(|(id, p)| FrameAnchor { id: id.to_owned(), x: p.x, y: p.y }).collect(),
            edges: if self.arena.is_empty() { Vec::new() } else { self.graph.edges.clone() },
            hovered: self.hovered_id().map(str::to_owned),
        }
    }

    fn place_anchors(&mut self) {
        let n = self.graph.anchors.len();
        let center = self.surface.center();
        let ring = self.surface.min_side() * self.config.ring_fraction;
        self.anchors = (0..n).map(|i| center + Vec2::from_angle(TAU * i as f64 / n as f64 - TAU / 4.0) * ring).collect();
    }

    fn reseed(&mut self) {
        let fingerprint = NodeSetFingerprint::of(&self.graph.activities);
        let mut rng = SeededRng::new(self.seed ^ fingerprint.seed_bits());
        self.arena = NodeArena::seeded(self.graph.activities.clone(), self.surface.center(), self.config.initial_spread, self.config.node_radius, &mut rng);
        self.fingerprint = Some(fingerprint);
        self.hovered = None;
        tracing::debug!(nodes = self.arena.len(), fingerprint = %fingerprint.to_hex(), "layout arena reseeded");
    }
}

/// Deterministic push direction for two nodes sitting on the same point.
fn separation(i: usize, j: usize) -> Vec2 { Vec2::from_angle(GOLDEN_ANGLE * (i * 31 + j) as f64) }
