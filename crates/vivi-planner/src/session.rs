use std::time::Duration;

use metrics::{counter, histogram};
use vivi_affinity::build_profile_graph;
use vivi_layout::{LayoutConfig, LayoutGraph, LayoutSimulator, SurfaceSize, Vec2};
use vivi_schema::{ClientMessage, ServerMessage};

/// One websocket client's view of the layout. The socket task is the only
/// caller, so the simulator has exactly one writer.
pub struct LayoutSession {
    sim: LayoutSimulator,
    last_hover: Option<String>,
    closed: bool,
}

impl LayoutSession {
    pub fn new(config: LayoutConfig, seed: u64) -> Self { LayoutSession { sim: LayoutSimulator::new(config, seed), last_hover: None, closed: false } }

    pub fn is_closed(&self) -> bool { self.closed }

    pub fn handle_text(&mut self, txt: &str) -> Vec<ServerMessage> {
        match serde_json::from_str::<ClientMessage>(txt) {
            Ok(msg) => self.handle(msg),
            Err(e) => {
                tracing::debug!(error = %e, "invalid client message");
                vec![ServerMessage::Error { reason: "invalid_message".into() }]
            }
        }
    }

    pub fn handle(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        if self.closed { return Vec::new(); }
        match msg {
            ClientMessage::Attach { width, height } => {
                self.sim.attach(SurfaceSize::new(width, height));
                vec![self.frame()]
            }
            ClientMessage::Resize { width, height } => {
                self.sim.on_resize(SurfaceSize::new(width, height));
                Vec::new()
            }
            ClientMessage::Graph { people, activities } => {
                let edges = build_profile_graph(&people, &activities);
                histogram!("vivi_layout_graph_edges").record(edges.len() as f64);
                let graph = LayoutGraph {
                    anchors: people.iter().map(|p| p.id.clone()).collect(),
                    activities: activities.iter().map(|a| a.id.clone()).collect(),
                    edges,
                };
                let reseeded = self.sim.load(graph);
                tracing::debug!(people = people.len(), activities = activities.len(), reseeded, "layout graph loaded");
                let mut out = self.hover_change();
                if self.sim.is_running() { out.push(self.frame()); }
                out
            }
            ClientMessage::PointerMove { x, y } => {
                self.sim.pointer_move(Vec2::new(x, y));
                self.hover_change()
            }
            ClientMessage::Click => match self.sim.click() {
                Some(id) => {
                    counter!("vivi_layout_selections_total").increment(1);
                    vec![ServerMessage::Selected { id }]
                }
                None => Vec::new(),
            },
            ClientMessage::Detach => {
                self.close();
                Vec::new()
            }
        }
    }

    /// Advances the simulation; yields a frame only when at least one step ran.
    pub fn on_tick(&mut self, elapsed: Duration) -> Option<ServerMessage> {
        if self.closed || self.sim.tick(elapsed) == 0 { return None; }
        Some(self.frame())
    }

    pub fn close(&mut self) {
        if self.closed { return; }
        self.sim.detach();
        self.closed = true;
    }

    fn frame(&self) -> ServerMessage { ServerMessage::Frame(self.sim.snapshot()) }

    fn hover_change(&mut self) -> Vec<ServerMessage> {
        let now = self.sim.hovered_id().map(str::to_owned);
        if now == self.last_hover { return Vec::new(); }
        self.last_hover = now.clone();
        vec![ServerMessage::Hover { id: now }]
    }
}

#[cfg(test)]
mod tests { use super::*; use vivi_schema::{Activity, LayoutFrame, Person};
    fn graph_msg() -> ClientMessage {
        ClientMessage::Graph {
            people: vec![Person { id: "ana".into(), likes: Some("live music, arcade".into()), ..Default::default() }],
            activities: vec![
                Activity { id: "neon".into(), title: "Neon Arcade".into(), vibe: Some("music".into()), reasons: vec!["live sets".into()] },
                Activity { id: "pottery".into(), title: "Pottery Studio".into(), ..Default::default() },
            ],
        }
    }
    fn frame_of(msgs: &[ServerMessage]) -> LayoutFrame { msgs.iter().find_map(|m| match m { ServerMessage::Frame(f) => Some(f.clone()), _ => None }).expect("frame") }
    fn attached() -> LayoutSession { let mut s = LayoutSession::new(LayoutConfig::default(), 3); s.handle(graph_msg()); s.handle(ClientMessage::Attach { width: 800.0, height: 600.0 }); s }

    #[test] fn graph_before_attach_renders_on_attach() {
        let mut s = LayoutSession::new(LayoutConfig::default(), 3);
        assert!(s.handle(graph_msg()).is_empty());
        assert!(s.on_tick(Duration::from_millis(100)).is_none());
        let f = frame_of(&s.handle(ClientMessage::Attach { width: 800.0, height: 600.0 }));
        assert_eq!(f.nodes.len(), 2);
        assert_eq!(f.anchors.len(), 1);
        assert_eq!(f.edges.len(), 1);
        assert_eq!(f.edges[0].activity_index, 0);
    }
    #[test] fn ticks_emit_frames_while_running() {
        let mut s = attached();
        assert!(s.on_tick(Duration::from_millis(5)).is_none());
        match s.on_tick(Duration::from_millis(20)) { Some(ServerMessage::Frame(f)) => assert_eq!(f.tick, 1), other => panic!("unexpected {:?}", other) }
    }
    #[test] fn hover_is_reported_on_change_only() {
        let mut s = attached();
        let (x, y) = { let f = s.sim.snapshot(); (f.nodes[0].x, f.nodes[0].y) };
        let out = s.handle(ClientMessage::PointerMove { x, y });
        assert!(matches!(out.as_slice(), [ServerMessage::Hover { id: Some(_) }]));
        assert!(s.handle(ClientMessage::PointerMove { x, y }).is_empty());
        assert!(matches!(s.handle(ClientMessage::Click).as_slice(), [ServerMessage::Selected { .. }]));
        let out = s.handle(ClientMessage::PointerMove { x: -500.0, y: -500.0 });
        assert_eq!(out, vec![ServerMessage::Hover { id: None }]);
        assert!(s.handle(ClientMessage::Click).is_empty());
    }
    #[test] fn bad_json_is_reported_not_fatal() {
        let mut s = attached();
        assert_eq!(s.handle_text("{not json"), vec![ServerMessage::Error { reason: "invalid_message".into() }]);
        assert!(!s.is_closed());
        assert!(s.handle_text(r#"{"type":"resize","width":1024,"height":768}"#).is_empty());
    }
    #[test] fn detach_stops_ticks_and_ignores_later_messages() {
        let mut s = attached();
        assert!(s.handle(ClientMessage::Detach).is_empty());
        assert!(s.is_closed());
        assert!(s.on_tick(Duration::from_secs(1)).is_none());
        assert!(s.handle(ClientMessage::Attach { width: 10.0, height: 10.0 }).is_empty());
    }
}
