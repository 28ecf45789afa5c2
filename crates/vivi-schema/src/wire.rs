use serde::{Deserialize, Serialize};

use crate::{Activity, AffinityEdge, Person};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameNode { pub id: String, pub x: f64, pub y: f64, pub radius: f64 }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnchor { pub id: String, pub x: f64, pub y: f64 }

/// Everything a renderer needs for one redraw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutFrame {
    pub tick: u64,
    pub nodes: Vec<FrameNode>,
    pub anchors: Vec<FrameAnchor>,
    pub edges: Vec<AffinityEdge>,
    pub hovered: Option<String>,
}

/// Messages a layout client sends over the websocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Attach { width: f64, height: f64 },
    Resize { width: f64, height: f64 },
    Graph {
        #[serde(default)]
        people: Vec<Person>,
        #[serde(default)]
        activities: Vec<Activity>,
    },
    PointerMove { x: f64, y: f64 },
    Click,
    Detach,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Frame(LayoutFrame),
    Hover { id: Option<String> },
    Selected { id: String },
    Error { reason: String },
}

#[cfg(test)]
mod tests { use super::*;
    #[test] fn client_messages_parse_by_tag() {
        let m: ClientMessage = serde_json::from_str(r#"{"type":"pointer_move","x":10.5,"y":-2}"#).unwrap();
        assert_eq!(m, ClientMessage::PointerMove { x: 10.5, y: -2.0 });
        let m: ClientMessage = serde_json::from_str(r#"{"type":"click"}"#).unwrap();
        assert_eq!(m, ClientMessage::Click);
        let m: ClientMessage = serde_json::from_str(r#"{"type":"graph","people":[{"id":"u1","likes":"jazz"}]}"#).unwrap();
        match m { ClientMessage::Graph { people, activities } => { assert_eq!(people[0].likes.as_deref(), Some("jazz")); assert!(activities.is_empty()); } other => panic!("unexpected {:?}", other) }
    }
    #[test] fn unknown_or_incomplete_messages_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"teleport"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"attach","width":10}"#).is_err());
    }
    #[test] fn frame_serializes_flat_with_tag() {
        let msg = ServerMessage::Frame(LayoutFrame { tick: 3, nodes: vec![FrameNode { id:"a".into(), x:1.0, y:2.0, radius:14.0 }], ..Default::default() });
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "frame");
        assert_eq!(v["tick"], 3);
        assert_eq!(v["nodes"][0]["id"], "a");
        let back: ServerMessage = serde_json::from_value(v).unwrap();
        assert_eq!(back, msg);
    }
}
