use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use vivi_schema::SeededRng;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 { pub x: f64, pub y: f64 }

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub fn new(x: f64, y: f64) -> Self { Vec2 { x, y } }
    pub fn from_angle(theta: f64) -> Self { Vec2 { x: theta.cos(), y: theta.sin() } }
    pub fn length_sq(self) -> f64 { self.x * self.x + self.y * self.y }
    pub fn length(self) -> f64 { self.length_sq().sqrt() }
    pub fn distance(self, other: Vec2) -> f64 { (self - other).length() }
    pub fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() }
}

impl Add for Vec2 { type Output = Vec2; fn add(self, o: Vec2) -> Vec2 { Vec2::new(self.x + o.x, self.y + o.y) } }
impl Sub for Vec2 { type Output = Vec2; fn sub(self, o: Vec2) -> Vec2 { Vec2::new(self.x - o.x, self.y - o.y) } }
impl Mul<f64> for Vec2 { type Output = Vec2; fn mul(self, k: f64) -> Vec2 { Vec2::new(self.x * k, self.y * k) } }
impl AddAssign for Vec2 { fn add_assign(&mut self, o: Vec2) { self.x += o.x; self.y += o.y; } }
impl SubAssign for Vec2 { fn sub_assign(&mut self, o: Vec2) { self.x -= o.x; self.y -= o.y; } }
impl MulAssign<f64> for Vec2 { fn mul_assign(&mut self, k: f64) { self.x *= k; self.y *= k; } }

/// Index of an activity node inside the current arena. Stable until the arena is swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode { pub position: Vec2, pub velocity: Vec2, pub radius: f64 }

/// Kinematic records for one activity list. Replaced wholesale when the list changes.
#[derive(Debug, Clone, Default)]
pub struct NodeArena { ids: Vec<String>, nodes: Vec<LayoutNode> }

impl NodeArena {
    /// Nodes at rest, scattered uniformly within `spread` of `center`.
    pub fn seeded(ids: Vec<String>, center: Vec2, spread: f64, radius: f64, rng: &mut SeededRng) -> Self {
        let spread = spread.abs();
        let nodes = ids
            .iter()
            .map(|_| {
                let offset = Vec2::new(rng.range(-spread, spread), rng.range(-spread, spread));
                LayoutNode { position: center + offset, velocity: Vec2::ZERO, radius }
            })
            .collect();
        NodeArena { ids, nodes }
    }

    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> { self.nodes.get(id.0) }
    pub fn id_of(&self, id: NodeId) -> Option<&str> { self.ids.get(id.0).map(String::as_str) }
    pub fn nodes(&self) -> &[LayoutNode] { &self.nodes }
    pub fn nodes_mut(&mut self) -> &mut [LayoutNode] { &mut self.nodes }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str, &LayoutNode)> {
        self.ids.iter().zip(&self.nodes).enumerate().map(|(i, (id, n))| (NodeId(i), id.as_str(), n))
    }
}

#[cfg(test)]
mod tests { use super::*;
    #[test] fn vector_ops() { let mut v = Vec2::new(3.0, 4.0); assert_eq!(v.length(), 5.0); v -= Vec2::new(1.0, 1.0); v *= 2.0; assert_eq!(v, Vec2::new(4.0, 6.0)); assert_eq!((v + Vec2::ZERO) * 0.5, Vec2::new(2.0, 3.0)); assert!(!Vec2::new(f64::NAN, 0.0).is_finite()); }
    #[test] fn seeded_arena_is_at_rest_near_center() {
        let mut rng = SeededRng::new(5);
        let arena = NodeArena::seeded(vec!["a".into(), "b".into(), "c".into()], Vec2::new(100.0, 50.0), 20.0, 14.0, &mut rng);
        assert_eq!(arena.len(), 3);
        for (i, (id, _, node)) in arena.iter().enumerate() {
            assert_eq!(id, NodeId(i));
            assert_eq!(node.velocity, Vec2::ZERO);
            assert!((node.position.x - 100.0).abs() <= 20.0 && (node.position.y - 50.0).abs() <= 20.0);
        }
        assert_eq!(arena.id_of(NodeId(2)), Some("c"));
        assert!(arena.get(NodeId(3)).is_none());
    }
}
