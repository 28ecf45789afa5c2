use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Force constants and interaction geometry. Every field has a default, so a
/// partial JSON object is a valid override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Numerator of the inverse-square repulsion between activity nodes.
    pub repulsion: f64,
    /// Added to the squared distance so coincident nodes stay finite.
    pub repulsion_epsilon: f64,
    pub spring: f64,
    /// Weak pull toward the surface center. Kept below the critical value for
    /// `damping` so a lone node settles without overshooting.
    pub centering: f64,
    pub damping: f64,
    pub node_radius: f64,
    /// Pointer distance in pixels within which a node counts as hovered.
    pub hit_radius: f64,
    /// Anchor ring radius as a fraction of the smaller surface dimension.
    pub ring_fraction: f64,
    /// Half-width of the square new nodes are scattered over.
    pub initial_spread: f64,
    pub step_ms: u64,
    pub max_steps_per_tick: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            repulsion: 1200.0,
            repulsion_epsilon: 50.0,
            spring: 0.002,
            centering: 0.00005,
            damping: 0.985,
            node_radius: 14.0,
            hit_radius: 24.0,
            ring_fraction: 0.38,
            initial_spread: 60.0,
            step_ms: 16,
            max_steps_per_tick: 8,
        }
    }
}

impl LayoutConfig {
    pub fn step_duration(&self) -> Duration { Duration::from_millis(self.step_ms.max(1)) }
}

#[cfg(test)]
mod tests { use super::*;
    #[test] fn partial_override_keeps_defaults() { let c: LayoutConfig = serde_json::from_str(r#"{"spring":0.01,"hit_radius":30}"#).unwrap(); assert_eq!(c.spring, 0.01); assert_eq!(c.hit_radius, 30.0); assert_eq!(c.damping, 0.985); }
    #[test] fn default_centering_is_overdamped() { let c = LayoutConfig::default(); let d = c.damping; assert!(d * c.centering <= (1.0 - d.sqrt()).powi(2)); }
    #[test] fn zero_step_is_clamped() { let c = LayoutConfig { step_ms: 0, ..Default::default() }; assert_eq!(c.step_duration(), Duration::from_millis(1)); }
}
