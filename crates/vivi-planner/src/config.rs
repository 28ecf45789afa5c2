use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use vivi_layout::LayoutConfig;
use vivi_schema::{GeoPoint, DEFAULT_CENTER, DEFAULT_JITTER_DEG};

const DEFAULT_ADDR: &str = "0.0.0.0:7443";
const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_SEED: u64 = 0x5eed_0f_71_71;

/// Startup settings, read once from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub addr: SocketAddr,
    /// How often the websocket session ticks its simulator.
    pub tick: Duration,
    pub seed: u64,
    pub default_center: GeoPoint,
    pub jitter_deg: f64,
    pub layout: LayoutConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            addr: SocketAddr::from(([0, 0, 0, 0], 7443)),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            seed: DEFAULT_SEED,
            default_center: DEFAULT_CENTER,
            jitter_deg: DEFAULT_JITTER_DEG,
            layout: LayoutConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|k| std::env::var(k).ok()) }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = get("VIVI_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into());
        let addr: SocketAddr = addr.parse().with_context(|| format!("VIVI_ADDR is not a socket address: {addr}"))?;
        let tick_ms = match get("VIVI_TICK_MS") {
            Some(v) => v.trim().parse::<u64>().with_context(|| format!("VIVI_TICK_MS is not an integer: {v}"))?.max(1),
            None => DEFAULT_TICK_MS,
        };
        let seed = match get("VIVI_SEED") {
            Some(v) => v.trim().parse::<u64>().with_context(|| format!("VIVI_SEED is not an integer: {v}"))?,
            None => DEFAULT_SEED,
        };
        let default_center = match get("VIVI_DEFAULT_CENTER") {
            Some(v) => parse_center(&v)?,
            None => DEFAULT_CENTER,
        };
        let jitter_deg = match get("VIVI_JITTER_DEG") {
            Some(v) => v.trim().parse::<f64>().ok().filter(|j| j.is_finite() && *j >= 0.0).ok_or_else(|| anyhow!("VIVI_JITTER_DEG must be a non-negative number: {v}"))?,
            None => DEFAULT_JITTER_DEG,
        };
        let layout = match get("VIVI_LAYOUT") {
            Some(v) => parse_layout(&v)?,
            None => LayoutConfig::default(),
        };
        Ok(PlannerConfig { addr, tick: Duration::from_millis(tick_ms), seed, default_center, jitter_deg, layout })
    }
}

/// Only a JSON object is accepted; serde would otherwise fill the struct from an array by position.
fn parse_layout(v: &str) -> Result<LayoutConfig> {
    let value: serde_json::Value = serde_json::from_str(v).context("VIVI_LAYOUT is not valid JSON")?;
    if !value.is_object() { return Err(anyhow!("VIVI_LAYOUT must be a JSON object: {v}")); }
    serde_json::from_value(value).context("VIVI_LAYOUT is not a layout config object")
}

fn parse_center(v: &str) -> Result<GeoPoint> {
    let (lat, lng) = v.split_once(',').ok_or_else(|| anyhow!("VIVI_DEFAULT_CENTER must look like \"lat,lng\": {v}"))?;
    let lat: f64 = lat.trim().parse().with_context(|| format!("bad latitude in VIVI_DEFAULT_CENTER: {v}"))?;
    let lng: f64 = lng.trim().parse().with_context(|| format!("bad longitude in VIVI_DEFAULT_CENTER: {v}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(anyhow!("VIVI_DEFAULT_CENTER out of range: {v}"));
    }
    Ok(GeoPoint { lat, lng })
}
