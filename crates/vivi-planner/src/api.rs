use serde::{Deserialize, Serialize};
use vivi_affinity::{build_profile_graph, rank_candidates};
use vivi_schema::{resolve_position, Activity, AffinityEdge, Candidate, GeoPoint, MatchBreakdown, Person, SeededRng};

use crate::config::PlannerConfig;

pub const DEFAULT_LIMIT: usize = 25;

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Pins the coordinate jitter for unlocated candidates.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Caps the response to the best `limit` candidates; zero means the default.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub breakdown: MatchBreakdown,
    pub position: GeoPoint,
    /// True when `position` was jittered around the default center.
    pub approximate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse { pub candidates: Vec<ScoredCandidate> }

#[derive(Debug, Clone, Deserialize)]
pub struct GraphRequest {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphResponse { pub edges: Vec<AffinityEdge> }

/// Ranks candidates for the group. Positions are drawn in input order so the
/// same seed places the same candidate identically regardless of its rank.
pub fn score_candidates(req: ScoreRequest, config: &PlannerConfig) -> ScoreResponse {
    let mut rng = SeededRng::new(req.seed.unwrap_or(config.seed));
    let positions: Vec<(GeoPoint, bool)> = req
        .candidates
        .iter()
        .map(|c| {
            let approximate = !matches!((c.lat, c.lng), (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite());
            (resolve_position(c.lat, c.lng, config.default_center, config.jitter_deg, &mut rng), approximate)
        })
        .collect();
    let candidates = rank_candidates(req.prompt.as_deref(), &req.people, req.candidates)
        .into_iter()
        .take(req.limit.filter(|&n| n > 0).unwrap_or(DEFAULT_LIMIT))
        .map(|r| {
            let (position, approximate) = positions[r.index];
            ScoredCandidate { candidate: r.candidate, breakdown: r.breakdown, position, approximate }
        })
        .collect();
    ScoreResponse { candidates }
}

pub fn graph(req: GraphRequest) -> GraphResponse { GraphResponse { edges: build_profile_graph(&req.people, &req.activities) } }
