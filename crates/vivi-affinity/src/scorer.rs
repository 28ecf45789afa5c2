use serde::Serialize;
use vivi_schema::{Candidate, MatchBreakdown, Person, PersonScore};

use crate::haystack::Haystack;
use crate::text::{fragments, tokenize};

/// Returned when a phrase was evaluated but shared nothing with the haystack,
/// so "considered, no overlap" stays distinguishable from "nothing to compare".
pub const NO_OVERLAP_FLOOR: f64 = 0.05;

/// Fraction of each fragment's tokens found in the haystack, averaged over
/// fragments that produced at least one token.
pub fn match_score(phrase: Option<&str>, haystack: &Haystack) -> f64 {
    let Some(phrase) = phrase else { return 0.0 };
    let mut total = 0.0;
    let mut evaluated = 0usize;
    for fragment in fragments(phrase) {
        let tokens = tokenize(Some(fragment));
        if tokens.is_empty() { continue; }
        let matched = tokens.iter().filter(|t| haystack.matches(t)).count();
        total += matched as f64 / tokens.len() as f64;
        evaluated += 1;
    }
    if evaluated == 0 { return 0.0; }
    let avg = total / evaluated as f64;
    if avg == 0.0 { NO_OVERLAP_FLOOR } else { avg.clamp(0.0, 1.0) }
}

pub fn score(phrase: Option<&str>, corpus: Option<&str>) -> f64 {
    match corpus {
        Some(corpus) => match_score(phrase, &Haystack::new(Some(corpus))),
        None => 0.0,
    }
}

pub fn aggregate(prompt: f64, per_person: &[f64]) -> f64 {
    if per_person.is_empty() { return prompt; }
    (prompt + per_person.iter().sum::<f64>()) / (per_person.len() + 1) as f64
}

/// People without stated likes are left out entirely rather than scored as zero.
pub fn breakdown(prompt: Option<&str>, people: &[Person], haystack: &Haystack) -> MatchBreakdown {
    let prompt_score = match_score(prompt, haystack);
    let per_person: Vec<PersonScore> = people
        .iter()
        .filter_map(|p| {
            let likes = p.stated_likes()?;
            Some(PersonScore { person_id: p.id.clone(), name: p.display_name().to_owned(), score: match_score(Some(likes), haystack) })
        })
        .collect();
    let scores: Vec<f64> = per_person.iter().map(|s| s.score).collect();
    MatchBreakdown { overall: aggregate(prompt_score, &scores), prompt: prompt_score, per_person }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    /// Position in the caller's input list.
    pub index: usize,
    pub candidate: Candidate,
    pub breakdown: MatchBreakdown,
}

/// Best group fit first; equal scores keep their input order.
pub fn rank_candidates(prompt: Option<&str>, people: &[Person], candidates: Vec<Candidate>) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            let breakdown = breakdown(prompt, people, &Haystack::from_candidate(&candidate));
            RankedCandidate { index, candidate, breakdown }
        })
        .collect();
    ranked.sort_by(|a, b| b.breakdown.overall.total_cmp(&a.breakdown.overall));
    tracing::debug!(candidates = ranked.len(), people = people.len(), "ranked candidates");
    ranked
}
