use vivi_schema::{Activity, AffinityEdge, GraphEntity, Person};

use crate::text::{tokenize, TokenSet};

/// Raw Jaccard must exceed this for an edge to exist.
pub const RELEVANCE_THRESHOLD: f64 = 0.12;
/// Surviving coefficients are multiplied by this, then clamped to 1.
pub const AMPLIFICATION: f64 = 1.8;

/// `|a ∩ b| / |a ∪ b|`, with an empty union counted as 1.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count().max(1);
    intersection as f64 / union as f64
}

/// One edge per (person, activity) pair whose token overlap clears the threshold,
/// in person-major order.
pub fn build_graph(people: &[GraphEntity], activities: &[GraphEntity]) -> Vec<AffinityEdge> {
    let person_tokens: Vec<TokenSet> = people.iter().map(|p| tokenize(Some(&p.text))).collect();
    let activity_tokens: Vec<TokenSet> = activities.iter().map(|a| tokenize(Some(&a.text))).collect();
    let mut edges = Vec::new();
    for (person_index, pt) in person_tokens.iter().enumerate() {
        for (activity_index, at) in activity_tokens.iter().enumerate() {
            let similarity = jaccard(pt, at);
            if similarity > RELEVANCE_THRESHOLD {
                edges.push(AffinityEdge { person_index, activity_index, weight: (similarity * AMPLIFICATION).min(1.0), similarity });
            }
        }
    }
    tracing::debug!(people = people.len(), activities = activities.len(), edges = edges.len(), "affinity graph built");
    edges
}

pub fn build_profile_graph(people: &[Person], activities: &[Activity]) -> Vec<AffinityEdge> {
    let people: Vec<GraphEntity> = people.iter().map(GraphEntity::from).collect();
    let activities: Vec<GraphEntity> = activities.iter().map(GraphEntity::from).collect();
    build_graph(&people, &activities)
}

#[cfg(test)]
mod tests { use super::*;
    fn set(words: &[&str]) -> TokenSet { words.iter().map(|w| w.to_string()).collect() }
    fn entity(id: &str, text: &str) -> GraphEntity { GraphEntity { id: id.into(), text: text.into() } }
    #[test] fn identical_sets_are_fully_similar() { let a = set(&["music", "arcade"]); assert_eq!(jaccard(&a, &a.clone()), 1.0); }
    #[test] fn empty_sets_do_not_divide_by_zero() { assert_eq!(jaccard(&TokenSet::new(), &TokenSet::new()), 0.0); assert_eq!(jaccard(&set(&["music"]), &TokenSet::new()), 0.0); }
    #[test] fn partial_overlap_coefficient() { let j = jaccard(&set(&["music", "arcade"]), &set(&["music", "dj"])); assert!((j - 1.0 / 3.0).abs() < 1e-12); assert!(j > RELEVANCE_THRESHOLD); assert!(((j * AMPLIFICATION).min(1.0) - 0.6).abs() < 1e-9); }
    #[test] fn edges_above_threshold_are_amplified() {
        let edges = build_graph(&[entity("ana", "music arcade")], &[entity("a1", "music karaoke"), entity("a2", "pottery class")]);
        assert_eq!(edges.len(), 1);
        let e = edges[0];
        assert_eq!((e.person_index, e.activity_index), (0, 0));
        assert!((e.similarity - 1.0 / 3.0).abs() < 1e-12);
        assert!((e.weight - 0.6).abs() < 1e-9);
    }
    #[test] fn strong_overlap_clamps_to_one() { let edges = build_graph(&[entity("ana", "jazz club")], &[entity("a1", "Jazz Club!")]); assert_eq!(edges[0].weight, 1.0); assert_eq!(edges[0].similarity, 1.0); }
    #[test] fn weak_overlap_is_dropped() {
        // 1 shared token out of 9 distinct: 0.111 < 0.12
        let edges = build_graph(&[entity("ana", "music alpha bravo charlie delta")], &[entity("a1", "music echo foxtrot golf hotel")]);
        assert!(edges.is_empty());
    }
    #[test] fn empty_inputs_give_no_edges() { assert!(build_graph(&[], &[entity("a1", "music")]).is_empty()); assert!(build_graph(&[entity("ana", "")], &[entity("a1", "")]).is_empty()); }
    #[test] fn edges_are_person_major() {
        let people = [entity("ana", "music"), entity("ben", "music")];
        let acts = [entity("a1", "music"), entity("a2", "music")];
        let order: Vec<_> = build_graph(&people, &acts).iter().map(|e| (e.person_index, e.activity_index)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
    #[test] fn profiles_combine_likes_hobbies_and_descriptors() {
        let people = [Person { id: "ana".into(), likes: Some("live music".into()), hobbies: Some("arcade".into()), ..Default::default() }];
        let acts = [Activity { id: "a1".into(), title: "Neon Arcade".into(), vibe: Some("music".into()), reasons: vec!["live sets".into()] }];
        let edges = build_profile_graph(&people, &acts);
        assert_eq!(edges.len(), 1);
        // {live, music, arcade} vs {neon, arcade, music, live, sets}: 3/5
        assert!((edges[0].similarity - 0.6).abs() < 1e-12);
        assert_eq!(edges[0].weight, 1.0);
    }
}
