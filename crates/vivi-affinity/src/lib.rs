//! Lexical affinity between free-text preferences and candidate descriptions.
//!
//! Everything here is pure: the same text always yields the same tokens,
//! scores and edges, and absent input degrades to a score of zero.

mod graph;
mod haystack;
mod scorer;
mod text;

pub use graph::{build_graph, build_profile_graph, jaccard, AMPLIFICATION, RELEVANCE_THRESHOLD};
pub use haystack::Haystack;
pub use scorer::{aggregate, breakdown, match_score, rank_candidates, score, RankedCandidate, NO_OVERLAP_FLOOR};
pub use text::{fragments, stem, tokenize, TokenSet};
