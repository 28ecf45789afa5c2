use vivi_schema::Candidate;

use crate::text::{stem, tokenize, TokenSet};

/// Searchable form of one candidate: lowercase raw text for substring hits plus its token set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Haystack { raw: String, tokens: TokenSet }

impl Haystack {
    pub fn new(text: Option<&str>) -> Self {
        let raw = text.unwrap_or_default().to_lowercase();
        let tokens = tokenize(Some(&raw));
        Haystack { raw, tokens }
    }

    pub fn from_parts<'a, I: IntoIterator<Item = &'a str>>(parts: I) -> Self {
        let joined = parts.into_iter().collect::<Vec<_>>().join(" ");
        Haystack::new(Some(&joined))
    }

    pub fn from_candidate(candidate: &Candidate) -> Self { Haystack::from_parts(candidate.display_fields()) }

    pub fn raw(&self) -> &str { &self.raw }
    pub fn tokens(&self) -> &TokenSet { &self.tokens }
    pub fn is_empty(&self) -> bool { self.raw.trim().is_empty() }

    /// A token matches on an exact token, a raw substring, or either of those for its stem.
    pub fn matches(&self, token: &str) -> bool {
        self.contains(token) || stem(token).is_some_and(|s| self.contains(&s))
    }

    fn contains(&self, token: &str) -> bool { self.tokens.contains(token) || self.raw.contains(token) }
}

#[cfg(test)]
mod tests { use super::*;
    #[test] fn candidate_fields_are_all_searchable() {
        let c = Candidate { id:"gp-aeronaut".into(), title:"Aeronaut Brewing Co.".into(), summary:Some("Taproom with trivia".into()), tags: vec!["live music".into()], keywords: vec!["Somerville".into()], ..Default::default() };
        let h = Haystack::from_candidate(&c);
        for t in ["aeronaut", "taproom", "trivia", "music", "somerville"] { assert!(h.matches(t), "{t}"); }
        assert!(!h.matches("karaoke"));
    }
    #[test] fn substring_and_stem_fallbacks() {
        let h = Haystack::new(Some("Salsa dance night at the boathouse"));
        assert!(h.matches("boat"));
        assert!(h.matches("dancing"));
        assert!(!h.matches("dinner"));
    }
    #[test] fn absent_text_is_empty() { let h = Haystack::new(None); assert!(h.is_empty()); assert!(h.tokens().is_empty()); assert!(!h.matches("anything")); }
    #[test] fn rebuilding_is_idempotent() { let a = Haystack::new(Some("Neon Arcade")); assert_eq!(a, Haystack::new(Some("Neon Arcade"))); assert_eq!(a.raw(), "neon arcade"); }
}
