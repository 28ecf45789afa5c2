use std::collections::BTreeSet;

/// Lowercase alphanumeric tokens of one text field. Ordered so re-joining is stable.
pub type TokenSet = BTreeSet<String>;

/// Tokens this short carry no signal ("a", "of", "dj").
const MIN_TOKEN_LEN: usize = 3;
/// Stems are only tried on tokens longer than this.
const MIN_STEM_LEN: usize = 5;

/// Suffix rewrites tried in order; the first suffix that matches wins.
const STEM_RULES: &[(&str, &str)] = &[("ing", ""), ("ers", ""), ("er", ""), ("ies", "y"), ("s", "")];

fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() { c } else { ' ' })
        .collect()
}

pub fn tokenize(text: Option<&str>) -> TokenSet {
    let Some(text) = text else { return TokenSet::new() };
    normalize(text)
        .split_whitespace()
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .map(str::to_owned)
        .collect()
}

/// Splits free text into clauses on commas, semicolons and newlines, dropping blank ones.
pub fn fragments(phrase: &str) -> impl Iterator<Item = &str> {
    phrase.split([',', ';', '\n']).map(str::trim).filter(|f| !f.is_empty())
}

/// One alternate spelling used to widen a match. Never replaces the token itself.
pub fn stem(token: &str) -> Option<String> {
    if token.len() < MIN_STEM_LEN { return None; }
    let (base, replacement) = STEM_RULES.iter().find_map(|(suffix, rep)| token.strip_suffix(suffix).map(|b| (b, *rep)))?;
    if base.is_empty() { return None; }
    let stemmed = format!("{}{}", base, replacement);
    (stemmed != token).then_some(stemmed)
}
