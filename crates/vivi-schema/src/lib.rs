use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

mod geo;
mod rng;
mod wire;

pub use geo::{resolve_position, GeoPoint, DEFAULT_CENTER, DEFAULT_JITTER_DEG};
pub use rng::SeededRng;
pub use wire::{ClientMessage, FrameAnchor, FrameNode, LayoutFrame, ServerMessage};

/// A venue or event as supplied by an external provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub vibe: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    /// Extra search terms attached by the provider or an upstream planner.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Candidate {
    /// Displayable attributes in the order they are concatenated into a haystack.
    pub fn display_fields(&self) -> Vec<&str> {
        let mut out = vec![self.title.as_str()];
        for f in [&self.summary, &self.address, &self.price, &self.vibe] {
            if let Some(s) = f.as_deref() { out.push(s); }
        }
        out.extend(self.tags.iter().map(String::as_str));
        out.extend(self.keywords.iter().map(String::as_str));
        out
    }
}

/// One member of the group with free-text preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub likes: Option<String>,
    #[serde(default)]
    pub hobbies: Option<String>,
}

impl Person {
    /// Blank or missing likes mean the person sits out of group scoring.
    pub fn stated_likes(&self) -> Option<&str> {
        self.likes.as_deref().filter(|s| !s.trim().is_empty())
    }
    pub fn display_name(&self) -> &str { self.name.as_deref().unwrap_or(&self.id) }
    pub fn profile_text(&self) -> String {
        [self.likes.as_deref(), self.hobbies.as_deref()].into_iter().flatten().collect::<Vec<_>>().join(" ")
    }
}

/// A suggested activity as shown in the affinity graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub vibe: Option<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl Activity {
    pub fn descriptor_text(&self) -> String {
        let mut parts = vec![self.title.as_str()];
        if let Some(v) = self.vibe.as_deref() { parts.push(v); }
        parts.extend(self.reasons.iter().map(String::as_str));
        parts.join(" ")
    }
}

/// The `{id, text}` pair the graph builder consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEntity { pub id: String, pub text: String }

impl From<&Person> for GraphEntity {
    fn from(p: &Person) -> Self { GraphEntity { id: p.id.clone(), text: p.profile_text() } }
}
impl From<&Activity> for GraphEntity {
    fn from(a: &Activity) -> Self { GraphEntity { id: a.id.clone(), text: a.descriptor_text() } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonScore { pub person_id: String, pub name: String, pub score: f64 }

/// Group fit of one candidate. `overall` is the mean of `prompt` and every entry of `per_person`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown { pub overall: f64, pub prompt: f64, pub per_person: Vec<PersonScore> }

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffinityEdge {
    pub person_index: usize,
    pub activity_index: usize,
    /// Amplified, clamped weight used as the spring multiplier.
    pub weight: f64,
    /// Raw Jaccard coefficient the edge was admitted on.
    pub similarity: f64,
}

/// Identity of an ordered node set. Two activity lists with the same ids in the
/// same order share a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeSetFingerprint([u8; 32]);

impl NodeSetFingerprint {
    pub fn of<S: AsRef<str>>(ids: &[S]) -> Self {
        let mut hasher = Sha256::new();
        for id in ids {
            let id = id.as_ref().as_bytes();
            hasher.update((id.len() as u64).to_le_bytes());
            hasher.update(id);
        }
        NodeSetFingerprint(hasher.finalize().into())
    }
    /// First eight bytes, for mixing into a PRNG seed.
    pub fn seed_bits(&self) -> u64 {
        let mut b = [0u8; 8];
        b.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(b)
    }
    pub fn to_hex(&self) -> String { self.0.iter().map(|b| format!("{:02x}", b)).collect() }
}
