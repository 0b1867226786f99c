//! Core data model: catalog entities, interaction events, similarity
//! scores, and recommendation candidates/results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Venue category used for exact-match type similarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueType {
    Arena,
    Stadium,
    Theater,
    Club,
    Amphitheater,
    FestivalGround,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcertStatus {
    Scheduled,
    OnSale,
    SoldOut,
    Cancelled,
    Completed,
}

/// Performing artist with genre and popularity attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    /// Normalized genre tags: lowercased, trimmed, empties dropped
    pub genres: HashSet<String>,
    /// Popularity on a 0-100 scale, clamped at construction
    pub popularity: f64,
}

impl Artist {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        genres: impl IntoIterator<Item = impl AsRef<str>>,
        popularity: f64,
    ) -> Self {
        let genres = genres
            .into_iter()
            .map(|g| g.as_ref().trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect();

        Self {
            id: id.into(),
            name: name.into(),
            genres,
            popularity: popularity.clamp(0.0, 100.0),
        }
    }
}

/// Concert venue with location, capacity, and type attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: u32,
    pub venue_type: VenueType,
}

/// Concert linking an artist to a venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concert {
    pub id: String,
    pub artist_id: String,
    pub venue_id: String,
    pub status: ConcertStatus,
}

/// Any entity the content catalog can hold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogEntity {
    Artist(Artist),
    Venue(Venue),
    Concert(Concert),
}

/// A single user-item behavioral signal from the upstream ingestion layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub user_id: String,
    pub item_id: String,
    /// Aggregated interaction strength in [0, 1]
    pub strength: f64,
    pub timestamp: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn new(
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        strength: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            strength,
            timestamp,
        }
    }
}

/// How a similarity score was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// Sparse cosine over interaction vectors
    Cosine,
    /// Genre Jaccard + popularity blend
    ArtistContent,
    /// Location + capacity + type blend
    VenueContent,
}

/// Pairwise similarity between two entities. Self-pairs are never produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub id_a: String,
    pub id_b: String,
    pub similarity: f64,
    pub method: SimilarityMethod,
}

/// What kind of entity an id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Artist,
    Venue,
    Concert,
}

/// Recommendation strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    CollaborativeUser,
    CollaborativeItem,
    ContentArtist,
    ContentVenue,
    ContentHybrid,
    HybridAll,
}

/// Structured reason code attached to each candidate.
///
/// Rendering these into user-facing text is the presentation layer's job;
/// the core only records which signal produced the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Reason {
    /// Scored from behaviorally similar users
    SimilarUsers { neighbors: usize },
    /// Scored from items similar to the subject's known items
    SimilarItems { anchors: usize },
    /// Concert by an artist similar to a preferred artist
    SimilarArtist { artist_id: String, similarity: f64 },
    /// Concert at a venue similar to a preferred venue
    SimilarVenue { venue_id: String, similarity: f64 },
    /// Matched through both artist and venue preferences
    ContentBlend {
        artist_score: f64,
        venue_score: f64,
    },
    /// Merged from collaborative and content sources
    Hybrid,
}

/// One scored, ranked recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationCandidate {
    pub item_id: String,
    pub item_type: EntityKind,
    pub score: f64,
    /// Evidence-based confidence in [0, 1]
    pub confidence: f64,
    pub reason: Reason,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Ranked recommendation list for one subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub subject_id: String,
    /// Sorted by score descending, ties broken by item id ascending
    pub recommendations: Vec<RecommendationCandidate>,
    pub algorithm: Strategy,
    pub total_candidates_considered: usize,
}

impl RecommendationResult {
    /// Valid "no recommendation" outcome for unknown or failing subjects
    pub fn empty(subject_id: impl Into<String>, algorithm: Strategy) -> Self {
        Self {
            subject_id: subject_id.into(),
            recommendations: Vec::new(),
            algorithm,
            total_candidates_considered: 0,
        }
    }
}

/// Per-subject preference hints consumed by the content strategies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub venues: Vec<String>,
    /// Concert ids to exclude from content recommendations
    #[serde(default)]
    pub exclude: HashSet<String>,
}

impl Preferences {
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.venues.is_empty()
    }
}

/// Interaction matrix health metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixStatistics {
    pub user_count: usize,
    pub item_count: usize,
    pub interaction_count: usize,
    /// 1 - interactions / (users * items); 1.0 for an empty matrix
    pub sparsity: f64,
    pub avg_interactions_per_user: f64,
}

/// Engine-wide size and health metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatistics {
    pub matrix: MatrixStatistics,
    pub artist_count: usize,
    pub venue_count: usize,
    pub concert_count: usize,
}

/// Sort candidates by score descending, breaking ties by item id ascending.
pub(crate) fn rank_candidates(candidates: &mut [RecommendationCandidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
}

/// Sort similarity scores by similarity descending, ties by id ascending.
pub(crate) fn rank_similarities(scores: &mut [SimilarityScore]) {
    scores.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id_b.cmp(&b.id_b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_genre_normalization() {
        let artist = Artist::new("a1", "The Test", ["  Rock ", "BLUES", ""], 80.0);
        assert_eq!(artist.genres.len(), 2);
        assert!(artist.genres.contains("rock"));
        assert!(artist.genres.contains("blues"));
    }

    #[test]
    fn test_artist_popularity_clamped() {
        assert_eq!(Artist::new("a", "a", ["rock"], 150.0).popularity, 100.0);
        assert_eq!(Artist::new("a", "a", ["rock"], -3.0).popularity, 0.0);
    }

    #[test]
    fn test_rank_candidates_tie_break() {
        let candidate = |id: &str, score: f64| RecommendationCandidate {
            item_id: id.to_string(),
            item_type: EntityKind::Concert,
            score,
            confidence: 1.0,
            reason: Reason::Hybrid,
            metadata: HashMap::new(),
        };

        let mut candidates = vec![
            candidate("c2", 0.5),
            candidate("c1", 0.5),
            candidate("c3", 0.9),
        ];
        rank_candidates(&mut candidates);

        let ids: Vec<&str> = candidates.iter().map(|c| c.item_id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c1", "c2"]);
    }

    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&Strategy::CollaborativeUser).unwrap();
        assert_eq!(json, "\"collaborative_user\"");
        let parsed: Strategy = serde_json::from_str("\"hybrid_all\"").unwrap();
        assert_eq!(parsed, Strategy::HybridAll);
    }
}
