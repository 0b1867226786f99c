//! Encore unified recommendation engine.
//!
//! Turns behavioral signals (who interacted with which concerts) and
//! catalog attributes (artist genres/popularity, venue location/capacity/
//! type) into ranked, scored recommendation lists. Three cooperating
//! components: a sparse interaction store with collaborative filtering, a
//! content-based filtering engine over the artist/venue/concert catalog,
//! and a fusion layer that dispatches strategies and merges candidate sets.
//!
//! The engine holds no hidden global state: callers construct a
//! [`RecommendationEngine`] from an [`EngineConfig`], feed it catalog
//! entities and interaction events, and query it. Persistence and
//! transport are the surrounding service's responsibility.

pub mod collaborative;
pub mod content_based;
pub mod error;
pub mod matrix;
pub mod recommendation;
pub mod types;

pub use collaborative::CollaborativeFilter;
pub use content_based::{haversine_km, jaccard_similarity, ContentCatalog, ContentFilter};
pub use error::{EngineError, Result};
pub use matrix::{sparse_cosine, InteractionMatrix};
pub use recommendation::RecommendationEngine;
pub use types::{
    Artist, CatalogEntity, Concert, ConcertStatus, EngineStatistics, EntityKind, InteractionEvent,
    MatrixStatistics, Preferences, Reason, RecommendationCandidate, RecommendationResult,
    SimilarityMethod, SimilarityScore, Strategy, Venue, VenueType,
};

use serde::{Deserialize, Serialize};

/// Engine tuning knobs.
///
/// Every threshold and blend weight the strategies use is settable here;
/// host services deserialize this from their own configuration layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Similar users consulted by user-based CF (default: 20)
    pub neighbor_count: usize,
    /// Similar items fetched per anchor by item-based CF (default: 20)
    pub similar_items_per_anchor: usize,
    /// Similar entities fetched per preferred artist/venue (default: 20)
    pub similar_per_preference: usize,
    /// Recommendation list size when the caller does not say (default: 10)
    pub default_top_k: usize,
    /// Minimum cosine similarity for user neighbors (default: 0.1)
    pub min_similarity_users: f64,
    /// Minimum cosine similarity for item neighbors (default: 0.1)
    pub min_similarity_items: f64,
    /// Minimum content similarity for artist/venue matches (default: 0.3)
    pub min_similarity_content: f64,
    /// Genre term weight in artist similarity (default: 0.6)
    pub genre_weight: f64,
    /// Popularity term weight in artist similarity (default: 0.4)
    pub popularity_weight: f64,
    /// Location term weight in venue similarity (default: 0.4)
    pub location_weight: f64,
    /// Capacity term weight in venue similarity (default: 0.3)
    pub capacity_weight: f64,
    /// Venue type term weight in venue similarity (default: 0.3)
    pub type_weight: f64,
    /// Artist side weight in the content-hybrid blend (default: 0.6)
    pub artist_weight: f64,
    /// Venue side weight in the content-hybrid blend (default: 0.4)
    pub venue_weight: f64,
    /// Distance at which location similarity reaches zero (default: 100 km)
    pub max_distance_km: f64,
    /// Preference count at which content confidence saturates (default: 5)
    pub preference_confidence_saturation: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neighbor_count: 20,
            similar_items_per_anchor: 20,
            similar_per_preference: 20,
            default_top_k: 10,
            min_similarity_users: 0.1,
            min_similarity_items: 0.1,
            min_similarity_content: 0.3,
            genre_weight: 0.6,
            popularity_weight: 0.4,
            location_weight: 0.4,
            capacity_weight: 0.3,
            type_weight: 0.3,
            artist_weight: 0.6,
            venue_weight: 0.4,
            max_distance_km: 100.0,
            preference_confidence_saturation: 5.0,
        }
    }
}

impl EngineConfig {
    /// Reject malformed weights and counts up front so the strategies can
    /// assume a well-formed configuration.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("neighbor_count", self.neighbor_count),
            ("similar_items_per_anchor", self.similar_items_per_anchor),
            ("similar_per_preference", self.similar_per_preference),
            ("default_top_k", self.default_top_k),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(EngineError::InvalidCount { name, value });
            }
        }

        let weights = [
            ("genre_weight", self.genre_weight),
            ("popularity_weight", self.popularity_weight),
            ("location_weight", self.location_weight),
            ("capacity_weight", self.capacity_weight),
            ("type_weight", self.type_weight),
            ("artist_weight", self.artist_weight),
            ("venue_weight", self.venue_weight),
            ("min_similarity_users", self.min_similarity_users),
            ("min_similarity_items", self.min_similarity_items),
            ("min_similarity_content", self.min_similarity_content),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidWeight { name, value });
            }
        }

        // Each blend must have at least one positive weight to divide by
        let blends = [
            ("genre_weight", self.genre_weight + self.popularity_weight),
            (
                "location_weight",
                self.location_weight + self.capacity_weight + self.type_weight,
            ),
            ("artist_weight", self.artist_weight + self.venue_weight),
        ];
        for (name, sum) in blends {
            if sum <= 0.0 {
                return Err(EngineError::InvalidWeight { name, value: sum });
            }
        }

        if !self.max_distance_km.is_finite() || self.max_distance_km <= 0.0 {
            return Err(EngineError::InvalidWeight {
                name: "max_distance_km",
                value: self.max_distance_km,
            });
        }
        if !self.preference_confidence_saturation.is_finite()
            || self.preference_confidence_saturation <= 0.0
        {
            return Err(EngineError::InvalidWeight {
                name: "preference_confidence_saturation",
                value: self.preference_confidence_saturation,
            });
        }

        Ok(())
    }
}
