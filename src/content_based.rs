//! Content-based filtering over catalog attributes.
//!
//! Owns the artist/venue/concert catalog and scores recommendations purely
//! from entity attributes, independent of behavioral data. Artist
//! similarity blends genre Jaccard with popularity proximity; venue
//! similarity blends haversine location, log-scale capacity, and type.

use crate::error::{EngineError, Result};
use crate::types::{
    rank_candidates, rank_similarities, Artist, CatalogEntity, Concert, EntityKind, Reason,
    RecommendationCandidate, SimilarityMethod, SimilarityScore, Venue,
};
use crate::EngineConfig;
use dashmap::DashMap;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use tracing::debug;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Log-capacity difference at which capacity similarity reaches zero
const CAPACITY_LOG_RANGE: f64 = 3.0;

/// Additive catalog of artists, venues, and concerts.
///
/// DashMap gives per-entry write atomicity; the catalog only grows, so
/// readers scanning during an insert see a consistent prefix.
#[derive(Debug, Default)]
pub struct ContentCatalog {
    artists: DashMap<String, Artist>,
    venues: DashMap<String, Venue>,
    concerts: DashMap<String, Concert>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_artist(&self, artist: Artist) {
        self.artists.insert(artist.id.clone(), artist);
    }

    pub fn add_venue(&self, venue: Venue) -> Result<()> {
        if venue.capacity == 0 {
            return Err(EngineError::InvalidCapacity {
                venue_id: venue.id,
                capacity: venue.capacity,
            });
        }
        self.venues.insert(venue.id.clone(), venue);
        Ok(())
    }

    pub fn add_concert(&self, concert: Concert) {
        self.concerts.insert(concert.id.clone(), concert);
    }

    pub fn add_entity(&self, entity: CatalogEntity) -> Result<()> {
        match entity {
            CatalogEntity::Artist(artist) => {
                self.add_artist(artist);
                Ok(())
            }
            CatalogEntity::Venue(venue) => self.add_venue(venue),
            CatalogEntity::Concert(concert) => {
                self.add_concert(concert);
                Ok(())
            }
        }
    }

    pub fn artist(&self, id: &str) -> Option<Artist> {
        self.artists.get(id).map(|a| a.clone())
    }

    pub fn venue(&self, id: &str) -> Option<Venue> {
        self.venues.get(id).map(|v| v.clone())
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }

    pub fn concert_count(&self) -> usize {
        self.concerts.len()
    }
}

/// Jaccard similarity over normalized genre sets.
///
/// Two empty sets are identical and score 1.0; one empty set against a
/// non-empty set scores 0.0.
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Great-circle distance in kilometers between two coordinate pairs
pub fn haversine_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Content-based filtering engine over a shared catalog
pub struct ContentFilter<'a> {
    catalog: &'a ContentCatalog,
    config: &'a EngineConfig,
}

impl<'a> ContentFilter<'a> {
    pub fn new(catalog: &'a ContentCatalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Weighted blend of genre Jaccard and popularity proximity
    pub fn artist_similarity(&self, a: &Artist, b: &Artist) -> f64 {
        let genre_weight = self.config.genre_weight;
        let popularity_weight = self.config.popularity_weight;

        let genre_sim = jaccard_similarity(&a.genres, &b.genres);
        let popularity_sim = 1.0 - (a.popularity - b.popularity).abs() / 100.0;

        (genre_weight * genre_sim + popularity_weight * popularity_sim)
            / (genre_weight + popularity_weight)
    }

    /// Weighted blend of location, capacity, and type similarity.
    ///
    /// Location uses haversine distance when both venues carry coordinates
    /// and falls back to exact city+state match otherwise. Capacity is
    /// compared on a log scale because capacity differences are
    /// multiplicative.
    pub fn venue_similarity(&self, a: &Venue, b: &Venue) -> f64 {
        let location_sim = match (a.latitude, a.longitude, b.latitude, b.longitude) {
            (Some(lat_a), Some(lon_a), Some(lat_b), Some(lon_b)) => {
                let distance = haversine_km(lat_a, lon_a, lat_b, lon_b);
                (1.0 - distance / self.config.max_distance_km).max(0.0)
            }
            _ => {
                let same_city = a.city.trim().eq_ignore_ascii_case(b.city.trim())
                    && a.state.trim().eq_ignore_ascii_case(b.state.trim());
                if same_city {
                    1.0
                } else {
                    0.0
                }
            }
        };

        let capacity_sim = {
            let log_diff = ((a.capacity as f64).log10() - (b.capacity as f64).log10()).abs();
            (1.0 - log_diff / CAPACITY_LOG_RANGE).max(0.0)
        };

        let type_sim = if a.venue_type == b.venue_type { 1.0 } else { 0.0 };

        let location_weight = self.config.location_weight;
        let capacity_weight = self.config.capacity_weight;
        let type_weight = self.config.type_weight;

        (location_weight * location_sim + capacity_weight * capacity_sim + type_weight * type_sim)
            / (location_weight + capacity_weight + type_weight)
    }

    /// Artists most similar to the given artist. Self excluded; unknown id
    /// yields an empty list.
    pub fn find_similar_artists(
        &self,
        artist_id: &str,
        top_k: usize,
        min_similarity: f64,
    ) -> Vec<SimilarityScore> {
        let Some(subject) = self.catalog.artist(artist_id) else {
            return Vec::new();
        };

        let mut scores: Vec<SimilarityScore> = self
            .catalog
            .artists
            .iter()
            .filter(|entry| entry.key().as_str() != artist_id)
            .filter_map(|entry| {
                let similarity = self.artist_similarity(&subject, entry.value());
                (similarity >= min_similarity).then(|| SimilarityScore {
                    id_a: artist_id.to_string(),
                    id_b: entry.key().clone(),
                    similarity,
                    method: SimilarityMethod::ArtistContent,
                })
            })
            .collect();

        rank_similarities(&mut scores);
        scores.truncate(top_k);
        scores
    }

    /// Venues most similar to the given venue. Self excluded; unknown id
    /// yields an empty list.
    pub fn find_similar_venues(
        &self,
        venue_id: &str,
        top_k: usize,
        min_similarity: f64,
    ) -> Vec<SimilarityScore> {
        let Some(subject) = self.catalog.venue(venue_id) else {
            return Vec::new();
        };

        let mut scores: Vec<SimilarityScore> = self
            .catalog
            .venues
            .iter()
            .filter(|entry| entry.key().as_str() != venue_id)
            .filter_map(|entry| {
                let similarity = self.venue_similarity(&subject, entry.value());
                (similarity >= min_similarity).then(|| SimilarityScore {
                    id_a: venue_id.to_string(),
                    id_b: entry.key().clone(),
                    similarity,
                    method: SimilarityMethod::VenueContent,
                })
            })
            .collect();

        rank_similarities(&mut scores);
        scores.truncate(top_k);
        scores
    }

    /// Score concerts by artist preference.
    ///
    /// Each candidate artist keeps the maximum similarity seen across the
    /// preferred artists rather than a sum, so broadly-similar artists are
    /// not inflated. Preferred artists present in the catalog score 1.0.
    /// Returns ranked candidates plus the number of concerts considered.
    pub fn recommend_by_artist_preference(
        &self,
        preferred: &[String],
        top_k: usize,
        exclude: &HashSet<String>,
    ) -> (Vec<RecommendationCandidate>, usize) {
        let mut artist_scores: HashMap<String, f64> = HashMap::new();

        for artist_id in preferred {
            if self.catalog.artists.contains_key(artist_id) {
                let entry = artist_scores.entry(artist_id.clone()).or_insert(0.0);
                *entry = entry.max(1.0);

                for similar in self.find_similar_artists(
                    artist_id,
                    self.config.similar_per_preference,
                    self.config.min_similarity_content,
                ) {
                    let entry = artist_scores.entry(similar.id_b).or_insert(0.0);
                    *entry = entry.max(similar.similarity);
                }
            }
        }

        if artist_scores.is_empty() {
            return (Vec::new(), 0);
        }

        let confidence =
            (preferred.len() as f64 / self.config.preference_confidence_saturation).min(1.0);

        let mut candidates: Vec<RecommendationCandidate> = self
            .catalog
            .concerts
            .iter()
            .filter(|entry| !exclude.contains(entry.key()))
            .filter_map(|entry| {
                let concert = entry.value();
                let &similarity = artist_scores.get(&concert.artist_id)?;
                Some(RecommendationCandidate {
                    item_id: concert.id.clone(),
                    item_type: EntityKind::Concert,
                    score: similarity,
                    confidence,
                    reason: Reason::SimilarArtist {
                        artist_id: concert.artist_id.clone(),
                        similarity,
                    },
                    metadata: HashMap::from([
                        ("artist_id".to_string(), json!(concert.artist_id)),
                        ("venue_id".to_string(), json!(concert.venue_id)),
                    ]),
                })
            })
            .collect();

        let total = candidates.len();
        rank_candidates(&mut candidates);
        candidates.truncate(top_k);

        debug!(
            preferred = preferred.len(),
            matched_artists = artist_scores.len(),
            candidates = total,
            "artist-preference recommendations generated"
        );

        (candidates, total)
    }

    /// Score concerts by venue preference; symmetric to the artist side.
    pub fn recommend_by_venue_preference(
        &self,
        preferred: &[String],
        top_k: usize,
        exclude: &HashSet<String>,
    ) -> (Vec<RecommendationCandidate>, usize) {
        let mut venue_scores: HashMap<String, f64> = HashMap::new();

        for venue_id in preferred {
            if self.catalog.venues.contains_key(venue_id) {
                let entry = venue_scores.entry(venue_id.clone()).or_insert(0.0);
                *entry = entry.max(1.0);

                for similar in self.find_similar_venues(
                    venue_id,
                    self.config.similar_per_preference,
                    self.config.min_similarity_content,
                ) {
                    let entry = venue_scores.entry(similar.id_b).or_insert(0.0);
                    *entry = entry.max(similar.similarity);
                }
            }
        }

        if venue_scores.is_empty() {
            return (Vec::new(), 0);
        }

        let confidence =
            (preferred.len() as f64 / self.config.preference_confidence_saturation).min(1.0);

        let mut candidates: Vec<RecommendationCandidate> = self
            .catalog
            .concerts
            .iter()
            .filter(|entry| !exclude.contains(entry.key()))
            .filter_map(|entry| {
                let concert = entry.value();
                let &similarity = venue_scores.get(&concert.venue_id)?;
                Some(RecommendationCandidate {
                    item_id: concert.id.clone(),
                    item_type: EntityKind::Concert,
                    score: similarity,
                    confidence,
                    reason: Reason::SimilarVenue {
                        venue_id: concert.venue_id.clone(),
                        similarity,
                    },
                    metadata: HashMap::from([
                        ("artist_id".to_string(), json!(concert.artist_id)),
                        ("venue_id".to_string(), json!(concert.venue_id)),
                    ]),
                })
            })
            .collect();

        let total = candidates.len();
        rank_candidates(&mut candidates);
        candidates.truncate(top_k);

        debug!(
            preferred = preferred.len(),
            matched_venues = venue_scores.len(),
            candidates = total,
            "venue-preference recommendations generated"
        );

        (candidates, total)
    }

    /// Blend artist- and venue-preference candidates.
    ///
    /// Each side contributes 2x the requested depth; concerts present in
    /// both sets get the weighted sum of both scores and the maximum of
    /// both confidences, concerts in one set keep their weighted
    /// contribution alone.
    pub fn recommend_hybrid_content(
        &self,
        preferred_artists: &[String],
        preferred_venues: &[String],
        top_k: usize,
        exclude: &HashSet<String>,
    ) -> (Vec<RecommendationCandidate>, usize) {
        let artist_weight = self.config.artist_weight;
        let venue_weight = self.config.venue_weight;

        let (artist_candidates, _) =
            self.recommend_by_artist_preference(preferred_artists, top_k * 2, exclude);
        let (venue_candidates, _) =
            self.recommend_by_venue_preference(preferred_venues, top_k * 2, exclude);

        // item -> (artist-side candidate, venue-side candidate)
        let mut sides: HashMap<String, (Option<RecommendationCandidate>, Option<RecommendationCandidate>)> =
            HashMap::new();
        for candidate in artist_candidates {
            let key = candidate.item_id.clone();
            sides.entry(key).or_default().0 = Some(candidate);
        }
        for candidate in venue_candidates {
            let key = candidate.item_id.clone();
            sides.entry(key).or_default().1 = Some(candidate);
        }

        let total = sides.len();
        let mut candidates: Vec<RecommendationCandidate> = sides
            .into_values()
            .filter_map(|pair| match pair {
                (Some(from_artist), Some(from_venue)) => {
                    let artist_score = from_artist.score;
                    let venue_score = from_venue.score;
                    let mut merged = from_artist;
                    merged.score = artist_weight * artist_score + venue_weight * venue_score;
                    merged.confidence = merged.confidence.max(from_venue.confidence);
                    merged.reason = Reason::ContentBlend {
                        artist_score,
                        venue_score,
                    };
                    Some(merged)
                }
                (Some(mut from_artist), None) => {
                    from_artist.score *= artist_weight;
                    Some(from_artist)
                }
                (None, Some(mut from_venue)) => {
                    from_venue.score *= venue_weight;
                    Some(from_venue)
                }
                (None, None) => None,
            })
            .collect();
        rank_candidates(&mut candidates);
        candidates.truncate(top_k);

        (candidates, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConcertStatus, VenueType};

    fn artist(id: &str, genres: &[&str], popularity: f64) -> Artist {
        Artist::new(id, id, genres.iter().copied(), popularity)
    }

    fn venue(id: &str, coords: Option<(f64, f64)>, capacity: u32, venue_type: VenueType) -> Venue {
        Venue {
            id: id.to_string(),
            name: id.to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            country: "US".to_string(),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            capacity,
            venue_type,
        }
    }

    fn concert(id: &str, artist_id: &str, venue_id: &str) -> Concert {
        Concert {
            id: id.to_string(),
            artist_id: artist_id.to_string(),
            venue_id: venue_id.to_string(),
            status: ConcertStatus::OnSale,
        }
    }

    fn genre_set(genres: &[&str]) -> HashSet<String> {
        genres.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_jaccard_identities() {
        let rock_blues = genre_set(&["rock", "blues"]);
        let empty = HashSet::new();

        assert_eq!(jaccard_similarity(&rock_blues, &rock_blues), 1.0);
        assert_eq!(jaccard_similarity(&rock_blues, &empty), 0.0);
        assert_eq!(jaccard_similarity(&empty, &empty), 1.0);

        let rock_pop = genre_set(&["rock", "pop"]);
        let sim = jaccard_similarity(&rock_blues, &rock_pop);
        assert!(sim >= 0.0 && sim <= 1.0);
        assert!((sim - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_artist_similarity_blend_values() {
        // A(rock/blues, 80) vs B(rock/pop, 85):
        // 0.6 * 1/3 + 0.4 * 0.95 = 0.58
        let catalog = ContentCatalog::new();
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        let a = artist("a", &["rock", "blues"], 80.0);
        let b = artist("b", &["rock", "pop"], 85.0);
        assert!((cbf.artist_similarity(&a, &b) - 0.58).abs() < 1e-9);
    }

    #[test]
    fn test_identical_artists_score_one() {
        let catalog = ContentCatalog::new();
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        let a = artist("a", &["rock", "blues"], 80.0);
        let b = artist("b", &["rock", "blues"], 80.0);
        assert!((cbf.artist_similarity(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_symmetric_and_zero_at_same_point() {
        let austin = (30.2672, -97.7431);
        let dallas = (32.7767, -96.7970);

        let ab = haversine_km(austin.0, austin.1, dallas.0, dallas.1);
        let ba = haversine_km(dallas.0, dallas.1, austin.0, austin.1);
        assert!((ab - ba).abs() < 1e-9);
        // Austin to Dallas is roughly 290 km
        assert!(ab > 250.0 && ab < 330.0);

        assert!(haversine_km(austin.0, austin.1, austin.0, austin.1) < 1e-9);
    }

    #[test]
    fn test_venue_similarity_identical_coordinates() {
        let catalog = ContentCatalog::new();
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        let a = venue("v1", Some((30.2672, -97.7431)), 5000, VenueType::Theater);
        let b = venue("v2", Some((30.2672, -97.7431)), 5000, VenueType::Theater);
        assert!((cbf.venue_similarity(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_similarity_decreasing_on_log_scale() {
        let catalog = ContentCatalog::new();
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        let base = venue("v1", Some((30.0, -97.0)), 1000, VenueType::Club);
        let same = venue("v2", Some((30.0, -97.0)), 1000, VenueType::Club);
        let x10 = venue("v3", Some((30.0, -97.0)), 10_000, VenueType::Club);
        let x100 = venue("v4", Some((30.0, -97.0)), 100_000, VenueType::Club);

        let sim_same = cbf.venue_similarity(&base, &same);
        let sim_x10 = cbf.venue_similarity(&base, &x10);
        let sim_x100 = cbf.venue_similarity(&base, &x100);

        assert!((sim_same - 1.0).abs() < 1e-9);
        assert!(sim_x10 < sim_same);
        assert!(sim_x100 < sim_x10);
    }

    #[test]
    fn test_venue_location_fallback_to_city_state() {
        let catalog = ContentCatalog::new();
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        // Same city/state, one venue missing coordinates
        let a = venue("v1", None, 2000, VenueType::Club);
        let b = venue("v2", Some((30.0, -97.0)), 2000, VenueType::Club);
        assert!((cbf.venue_similarity(&a, &b) - 1.0).abs() < 1e-9);

        let mut c = venue("v3", None, 2000, VenueType::Club);
        c.city = "Houston".to_string();
        // Location term drops to zero, capacity and type remain
        let expected = (config.capacity_weight + config.type_weight)
            / (config.location_weight + config.capacity_weight + config.type_weight);
        assert!((cbf.venue_similarity(&a, &c) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_find_similar_artists_excludes_self_and_unknown() {
        let catalog = ContentCatalog::new();
        catalog.add_artist(artist("a1", &["rock", "blues"], 80.0));
        catalog.add_artist(artist("a2", &["rock", "blues"], 82.0));
        catalog.add_artist(artist("a3", &["jazz"], 20.0));
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        let similar = cbf.find_similar_artists("a1", 10, 0.3);
        assert!(similar.iter().all(|s| s.id_b != "a1"));
        assert_eq!(similar[0].id_b, "a2");

        assert!(cbf.find_similar_artists("ghost", 10, 0.3).is_empty());
    }

    #[test]
    fn test_artist_preference_keeps_maximum_similarity() {
        let catalog = ContentCatalog::new();
        // a3 is similar to both preferred artists; its score must be the
        // max of the two similarities, not the sum.
        catalog.add_artist(artist("a1", &["rock", "blues"], 80.0));
        catalog.add_artist(artist("a2", &["rock", "pop"], 85.0));
        catalog.add_artist(artist("a3", &["rock"], 82.0));
        catalog.add_concert(concert("c1", "a3", "v1"));
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        let preferred = vec!["a1".to_string(), "a2".to_string()];
        let (candidates, total) =
            cbf.recommend_by_artist_preference(&preferred, 10, &HashSet::new());

        assert_eq!(total, 1);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].score <= 1.0);

        let sim_a1_a3 = cbf.artist_similarity(
            &catalog.artist("a1").unwrap(),
            &catalog.artist("a3").unwrap(),
        );
        let sim_a2_a3 = cbf.artist_similarity(
            &catalog.artist("a2").unwrap(),
            &catalog.artist("a3").unwrap(),
        );
        assert!((candidates[0].score - sim_a1_a3.max(sim_a2_a3)).abs() < 1e-9);
    }

    #[test]
    fn test_preferred_artist_concerts_score_one() {
        let catalog = ContentCatalog::new();
        catalog.add_artist(artist("a1", &["rock"], 80.0));
        catalog.add_concert(concert("c1", "a1", "v1"));
        catalog.add_concert(concert("c2", "a1", "v2"));
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        let preferred = vec!["a1".to_string()];
        let exclude = HashSet::from(["c2".to_string()]);
        let (candidates, total) = cbf.recommend_by_artist_preference(&preferred, 10, &exclude);

        assert_eq!(total, 1);
        assert_eq!(candidates[0].item_id, "c1");
        assert_eq!(candidates[0].score, 1.0);
        // One preferred artist against a saturation of five
        assert!((candidates[0].confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_preferences_yield_empty() {
        let catalog = ContentCatalog::new();
        catalog.add_artist(artist("a1", &["rock"], 80.0));
        catalog.add_concert(concert("c1", "a1", "v1"));
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        let (candidates, total) =
            cbf.recommend_by_artist_preference(&["ghost".to_string()], 10, &HashSet::new());
        assert!(candidates.is_empty());
        assert_eq!(total, 0);

        let (candidates, total) = cbf.recommend_by_artist_preference(&[], 10, &HashSet::new());
        assert!(candidates.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_hybrid_content_merges_weighted_scores() {
        let catalog = ContentCatalog::new();
        catalog.add_artist(artist("a1", &["rock"], 80.0));
        catalog
            .add_venue(venue("v1", Some((30.0, -97.0)), 2000, VenueType::Club))
            .unwrap();
        // c1 matches both the artist and the venue preference; c2 only the
        // artist (different venue).
        catalog.add_concert(concert("c1", "a1", "v1"));
        catalog.add_concert(concert("c2", "a1", "v9"));
        let config = EngineConfig::default();
        let cbf = ContentFilter::new(&catalog, &config);

        let artists = vec!["a1".to_string()];
        let venues = vec!["v1".to_string()];
        let (candidates, total) =
            cbf.recommend_hybrid_content(&artists, &venues, 10, &HashSet::new());

        assert_eq!(total, 2);
        let c1 = candidates.iter().find(|c| c.item_id == "c1").unwrap();
        let c2 = candidates.iter().find(|c| c.item_id == "c2").unwrap();

        // Both sides scored 1.0 for c1: 0.6 * 1.0 + 0.4 * 1.0
        assert!((c1.score - 1.0).abs() < 1e-9);
        assert!(matches!(c1.reason, Reason::ContentBlend { .. }));

        // c2 keeps only the artist-weighted contribution
        assert!((c2.score - config.artist_weight).abs() < 1e-9);
        assert!(matches!(c2.reason, Reason::SimilarArtist { .. }));
    }

    #[test]
    fn test_add_venue_rejects_zero_capacity() {
        let catalog = ContentCatalog::new();
        let bad = venue("v1", None, 0, VenueType::Club);
        assert!(matches!(
            catalog.add_venue(bad),
            Err(EngineError::InvalidCapacity { .. })
        ));
    }
}
