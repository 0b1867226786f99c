//! Fusion and orchestration layer.
//!
//! `RecommendationEngine` owns the shared state (interaction matrix and
//! content catalog), dispatches strategies, merges collaborative and
//! content candidate sets for the hybrid strategy, and fans out batch
//! requests across subjects in parallel.

use crate::collaborative::CollaborativeFilter;
use crate::content_based::{ContentCatalog, ContentFilter};
use crate::error::{EngineError, Result};
use crate::matrix::InteractionMatrix;
use crate::types::{
    rank_candidates, CatalogEntity, EngineStatistics, EntityKind, InteractionEvent, Preferences,
    Reason, RecommendationCandidate, RecommendationResult, SimilarityScore, Strategy,
};
use crate::EngineConfig;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Unified recommendation engine.
///
/// Mutations (interaction ingest, matrix rebuild, catalog adds) are
/// serialized against reads; recommendation generation is a pure read over
/// the published state and safe to run in parallel across subjects.
pub struct RecommendationEngine {
    config: EngineConfig,
    matrix: RwLock<InteractionMatrix>,
    catalog: ContentCatalog,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            matrix: RwLock::new(InteractionMatrix::new()),
            catalog: ContentCatalog::new(),
        })
    }

    pub fn with_default_config() -> Self {
        Self {
            config: EngineConfig::default(),
            matrix: RwLock::new(InteractionMatrix::new()),
            catalog: ContentCatalog::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// Add one catalog entity from the upstream ingestion layer.
    pub fn add_catalog_entity(&self, entity: CatalogEntity) -> Result<()> {
        self.catalog.add_entity(entity)
    }

    /// Insert or overwrite a single interaction in both matrix views.
    pub fn ingest_interaction(&self, event: &InteractionEvent) -> Result<()> {
        validate_strength(event)?;
        self.matrix
            .write()
            .insert(&event.user_id, &event.item_id, event.strength);
        Ok(())
    }

    /// Replace the interaction matrix from a batch of events.
    ///
    /// The new matrix is built off to the side and swapped in under the
    /// write lock, so concurrent readers never observe a partial rebuild.
    pub fn rebuild_matrix(&self, events: &[InteractionEvent]) -> Result<()> {
        for event in events {
            validate_strength(event)?;
        }
        let rebuilt = InteractionMatrix::from_events(events);
        *self.matrix.write() = rebuilt;

        debug!(events = events.len(), "interaction matrix rebuilt");
        Ok(())
    }

    /// Cold-start load: catalog snapshot plus an interaction batch.
    pub fn bulk_load(
        &self,
        catalog: Vec<CatalogEntity>,
        interactions: &[InteractionEvent],
    ) -> Result<()> {
        for entity in catalog {
            self.catalog.add_entity(entity)?;
        }
        self.rebuild_matrix(interactions)
    }

    /// Generate recommendations for one subject with the given strategy.
    pub fn recommend(
        &self,
        subject_id: &str,
        strategy: Strategy,
        top_k: usize,
        preferences: &Preferences,
    ) -> Result<RecommendationResult> {
        if top_k == 0 {
            return Err(EngineError::InvalidCount {
                name: "top_k",
                value: top_k,
            });
        }

        let result = match strategy {
            Strategy::CollaborativeUser => {
                let matrix = self.matrix.read();
                CollaborativeFilter::new(&matrix, &self.config)
                    .recommend_user_based(subject_id, top_k)
            }
            Strategy::CollaborativeItem => {
                let matrix = self.matrix.read();
                CollaborativeFilter::new(&matrix, &self.config)
                    .recommend_item_based(subject_id, top_k)
            }
            Strategy::ContentArtist => {
                let cbf = ContentFilter::new(&self.catalog, &self.config);
                let (candidates, total) = cbf.recommend_by_artist_preference(
                    &preferences.artists,
                    top_k,
                    &preferences.exclude,
                );
                RecommendationResult {
                    subject_id: subject_id.to_string(),
                    recommendations: candidates,
                    algorithm: strategy,
                    total_candidates_considered: total,
                }
            }
            Strategy::ContentVenue => {
                let cbf = ContentFilter::new(&self.catalog, &self.config);
                let (candidates, total) = cbf.recommend_by_venue_preference(
                    &preferences.venues,
                    top_k,
                    &preferences.exclude,
                );
                RecommendationResult {
                    subject_id: subject_id.to_string(),
                    recommendations: candidates,
                    algorithm: strategy,
                    total_candidates_considered: total,
                }
            }
            Strategy::ContentHybrid => {
                let cbf = ContentFilter::new(&self.catalog, &self.config);
                let (candidates, total) = cbf.recommend_hybrid_content(
                    &preferences.artists,
                    &preferences.venues,
                    top_k,
                    &preferences.exclude,
                );
                RecommendationResult {
                    subject_id: subject_id.to_string(),
                    recommendations: candidates,
                    algorithm: strategy,
                    total_candidates_considered: total,
                }
            }
            Strategy::HybridAll => self.hybrid_all(subject_id, top_k, preferences),
        };

        Ok(result)
    }

    /// Generate recommendations with the configured default list size.
    pub fn recommend_default(
        &self,
        subject_id: &str,
        strategy: Strategy,
        preferences: &Preferences,
    ) -> Result<RecommendationResult> {
        self.recommend(subject_id, strategy, self.config.default_top_k, preferences)
    }

    /// Hybrid strategy: collaborative first, content second, merged by item.
    ///
    /// A failing collaborative leg contributes nothing; the failure is
    /// logged rather than swallowed silently or propagated. The content leg
    /// runs only when preferences were supplied. Items present in both
    /// sources take the mean score and the maximum confidence.
    fn hybrid_all(
        &self,
        subject_id: &str,
        top_k: usize,
        preferences: &Preferences,
    ) -> RecommendationResult {
        let collaborative =
            match self.recommend(subject_id, Strategy::CollaborativeUser, top_k, preferences) {
                Ok(result) => result,
                Err(error) => {
                    warn!(subject_id, %error, "collaborative leg failed; continuing with content only");
                    RecommendationResult::empty(subject_id, Strategy::CollaborativeUser)
                }
            };

        let content_candidates = if preferences.is_empty() {
            Vec::new()
        } else {
            let cbf = ContentFilter::new(&self.catalog, &self.config);
            let (candidates, _) = cbf.recommend_hybrid_content(
                &preferences.artists,
                &preferences.venues,
                top_k,
                &preferences.exclude,
            );
            candidates
        };

        let mut merged: HashMap<String, RecommendationCandidate> = collaborative
            .recommendations
            .into_iter()
            .map(|candidate| (candidate.item_id.clone(), candidate))
            .collect();

        for candidate in content_candidates {
            match merged.entry(candidate.item_id.clone()) {
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    // Provenance differs, so a simple mean rather than a
                    // weighted blend.
                    existing.score = (existing.score + candidate.score) / 2.0;
                    existing.confidence = existing.confidence.max(candidate.confidence);
                    existing.reason = Reason::Hybrid;
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(candidate);
                }
            }
        }

        let total = merged.len();
        let mut candidates: Vec<RecommendationCandidate> = merged.into_values().collect();
        rank_candidates(&mut candidates);
        candidates.truncate(top_k);

        RecommendationResult {
            subject_id: subject_id.to_string(),
            recommendations: candidates,
            algorithm: Strategy::HybridAll,
            total_candidates_considered: total,
        }
    }

    /// Similar-artist list from liked artists: pure similarity propagation,
    /// no concert involvement. Liked artists are excluded from the output.
    pub fn recommend_artists(&self, liked: &[String], top_k: usize) -> Vec<RecommendationCandidate> {
        let cbf = ContentFilter::new(&self.catalog, &self.config);
        self.propagate_similar(liked, top_k, EntityKind::Artist, |id| {
            cbf.find_similar_artists(
                id,
                self.config.similar_per_preference,
                self.config.min_similarity_content,
            )
        })
    }

    /// Similar-venue list from liked venues; symmetric to `recommend_artists`.
    pub fn recommend_venues(&self, liked: &[String], top_k: usize) -> Vec<RecommendationCandidate> {
        let cbf = ContentFilter::new(&self.catalog, &self.config);
        self.propagate_similar(liked, top_k, EntityKind::Venue, |id| {
            cbf.find_similar_venues(
                id,
                self.config.similar_per_preference,
                self.config.min_similarity_content,
            )
        })
    }

    fn propagate_similar(
        &self,
        liked: &[String],
        top_k: usize,
        item_type: EntityKind,
        find_similar: impl Fn(&str) -> Vec<SimilarityScore>,
    ) -> Vec<RecommendationCandidate> {
        // candidate -> (best similarity, liked id that produced it)
        let mut best: HashMap<String, (f64, String)> = HashMap::new();

        for liked_id in liked {
            for score in find_similar(liked_id) {
                if liked.contains(&score.id_b) {
                    continue;
                }
                let entry = best
                    .entry(score.id_b)
                    .or_insert((0.0, liked_id.clone()));
                if score.similarity > entry.0 {
                    *entry = (score.similarity, liked_id.clone());
                }
            }
        }

        let confidence =
            (liked.len() as f64 / self.config.preference_confidence_saturation).min(1.0);

        let mut candidates: Vec<RecommendationCandidate> = best
            .into_iter()
            .map(|(id, (similarity, source))| RecommendationCandidate {
                item_id: id,
                item_type,
                score: similarity,
                confidence,
                reason: match item_type {
                    EntityKind::Venue => Reason::SimilarVenue {
                        venue_id: source,
                        similarity,
                    },
                    _ => Reason::SimilarArtist {
                        artist_id: source,
                        similarity,
                    },
                },
                metadata: HashMap::new(),
            })
            .collect();

        rank_candidates(&mut candidates);
        candidates.truncate(top_k);
        candidates
    }

    /// Similarity lookup routed by entity kind: users and concerts go to
    /// the interaction matrix, artists and venues to the content catalog.
    pub fn similar_entities(
        &self,
        entity_id: &str,
        kind: EntityKind,
        top_k: usize,
        min_similarity: f64,
    ) -> Vec<SimilarityScore> {
        match kind {
            EntityKind::User => {
                let matrix = self.matrix.read();
                CollaborativeFilter::new(&matrix, &self.config).find_similar_users(
                    entity_id,
                    top_k,
                    min_similarity,
                )
            }
            EntityKind::Concert => {
                let matrix = self.matrix.read();
                CollaborativeFilter::new(&matrix, &self.config).find_similar_items(
                    entity_id,
                    top_k,
                    min_similarity,
                )
            }
            EntityKind::Artist => ContentFilter::new(&self.catalog, &self.config)
                .find_similar_artists(entity_id, top_k, min_similarity),
            EntityKind::Venue => ContentFilter::new(&self.catalog, &self.config)
                .find_similar_venues(entity_id, top_k, min_similarity),
        }
    }

    /// Batch fan-out across subjects, parallel over available cores.
    ///
    /// Per-subject failures are isolated: the failing subject gets an empty
    /// result and a logged warning, and the batch always returns exactly
    /// one entry per requested subject id.
    pub fn recommend_batch(
        &self,
        subject_ids: &[String],
        strategy: Strategy,
        top_k: usize,
        preferences_map: &HashMap<String, Preferences>,
    ) -> Result<HashMap<String, RecommendationResult>> {
        if top_k == 0 {
            return Err(EngineError::InvalidCount {
                name: "top_k",
                value: top_k,
            });
        }

        let results = subject_ids
            .par_iter()
            .map(|subject_id| {
                let preferences = preferences_map.get(subject_id).cloned().unwrap_or_default();
                let result = self
                    .recommend(subject_id, strategy, top_k, &preferences)
                    .unwrap_or_else(|error| {
                        warn!(subject_id, %error, "batch subject failed; returning empty result");
                        RecommendationResult::empty(subject_id.clone(), strategy)
                    });
                (subject_id.clone(), result)
            })
            .collect();

        Ok(results)
    }

    /// Engine size and health metrics.
    pub fn statistics(&self) -> EngineStatistics {
        EngineStatistics {
            matrix: self.matrix.read().statistics(),
            artist_count: self.catalog.artist_count(),
            venue_count: self.catalog.venue_count(),
            concert_count: self.catalog.concert_count(),
        }
    }
}

fn validate_strength(event: &InteractionEvent) -> Result<()> {
    if !event.strength.is_finite() || !(0.0..=1.0).contains(&event.strength) {
        return Err(EngineError::InvalidStrength {
            user_id: event.user_id.clone(),
            item_id: event.item_id.clone(),
            strength: event.strength,
        });
    }
    Ok(())
}
