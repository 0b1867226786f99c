//! Collaborative filtering over the sparse interaction store.
//!
//! All methods are pure reads over a borrowed matrix snapshot, so they are
//! safe to run in parallel across independent subject requests.

use crate::matrix::{sparse_cosine, InteractionMatrix};
use crate::types::{
    rank_candidates, rank_similarities, EntityKind, Reason, RecommendationCandidate,
    RecommendationResult, SimilarityMethod, SimilarityScore, Strategy,
};
use crate::EngineConfig;
use std::collections::HashMap;
use tracing::debug;

/// Collaborative filtering engine borrowing a published matrix snapshot
pub struct CollaborativeFilter<'a> {
    matrix: &'a InteractionMatrix,
    config: &'a EngineConfig,
}

impl<'a> CollaborativeFilter<'a> {
    pub fn new(matrix: &'a InteractionMatrix, config: &'a EngineConfig) -> Self {
        Self { matrix, config }
    }

    /// Users most similar to the subject by sparse cosine over their item
    /// vectors. Unknown subject yields an empty list.
    pub fn find_similar_users(
        &self,
        subject_id: &str,
        top_k: usize,
        min_similarity: f64,
    ) -> Vec<SimilarityScore> {
        let Some(subject_vector) = self.matrix.user_vector(subject_id) else {
            return Vec::new();
        };

        let mut scores: Vec<SimilarityScore> = self
            .matrix
            .user_ids()
            .filter(|other| other.as_str() != subject_id)
            .filter_map(|other| {
                let other_vector = self.matrix.user_vector(other)?;
                let similarity = sparse_cosine(subject_vector, other_vector);
                (similarity >= min_similarity).then(|| SimilarityScore {
                    id_a: subject_id.to_string(),
                    id_b: other.clone(),
                    similarity,
                    method: SimilarityMethod::Cosine,
                })
            })
            .collect();

        rank_similarities(&mut scores);
        scores.truncate(top_k);
        scores
    }

    /// Items most similar to the given item by sparse cosine over their
    /// user vectors. Unknown item yields an empty list.
    pub fn find_similar_items(
        &self,
        item_id: &str,
        top_k: usize,
        min_similarity: f64,
    ) -> Vec<SimilarityScore> {
        let Some(item_vector) = self.matrix.item_vector(item_id) else {
            return Vec::new();
        };

        let mut scores: Vec<SimilarityScore> = self
            .matrix
            .item_ids()
            .filter(|other| other.as_str() != item_id)
            .filter_map(|other| {
                let other_vector = self.matrix.item_vector(other)?;
                let similarity = sparse_cosine(item_vector, other_vector);
                (similarity >= min_similarity).then(|| SimilarityScore {
                    id_a: item_id.to_string(),
                    id_b: other.clone(),
                    similarity,
                    method: SimilarityMethod::Cosine,
                })
            })
            .collect();

        rank_similarities(&mut scores);
        scores.truncate(top_k);
        scores
    }

    /// User-based recommendation: aggregate unseen items from the most
    /// similar users, weighted by neighbor similarity.
    ///
    /// Score is the similarity-weighted average of neighbor strengths;
    /// confidence saturates as accumulated neighbor similarity approaches
    /// the configured neighbor count.
    pub fn recommend_user_based(&self, subject_id: &str, top_k: usize) -> RecommendationResult {
        let Some(known) = self.matrix.user_vector(subject_id) else {
            return RecommendationResult::empty(subject_id, Strategy::CollaborativeUser);
        };

        let neighbors = self.find_similar_users(
            subject_id,
            self.config.neighbor_count,
            self.config.min_similarity_users,
        );
        if neighbors.is_empty() {
            return RecommendationResult::empty(subject_id, Strategy::CollaborativeUser);
        }

        // item -> (accumulated sim * strength, accumulated sim)
        let mut accumulated: HashMap<&str, (f64, f64)> = HashMap::new();

        for neighbor in &neighbors {
            let Some(neighbor_items) = self.matrix.user_vector(&neighbor.id_b) else {
                continue;
            };
            for (item_id, &strength) in neighbor_items {
                if known.contains_key(item_id) {
                    continue;
                }
                let entry = accumulated.entry(item_id.as_str()).or_insert((0.0, 0.0));
                entry.0 += neighbor.similarity * strength;
                entry.1 += neighbor.similarity;
            }
        }

        let total = accumulated.len();
        let neighbor_count = self.config.neighbor_count;

        let mut candidates: Vec<RecommendationCandidate> = accumulated
            .into_iter()
            .filter(|(_, (_, weight))| *weight > 0.0)
            .map(|(item_id, (score, weight))| RecommendationCandidate {
                item_id: item_id.to_string(),
                item_type: EntityKind::Concert,
                score: score / weight,
                confidence: (weight / neighbor_count as f64).min(1.0),
                reason: Reason::SimilarUsers {
                    neighbors: neighbors.len(),
                },
                metadata: HashMap::new(),
            })
            .collect();

        rank_candidates(&mut candidates);
        candidates.truncate(top_k);

        debug!(
            subject_id,
            neighbors = neighbors.len(),
            candidates = total,
            returned = candidates.len(),
            "user-based recommendations generated"
        );

        RecommendationResult {
            subject_id: subject_id.to_string(),
            recommendations: candidates,
            algorithm: Strategy::CollaborativeUser,
            total_candidates_considered: total,
        }
    }

    /// Item-based recommendation: anchor on each item the subject already
    /// knows and aggregate its nearest items, weighted by similarity and
    /// the subject's strength on the anchor.
    ///
    /// Confidence divides by the subject's own known-item count rather
    /// than the neighbor count used on the user side.
    pub fn recommend_item_based(&self, subject_id: &str, top_k: usize) -> RecommendationResult {
        let Some(known) = self.matrix.user_vector(subject_id) else {
            return RecommendationResult::empty(subject_id, Strategy::CollaborativeItem);
        };
        if known.is_empty() {
            return RecommendationResult::empty(subject_id, Strategy::CollaborativeItem);
        }

        let mut accumulated: HashMap<String, (f64, f64)> = HashMap::new();

        for (anchor_id, &anchor_strength) in known {
            let similar = self.find_similar_items(
                anchor_id,
                self.config.similar_items_per_anchor,
                self.config.min_similarity_items,
            );
            for neighbor in similar {
                if known.contains_key(&neighbor.id_b) {
                    continue;
                }
                let entry = accumulated.entry(neighbor.id_b).or_insert((0.0, 0.0));
                entry.0 += neighbor.similarity * anchor_strength;
                entry.1 += neighbor.similarity;
            }
        }

        let total = accumulated.len();
        let anchor_count = known.len();

        let mut candidates: Vec<RecommendationCandidate> = accumulated
            .into_iter()
            .filter(|(_, (_, weight))| *weight > 0.0)
            .map(|(item_id, (score, weight))| RecommendationCandidate {
                item_id,
                item_type: EntityKind::Concert,
                score: score / weight,
                confidence: (weight / anchor_count as f64).min(1.0),
                reason: Reason::SimilarItems {
                    anchors: anchor_count,
                },
                metadata: HashMap::new(),
            })
            .collect();

        rank_candidates(&mut candidates);
        candidates.truncate(top_k);

        debug!(
            subject_id,
            anchors = anchor_count,
            candidates = total,
            returned = candidates.len(),
            "item-based recommendations generated"
        );

        RecommendationResult {
            subject_id: subject_id.to_string(),
            recommendations: candidates,
            algorithm: Strategy::CollaborativeItem,
            total_candidates_considered: total,
        }
    }
}
