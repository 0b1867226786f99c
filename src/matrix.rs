//! Sparse interaction store.
//!
//! Owns the user-item interaction matrix as two mirrored views so both
//! user-centric and item-centric scans stay O(row). All mutation goes
//! through a single insertion path that updates both views, keeping the
//! `by_user[u][i] == by_item[i][u]` invariant from drifting.

use crate::types::{InteractionEvent, MatrixStatistics};
use std::collections::HashMap;

/// Sparse user-item interaction matrix with mirrored views
#[derive(Debug, Clone, Default)]
pub struct InteractionMatrix {
    by_user: HashMap<String, HashMap<String, f64>>,
    by_item: HashMap<String, HashMap<String, f64>>,
    interaction_count: usize,
}

impl InteractionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matrix from a batch of events in one pass.
    /// Last write wins per (user, item) pair.
    pub fn from_events(events: &[InteractionEvent]) -> Self {
        let mut matrix = Self::new();
        for event in events {
            matrix.insert(&event.user_id, &event.item_id, event.strength);
        }
        matrix
    }

    /// Insert or overwrite a (user, item) strength in both mirrored views.
    pub fn insert(&mut self, user_id: &str, item_id: &str, strength: f64) {
        let previous = self
            .by_user
            .entry(user_id.to_string())
            .or_default()
            .insert(item_id.to_string(), strength);
        self.by_item
            .entry(item_id.to_string())
            .or_default()
            .insert(user_id.to_string(), strength);

        if previous.is_none() {
            self.interaction_count += 1;
        }
    }

    pub fn user_vector(&self, user_id: &str) -> Option<&HashMap<String, f64>> {
        self.by_user.get(user_id)
    }

    pub fn item_vector(&self, item_id: &str) -> Option<&HashMap<String, f64>> {
        self.by_item.get(item_id)
    }

    pub fn user_ids(&self) -> impl Iterator<Item = &String> {
        self.by_user.keys()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &String> {
        self.by_item.keys()
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    pub fn item_count(&self) -> usize {
        self.by_item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interaction_count == 0
    }

    /// Size and sparsity metrics. Sparsity is 1.0 for an empty matrix.
    pub fn statistics(&self) -> MatrixStatistics {
        let users = self.by_user.len();
        let items = self.by_item.len();
        let interactions = self.interaction_count;

        let sparsity = if users == 0 || items == 0 {
            1.0
        } else {
            1.0 - interactions as f64 / (users as f64 * items as f64)
        };

        let avg_interactions_per_user = if users == 0 {
            0.0
        } else {
            interactions as f64 / users as f64
        };

        MatrixStatistics {
            user_count: users,
            item_count: items,
            interaction_count: interactions,
            sparsity,
            avg_interactions_per_user,
        }
    }

    /// Verify the mirror invariant holds in both directions. Test support.
    #[cfg(test)]
    pub(crate) fn is_mirrored(&self) -> bool {
        self.by_user.iter().all(|(u, row)| {
            row.iter()
                .all(|(i, v)| self.by_item.get(i).and_then(|col| col.get(u)) == Some(v))
        }) && self.by_item.iter().all(|(i, col)| {
            col.iter()
                .all(|(u, v)| self.by_user.get(u).and_then(|row| row.get(i)) == Some(v))
        })
    }
}

/// Sparse cosine similarity between two strength vectors.
///
/// The dot product runs over dimensions present in both vectors; the norms
/// run over each vector's full support. Zero-magnitude vectors score 0.
pub fn sparse_cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    // Iterate the smaller map for the intersection
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let dot: f64 = small
        .iter()
        .filter_map(|(dim, &va)| large.get(dim).map(|&vb| va * vb))
        .sum();

    let norm_a: f64 = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(user: &str, item: &str, strength: f64) -> InteractionEvent {
        InteractionEvent::new(user, item, strength, Utc::now())
    }

    #[test]
    fn test_insert_updates_both_views() {
        let mut matrix = InteractionMatrix::new();
        matrix.insert("u1", "c1", 0.8);

        assert_eq!(matrix.user_vector("u1").unwrap().get("c1"), Some(&0.8));
        assert_eq!(matrix.item_vector("c1").unwrap().get("u1"), Some(&0.8));
        assert!(matrix.is_mirrored());
    }

    #[test]
    fn test_overwrite_is_last_write_wins() {
        let mut matrix = InteractionMatrix::new();
        matrix.insert("u1", "c1", 0.3);
        matrix.insert("u1", "c1", 0.9);

        assert_eq!(matrix.statistics().interaction_count, 1);
        assert_eq!(matrix.user_vector("u1").unwrap().get("c1"), Some(&0.9));
        assert_eq!(matrix.item_vector("c1").unwrap().get("u1"), Some(&0.9));
        assert!(matrix.is_mirrored());
    }

    #[test]
    fn test_from_events_rebuilds() {
        let matrix = InteractionMatrix::from_events(&[
            event("u1", "c1", 1.0),
            event("u1", "c2", 0.8),
            event("u2", "c1", 0.5),
        ]);

        assert_eq!(matrix.user_count(), 2);
        assert_eq!(matrix.item_count(), 2);
        assert_eq!(matrix.statistics().interaction_count, 3);
        assert!(matrix.is_mirrored());
    }

    #[test]
    fn test_empty_matrix_statistics() {
        let stats = InteractionMatrix::new().statistics();
        assert_eq!(stats.user_count, 0);
        assert_eq!(stats.item_count, 0);
        assert_eq!(stats.interaction_count, 0);
        assert_eq!(stats.sparsity, 1.0);
        assert_eq!(stats.avg_interactions_per_user, 0.0);
    }

    #[test]
    fn test_sparsity_in_unit_range() {
        let matrix = InteractionMatrix::from_events(&[
            event("u1", "c1", 1.0),
            event("u2", "c2", 1.0),
        ]);
        let stats = matrix.statistics();

        // 2 interactions over a 2x2 grid
        assert!((stats.sparsity - 0.5).abs() < 1e-9);
        assert!(stats.sparsity >= 0.0 && stats.sparsity <= 1.0);
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let a = HashMap::from([("c1".to_string(), 1.0), ("c2".to_string(), 0.5)]);
        assert!((sparse_cosine(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_disjoint_support() {
        let a = HashMap::from([("c1".to_string(), 1.0)]);
        let b = HashMap::from([("c2".to_string(), 1.0)]);
        assert_eq!(sparse_cosine(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_symmetric() {
        let a = HashMap::from([("c1".to_string(), 1.0), ("c2".to_string(), 0.8)]);
        let b = HashMap::from([("c1".to_string(), 1.0), ("c3".to_string(), 0.9)]);
        assert_eq!(sparse_cosine(&a, &b), sparse_cosine(&b, &a));
    }

    #[test]
    fn test_cosine_zero_magnitude() {
        let a = HashMap::from([("c1".to_string(), 0.0)]);
        let b = HashMap::from([("c1".to_string(), 1.0)]);
        assert_eq!(sparse_cosine(&a, &b), 0.0);
        assert_eq!(sparse_cosine(&a, &HashMap::new()), 0.0);
    }

    #[test]
    fn test_cosine_norms_over_full_support() {
        // Shared dim c1 only; norms must still include c2 and c3
        let a = HashMap::from([("c1".to_string(), 1.0), ("c2".to_string(), 0.8)]);
        let b = HashMap::from([("c1".to_string(), 1.0), ("c3".to_string(), 0.9)]);

        let expected = 1.0 / ((1.0f64 + 0.64).sqrt() * (1.0f64 + 0.81).sqrt());
        assert!((sparse_cosine(&a, &b) - expected).abs() < 1e-12);
    }
}
