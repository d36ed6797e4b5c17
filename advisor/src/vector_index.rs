use std::cmp::Ordering;

use crate::error::{IndexBuildError, IndexQueryError};

/// Flat exact nearest-neighbor index over fixed-dimension vectors, ranked by
/// squared Euclidean distance. Built once after embedding and read-only
/// thereafter; no incremental updates or deletion.
pub struct VectorIndex {
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

impl VectorIndex {
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self, IndexBuildError> {
        let Some(first) = vectors.first() else {
            return Err(IndexBuildError::Empty);
        };

        let dimension = first.len();
        for (row, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(IndexBuildError::DimensionMismatch {
                    expected: dimension,
                    found: vector.len(),
                    row,
                });
            }
        }

        Ok(Self { vectors, dimension })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Up to `k` `(id, squared_distance)` pairs, ascending by distance.
    /// Fewer than `k` only when the index holds fewer vectors. Equal
    /// distances keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, IndexQueryError> {
        if k == 0 {
            return Err(IndexQueryError::InvalidK);
        }
        if self.vectors.is_empty() {
            return Err(IndexQueryError::EmptyIndex);
        }
        if query.len() != self.dimension {
            return Err(IndexQueryError::DimensionMismatch {
                expected: self.dimension,
                found: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, vector)| (id, squared_l2(query, vector)))
            .collect();

        // sort_by is stable, so ties resolve to insertion order
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> VectorIndex {
        VectorIndex::build(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn build_rejects_empty_input() {
        assert!(matches!(
            VectorIndex::build(Vec::new()),
            Err(IndexBuildError::Empty)
        ));
    }

    #[test]
    fn build_rejects_mixed_dimensionality() {
        let result = VectorIndex::build(vec![vec![1.0, 2.0], vec![1.0]]);
        assert!(matches!(
            result,
            Err(IndexBuildError::DimensionMismatch {
                expected: 2,
                found: 1,
                row: 1,
            })
        ));
    }

    #[test]
    fn search_ranks_by_squared_distance() {
        let index = sample_index();
        let hits = index.search(&[0.1, 0.0], 4).unwrap();

        let ids: Vec<usize> = hits.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        for pair in hits.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
        assert!((hits[0].1 - 0.01).abs() < 1e-6);
    }

    #[test]
    fn search_returns_exactly_k_results() {
        let index = sample_index();
        assert_eq!(index.search(&[0.0, 0.0], 2).unwrap().len(), 2);
    }

    #[test]
    fn search_caps_at_index_size_for_large_k() {
        let index = sample_index();
        assert_eq!(index.search(&[0.0, 0.0], 10).unwrap().len(), 4);
    }

    #[test]
    fn equal_distances_keep_insertion_order() {
        let index = VectorIndex::build(vec![
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![5.0, 5.0],
        ])
        .unwrap();

        let hits = index.search(&[0.0, 1.0], 3).unwrap();
        let ids: Vec<usize> = hits.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(hits[0].1, hits[1].1);
    }

    #[test]
    fn search_rejects_zero_k() {
        let index = sample_index();
        assert!(matches!(
            index.search(&[0.0, 0.0], 0),
            Err(IndexQueryError::InvalidK)
        ));
    }

    #[test]
    fn search_rejects_mismatched_query_width() {
        let index = sample_index();
        assert!(matches!(
            index.search(&[0.0, 0.0, 0.0], 1),
            Err(IndexQueryError::DimensionMismatch {
                expected: 2,
                found: 3,
            })
        ));
    }

    #[test]
    fn repeated_searches_are_identical() {
        let index = sample_index();
        let first = index.search(&[0.3, 0.7], 3).unwrap();
        let second = index.search(&[0.3, 0.7], 3).unwrap();
        assert_eq!(first, second);
    }
}
