use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::catalog::CatalogError;
use super::features::tokenize;

/// L2-normalized sparse TF-IDF vector, sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product of two sparse vectors (merge over sorted indices)
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity; zero when either vector has no terms
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            0.0
        } else {
            self.dot(other) / denom
        }
    }
}

/// Frozen term-weighted vector space over the synthesized catalog documents
///
/// Built once; rows are addressed by catalog position. Term weights are raw
/// term frequency times smoothed inverse document frequency
/// (`ln((1 + n) / (1 + df)) + 1`), then L2-normalized per document.
#[derive(Debug)]
pub struct VectorSpaceModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
}

impl VectorSpaceModel {
    /// Builds the vocabulary, IDF weights and one vector per document
    pub fn build(documents: &[String]) -> Result<Self, CatalogError> {
        if documents.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        // Sorted vocabulary keeps term indices stable across builds
        let terms: BTreeSet<&str> = documents.iter().flat_map(|d| tokenize(d)).collect();
        if terms.is_empty() {
            return Err(CatalogError::EmptyVocabulary);
        }
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let term_counts: Vec<BTreeMap<usize, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = BTreeMap::new();
                for term in tokenize(doc) {
                    if let Some(&idx) = vocabulary.get(term) {
                        *counts.entry(idx).or_insert(0) += 1;
                    }
                }
                counts
            })
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for counts in &term_counts {
            for idx in counts.keys() {
                doc_freq[*idx] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = term_counts
            .into_iter()
            .map(|counts| {
                let mut entries: Vec<(usize, f64)> = counts
                    .into_iter()
                    .map(|(idx, tf)| (idx, tf as f64 * idf[idx]))
                    .collect();
                let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in entries.iter_mut() {
                        *w /= norm;
                    }
                }
                SparseVector { entries }
            })
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            vectors,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// IDF weight of a term, if it is in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&idx| self.idf[idx])
    }

    pub fn vector(&self, pos: usize) -> Option<&SparseVector> {
        self.vectors.get(pos)
    }

    /// Elementwise mean of the vectors at `positions`
    ///
    /// Out-of-range positions are skipped; `None` when nothing remains.
    pub fn mean_profile(&self, positions: &[usize]) -> Option<SparseVector> {
        let rows: Vec<&SparseVector> = positions
            .iter()
            .filter_map(|&pos| self.vectors.get(pos))
            .collect();
        if rows.is_empty() {
            return None;
        }

        let mut sums: BTreeMap<usize, f64> = BTreeMap::new();
        for row in &rows {
            for &(idx, w) in row.entries() {
                *sums.entry(idx).or_insert(0.0) += w;
            }
        }

        let count = rows.len() as f64;
        Some(SparseVector {
            entries: sums.into_iter().map(|(idx, w)| (idx, w / count)).collect(),
        })
    }

    /// Cosine similarity of the mean profile of `positions` against every row
    pub fn mean_profile_similarities(&self, positions: &[usize]) -> Option<Vec<f64>> {
        let profile = self.mean_profile(positions)?;
        let profile_norm = profile.norm();
        Some(
            self.vectors
                .iter()
                .map(|v| {
                    let denom = profile_norm * v.norm();
                    if denom == 0.0 {
                        0.0
                    } else {
                        profile.dot(v) / denom
                    }
                })
                .collect(),
        )
    }

    /// Cosine similarity between one row and each reference row
    ///
    /// Out-of-range reference positions are skipped.
    pub fn pairwise(&self, pos: usize, references: &[usize]) -> Vec<(usize, f64)> {
        let Some(vector) = self.vectors.get(pos) else {
            return Vec::new();
        };
        references
            .iter()
            .filter_map(|&r| self.vectors.get(r).map(|other| (r, vector.cosine(other))))
            .collect()
    }
}
