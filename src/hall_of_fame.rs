//! Hall of fame
//!
//! A bounded archive of the best individuals seen during a run, kept
//! sorted by ascending fitness.

use crate::genome::traits::Genome;
use crate::population::individual::Individual;

/// Bounded, sorted archive of the best individuals
///
/// Entries are independent copies and are never mutated after insertion.
/// Equal fitness values are allowed; a newcomer is placed after existing
/// entries with the same fitness.
#[derive(Clone, Debug)]
pub struct HallOfFame<G: Genome> {
    capacity: usize,
    entries: Vec<Individual<G>>,
}

impl<G: Genome> HallOfFame<G> {
    /// Create an empty hall of fame
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Offer a candidate, returning whether it was inserted
    ///
    /// Unevaluated candidates and NaN fitness are ignored. At capacity the
    /// candidate must be strictly better than the current worst entry, which
    /// is evicted.
    pub fn add(&mut self, candidate: &Individual<G>) -> bool {
        if !candidate.is_evaluated() || candidate.fitness.is_nan() || self.capacity == 0 {
            return false;
        }
        if self.is_full() {
            match self.entries.last() {
                Some(worst) if candidate.fitness.total_cmp(&worst.fitness).is_lt() => {
                    self.entries.pop();
                }
                _ => return false,
            }
        }
        let at = self
            .entries
            .partition_point(|e| e.fitness.total_cmp(&candidate.fitness).is_le());
        self.entries.insert(at, candidate.clone());
        true
    }

    /// Offer every candidate in order
    pub fn extend<'a, I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = &'a Individual<G>>,
    {
        for candidate in candidates {
            self.add(candidate);
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if the archive is at capacity
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Entries sorted by ascending fitness
    pub fn entries(&self) -> &[Individual<G>] {
        &self.entries
    }

    /// Best entry
    pub fn best(&self) -> Option<&Individual<G>> {
        self.entries.first()
    }

    /// Worst retained entry
    pub fn worst(&self) -> Option<&Individual<G>> {
        self.entries.last()
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the contents, keeping the best `capacity` candidates
    pub(crate) fn reset_with(&mut self, entries: Vec<Individual<G>>) {
        self.entries.clear();
        self.extend(entries.iter());
    }
}
