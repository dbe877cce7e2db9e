use std::cmp::Ordering;

/// Scored payloads that the heap can rank.
pub trait Ranked {
    fn score(&self) -> u32;
}

/// One-shot binary max-heap used to turn an unordered set of scored items
/// into a descending leaderboard.
///
/// Equal scores are ordered by the item's position in the input slice, so
/// tied players rank in registration order.
#[derive(Debug)]
pub struct MaxHeap<T> {
    /// (item, original index) pairs; the index is the tie-break key.
    entries: Vec<(T, usize)>,
}

impl<T: Ranked + Clone> MaxHeap<T> {
    /// Builds a heap from a slice in O(n). The input is copied, never
    /// mutated.
    pub fn from_slice(items: &[T]) -> Self {
        let entries: Vec<(T, usize)> = items
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, item)| (item, index))
            .collect();

        let mut heap = Self { entries };
        for at in (0..heap.entries.len() / 2).rev() {
            heap.sift_down(at);
        }
        heap
    }

    /// Drains the heap into a vector ordered by descending score,
    /// consuming it. Each extraction is O(log n); the full drain is
    /// O(n log n).
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.entries.len());
        while let Some(item) = self.extract_max() {
            sorted.push(item);
        }
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn extract_max(&mut self) -> Option<T> {
        let last = self.entries.len().checked_sub(1)?;
        self.entries.swap(0, last);
        let (item, _) = self.entries.pop()?;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    fn sift_down(&mut self, mut at: usize) {
        loop {
            let left = 2 * at + 1;
            let right = left + 1;
            let mut largest = at;

            if left < self.entries.len() && self.beats(left, largest) {
                largest = left;
            }
            if right < self.entries.len() && self.beats(right, largest) {
                largest = right;
            }
            if largest == at {
                return;
            }
            self.entries.swap(at, largest);
            at = largest;
        }
    }

    /// Higher score wins; equal scores fall back to the earlier input
    /// index.
    fn beats(&self, a: usize, b: usize) -> bool {
        let (item_a, index_a) = &self.entries[a];
        let (item_b, index_b) = &self.entries[b];
        match item_a.score().cmp(&item_b.score()) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => index_a < index_b,
        }
    }
}
