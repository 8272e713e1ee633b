//! # Bounded decreasing heap
//!
//! A fixed-capacity container that keeps the largest `(measure, id)` pairs offered to it.
//! While filling it is a min-heap on the measure, so that the smallest kept pair can be
//! replaced in logarithmic time once the capacity is reached. A final sort turns it into a
//! descending array for consumption.
//!
//! Slots are numbered from one: after sorting, slot `1` holds the maximum measure and slot
//! `len()` the smallest kept measure, which bounds the measure of every pair that was pushed
//! but not kept.

/// A bounded collection of the largest `(measure, id)` pairs.
#[derive(Clone, Debug)]
pub struct DecreasingHeap {
    capacity: usize,
    /// One-based; slot 0 is unused.
    measure: Vec<f64>,
    id: Vec<usize>,
    len: usize,
}

impl DecreasingHeap {
    /// Create an empty heap keeping at most `capacity` pairs.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);

        Self {
            capacity,
            measure: vec![0.0; 1 + capacity],
            id: vec![0; 1 + capacity],
            len: 0,
        }
    }

    /// Remove all pairs.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// The number of kept pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no pairs are kept.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offer a pair.
    ///
    /// Kept if there is room, or if its measure beats the smallest kept pair, which is then
    /// dropped. Equal measures are won by the smaller id.
    pub fn push(&mut self, measure: f64, id: usize) {
        if self.len < self.capacity {
            self.len += 1;
            self.measure[self.len] = measure;
            self.id[self.len] = id;
            self.sift_up(self.len);
        } else if Self::stronger(measure, id, self.measure[1], self.id[1]) {
            // Beats the smallest kept pair.
            self.measure[1] = measure;
            self.id[1] = id;
            self.sift_down(1);
        }
    }

    /// Finalise as a descending array.
    ///
    /// After this call `entry(1)` holds the maximum measure and entries are ordered by
    /// decreasing measure, ties by increasing id. The heap should be cleared before reuse.
    pub fn sort_decreasing(&mut self) {
        let mut pairs = (1..=self.len)
            .map(|k| (self.measure[k], self.id[k]))
            .collect::<Vec<_>>();
        pairs.sort_unstable_by(|&(m_a, id_a), &(m_b, id_b)| {
            m_b.total_cmp(&m_a).then(id_a.cmp(&id_b))
        });
        for (k, (measure, id)) in pairs.into_iter().enumerate() {
            self.measure[1 + k] = measure;
            self.id[1 + k] = id;
        }
    }

    /// The pair in a one-based slot. Meaningful order only after `sort_decreasing`.
    pub fn entry(&self, slot: usize) -> (f64, usize) {
        debug_assert!(1 <= slot && slot <= self.len);

        (self.measure[slot], self.id[slot])
    }

    /// Whether the left pair is kept in preference to the right one: a larger measure, or the
    /// same measure with a smaller id.
    fn stronger(measure_a: f64, id_a: usize, measure_b: f64, id_b: usize) -> bool {
        measure_a > measure_b || (measure_a == measure_b && id_a < id_b)
    }

    fn sift_up(&mut self, mut k: usize) {
        while k > 1 {
            let parent = k / 2;
            if Self::stronger(self.measure[parent], self.id[parent], self.measure[k], self.id[k]) {
                self.measure.swap(parent, k);
                self.id.swap(parent, k);
                k = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut k: usize) {
        loop {
            let mut smallest = k;
            for child in [2 * k, 2 * k + 1] {
                if child <= self.len
                    && Self::stronger(
                        self.measure[smallest], self.id[smallest],
                        self.measure[child], self.id[child],
                    )
                {
                    smallest = child;
                }
            }
            if smallest == k {
                break;
            }
            self.measure.swap(smallest, k);
            self.id.swap(smallest, k);
            k = smallest;
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use crate::data::heap::DecreasingHeap;

    #[test]
    fn keeps_the_largest() {
        let mut heap = DecreasingHeap::new(3);
        for (measure, id) in [(1.0, 0), (5.0, 1), (3.0, 2), (4.0, 3), (0.5, 4)] {
            heap.push(measure, id);
        }
        heap.sort_decreasing();

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.entry(1), (5.0, 1));
        assert_eq!(heap.entry(2), (4.0, 3));
        assert_eq!(heap.entry(3), (3.0, 2));
    }

    #[test]
    fn ties_prefer_smaller_id() {
        let mut heap = DecreasingHeap::new(2);
        heap.push(1.0, 7);
        heap.push(1.0, 3);
        heap.push(1.0, 5);
        heap.sort_decreasing();

        assert_eq!(heap.entry(1), (1.0, 3));
        assert_eq!(heap.entry(2), (1.0, 5));
    }

    proptest! {
        /// After sorting, measures are non-increasing and equal to the largest offered.
        #[test]
        fn sorted_decreasing(measures in prop::collection::vec(0.0..1e6_f64, 1..40)) {
            let capacity = 10;
            let mut heap = DecreasingHeap::new(capacity);
            for (id, &measure) in measures.iter().enumerate() {
                heap.push(measure, id);
            }
            heap.sort_decreasing();

            for slot in 1..heap.len() {
                prop_assert!(heap.entry(slot).0 >= heap.entry(slot + 1).0);
            }

            let mut reference = measures.clone();
            reference.sort_unstable_by(|a, b| b.total_cmp(a));
            reference.truncate(capacity);
            let kept = (1..=heap.len()).map(|k| heap.entry(k).0).collect::<Vec<_>>();
            prop_assert_eq!(kept, reference);
        }
    }
}
