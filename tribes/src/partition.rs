// partition.rs - Contiguous row ranges for the partitioned updater

use std::ops::Range;

/// Rows `[start, start + steps)` owned by one worker for one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub start: usize,
    pub steps: usize,
}

impl Partition {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.steps
    }

    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }
}

/// Split `height` rows across `workers`.
///
/// Every worker gets `height / workers` rows, and the first `height % workers`
/// workers take one extra. Always returns exactly `workers` partitions, in
/// row order; trailing ones are empty when there are fewer rows than workers.
pub fn partition_rows(height: usize, workers: usize) -> Vec<Partition> {
    if workers == 0 {
        return Vec::new();
    }
    let base = height / workers;
    let mut remainder = height % workers;
    let mut start = 0;

    let mut partitions = Vec::with_capacity(workers);
    for _ in 0..workers {
        let mut steps = base;
        if remainder > 0 {
            steps += 1;
            remainder -= 1;
        }
        partitions.push(Partition { start, steps });
        start += steps;
    }
    partitions
}
