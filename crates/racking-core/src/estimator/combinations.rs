/// Lazily enumerates multisets of `size` indices drawn from `0..pool`.
///
/// Index lists are non-decreasing and produced in lexicographic order, so
/// `(0, 0)` comes before `(0, 1)` before `(1, 1)`.
#[derive(Debug, Clone)]
pub struct CombinationsWithReplacement {
    pool: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl CombinationsWithReplacement {
    pub fn new(pool: usize, size: usize) -> Self {
        Self {
            pool,
            indices: vec![0; size],
            started: false,
            done: pool == 0 && size > 0,
        }
    }
}

impl Iterator for CombinationsWithReplacement {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        // Rightmost position that can still be bumped
        let Some(pos) = self.indices.iter().rposition(|&i| i + 1 < self.pool) else {
            self.done = true;
            return None;
        };
        let next = self.indices[pos] + 1;
        for slot in &mut self.indices[pos..] {
            *slot = next;
        }
        Some(self.indices.clone())
    }
}
