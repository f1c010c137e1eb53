//! Fixed-size combinations in lexicographic index order.

/// Iterator over every `K`-element combination of a slice.
///
/// Items come out in lexicographic order of their indices, so a sorted
/// input yields sorted combinations.
pub struct Combinations<'a, T, const K: usize> {
    items: &'a [T],
    indices: [usize; K],
    done: bool,
}

impl<'a, T: Copy, const K: usize> Combinations<'a, T, K> {
    #[must_use]
    pub fn new(items: &'a [T]) -> Self {
        let mut indices = [0; K];
        for (slot, index) in indices.iter_mut().enumerate() {
            *index = slot;
        }
        Self {
            items,
            indices,
            done: K > items.len(),
        }
    }

    fn advance(&mut self) {
        let n = self.items.len();
        let Some(pivot) = (0..K).rev().find(|&i| self.indices[i] != i + n - K) else {
            self.done = true;
            return;
        };
        self.indices[pivot] += 1;
        for i in pivot + 1..K {
            self.indices[i] = self.indices[i - 1] + 1;
        }
    }
}

impl<T: Copy, const K: usize> Iterator for Combinations<'_, T, K> {
    type Item = [T; K];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.map(|index| self.items[index]);
        self.advance();
        Some(current)
    }
}

/// `C(n, k)`, saturating at `u64::MAX`.
#[must_use]
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > u128::from(u64::MAX) {
            return u64::MAX;
        }
    }
    result as u64
}
