use std::{cmp::Ordering, collections::BinaryHeap};

struct Entry<T, S> {
    score: S,
    value: T,
}

impl<T, S: Ord> PartialEq for Entry<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}

impl<T, S: Ord> Eq for Entry<T, S> {}

impl<T, S: Ord> PartialOrd for Entry<T, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, S: Ord> Ord for Entry<T, S> {
    // Reversed so the max-heap pops the lowest score first
    fn cmp(&self, other: &Self) -> Ordering {
        other.score.cmp(&self.score)
    }
}

/// Min-ordered priority queue keyed by a caller-supplied scoring function.
///
/// Scores are computed once, on insertion. Elements with equal scores come
/// out in unspecified order.
pub struct Heap<T, S, F>
where
    S: Ord,
    F: Fn(&T) -> S,
{
    entries: BinaryHeap<Entry<T, S>>,
    score: F,
}

impl<T, S, F> Heap<T, S, F>
where
    S: Ord,
    F: Fn(&T) -> S,
{
    pub fn new(score: F) -> Self {
        Self {
            entries: BinaryHeap::new(),
            score,
        }
    }

    pub fn push(&mut self, value: T) {
        let score = (self.score)(&value);
        self.entries.push(Entry { score, value });
    }

    /// Removes and returns the lowest-scored element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop().map(|entry| entry.value)
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.peek().map(|entry| &entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
