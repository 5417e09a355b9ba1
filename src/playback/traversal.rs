use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next,
    /// Ran off the end with repeat on; back at position 0
    Wrapped,
    Exhausted,
}

/// Walk order over a playlist. The order is fixed for a whole pass and only
/// reshuffled when repeat wraps around.
#[derive(Debug, Clone)]
pub struct Traversal {
    order: Vec<usize>,
    cursor: usize,
    shuffle: bool,
    repeat: bool,
}

impl Traversal {
    pub fn new(len: usize, shuffle: bool, repeat: bool) -> Self {
        Self {
            order: initial_order(len, shuffle),
            cursor: 0,
            shuffle,
            repeat,
        }
    }

    /// Index into the playlist for the current position
    pub fn current(&self) -> Option<usize> {
        self.order.get(self.cursor).copied()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn advance(&mut self) -> Advance {
        self.cursor += 1;
        if self.cursor < self.order.len() {
            return Advance::Next;
        }

        if self.repeat && !self.order.is_empty() {
            if self.shuffle {
                self.order = shuffled_order(self.order.len());
            }
            self.cursor = 0;
            Advance::Wrapped
        } else {
            Advance::Exhausted
        }
    }
}

fn initial_order(len: usize, shuffle: bool) -> Vec<usize> {
    if shuffle {
        shuffled_order(len)
    } else {
        (0..len).collect()
    }
}

/// Uniform random permutation of 0..len
pub fn shuffled_order(len: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(&mut rand::thread_rng());
    order
}
