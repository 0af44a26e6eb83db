//! A move list implementation that avoids heap allocations.

use crate::constants::MAX_SQUARES;
use crate::r#move::Candidate;
use crate::square::Square;
use std::ops::Index;

// Drops can target every square; castling adds at most two extra entries.
const MAX_MOVES: usize = MAX_SQUARES + 2;

#[derive(Debug, Clone)]
pub struct MoveList {
    moves: [Candidate; MAX_MOVES],
    count: usize,
}

impl MoveList {
    pub fn new() -> Self {
        Self {
            moves: [Candidate::new(Square::new(0, 0)); MAX_MOVES],
            count: 0,
        }
    }

    pub fn add(&mut self, mv: Candidate) {
        if self.count < MAX_MOVES {
            self.moves[self.count] = mv;
            self.count += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.moves[0..self.count]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.as_slice().iter()
    }

    /// First candidate landing on `to`.
    pub fn find(&self, to: Square) -> Option<Candidate> {
        self.iter().copied().find(|c| c.to == to)
    }

    pub fn contains(&self, to: Square) -> bool {
        self.find(to).is_some()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Candidate;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
