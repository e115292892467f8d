// src/core/storage/int_set.rs

//! The compact set encoding: a sorted array of distinct integers.

use rand::Rng;

/// Sorted, duplicate-free `i64` array. Membership is a binary search; random
/// sampling is a uniform index pick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntSet {
    items: Vec<i64>,
}

impl IntSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts `n`, keeping the array sorted. Returns false if already present.
    pub fn add(&mut self, n: i64) -> bool {
        match self.items.binary_search(&n) {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, n);
                true
            }
        }
    }

    /// Removes `n`. Returns false if absent.
    pub fn remove(&mut self, n: i64) -> bool {
        match self.items.binary_search(&n) {
            Ok(pos) => {
                self.items.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, n: i64) -> bool {
        self.items.binary_search(&n).is_ok()
    }

    pub fn get(&self, idx: usize) -> Option<i64> {
        self.items.get(idx).copied()
    }

    /// A uniformly random member.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<i64> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items[rng.gen_range(0..self.items.len())])
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.items.iter().copied()
    }

    pub fn memory_usage(&self) -> usize {
        self.items.len() * std::mem::size_of::<i64>()
    }
}
