//! Seeded pseudo-random stream for plan generation.
//!
//! A day's randomness is derived entirely from a string key, so regenerating
//! the same (user, week, date) reproduces the same choices without storing
//! any generator state. Both the hash (32-bit FNV-1a) and the generator
//! (mulberry32) are fixed: changing either changes every generated plan.

use chrono::NaiveDate;
use uuid::Uuid;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// 32-bit FNV-1a hash over the UTF-8 bytes of `key`.
pub fn fnv1a32(key: &str) -> u32 {
    key.bytes()
        .fold(FNV_OFFSET_BASIS, |h, b| (h ^ u32::from(b)).wrapping_mul(FNV_PRIME))
}

/// The seed key for one calendar day of one user's week:
/// `"{user_id}|{monday}|{date}"` with ISO dates.
pub fn seed_key(user_id: Uuid, monday: NaiveDate, date: NaiveDate) -> String {
    format!("{user_id}|{monday}|{date}")
}

/// mulberry32 generator yielding floats in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed from a string key via [`fnv1a32`].
    pub fn from_key(key: &str) -> Self {
        Self::new(fnv1a32(key))
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / TWO_POW_32
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    pub fn next_index(&mut self, bound: usize) -> usize {
        // next_f64 < 1, so the product stays below bound.
        (self.next_f64() * bound as f64).floor() as usize
    }

    /// In-place Fisher-Yates shuffle, walking from the last index down to 1.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}
