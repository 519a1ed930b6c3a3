//! Deterministic random number generation for demo data.
//!
//! RULE: demo data never touches a platform RNG. Every draw comes from a
//! `SeededRng` derived from one master seed, one stream per `DataSlot`,
//! so the same seed always yields the same store contents and a new slot
//! never shifts the existing streams.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct SeededRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SeededRng {
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Integer in [0, n). Zero when `n` is zero.
    pub fn below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.inner.next_u64() % n
    }

    /// Integer in [lo, hi].
    pub fn range_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        lo + self.below(hi - lo + 1)
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// A uniformly chosen element, `None` on an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let idx = self.below(items.len() as u64) as usize;
        items.get(idx)
    }

    /// Sixteen bytes for a v4-shaped id.
    pub fn uuid(&mut self) -> uuid::Uuid {
        let mut bytes = [0u8; 16];
        self.inner.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_slot(&self, slot: DataSlot) -> SeededRng {
        SeededRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream assignments. Append only; reordering reseeds every stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum DataSlot {
    Users = 0,
    Skills = 1,
    Activities = 2,
    Assignments = 3,
    TimeEntries = 4,
}

impl DataSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Skills => "skills",
            Self::Activities => "activities",
            Self::Assignments => "assignments",
            Self::TimeEntries => "time_entries",
        }
    }
}
