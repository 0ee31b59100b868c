//! UUID minting and the build-time clock override.
//!
//! Two opaque identifier shapes are needed throughout the builder: the
//! 16-byte binary UUIDs stored in `Node`/`Manager` BLOB columns, and the
//! dashed 36-character hex string CSP expects inside material paths and
//! `BrushPatternImageArray` reference strings. Both come from the same
//! [`Minter`] so that a single seed override makes an entire build
//! (including the `CLYA` mtime field, which is otherwise wall-clock
//! derived) byte-for-byte reproducible.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Where a build's randomness and clock reading come from.
#[derive(Debug, Clone, Copy)]
pub enum RandomSource {
    /// True entropy and the real wall clock — the default for production
    /// builds.
    NonDeterministic,
    /// A fixed seed, used by tests that assert determinism (spec.md §8).
    /// The same seed also pins the `CLYA` mtime field so that two builds
    /// with identical inputs and seed produce identical bytes.
    Seeded(u64),
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::NonDeterministic
    }
}

/// Stateful source of UUIDs and the build mtime, scoped to one build.
pub struct Minter {
    rng: StdRng,
    mtime: u64,
}

impl Minter {
    pub fn new(source: RandomSource) -> Self {
        match source {
            RandomSource::NonDeterministic => Self {
                rng: StdRng::from_entropy(),
                mtime: current_unix_time(),
            },
            RandomSource::Seeded(seed) => Self {
                rng: StdRng::seed_from_u64(seed),
                mtime: seed,
            },
        }
    }

    /// Mints a 16-byte opaque UUID for a row's BLOB column. Not RFC-4122;
    /// CSP treats these bytes as opaque, and within-build collisions are
    /// vanishingly rare (spec.md §4.2).
    pub fn mint_binary_uuid(&mut self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }

    /// Mints a dashed lowercase hex UUID string for material paths and
    /// `BrushPatternImageArray` reference strings.
    pub fn mint_material_uuid_string(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        Uuid::from_bytes(bytes).hyphenated().to_string()
    }

    /// The mtime `CLYA` headers should stamp onto their TAR member.
    pub fn mtime(&self) -> u64 {
        self.mtime
    }
}

/// 16 zero bytes — the sentinel used for "no next sibling" / "no root"
/// UUID fields (spec.md invariants 1, 3, 6).
pub const NIL_UUID: [u8; 16] = [0u8; 16];

fn current_unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
