//! Coordinate hashing for deterministic, stateless seeding.
//!
//! Every seed is a pure function of integers (world seed, cell address,
//! index), chained through splitmix64. No wall-clock time, no float bounds.

use crate::quadtree::CellAddress;

/// Domain tag for cell ("TILE") keys.
pub const TILE_DOMAIN: u64 = 0x54_49_4C_45;
/// Domain tag for stub ("STAR") identities.
pub const STAR_DOMAIN: u64 = 0x53_54_41_52;

const HASH_BASIS: u64 = 0xA076_1D64_78BD_642F;

/// One round of the splitmix64 finalizer.
#[inline]
pub fn splitmix64(x: u64) -> u64 {
  let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
  z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  z ^ (z >> 31)
}

/// Fold a sequence of integers into one 64-bit hash.
#[inline]
pub fn hash64(values: &[u64]) -> u64 {
  values.iter().fold(HASH_BASIS, |h, v| splitmix64(h ^ v))
}

/// Seed key of a cell within a world.
#[inline]
pub fn tile_key(world_seed: u64, address: &CellAddress) -> u64 {
  hash64(&[
    TILE_DOMAIN,
    world_seed,
    u64::from(address.depth),
    u64::from(address.x),
    u64::from(address.y),
  ])
}

/// Stable identity of the `index`-th stub of a cell.
#[inline]
pub fn stub_id(tile_key: u64, index: u64) -> u64 {
  hash64(&[STAR_DOMAIN, tile_key, index])
}
