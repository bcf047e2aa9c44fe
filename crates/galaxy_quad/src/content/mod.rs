//! Deterministic per-cell content.
//!
//! The quadtree only asks a [`StubGenerator`] for content of the leaves it
//! selects. A richer content source can replace [`StarStubGenerator`] as long
//! as it keys off the same [`CellAddress`](crate::quadtree::CellAddress).

pub mod hash;
pub mod stub;

pub use hash::{hash64, splitmix64, stub_id, tile_key};
pub use stub::{ContentStub, StarStubConfig, StarStubGenerator, StubGenerator};
