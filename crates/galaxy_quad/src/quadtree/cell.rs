//! Cell - a quadtree node with lazily materialized children and content.
//!
//! Both the children and the stub cache start absent and are filled exactly
//! once through a `OnceLock`. Concurrent first use is idempotent: a single
//! initializer runs and every caller observes its result. After that a cell
//! is never mutated again and reads are lock-free.

use std::sync::OnceLock;

use super::{CellAddress, Quadrant};
use crate::content::{ContentStub, StubGenerator};
use crate::geometry::DAabb2;

/// Axis-aligned quadtree cell.
#[derive(Debug)]
pub struct Cell {
  address: CellAddress,
  bounds: DAabb2,
  children: OnceLock<Box<[Cell; 4]>>,
  stubs: OnceLock<Vec<ContentStub>>,
}

impl Cell {
  /// Create an unexpanded cell.
  pub(crate) fn new(address: CellAddress, bounds: DAabb2) -> Self {
    Self {
      address,
      bounds,
      children: OnceLock::new(),
      stubs: OnceLock::new(),
    }
  }

  #[inline]
  pub fn address(&self) -> CellAddress {
    self.address
  }

  #[inline]
  pub fn bounds(&self) -> &DAabb2 {
    &self.bounds
  }

  #[inline]
  pub fn depth(&self) -> u32 {
    self.address.depth
  }

  /// True while children have never been materialized.
  #[inline]
  pub fn is_frontier(&self) -> bool {
    self.children.get().is_none()
  }

  /// Existing children in quadrant order, without creating them.
  #[inline]
  pub fn children(&self) -> Option<&[Cell; 4]> {
    self.children.get().map(|c| &**c)
  }

  /// Existing child in `quadrant`, without creating it.
  #[inline]
  pub fn child(&self, quadrant: Quadrant) -> Option<&Cell> {
    self.children().map(|c| &c[quadrant.index()])
  }

  /// Create the four children on first call; later calls are no-ops.
  ///
  /// # Panics
  ///
  /// In debug builds, when the cell is at
  /// [`MAX_SUPPORTED_DEPTH`](super::MAX_SUPPORTED_DEPTH).
  pub fn ensure_children(&self) -> &[Cell; 4] {
    self.materialize_children().0
  }

  /// Like [`Cell::ensure_children`], also reporting whether this call
  /// created them.
  pub(crate) fn materialize_children(&self) -> (&[Cell; 4], bool) {
    let mut created = false;
    let children = self.children.get_or_init(|| {
      created = true;
      Box::new(Quadrant::ALL.map(|q| Cell::new(self.address.child(q), self.bounds.quadrant(q))))
    });
    (children, created)
  }

  /// Cached stubs, if they were generated already.
  #[inline]
  pub fn cached_stubs(&self) -> Option<&[ContentStub]> {
    self.stubs.get().map(Vec::as_slice)
  }

  /// Stub list for this cell, generating and caching it on first request.
  pub fn stubs(&self, generator: &dyn StubGenerator) -> &[ContentStub] {
    self.materialize_stubs(generator).0
  }

  pub(crate) fn materialize_stubs(&self, generator: &dyn StubGenerator) -> (&[ContentStub], bool) {
    let mut created = false;
    let stubs = self.stubs.get_or_init(|| {
      created = true;
      generator.generate(&self.address, &self.bounds)
    });
    (stubs, created)
  }

  /// Number of cells in this subtree that exist, including this one.
  pub fn materialized_count(&self) -> usize {
    1 + self
      .children()
      .map_or(0, |c| c.iter().map(Cell::materialized_count).sum())
  }

  /// Visit every materialized cell of this subtree, parents before children.
  pub fn for_each_materialized<'a>(&'a self, f: &mut impl FnMut(&'a Cell)) {
    f(self);
    if let Some(children) = self.children() {
      for child in children {
        child.for_each_materialized(f);
      }
    }
  }
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;
