//! CellAddress - immutable integer grid position of a quadtree cell.
//!
//! Cells are identified by grid coordinates at their own depth. Depth 0 is
//! the root (a single cell at (0, 0)); each level doubles the grid in both
//! directions. Content seeding keys off this address, never off the
//! floating-point bounds of the cell.

use smallvec::SmallVec;

use super::MAX_SUPPORTED_DEPTH;

/// One of the four children of a cell.
///
/// The index order is fixed so the mapping coordinate -> child is
/// deterministic: 0 = NE, 1 = NW, 2 = SW, 3 = SE.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Quadrant {
  NorthEast,
  NorthWest,
  SouthWest,
  SouthEast,
}

impl Quadrant {
  /// All quadrants in child index order.
  pub const ALL: [Quadrant; 4] = [
    Quadrant::NorthEast,
    Quadrant::NorthWest,
    Quadrant::SouthWest,
    Quadrant::SouthEast,
  ];

  /// Child slot of this quadrant.
  #[inline]
  pub fn index(self) -> usize {
    match self {
      Quadrant::NorthEast => 0,
      Quadrant::NorthWest => 1,
      Quadrant::SouthWest => 2,
      Quadrant::SouthEast => 3,
    }
  }

  /// Grid offsets `(east, north)`, each 0 or 1.
  #[inline]
  pub fn offsets(self) -> (u32, u32) {
    match self {
      Quadrant::NorthEast => (1, 1),
      Quadrant::NorthWest => (0, 1),
      Quadrant::SouthWest => (0, 0),
      Quadrant::SouthEast => (1, 0),
    }
  }

  /// Quadrant from grid offsets; any non-zero value counts as 1.
  #[inline]
  pub fn from_offsets(east: u32, north: u32) -> Self {
    match (east != 0, north != 0) {
      (true, true) => Quadrant::NorthEast,
      (false, true) => Quadrant::NorthWest,
      (false, false) => Quadrant::SouthWest,
      (true, false) => Quadrant::SouthEast,
    }
  }
}

/// Quadtree cell address - immutable value type.
///
/// `x` grows east, `y` grows north, both in `0..2^depth`. Row 0 is the
/// southern edge of the root.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct CellAddress {
  /// Depth in the tree (0 = root).
  pub depth: u32,
  /// Grid column at this depth.
  pub x: u32,
  /// Grid row at this depth.
  pub y: u32,
}

impl CellAddress {
  /// The root cell.
  pub const ROOT: CellAddress = CellAddress {
    depth: 0,
    x: 0,
    y: 0,
  };

  /// Create a new address.
  pub fn new(depth: u32, x: u32, y: u32) -> Self {
    Self { depth, x, y }
  }

  /// Get the child address in `quadrant` (one level finer).
  ///
  /// The address must be shallower than [`MAX_SUPPORTED_DEPTH`]; deeper
  /// grids overflow the `u32` coordinates. Debug builds assert this, see
  /// [`CellAddress::checked_child`] for the fallible form.
  pub fn child(&self, quadrant: Quadrant) -> Self {
    debug_assert!(
      self.depth < MAX_SUPPORTED_DEPTH,
      "child of depth {} exceeds the supported grid",
      self.depth
    );
    let (east, north) = quadrant.offsets();
    Self {
      depth: self.depth + 1,
      x: self.x * 2 + east,
      y: self.y * 2 + north,
    }
  }

  /// Child address, or None when it would be deeper than
  /// [`MAX_SUPPORTED_DEPTH`].
  pub fn checked_child(&self, quadrant: Quadrant) -> Option<Self> {
    (self.depth < MAX_SUPPORTED_DEPTH).then(|| self.child(quadrant))
  }

  /// All four children in quadrant order.
  pub fn children(&self) -> SmallVec<[CellAddress; 4]> {
    Quadrant::ALL.iter().map(|q| self.child(*q)).collect()
  }

  /// Get the parent address (one level coarser).
  ///
  /// Returns None for the root.
  pub fn parent(&self) -> Option<Self> {
    if self.depth == 0 {
      return None;
    }
    Some(Self {
      depth: self.depth - 1,
      x: self.x / 2,
      y: self.y / 2,
    })
  }

  /// Which quadrant of its parent this cell occupies. None for the root.
  pub fn quadrant_in_parent(&self) -> Option<Quadrant> {
    if self.depth == 0 {
      return None;
    }
    Some(Quadrant::from_offsets(self.x & 1, self.y & 1))
  }

  /// Morton (Z-order) code: x bits on even positions, y bits on odd.
  pub fn morton_code(&self) -> u64 {
    let mut code = 0u64;
    for i in 0..self.depth.min(32) {
      code |= u64::from((self.x >> i) & 1) << (2 * i);
      code |= u64::from((self.y >> i) & 1) << (2 * i + 1);
    }
    code
  }
}

#[cfg(test)]
#[path = "address_test.rs"]
mod address_test;
