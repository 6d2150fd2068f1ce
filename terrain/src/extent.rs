// src/extent.rs

//! Axis-aligned boxes in cell space and the chunk sets they cover.
//!
//! All bounds are inclusive. Chunk enumeration starts from the floor-aligned
//! minimum and keeps stepping while the chunk base is `<=` the maximum, so an
//! extent whose maximum sits exactly on a chunk boundary also covers the chunk
//! starting there.

use serde::{Deserialize, Serialize};

use crate::coords::{chunk_base, Coords, CHUNK_HEIGHT, CHUNK_WIDTH};

/// The box of cells one viewer needs terrain for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewExtent {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Default for ViewExtent {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl ViewExtent {
    /// Nothing visible: every maximum is below its minimum.
    pub const EMPTY: ViewExtent = ViewExtent {
        min_x: 0,
        max_x: -1,
        min_y: 0,
        max_y: -1,
        min_z: 0,
        max_z: -1,
    };

    pub fn new(min: Coords, max: Coords) -> Self {
        Self {
            min_x: min.x,
            max_x: max.x,
            min_y: min.y,
            max_y: max.y,
            min_z: min.z,
            max_z: max.z,
        }
    }

    /// A box of `size` cells centred on `center`, rounded outward onto the chunk grid.
    pub fn around(center: [f64; 3], size: [f64; 3]) -> Self {
        let w = CHUNK_WIDTH as f64;
        let h = CHUNK_HEIGHT as f64;
        let [cx, cy, cz] = center;
        let [sx, sy, sz] = size;
        Self {
            min_x: (((cx - sx / 2.0) / w).floor() * w) as i32,
            max_x: (((cx + sx / 2.0) / w).ceil() * w) as i32,
            min_y: (((cy - sy / 2.0) / h).floor() * h) as i32,
            max_y: (((cy + sy / 2.0) / h).ceil() * h) as i32,
            min_z: (((cz - sz / 2.0) / w).floor() * w) as i32,
            max_z: (((cz + sz / 2.0) / w).ceil() * w) as i32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y || self.max_z < self.min_z
    }

    pub fn contains(&self, coords: Coords) -> bool {
        is_coord_in_extent(coords, self)
    }

    /// True if any of the six bounds differ.
    pub fn differs_from(&self, other: &ViewExtent) -> bool {
        compare_extents(self, other)
    }

    pub fn chunks(&self) -> Vec<Coords> {
        chunks_in_extent(self)
    }

    /// Chunks of `self` whose base is not inside `other`.
    pub fn chunks_outside(&self, other: &ViewExtent) -> Vec<Coords> {
        chunks_by_subtracting_extents(other, self)
    }

    pub fn with_buffer(&self, buffer: i32) -> Self {
        add_buffer_to_extent(self, buffer)
    }

    pub fn capped(&self, max_width: i32, max_height: Option<i32>) -> Self {
        cap_extent(self, max_width, max_height)
    }

    pub fn width_x(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn width_z(&self) -> i32 {
        self.max_z - self.min_z
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.max_x as f64 + self.min_x as f64) / 2.0,
            (self.max_y as f64 + self.min_y as f64) / 2.0,
            (self.max_z as f64 + self.min_z as f64) / 2.0,
        ]
    }
}

pub fn is_coord_in_extent(coords: Coords, extent: &ViewExtent) -> bool {
    coords.x >= extent.min_x
        && coords.x <= extent.max_x
        && coords.y >= extent.min_y
        && coords.y <= extent.max_y
        && coords.z >= extent.min_z
        && coords.z <= extent.max_z
}

/// Same test as [`is_coord_in_extent`], applied to a chunk's base corner.
pub fn is_chunk_in_extent(extent: &ViewExtent, chunk_base: Coords) -> bool {
    is_coord_in_extent(chunk_base, extent)
}

/// Every chunk base on the grid covered by `extent`, iterated x, then z, then y.
pub fn chunks_in_extent(extent: &ViewExtent) -> Vec<Coords> {
    let mut coords = Vec::new();
    for_each_chunk(extent, |c| coords.push(c));
    coords
}

/// Chunks in `base` whose base corner is outside `keep`.
///
/// Server side, `base` is the new extent and `keep` the previous one: the
/// result is what the viewer has not been sent yet. Client side, `base` is
/// the old buffered extent and `keep` the new one: the result can be evicted.
pub fn chunks_by_subtracting_extents(keep: &ViewExtent, base: &ViewExtent) -> Vec<Coords> {
    let mut coords = Vec::new();
    for_each_chunk(base, |c| {
        if !is_coord_in_extent(c, keep) {
            coords.push(c);
        }
    });
    coords
}

/// Chunks that became visible when moving from `previously_visible` to `visible`.
pub fn newly_visible_chunks(visible: &ViewExtent, previously_visible: &ViewExtent) -> Vec<Coords> {
    chunks_by_subtracting_extents(previously_visible, visible)
}

/// Chunks that are no longer visible after moving from `previously_visible` to `visible`.
pub fn no_longer_visible_chunks(visible: &ViewExtent, previously_visible: &ViewExtent) -> Vec<Coords> {
    chunks_by_subtracting_extents(visible, previously_visible)
}

fn for_each_chunk(extent: &ViewExtent, mut f: impl FnMut(Coords)) {
    let base_x = chunk_base(extent.min_x, CHUNK_WIDTH);
    let base_y = chunk_base(extent.min_y, CHUNK_HEIGHT);
    let base_z = chunk_base(extent.min_z, CHUNK_WIDTH);
    // i64 so stepping past i32::MAX near the edge of the world cannot wrap
    let mut x = base_x as i64;
    while x <= extent.max_x as i64 {
        let mut z = base_z as i64;
        while z <= extent.max_z as i64 {
            let mut y = base_y as i64;
            while y <= extent.max_y as i64 {
                f(Coords::new(x as i32, y as i32, z as i32));
                y += CHUNK_HEIGHT as i64;
            }
            z += CHUNK_WIDTH as i64;
        }
        x += CHUNK_WIDTH as i64;
    }
}

/// Expands all six bounds outward by `buffer` cells.
pub fn add_buffer_to_extent(extent: &ViewExtent, buffer: i32) -> ViewExtent {
    ViewExtent {
        min_x: extent.min_x.saturating_sub(buffer),
        max_x: extent.max_x.saturating_add(buffer),
        min_y: extent.min_y.saturating_sub(buffer),
        max_y: extent.max_y.saturating_add(buffer),
        min_z: extent.min_z.saturating_sub(buffer),
        max_z: extent.max_z.saturating_add(buffer),
    }
}

/// Keeps the centre of `extent` and clamps its horizontal spans to
/// `[1, max_width]`, and its vertical span to `[1, max_height]` when given.
pub fn cap_extent(extent: &ViewExtent, max_width: i32, max_height: Option<i32>) -> ViewExtent {
    let [cx, cy, cz] = extent.center();
    let cap = |size: i64, max: i32| size.min(max as i64).max(1) as f64;
    let size_x = cap(extent.max_x as i64 - extent.min_x as i64, max_width);
    let size_z = cap(extent.max_z as i64 - extent.min_z as i64, max_width);
    let size_y = match max_height {
        Some(max) => cap(extent.max_y as i64 - extent.min_y as i64, max),
        None => (extent.max_y as i64 - extent.min_y as i64) as f64,
    };
    ViewExtent {
        min_x: (cx - size_x / 2.0).floor() as i32,
        max_x: (cx + size_x / 2.0).floor() as i32,
        min_y: (cy - size_y / 2.0).floor() as i32,
        max_y: (cy + size_y / 2.0).floor() as i32,
        min_z: (cz - size_z / 2.0).floor() as i32,
        max_z: (cz + size_z / 2.0).floor() as i32,
    }
}

/// True iff any of the six bounds differ.
pub fn compare_extents(a: &ViewExtent, b: &ViewExtent) -> bool {
    a != b
}
