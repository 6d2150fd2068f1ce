// src/shape.rs

use crate::error::TerrainError;

/// Slope of a column's top (or bottom) surface, derived from which of the
/// eight horizontal neighbours stand higher than the cell.
///
/// "Top" is +z, "right" is +x.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SurfaceShape {
    #[default]
    Flat = 0,
    UpTopLeft = 1,
    UpTopRight = 2,
    UpBottomRight = 3,
    UpBottomLeft = 4,
    UpTop = 5,
    UpRight = 6,
    UpBottom = 7,
    UpLeft = 8,
    DownTopLeft = 9,
    DownTopRight = 10,
    DownBottomRight = 11,
    DownBottomLeft = 12,
    DiagonalFromTopLeft = 13,
    DiagonalFromBottomLeft = 14,
}

impl SurfaceShape {
    pub const ALL: [SurfaceShape; 15] = [
        SurfaceShape::Flat,
        SurfaceShape::UpTopLeft,
        SurfaceShape::UpTopRight,
        SurfaceShape::UpBottomRight,
        SurfaceShape::UpBottomLeft,
        SurfaceShape::UpTop,
        SurfaceShape::UpRight,
        SurfaceShape::UpBottom,
        SurfaceShape::UpLeft,
        SurfaceShape::DownTopLeft,
        SurfaceShape::DownTopRight,
        SurfaceShape::DownBottomRight,
        SurfaceShape::DownBottomLeft,
        SurfaceShape::DiagonalFromTopLeft,
        SurfaceShape::DiagonalFromBottomLeft,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Classifies an 8-neighbour "is higher" pattern.
    ///
    /// Rules are tried in order and the first match wins, so the edge and
    /// corner-down rules only need to pin the neighbours that matter to them.
    /// Patterns no rule covers come back as `Flat`.
    pub fn from_neighbours(n: Neighbours) -> SurfaceShape {
        let Neighbours {
            top_left: tl,
            top: t,
            top_right: tr,
            right: r,
            bottom_right: br,
            bottom: b,
            bottom_left: bl,
            left: l,
        } = n;

        if !n.any() {
            SurfaceShape::Flat
        } else if n.only(&[tl]) {
            SurfaceShape::UpTopLeft
        } else if n.only(&[tr]) {
            SurfaceShape::UpTopRight
        } else if n.only(&[br]) {
            SurfaceShape::UpBottomRight
        } else if n.only(&[bl]) {
            SurfaceShape::UpBottomLeft
        } else if t && !r && !br && !b && !bl && !l {
            SurfaceShape::UpTop
        } else if !tl && !t && r && !b && !bl && !l {
            SurfaceShape::UpRight
        } else if !tl && !t && !tr && !r && b && !l {
            SurfaceShape::UpBottom
        } else if !t && !tr && !r && !br && !b && l {
            SurfaceShape::UpLeft
        } else if !tl && r && br && b {
            SurfaceShape::DownTopLeft
        } else if !tr && b && bl && l {
            SurfaceShape::DownTopRight
        } else if tl && t && !br && l {
            SurfaceShape::DownBottomRight
        } else if t && tr && r && !bl {
            SurfaceShape::DownBottomLeft
        } else if n.only(&[tl, br]) {
            SurfaceShape::DiagonalFromTopLeft
        } else if n.only(&[tr, bl]) {
            SurfaceShape::DiagonalFromBottomLeft
        } else {
            log::trace!("unhandled neighbour pattern {:?}, using a flat surface", n);
            SurfaceShape::Flat
        }
    }
}

impl TryFrom<u8> for SurfaceShape {
    type Error = TerrainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SurfaceShape::ALL
            .get(value as usize)
            .copied()
            .ok_or(TerrainError::UnknownSurfaceShape(value))
    }
}

/// Which horizontal neighbours of a cell are higher than the cell itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbours {
    pub top_left: bool,
    pub top: bool,
    pub top_right: bool,
    pub right: bool,
    pub bottom_right: bool,
    pub bottom: bool,
    pub bottom_left: bool,
    pub left: bool,
}

impl Neighbours {
    /// Offsets `(dx, dz)` in the same order as the fields.
    pub const OFFSETS: [(i32, i32); 8] = [
        (-1, 1),
        (0, 1),
        (1, 1),
        (1, 0),
        (1, -1),
        (0, -1),
        (-1, -1),
        (-1, 0),
    ];

    /// Builds the pattern from flags ordered like [`Neighbours::OFFSETS`].
    pub fn from_flags(flags: [bool; 8]) -> Self {
        let [top_left, top, top_right, right, bottom_right, bottom, bottom_left, left] = flags;
        Self {
            top_left,
            top,
            top_right,
            right,
            bottom_right,
            bottom,
            bottom_left,
            left,
        }
    }

    pub fn flags(&self) -> [bool; 8] {
        [
            self.top_left,
            self.top,
            self.top_right,
            self.right,
            self.bottom_right,
            self.bottom,
            self.bottom_left,
            self.left,
        ]
    }

    fn any(&self) -> bool {
        self.flags().iter().any(|f| *f)
    }

    /// True when exactly the given flags are raised (each entry is the flag's value).
    fn only(&self, raised: &[bool]) -> bool {
        let count = self.flags().iter().filter(|f| **f).count();
        raised.iter().all(|f| *f) && count == raised.len()
    }
}
