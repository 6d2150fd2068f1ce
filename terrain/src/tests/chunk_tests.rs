use crate::chunk::{CellColumn, CellColumnRange, Column, GridChunk};
use crate::coords::{Coords, MaterialId};
use crate::shape::SurfaceShape;
use crate::TerrainError;
use test_case::test_case;

const STONE: MaterialId = 1;
const DIRT: MaterialId = 2;

/// Column (1, 2) holds stone at y 0..10 and 20..22.
fn sample_chunk() -> GridChunk {
    let mut chunk = GridChunk::empty(3);
    chunk.set_column(
        1,
        2,
        Column::Filled(CellColumn::new(vec![
            CellColumnRange::new(0, 10, STONE),
            CellColumnRange::new(20, 2, STONE),
        ])),
    );
    chunk
}

/// `(bottom_start, range_size, material_id)` of column (1, 2).
fn ranges(chunk: &GridChunk) -> Vec<(u8, u8, MaterialId)> {
    match chunk.column(1, 2) {
        Column::Empty => Vec::new(),
        Column::Filled(column) => {
            assert!(column.is_well_ordered());
            column
                .ranges
                .iter()
                .map(|r| (r.bottom_start, r.range_size, r.material_id))
                .collect()
        }
    }
}

fn at(y: i32) -> Coords {
    Coords::new(1, y, 2)
}

#[test_case(4, None, vec![(0, 4, STONE), (5, 5, STONE), (20, 2, STONE)] ; "clear inside splits")]
#[test_case(0, None, vec![(1, 9, STONE), (20, 2, STONE)] ; "clear bottom")]
#[test_case(9, None, vec![(0, 9, STONE), (20, 2, STONE)] ; "clear top")]
#[test_case(4, Some(DIRT), vec![(0, 4, STONE), (4, 1, DIRT), (5, 5, STONE), (20, 2, STONE)] ; "replace inside")]
#[test_case(0, Some(DIRT), vec![(0, 1, DIRT), (1, 9, STONE), (20, 2, STONE)] ; "replace bottom")]
#[test_case(9, Some(DIRT), vec![(0, 9, STONE), (9, 1, DIRT), (20, 2, STONE)] ; "replace top")]
#[test_case(12, Some(DIRT), vec![(0, 10, STONE), (12, 1, DIRT), (20, 2, STONE)] ; "fill a gap")]
#[test_case(30, Some(DIRT), vec![(0, 10, STONE), (20, 2, STONE), (30, 1, DIRT)] ; "fill above")]
fn test_set_cell(y: i32, material: Option<MaterialId>, expected: Vec<(u8, u8, MaterialId)>) {
    let mut chunk = sample_chunk();
    assert!(chunk.set_cell(at(y), material).unwrap());
    assert_eq!(ranges(&chunk), expected);
    assert_eq!(chunk.revision(), 4);
}

#[test_case(4, Some(STONE) ; "same material")]
#[test_case(15, None ; "already empty")]
fn test_unchanged_cell_keeps_revision(y: i32, material: Option<MaterialId>) {
    let mut chunk = sample_chunk();
    assert!(!chunk.set_cell(at(y), material).unwrap());
    assert_eq!(chunk, sample_chunk());
}

#[test]
fn test_fill_and_clear_empty_column() {
    let mut chunk = GridChunk::empty(0);
    assert!(!chunk.set_cell(at(7), None).unwrap());
    assert_eq!(chunk.revision(), 0);

    assert!(chunk.set_cell(at(7), Some(DIRT)).unwrap());
    assert_eq!(ranges(&chunk), vec![(7, 1, DIRT)]);
    assert_eq!(chunk.revision(), 1);

    assert!(chunk.set_cell(at(7), None).unwrap());
    assert_eq!(*chunk.column(1, 2), Column::Empty);
    assert_eq!(chunk.revision(), 2);
}

#[test]
fn test_split_keeps_outer_shapes() {
    let mut chunk = GridChunk::empty(0);
    let range = CellColumnRange::new(0, 10, STONE)
        .with_top_shape(SurfaceShape::UpLeft)
        .with_bottom_shape(SurfaceShape::UpRight);
    chunk.set_column(1, 2, Column::Filled(CellColumn::new(vec![range])));

    chunk.set_cell(at(4), None).unwrap();
    let column = chunk.column(1, 2).as_filled().unwrap();
    assert_eq!(column.ranges[0].bottom_shape, SurfaceShape::UpRight);
    assert_eq!(column.ranges[0].top_shape, SurfaceShape::Flat);
    assert_eq!(column.ranges[1].bottom_shape, SurfaceShape::Flat);
    assert_eq!(column.ranges[1].top_shape, SurfaceShape::UpLeft);

    // replacing the top cell hands its shape to the new cell
    chunk.set_cell(at(9), Some(DIRT)).unwrap();
    let column = chunk.column(1, 2).as_filled().unwrap();
    assert_eq!(column.ranges[1].top_shape, SurfaceShape::Flat);
    assert_eq!(column.ranges[2].material_id, DIRT);
    assert_eq!(column.ranges[2].top_shape, SurfaceShape::UpLeft);
}

#[test_case(Coords::new(-1, 0, 0) ; "negative x")]
#[test_case(Coords::new(0, 128, 0) ; "above chunk")]
#[test_case(Coords::new(0, 0, 32) ; "past z")]
fn test_cell_outside_chunk(local: Coords) {
    let mut chunk = sample_chunk();
    assert!(matches!(
        chunk.set_cell(local, Some(DIRT)),
        Err(TerrainError::CellOutsideChunk(c)) if c == local
    ));
    assert_eq!(chunk.revision(), 3);
}
