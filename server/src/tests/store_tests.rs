use terrain::prelude::*;

use crate::terrain::TerrainStore;

#[test]
fn test_generates_once_then_caches() {
    let mut store = TerrainStore::new(|_: i32, _: i32| 10.0);
    assert!(store.is_empty());

    let first = store.get_chunk(Coords::new(0, 0, 0)).unwrap().clone();
    let second = store.get_chunk(Coords::new(31, 127, 31)).unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(store.len(), 1);
    assert!(store.contains_key("0 0 0"));
}

#[test]
fn test_get_chunk_floors_negative_coords() {
    let mut store = TerrainStore::new(|_: i32, _: i32| 10.0);
    store.get_chunk(Coords::new(-1, -1, -33)).unwrap();
    assert!(store.contains_key("-32 -128 -64"));
}

#[test]
fn test_get_chunks_batches_by_key() {
    let mut store = TerrainStore::new(|_: i32, _: i32| 10.0);
    let coords = [Coords::new(0, 0, 0), Coords::new(32, 0, 0), Coords::new(0, 128, 0)];
    let terrain = store.get_chunks(&coords);
    assert_eq!(
        terrain.keys().cloned().collect::<Vec<_>>(),
        vec!["0 0 0".to_string(), "0 128 0".to_string(), "32 0 0".to_string()]
    );
    assert_eq!(terrain["0 0 0"].filled_columns(), COLUMNS_PER_CHUNK);
    assert_eq!(terrain["0 128 0"].filled_columns(), 0);
    assert_eq!(store.len(), 3);
}

#[test]
fn test_failed_chunk_is_left_out_of_batch() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut store = TerrainStore::new(|x: i32, _: i32| if x >= 64 { f64::NAN } else { 10.0 });
    let terrain = store.get_chunks(&[Coords::new(0, 0, 0), Coords::new(32, 0, 0), Coords::new(96, 0, 0)]);
    assert_eq!(terrain.len(), 1);
    assert!(terrain.contains_key("0 0 0"));
    assert!(!store.contains_key("32 0 0"));
}

#[test]
fn test_set_cell_generates_then_bumps_revision() {
    let mut store = TerrainStore::new(|_: i32, _: i32| 10.0);
    assert_eq!(store.set_cell(Coords::new(-1, 30, -1), Some(4)).unwrap(), Some(1));
    assert!(store.contains_key("-32 0 -32"));

    let chunk = store.get_chunk(Coords::new(-32, 0, -32)).unwrap();
    let column = chunk.column(31, 31).as_filled().unwrap();
    assert_eq!(column.ranges.len(), 2);
    assert_eq!(column.ranges[1].bottom_start, 30);
    assert_eq!(column.ranges[1].material_id, 4);

    // same content again: no new revision
    assert_eq!(store.set_cell(Coords::new(-1, 30, -1), Some(4)).unwrap(), None);
    assert_eq!(store.set_cell(Coords::new(-1, 30, -1), None).unwrap(), Some(2));
    assert_eq!(store.get_chunk(Coords::new(-32, 0, -32)).unwrap().revision(), 2);
}

#[test]
fn test_edits_are_served_to_later_batches() {
    let mut store = TerrainStore::new(|_: i32, _: i32| 10.0);
    store.set_cell(Coords::new(0, 0, 0), None).unwrap();
    let terrain = store.get_chunks(&[Coords::new(0, 0, 0)]);
    assert_eq!(terrain["0 0 0"].revision(), 1);
    let column = terrain["0 0 0"].column(0, 0).as_filled().unwrap();
    assert_eq!((column.ranges[0].bottom_start, column.ranges[0].range_size), (1, 9));
}
