use std::collections::HashSet;

use crate::coords::{Coords, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::extent::{
    add_buffer_to_extent, cap_extent, chunks_by_subtracting_extents, chunks_in_extent, compare_extents,
    is_chunk_in_extent, is_coord_in_extent, newly_visible_chunks, no_longer_visible_chunks, ViewExtent,
};
use test_case::test_case;

fn extent(x: (i32, i32), y: (i32, i32), z: (i32, i32)) -> ViewExtent {
    ViewExtent {
        min_x: x.0,
        max_x: x.1,
        min_y: y.0,
        max_y: y.1,
        min_z: z.0,
        max_z: z.1,
    }
}

fn as_set(coords: Vec<Coords>) -> HashSet<Coords> {
    coords.into_iter().collect()
}

#[test]
fn test_empty_extent_covers_nothing() {
    assert!(ViewExtent::EMPTY.is_empty());
    assert!(chunks_in_extent(&ViewExtent::EMPTY).is_empty());
    assert_eq!(ViewExtent::default(), ViewExtent::EMPTY);
}

#[test]
fn test_chunks_in_extent_grid() {
    let a = extent((0, 95), (0, 127), (0, 95));
    let chunks = chunks_in_extent(&a);
    assert_eq!(chunks.len(), 9);
    assert_eq!(chunks[0], Coords::new(0, 0, 0));
    // x is the outer loop, z the inner one
    assert_eq!(chunks[1], Coords::new(0, 0, 32));
    assert_eq!(chunks[3], Coords::new(32, 0, 0));
    assert!(chunks.iter().all(|c| c.is_chunk_aligned()));
}

#[test]
fn test_chunks_in_extent_starts_below_unaligned_min() {
    let chunks = chunks_in_extent(&extent((-5, 5), (-1, 1), (40, 40)));
    assert_eq!(
        as_set(chunks),
        as_set(vec![
            Coords::new(-32, -128, 32),
            Coords::new(-32, 0, 32),
            Coords::new(0, -128, 32),
            Coords::new(0, 0, 32),
        ])
    );
}

#[test]
fn test_boundary_max_includes_next_chunk() {
    let chunks = chunks_in_extent(&extent((0, 32), (0, 0), (0, 0)));
    assert_eq!(chunks, vec![Coords::new(0, 0, 0), Coords::new(32, 0, 0)]);
}

#[test]
fn test_every_chunk_base_is_listed_once() {
    let e = extent((-70, 100), (-130, 300), (12, 77));
    let chunks = chunks_in_extent(&e);
    let unique = as_set(chunks.clone());
    assert_eq!(unique.len(), chunks.len());

    let mut expected = HashSet::new();
    let mut x = -96;
    while x <= e.max_x {
        let mut y = -256;
        while y <= e.max_y {
            let mut z = 0;
            while z <= e.max_z {
                expected.insert(Coords::new(x, y, z));
                z += CHUNK_WIDTH;
            }
            y += CHUNK_HEIGHT;
        }
        x += CHUNK_WIDTH;
    }
    assert_eq!(unique, expected);
}

#[test]
fn test_subtracting_shifted_extent() {
    let a = extent((0, 95), (0, 127), (0, 95));
    let b = extent((32, 127), (0, 127), (0, 95));
    let delta = chunks_by_subtracting_extents(&a, &b);
    assert_eq!(
        as_set(delta.clone()),
        as_set(vec![Coords::new(96, 0, 0), Coords::new(96, 0, 32), Coords::new(96, 0, 64)])
    );
    assert_eq!(newly_visible_chunks(&b, &a), delta);
    assert_eq!(b.chunks_outside(&a), delta);

    let gone = no_longer_visible_chunks(&b, &a);
    assert_eq!(
        as_set(gone),
        as_set(vec![Coords::new(0, 0, 0), Coords::new(0, 0, 32), Coords::new(0, 0, 64)])
    );
}

#[test]
fn test_subtraction_partitions_base() {
    let keep = extent((-40, 60), (0, 127), (-40, 60));
    let base = extent((0, 140), (-10, 200), (0, 140));
    let outside = as_set(chunks_by_subtracting_extents(&keep, &base));
    let all = as_set(chunks_in_extent(&base));
    for c in &all {
        assert_eq!(outside.contains(c), !is_chunk_in_extent(&keep, *c), "{}", c);
    }
    assert!(outside.is_subset(&all));
}

#[test]
fn test_subtracting_from_itself_is_empty() {
    let a = extent((0, 95), (0, 127), (0, 95));
    assert!(chunks_by_subtracting_extents(&a, &a).is_empty());
}

#[test]
fn test_subtracting_empty_yields_everything() {
    let a = extent((0, 95), (0, 127), (0, 95));
    assert_eq!(chunks_by_subtracting_extents(&ViewExtent::EMPTY, &a), chunks_in_extent(&a));
}

#[test_case(Coords::new(0, 0, 0), true ; "min corner")]
#[test_case(Coords::new(95, 127, 95), true ; "max corner")]
#[test_case(Coords::new(96, 0, 0), false ; "past max x")]
#[test_case(Coords::new(0, -1, 0), false ; "below min y")]
fn test_coord_in_extent(coords: Coords, expected: bool) {
    let a = extent((0, 95), (0, 127), (0, 95));
    assert_eq!(is_coord_in_extent(coords, &a), expected);
    assert_eq!(a.contains(coords), expected);
}

#[test]
fn test_cap_extent_keeps_centre() {
    let e = extent((0, 2000), (0, 100), (-500, 500));
    assert_eq!(cap_extent(&e, 1000, None), extent((500, 1500), (0, 100), (-500, 500)));
    assert_eq!(e.capped(1000, Some(64)), extent((500, 1500), (18, 82), (-500, 500)));
}

#[test]
fn test_cap_extent_leaves_small_extent_alone() {
    let e = extent((0, 96), (0, 128), (-64, 32));
    assert_eq!(cap_extent(&e, 1000, None), e);
}

#[test]
fn test_cap_extent_expands_degenerate_width() {
    let e = extent((10, 10), (0, 128), (10, 10));
    let capped = cap_extent(&e, 1000, None);
    assert_eq!(capped.width_x(), 1);
    assert_eq!(capped.width_z(), 1);
}

#[test]
fn test_capped_width_never_exceeds_max() {
    for (min, max) in [(-7, 3001), (0, 1001), (-999_999, 999_999), (17, 18)] {
        let capped = cap_extent(&extent((min, max), (0, 1), (min, max)), 1000, None);
        assert!(capped.width_x() <= 1000 && capped.width_x() >= 1);
        assert!(capped.width_z() <= 1000 && capped.width_z() >= 1);
    }
}

#[test]
fn test_add_buffer() {
    let e = extent((0, 95), (0, 127), (0, 95));
    let buffered = add_buffer_to_extent(&e, 96);
    assert_eq!(buffered, extent((-96, 191), (-96, 223), (-96, 191)));
    assert_eq!(e.with_buffer(96), buffered);
}

#[test]
fn test_compare_extents() {
    let a = extent((0, 95), (0, 127), (0, 95));
    let mut b = a;
    assert!(!compare_extents(&a, &b));
    b.max_z += 1;
    assert!(compare_extents(&a, &b));
    assert!(a.differs_from(&b));
}

#[test]
fn test_around_rounds_outward() {
    let e = ViewExtent::around([0.0, 128.0, 0.0], [256.0, 256.0, 256.0]);
    assert_eq!(e, extent((-128, 128), (0, 256), (-128, 128)));

    let e = ViewExtent::around([10.0, 0.0, 10.0], [64.0, 1.0, 64.0]);
    assert_eq!((e.min_x, e.max_x), (-32, 64));
    assert_eq!((e.min_y, e.max_y), (-128, 128));
}

#[test]
fn test_extent_json_field_names() {
    let json = serde_json::to_value(extent((0, 95), (0, 127), (0, 95))).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"minX": 0, "maxX": 95, "minY": 0, "maxY": 127, "minZ": 0, "maxZ": 95})
    );
}
