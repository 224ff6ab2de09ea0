use crate::error::KdIndexError;
use crate::flat::FlatKdTree;
use crate::indices::Indices;
use crate::kdtree::KdTreeBuilder;
use crate::metric::{Euclidean, Manhattan};
use crate::r#trait::KdIndex;
use crate::r#type::{Coordinates, PointId};
use crate::select::PivotStrategy;
use crate::test::{brute_force, points, random_points, sorted_distances};

fn make_index() -> FlatKdTree<[f64; 2], Euclidean> {
    FlatKdTree::new(points(), Euclidean, vec![0, 1]).unwrap()
}

/// Check that every range is split by its middle point on the key for its depth.
fn check_order<P: Coordinates>(points: &[P], dimensions: &[P::Key], depth: usize) {
    if points.len() <= 1 {
        return;
    }
    let mid = points.len() >> 1;
    let key = &dimensions[depth % dimensions.len()];
    let split = points[mid].coord(key);
    assert!(points[..mid].iter().all(|p| p.coord(key) <= split));
    assert!(points[mid + 1..].iter().all(|p| p.coord(key) >= split));
    check_order(&points[..mid], dimensions, depth + 1);
    check_order(&points[mid + 1..], dimensions, depth + 1);
}

#[test]
fn creates_an_index() {
    let index = make_index();
    assert_eq!(index.len(), 100);
    check_order(index.points(), &[0, 1], 0);
    assert!(matches!(index.ids(), Indices::U16(_)));

    // Ids still name the input position of each point
    let input = points();
    for (id, point) in index.iter() {
        assert_eq!(input[id.index()], *point);
    }
    let mut ids: Vec<u32> = index.ids().iter().map(|id| id.0).collect();
    ids.sort();
    assert_eq!(ids, (0..100).collect::<Vec<_>>());
}

#[test]
fn finds_the_closest_point() {
    let points = vec![[1.0, 2.0], [3.0, 4.0], [5.0, 1.0]];
    let index = FlatKdTree::new(points, Euclidean, vec![0, 1]).unwrap();
    let result = index.nearest(&[4.0, 1.0], 1, None);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, PointId(2));
    assert_eq!(result[0].distance, 1.0);
}

#[test]
fn empty_and_degenerate_queries() {
    let empty = FlatKdTree::<[f64; 2], _>::new(vec![], Euclidean, vec![0, 1]).unwrap();
    assert!(empty.is_empty());
    assert!(empty.nearest(&[0.0, 0.0], 5, None).is_empty());

    let index = make_index();
    assert!(index.nearest(&[50.0, 50.0], 0, None).is_empty());
    assert!(index.nearest(&[54.0, 1.0], 1, Some(0.0)).is_empty());
    assert_eq!(index.nearest(&[54.0, 1.0], 1, Some(0.5))[0].id, PointId(0));

    let result = FlatKdTree::new(points(), Euclidean, vec![]);
    assert_eq!(result.unwrap_err(), KdIndexError::EmptyDimensions);
}

#[test]
fn agrees_with_a_linear_scan() {
    let points = points();
    let index = make_index();
    for query in [[50.0, 50.0], [0.0, 0.0], [99.0, 2.0], [33.5, 70.25]] {
        for k in [1, 2, 5, 10, 100] {
            let expected = brute_force(&points, &Euclidean, &[0, 1], &query, k, None);
            let found = sorted_distances(
                index
                    .nearest(&query, k, None)
                    .into_iter()
                    .map(|n| (n.id, n.distance)),
            );
            assert_eq!(found, expected, "{query:?} k={k}");
        }

        let expected = brute_force(&points, &Euclidean, &[0, 1], &query, 100, Some(20.0));
        let found = index.nearest(&query, 100, Some(20.0));
        assert_eq!(found.len(), expected.len());
    }
}

#[test]
fn agrees_with_a_linear_scan_in_higher_dimensions() {
    for dimensions in 1..=4 {
        let keys: Vec<usize> = (0..dimensions).collect();
        let points = random_points(20 + dimensions as u64, 500, dimensions);

        let mut builder = KdTreeBuilder::new(Manhattan, keys.clone())
            .pivot_strategy(PivotStrategy::MedianOfMedians);
        for point in points.iter().cloned() {
            builder.add(point);
        }
        let index = builder.finish_flat().unwrap();
        check_order(index.points(), &keys, 0);

        for query in random_points(40 + dimensions as u64, 15, dimensions) {
            for k in [1, 3, 20] {
                let expected = brute_force(&points, &Manhattan, &keys, &query, k, None);
                let found = sorted_distances(
                    index
                        .nearest(&query, k, None)
                        .into_iter()
                        .map(|n| (n.id, n.distance)),
                );
                assert_eq!(found, expected, "dims={dimensions} k={k}");
            }
        }
    }
}

#[test]
fn uses_wide_ids_for_large_inputs() {
    let points: Vec<[f64; 2]> = (0..70_000)
        .map(|i| [(i % 300) as f64, (i / 300) as f64])
        .collect();
    let index = FlatKdTree::new(points, Euclidean, vec![0, 1]).unwrap();
    assert!(matches!(index.ids(), Indices::U32(_)));

    let result = index.nearest(&[299.0, 233.0], 1, None);
    assert_eq!(result[0].id, PointId(69_899));
    assert_eq!(result[0].distance, 0.0);
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_build_matches() {
    let points = random_points(99, 20_000, 3);
    let serial = FlatKdTree::new(points.clone(), Euclidean, vec![0, 1, 2]).unwrap();
    let parallel = FlatKdTree::new_parallel(points, Euclidean, vec![0, 1, 2]).unwrap();
    check_order(parallel.points(), &[0, 1, 2], 0);
    assert_eq!(serial.into_inner(), parallel.into_inner());
}
