//! Grid reference scenarios.

use lanegraph_lib::{
    CacheTarget, Error, GridGraph, GridPathRequest, GridPoint, PathAlgorithm,
};

const SQRT_2: f64 = std::f64::consts::SQRT_2;

#[test]
fn open_grid_crosses_in_a_straight_line() {
    let mut grid = GridGraph::new(20, 20, &[], false).unwrap();
    let request = GridPathRequest::new(GridPoint::new(2, 10), GridPoint::new(18, 10));
    let solved = grid.shortest_path(&request).unwrap();
    assert!((solved.length - 16.0).abs() < 1e-9, "got {}", solved.length);
}

#[test]
fn blocked_column_forces_a_detour_to_the_gap() {
    // Column x=10 is walled from y=5 upward; the only gap is below y=5.
    let blocks: Vec<(usize, usize)> = (5..20).map(|y| (10, y)).collect();
    let mut grid = GridGraph::new(20, 20, &blocks, false).unwrap();
    let request =
        GridPathRequest::new(GridPoint::new(2, 10), GridPoint::new(18, 10)).with_output_path();
    let solved = grid.shortest_path(&request).unwrap();

    // Diagonal down to the gap, across, and back up: 12 diagonals + 4 straights.
    let expected = 12.0 * SQRT_2 + 4.0;
    assert!(
        (solved.length - expected).abs() < 1e-9,
        "got {}, expected {expected}",
        solved.length
    );

    let points: Vec<GridPoint> = solved
        .path
        .as_ref()
        .unwrap()
        .iter()
        .map(|&id| GridPoint::new(id % 20, id / 20))
        .collect();
    let min_y = points.iter().map(|p| p.y).min().unwrap();
    assert!(min_y <= 4, "path should descend below the wall, got y={min_y}");
    assert!(points.iter().any(|p| p.x == 10), "path should cross column 10");
}

#[test]
fn walled_grid_runs_the_diagonal() {
    let mut grid = GridGraph::new(20, 20, &[], true).unwrap();
    let request = GridPathRequest::new(GridPoint::new(1, 1), GridPoint::new(18, 18));
    let solved = grid.shortest_path(&request).unwrap();
    assert!(
        (solved.length - 17.0 * SQRT_2).abs() < 1e-9,
        "got {}",
        solved.length
    );
}

#[test]
fn dijkstra_and_a_star_agree_on_grids() {
    let blocks: Vec<(usize, usize)> = (3..10).map(|y| (5, y)).collect();
    let mut grid = GridGraph::new(11, 10, &blocks, true).unwrap();
    let origin = GridPoint::new(1, 8);
    let destination = GridPoint::new(8, 8);

    let guided = grid
        .shortest_path(&GridPathRequest::new(origin, destination))
        .unwrap();
    let plain = grid
        .shortest_path(
            &GridPathRequest::new(origin, destination)
                .with_algorithm(PathAlgorithm::DijkstraMakowski),
        )
        .unwrap();
    assert!((guided.length - plain.length).abs() < 1e-9);
}

#[test]
fn cached_grid_queries_match_direct_solves() {
    let blocks: Vec<(usize, usize)> = (5..20).map(|y| (10, y)).collect();
    let mut grid = GridGraph::new(20, 20, &blocks, false).unwrap();
    let origin = GridPoint::new(2, 10);

    for destination in [GridPoint::new(18, 10), GridPoint::new(18, 2), GridPoint::new(4, 16)] {
        let direct = grid
            .shortest_path(&GridPathRequest::new(origin, destination))
            .unwrap();
        let cached = grid
            .shortest_path(
                &GridPathRequest::new(origin, destination).with_cache(CacheTarget::Origin),
            )
            .unwrap();
        assert!(
            (direct.length - cached.length).abs() < 1e-9,
            "{destination:?}: direct {} vs cached {}",
            direct.length,
            cached.length
        );
    }
}

#[test]
fn cache_for_destination_reuses_a_tree_rooted_at_the_exit() {
    let mut grid = GridGraph::new(12, 12, &[], false).unwrap();
    let destination = GridPoint::new(10, 10);
    for origin in [GridPoint::new(0, 0), GridPoint::new(5, 2), GridPoint::new(2, 9)] {
        let direct = grid
            .shortest_path(&GridPathRequest::new(origin, destination))
            .unwrap();
        let cached = grid
            .shortest_path(
                &GridPathRequest::new(origin, destination).with_cache(CacheTarget::Destination),
            )
            .unwrap();
        assert!((direct.length - cached.length).abs() < 1e-9);
    }
}

#[test]
fn fenced_in_endpoints_are_reported_as_blocked() {
    // Ring of blocks around (2, 2).
    let blocks = [
        (1, 1),
        (2, 1),
        (3, 1),
        (1, 2),
        (3, 2),
        (1, 3),
        (2, 3),
        (3, 3),
    ];
    let mut grid = GridGraph::new(6, 6, &blocks, false).unwrap();
    let request = GridPathRequest::new(GridPoint::new(2, 2), GridPoint::new(5, 5));
    assert!(matches!(
        grid.shortest_path(&request),
        Err(Error::BlockedCell { x: 2, y: 2 })
    ));
}

#[test]
fn unreachable_pockets_surface_as_unreachable() {
    // A full wall at x=3 splits the grid in two.
    let blocks: Vec<(usize, usize)> = (0..7).map(|y| (3, y)).collect();
    let mut grid = GridGraph::new(7, 7, &blocks, false).unwrap();
    let request = GridPathRequest::new(GridPoint::new(1, 3), GridPoint::new(5, 3));
    assert!(matches!(
        grid.shortest_path(&request),
        Err(Error::UnreachableDestination { .. })
    ));
}
