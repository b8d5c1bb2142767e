use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;

use lanegraph_lib::{
    CacheTarget, Coordinate, GeoGraph, Graph, GridGraph, GridPathRequest, GridPoint,
    PathAlgorithm, PathRequest,
};

static EUROPE: Lazy<(Graph, Vec<Coordinate>)> = Lazy::new(|| {
    let nodes = vec![
        Coordinate::new(51.5074, -0.1278),
        Coordinate::new(48.8566, 2.3522),
        Coordinate::new(52.5200, 13.4050),
        Coordinate::new(41.9028, 12.4964),
        Coordinate::new(40.4168, -3.7038),
        Coordinate::new(38.7223, -9.1393),
    ];
    let mut graph = Graph::with_node_count(6);
    graph.add_arc(0, 1, 311.0, false).unwrap();
    graph.add_arc(1, 2, 878.0, false).unwrap();
    graph.add_arc(1, 3, 1439.0, false).unwrap();
    graph.add_arc(1, 4, 1053.0, false).unwrap();
    graph.add_arc(2, 3, 1181.0, false).unwrap();
    graph.add_arc(4, 5, 623.0, false).unwrap();
    (graph, nodes)
});

fn geograph() -> GeoGraph {
    let (graph, nodes) = EUROPE.clone();
    GeoGraph::new(graph, nodes).unwrap()
}

fn maze_grid() -> GridGraph {
    let blocks: Vec<(usize, usize)> = (5..45).map(|y| (25, y)).collect();
    GridGraph::new(50, 50, &blocks, true).unwrap()
}

fn benchmark_pathfinding(c: &mut Criterion) {
    let birmingham = Coordinate::new(52.4862, -1.8904);
    let zaragoza = Coordinate::new(41.6488, -0.8891);

    c.bench_function("geo_dijkstra_birmingham_zaragoza", |b| {
        let mut geograph = geograph();
        let request = PathRequest::new(birmingham, zaragoza);
        b.iter(|| {
            let solved = geograph.shortest_path(&request).expect("route exists");
            black_box(solved.length)
        });
    });

    c.bench_function("geo_a_star_birmingham_zaragoza", |b| {
        let mut geograph = geograph();
        let request =
            PathRequest::new(birmingham, zaragoza).with_algorithm(PathAlgorithm::AStar);
        b.iter(|| {
            let solved = geograph.shortest_path(&request).expect("route exists");
            black_box(solved.length)
        });
    });

    c.bench_function("geo_cached_birmingham_zaragoza", |b| {
        let mut geograph = geograph();
        let request = PathRequest::new(birmingham, zaragoza).with_cache(CacheTarget::Origin);
        // Warm the spanning tree so iterations measure reconstruction only.
        geograph.shortest_path(&request).expect("route exists");
        b.iter(|| {
            let solved = geograph.shortest_path(&request).expect("route exists");
            black_box(solved.length)
        });
    });

    c.bench_function("grid_a_star_50x50", |b| {
        let mut grid = maze_grid();
        let request = GridPathRequest::new(GridPoint::new(2, 25), GridPoint::new(47, 25));
        b.iter(|| {
            let solved = grid.shortest_path(&request).expect("route exists");
            black_box(solved.length)
        });
    });

    c.bench_function("grid_dijkstra_50x50", |b| {
        let mut grid = maze_grid();
        let request = GridPathRequest::new(GridPoint::new(2, 25), GridPoint::new(47, 25))
            .with_algorithm(PathAlgorithm::DijkstraMakowski);
        b.iter(|| {
            let solved = grid.shortest_path(&request).expect("route exists");
            black_box(solved.length)
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
