//! Benchmarks for mesh operations.

use ahf_mesh::algo::subdivide::{catmull_clark, loop_subdivision, SubdivideOptions};
use ahf_mesh::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point3;

fn grid_vertices(n: usize) -> Vec<Point3<f64>> {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }
    vertices
}

fn grid_quads(n: usize) -> Vec<[usize; 4]> {
    let mut faces = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            faces.push([v00, v10, v11, v01]);
        }
    }
    faces
}

fn grid_triangles(n: usize) -> Vec<[usize; 3]> {
    grid_quads(n)
        .into_iter()
        .flat_map(|[v00, v10, v11, v01]| [[v00, v10, v11], [v00, v11, v01]])
        .collect()
}

fn bench_mesh_construction(c: &mut Criterion) {
    let vertices = grid_vertices(30);
    let triangles = grid_triangles(30);
    let quads = grid_quads(30);

    c.bench_function("build_triangle_grid_30x30", |b| {
        b.iter(|| build_from_triangles(&vertices, &triangles).unwrap());
    });

    c.bench_function("build_quad_grid_30x30", |b| {
        b.iter(|| build_from_quads(&vertices, &quads).unwrap());
    });
}

fn bench_topology_queries(c: &mut Criterion) {
    let mesh = build_from_triangles(&grid_vertices(50), &grid_triangles(50)).unwrap();
    let topo = mesh.topology();

    c.bench_function("vertex_adjacent_vertices_all", |b| {
        b.iter(|| {
            let mut count = 0;
            for v in mesh.vertex_keys() {
                count += topo.vertex_adjacent_vertices(v).len();
            }
            count
        });
    });

    c.bench_function("unique_edges", |b| {
        b.iter(|| topo.unique_edges().len());
    });

    c.bench_function("naked_edges", |b| {
        b.iter(|| topo.naked_edges().len());
    });

    c.bench_function("vertex_normals_parallel", |b| {
        b.iter(|| topo.compute_all_vertices_normals(&NormalOptions::default()));
    });

    c.bench_function("vertex_normals_sequential", |b| {
        b.iter(|| topo.compute_all_vertices_normals(&NormalOptions::default().sequential()));
    });
}

fn bench_subdivision(c: &mut Criterion) {
    let quads = build_from_quads(&grid_vertices(20), &grid_quads(20)).unwrap();
    let triangles = build_from_triangles(&grid_vertices(20), &grid_triangles(20)).unwrap();

    c.bench_function("catmull_clark_20x20", |b| {
        b.iter(|| catmull_clark(&quads, &SubdivideOptions::new(1)).unwrap());
    });

    c.bench_function("loop_20x20", |b| {
        b.iter(|| loop_subdivision(&triangles, &SubdivideOptions::new(1)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_mesh_construction,
    bench_topology_queries,
    bench_subdivision
);
criterion_main!(benches);
