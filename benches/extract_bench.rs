use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use mesh_subset::algs::extract::extract;
use mesh_subset::data::{CellBlock, MarkerBlock, Mesh, Points};
use mesh_subset::io::MeshWriter;
use mesh_subset::io::xdmf::XdmfWriter;
use mesh_subset::topology::cell_type::CellType;

/// Structured `n x n` grid of squares, each split into two triangles,
/// with boundary lines; triangles are stored as `blocks` separate blocks.
fn build_grid(n: usize, blocks: usize) -> Mesh {
    let stride = n + 1;
    let points = Points::from_xy(
        (0..stride * stride).map(|i| [(i % stride) as f64, (i / stride) as f64]),
    );

    let mut tris = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            let a = j * stride + i;
            tris.push([a, a + 1, a + stride + 1]);
            tris.push([a, a + stride + 1, a + stride]);
        }
    }
    let lines: Vec<[usize; 2]> = (0..n).map(|i| [i, i + 1]).collect();

    let chunk = tris.len().div_ceil(blocks);
    let mut cells = vec![CellBlock::from_rows(CellType::Line, &lines).expect("lines")];
    let mut markers = vec![MarkerBlock::new(CellType::Line, vec![1; lines.len()])];
    for (k, rows) in tris.chunks(chunk).enumerate() {
        cells.push(CellBlock::from_rows(CellType::Triangle, rows).expect("triangles"));
        markers.push(MarkerBlock::new(CellType::Triangle, vec![k as i32; rows.len()]));
    }
    Mesh::new(points, cells)
        .expect("valid grid")
        .with_region_markers(markers)
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for &blocks in &[1usize, 16usize] {
        let mesh = build_grid(128, blocks);

        group.bench_with_input(
            BenchmarkId::new("triangles", blocks),
            &blocks,
            |b, _| {
                b.iter(|| {
                    let out = extract(&mesh, CellType::Triangle).expect("extract");
                    black_box(out);
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("write_xdmf", blocks), &blocks, |b, _| {
            let out = extract(&mesh, CellType::Triangle).expect("extract");
            let writer = XdmfWriter::default();
            b.iter(|| {
                let mut buf = Vec::new();
                writer.write(&mut buf, &out).expect("write");
                black_box(buf);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
