use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chess_engine::movegen::perft::perft;
use chess_engine::movegen::generate_moves;
use chess_engine::Position;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    depth: u32,
    expected_nodes: u64,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depth: 4,
        expected_nodes: 197_281,
    },
    BenchCase {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depth: 3,
        expected_nodes: 97_862,
    },
    BenchCase {
        name: "endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depth: 4,
        expected_nodes: 43_238,
    },
];

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    for case in CASES {
        let position = Position::from_fen(case.fen).unwrap();
        group.throughput(Throughput::Elements(case.expected_nodes));
        group.bench_with_input(BenchmarkId::from_parameter(case.name), &position, |b, pos| {
            b.iter(|| {
                let nodes = perft(black_box(pos), case.depth);
                assert_eq!(nodes, case.expected_nodes);
                nodes
            })
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_moves");

    for case in CASES {
        let position = Position::from_fen(case.fen).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(case.name), &position, |b, pos| {
            b.iter(|| generate_moves(black_box(pos)).len())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen);
criterion_main!(benches);
