//! Benchmark SHA-256 circuit synthesis and witness generation

use board::{Board, Gadget, Params};
use circuits::{bits_from_u32s, DigestVariable, Sha256CompressionGadget};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pasta_curves::Fp;

fn build(params: &std::sync::Arc<Params<Fp>>) -> (Board<Fp>, DigestVariable, DigestVariable, Sha256CompressionGadget) {
    let mut b = Board::new(params.clone());
    let left = DigestVariable::digest(&mut b, "left");
    let right = DigestVariable::digest(&mut b, "right");
    let out = DigestVariable::digest(&mut b, "out");
    let mut sha = Sha256CompressionGadget::new(&mut b, &left, &right, &out, "sha").unwrap();
    sha.generate_constraints(&mut b).unwrap();
    (b, left, right, sha)
}

fn bench_constraints(c: &mut Criterion) {
    let params = Params::with_defaults();
    c.bench_function("sha256_two_to_one_constraints", |bench| {
        bench.iter(|| black_box(build(&params).0.num_constraints()))
    });
}

fn bench_witness(c: &mut Criterion) {
    let params = Params::with_defaults();
    let left_bits = bits_from_u32s(&[0x426bc2d8; 8]);
    let right_bits = bits_from_u32s(&[0x038cce42; 8]);
    c.bench_function("sha256_two_to_one_witness", |bench| {
        bench.iter_batched(
            || build(&params),
            |(mut b, mut left, mut right, mut sha)| {
                left.generate_witness(&mut b, &left_bits).unwrap();
                right.generate_witness(&mut b, &right_bits).unwrap();
                sha.generate_witness(&mut b).unwrap();
                black_box(b.is_satisfied().unwrap())
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_constraints, bench_witness);
criterion_main!(benches);
