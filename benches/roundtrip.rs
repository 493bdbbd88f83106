use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use lzb::decode::Decoder;
use lzb::encode::Encoder;

fn random_data(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(0x5eed).fill_bytes(&mut data);
    data
}

fn text_data(len: usize) -> Vec<u8> {
    b"TOBEORNOTTOBEORTOBEORNOT"
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn bench_encode(c: &mut Criterion, name: &str, data: &[u8]) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_with_input(BenchmarkId::new(name, data.len()), data, |b, data| {
        b.iter(|| {
            let mut compressed = vec![];
            let result = Encoder::new().encode_all(black_box(data), &mut compressed);
            result.status.expect("encode failed");
            black_box(&compressed);
        })
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion, name: &str, data: &[u8]) {
    let mut compressed = vec![];
    Encoder::new()
        .encode_all(data, &mut compressed)
        .status
        .expect("encode failed");

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_with_input(
        BenchmarkId::new(name, data.len()),
        &compressed,
        |b, compressed| {
            b.iter(|| {
                let mut restored = vec![];
                let result = Decoder::new().decode_all(black_box(&compressed[..]), &mut restored);
                result.status.expect("decode failed");
                black_box(&restored);
            })
        },
    );
    group.finish();
}

fn encode_text(c: &mut Criterion) {
    bench_encode(c, "text", &text_data(1 << 14));
}

fn encode_random(c: &mut Criterion) {
    bench_encode(c, "random", &random_data(1 << 14));
}

fn decode_text(c: &mut Criterion) {
    bench_decode(c, "text", &text_data(1 << 14));
}

fn decode_random(c: &mut Criterion) {
    bench_decode(c, "random", &random_data(1 << 14));
}

criterion_group!(benches, encode_text, encode_random, decode_text, decode_random);
criterion_main!(benches);
