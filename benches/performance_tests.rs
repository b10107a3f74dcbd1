//! Performance benchmarks for ringlog

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringlog::log::{PartialAssembler, RingLog, SharedLog};
use ringlog::types::Record;

/// Benchmark ring appends at steady state (every push evicts).
fn bench_ring_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_push");

    for record_len in [16usize, 256, 4096].iter() {
        group.throughput(Throughput::Bytes(*record_len as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(record_len),
            record_len,
            |b, &len| {
                let mut ring = RingLog::new(10);
                let mut payload = vec![b'x'; len - 1];
                payload.push(b'\n');
                b.iter(|| {
                    ring.push(Record::new(payload.clone()));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark offset resolution against a full ring.
fn bench_ring_locate(c: &mut Criterion) {
    let mut ring = RingLog::new(10);
    for _ in 0..10 {
        let mut payload = vec![b'x'; 255];
        payload.push(b'\n');
        ring.push(Record::new(payload));
    }
    let total = ring.total_bytes();

    c.bench_function("ring_locate_last_byte", |b| {
        b.iter(|| ring.locate(total - 1).unwrap());
    });
}

/// Benchmark newline scanning and record extraction.
fn bench_assembler(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembler");

    for chunk_len in [64usize, 1024, 16384].iter() {
        group.throughput(Throughput::Bytes(*chunk_len as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_len),
            chunk_len,
            |b, &len| {
                let mut chunk = vec![b'x'; len - 1];
                chunk.push(b'\n');
                b.iter(|| {
                    let mut asm = PartialAssembler::new();
                    asm.feed(&chunk);
                    asm.take_record().unwrap()
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the full append-then-snapshot cycle a connection performs per
/// record.
fn bench_facade_append_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("facade_append_snapshot");
    group.throughput(Throughput::Elements(1));

    group.bench_function("steady_state", |b| {
        let log = SharedLog::new(10);
        let mut cursor = 0u64;
        for i in 0..10 {
            log.append(format!("warmup record {}\n", i).as_bytes(), &mut cursor);
        }
        b.iter(|| {
            log.append(b"one more record\n", &mut cursor);
            let snapshot = log.snapshot_from(0);
            cursor = 0;
            snapshot
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ring_push,
    bench_ring_locate,
    bench_assembler,
    bench_facade_append_snapshot
);
criterion_main!(benches);
