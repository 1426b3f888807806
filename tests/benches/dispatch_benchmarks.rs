//! # DVS Dispatch Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | dvs-01 Envelope Codec | canonical decode, re-encode of a decoded envelope |
//! | dvs-02 Message Router | full dispatch in each phase, with and without extractor |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dvs_01_envelope_codec::{EnvelopeCodec, MsgCodec};
use dvs_tests::fixtures::{envelope, ping_envelope, ping_router, Ping};
use shared_types::{DomainMessage, RequestContext, ValidatedResponse};
use std::time::Duration;

// ============================================================================
// DVS-01: Envelope Codec
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("dvs-01-envelope-codec");
    group.measurement_time(Duration::from_secs(5));
    let codec = EnvelopeCodec::default();

    for size in [1usize, 8, 64] {
        let messages: Vec<_> = (0..size as u64).map(|nonce| Ping { nonce }.to_any()).collect();
        let raw = envelope(&messages);

        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", size), &raw, |b, raw| {
            b.iter(|| black_box(codec.decode(black_box(raw)).is_ok()))
        });

        let decoded = codec.decode(&raw).unwrap();
        group.bench_with_input(BenchmarkId::new("re_encode", size), &decoded, |b, env| {
            b.iter(|| black_box(codec.encode(black_box(env)).unwrap().len()))
        });
    }

    group.finish();
}

// ============================================================================
// DVS-02: Message Router
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dvs-02-msg-router");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let raw = ping_envelope(42);

    for with_extractor in [false, true] {
        let (router, _) = ping_router(with_extractor);
        let label = if with_extractor { "extractor" } else { "plain" };

        group.bench_function(BenchmarkId::new("dispatch_request", label), |b| {
            b.iter(|| {
                runtime
                    .block_on(router.dispatch(RequestContext::background(), black_box(&raw)))
                    .unwrap()
            })
        });

        group.bench_function(BenchmarkId::new("dispatch_response", label), |b| {
            b.iter(|| {
                let ctx = RequestContext::background()
                    .with_validated_response(Some(ValidatedResponse::new(vec![], vec![1; 32])));
                runtime
                    .block_on(router.dispatch(ctx, black_box(&raw)))
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_dispatch);
criterion_main!(benches);
