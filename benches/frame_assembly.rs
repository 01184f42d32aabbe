use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use thermocast::colormap::Colormap;
use thermocast::decode::FrameDecoder;
use thermocast::test_utils::WireFrameBuilder;
use thermocast::variant::CameraVariant;
use thermocast::wire::{FeedResult, FrameAssembler};

fn bench_frame(variant: CameraVariant) -> Vec<u8> {
    WireFrameBuilder::for_variant(variant)
        .uniform_thermal(variant, 2000)
        .thermal_sample(variant, 10, 10, 3200)
        .visible_fill(0x55)
        .build()
}

fn reassembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("reassembly");
    for variant in [CameraVariant::G3, CameraVariant::Pro] {
        let frame = bench_frame(variant);
        group.throughput(Throughput::Bytes(frame.len() as u64));
        group.bench_function(format!("{variant:?}_512B_chunks"), |b| {
            b.iter_batched(
                FrameAssembler::new,
                |mut asm| {
                    let mut frames = 0usize;
                    for chunk in frame.chunks(512) {
                        if let FeedResult::Frame(_) = asm.feed(chunk) {
                            frames += 1;
                        }
                    }
                    assert_eq!(frames, 1);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for variant in [CameraVariant::G3, CameraVariant::Pro] {
        let frame = bench_frame(variant);
        let decoder = FrameDecoder::new(variant, Colormap::grayscale());
        group.bench_function(format!("{variant:?}"), |b| {
            b.iter(|| {
                let mut asm = FrameAssembler::new();
                match asm.feed(&frame) {
                    FeedResult::Frame(frame) => {
                        decoder.decode_with_clock(&frame, "12:00:00").unwrap()
                    }
                    other => panic!("expected frame, got {other:?}"),
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, reassembly, decode);
criterion_main!(benches);
