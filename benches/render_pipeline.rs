// SPDX-License-Identifier: MPL-2.0
use clarifi_studio::domain::editing::{
    AdjustmentField, FilterName, FlipAxis, ResizeRequest, RotationAngle, TransformOp,
};
use clarifi_studio::media::{adjustment, AdjustmentState, RasterBuffer, TransformEngine};
use criterion::{criterion_group, criterion_main, Criterion};
use image_rs::{ImageBuffer, Rgba};
use std::hint::black_box;

fn sample(width: u32, height: u32) -> RasterBuffer {
    RasterBuffer::from_image(ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255])
    }))
}

fn render_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let base = sample(1024, 768);

    let mut sliders = AdjustmentState::default();
    sliders.set(AdjustmentField::Brightness, 1.2);
    sliders.set(AdjustmentField::Contrast, 0.8);
    sliders.set(AdjustmentField::Saturation, 1.4);

    group.bench_function("identity", |b| {
        let identity = AdjustmentState::default();
        b.iter(|| black_box(adjustment::render(&base, &identity)));
    });

    group.bench_function("sliders", |b| {
        b.iter(|| black_box(adjustment::render(&base, &sliders)));
    });

    for filter in [FilterName::Sepia, FilterName::Blur] {
        let mut state = sliders;
        state.filter = filter;
        group.bench_function(format!("sliders_{}", filter.as_str()), |b| {
            b.iter(|| black_box(adjustment::render(&base, &state)));
        });
    }

    group.finish();
}

fn transform_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    let base = sample(1024, 768);

    let ops = [
        TransformOp::Resize(ResizeRequest::width(512)),
        TransformOp::Rotate(RotationAngle::from_degrees(90).expect("valid angle")),
        TransformOp::Flip(FlipAxis::Horizontal),
    ];
    for op in ops {
        group.bench_function(op.name(), |b| {
            b.iter(|| black_box(TransformEngine::apply(&base, &op).expect("transform")));
        });
    }

    group.finish();
}

criterion_group!(benches, render_benchmark, transform_benchmark);
criterion_main!(benches);
