//! Benchmarks for the glyph renderer.

use std::hint::black_box;

use am_ascii::{LuminanceField, Renderer, render_all_resolutions};
use am_core::config::RenderConfig;
use am_core::frame::PixelBuffer;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn synthetic(width: u32, height: u32) -> PixelBuffer {
    let mut fb = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            fb.set_pixel(x, y, [r, g, r ^ g, 255]);
        }
    }
    fb
}

fn bench_luminance(c: &mut Criterion) {
    let src = synthetic(1920, 1080);
    c.bench_function("luminance_field_1080p", |b| {
        b.iter(|| LuminanceField::from_buffer(black_box(&src)));
    });
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let src = synthetic(1920, 1080);
    let field = LuminanceField::from_buffer(&src);

    for width in [120u32, 400, 1200] {
        let renderer = Renderer::new(RenderConfig::new(width)).unwrap();
        group.bench_with_input(BenchmarkId::new("edges_aa", width), &width, |b, _| {
            b.iter(|| renderer.render_field(black_box(&field)));
        });

        let plain = Renderer::new(
            RenderConfig::new(width)
                .with_edge_detection(false)
                .with_anti_aliasing(false),
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("nearest", width), &width, |b, _| {
            b.iter(|| plain.render_field(black_box(&field)));
        });
    }
    group.finish();
}

fn bench_multires(c: &mut Criterion) {
    let src = synthetic(1280, 720);
    c.bench_function("multires_800_400_120", |b| {
        b.iter(|| render_all_resolutions(black_box(&src), &[800, 400, 120]).unwrap());
    });
}

criterion_group!(benches, bench_luminance, bench_render, bench_multires);
criterion_main!(benches);
