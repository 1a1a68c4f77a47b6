use criterion::{criterion_group, criterion_main, Criterion};
use viewfinder::convert::convert_into;
use viewfinder::image::{Image, PixelFormat};

pub fn benchmark_convert(c: &mut Criterion) {
    let fmts = [
        PixelFormat::Rgb565,
        PixelFormat::Bgr888,
        PixelFormat::I420,
        PixelFormat::Nv12,
        PixelFormat::Yuy2,
        PixelFormat::Uyvy,
        PixelFormat::I400,
    ];
    let dims = [(320, 240), (640, 480), (1280, 720), (1920, 1080)];

    for src_fmt in fmts.iter() {
        let mut group = c.benchmark_group(format!("convert/{}", src_fmt));
        for dim in dims.iter() {
            let src = Image::new(dim.0, dim.1, *src_fmt).unwrap();
            group.bench_with_input(format!("{}x{}", dim.0, dim.1), &src, |b, src| {
                let mut dst = Image::new(src.width(), src.height(), PixelFormat::Rgb565).unwrap();
                b.iter(|| convert_into(src, &mut dst, 0, 0))
            });
        }
    }
}

pub fn benchmark_resize(c: &mut Criterion) {
    use viewfinder::transform::{resize, Filter};

    let dims = [(320, 240), (640, 480), (1920, 1080)];
    for filter in [Filter::Nearest, Filter::Bilinear] {
        let mut group = c.benchmark_group(format!("resize/{filter:?}"));
        for src_dim in dims.iter() {
            for dst_dim in dims.iter() {
                let src = Image::new(src_dim.0, src_dim.1, PixelFormat::Rgb565).unwrap();
                group.bench_with_input(
                    format!(
                        "{}x{}-{}x{}",
                        src_dim.0, src_dim.1, dst_dim.0, dst_dim.1
                    ),
                    &src,
                    |b, src| {
                        let mut dst =
                            Image::new(dst_dim.0, dst_dim.1, PixelFormat::Rgb565).unwrap();
                        b.iter(|| resize(src, &mut dst, filter))
                    },
                );
            }
        }
    }
}

criterion_group!(benches, benchmark_convert, benchmark_resize);
criterion_main!(benches);
