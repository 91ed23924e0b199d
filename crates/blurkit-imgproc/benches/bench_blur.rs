use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use blurkit_image::Image;
use blurkit_imgproc::blur::{blur_image, BlurKind, BlurRequest};
use blurkit_imgproc::parallel::ExecutionStrategy;

fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("Blur");

    for (width, height) in [(256, 224), (512, 448)].iter() {
        for kernel_size in [3, 5, 9, 17].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * *kernel_size * *kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);

            let image_data = (0..width * height * 4).map(|i| (i % 251) as u8).collect();
            let image = Image::<u8, 4>::new([*width, *height].into(), image_data).unwrap();

            for (name, kind) in [
                ("mean", BlurKind::Mean),
                ("gaussian", BlurKind::Gaussian { sigma: 1.5 }),
            ] {
                for (strategy_name, execution) in [
                    ("serial", ExecutionStrategy::Serial),
                    ("elements", ExecutionStrategy::ParallelElements),
                    ("rows", ExecutionStrategy::ParallelRows),
                ] {
                    let request = BlurRequest::new(kind, *kernel_size).with_execution(execution);
                    group.bench_with_input(
                        BenchmarkId::new(format!("{name}_{strategy_name}"), &parameter_string),
                        &image,
                        |b, i| b.iter(|| black_box(blur_image(i, &request))),
                    );
                }
            }
        }
    }
    group.finish();
}

criterion_group!(benches, bench_blur);
criterion_main!(benches);
