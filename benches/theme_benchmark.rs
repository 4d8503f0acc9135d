use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::path::Path;
use tailwind_theme::{dashboard_preset, resolve_content, validate, AnimationShorthand, ScanOptions, TailwindConfig};
use tempfile::TempDir;

/// Create a template tree for scanning
fn create_test_files(dir: &Path, count: usize) {
    for i in 0..count {
        let sub = dir.join(format!("templates/section{}", i % 10));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("page{}.html", i)), "<div class=\"flex p-4\"></div>").unwrap();
    }
}

fn benchmark_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("config");
    let config = dashboard_preset();
    let json = config.to_json().unwrap();

    group.bench_function("parse_json", |b| {
        b.iter(|| TailwindConfig::from_json_str(black_box(&json)).unwrap())
    });

    #[cfg(feature = "js")]
    {
        let js = config.to_js_module().unwrap();
        group.bench_function("parse_js_module", |b| {
            b.iter(|| TailwindConfig::from_js_str(black_box(&js), "tailwind.config.js").unwrap())
        });
    }

    group.bench_function("validate", |b| b.iter(|| validate(black_box(&config))));

    group.bench_function("parse_animation", |b| {
        b.iter(|| {
            AnimationShorthand::parse(black_box("text-slide 12.5s cubic-bezier(0.83, 0, 0.17, 1) infinite"))
                .unwrap()
        })
    });

    group.finish();
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.sample_size(10);

    let temp_dir = TempDir::new().unwrap();
    create_test_files(temp_dir.path(), 500);
    let patterns = vec!["./templates/**/*.html".to_string()];

    for threads in [1, 2, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::new("threads", threads), threads, |b, &threads| {
            let options = ScanOptions {
                base_dir: temp_dir.path().to_path_buf(),
                jobs: Some(threads),
                ..ScanOptions::default()
            };
            b.iter(|| resolve_content(&patterns, &options, |_, _| {}).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_config, benchmark_scan);
criterion_main!(benches);
