//! Criterion benchmarks for rust_structured_log

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_structured_log::prelude::*;
use rust_structured_log::{fields, info};

fn memory_logger(formatter: impl Formatter + 'static) -> (Logger, MemoryAppender) {
    let output = MemoryAppender::new();
    let logger = Logger::builder()
        .level(LogLevel::Info)
        .appender(output.clone())
        .formatter(formatter)
        .build();
    (logger, output)
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("builder_memory", |b| {
        b.iter(|| {
            let logger = Logger::builder().appender(MemoryAppender::new()).build();
            black_box(logger)
        });
    });

    group.finish();
}

// ============================================================================
// Filtering Benchmarks
// ============================================================================

fn bench_filtered(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered");
    group.throughput(Throughput::Elements(1));

    let (logger, _output) = memory_logger(TextFormatter::new());

    group.bench_function("method", |b| {
        b.iter(|| logger.debug(black_box("filtered out")));
    });

    group.bench_function("macro_with_args", |b| {
        b.iter(|| rust_structured_log::debug!(logger, "value {}", black_box(42)));
    });

    group.finish();
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let (text, text_output) = memory_logger(TextFormatter::new().with_disable_colors(true));
    group.bench_function("text", |b| {
        b.iter(|| {
            text.with_field("user", "alice")
                .with_field("attempts", 3)
                .info(black_box("login"));
            text_output.clear();
        });
    });

    let (json, json_output) = memory_logger(JsonFormatter::new());
    group.bench_function("json", |b| {
        b.iter(|| {
            json.with_field("user", "alice")
                .with_field("attempts", 3)
                .info(black_box("login"));
            json_output.clear();
        });
    });

    let (caller, caller_output) = memory_logger(JsonFormatter::new());
    caller.set_report_caller(true);
    group.bench_function("json_with_caller", |b| {
        b.iter(|| {
            info!(caller, "login {}", black_box(1));
            caller_output.clear();
        });
    });

    group.finish();
}

// ============================================================================
// Field Set Benchmarks
// ============================================================================

fn bench_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("fields");

    let base = fields! {
        "service" => "api",
        "region" => "eu-west-1",
        "version" => "1.4.2",
        "instance" => 7,
    };
    let overlay = fields! { "request_id" => "abc", "region" => "us-east-1" };

    group.bench_function("merge", |b| {
        b.iter(|| black_box(Fields::merge(&base, &overlay)));
    });

    let (logger, _output) = memory_logger(TextFormatter::new());
    group.bench_function("chain_five", |b| {
        b.iter(|| {
            let entry = logger
                .with_fields(base.clone())
                .with_field("a", 1)
                .with_field("b", 2)
                .with_field("c", 3)
                .with_field("d", 4);
            black_box(entry.fields().len())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_logger_creation,
    bench_filtered,
    bench_formatting,
    bench_fields
);
criterion_main!(benches);
