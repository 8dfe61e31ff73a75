//! Criterion benchmarks for shipwright critical paths
//!
//! Benchmarks the text transforms every build runs:
//! - Minify: script minification over growing module sizes
//! - Concat: fragment joining
//! - Embed: icon collapsing and escaping
//! - Styles: stylesheet prefixing and minification

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shipwright::build::{concat_fragments, embed_resources, SourceKind, SourceUnit, DEFAULT_SEPARATOR};
use shipwright::finish::{minify_css, minify_script, prefix_css};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a script with `n` small component definitions
fn make_script(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "/**\n * Component {i}\n */\nfunction Component{i}(parent) {{\n  // state\n  this.parent = parent;\n  this.label = 'component \\'{i}\\'';\n  this.pattern = /^psv-[a-z]+$/i;\n  this.size = {i} * 2 + 0.5;\n}}\n\nComponent{i}.prototype.render = function () {{\n  return `<div class=\"c{i}\">${{this.label}}</div>`;\n}};\n"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate a multi-line SVG icon
fn make_icon(paths: usize) -> String {
    let body: String = (0..paths).map(|i| format!("  <path d=\"M{i} 0L{i} 10\"/>\n")).collect();
    format!("<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 100\">\n{}</svg>\n", body)
}

/// Generate a stylesheet with `n` rules
fn make_css(n: usize) -> String {
    (0..n)
        .map(|i| format!(".psv-item-{i} {{\n  user-select: none;\n  transition: opacity 0.{i}s;\n  margin: 0px {i}px;\n}}\n"))
        .collect()
}

// =============================================================================
// Minify Benchmarks
// =============================================================================

fn bench_minify(c: &mut Criterion) {
    let mut group = c.benchmark_group("minify");

    for size in [10, 100, 500].iter() {
        let script = make_script(*size);
        group.throughput(Throughput::Bytes(script.len() as u64));
        group.bench_with_input(BenchmarkId::new("script", size), &script, |b, script| {
            b.iter(|| minify_script(black_box(script)))
        });
    }

    group.finish();
}

// =============================================================================
// Concat / Embed Benchmarks
// =============================================================================

fn bench_concat(c: &mut Criterion) {
    let mut group = c.benchmark_group("concat");

    for count in [10, 100, 1000].iter() {
        let fragments: Vec<String> = (0..*count).map(|i| make_script(1).replace("Component0", &format!("C{i}"))).collect();
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("fragments", count), &fragments, |b, fragments| {
            b.iter(|| concat_fragments(black_box(fragments), DEFAULT_SEPARATOR))
        });
    }

    group.finish();
}

fn bench_embed(c: &mut Criterion) {
    let mut group = c.benchmark_group("embed");

    let units: Vec<SourceUnit> = (0..40)
        .map(|i| SourceUnit::new(format!("icons/icon-{i}.svg"), make_icon(20), SourceKind::Resource))
        .collect();
    group.throughput(Throughput::Elements(units.len() as u64));
    group.bench_function("icons_40", |b| b.iter(|| embed_resources(black_box(&units))));

    group.finish();
}

// =============================================================================
// Stylesheet Benchmarks
// =============================================================================

fn bench_styles(c: &mut Criterion) {
    let mut group = c.benchmark_group("styles");
    let browsers = vec!["last 2 versions".to_string(), "ie >= 11".to_string()];

    for size in [10, 200].iter() {
        let css = make_css(*size);
        group.throughput(Throughput::Bytes(css.len() as u64));
        group.bench_with_input(BenchmarkId::new("prefix", size), &css, |b, css| {
            b.iter(|| prefix_css(black_box(css), &browsers))
        });
        group.bench_with_input(BenchmarkId::new("minify", size), &css, |b, css| {
            b.iter(|| minify_css(black_box(css)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_minify, bench_concat, bench_embed, bench_styles);
criterion_main!(benches);
