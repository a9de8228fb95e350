//! Benchmarks for tree construction and serialization.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use elem::{
    Element, PrettyConfig, body, div, h, head, html, indent_html, li, p, raw_html, title, ul,
    with_isolated_scope,
};

/// Build a page with `sections` sections of `items` list items each.
fn build_page(sections: usize, items: usize) -> Element {
    html("en").append((
        head().append(title("Benchmark")),
        body().append_all((0..sections).map(|i| {
            div().class("section").append((
                h(2).append(format!("Section {i}")),
                p().append("Some <escaped> & quoted \"text\""),
                raw_html("<hr class=\"divider\">"),
                ul().append_all((0..items).map(|j| li().append(format!("Item {j}")))),
            ))
        })),
    ))
}

fn bench_create_element(c: &mut Criterion) {
    c.bench_function("create_element_with_attrs", |b| {
        b.iter(|| {
            with_isolated_scope(|_| {
                div()
                    .id("app")
                    .class("container fluid")
                    .data("state", "ready")
                    .append("Hello")
            })
        });
    });
}

fn bench_class_merge(c: &mut Criterion) {
    c.bench_function("class_merge_20_tokens", |b| {
        b.iter(|| {
            with_isolated_scope(|_| {
                let el = div();
                for i in 0..20 {
                    el.class(&format!("c{} c{}", i % 7, i));
                }
                el
            })
        });
    });
}

fn bench_list_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_append");

    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("items", count), &count, |b, &count| {
            b.iter(|| {
                with_isolated_scope(|_| {
                    let items: Vec<Element> =
                        (0..count).map(|i| li().append(i.to_string())).collect();
                    ul().append(items).to_html()
                })
            });
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for (sections, items) in [(5, 5), (20, 20), (50, 40)] {
        with_isolated_scope(|_| {
            let page = build_page(sections, items);
            let size = page.to_html().len();
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new("flat", format!("{sections}s_{items}i")),
                &page,
                |b, page| b.iter(|| page.to_html()),
            );
            group.bench_with_input(
                BenchmarkId::new("pretty", format!("{sections}s_{items}i")),
                &page,
                |b, page| b.iter(|| page.to_pretty_html()),
            );
        });
    }

    group.finish();
}

fn bench_indent_html(c: &mut Criterion) {
    let flat = with_isolated_scope(|_| build_page(20, 20).to_html());
    let config = PrettyConfig::default();

    c.bench_function("indent_html_20s_20i", |b| {
        b.iter(|| indent_html(&flat, &config));
    });
}

criterion_group!(
    benches,
    bench_create_element,
    bench_class_merge,
    bench_list_append,
    bench_serialize,
    bench_indent_html,
);
criterion_main!(benches);
