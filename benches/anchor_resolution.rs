//! Anchor Codec Benchmarks
//!
//! Performance benchmarks for path encoding and resolution against a
//! realistic page tree. Restore cost is dominated by decode, so both
//! directions are measured separately.
//!
//! Run with: `cargo bench --bench anchor_resolution`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use marginalia_server::anchor::{decode, encode, NodePath};
use marginalia_server::dom::{parse_document, Document, NodeId};

/// Synthetic article page with `sections` sections of 10 paragraphs each.
fn build_page(sections: usize) -> String {
    let mut out = String::from("<html><body><article>");
    for s in 0..sections {
        out.push_str("<section><h2>Heading</h2>");
        for p in 0..10 {
            out.push_str(&format!(
                "<p>Paragraph {} of section {} with <b>inline</b> markup and enough text to look real.</p>",
                p, s
            ));
        }
        out.push_str("</section>");
    }
    out.push_str("</article></body></html>");
    out
}

/// Deepest text node in the last paragraph.
fn last_text_node(doc: &Document) -> NodeId {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|&n| doc.is_text(n))
        .last()
        .expect("page has text")
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for sections in [1usize, 10, 50] {
        let doc = parse_document(&build_page(sections)).unwrap();
        let node = last_text_node(&doc);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &sections, |b, _| {
            b.iter(|| encode(black_box(&doc), black_box(node)).unwrap());
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for sections in [1usize, 10, 50] {
        let doc = parse_document(&build_page(sections)).unwrap();
        let node = last_text_node(&doc);
        let path: NodePath = encode(&doc, node).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(sections), &sections, |b, _| {
            b.iter(|| decode(black_box(&doc), black_box(&path)).unwrap());
        });
    }
    group.finish();
}

fn bench_parse_and_resolve(c: &mut Criterion) {
    // Whole restore path: reparse the page, then resolve the stored anchor.
    let markup = build_page(10);
    let doc = parse_document(&markup).unwrap();
    let path = encode(&doc, last_text_node(&doc)).unwrap();

    c.bench_function("parse_and_resolve", |b| {
        b.iter(|| {
            let doc = parse_document(black_box(&markup)).unwrap();
            decode(&doc, black_box(&path)).unwrap()
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_parse_and_resolve);
criterion_main!(benches);
