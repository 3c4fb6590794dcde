//! Benchmarks for rendering document trees.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use doctree_model::{Block, BlockKind, HeaderLevel, Tree};
use doctree_render::{PlainTextRenderer, WikiSyntaxRenderer, XhtmlRenderer, render};

/// Generate a document with the given structure.
fn generate_document(sections: usize, paragraphs_per_section: usize) -> Block {
    let mut document = Block::new(BlockKind::Document);
    for i in 0..sections {
        document = document.child(Block::header(
            HeaderLevel::Level2,
            vec![Block::word("Section"), Block::space(), Block::word(i.to_string())],
        ));
        for j in 0..paragraphs_per_section {
            document = document.child(Block::paragraph(vec![
                Block::word("Paragraph"),
                Block::space(),
                Block::word(j.to_string()),
                Block::space(),
                Block::word("with"),
                Block::space(),
                Block::new(BlockKind::Format(doctree_model::Format::Bold))
                    .child(Block::word("bold")),
                Block::space(),
                Block::word("text."),
            ]));
        }
    }
    document
}

fn bench_render_simple(c: &mut Criterion) {
    c.bench_function("render_simple_xhtml", |b| {
        b.iter(|| {
            let mut tree = Tree::from_block(
                Block::new(BlockKind::Document)
                    .child(Block::paragraph(vec![Block::word("Hello")])),
            );
            render(&mut tree, XhtmlRenderer::new()).unwrap()
        });
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_by_size");

    for (sections, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let block = generate_document(sections, paragraphs);
        let size = {
            let mut tree = Tree::from_block(block.clone());
            render(&mut tree, XhtmlRenderer::new()).unwrap().len()
        };
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("xhtml", format!("{sections}s_{paragraphs}p")),
            &block,
            |b, block| {
                b.iter(|| {
                    let mut tree = Tree::from_block(block.clone());
                    render(&mut tree, XhtmlRenderer::new()).unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_backends(c: &mut Criterion) {
    let block = generate_document(20, 3);
    let mut group = c.benchmark_group("render_backends");

    group.bench_function("plain", |b| {
        b.iter(|| {
            let mut tree = Tree::from_block(block.clone());
            render(&mut tree, PlainTextRenderer::new()).unwrap()
        });
    });
    group.bench_function("wiki", |b| {
        b.iter(|| {
            let mut tree = Tree::from_block(block.clone());
            render(&mut tree, WikiSyntaxRenderer::new()).unwrap()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_varying_sizes,
    bench_backends
);
criterion_main!(benches);
