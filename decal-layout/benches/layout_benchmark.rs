use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use decal_core::node::{DocumentTree, Node};
use decal_core::style::{BoxStyle, FlexDirection, Length, TextStyle};
use decal_core::Extent;
use decal_layout::{LayoutTree, MeasuredText, TextMeasurer};

/// Fixed-advance measurer so benchmarks run without a font backend.
struct MonoMeasurer;

impl TextMeasurer for MonoMeasurer {
    fn measure(&self, content: &str, style: &TextStyle) -> MeasuredText {
        MeasuredText {
            width: content.chars().count() as f32 * style.font_size * 0.6,
            height: style.font_size * 1.2,
        }
    }
}

/// A column of `n` rows, each holding a text leaf and a fixed box.
fn make_document(n: usize) -> DocumentTree {
    let rows = (0..n)
        .map(|i| {
            Node::container(
                BoxStyle {
                    direction: FlexDirection::Row,
                    height: Length::Px(24.0),
                    ..Default::default()
                },
                vec![
                    Node::text(format!("row {i}"), TextStyle::default()),
                    Node::container(
                        BoxStyle {
                            width: Length::Px(120.0),
                            height: Length::Px(16.0),
                            ..Default::default()
                        },
                        vec![],
                    ),
                ],
            )
        })
        .collect();

    DocumentTree::new(Node::container(
        BoxStyle {
            width: Length::Percent(1.0),
            height: Length::Percent(1.0),
            direction: FlexDirection::Column,
            ..Default::default()
        },
        rows,
    ))
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_solve");
    for count in [10, 100, 1_000] {
        let doc = make_document(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &doc, |b, doc| {
            b.iter(|| {
                LayoutTree::solve(doc, &MonoMeasurer, Extent::square(1024)).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_build_only(c: &mut Criterion) {
    let doc = make_document(100);
    c.bench_function("layout_build_100", |b| {
        b.iter(|| {
            LayoutTree::build(&doc, &MonoMeasurer).unwrap();
        })
    });
}

criterion_group!(benches, bench_solve, bench_build_only);
criterion_main!(benches);
