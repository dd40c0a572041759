//! This bench renders a large link list, the common shape of watched files.

#![allow(missing_docs)]

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};
use txtwatch::{Document, Grammar};

/// Generates sections of titled link lists separated by blank lines
fn link_list(sections: usize, items: usize) -> String {
    let mut text = String::new();
    for section in 0..sections {
        writeln!(text, "Section {section} | 第{section}节").unwrap();
        for item in 1..=items {
            writeln!(
                text,
                "{item}. Site {section}-{item} [URL:https://example.com/{section}/{item}] [MOBILE:https://m.example.com/{item}]"
            )
            .unwrap();
        }
        writeln!(text, "\nSome closing remarks for section {section}.\n").unwrap();
    }
    text
}

fn render(c: &mut Criterion) {
    let grammar = Grammar::default();
    let text = link_list(100, 50);

    c.bench_function("render link list", |b| {
        b.iter(|| Document::parse("bench", text.lines(), &grammar).render());
    });
}

criterion_group!(benches, render);
criterion_main!(benches);
