use criterion::{Criterion, criterion_group, criterion_main};
use notedown_syntax::{lex, parse, resolve};

fn generate_note(size: usize) -> String {
    let base = concat!(
        "---\ntitle: Weekly review\n---\n# Title\n\n## Section\n\n",
        "Paragraph with *some* **content** and a [[Linked Page|link]].\n\n",
        "- Bullet point #todo\n\t- Nested item with `code`\n",
        "- Another item ![[diagram.png|640x480]]\n\n",
        "1. First\n2. Second\n\n",
        "> Quoted [source](https://example.org)\n\n",
        "```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n",
    );
    base.repeat(size)
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = generate_note(100);
    group.bench_function("lex", |b| {
        b.iter(|| std::hint::black_box(lex(std::hint::black_box(&content))));
    });
    group.bench_function("lex_resolve", |b| {
        b.iter(|| std::hint::black_box(resolve(lex(std::hint::black_box(&content)))));
    });
    group.bench_function("parse", |b| {
        b.iter(|| std::hint::black_box(parse(std::hint::black_box(&content))));
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
