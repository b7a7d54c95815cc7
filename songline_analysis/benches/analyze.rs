//! Benchmarks for the analysis pipeline.
//!
//! Covers the full analyze_poem pass over poems of different character
//! (regular verse, cluster-heavy verse, a long multi-stanza text), plus
//! the one-time lexicon load and the JSON encode of a finished analysis.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use songline_analysis::{analyze_poem, default_lexicon};

const SONNET_QUATRAIN: &str = "\
Shall I compare thee to a summer's day?
Thou art more lovely and more temperate:
Rough winds do shake the darling buds of May,
And summer's lease hath all too short a date:";

const TWISTER: &str = "\
she sells seashells by the seashore
the shells she sells are surely seashells
so if she sells shells on the seashore
i'm sure she sells seashore shells";

fn bench_analyze_poem(c: &mut Criterion) {
    let lexicon = default_lexicon();
    // 8 quatrain stanzas, 32 lines.
    let long_poem = vec![SONNET_QUATRAIN; 8].join("\n\n");

    let mut group = c.benchmark_group("analyze_poem");
    for (name, text) in [
        ("quatrain", SONNET_QUATRAIN),
        ("twister", TWISTER),
        ("eight_stanzas", long_poem.as_str()),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(analyze_poem(black_box(&lexicon), black_box(text))));
        });
    }
    group.finish();
}

fn bench_default_lexicon(c: &mut Criterion) {
    c.bench_function("default_lexicon_load", |b| {
        b.iter(|| black_box(default_lexicon()));
    });
}

fn bench_serialize(c: &mut Criterion) {
    let lexicon = default_lexicon();
    let analysis = analyze_poem(&lexicon, SONNET_QUATRAIN);
    c.bench_function("analysis_to_json", |b| {
        b.iter(|| black_box(analysis.to_json().unwrap()));
    });
}

criterion_group!(
    benches,
    bench_analyze_poem,
    bench_default_lexicon,
    bench_serialize
);
criterion_main!(benches);
