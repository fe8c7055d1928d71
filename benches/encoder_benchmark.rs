use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use shortclass::{encode_sentence, Classifier, Corpus, DenseSoftmax, EmbeddingTable};

const VECSIZE: usize = 50;
const MAXLEN: usize = 15;

fn setup_benchmark_table() -> EmbeddingTable {
    let mut table = EmbeddingTable::new(VECSIZE);
    for i in 0..500 {
        let vector = Array1::from_iter((0..VECSIZE).map(|j| ((i * 31 + j * 7) % 97) as f32 / 97.0));
        table.insert(format!("word{}", i), vector).unwrap();
    }
    table
}

fn sentence(len: usize) -> String {
    (0..len)
        .map(|i| format!("word{}", i % 500))
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_encoding(c: &mut Criterion) {
    let table = setup_benchmark_table();
    let mut group = c.benchmark_group("Encoding");

    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    // Short text (< 10 tokens)
    let short = sentence(5);
    group.bench_function("short_text", |b| {
        b.iter(|| encode_sentence(black_box(&short), MAXLEN, VECSIZE, &table))
    });

    // Right at the token limit
    let medium = sentence(MAXLEN);
    group.bench_function("medium_text", |b| {
        b.iter(|| encode_sentence(black_box(&medium), MAXLEN, VECSIZE, &table))
    });

    // Long text, mostly truncated
    let long = sentence(200);
    group.bench_function("long_text", |b| {
        b.iter(|| encode_sentence(black_box(&long), MAXLEN, VECSIZE, &table))
    });

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scoring");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let class_counts = [2, 5, 10, 20];
    for &count in &class_counts {
        let mut corpus = Corpus::new();
        for i in 0..count {
            corpus.insert(
                format!("class_{}", i),
                vec![sentence(4 + i % 3), sentence(6 + i % 4)],
            );
        }

        let mut classifier = Classifier::new(setup_benchmark_table())
            .with_vecsize(VECSIZE)
            .with_maxlen(MAXLEN);
        classifier
            .train(&corpus, DenseSoftmax::new(VECSIZE, count), 20)
            .unwrap();

        let input = sentence(8);
        group.bench_function(format!("classes_{}", count), |b| {
            b.iter(|| classifier.score(black_box(&input)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encoding, bench_scoring);
criterion_main!(benches);
