//! 同梱語彙を用いたデコードと分類のベンチマーク
//!
//! 修飾句のコーパスに対して、キャッシュなしのデコード、キャッシュありのデコード、
//! 記述の分類の速度を計測します。語彙の構築時間も別に計測します。

use std::sync::Arc;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use wikitag::{ClassifyOptions, DecodeOptions, Decoder, Vocabulary, VocabularyBuilder, VocabularySources};

const CORPUS: &str = include_str!("./resources/qualifiers.txt");

fn bench_decoding(c: &mut Criterion) {
    let vocab = Arc::new(Vocabulary::bundled().expect("Failed to build the bundled vocabulary"));
    let lines: Vec<&str> = CORPUS.lines().collect();

    let mut group = c.benchmark_group("Decoding (bundled)");
    group.throughput(Throughput::Bytes(CORPUS.len() as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    group.bench_function(BenchmarkId::new("decode_tags", "Uncached"), |b| {
        b.iter_with_setup(
            || {
                Decoder::from_shared_vocabulary(vocab.clone())
                    .cache_capacity(Some(0))
                    .new_worker()
            },
            |mut worker| {
                for line in &lines {
                    worker.decode_tags(line, DecodeOptions::default());
                }
            },
        );
    });

    group.bench_function(BenchmarkId::new("decode_tags", "Cached"), |b| {
        let mut worker = Decoder::from_shared_vocabulary(vocab.clone()).new_worker();
        b.iter(|| {
            for line in &lines {
                worker.decode_tags(line, DecodeOptions::default());
            }
        });
    });

    group.bench_function(BenchmarkId::new("classify_desc", "Uncached"), |b| {
        b.iter_with_setup(
            || {
                Decoder::from_shared_vocabulary(vocab.clone())
                    .cache_capacity(Some(0))
                    .new_worker()
            },
            |mut worker| {
                for line in &lines {
                    worker.classify_desc(line, ClassifyOptions::default());
                }
            },
        );
    });

    group.finish();
}

fn bench_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("Vocabulary building");
    group.sample_size(10);

    group.bench_function("from_readers", |b| {
        b.iter(|| VocabularyBuilder::from_readers(VocabularySources::bundled()).unwrap());
    });

    let mut buf = vec![];
    Vocabulary::bundled().unwrap().write(&mut buf).unwrap();
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.bench_function("read", |b| {
        b.iter(|| Vocabulary::read(buf.as_slice()).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_decoding, bench_building);
criterion_main!(benches);
