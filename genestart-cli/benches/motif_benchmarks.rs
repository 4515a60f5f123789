use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use genestart_core::config::MotifFinderConfig;
use genestart_core::markov::{Markov, Topology};
use genestart_core::motif::MotifFinder;
use genestart_core::sequence::{Alphabet, NumericSequence};
use genestart_core::types::AlignmentMode;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;
use std::time::Duration;

const PLANTED_SITE: &[u8] = b"AGGAGG";

/// Searches are seeded, so runs vary little; a few samples suffice.
fn search_criterion() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(20))
        .warm_up_time(Duration::from_secs(2))
        .sample_size(10)
        .noise_threshold(0.05)
}

/// Random upstream fragments with the site planted at a random offset.
fn planted_sequences(count: usize, length: usize, seed: u64) -> Vec<NumericSequence> {
    let alphabet = Alphabet::dna();
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut text: Vec<u8> = (0..length).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect();
            let start = rng.gen_range(0..=length - PLANTED_SITE.len());
            text[start..start + PLANTED_SITE.len()].copy_from_slice(PLANTED_SITE);
            NumericSequence::from_symbols(
                text.iter()
                    .filter_map(|&c| alphabet.encode(c))
                    .collect(),
            )
        })
        .collect()
}

fn benchmark_motif_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("motif_search");
    for count in [50usize, 200, 800] {
        let sequences = planted_sequences(count, 40, 17);
        group.throughput(Throughput::Elements(count as u64));
        for (label, alignment) in [("unaligned", AlignmentMode::None), ("right", AlignmentMode::Right)] {
            let finder = MotifFinder::new(MotifFinderConfig {
                alignment,
                tries: 2,
                ..Default::default()
            })
            .unwrap();
            group.bench_with_input(BenchmarkId::new(label, count), &sequences, |b, seqs| {
                b.iter(|| {
                    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(1);
                    black_box(finder.find_motifs(seqs, &mut rng).unwrap())
                })
            });
        }
    }
    group.finish();
}

fn benchmark_markov_models(c: &mut Criterion) {
    let alphabet = Alphabet::dna();
    let sequences = planted_sequences(200, 200, 5);
    let mut group = c.benchmark_group("markov_models");
    group.throughput(Throughput::Bytes((200 * 200) as u64));

    for order in [0usize, 2, 5] {
        group.bench_with_input(BenchmarkId::new("construct_uniform", order), &order, |b, &order| {
            b.iter(|| {
                let mut model = Markov::new(&alphabet, order, Topology::Uniform).unwrap();
                model.construct(black_box(&sequences), 1.0).unwrap();
                black_box(model)
            })
        });
    }

    let mut model = Markov::new(&alphabet, 2, Topology::Periodic { period: 3 }).unwrap();
    model.construct(&sequences, 1.0).unwrap();
    group.bench_function("evaluate_periodic", |b| {
        b.iter(|| {
            sequences
                .iter()
                .map(|s| model.evaluate(black_box(s), true))
                .sum::<f64>()
        })
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = search_criterion();
    targets = benchmark_motif_search, benchmark_markov_models
}
criterion_main!(benches);
