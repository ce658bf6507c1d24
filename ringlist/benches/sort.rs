use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ringlist::{Arena, CircList, Link, Linked, Storage, TimSort, merge_sort};

#[derive(Debug, Default)]
struct Sample {
    val: u32,
    link: Link<u32>,
}

impl Linked<u32> for Sample {
    fn link(&self) -> &Link<u32> {
        &self.link
    }
    fn link_mut(&mut self) -> &mut Link<u32> {
        &mut self.link
    }
}

type SampleList = CircList<Sample, Arena<Sample>>;

const LEN: usize = 10_000;
const SEED: u64 = 0x5EED;

fn random(rng: &mut StdRng) -> Vec<u32> {
    (0..LEN).map(|_| rng.r#gen()).collect()
}

/// Descending values with random-length blocks flipped back to ascending.
fn partial(rng: &mut StdRng) -> Vec<u32> {
    let mut values: Vec<u32> = (0..LEN as u32).rev().collect();
    let mut start = 0;
    while start < values.len() {
        let end = (start + rng.gen_range(1..100)).min(values.len());
        values[start..end].reverse();
        start = end;
    }
    values
}

fn build(values: &[u32]) -> (Arena<Sample>, SampleList) {
    let mut storage = Arena::with_capacity(values.len() + 1);
    let mut list = SampleList::try_new(&mut storage, Sample::default()).unwrap();
    for &val in values {
        let idx = storage
            .try_insert(Sample {
                val,
                ..Default::default()
            })
            .unwrap();
        list.push_back(&mut storage, idx);
    }
    (storage, list)
}

fn bench_sort(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let patterns = [
        ("random", random(&mut rng)),
        ("sorted", (0..LEN as u32).collect::<Vec<_>>()),
        ("reversed", (0..LEN as u32).rev().collect::<Vec<_>>()),
        ("partial", partial(&mut rng)),
    ];

    let mut group = c.benchmark_group("sort 10k");
    for (name, values) in &patterns {
        group.bench_with_input(BenchmarkId::new("timsort", name), values, |b, values| {
            b.iter_batched(
                || build(values),
                |(mut storage, mut list)| {
                    black_box(TimSort::default().sort_by(&mut list, &mut storage, |a, b| {
                        a.val.cmp(&b.val)
                    }));
                    storage
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("merge_sort", name), values, |b, values| {
            b.iter_batched(
                || build(values),
                |(mut storage, mut list)| {
                    merge_sort(&mut list, &mut storage, |a, b| a.val.cmp(&b.val));
                    storage
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sort);
criterion_main!(benches);
