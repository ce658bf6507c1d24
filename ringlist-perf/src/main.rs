//! Compares `TimSort` against top-down merge sort on identical lists.
//!
//! Run with:
//!   cargo run --release -p ringlist-perf -- --len 100000 --pattern partial
//!
//! Every sorted list is checked against `slice::sort` before its numbers are
//! reported.

use std::hint::black_box;
use std::time::Instant;

use anyhow::{Context, Result, ensure};
use clap::{Parser, ValueEnum};
use hdrhistogram::Histogram;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ringlist::sort::DEFAULT_MIN_RUN;
use ringlist::{Arena, CircList, Link, Linked, Storage, TimSort, merge_sort};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Upper bound (exclusive) on the block length flipped by `Pattern::Partial`.
const PARTIAL_BLOCK: usize = 100;

#[derive(Debug, Parser)]
#[command(name = "ringlist-perf", about = "Compare list sort algorithms")]
struct Args {
    /// Elements per list
    #[arg(long, default_value_t = 10_000)]
    len: usize,

    /// Sorts per algorithm and pattern
    #[arg(long, default_value_t = 5)]
    rounds: usize,

    /// RNG seed; drawn at random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum run length for TimSort
    #[arg(long, default_value_t = DEFAULT_MIN_RUN)]
    min_run: usize,

    /// Input shape to sort (repeatable); all shapes when omitted
    #[arg(long, value_enum)]
    pattern: Vec<Pattern>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Pattern {
    /// Uniformly random values
    Random,
    /// Already ascending
    Sorted,
    /// Strictly descending
    Reversed,
    /// Descending, with random-length blocks flipped back to ascending
    Partial,
}

impl Pattern {
    const ALL: [Pattern; 4] = [
        Pattern::Random,
        Pattern::Sorted,
        Pattern::Reversed,
        Pattern::Partial,
    ];

    fn generate(self, len: usize, rng: &mut StdRng) -> Vec<u32> {
        match self {
            Pattern::Random => (0..len).map(|_| rng.r#gen()).collect(),
            Pattern::Sorted => (0..len as u32).collect(),
            Pattern::Reversed => (0..len as u32).rev().collect(),
            Pattern::Partial => {
                let mut values: Vec<u32> = (0..len as u32).rev().collect();
                let mut start = 0;
                while start < values.len() {
                    let end = (start + rng.gen_range(1..PARTIAL_BLOCK)).min(values.len());
                    values[start..end].reverse();
                    start = end;
                }
                values
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Algorithm {
    TimSort,
    MergeSort,
}

impl Algorithm {
    fn name(self) -> &'static str {
        match self {
            Algorithm::TimSort => "timsort",
            Algorithm::MergeSort => "merge_sort",
        }
    }
}

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

struct Report {
    nanos: Histogram<u64>,
    comparisons: u64,
    rounds: u64,
}

impl Report {
    fn new() -> Result<Self> {
        Ok(Self {
            nanos: Histogram::new(3).context("creating latency histogram")?,
            comparisons: 0,
            rounds: 0,
        })
    }

    /// Adds one sort's numbers. The histogram grows to fit `nanos`.
    fn record(&mut self, comparisons: u64, nanos: u64) -> Result<()> {
        self.nanos.record(nanos).context("recording sort latency")?;
        self.comparisons += comparisons;
        self.rounds += 1;
        Ok(())
    }

    fn print(&self, pattern: Pattern, algorithm: Algorithm) {
        println!(
            "{:10} {:10} cmps/sort: {:>10} | p50: {:>9} ns | p99: {:>9} ns | min: {:>9} | max: {:>9}",
            format!("{pattern:?}").to_lowercase(),
            algorithm.name(),
            self.comparisons / self.rounds.max(1),
            self.nanos.value_at_quantile(0.50),
            self.nanos.value_at_quantile(0.99),
            self.nanos.min(),
            self.nanos.max(),
        );
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn build(values: &[u32]) -> Result<(Arena<Sample>, SampleList)> {
    let mut storage = Arena::with_capacity(values.len() + 1);
    let mut list = SampleList::try_new(&mut storage, Sample::default())
        .context("allocating list sentinel")?;
    for &val in values {
        let idx = storage
            .try_insert(Sample {
                val,
                ..Default::default()
            })
            .context("allocating sample")?;
        list.push_back(&mut storage, idx);
    }
    Ok((storage, list))
}

/// Sorts one fresh list, returning `(comparisons, nanoseconds)`.
fn sort_once(
    algorithm: Algorithm,
    values: &[u32],
    expected: &[u32],
    min_run: usize,
) -> Result<(u64, u64)> {
    let (mut storage, mut list) = build(values)?;
    let mut comparisons = 0u64;
    let cmp = |a: &Sample, b: &Sample| {
        comparisons += 1;
        a.val.cmp(&b.val)
    };

    let start = Instant::now();
    match algorithm {
        Algorithm::TimSort => {
            let stats = TimSort::with_min_run(min_run).sort_by(&mut list, &mut storage, cmp);
            debug!(?stats, "timsort round");
            black_box(stats);
        }
        Algorithm::MergeSort => merge_sort(&mut list, &mut storage, cmp),
    }
    let nanos = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

    let sorted: Vec<u32> = list.iter(&storage).map(|s| s.val).collect();
    ensure!(
        sorted == expected,
        "{} left the list out of order",
        algorithm.name()
    );
    ensure!(
        list.keys(&storage).rev().count() == expected.len(),
        "{} broke the back links",
        algorithm.name()
    );

    Ok((comparisons, nanos))
}

fn main() -> Result<()> {
    enable_tracing();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    let patterns = if args.pattern.is_empty() {
        Pattern::ALL.to_vec()
    } else {
        args.pattern.clone()
    };
    info!(len = args.len, rounds = args.rounds, seed, min_run = args.min_run, "starting");

    let mut rng = StdRng::seed_from_u64(seed);
    for pattern in patterns {
        let values = pattern.generate(args.len, &mut rng);
        let mut expected = values.clone();
        expected.sort_unstable();

        for algorithm in [Algorithm::TimSort, Algorithm::MergeSort] {
            let mut report = Report::new()?;
            for _ in 0..args.rounds {
                let (comparisons, nanos) = sort_once(algorithm, &values, &expected, args.min_run)
                    .with_context(|| format!("sorting {pattern:?} input"))?;
                report.record(comparisons, nanos)?;
            }
            report.print(pattern, algorithm);
        }
    }

    Ok(())
}
