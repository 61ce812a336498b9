use clap::Parser;
use env_logger::Env;
use foldhash::fast::RandomState as FoldRandomState;
use log::info;
use rayon::slice::ParallelSliceMut;
use seqview::{Join, SetOp, Sorter, View, ViewMut};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use voracious_radix_sort::RadixSort;

/// Largest input sorted without a buffer; that path is quadratic.
const MAX_UNBUFFERED_LG_SIZE: u32 = 12;

/// Times the view sort engine across buffer sizes against other sorts, and
/// the union join against hashing.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Log2 of the input sizes to benchmark.
    #[arg(long, value_delimiter = ',', default_value = "10,15,20")]
    lg_sizes: Vec<u32>,

    /// Log2 of the number of elements processed per case; sets the repeat count.
    #[arg(long, default_value_t = 22)]
    budget_lg: u32,

    /// Seed for the input generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn benchmark(name: &str, repeats: usize, mut f: impl FnMut()) {
    // Warmup.
    for _ in 0..repeats {
        f();
    }
    let start = Instant::now();
    for _ in 0..repeats {
        f();
    }
    let duration = start.elapsed();
    println!("  {}: {}", name, human_time(repeats, duration));
}

fn human_time(repeats: usize, duration: Duration) -> String {
    let mut duration = duration.as_nanos() as f64 / repeats as f64;
    if duration < 1000.0 {
        return format!("{:.1}ns", duration);
    }
    duration /= 1000.0;
    if duration < 1000.0 {
        return format!("{:.1}us", duration);
    }
    duration /= 1000.0;
    if duration < 1000.0 {
        return format!("{:.1}ms", duration);
    }
    duration /= 1000.0;
    format!("{:.1}s", duration)
}

fn human_size(size: usize) -> String {
    if size < 1024 {
        return format!("{}B", size);
    }
    let mut size = size as f64;
    size /= 1024.0;
    if size < 1024.0 {
        return format!("{:.1}KiB", size);
    }
    size /= 1024.0;
    if size < 1024.0 {
        return format!("{:.1}MiB", size);
    }
    size /= 1024.0;
    format!("{:.1}GiB", size)
}

fn sort_with_buffer(data: &[u64], buffer_len: usize) -> Vec<u64> {
    let mut out = data.to_vec();
    let mut scratch = vec![0u64; buffer_len];
    Sorter::new(ViewMut::new(&mut out), u64::cmp)
        .buffer(ViewMut::new(&mut scratch))
        .in_place();
    out
}

fn count_union_by_hash(a: &[u64], b: &[u64], hasher: FoldRandomState) -> usize {
    let mut set = HashSet::with_capacity_and_hasher(a.len() + b.len(), hasher);
    set.extend(a.iter().chain(b).copied());
    set.len()
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut rng = fastrand::Rng::with_seed(args.seed);
    for &lg_size in &args.lg_sizes {
        let len = 1usize << lg_size;
        // Keys drawn from a range as large as the input, so there is a small
        // but nonzero number of duplicates.
        let mask = (1u64 << lg_size) - 1;
        let data: Vec<u64> = (0..len).map(|_| rng.u64(..) & mask).collect();
        let repeats = 1usize << args.budget_lg.saturating_sub(lg_size);
        info!("benchmarking {len} elements, {repeats} repeats per case");
        println!("size: {}", human_size(std::mem::size_of::<u64>() * data.len()));

        benchmark("slice::sort", repeats, || {
            let mut v = data.clone();
            v.sort();
        });
        benchmark("rayon par_sort", repeats, || {
            let mut v = data.clone();
            v.par_sort();
        });
        benchmark("voracious_sort", repeats, || {
            let mut v = data.clone();
            v.voracious_sort();
        });
        for (label, buffer_len) in [("full", len), ("1/4", len / 4), ("1/64", len / 64)] {
            benchmark(&format!("view sort (buffer {label})"), repeats, || {
                sort_with_buffer(&data, buffer_len);
            });
        }
        if lg_size <= MAX_UNBUFFERED_LG_SIZE {
            benchmark("view sort (no buffer)", repeats, || {
                sort_with_buffer(&data, 0);
            });
        }

        let (left, right) = data.split_at(len / 2);
        let left = sort_with_buffer(left, left.len() / 2);
        let right = sort_with_buffer(right, right.len() / 2);
        benchmark("union join", repeats, || {
            Join::new(View::new(&left), View::new(&right), u64::cmp, SetOp::Union).count();
        });
        let hasher = FoldRandomState::default();
        benchmark("union HashSet (FoldHash)", repeats, || {
            count_union_by_hash(&left, &right, hasher.clone());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size_rounds_to_one_decimal() {
        assert_eq!(human_size(512), "512B");
        assert_eq!(human_size(8000), "7.8KiB");
        assert_eq!(human_size(3 << 20), "3.0MiB");
    }
}
