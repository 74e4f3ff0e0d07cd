use std::env;
use std::io::{self, BufWriter};
use std::process;

use collatz_rust::{max_cycle_length, run_iters, run_server, solve, CycleCache, UPPER_BOUND};

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut cache = CycleCache::new(UPPER_BOUND);

    if args.iter().any(|a| a == "--server") {
        let served = run_server(|i, j, iters| {
            run_iters(i, j, iters, |low, high| {
                max_cycle_length(&mut cache, i64::from(low), i64::from(high)).ok()
            })
        });
        if let Err(err) = served {
            eprintln!("collatz-rust: {err}");
            process::exit(1);
        }
        return;
    }

    if args.len() == 4 {
        // One-shot measurement: <i> <j> <iters>
        let i: u32 = args[1].parse().expect("range bound");
        let j: u32 = args[2].parse().expect("range bound");
        let iters: u64 = args[3].parse::<u64>().expect("iteration count").max(1);
        let (base, _acc, _nanos) = run_iters(i, j, iters, |low, high| {
            max_cycle_length(&mut cache, i64::from(low), i64::from(high)).ok()
        });
        println!("{}", base.unwrap_or_default());
        return;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = solve(stdin.lock(), BufWriter::new(stdout.lock()), &mut cache) {
        eprintln!("collatz-rust: {err}");
        process::exit(1);
    }
}
