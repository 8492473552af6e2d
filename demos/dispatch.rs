//! Dispatch a batch of simulated requests across weighted suppliers.
//!
//! Mirrors the typical consumer shape: one shared selector per routing
//! domain, one `next()` call per dispatch decision.
//!
//! Run with: `cargo run --example dispatch`

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use swrr::{config, logger, SmoothWeight};
use tracing::info;

const WEIGHT_TABLE: &str = r#"
[[candidate]]
id = "supplier-a"
weight = 5

[[candidate]]
id = "supplier-b"
weight = 3

[[candidate]]
id = "supplier-c"
weight = 2
"#;

const WORKERS: usize = 4;
const REQUESTS_PER_WORKER: usize = 250;

fn main() -> Result<()> {
    logger::init();

    let table = config::from_str(WEIGHT_TABLE)?;
    let selector = Arc::new(SmoothWeight::with_config(table));

    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let selector = selector.clone();
            thread::spawn(move || {
                let mut counts: HashMap<String, usize> = HashMap::new();
                for _ in 0..REQUESTS_PER_WORKER {
                    let supplier = selector.next().expect("selector is configured");
                    *counts.entry(supplier).or_insert(0) += 1;
                }
                (worker, counts)
            })
        })
        .collect();

    let mut totals: HashMap<String, usize> = HashMap::new();
    for handle in handles {
        let (worker, counts) = handle.join().expect("worker panicked");
        info!("Worker {} dispatched: {:?}", worker, counts);
        for (supplier, n) in counts {
            *totals.entry(supplier).or_insert(0) += n;
        }
    }

    info!(
        "Dispatched {} requests: {:?}",
        WORKERS * REQUESTS_PER_WORKER,
        totals
    );
    Ok(())
}
