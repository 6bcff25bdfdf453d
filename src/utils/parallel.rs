use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;
use rayon::prelude::*;

use crate::Result;

pub trait ParallelProcessor {
    fn init_parallel_processing() {
        // Fails when a global pool already exists, which is then used as-is.
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_cpus::get())
            .build_global()
        {
            debug!("Keeping existing thread pool: {}", e);
        }
        debug!("Using {} CPU threads for processing", rayon::current_num_threads());
    }

    fn get_progress_counter() -> AtomicUsize {
        AtomicUsize::new(0)
    }

    /// Run `f` over `items` in parallel, keeping input order.
    /// Stops at the first error, which is returned.
    fn try_process<T, R, F>(items: &[T], label: &str, f: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R> + Send + Sync,
    {
        let progress = Self::get_progress_counter();
        let total = items.len();

        items
            .par_iter()
            .map(|item| {
                let result = f(item);
                let processed = progress.fetch_add(1, Ordering::SeqCst) + 1;
                if processed % 100 == 0 || processed == total {
                    debug!("{}: {}/{} ({:.1}%)", label, processed, total, (processed as f64 / total as f64) * 100.0);
                }
                result
            })
            .collect()
    }
}
