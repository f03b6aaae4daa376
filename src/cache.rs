//! Process-wide memo of the analysis result
//!
//! The analysis is computed on first use and shared by every later request.
//! The slot lock is held across the computation, so concurrent first callers
//! wait for one run instead of racing. Failures are not stored; the next call
//! tries again.

use log::{debug, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::analysis::{run_pipeline, PipelineResult};
use crate::error::PlanError;
use crate::prices::load_prices;

/// Produces a fresh analysis result
pub type ComputeFn = Box<dyn Fn() -> Result<PipelineResult, PlanError> + Send + Sync>;

pub struct AnalysisCache {
    compute: ComputeFn,
    slot: Mutex<Option<Arc<PipelineResult>>>,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl AnalysisCache {
    /// Cache around an arbitrary computation
    pub fn new(compute: ComputeFn) -> Self {
        Self {
            compute,
            slot: Mutex::new(None),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
        }
    }

    /// Cache that loads the price file at `path` and runs the pipeline
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(Box::new(move || -> Result<PipelineResult, PlanError> {
            let raw = load_prices(&path)?;
            Ok(run_pipeline(&raw)?)
        }))
    }

    /// Return the memoized result, computing it if this is the first call
    pub fn get_or_compute(&self) -> Result<Arc<PipelineResult>, PlanError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(result) = slot.as_ref() {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!("Analysis cache hit");
            return Ok(Arc::clone(result));
        }

        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        info!("Performing portfolio analysis");
        let result = Arc::new((self.compute)()?);
        *slot = Some(Arc::clone(&result));
        Ok(result)
    }

    /// Memoized result without triggering a computation
    pub(crate) fn peek(&self) -> Option<Arc<PipelineResult>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let hits = self.cache_hits();
        let total = hits + self.cache_misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

impl std::fmt::Debug for AnalysisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("cached", &self.peek().is_some())
            .field("cache_hits", &self.cache_hits())
            .field("cache_misses", &self.cache_misses())
            .finish()
    }
}
