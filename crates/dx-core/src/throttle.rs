//! Per-routine rate limiting inside the frame loop.
//!
//! A renderer registers each routine it wants to slow down and gets back a
//! [`ThrottleId`]. Calling [`ThrottleRegistry::limit_to`] with that id every
//! frame runs the routine at most `rate` times per second, without a timer of
//! its own.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::EngineError;

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to one throttled routine.
///
/// Only valid for the registry that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThrottleId {
    registry: u64,
    index: usize,
}

impl ThrottleId {
    /// Position in the owning registry, in creation order.
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy)]
struct Throttle {
    /// Minimum gap between runs, in milliseconds.
    interval: f64,
    last_run: Option<f64>,
}

#[derive(Debug)]
pub struct ThrottleRegistry {
    owner: u64,
    throttles: Vec<Throttle>,
}

impl Default for ThrottleRegistry {
    fn default() -> Self {
        Self {
            owner: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            throttles: Vec::new(),
        }
    }
}

impl ThrottleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a routine limited to `rate_per_second` runs.
    pub fn create(&mut self, rate_per_second: f64) -> Result<ThrottleId, EngineError> {
        if !rate_per_second.is_finite() || rate_per_second <= 0.0 {
            log::warn!("rejecting throttle rate {rate_per_second}");
            return Err(EngineError::InvalidRate(rate_per_second));
        }
        self.throttles.push(Throttle {
            interval: 1000.0 / rate_per_second,
            last_run: None,
        });
        Ok(ThrottleId {
            registry: self.owner,
            index: self.throttles.len() - 1,
        })
    }

    /// The id of the `index`-th routine registered here.
    pub fn id(&self, index: usize) -> Option<ThrottleId> {
        (index < self.throttles.len()).then_some(ThrottleId {
            registry: self.owner,
            index,
        })
    }

    fn get(&self, id: ThrottleId) -> Result<&Throttle, EngineError> {
        if id.registry != self.owner {
            return Err(EngineError::UnknownThrottle);
        }
        self.throttles.get(id.index).ok_or(EngineError::UnknownThrottle)
    }

    /// Whether `id` may run at `now` (milliseconds).
    pub fn is_due(&self, id: ThrottleId, now: f64) -> Result<bool, EngineError> {
        let throttle = self.get(id)?;
        Ok(match throttle.last_run {
            None => true,
            Some(last) => now - last >= throttle.interval,
        })
    }

    /// Run `f` if at least one interval has passed since its last run.
    ///
    /// The first call always runs. Returns `Ok(None)` when skipped.
    pub fn limit_to<T>(
        &mut self,
        id: ThrottleId,
        now: f64,
        f: impl FnOnce() -> T,
    ) -> Result<Option<T>, EngineError> {
        if !self.is_due(id, now)? {
            return Ok(None);
        }
        let out = f();
        self.record_run(id, now)?;
        Ok(Some(out))
    }

    /// Mark `id` as having run at `now`.
    ///
    /// For callers that must not hold the registry while the routine runs.
    pub fn record_run(&mut self, id: ThrottleId, now: f64) -> Result<(), EngineError> {
        if id.registry != self.owner {
            return Err(EngineError::UnknownThrottle);
        }
        let throttle = self
            .throttles
            .get_mut(id.index)
            .ok_or(EngineError::UnknownThrottle)?;
        throttle.last_run = Some(now);
        Ok(())
    }

    /// Timestamp of the last run of `id`, if any.
    pub fn last_run(&self, id: ThrottleId) -> Option<f64> {
        self.get(id).ok().and_then(|t| t.last_run)
    }

    pub fn len(&self) -> usize {
        self.throttles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.throttles.is_empty()
    }
}
