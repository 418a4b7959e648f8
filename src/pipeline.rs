use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{error, info};
use uuid::Uuid;

use crate::augment::{augment_farms, AdviceGenerator};
use crate::classifier::classify;
use crate::config::Thresholds;
use crate::context::build_farm_contexts;
use crate::domain::{AdvisoryReport, Notice};
use crate::error::ConfigError;
use crate::merge::{merge_suggestions, severity_summary};
use crate::reducer::reduce_to_latest;
use crate::store::FarmStore;
use crate::time::{Clock, SystemClock};

/// Monotonic generation counter guarding against racing refreshes.
///
/// Each run captures a generation at start; a run's results are applied only
/// if no newer run has begun by the time it completes (last-run-wins). The
/// host never sees two concurrent runs race to update the same displayed
/// result.
#[derive(Debug, Default)]
pub struct RunGuard {
    current: AtomicU64,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding any in-flight ones
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether the given generation is still the newest run
    pub fn is_current(&self, generation: u64) -> bool {
        self.current.load(Ordering::SeqCst) == generation
    }
}

/// The full advisory pipeline: fetch → reduce → classify + augment → merge.
///
/// One `refresh` call corresponds to one pull-to-refresh gesture or initial
/// screen load. All state is either immutable input or freshly constructed
/// output per run; the engine itself only carries its collaborators and the
/// run guard.
pub struct AdvisoryEngine<S, G, C = SystemClock> {
    store: S,
    generator: G,
    thresholds: Thresholds,
    clock: C,
    guard: RunGuard,
}

impl<S: FarmStore, G: AdviceGenerator> AdvisoryEngine<S, G, SystemClock> {
    /// Engine with canonical thresholds and the system clock
    pub fn new(store: S, generator: G) -> Self {
        Self {
            store,
            generator,
            thresholds: Thresholds::default(),
            clock: SystemClock::new(),
            guard: RunGuard::new(),
        }
    }

    /// Engine with thresholds loaded from environment variables
    pub fn from_env(store: S, generator: G) -> Result<Self, ConfigError> {
        Ok(Self::new(store, generator).with_thresholds(Thresholds::from_env()?))
    }
}

impl<S: FarmStore, G: AdviceGenerator, C: Clock> AdvisoryEngine<S, G, C> {
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Swap the clock, e.g. for a `FixedClock` under test
    pub fn with_clock<C2: Clock>(self, clock: C2) -> AdvisoryEngine<S, G, C2> {
        AdvisoryEngine {
            store: self.store,
            generator: self.generator,
            thresholds: self.thresholds,
            clock,
            guard: self.guard,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Run the pipeline once for a user.
    ///
    /// Returns `None` when a newer refresh started while this one was in
    /// flight: the stale results are discarded on arrival rather than
    /// merged into the newer run's output. Every failure mode short of that
    /// degrades to a partial report with notices; nothing here is fatal.
    pub async fn refresh(&self, user_id: &str) -> Option<AdvisoryReport> {
        let generation = self.guard.begin();
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, generation, user_id = %user_id, "advisory refresh started");

        let mut notices: Vec<Notice> = Vec::new();

        let farms = match self.store.fetch_user_farms(user_id).await {
            Ok(farms) => farms,
            Err(e) => {
                error!(run_id = %run_id, error = %e, "failed to fetch farms");
                notices.push(Notice::store_unavailable(&e));
                Vec::new()
            }
        };

        let farm_ids: Vec<String> = farms.iter().map(|f| f.farm_id.clone()).collect();
        let readings = if farm_ids.is_empty() {
            Vec::new()
        } else {
            match self.store.fetch_latest_readings(&farm_ids).await {
                Ok(readings) => readings,
                Err(e) => {
                    error!(run_id = %run_id, error = %e, "failed to fetch readings");
                    notices.push(Notice::store_unavailable(&e));
                    Vec::new()
                }
            }
        };

        if !self.guard.is_current(generation) {
            info!(run_id = %run_id, generation, "superseded during fetch, discarding");
            return None;
        }

        let latest = reduce_to_latest(readings);
        let rule_based = classify(&latest, &self.thresholds);
        let contexts = build_farm_contexts(&farms, &latest);

        let (contextual, mut advice_notices) = augment_farms(&contexts, &self.generator).await;
        notices.append(&mut advice_notices);

        if !self.guard.is_current(generation) {
            info!(run_id = %run_id, generation, "superseded during augmentation, discarding");
            return None;
        }

        let suggestions = merge_suggestions(rule_based, contextual);
        let summary = severity_summary(&suggestions);
        info!(
            run_id = %run_id,
            generation,
            suggestions = suggestions.len(),
            critical = summary.critical,
            warning = summary.warning,
            notices = notices.len(),
            "advisory refresh complete"
        );

        Some(AdvisoryReport {
            generation,
            generated_at: self.clock.now_utc(),
            suggestions,
            summary,
            notices,
        })
    }
}
