//! Delay and failure injection driven by a [`RandomSource`].

use std::sync::Arc;
use std::time::Duration;

use crate::config::FaultProfile;
use crate::faults::random::{RandomSource, SeededRandom, ThreadRandom};

/// Applies fault profiles to requests.
#[derive(Clone)]
pub struct FaultInjector {
    source: Arc<dyn RandomSource>,
}

impl FaultInjector {
    pub fn new(source: Arc<dyn RandomSource>) -> Self {
        Self { source }
    }

    /// Seeded injector when a seed is given, thread RNG otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(Arc::new(SeededRandom::new(seed))),
            None => Self::new(Arc::new(ThreadRandom)),
        }
    }

    /// Sample a delay uniformly from the profile's range.
    pub fn sample_delay(&self, profile: &FaultProfile) -> Duration {
        let min = profile.min_delay_ms as f64;
        let max = profile.max_delay_ms.max(profile.min_delay_ms) as f64;
        let ms = min + (max - min) * self.source.next_unit();
        Duration::from_secs_f64(ms / 1000.0)
    }

    /// Sleep for a sampled delay and return how long was requested.
    pub async fn delay(&self, profile: &FaultProfile) -> Duration {
        let delay = self.sample_delay(profile);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        delay
    }

    /// Roll for a failure. A rate of 0 never fails; a rate of 1 always does.
    pub fn should_fail(&self, profile: &FaultProfile) -> bool {
        if profile.failure_rate <= 0.0 {
            return false;
        }
        self.source.next_unit() < profile.failure_rate
    }
}

impl std::fmt::Debug for FaultInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultInjector").finish_non_exhaustive()
    }
}
