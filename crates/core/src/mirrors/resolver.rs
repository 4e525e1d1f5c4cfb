//! Picking a working mirror for a query.
//!
//! Candidates are probed strictly in priority order: the preferred mirror,
//! then directory entries, then the fallback mirror. A round probes every
//! eligible candidate with the same timeout; failed rounds double the timeout
//! until it exceeds the schedule's maximum. The first pass trusts the
//! directory's status flags and skips mirrors reported down; if it finds
//! nothing, a second pass probes every candidate regardless of status.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::scrape::{PageScraper, ScraperFactory};

use super::{Mirror, MirrorError, MirrorFilters, Resolution};

/// One round of the resolution schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStep {
    /// Timeout applied to every probe in this round.
    pub timeout: Duration,
    /// Whether mirrors reported down are skipped.
    pub trust_source: bool,
}

/// Timeout/trust schedule, independent of any clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveSchedule {
    initial: Duration,
    max: Duration,
}

impl Default for ResolveSchedule {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), Duration::from_secs(10))
    }
}

impl From<&ResolverConfig> for ResolveSchedule {
    fn from(config: &ResolverConfig) -> Self {
        Self::new(
            Duration::from_millis(config.initial_timeout_ms),
            Duration::from_millis(config.max_timeout_ms),
        )
    }
}

impl ResolveSchedule {
    /// A zero initial timeout is raised to one millisecond so doubling
    /// always terminates.
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial: initial.max(Duration::from_millis(1)),
            max,
        }
    }

    /// The first round, or `None` if the initial timeout already exceeds the maximum.
    pub fn first(&self) -> Option<ResolveStep> {
        (self.initial <= self.max).then_some(ResolveStep {
            timeout: self.initial,
            trust_source: true,
        })
    }

    /// The round after `step`, or `None` once the untrusted pass is exhausted.
    pub fn next(&self, step: ResolveStep) -> Option<ResolveStep> {
        let doubled = step.timeout.saturating_mul(2);
        if doubled <= self.max {
            Some(ResolveStep {
                timeout: doubled,
                ..step
            })
        } else if step.trust_source {
            Some(ResolveStep {
                timeout: self.initial,
                trust_source: false,
            })
        } else {
            None
        }
    }

    /// Every round of the schedule, in order.
    pub fn steps(&self) -> impl Iterator<Item = ResolveStep> + '_ {
        std::iter::successors(self.first(), move |step| self.next(*step))
    }
}

struct Candidate {
    mirror: Mirror,
    scraper: Arc<dyn PageScraper>,
}

/// Walks candidate mirrors until one returns results for a query.
pub struct MirrorResolver {
    factory: Arc<dyn ScraperFactory>,
    filters: MirrorFilters,
    fallback: Mirror,
    schedule: ResolveSchedule,
}

impl MirrorResolver {
    pub fn new(factory: Arc<dyn ScraperFactory>, filters: MirrorFilters, fallback: Mirror) -> Self {
        Self {
            factory,
            filters,
            fallback,
            schedule: ResolveSchedule::default(),
        }
    }

    pub fn with_schedule(mut self, schedule: ResolveSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn schedule(&self) -> &ResolveSchedule {
        &self.schedule
    }

    /// Candidates in priority order: preferred, directory entries, fallback.
    ///
    /// The preferred mirror carries no directory status and counts as down,
    /// so like a down fallback it is only probed once the source is no longer
    /// trusted.
    pub fn candidates(&self, mirrors: &[Mirror]) -> Vec<Mirror> {
        let mut candidates = Vec::with_capacity(mirrors.len() + 2);
        if let Some(preferred) = self.filters.preferred.as_deref().filter(|p| !p.is_empty()) {
            candidates.push(Mirror::new(preferred, "", false));
        }
        candidates.extend_from_slice(mirrors);
        candidates.push(self.fallback.clone());
        candidates
    }

    /// Find the first mirror, in priority order, whose search for `query`
    /// succeeds with at least one result.
    pub async fn resolve(&self, query: &str, mirrors: &[Mirror]) -> Result<Resolution, MirrorError> {
        let candidates: Vec<Candidate> = self
            .candidates(mirrors)
            .into_iter()
            .filter_map(|mirror| match self.factory.create(&mirror.url) {
                Ok(scraper) => Some(Candidate { mirror, scraper }),
                Err(e) => {
                    warn!(mirror = %mirror.url, error = %e, "Skipping mirror");
                    None
                }
            })
            .collect();

        for step in self.schedule.steps() {
            debug!(
                timeout_ms = step.timeout.as_millis() as u64,
                trust_source = step.trust_source,
                "Starting mirror round"
            );

            for candidate in &candidates {
                if step.trust_source && !candidate.mirror.status {
                    continue;
                }

                match candidate.scraper.search(query, step.timeout).await {
                    Ok(torrents) if !torrents.is_empty() => {
                        info!(
                            mirror = %candidate.mirror.url,
                            results = torrents.len(),
                            "Mirror resolved"
                        );
                        return Ok(Resolution {
                            mirror: candidate.mirror.clone(),
                            torrents,
                        });
                    }
                    Ok(_) => {
                        debug!(mirror = %candidate.mirror.url, "Mirror returned no results");
                    }
                    Err(e) => {
                        debug!(mirror = %candidate.mirror.url, error = %e, "Mirror probe failed");
                    }
                }
            }
        }

        Err(MirrorError::AllMirrorsUnreachable)
    }
}
