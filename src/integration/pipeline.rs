//! RelayPipeline: the polling loop from detections to published categories.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error, info};

use crate::publish::{PublishRecord, Publisher, Sink};
use crate::stabilizer::{
    Category, CategoryMapper, Clock, Decision, Detection, Stabilizer, select_best,
};

use super::DetectionSource;

/// Shared flag asking the relay loop to stop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Create a handle that is not stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop before its next tick or publish.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happened to the publish decision of a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// No publish was due
    NotAttempted,
    /// The sink accepted the record
    Published,
    /// The sink rejected the record; the error message is kept for display
    Failed(String),
    /// A publish was due but the loop was stopping, so nothing was written
    Aborted,
}

/// Per-tick side output for rendering and logging.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Category of the winning detection, `Category::None` if there was none
    pub category: Category,
    /// Winning detection of the frame
    pub detection: Option<Detection>,
    /// Class label of the winning detection
    pub label: Option<String>,
    pub decision: Decision,
    pub outcome: PublishOutcome,
}

impl TickReport {
    /// Caption for the winning box, e.g. `Organic (0.91)`.
    pub fn overlay_text(&self) -> Option<String> {
        if self.category.is_none() {
            return None;
        }
        self.detection
            .as_ref()
            .map(|det| format!("{} ({:.2})", self.category, det.confidence))
    }
}

/// Counters kept by the relay loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub ticks: u64,
    pub detections: u64,
    pub published: u64,
    pub failed: u64,
    pub suppressed: u64,
}

/// The relay context: owns the detection source, stabilizer, publisher and
/// clock, and runs them once per frame.
///
/// Sink failures are logged and counted but never end the loop. Stabilizer
/// state is committed as soon as a write is attempted, whether or not it
/// succeeded; a failed publish is not retried until the category changes or
/// the debounce window elapses again.
pub struct RelayPipeline<D: DetectionSource, S: Sink, C: Clock> {
    source: D,
    mapper: CategoryMapper,
    stabilizer: Stabilizer,
    publisher: Publisher<S>,
    clock: C,
    stop: StopHandle,
    stats: RelayStats,
}

impl<D: DetectionSource, S: Sink, C: Clock> RelayPipeline<D, S, C> {
    /// Create a pipeline from its parts. Statistics start at zero.
    pub fn new(
        source: D,
        mapper: CategoryMapper,
        stabilizer: Stabilizer,
        publisher: Publisher<S>,
        clock: C,
    ) -> Self {
        Self {
            source,
            mapper,
            stabilizer,
            publisher,
            clock,
            stop: StopHandle::new(),
            stats: RelayStats::default(),
        }
    }

    /// Handle that stops the loop from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Pull one frame from the source and process it.
    ///
    /// Returns `Ok(None)` when the source has no more frames.
    pub fn tick(&mut self) -> Result<Option<TickReport>, D::Error> {
        match self.source.next_frame()? {
            Some(detections) => Ok(Some(self.process_detections(&detections))),
            None => Ok(None),
        }
    }

    /// Run select, map, stabilize and (maybe) publish for one frame.
    pub fn process_detections(&mut self, detections: &[Detection]) -> TickReport {
        let now = self.clock.now();
        self.stats.ticks += 1;
        self.stats.detections += detections.len() as u64;

        let best = select_best(detections).cloned();
        let label = best
            .as_ref()
            .and_then(|det| self.source.label(det.class_id).map(str::to_string));
        let category = match (&best, &label) {
            (Some(_), Some(label)) => self.mapper.map_label(label),
            (Some(det), None) => {
                debug!("no label for class id {}", det.class_id);
                Category::None
            }
            _ => Category::None,
        };

        let decision = self.stabilizer.observe(category, now);
        let outcome = match decision {
            Decision::Idle => PublishOutcome::NotAttempted,
            Decision::Suppress => {
                self.stats.suppressed += 1;
                debug!("suppressed {category} inside debounce window");
                PublishOutcome::NotAttempted
            }
            Decision::Publish(reason) => {
                if self.stop.is_stopped() {
                    debug!("stop requested, dropping {reason:?} publish of {category}");
                    PublishOutcome::Aborted
                } else {
                    let record = PublishRecord::new(
                        category,
                        label.clone().unwrap_or_default(),
                        best.as_ref().map_or(0.0, |det| det.confidence),
                        self.clock.unix_timestamp(),
                    );
                    debug!("publishing {category} ({reason:?})");
                    let result = self.publisher.publish(record);
                    self.stabilizer.commit(category, now);
                    match result {
                        Ok(()) => {
                            self.stats.published += 1;
                            PublishOutcome::Published
                        }
                        Err(err) => {
                            self.stats.failed += 1;
                            PublishOutcome::Failed(err.to_string())
                        }
                    }
                }
            }
        };

        TickReport {
            category,
            detection: best,
            label,
            decision,
            outcome,
        }
    }

    /// Run until the source ends or a stop is requested.
    pub fn run(&mut self) -> Result<RelayStats, D::Error> {
        self.run_with(|_| {})
    }

    /// Like [`RelayPipeline::run`], handing every tick report to `on_tick`.
    pub fn run_with<F>(&mut self, mut on_tick: F) -> Result<RelayStats, D::Error>
    where
        F: FnMut(&TickReport),
    {
        info!(
            "relay started: path={} mode={:?} window={:?}",
            self.publisher.path(),
            self.publisher.mode(),
            self.stabilizer.config().debounce_window
        );

        while !self.stop.is_stopped() {
            match self.tick() {
                Ok(Some(report)) => on_tick(&report),
                Ok(None) => {
                    info!("detection stream ended");
                    break;
                }
                Err(err) => {
                    error!("detection source failed after {} ticks", self.stats.ticks);
                    return Err(err);
                }
            }
        }

        info!(
            "relay stopped: ticks={} published={} failed={} suppressed={}",
            self.stats.ticks, self.stats.published, self.stats.failed, self.stats.suppressed
        );
        Ok(self.stats)
    }

    /// Get the statistics gathered so far.
    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Get a reference to the underlying stabilizer.
    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }

    /// Get a reference to the publisher.
    pub fn publisher(&self) -> &Publisher<S> {
        &self.publisher
    }

    /// Get a mutable reference to the publisher.
    pub fn publisher_mut(&mut self) -> &mut Publisher<S> {
        &mut self.publisher
    }

    /// Get a reference to the detection source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Get a mutable reference to the detection source.
    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }
}
