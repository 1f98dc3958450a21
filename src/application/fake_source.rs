// Scripted prediction source for tests
use crate::application::prediction_source::{PredictionError, PredictionSource};
use crate::domain::prediction::{PipelineKind, PredictionPayload, SegmentedPrediction};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct Scripted {
    delay: Duration,
    reply: Result<PredictionPayload, PredictionError>,
}

/// Replies are consumed in order per pipeline; once a queue runs dry the
/// source answers with an empty payload of the right variant.
#[derive(Default)]
pub struct FakeSource {
    scripts: Mutex<HashMap<PipelineKind, VecDeque<Scripted>>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(
        self,
        kind: PipelineKind,
        reply: Result<PredictionPayload, PredictionError>,
    ) -> Self {
        self.with_delayed_reply(kind, Duration::ZERO, reply)
    }

    pub fn with_delayed_reply(
        self,
        kind: PipelineKind,
        delay: Duration,
        reply: Result<PredictionPayload, PredictionError>,
    ) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push_back(Scripted { delay, reply });
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fetches started but neither answered nor dropped yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionSource for FakeSource {
    async fn fetch(&self, kind: PipelineKind) -> Result<PredictionPayload, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&kind)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(scripted) => {
                if !scripted.delay.is_zero() {
                    tokio::time::sleep(scripted.delay).await;
                }
                scripted.reply
            }
            None => Ok(match kind {
                PipelineKind::Attrition => PredictionPayload::Flat(Vec::new()),
                PipelineKind::Shrinkage => PredictionPayload::Segmented(SegmentedPrediction::new()),
            }),
        }
    }
}
