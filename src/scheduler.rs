//! The multi-stage parallel job scheduler (spec.md §4.4, §5).
//!
//! Jobs are classified Stage-1 (populates `CalculatedData`), Stage-2 (reads
//! it), Independent (needs neither), or Sequential (cheap, runs on the
//! orchestrator thread). Stage-1 and Independent jobs start together on the
//! worker pool; the orchestrator waits only for Stage-1 to finish (writes to
//! disjoint `CalculatedData` keys, so join order doesn't matter), then
//! enqueues Stage-2 and runs Sequential itself, then the enclosing
//! `rayon::Scope` blocks until every remaining Independent and Stage-2 task
//! has completed.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use crossbeam_channel::unbounded;

use crate::calculated::CalculatedData;
use crate::data::Data;
use crate::error::DrcError;
use crate::message::Message;
use crate::pathgen::{NetFilter, PathGenerator};

/// Host callback interface the scheduler reports progress through
/// (spec.md §9, "Signal/slot emission to the host"). Methods may be called
/// from any worker thread or the orchestrator; implementers must be `Sync`.
pub trait DrcSink: Send + Sync {
    fn on_started(&self) {}
    fn on_status(&self, _status: &str) {}
    fn on_progress(&self, _percent: u32) {}
    fn on_finished(&self, _result: &RunResult) {}
}

/// A no-op sink for callers that don't need progress reporting.
#[derive(Debug, Default)]
pub struct NullSink;
impl DrcSink for NullSink {}

#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub messages: Vec<Message>,
    pub errors: Vec<String>,
}

type CheckFn = dyn Fn(&Data, &CalculatedData) -> Result<Vec<Message>, DrcError> + Send + Sync;

struct CheckJob {
    status: &'static str,
    weight: u32,
    run: Box<CheckFn>,
}

const STAGE1_WEIGHT_PER_LAYER: u32 = 10;

/// Builds and runs the full set of Stage-1/Stage-2/Independent/Sequential
/// jobs for one DRC pass.
#[derive(Default)]
pub struct Scheduler {
    stage2: Vec<CheckJob>,
    independent: Vec<CheckJob>,
    sequential: Vec<CheckJob>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stage2(
        &mut self,
        status: &'static str,
        weight: u32,
        run: impl Fn(&Data, &CalculatedData) -> Result<Vec<Message>, DrcError> + Send + Sync + 'static,
    ) {
        self.stage2.push(CheckJob { status, weight, run: Box::new(run) });
    }

    pub fn add_independent(
        &mut self,
        status: &'static str,
        weight: u32,
        run: impl Fn(&Data, &CalculatedData) -> Result<Vec<Message>, DrcError> + Send + Sync + 'static,
    ) {
        self.independent.push(CheckJob { status, weight, run: Box::new(run) });
    }

    pub fn add_sequential(
        &mut self,
        status: &'static str,
        weight: u32,
        run: impl Fn(&Data, &CalculatedData) -> Result<Vec<Message>, DrcError> + Send + Sync + 'static,
    ) {
        self.sequential.push(CheckJob { status, weight, run: Box::new(run) });
    }

    /// Runs every job against `data`, reporting progress through `sink` and
    /// observing `abort` cooperatively (spec.md §9, "Cancellation"). Jobs
    /// that see `abort` set resolve immediately with no messages.
    #[must_use]
    pub fn run(&self, data: &Data, sink: &dyn DrcSink, abort: &AtomicBool) -> RunResult {
        sink.on_started();

        let calculated = CalculatedData::new();
        let layers = data.copper_layers();
        let total_weight: u32 = (layers.len() as u32 * STAGE1_WEIGHT_PER_LAYER)
            + self.stage2.iter().map(|j| j.weight).sum::<u32>()
            + self.independent.iter().map(|j| j.weight).sum::<u32>()
            + self.sequential.iter().map(|j| j.weight).sum::<u32>();
        let total_weight = total_weight.max(1);

        let done_weight = AtomicU32::new(0);
        let messages: Mutex<Vec<Message>> = Mutex::new(Vec::new());
        let errors: Mutex<Vec<String>> = Mutex::new(Vec::new());

        let record = |result: Result<Vec<Message>, DrcError>, weight: u32| {
            match result {
                Ok(msgs) => messages.lock().expect("messages mutex poisoned").extend(msgs),
                Err(e) => errors.lock().expect("errors mutex poisoned").push(e.to_string()),
            }
            let done = done_weight.fetch_add(weight, Ordering::Relaxed) + weight;
            let pct = 20 + (80 * u64::from(done) / u64::from(total_weight)) as u32;
            sink.on_progress(pct.min(100));
        };

        rayon::in_place_scope(|scope| {
            let (stage1_tx, stage1_rx) = unbounded::<()>();

            for &layer in &layers {
                let tx = stage1_tx.clone();
                let calculated = &calculated;
                scope.spawn(move |_| {
                    let paths = if abort.load(Ordering::Relaxed) {
                        Vec::new()
                    } else {
                        let mut generator = PathGenerator::new();
                        generator.add_copper(data, layer, &NetFilter::All, data.quick);
                        generator.into_paths()
                    };
                    calculated.set_copper_paths(layer, paths);
                    let _ = tx.send(());
                });
            }
            drop(stage1_tx);

            for job in &self.independent {
                let calculated = &calculated;
                let record = &record;
                scope.spawn(move |_| {
                    if abort.load(Ordering::Relaxed) {
                        record(Ok(Vec::new()), job.weight);
                        return;
                    }
                    sink.on_status(job.status);
                    record((job.run)(data, calculated), job.weight);
                });
            }

            // Block only on Stage-1: its writes land in disjoint map keys, so
            // completion order among the `layers.len()` signals is
            // immaterial. Independent jobs keep running in the background.
            for _ in 0..layers.len() {
                let _ = stage1_rx.recv();
            }
            let stage1_done = layers.len() as u32 * STAGE1_WEIGHT_PER_LAYER;
            let done = done_weight.fetch_add(stage1_done, Ordering::Relaxed) + stage1_done;
            let pct = 20 + (80 * u64::from(done) / u64::from(total_weight)) as u32;
            sink.on_progress(pct.min(100));

            for job in &self.stage2 {
                let calculated = &calculated;
                let record = &record;
                scope.spawn(move |_| {
                    if abort.load(Ordering::Relaxed) {
                        record(Ok(Vec::new()), job.weight);
                        return;
                    }
                    sink.on_status(job.status);
                    record((job.run)(data, calculated), job.weight);
                });
            }

            for job in &self.sequential {
                if abort.load(Ordering::Relaxed) {
                    record(Ok(Vec::new()), job.weight);
                    continue;
                }
                sink.on_status(job.status);
                record((job.run)(data, &calculated), job.weight);
            }
        });

        let result = RunResult {
            messages: messages.into_inner().expect("messages mutex poisoned"),
            errors: errors.into_inner().expect("errors mutex poisoned"),
        };
        sink.on_finished(&result);
        result
    }
}
