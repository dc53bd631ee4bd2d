//! Ordered, parallel evaluation of one or more VCF inputs.
//!
//! A producer thread reads every input in turn and numbers each item. A
//! pool of workers evaluates records (lookups are the only blocking part),
//! and the calling thread collects results through a [`ReorderBuffer`] so
//! the aggregator sees them in input order. The producer takes a permit per
//! item and the collector hands it back on release, so a slow record at the
//! head of the line holds back at most `in_flight_limit` items.

use std::io::{BufRead, Write};
use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded};
use indicatif::{ProgressBar, ProgressStyle};

use leiden_core::models::{MalformedRecord, PairedRecord, Verdict};
use leiden_lookup::LookupClient;
use leiden_vcf::VcfReader;

use crate::aggregator::ResultAggregator;
use crate::errors::{ValidationError, ValidationResult};
use crate::reorder::ReorderBuffer;
use crate::rules::Evaluator;

/// Items in flight per worker before the producer blocks.
const QUEUE_DEPTH_PER_WORKER: usize = 64;

struct Sequenced<T> {
    seq: u64,
    source: usize,
    item: T,
}

enum Outcome {
    Evaluated(PairedRecord, Verdict),
    Malformed(MalformedRecord),
}

pub struct Pipeline<C> {
    evaluator: Evaluator<C>,
    workers: usize,
    in_flight_limit: usize,
    progress: Option<ProgressBar>,
}

impl<C: LookupClient> Pipeline<C> {
    pub fn new(evaluator: Evaluator<C>, workers: usize) -> Self {
        let workers = workers.max(1);
        Pipeline {
            evaluator,
            workers,
            in_flight_limit: workers * QUEUE_DEPTH_PER_WORKER,
            progress: None,
        }
    }

    /// Cap on items read but not yet recorded.
    pub fn with_in_flight_limit(mut self, limit: usize) -> Self {
        self.in_flight_limit = limit.max(1);
        self
    }

    pub fn in_flight_limit(&self) -> usize {
        self.in_flight_limit
    }

    /// Show a spinner counting recorded items.
    pub fn with_progress(mut self) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg} ({pos} records)")
        {
            pb.set_style(style);
        }
        pb.set_message("Validating");
        self.progress = Some(pb);
        self
    }

    pub fn evaluator(&self) -> &Evaluator<C> {
        &self.evaluator
    }

    ///
    /// Evaluate every record of `inputs`, in order, into `aggregator`.
    ///
    /// Malformed lines and error verdicts never stop the run; only a failed
    /// write to one of the aggregator's destinations does.
    ///
    pub fn run<R, W>(&self, inputs: Vec<VcfReader<R>>, aggregator: &mut ResultAggregator<W>) -> ValidationResult<()>
    where
        R: BufRead + Send,
        W: Write,
    {
        let sources: Vec<usize> = inputs
            .iter()
            .map(|reader| aggregator.add_source(reader.source()))
            .collect();

        tracing::info!(
            inputs = inputs.len(),
            workers = self.workers,
            "starting validation"
        );

        let (work_tx, work_rx) = bounded::<Sequenced<Result<PairedRecord, MalformedRecord>>>(
            self.workers * QUEUE_DEPTH_PER_WORKER,
        );
        let (result_tx, result_rx) = bounded::<Sequenced<Outcome>>(self.workers * QUEUE_DEPTH_PER_WORKER);
        let (permit_tx, permit_rx) = bounded::<()>(self.in_flight_limit);
        for _ in 0..self.in_flight_limit {
            let _ = permit_tx.send(());
        }
        let evaluator = &self.evaluator;

        let collected = thread::scope(|scope| {
            let producer = scope.spawn(move || {
                let mut seq = 0;
                for (source, reader) in inputs.into_iter().enumerate() {
                    tracing::debug!(source = reader.source(), "reading input");
                    for item in reader {
                        // the collector drops its end once it stops
                        if permit_rx.recv().is_err() {
                            return;
                        }
                        if work_tx.send(Sequenced { seq, source, item }).is_err() {
                            return;
                        }
                        seq += 1;
                    }
                }
            });

            let workers: Vec<_> = (0..self.workers)
                .map(|_| {
                    let work_rx = work_rx.clone();
                    let result_tx = result_tx.clone();
                    scope.spawn(move || {
                        for job in work_rx {
                            let outcome = match job.item {
                                Ok(record) => {
                                    let verdict = evaluator.evaluate(&record);
                                    Outcome::Evaluated(record, verdict)
                                }
                                Err(malformed) => Outcome::Malformed(malformed),
                            };
                            let done = Sequenced {
                                seq: job.seq,
                                source: job.source,
                                item: outcome,
                            };
                            if result_tx.send(done).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();

            // the collector must see the channel close once workers finish
            drop(work_rx);
            drop(result_tx);

            let collected = self.collect(result_rx, permit_tx, &sources, aggregator);

            let mut panicked = producer.join().is_err();
            for worker in workers {
                panicked |= worker.join().is_err();
            }
            if panicked {
                return Err(ValidationError::WorkerPanicked);
            }
            collected
        });

        if let Some(pb) = &self.progress {
            pb.finish_with_message("Done");
        }
        collected
    }

    fn collect<W: Write>(
        &self,
        results: Receiver<Sequenced<Outcome>>,
        permits: Sender<()>,
        sources: &[usize],
        aggregator: &mut ResultAggregator<W>,
    ) -> ValidationResult<()> {
        let mut buffer = ReorderBuffer::new();
        let mut current_source = None;

        for done in results {
            for (source, outcome) in buffer.push(done.seq, (done.source, done.item)) {
                let _ = permits.try_send(());

                if current_source != Some(source) {
                    if let Some(&index) = sources.get(source) {
                        aggregator.select_source(index);
                    }
                    current_source = Some(source);
                }

                match outcome {
                    Outcome::Evaluated(record, verdict) => aggregator.record(&record, &verdict)?,
                    Outcome::Malformed(malformed) => {
                        tracing::warn!(
                            source = %malformed.source,
                            line = malformed.line,
                            reason = %malformed.reason,
                            "malformed record"
                        );
                        aggregator.record_malformed(&malformed)?
                    }
                }

                if let Some(pb) = &self.progress {
                    pb.inc(1);
                }
            }
        }

        if buffer.waiting() > 0 {
            tracing::warn!(waiting = buffer.waiting(), "results missing at end of run");
        }
        Ok(())
    }
}
