// ============================================================================
// Sequencer
// Single worker thread that owns an engine and drains a submission queue
// ============================================================================

use crate::engine::{MatchOutcome, MatchingEngine};
use crate::error::{MatchError, MatchResult};
use crate::ingress::OrderRequest;
use crossbeam::channel::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

enum Command {
    Submit {
        request: OrderRequest,
        reply: Sender<MatchResult<MatchOutcome>>,
    },
    Shutdown,
}

/// Pending reply for an enqueued submission
pub struct Ticket(Receiver<MatchResult<MatchOutcome>>);

impl Ticket {
    /// Block until the worker has processed the submission
    pub fn wait(self) -> MatchResult<MatchOutcome> {
        self.0
            .recv()
            .map_err(|_| stopped())
            .and_then(|result| result)
    }
}

/// Cloneable handle for feeding a `Sequencer` from any thread
#[derive(Clone)]
pub struct SequencerHandle {
    sender: Sender<Command>,
}

impl SequencerHandle {
    /// Queue a submission; the worker handles submissions in queue order
    pub fn enqueue(&self, request: OrderRequest) -> MatchResult<Ticket> {
        let (reply, ticket) = channel::bounded(1);
        self.sender
            .send(Command::Submit { request, reply })
            .map_err(|_| stopped())?;
        Ok(Ticket(ticket))
    }

    /// Queue a submission and wait for its outcome
    pub fn submit(&self, request: OrderRequest) -> MatchResult<MatchOutcome> {
        self.enqueue(request)?.wait()
    }
}

/// Actor-style front end for a `MatchingEngine`.
///
/// Every submission goes through one queue and one worker thread, so the
/// arrival order at the queue is the matching order.
pub struct Sequencer {
    handle: SequencerHandle,
    engine: Arc<MatchingEngine>,
    worker: Option<JoinHandle<u64>>,
}

impl Sequencer {
    /// Spawn the worker with an unbounded queue
    pub fn spawn(engine: Arc<MatchingEngine>) -> MatchResult<Self> {
        Self::start(engine, channel::unbounded())
    }

    /// Spawn the worker with a queue of `capacity` pending submissions;
    /// `enqueue` blocks while the queue is full
    pub fn with_capacity(engine: Arc<MatchingEngine>, capacity: usize) -> MatchResult<Self> {
        Self::start(engine, channel::bounded(capacity))
    }

    fn start(
        engine: Arc<MatchingEngine>,
        (sender, receiver): (Sender<Command>, Receiver<Command>),
    ) -> MatchResult<Self> {
        let worker_engine = Arc::clone(&engine);
        let worker = thread::Builder::new()
            .name(format!("sequencer-{}", engine.get_instrument()))
            .spawn(move || run(worker_engine, receiver))
            .map_err(|e| MatchError::StoreUnavailable(format!("cannot start sequencer: {}", e)))?;

        tracing::info!(instrument = engine.get_instrument(), "Sequencer started");

        Ok(Self {
            handle: SequencerHandle { sender },
            engine,
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> SequencerHandle {
        self.handle.clone()
    }

    pub fn submit(&self, request: OrderRequest) -> MatchResult<MatchOutcome> {
        self.handle.submit(request)
    }

    /// Engine for read-only queries
    pub fn engine(&self) -> &Arc<MatchingEngine> {
        &self.engine
    }

    /// Process everything queued so far, stop the worker and return how many
    /// submissions it handled
    pub fn shutdown(mut self) -> u64 {
        self.stop()
    }

    fn stop(&mut self) -> u64 {
        let Some(worker) = self.worker.take() else {
            return 0;
        };

        // Fails only if the worker is already gone
        let _ = self.handle.sender.send(Command::Shutdown);

        match worker.join() {
            Ok(processed) => processed,
            Err(_) => {
                tracing::warn!(
                    instrument = self.engine.get_instrument(),
                    "Sequencer worker panicked"
                );
                0
            },
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(engine: Arc<MatchingEngine>, receiver: Receiver<Command>) -> u64 {
    let mut processed = 0;

    for command in receiver.iter() {
        match command {
            Command::Submit { request, reply } => {
                let result = engine.submit(request);
                processed += 1;
                // The caller may have dropped its ticket
                let _ = reply.send(result);
            },
            Command::Shutdown => break,
        }
    }

    tracing::info!(
        instrument = engine.get_instrument(),
        processed,
        "Sequencer stopped"
    );
    processed
}

fn stopped() -> MatchError {
    MatchError::StoreUnavailable("sequencer stopped".to_string())
}
