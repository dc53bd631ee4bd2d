use crossbeam_channel::{Receiver, Sender, bounded};

use crate::client::{LookupAnswer, LookupClient, LookupRequest};
use crate::error::LookupError;

///
/// Caps the number of lookups in flight. Permits circulate through a bounded
/// channel: taking one blocks while all are out, and dropping the [`Permit`]
/// puts it back.
///
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    permits_tx: Sender<()>,
    permits_rx: Receiver<()>,
    capacity: usize,
}

pub struct Permit<'a> {
    gate: &'a ConcurrencyGate,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let _ = self.gate.permits_tx.send(());
    }
}

impl ConcurrencyGate {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (permits_tx, permits_rx) = bounded(capacity);
        for _ in 0..capacity {
            let _ = permits_tx.send(());
        }
        ConcurrencyGate {
            permits_tx,
            permits_rx,
            capacity,
        }
    }

    /// Block until a permit is free.
    pub fn acquire(&self) -> Permit<'_> {
        // the gate holds a sender, so the channel never disconnects
        let _ = self.permits_rx.recv();
        Permit { gate: self }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.permits_rx.len()
    }
}

///
/// A [`LookupClient`] that holds a gate permit for the duration of each call.
///
pub struct Gated<C> {
    inner: C,
    gate: ConcurrencyGate,
}

impl<C: LookupClient> Gated<C> {
    pub fn new(inner: C, max_concurrent: usize) -> Self {
        Gated {
            inner,
            gate: ConcurrencyGate::new(max_concurrent),
        }
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }
}

impl<C: LookupClient> LookupClient for Gated<C> {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        let _permit = self.gate.acquire();
        self.inner.lookup(request)
    }
}
