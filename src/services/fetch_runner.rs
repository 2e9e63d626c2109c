//! Background fetch runner
//!
//! Every refresh runs the fetcher on its own thread. Results come back on a
//! channel shared by all fetches and are applied to the store when polled.

use crate::model::store::{EntryStore, FetchOutcome, FetchTicket};
use crate::services::fetcher::{interpret_body, EntryFetcher};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// A finished fetch, tagged with the ticket it was started under
#[derive(Debug)]
pub struct FetchMessage {
    pub tag: u64,
    pub outcome: FetchOutcome,
}

/// Spawns fetches and collects their results
pub struct FetchRunner {
    fetcher: Arc<dyn EntryFetcher>,
    sender: Sender<FetchMessage>,
    receiver: Receiver<FetchMessage>,
    /// Fetches spawned but not yet polled
    in_flight: usize,
}

impl FetchRunner {
    pub fn new(fetcher: Arc<dyn EntryFetcher>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            fetcher,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start one fetch for `ticket` on a background thread
    pub fn spawn(&mut self, ticket: FetchTicket) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.sender.clone();
        let tag = ticket.tag;

        let spawned = thread::Builder::new()
            .name(format!("entries-fetch-{tag}"))
            .spawn(move || {
                let outcome = Self::run_fetch(fetcher.as_ref(), tag);
                // The receiver only goes away when the app exits
                let _ = tx.send(FetchMessage { tag, outcome });
            });

        if let Err(err) = spawned {
            tracing::error!(tag, error = %err, "could not start fetch thread");
            let _ = self.sender.send(FetchMessage {
                tag,
                outcome: FetchOutcome::Failed,
            });
        }

        self.in_flight += 1;
    }

    /// Apply every finished fetch to `store`, returns true if any was applied
    pub fn poll(&mut self, store: &mut EntryStore) -> bool {
        let mut applied = false;

        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    applied |= store.apply(message.tag, message.outcome);
                }
                // We hold a sender ourselves, so disconnection cannot happen
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        applied
    }

    fn run_fetch(fetcher: &dyn EntryFetcher, tag: u64) -> FetchOutcome {
        match fetcher.fetch() {
            Ok(body) => FetchOutcome::Loaded(interpret_body(body)),
            Err(err) => {
                tracing::warn!(tag, error = %err, "fetching customers failed");
                FetchOutcome::Failed
            }
        }
    }
}
