// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight coordination for the token refresh exchange.
//!
//! Any number of requests can discover an expired access token before the
//! first refresh completes. The gate lets exactly one of them perform the
//! exchange; the rest suspend as waiters and are released, all at once, with
//! the episode's outcome.

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::ApiError;

/// Outcome of a refresh episode: the new access token, or the terminal error.
pub type RefreshOutcome = Result<String, ApiError>;

/// What a caller holds after joining the gate.
pub enum Ticket {
    /// The gate was idle. This caller must perform the exchange and then call
    /// [`RefreshGate::complete`] with the outcome.
    Leader,
    /// An exchange is already in flight. Await the episode outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Default)]
struct GateState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// At-most-one-refresh-in-flight gate.
///
/// Invariants: `waiters` is non-empty only while `in_flight`; each episode
/// drains the waiters exactly once, either all with the new token or all with
/// the refresh error.
#[derive(Default)]
pub struct RefreshGate {
    state: Mutex<GateState>,
}

impl RefreshGate {
    /// Join the current episode, or open a new one if the gate is idle.
    pub fn join(&self) -> Ticket {
        let mut state = self.state.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            Ticket::Follower(rx)
        } else {
            state.in_flight = true;
            Ticket::Leader
        }
    }

    /// Close the current episode, releasing every waiter with a clone of
    /// `outcome`. Must be called exactly once per [`Ticket::Leader`].
    pub fn complete(&self, outcome: RefreshOutcome) {
        let mut state = self.state.lock();
        state.in_flight = false;
        for waiter in state.waiters.drain(..) {
            // A waiter whose task was cancelled is gone; that's fine.
            let _ = waiter.send(outcome.clone());
        }
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
