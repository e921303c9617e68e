#[cfg(test)]
#[path = "turn_gate_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::OwnedSemaphorePermit;
use tokio::sync::Semaphore;

/// Single-slot guard for the one outstanding provider exchange a session
/// may have. Unlike a plain boolean, the slot is taken atomically and the
/// permit is handed back on every exit path when it drops, so two triggers
/// racing each other cannot both start a turn.
pub struct TurnGate {
    slot: Arc<Semaphore>,
}

pub struct TurnPermit {
    _permit: OwnedSemaphorePermit,
}

impl Default for TurnGate {
    fn default() -> TurnGate {
        return TurnGate {
            slot: Arc::new(Semaphore::new(1)),
        };
    }
}

impl TurnGate {
    /// Claims the slot, or refuses when a turn is already in flight.
    pub fn try_begin(&self) -> Option<TurnPermit> {
        match self.slot.clone().try_acquire_owned() {
            Ok(permit) => return Some(TurnPermit { _permit: permit }),
            Err(_) => return None,
        }
    }
}
