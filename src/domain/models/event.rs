use super::TurnOutcome;

pub enum Event {
    TurnCompleted(TurnOutcome),
    TurnFailed(),
}
