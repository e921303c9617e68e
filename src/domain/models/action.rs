use super::TurnRequest;

pub enum Action {
    SubmitTurn(TurnRequest),
}
