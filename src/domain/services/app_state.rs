#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use ratatui::prelude::Rect;

use super::AuthorLabels;
use super::BubbleList;
use super::Scroll;
use super::TurnGate;
use super::TurnPermit;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::TurnOutcome;
use crate::domain::models::TurnRequest;
use crate::domain::models::GREETING_ID;
use crate::domain::models::PENDING_BOT_ID;
use crate::domain::models::PENDING_USER_ID;

pub struct AppState {
    pub bubble_list: BubbleList,
    pub messages: Vec<Message>,
    pub scroll: Scroll,
    pub last_known_width: u16,
    pub last_known_height: u16,
    typing_label: String,
    gate: TurnGate,
    permit: Option<TurnPermit>,
}

impl AppState {
    pub fn new(labels: AuthorLabels, greeting: &str) -> AppState {
        let typing_label = format!("{} is typing...", labels.bot);

        return AppState {
            bubble_list: BubbleList::new(labels),
            messages: vec![Message::new(Author::Bot, GREETING_ID, greeting)],
            scroll: Scroll::default(),
            last_known_width: 0,
            last_known_height: 0,
            typing_label,
            gate: TurnGate::default(),
            permit: None,
        };
    }

    pub fn is_waiting(&self) -> bool {
        return self.permit.is_some();
    }

    /// Accepts a submission unless a turn is already in flight, in which
    /// case the input is dropped without any observable effect. On accept,
    /// the transcript gains the optimistic user entry and the typing
    /// placeholder, and the in-flight slot is held until the turn settles.
    pub fn begin_turn(&mut self, text: &str) -> Option<TurnRequest> {
        let permit = self.gate.try_begin()?;
        self.permit = Some(permit);

        let typing_label = self.typing_label.to_string();
        self.add_message(Message::new(Author::User, PENDING_USER_ID, text));
        self.add_message(Message::new(Author::Bot, PENDING_BOT_ID, &typing_label));

        return Some(TurnRequest::new(text));
    }

    /// Swaps the optimistic pair for the provider-confirmed user message
    /// and bot reply, in that order, and releases the in-flight slot.
    pub fn handle_turn_completed(&mut self, outcome: TurnOutcome) {
        if self.messages.len() >= 2 {
            let tail = &self.messages[self.messages.len() - 2..];
            if tail.iter().all(|message| {
                return message.is_pending();
            }) {
                self.messages.truncate(self.messages.len() - 2);
            }
        }

        self.messages.push(outcome.user);
        self.messages.push(outcome.bot);
        self.sync_dependants();
        self.scroll.jump_to_last();
        self.permit = None;
    }

    /// A failed turn only releases the slot. The optimistic entries stay
    /// in the transcript uncorrected.
    pub fn handle_turn_failed(&mut self) {
        self.permit = None;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.sync_dependants();
        self.scroll.jump_to_last();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(&self.messages, self.last_known_width as usize);

        self.scroll
            .set_state(self.bubble_list.len() as u16, self.last_known_height);

        if self.is_waiting() {
            self.scroll.jump_to_last();
        }
    }
}
