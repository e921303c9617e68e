#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

use std::collections::HashMap;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Author;
use crate::domain::models::Message;

/// Display names rendered in bubble borders, resolved from configuration
/// once at startup so rendering never reads global state.
#[derive(Clone)]
pub struct AuthorLabels {
    pub user: String,
    pub bot: String,
}

struct BubbleCacheEntry {
    id: String,
    text_len: usize,
    lines: Vec<Line<'static>>,
}

pub struct BubbleList {
    cache: HashMap<usize, BubbleCacheEntry>,
    labels: AuthorLabels,
    line_width: usize,
    lines_len: usize,
}

impl BubbleList {
    pub fn new(labels: AuthorLabels) -> BubbleList {
        return BubbleList {
            cache: HashMap::new(),
            labels,
            line_width: 0,
            lines_len: 0,
        };
    }

    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.lines_len = messages
            .iter()
            .enumerate()
            .map(|(idx, message)| {
                if let Some(cache_entry) = self.cache.get(&idx) {
                    // Optimistic entries are replaced in place, so identity
                    // and length both have to match for a cache hit.
                    if cache_entry.id == message.id && cache_entry.text_len == message.text.len() {
                        return cache_entry.lines.len();
                    }
                }

                let mut align = BubbleAlignment::Left;
                let mut label = self.labels.bot.as_str();
                if message.author == Author::User {
                    align = BubbleAlignment::Right;
                    label = self.labels.user.as_str();
                }

                let bubble_lines = Bubble::new(message, align, line_width, label).as_lines();
                let bubble_lines_len = bubble_lines.len();

                self.cache.insert(
                    idx,
                    BubbleCacheEntry {
                        id: message.id.to_string(),
                        text_len: message.text.len(),
                        lines: bubble_lines,
                    },
                );

                return bubble_lines_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        let mut indexes: Vec<usize> = self.cache.keys().cloned().collect();
        indexes.sort();

        let lines: Vec<Line<'static>> = indexes
            .iter()
            .flat_map(|idx| {
                return self.cache.get(idx).unwrap().lines.to_owned();
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
