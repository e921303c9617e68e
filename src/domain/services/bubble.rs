#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Message;
use crate::domain::models::PENDING_BOT_ID;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

// Left border + left padding + right padding + right border + scrollbar.
const FRAME_ELEMENTS_LEN: usize = 5;
// Minimum share of the window kept clear on the far side of a bubble.
const OUTER_PADDING_PERCENTAGE: f32 = 0.04;

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
    label: &'a str,
}

fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut wrapped: Vec<String> = vec![];

    for full_line in text.split('\n') {
        if full_line.trim().is_empty() {
            wrapped.push(" ".to_string());
            continue;
        }

        let mut current: Vec<&str> = vec![];
        let mut char_count = 0;

        for word in full_line.split(' ') {
            if word.len() > width {
                // A single token wider than the bubble is chopped outright.
                if !current.is_empty() {
                    wrapped.push(current.join(" "));
                    current = vec![];
                    char_count = 0;
                }
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(width) {
                    wrapped.push(chunk.iter().collect());
                }
                continue;
            }

            let needed = if current.is_empty() {
                word.len()
            } else {
                char_count + 1 + word.len()
            };

            if needed > width {
                wrapped.push(current.join(" "));
                current = vec![word];
                char_count = word.len();
            } else {
                current.push(word);
                char_count = needed;
            }
        }

        if !current.is_empty() {
            wrapped.push(current.join(" "));
        }
    }

    return wrapped;
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
        label: &'a str,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
            label,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let inner_width = self.inner_width();
        let framed_width = inner_width + 4;
        let outer_fill = " ".repeat(self.window_max_width.saturating_sub(framed_width + 1));

        let mut lines = vec![self.framed_line(self.top_bar(inner_width), &outer_fill)];

        for wrapped in wrap_words(&self.message.text, inner_width) {
            let fill = " ".repeat(inner_width.saturating_sub(wrapped.len()));
            lines.push(self.framed_line(format!("│ {wrapped}{fill} │"), &outer_fill));
        }

        lines.push(self.framed_line(
            format!("╰{}╯", "─".repeat(inner_width + 2)),
            &outer_fill,
        ));

        return lines;
    }

    /// Width of the text area inside the borders: as wide as the longest
    /// line, clamped to the window minus frame and outer padding, and never
    /// narrower than the author label in the top border.
    fn inner_width(&self) -> usize {
        let min_outer_padding =
            ((self.window_max_width as f32 * OUTER_PADDING_PERCENTAGE).ceil()) as usize;
        let max_width = self
            .window_max_width
            .saturating_sub(FRAME_ELEMENTS_LEN + min_outer_padding);

        let longest = self
            .message
            .text
            .split('\n')
            .map(|line| {
                return line.len();
            })
            .max()
            .unwrap_or(1);

        return longest.clamp(self.label.len(), max_width.max(self.label.len()));
    }

    fn top_bar(&self, inner_width: usize) -> String {
        let bar = "─".repeat((inner_width + 2).saturating_sub(self.label.len()));
        return format!("╭{}{bar}╮", self.label);
    }

    fn framed_line(&self, framed: String, outer_fill: &str) -> Line<'static> {
        let span = Span::styled(framed, self.style());

        if self.alignment == BubbleAlignment::Left {
            return Line::from(vec![span]);
        }

        return Line::from(vec![Span::from(outer_fill.to_string()), span]);
    }

    fn style(&self) -> Style {
        // The typing placeholder reads as provisional until the reply lands.
        if self.message.id == PENDING_BOT_ID {
            return Style::default().add_modifier(Modifier::DIM);
        }

        return Style::default();
    }
}
