use super::AuthorLabels;
use super::BubbleList;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::PENDING_BOT_ID;

fn labels() -> AuthorLabels {
    return AuthorLabels {
        user: "You".to_string(),
        bot: "Confab".to_string(),
    };
}

#[test]
fn it_counts_lines_across_bubbles() {
    let mut bubble_list = BubbleList::new(labels());
    bubble_list.set_messages(
        &[
            Message::new(Author::Bot, "greeting", "Hi!"),
            Message::new(Author::User, "msg-abc123", "Hello"),
        ],
        80,
    );

    // Two single-line bubbles, three rows each.
    assert_eq!(bubble_list.len(), 6);
}

#[test]
fn it_recomputes_replaced_entries() {
    let mut bubble_list = BubbleList::new(labels());

    bubble_list.set_messages(
        &[Message::new(Author::Bot, PENDING_BOT_ID, "Confab is typing...")],
        80,
    );
    let before = bubble_list.len();

    bubble_list.set_messages(
        &[Message::new(
            Author::Bot,
            "msg-abc123",
            "A reply long enough to wrap across multiple rendered rows once the bubble width clamps it to the window, growing the line count well past the placeholder bubble.",
        )],
        80,
    );

    assert!(bubble_list.len() > before);
}

#[test]
fn it_invalidates_the_cache_on_resize() {
    let mut bubble_list = BubbleList::new(labels());
    let messages = [Message::new(
        Author::Bot,
        "msg-abc123",
        "A reply long enough to wrap differently at different widths, so narrowing the window has to change the rendered row count.",
    )];

    bubble_list.set_messages(&messages, 120);
    let wide = bubble_list.len();

    bubble_list.set_messages(&messages, 40);
    assert!(bubble_list.len() > wide);
}
