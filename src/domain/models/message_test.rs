use super::Author;
use super::Message;
use super::GREETING_ID;
use super::PENDING_BOT_ID;
use super::PENDING_USER_ID;

#[test]
fn it_executes_new() {
    let msg = Message::new(Author::User, "msg-abc123", "Hi there!");
    assert_eq!(msg.id, "msg-abc123".to_string());
    assert_eq!(msg.author, Author::User);
    assert_eq!(msg.text, "Hi there!".to_string());
}

#[test]
fn it_executes_new_replacing_tabs() {
    let msg = Message::new(Author::Bot, "msg-abc123", "\t\tHi there!");
    assert_eq!(msg.text, "    Hi there!".to_string());
}

#[test]
fn it_flags_pending_entries() {
    assert!(Message::new(Author::User, PENDING_USER_ID, "pay is low").is_pending());
    assert!(Message::new(Author::Bot, PENDING_BOT_ID, "Typing...").is_pending());
    assert!(!Message::new(Author::Bot, GREETING_ID, "Hi!").is_pending());
    assert!(!Message::new(Author::Bot, "msg-abc123", "Hello").is_pending());
}

#[test]
fn it_serializes_author_lowercase() {
    let msg = Message::new(Author::Bot, "msg-abc123", "Hello");
    let payload = serde_json::to_string(&msg).unwrap();
    assert!(payload.contains("\"author\":\"bot\""));
}
