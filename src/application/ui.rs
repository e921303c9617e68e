use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::TextArea;
use crate::domain::models::TypingIndicator;
use crate::domain::services::AppState;
use crate::domain::services::AuthorLabels;

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut textarea = TextArea::default();
    let typing = TypingIndicator::new(&Config::get(ConfigKey::BotName));

    #[cfg(feature = "dev")]
    {
        let test_str = "The office plants keep dying and nobody waters them.";
        for char in test_str.chars() {
            textarea.input(Input {
                key: Key::Char(char),
                ctrl: false,
                alt: false,
            });
        }
    }

    loop {
        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(1), Constraint::Max(4)])
                .split(frame.size());

            if layout[0].width != app_state.last_known_width
                || layout[0].height != app_state.last_known_height
            {
                app_state.set_rect(layout[0]);
            }

            app_state
                .bubble_list
                .render(frame, layout[0], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[0].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            if app_state.is_waiting() {
                typing.render(frame, layout[1]);
            } else {
                frame.render_widget(textarea.widget(), layout[1]);
            }
        })?;

        if app_state.is_waiting() {
            let event = rx.recv().await;
            if event.is_none() {
                // The turn engine is gone; nothing left to wait on.
                break;
            }

            match event.unwrap() {
                Event::TurnCompleted(outcome) => {
                    app_state.handle_turn_completed(outcome);
                }
                Event::TurnFailed() => {
                    app_state.handle_turn_failed();
                }
            }

            continue;
        }

        match crossterm::event::read()?.into() {
            Input { key: Key::Down, .. } => {
                app_state.scroll.down();
            }
            Input { key: Key::Up, .. } => {
                app_state.scroll.up();
            }
            Input {
                key: Key::Char('d'),
                ctrl: true,
                ..
            } => {
                app_state.scroll.down_page();
            }
            Input {
                key: Key::Char('u'),
                ctrl: true,
                ..
            } => {
                app_state.scroll.up_page();
            }
            Input {
                key: Key::Char('c'),
                ctrl: true,
                ..
            } => {
                break;
            }
            Input {
                key: Key::Enter, ..
            } => {
                let input_str = &textarea.lines().join("\n");
                if input_str.is_empty() {
                    continue;
                }

                if let Some(request) = app_state.begin_turn(input_str) {
                    textarea = TextArea::default();
                    tx.send(Action::SubmitTurn(request))?;
                }
            }
            input => {
                textarea.input(input);
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let labels = AuthorLabels {
        user: Config::get(ConfigKey::Username),
        bot: Config::get(ConfigKey::BotName),
    };
    let mut app_state = AppState::new(labels, &Config::get(ConfigKey::Greeting));

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
