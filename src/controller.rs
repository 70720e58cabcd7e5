use std::time::Duration;
use tracing::trace;

use crate::domain::{DashConfig, DashError, Message};
use crate::model::Model;
use crate::settings::NotificationKind;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &DashConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, DashError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            // Prompts get every key unfiltered
            if model.raw_keyevents() {
                return Ok(Some(Message::RawKey(key)));
            }
            return Ok(self.handle_key(key));
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Message::Quit),
                _ => None,
            };
        }
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Esc => Some(Message::Exit),
            KeyCode::Tab => Some(Message::NextTab),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => Some(Message::NextPage),
            KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => Some(Message::PreviousPage),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Message::LastPage),
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .map(|d| Message::SortColumn(d as usize - 1)),
            KeyCode::Char('/') => Some(Message::Search),
            KeyCode::Char('i') => Some(Message::Invite),
            KeyCode::Char('x') | KeyCode::Delete => Some(Message::RemoveMember),
            KeyCode::Char('e') => Some(Message::ToggleNotification(NotificationKind::Email)),
            KeyCode::Char('m') => Some(Message::ToggleNotification(NotificationKind::Marketing)),
            KeyCode::Char('s') => Some(Message::ToggleNotification(NotificationKind::Security)),
            KeyCode::Char('P') => Some(Message::CyclePlan),
            KeyCode::Char('c') => Some(Message::EditCard),
            KeyCode::Char('r') => Some(Message::EditProfile),
            KeyCode::Char('L') => Some(Message::Logout),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
