use crossterm::event::{
    self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const PAGE_ROWS: isize = 10;
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Input the event loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // New search box contents; debounced before it filters anything
    Search(String),

    // Viewport moved by this many rows
    Scroll(isize),

    // `q`, Ctrl+C or closed channel
    Shutdown,
}

/// Turns raw terminal events into dashboard events. `/` opens the search
/// box; every edit while it is open emits the whole query.
#[derive(Debug, Default)]
pub struct InputState {
    searching: bool,
    query: String,
}

impl InputState {
    pub fn handle(&mut self, event: TermEvent) -> Option<Event> {
        match event {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            TermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => Some(Event::Scroll(1)),
                MouseEventKind::ScrollUp => Some(Event::Scroll(-1)),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Event> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Event::Shutdown);
        }

        if self.searching {
            return match key.code {
                KeyCode::Char(c) => {
                    self.query.push(c);
                    Some(Event::Search(self.query.clone()))
                }
                KeyCode::Backspace => {
                    self.query.pop();
                    Some(Event::Search(self.query.clone()))
                }
                KeyCode::Enter => {
                    self.searching = false;
                    None
                }
                KeyCode::Esc => {
                    self.searching = false;
                    self.query.clear();
                    Some(Event::Search(String::new()))
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('/') => {
                self.searching = true;
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(Event::Shutdown),
            KeyCode::Down | KeyCode::Char('j') => Some(Event::Scroll(1)),
            KeyCode::Up | KeyCode::Char('k') => Some(Event::Scroll(-1)),
            KeyCode::PageDown => Some(Event::Scroll(PAGE_ROWS)),
            KeyCode::PageUp => Some(Event::Scroll(-PAGE_ROWS)),
            _ => None,
        }
    }
}

/// Reads terminal events on a dedicated thread, since crossterm's reader
/// blocks. Stops once the receiving side is gone.
pub fn spawn_input(tx: mpsc::Sender<Event>) {
    thread::spawn(move || {
        let mut input = InputState::default();

        while !tx.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            }

            let raw = match event::read() {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    break;
                }
            };

            if let Some(event) = input.handle(raw) {
                debug!("Input {:?}", event);
                if tx.blocking_send(event).is_err() {
                    break;
                }
            }
        }
    });
}

pub fn spawn_shutdown_signal(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Event::Shutdown).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseEvent;

    fn key(code: KeyCode) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(input: &mut InputState, text: &str) -> Vec<Option<Event>> {
        text.chars().map(|c| input.handle(key(KeyCode::Char(c)))).collect()
    }

    fn scroll(kind: MouseEventKind) -> TermEvent {
        TermEvent::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn slash_opens_search_and_each_keystroke_sends_the_query() {
        let mut input = InputState::default();
        assert_eq!(input.handle(key(KeyCode::Char('/'))), None);
        assert!(input.searching);

        let events = type_text(&mut input, "eth");
        assert_eq!(
            events,
            vec![
                Some(Event::Search("e".to_string())),
                Some(Event::Search("et".to_string())),
                Some(Event::Search("eth".to_string())),
            ]
        );

        assert_eq!(
            input.handle(key(KeyCode::Backspace)),
            Some(Event::Search("et".to_string()))
        );
    }

    #[test]
    fn letters_are_search_text_while_searching() {
        let mut input = InputState::default();
        input.handle(key(KeyCode::Char('/')));

        assert_eq!(
            type_text(&mut input, "qj"),
            vec![
                Some(Event::Search("q".to_string())),
                Some(Event::Search("qj".to_string())),
            ]
        );
    }

    #[test]
    fn enter_keeps_query_and_escape_clears_it() {
        let mut input = InputState::default();
        input.handle(key(KeyCode::Char('/')));
        type_text(&mut input, "btc");

        assert_eq!(input.handle(key(KeyCode::Enter)), None);
        assert!(!input.searching);
        assert_eq!(input.query, "btc");

        input.handle(key(KeyCode::Char('/')));
        assert_eq!(
            input.handle(key(KeyCode::Esc)),
            Some(Event::Search(String::new()))
        );
        assert_eq!(input.query, "");
    }

    #[test]
    fn scroll_keys_and_wheel() {
        let mut input = InputState::default();

        assert_eq!(input.handle(key(KeyCode::Char('j'))), Some(Event::Scroll(1)));
        assert_eq!(input.handle(key(KeyCode::Up)), Some(Event::Scroll(-1)));
        assert_eq!(input.handle(key(KeyCode::PageDown)), Some(Event::Scroll(10)));
        assert_eq!(input.handle(scroll(MouseEventKind::ScrollDown)), Some(Event::Scroll(1)));
        assert_eq!(input.handle(scroll(MouseEventKind::ScrollUp)), Some(Event::Scroll(-1)));
        assert_eq!(input.handle(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn quit_keys() {
        let mut input = InputState::default();
        assert_eq!(input.handle(key(KeyCode::Char('q'))), Some(Event::Shutdown));

        let ctrl_c = TermEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        input.handle(key(KeyCode::Char('/')));
        assert_eq!(input.handle(ctrl_c), Some(Event::Shutdown));
    }
}
