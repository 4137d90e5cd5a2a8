use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Keys that end the scan loop
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Watch terminal key presses and cancel `interrupt` on a quit key.
///
/// Raw mode swallows Ctrl+C before it becomes SIGINT, so the dashboard has
/// to catch it as a key event. The task ends (and releases stdin) as soon as
/// the token is cancelled from anywhere.
pub fn spawn_key_watcher(interrupt: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = EventStream::new();

        loop {
            tokio::select! {
                _ = interrupt.cancelled() => break,
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) if is_quit_key(&key) => {
                        log::info!("[tui::keys] quit_key: code={:?} modifiers={:?}", key.code, key.modifiers);
                        interrupt.cancel();
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::warn!("[tui::keys] event_stream_failed: error={}", e);
                        break;
                    }
                    None => break,
                },
            }
        }

        log::debug!("[tui::keys] key_watcher_stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_other_keys_are_ignored() {
        assert!(!is_quit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));

        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!is_quit_key(&release));
    }
}
