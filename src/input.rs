//! Key bindings: arrows or vim keys in play, text entry for the name prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Phase};

/// What a key press means to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Command),
    Quit,
    None,
}

/// Map a key event to an action for the current phase.
pub fn key_to_action(key: KeyEvent, phase: Phase) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }
    if phase == Phase::NameEntry {
        return match code {
            KeyCode::Enter => Action::Game(Command::Confirm),
            KeyCode::Backspace => Action::Game(Command::Backspace),
            KeyCode::Char(c) => Action::Game(Command::TextChar(c)),
            _ => Action::None,
        };
    }
    let command = match (phase, code) {
        (_, KeyCode::Char('q') | KeyCode::Esc) => return Action::Quit,
        (Phase::NotStarted | Phase::HighScores, KeyCode::Char(' ') | KeyCode::Enter) => {
            Command::Start
        }
        (Phase::NotStarted | Phase::HighScores, KeyCode::Char('h' | 'H')) => {
            Command::ToggleHighScores
        }
        (Phase::Playing, KeyCode::Left | KeyCode::Char('h')) => Command::MoveLeft,
        (Phase::Playing, KeyCode::Right | KeyCode::Char('l')) => Command::MoveRight,
        (Phase::Playing, KeyCode::Down | KeyCode::Char('j')) => Command::SoftDrop,
        (Phase::Playing, KeyCode::Up | KeyCode::Char('k' | 'x')) => Command::RotateClockwise,
        (Phase::Playing | Phase::Paused, KeyCode::Char('p')) => Command::Pause,
        (Phase::GameOver, KeyCode::Char('r' | 'R')) => Command::Restart,
        (Phase::GameOver, KeyCode::Char('m' | 'M')) => Command::ToMenu,
        _ => return Action::None,
    };
    Action::Game(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_play_bindings() {
        let p = Phase::Playing;
        assert_eq!(key_to_action(press(KeyCode::Left), p), Action::Game(Command::MoveLeft));
        assert_eq!(key_to_action(press(KeyCode::Char('l')), p), Action::Game(Command::MoveRight));
        assert_eq!(key_to_action(press(KeyCode::Down), p), Action::Game(Command::SoftDrop));
        assert_eq!(key_to_action(press(KeyCode::Up), p), Action::Game(Command::RotateClockwise));
        assert_eq!(key_to_action(press(KeyCode::Char(' ')), p), Action::None);
    }

    #[test]
    fn test_h_depends_on_phase() {
        let h = press(KeyCode::Char('h'));
        assert_eq!(key_to_action(h, Phase::Playing), Action::Game(Command::MoveLeft));
        assert_eq!(
            key_to_action(h, Phase::NotStarted),
            Action::Game(Command::ToggleHighScores)
        );
        assert_eq!(key_to_action(h, Phase::NameEntry), Action::Game(Command::TextChar('h')));
    }

    #[test]
    fn test_name_entry_does_not_quit_on_q() {
        assert_eq!(
            key_to_action(press(KeyCode::Char('q')), Phase::NameEntry),
            Action::Game(Command::TextChar('q'))
        );
        assert_eq!(
            key_to_action(press(KeyCode::Enter), Phase::NameEntry),
            Action::Game(Command::Confirm)
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c, Phase::NameEntry), Action::Quit);
    }

    #[test]
    fn test_game_over_bindings() {
        let g = Phase::GameOver;
        assert_eq!(key_to_action(press(KeyCode::Char('r')), g), Action::Game(Command::Restart));
        assert_eq!(key_to_action(press(KeyCode::Char('m')), g), Action::Game(Command::ToMenu));
        assert_eq!(key_to_action(press(KeyCode::Esc), g), Action::Quit);
    }
}
