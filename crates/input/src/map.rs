//! Key mapping from terminal events to commands.

use crate::types::{Command, Phase};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Phases that show a list of options.
fn is_menu(phase: Phase) -> bool {
    matches!(phase, Phase::LevelUpChoice | Phase::ChoiceEvent)
}

/// Map keyboard input to a command for the phase on screen.
pub fn handle_key_event(key: KeyEvent, phase: Phase) -> Option<Command> {
    if is_menu(phase) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
                return Some(Command::CursorUp);
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
                return Some(Command::CursorDown);
            }
            _ => {}
        }
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Command::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Command::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Command::SoftDrop)
        }

        // Rotation
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char('x')
        | KeyCode::Char('X') => Some(Command::RotateCw),
        KeyCode::Char('z')
        | KeyCode::Char('Z')
        | KeyCode::Char('y')
        | KeyCode::Char('Y') => Some(Command::RotateCcw),

        // Actions
        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Hold),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(Command::Pause),

        // Menus
        KeyCode::Enter => Some(Command::Confirm),
        KeyCode::Char(c @ '1'..='3') => Some(Command::Choose(c as u8 - b'1')),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::ShowRanking),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_movement_keys() {
        let p = Phase::PuzzleCombat;
        assert_eq!(handle_key_event(key(KeyCode::Left), p), Some(Command::MoveLeft));
        assert_eq!(handle_key_event(key(KeyCode::Right), p), Some(Command::MoveRight));
        assert_eq!(handle_key_event(key(KeyCode::Down), p), Some(Command::SoftDrop));
        assert_eq!(handle_key_event(key(KeyCode::Char('H')), p), Some(Command::MoveLeft));
        assert_eq!(handle_key_event(key(KeyCode::Char('L')), p), Some(Command::MoveRight));
        assert_eq!(handle_key_event(key(KeyCode::Char('J')), p), Some(Command::SoftDrop));
    }

    #[test]
    fn test_rotation_keys() {
        let p = Phase::Exploration;
        assert_eq!(handle_key_event(key(KeyCode::Up), p), Some(Command::RotateCw));
        assert_eq!(handle_key_event(key(KeyCode::Char('x')), p), Some(Command::RotateCw));
        assert_eq!(handle_key_event(key(KeyCode::Char('z')), p), Some(Command::RotateCcw));
        assert_eq!(handle_key_event(key(KeyCode::Char('Y')), p), Some(Command::RotateCcw));
    }

    #[test]
    fn test_action_keys() {
        let p = Phase::Exploration;
        assert_eq!(handle_key_event(key(KeyCode::Char(' ')), p), Some(Command::HardDrop));
        assert_eq!(handle_key_event(key(KeyCode::Char('c')), p), Some(Command::Hold));
        assert_eq!(handle_key_event(key(KeyCode::Char('p')), p), Some(Command::Pause));
        assert_eq!(handle_key_event(key(KeyCode::Esc), p), Some(Command::Pause));
    }

    #[test]
    fn test_menu_keys() {
        let p = Phase::LevelUpChoice;
        assert_eq!(handle_key_event(key(KeyCode::Up), p), Some(Command::CursorUp));
        assert_eq!(handle_key_event(key(KeyCode::Down), p), Some(Command::CursorDown));
        assert_eq!(handle_key_event(key(KeyCode::Enter), p), Some(Command::Confirm));
        assert_eq!(handle_key_event(key(KeyCode::Char('1')), p), Some(Command::Choose(0)));
        assert_eq!(handle_key_event(key(KeyCode::Char('3')), p), Some(Command::Choose(2)));
        assert_eq!(handle_key_event(key(KeyCode::Char('4')), p), None);
        assert_eq!(
            handle_key_event(key(KeyCode::Char('r')), Phase::Title),
            Some(Command::ShowRanking)
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(key(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(key(KeyCode::Char('x'))));
    }
}
