use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction, GamePhase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Game(Command),
    Quit,
    None,
}

/// Maps key presses to session commands.
///
/// Space is the primary button: it starts from the menu, restarts after a
/// game over and toggles pause otherwise, so the mapping depends on the phase.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, phase: GamePhase) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let command = match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Command::ChangeDirection(Direction::Up),
            KeyCode::Down => Command::ChangeDirection(Direction::Down),
            KeyCode::Left => Command::ChangeDirection(Direction::Left),
            KeyCode::Right => Command::ChangeDirection(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Command::ChangeDirection(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Command::ChangeDirection(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Command::ChangeDirection(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Command::ChangeDirection(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Enter => match phase {
                GamePhase::Menu => Command::Start,
                GamePhase::GameOver => Command::Restart,
                GamePhase::Playing | GamePhase::Paused => Command::TogglePause,
            },
            KeyCode::Char('p') | KeyCode::Char('P') => Command::TogglePause,
            KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
            KeyCode::Char('m') | KeyCode::Char('M') => Command::ReturnToMenu,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return KeyAction::Quit,

            _ => return KeyAction::None,
        };

        KeyAction::Game(command)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up), GamePhase::Playing),
            KeyAction::Game(Command::ChangeDirection(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down), GamePhase::Playing),
            KeyAction::Game(Command::ChangeDirection(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left), GamePhase::Playing),
            KeyAction::Game(Command::ChangeDirection(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right), GamePhase::Playing),
            KeyAction::Game(Command::ChangeDirection(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w')), GamePhase::Playing),
            KeyAction::Game(Command::ChangeDirection(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a')), GamePhase::Playing),
            KeyAction::Game(Command::ChangeDirection(Direction::Left))
        );

        let s_upper = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(s_upper, GamePhase::Playing),
            KeyAction::Game(Command::ChangeDirection(Direction::Down))
        );
    }

    #[test]
    fn test_space_depends_on_phase() {
        let handler = InputHandler::new();
        let space = press(KeyCode::Char(' '));

        assert_eq!(
            handler.handle_key_event(space, GamePhase::Menu),
            KeyAction::Game(Command::Start)
        );
        assert_eq!(
            handler.handle_key_event(space, GamePhase::Playing),
            KeyAction::Game(Command::TogglePause)
        );
        assert_eq!(
            handler.handle_key_event(space, GamePhase::Paused),
            KeyAction::Game(Command::TogglePause)
        );
        assert_eq!(
            handler.handle_key_event(space, GamePhase::GameOver),
            KeyAction::Game(Command::Restart)
        );
    }

    #[test]
    fn test_menu_and_restart_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('m')), GamePhase::Paused),
            KeyAction::Game(Command::ReturnToMenu)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('R')), GamePhase::GameOver),
            KeyAction::Game(Command::Restart)
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        for code in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
            assert_eq!(
                handler.handle_key_event(press(code), GamePhase::Playing),
                KeyAction::Quit
            );
        }

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            handler.handle_key_event(ctrl_c, GamePhase::Menu),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('x')), GamePhase::Playing),
            KeyAction::None
        );
    }
}
