use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, SnakeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Steer one player's snake
    Steer { player: SnakeId, direction: Direction },
    /// Start the next round once the current one has ended
    NextRound,
    Quit,
    None,
}

/// Arrow keys steer player 1, WASD steers player 2
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Player 1 - Arrow keys
            KeyCode::Up => steer(0, Direction::North),
            KeyCode::Down => steer(0, Direction::South),
            KeyCode::Left => steer(0, Direction::West),
            KeyCode::Right => steer(0, Direction::East),

            // Player 2 - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => steer(1, Direction::North),
            KeyCode::Char('s') | KeyCode::Char('S') => steer(1, Direction::South),
            KeyCode::Char('a') | KeyCode::Char('A') => steer(1, Direction::West),
            KeyCode::Char('d') | KeyCode::Char('D') => steer(1, Direction::East),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => KeyAction::NextRound,

            _ => KeyAction::None,
        }
    }
}

fn steer(player: SnakeId, direction: Direction) -> KeyAction {
    KeyAction::Steer { player, direction }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
