//! # Input Module
//!
//! Maps key presses to player commands.
//!
//! Keys arrive as characters so any front end (a terminal, a script, a
//! test) can feed them in.

use crate::{config, Direction, PlayerCommand};

/// Input handler for processing player key presses.
///
/// Converts keys into [`PlayerInput`]s and those into the
/// [`PlayerCommand`]s the world accepts.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, InputHandler, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(input_handler.parse_key('w'), Some(PlayerInput::Move(Direction::Up)));
    /// assert_eq!(input_handler.parse_key('3'), Some(PlayerInput::UseSlot(2)));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Interprets a single key. Unknown keys yield `None`.
    pub fn parse_key(&self, key: char) -> Option<PlayerInput> {
        let input = match key.to_ascii_lowercase() {
            'w' => PlayerInput::Move(Direction::Up),
            'a' => PlayerInput::Move(Direction::Left),
            's' => PlayerInput::Move(Direction::Down),
            'd' => PlayerInput::Move(Direction::Right),
            'k' if self.vi_keys_enabled => PlayerInput::Move(Direction::Up),
            'h' if self.vi_keys_enabled => PlayerInput::Move(Direction::Left),
            'j' if self.vi_keys_enabled => PlayerInput::Move(Direction::Down),
            'l' if self.vi_keys_enabled => PlayerInput::Move(Direction::Right),
            '.' | ' ' => PlayerInput::Wait,
            '?' => PlayerInput::Help,
            'q' => PlayerInput::Quit,
            digit @ '1'..='9' => {
                let slot = digit.to_digit(10).map(|n| n as usize - 1)?;
                if slot >= config::MAX_INVENTORY_CAPACITY {
                    return None;
                }
                PlayerInput::UseSlot(slot)
            }
            _ => return None,
        };
        Some(input)
    }

    /// Converts player input to a command.
    ///
    /// Inputs that do not act in the world (help, quit) yield `None`.
    pub fn input_to_command(&self, input: PlayerInput) -> Option<PlayerCommand> {
        match input {
            PlayerInput::Move(direction) => Some(PlayerCommand::Move(direction)),
            PlayerInput::Wait => Some(PlayerCommand::Wait),
            PlayerInput::UseSlot(slot) => Some(PlayerCommand::UseItem(slot)),
            PlayerInput::Help | PlayerInput::Quit => None,
        }
    }

    /// Parses a run of keys into inputs, skipping anything unrecognised.
    ///
    /// Parsing stops at the first quit key.
    pub fn parse_inputs(&self, keys: &str) -> Vec<PlayerInput> {
        keys.chars()
            .filter_map(|key| self.parse_key(key))
            .take_while(|input| *input != PlayerInput::Quit)
            .collect()
    }

    /// Key reference shown for the help input.
    pub fn help_text(&self) -> String {
        let mut text = String::from(
            "Move: WASD\nWait: . or space\nUse inventory slot: 1-9\nHelp: ?\nQuit: q",
        );
        if self.vi_keys_enabled {
            text.push_str("\nVi keys: hjkl");
        }
        text
    }
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move or attack in a direction
    Move(Direction),
    /// Wait for one turn
    Wait,
    /// Use the item in an inventory slot (0-based)
    UseSlot(usize),
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        let handler = InputHandler::new();
        assert_eq!(handler.parse_key('W'), Some(PlayerInput::Move(Direction::Up)));
        assert_eq!(handler.parse_key('d'), Some(PlayerInput::Move(Direction::Right)));
        assert_eq!(handler.parse_key('h'), Some(PlayerInput::Move(Direction::Left)));
        assert_eq!(handler.parse_key('x'), None);
    }

    #[test]
    fn test_vi_keys_can_be_disabled() {
        let handler = InputHandler {
            vi_keys_enabled: false,
        };
        assert_eq!(handler.parse_key('j'), None);
        assert!(!handler.help_text().contains("hjkl"));
    }

    #[test]
    fn test_slot_keys_are_zero_based() {
        let handler = InputHandler::new();
        assert_eq!(handler.parse_key('1'), Some(PlayerInput::UseSlot(0)));
        assert_eq!(handler.parse_key('9'), Some(PlayerInput::UseSlot(8)));
        assert_eq!(handler.parse_key('0'), None);
    }

    #[test]
    fn test_input_to_command() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.input_to_command(PlayerInput::UseSlot(2)),
            Some(PlayerCommand::UseItem(2))
        );
        assert_eq!(handler.input_to_command(PlayerInput::Help), None);
    }

    #[test]
    fn test_parse_inputs_keeps_help() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.parse_inputs("?d q?"),
            vec![
                PlayerInput::Help,
                PlayerInput::Move(Direction::Right),
                PlayerInput::Wait,
            ]
        );
    }

    #[test]
    fn test_parse_inputs_stops_at_quit() {
        let handler = InputHandler::new();
        let commands: Vec<_> = handler
            .parse_inputs("dd.?1 xq ss")
            .into_iter()
            .filter_map(|input| handler.input_to_command(input))
            .collect();
        assert_eq!(
            commands,
            vec![
                PlayerCommand::Move(Direction::Right),
                PlayerCommand::Move(Direction::Right),
                PlayerCommand::Wait,
                PlayerCommand::UseItem(0),
                PlayerCommand::Wait,
            ]
        );
    }
}
