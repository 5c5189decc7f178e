//! Game metadata for display and configuration
//!
//! Frontends such as the arena CLI use this to render boards and label
//! players without knowing the concrete game type.

use serde::{Deserialize, Serialize};

/// Metadata about a game for display and configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Game identifier (e.g., "tictactoe", "connect4")
    pub env_id: String,

    /// Human-readable display name (e.g., "Tic-Tac-Toe", "Connect 4")
    pub display_name: String,

    /// Board width in cells
    pub board_width: usize,

    /// Board height in cells
    pub board_height: usize,

    /// Single-character symbols for each player, in turn order
    pub player_symbols: [char; 2],

    /// Brief description of the rules
    pub description: String,

    /// Board rendering type
    /// - "grid": moves place a mark on any empty cell (TicTacToe)
    /// - "drop_column": moves pick a column and pieces fall (Connect 4)
    pub board_type: String,
}

impl GameMetadata {
    /// Create a new GameMetadata with required fields
    pub fn new(env_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            board_width: 0,
            board_height: 0,
            player_symbols: ['1', '2'],
            description: String::new(),
            board_type: "grid".to_string(),
        }
    }

    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    pub fn with_symbols(mut self, first: char, second: char) -> Self {
        self.player_symbols = [first, second];
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_board_type(mut self, board_type: impl Into<String>) -> Self {
        self.board_type = board_type.into();
        self
    }

    /// Total number of board cells
    pub fn board_size(&self) -> usize {
        self.board_width * self.board_height
    }

    /// Symbol used for `player` when rendering.
    pub fn symbol(&self, player: crate::Player) -> char {
        self.player_symbols[player.index()]
    }
}
