//! TicTacToe game implementation for the search engine
//!
//! Square boards of side 1 to 16 with a configurable win length
//! ("k in a row"). `TicTacToe::default()` is the classic 3x3 game.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Game, Player, TerminalStatus};
//! use games_tictactoe::{Board, Position, TicTacToe};
//!
//! let game = TicTacToe::default();
//! let board: Board = "XX./OO./...".parse().unwrap();
//!
//! let after = game.apply(&board, Position::new(0, 2), Player::First);
//! assert_eq!(game.terminal_status(&after), TerminalStatus::Win(Player::First));
//! ```

mod board;

pub use board::{Board, Cell, Position, MAX_SIZE};

use engine_core::{Game, GameError, GameMetadata, Player, TerminalStatus};

/// Line directions scanned from every cell: right, down, down-right, down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// N x N tic-tac-toe where `win_length` marks in a row win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    size: usize,
    win_length: usize,
}

impl TicTacToe {
    /// Create a game on a `size` x `size` board.
    ///
    /// Requires `1 <= win_length <= size <= MAX_SIZE`.
    pub fn new(size: usize, win_length: usize) -> Result<Self, GameError> {
        if size == 0 || size > MAX_SIZE {
            return Err(GameError::InvalidDimensions(format!(
                "board size {size} is outside 1..={MAX_SIZE}"
            )));
        }
        if win_length == 0 || win_length > size {
            return Err(GameError::InvalidDimensions(format!(
                "win length {win_length} does not fit a {size}x{size} board"
            )));
        }
        Ok(Self { size, win_length })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Player holding a complete line, if any. X is checked first.
    pub fn winner(&self, board: &Board) -> Option<Player> {
        Player::ALL
            .into_iter()
            .find(|&player| self.has_line(board, player))
    }

    /// Whether `player` has `win_length` marks in a row anywhere on `board`.
    pub fn has_line(&self, board: &Board, player: Player) -> bool {
        let target = Cell::of(player);
        let n = board.size() as isize;
        let k = self.win_length as isize;
        let at = |row: isize, col: isize| board.get(Position::new(row as u8, col as u8));

        for row in 0..n {
            for col in 0..n {
                if at(row, col) != target {
                    continue;
                }
                for (dr, dc) in DIRECTIONS {
                    let end_row = row + dr * (k - 1);
                    let end_col = col + dc * (k - 1);
                    if !(0..n).contains(&end_row) || !(0..n).contains(&end_col) {
                        continue;
                    }
                    if (1..k).all(|step| at(row + dr * step, col + dc * step) == target) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self {
            size: 3,
            win_length: 3,
        }
    }
}

impl Game for TicTacToe {
    type State = Board;
    type Move = Position;

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("tictactoe", "Tic-Tac-Toe")
            .with_board(self.size, self.size)
            .with_symbols('X', 'O')
            .with_description(format!(
                "Get {} in a row on a {}x{} board",
                self.win_length, self.size, self.size
            ))
    }

    fn initial_state(&self) -> Board {
        Board::empty(self.size)
    }

    fn legal_moves(&self, board: &Board) -> Vec<Position> {
        board.empty_positions().collect()
    }

    fn apply(&self, board: &Board, mv: Position, player: Player) -> Board {
        assert_eq!(
            board.get(mv),
            Cell::Empty,
            "cell {mv} is already occupied"
        );
        let mut next = board.clone();
        next.set(mv, Cell::of(player));
        next
    }

    fn terminal_status(&self, board: &Board) -> TerminalStatus {
        match self.winner(board) {
            Some(player) => TerminalStatus::Win(player),
            None if board.is_full() => TerminalStatus::Draw,
            None => TerminalStatus::Ongoing,
        }
    }

    /// X moves on equal counts; otherwise the side with fewer marks.
    fn side_to_move(&self, board: &Board) -> Player {
        if board.count(Cell::X) > board.count(Cell::O) {
            Player::Second
        } else {
            Player::First
        }
    }

    fn validate(&self, board: &Board) -> Result<(), GameError> {
        if board.size() != self.size {
            return Err(GameError::MalformedState(format!(
                "board is {0}x{0} but the game is played on {1}x{1}",
                board.size(),
                self.size
            )));
        }

        let x = board.count(Cell::X);
        let o = board.count(Cell::O);
        // X moves first, so X leads by at most one mark and never trails
        if x != o && x != o + 1 {
            return Err(GameError::MalformedState(format!(
                "unreachable mark counts (X={x}, O={o})"
            )));
        }

        if self.has_line(board, Player::First) && self.has_line(board, Player::Second) {
            return Err(GameError::MalformedState(
                "both players have a winning line".into(),
            ));
        }

        Ok(())
    }
}
