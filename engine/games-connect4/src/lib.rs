//! Connect 4 game implementation for the search engine
//!
//! Connect 4 is a two-player connection game where players drop colored discs
//! into a 7-column, 6-row vertically suspended grid. The objective is to be
//! the first to form a horizontal, vertical, or diagonal line of four discs.
//!
//! # Board Layout
//!
//! The board is stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! Moves are column indices. Text positions list rows from the top down,
//! the way the board looks on screen.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Game, Player};
//! use games_connect4::Connect4;
//!
//! let game = Connect4;
//! let board = game.apply(&game.initial_state(), 3, Player::First);
//! assert_eq!(board.height(3), 1);
//! assert_eq!(game.side_to_move(&board), Player::Second);
//! ```

use std::fmt;
use std::str::FromStr;

use engine_core::{Game, GameError, GameMetadata, Player, TerminalStatus};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Discs in a row needed to win
pub const CONNECT: usize = 4;

/// Direction vectors: horizontal, vertical, diagonal /, diagonal \
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Occupancy of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Disc {
    #[default]
    Empty,
    Red,
    Yellow,
}

impl Disc {
    pub fn of(player: Player) -> Self {
        match player {
            Player::First => Disc::Red,
            Player::Second => Disc::Yellow,
        }
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Disc::Empty => None,
            Disc::Red => Some(Player::First),
            Disc::Yellow => Some(Player::Second),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Disc::Empty => '.',
            Disc::Red => 'R',
            Disc::Yellow => 'Y',
        }
    }
}

/// Connect 4 position.
///
/// Column heights and the outcome are derived from the cells and cached so
/// move generation and terminal checks stay O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Stored in row-major order with row 0 at the bottom
    cells: [Disc; BOARD_SIZE],
    /// Number of discs in each column
    heights: [u8; COLS],
    status: TerminalStatus,
}

impl Board {
    /// Empty board.
    pub fn new() -> Self {
        Self {
            cells: [Disc::Empty; BOARD_SIZE],
            heights: [0; COLS],
            status: TerminalStatus::Ongoing,
        }
    }

    /// Convert column and row to board index
    #[inline]
    fn pos(col: usize, row: usize) -> usize {
        row * COLS + col
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Disc {
        self.cells[Self::pos(col, row)]
    }

    /// Number of discs in `col`.
    #[inline]
    pub fn height(&self, col: usize) -> usize {
        self.heights[col] as usize
    }

    #[inline]
    pub fn is_column_full(&self, col: usize) -> bool {
        self.height(col) >= ROWS
    }

    #[inline]
    pub fn status(&self) -> TerminalStatus {
        self.status
    }

    pub fn count(&self, disc: Disc) -> usize {
        self.cells.iter().filter(|&&d| d == disc).count()
    }

    /// Drop a disc for `player` into `column` and return the new board.
    ///
    /// # Panics
    ///
    /// Panics if the column does not exist or is full.
    pub fn drop_disc(&self, column: u8, player: Player) -> Board {
        let col = column as usize;
        assert!(col < COLS, "column {col} does not exist");
        assert!(!self.is_column_full(col), "column {col} is full");

        let mut next = *self;
        let row = self.height(col);
        next.cells[Self::pos(col, row)] = Disc::of(player);
        next.heights[col] += 1;

        next.status = if next.connects_at(col, row) {
            TerminalStatus::Win(player)
        } else if next.heights.iter().all(|&h| h as usize >= ROWS) {
            TerminalStatus::Draw
        } else {
            TerminalStatus::Ongoing
        };
        next
    }

    /// Check if the disc at (col, row) is part of a line of `CONNECT`
    fn connects_at(&self, col: usize, row: usize) -> bool {
        let disc = self.get(col, row);
        if disc == Disc::Empty {
            return false;
        }

        let in_bounds = |c: i32, r: i32| c >= 0 && c < COLS as i32 && r >= 0 && r < ROWS as i32;

        for (dc, dr) in DIRECTIONS {
            let mut count = 1; // the disc itself

            for sign in [1, -1] {
                let (mut c, mut r) = (col as i32 + sign * dc, row as i32 + sign * dr);
                while in_bounds(c, r) && self.get(c as usize, r as usize) == disc {
                    count += 1;
                    c += sign * dc;
                    r += sign * dr;
                }
            }

            if count >= CONNECT {
                return true;
            }
        }
        false
    }

    /// Players with at least one connected line, found by scanning every cell.
    fn connected_players(&self) -> Vec<Player> {
        let mut players = Vec::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                if let Some(owner) = self.get(col, row).owner() {
                    if !players.contains(&owner) && self.connects_at(col, row) {
                        players.push(owner);
                    }
                }
            }
        }
        players
    }

    /// Whether some disc sits above an empty cell.
    fn has_floating_disc(&self) -> bool {
        (0..COLS).any(|col| (self.height(col)..ROWS).any(|row| self.get(col, row) != Disc::Empty))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses six rows from top to bottom. `R`/`X` is the first player, `Y`/`O`
/// the second, `.`, `_` or `-` an empty cell; `/`, `|` and whitespace are
/// ignored.
impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut discs = Vec::with_capacity(BOARD_SIZE);
        for ch in s.chars() {
            match ch {
                'R' | 'r' | 'X' | 'x' => discs.push(Disc::Red),
                'Y' | 'y' | 'O' | 'o' => discs.push(Disc::Yellow),
                '.' | '_' | '-' => discs.push(Disc::Empty),
                '/' | '|' => {}
                c if c.is_whitespace() => {}
                other => {
                    return Err(GameError::Parse(format!(
                        "unexpected character {other:?}"
                    )))
                }
            }
        }
        if discs.len() != BOARD_SIZE {
            return Err(GameError::Parse(format!(
                "expected {BOARD_SIZE} cells, found {}",
                discs.len()
            )));
        }

        let mut board = Board::new();
        for (i, disc) in discs.into_iter().enumerate() {
            let row = ROWS - 1 - i / COLS;
            board.cells[Self::pos(i % COLS, row)] = disc;
        }
        for col in 0..COLS {
            board.heights[col] = (0..ROWS)
                .take_while(|&row| board.get(col, row) != Disc::Empty)
                .count() as u8;
        }
        board.status = match board.connected_players().first() {
            Some(&player) => TerminalStatus::Win(player),
            None if board.count(Disc::Empty) == 0 => TerminalStatus::Draw,
            None => TerminalStatus::Ongoing,
        };
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                write!(f, "{}", self.get(col, row).symbol())?;
            }
            if row > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Connect 4 on the standard 7x6 board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Connect4;

impl Game for Connect4 {
    type State = Board;
    type Move = u8;

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("connect4", "Connect 4")
            .with_board(COLS, ROWS)
            .with_symbols('R', 'Y')
            .with_description("Drop discs to connect four in a row")
            .with_board_type("drop_column")
    }

    fn initial_state(&self) -> Board {
        Board::new()
    }

    fn legal_moves(&self, board: &Board) -> Vec<u8> {
        (0..COLS as u8)
            .filter(|&col| !board.is_column_full(col as usize))
            .collect()
    }

    fn apply(&self, board: &Board, column: u8, player: Player) -> Board {
        board.drop_disc(column, player)
    }

    fn terminal_status(&self, board: &Board) -> TerminalStatus {
        board.status()
    }

    fn side_to_move(&self, board: &Board) -> Player {
        if board.count(Disc::Red) > board.count(Disc::Yellow) {
            Player::Second
        } else {
            Player::First
        }
    }

    fn validate(&self, board: &Board) -> Result<(), GameError> {
        let red = board.count(Disc::Red);
        let yellow = board.count(Disc::Yellow);
        if red != yellow && red != yellow + 1 {
            return Err(GameError::MalformedState(format!(
                "unreachable disc counts (R={red}, Y={yellow})"
            )));
        }
        if board.has_floating_disc() {
            return Err(GameError::MalformedState(
                "a disc is floating above an empty cell".into(),
            ));
        }
        if board.connected_players().len() > 1 {
            return Err(GameError::MalformedState(
                "both players have four in a row".into(),
            ));
        }
        Ok(())
    }
}
