//! Square board storage, parsing and rendering.

use std::fmt;
use std::str::FromStr;

use engine_core::{GameError, Player};

/// Largest supported board side. Positions store row and column as `u8`.
pub const MAX_SIZE: usize = 16;

/// Occupancy of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// Mark placed by `player`: X for the first player, O for the second.
    #[inline]
    pub fn of(player: Player) -> Self {
        match player {
            Player::First => Cell::X,
            Player::Second => Cell::O,
        }
    }

    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::First),
            Cell::O => Some(Player::Second),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }
}

/// A cell coordinate; also the move type of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major index on a board of side `size`.
    #[inline]
    pub fn index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    /// Inverse of [`Position::index`].
    #[inline]
    pub fn from_index(index: usize, size: usize) -> Self {
        Self::new((index / size) as u8, (index % size) as u8)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An N x N board. Value type: the game clones it for every successor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// An empty board of side `size`.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Build a board from one string per row, e.g. `["XX.", "OO.", "..."]`.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GameError> {
        rows.join("/").parse()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        (pos.row as usize) < self.size && (pos.col as usize) < self.size
    }

    /// Cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    #[inline]
    pub fn get(&self, pos: Position) -> Cell {
        assert!(self.contains(pos), "position {pos} is off a {0}x{0} board", self.size);
        self.cells[pos.index(self.size)]
    }

    /// Overwrite the cell at `pos`.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        assert!(self.contains(pos), "position {pos} is off a {0}x{0} board", self.size);
        let index = pos.index(self.size);
        self.cells[index] = cell;
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Empty cells in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell == Cell::Empty)
            .map(move |(index, _)| Position::from_index(index, size))
    }
}

/// Parses `X`/`O` marks and `.`, `_` or `-` for empty cells. Row separators
/// (`/`, `|`, whitespace) are ignored, so `"XX./OO./..."` and `"XX.OO...."`
/// describe the same board. The cell count must be a perfect square.
impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::with_capacity(s.len());
        for ch in s.chars() {
            match ch {
                'X' | 'x' => cells.push(Cell::X),
                'O' | 'o' => cells.push(Cell::O),
                '.' | '_' | '-' => cells.push(Cell::Empty),
                '/' | '|' => {}
                c if c.is_whitespace() => {}
                other => {
                    return Err(GameError::Parse(format!(
                        "unexpected character {other:?}"
                    )))
                }
            }
        }

        let size = (1..=MAX_SIZE)
            .find(|n| n * n == cells.len())
            .ok_or_else(|| {
                GameError::Parse(format!(
                    "{} cells do not form a square board of side 1..={MAX_SIZE}",
                    cells.len()
                ))
            })?;

        Ok(Self { size, cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(self.size.max(1)).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_separators() {
        let compact: Board = "XX.OO....".parse().unwrap();
        let rows: Board = "XX./OO./...".parse().unwrap();
        let spaced: Board = "X X _\nO O _\n_ _ _".parse().unwrap();

        assert_eq!(compact, rows);
        assert_eq!(compact, spaced);
        assert_eq!(compact.size(), 3);
        assert_eq!(compact.get(Position::new(0, 1)), Cell::X);
        assert_eq!(compact.get(Position::new(1, 0)), Cell::O);
        assert_eq!(compact.get(Position::new(2, 2)), Cell::Empty);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!("XX.OO...".parse::<Board>(), Err(GameError::Parse(_))));
        assert!(matches!("XX.OO...Z".parse::<Board>(), Err(GameError::Parse(_))));
        assert!(matches!("".parse::<Board>(), Err(GameError::Parse(_))));
    }

    #[test]
    fn test_display() {
        let board = Board::from_rows(&["X.O", "...", "..X"]).unwrap();
        assert_eq!(board.to_string(), "X.O\n...\n..X");
        assert_eq!(board.to_string().parse::<Board>().unwrap(), board);
    }

    #[test]
    fn test_empty_positions_row_major() {
        let board = Board::from_rows(&["X.O", "O.X", "..."]).unwrap();
        let empty: Vec<_> = board.empty_positions().collect();
        assert_eq!(
            empty,
            vec![
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(2, 2),
            ]
        );
        assert_eq!(board.count(Cell::X), 2);
        assert_eq!(board.count(Cell::O), 2);
        assert!(!board.is_full());
    }

    #[test]
    fn test_position_index_roundtrip() {
        for index in 0..16 {
            assert_eq!(Position::from_index(index, 4).index(4), index);
        }
        assert_eq!(Position::new(2, 1).index(3), 7);
        assert_eq!(Position::new(2, 1).to_string(), "(2, 1)");
    }

    #[test]
    #[should_panic(expected = "off a 3x3 board")]
    fn test_get_out_of_bounds_panics() {
        Board::empty(3).get(Position::new(3, 0));
    }

    #[test]
    fn test_cell_owner() {
        assert_eq!(Cell::of(Player::First), Cell::X);
        assert_eq!(Cell::of(Player::Second), Cell::O);
        assert_eq!(Cell::X.owner(), Some(Player::First));
        assert_eq!(Cell::Empty.owner(), None);
    }
}
