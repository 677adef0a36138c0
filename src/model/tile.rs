use super::puzzle_board::GRID_SIZE;

/// Smallest rotation a click applies, in degrees.
pub const ROTATION_STEP: u16 = 90;
pub const FULL_TURN: u16 = 360;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: usize,       // 0-8, fixed for the lifetime of a board
    pub rotation: u16,   // degrees; always a multiple of 90, < 360
}

impl Tile {
    pub fn upright(id: usize) -> Self {
        Self { id, rotation: 0 }
    }

    pub fn with_rotation(id: usize, rotation: u16) -> Self {
        debug_assert!(rotation < FULL_TURN && rotation % ROTATION_STEP == 0);
        Self { id, rotation }
    }

    /// The same tile turned one step clockwise.
    pub fn rotated(&self) -> Self {
        Self {
            id: self.id,
            rotation: (self.rotation + ROTATION_STEP) % FULL_TURN,
        }
    }

    pub fn is_upright(&self) -> bool {
        self.rotation % FULL_TURN == 0
    }

    /// Grid position is derived from the id and never changes.
    pub fn row(&self) -> usize {
        self.id / GRID_SIZE
    }

    pub fn col(&self) -> usize {
        self.id % GRID_SIZE
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}∠{}", self.id, self.rotation)
    }
}

impl std::fmt::Debug for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}∠{}", self.id, self.rotation)
    }
}
