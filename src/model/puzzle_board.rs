use rand::Rng;

use super::tile::{Tile, FULL_TURN, ROTATION_STEP};

pub const GRID_SIZE: usize = 3;
pub const TILE_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// The nine tiles of one puzzle. Tiles never move; only their rotation
/// changes.
#[derive(Clone, PartialEq, Eq)]
pub struct PuzzleBoard {
    tiles: [Tile; TILE_COUNT],
}

impl Default for PuzzleBoard {
    fn default() -> Self {
        Self {
            tiles: std::array::from_fn(Tile::upright),
        }
    }
}

impl PuzzleBoard {
    /// A board with every tile rotation drawn uniformly from
    /// {0, 90, 180, 270}.
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        Self {
            tiles: std::array::from_fn(|id| {
                Tile::with_rotation(id, rng.random_range(0..(FULL_TURN / ROTATION_STEP)) * ROTATION_STEP)
            }),
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, id: usize) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Turns one tile a quarter turn clockwise; returns its new state, or
    /// `None` for an out-of-range id.
    pub fn rotate_tile(&mut self, id: usize) -> Option<Tile> {
        let tile = self.tiles.get_mut(id)?;
        *tile = tile.rotated();
        Some(*tile)
    }

    pub fn is_solved(&self) -> bool {
        self.tiles.iter().all(Tile::is_upright)
    }
}

impl std::fmt::Debug for PuzzleBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for tile in &self.tiles {
            list.entry(tile);
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_board_is_solved() {
        let board = PuzzleBoard::default();
        assert_eq!(board.tiles().len(), TILE_COUNT);
        assert!(board.is_solved());
    }

    #[test]
    fn test_shuffled_board_has_nine_tiles_in_id_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = PuzzleBoard::shuffled(&mut rng);

        assert_eq!(board.tiles().len(), TILE_COUNT);
        for (id, tile) in board.tiles().iter().enumerate() {
            assert_eq!(tile.id, id);
            assert!(matches!(tile.rotation, 0 | 90 | 180 | 270));
        }
    }

    #[test]
    fn test_rotation_accumulates_monotonically() {
        let mut board = PuzzleBoard::default();
        assert_eq!(board.rotate_tile(0).unwrap().rotation, 90);
        assert_eq!(board.rotate_tile(0).unwrap().rotation, 180);
        assert_eq!(board.rotate_tile(0).unwrap().rotation, 270);
        assert_eq!(board.rotate_tile(0).unwrap().rotation, 0);
    }

    #[test]
    fn test_rotate_out_of_range_id_is_rejected() {
        let mut board = PuzzleBoard::default();
        assert!(board.rotate_tile(TILE_COUNT).is_none());
        assert!(board.is_solved());
    }

    #[test]
    fn test_solved_iff_every_tile_is_upright() {
        let mut board = PuzzleBoard::default();
        assert!(board.is_solved());

        board.rotate_tile(3);
        assert!(!board.is_solved());

        // Three more quarter turns bring tile 3 back upright.
        for _ in 0..3 {
            board.rotate_tile(3);
        }
        assert!(board.is_solved());
    }
}
