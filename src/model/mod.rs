mod global_event;
mod puzzle_board;
mod puzzle_command;
mod puzzle_event;
mod solve_stats;
mod tile;
mod timer_state;

pub use global_event::GlobalEvent;
pub use puzzle_board::{PuzzleBoard, GRID_SIZE, TILE_COUNT};
pub use puzzle_command::PuzzleCommand;
pub use puzzle_event::PuzzleEvent;
pub use solve_stats::SolveStats;
pub use tile::{Tile, FULL_TURN, ROTATION_STEP};
pub use timer_state::TimerState;
