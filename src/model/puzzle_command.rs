/// Requests sent from the UI to the [`PuzzleEngine`](crate::game::engine::PuzzleEngine).
#[derive(Debug, Clone)]
pub enum PuzzleCommand {
    /// A freshly decoded image is in place; start a session and shuffle.
    NewPuzzle,
    /// Re-randomize the current session ("shuffle again"). Ignored while no
    /// session is active.
    Shuffle,
    /// Turn one tile a quarter turn clockwise.
    RotateTile(usize),
}
