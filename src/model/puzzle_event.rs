use super::{PuzzleBoard, SolveStats, TimerState};

/// State changes broadcast by the engine; UI components subscribe to these.
#[derive(Debug, Clone)]
pub enum PuzzleEvent {
    /// All nine tiles were re-randomized. Carries the full board so views
    /// can snap to it without animating.
    BoardShuffled(PuzzleBoard),
    /// One tile advanced a quarter turn; `rotation` is its new value.
    TileRotated { id: usize, rotation: u16 },
    RotationCountChanged(u32),
    TimerStateChanged(TimerState),
    PuzzleSolved(SolveStats),
}
