use std::time::Duration;

use uuid::Uuid;

/// Summary of one finished playthrough, reported when the board solves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveStats {
    pub solve_time: Duration,
    pub rotations: u32,
    pub timestamp: i64,
    pub playthrough_id: Uuid,
}
