use log::trace;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use uuid::Uuid;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{PuzzleBoard, PuzzleCommand, PuzzleEvent, SolveStats, TimerState};

/// Headless puzzle state machine. Commands arrive over a channel, every
/// state change goes back out as a [`PuzzleEvent`]; the GTK layer never
/// touches the board directly.
pub struct PuzzleEngine {
    board: PuzzleBoard,
    timer_state: TimerState,
    rotations: u32,
    solved: bool,
    /// False until the first image produces a session; rotate/shuffle
    /// commands are ignored before that.
    active: bool,
    playthrough_id: Uuid,
    rng: StdRng,
    command_subscription: Option<Unsubscriber<PuzzleCommand>>,
    puzzle_event_emitter: EventEmitter<PuzzleEvent>,
}

impl Destroyable for PuzzleEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.command_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl PuzzleEngine {
    pub fn new(
        command_observer: EventObserver<PuzzleCommand>,
        puzzle_event_emitter: EventEmitter<PuzzleEvent>,
        seed: Option<u64>,
    ) -> Rc<RefCell<Self>> {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        trace!(target: "engine", "Shuffle seed: {}", seed);

        let engine = Self {
            board: PuzzleBoard::default(),
            timer_state: TimerState::default(),
            rotations: 0,
            solved: false,
            active: false,
            playthrough_id: Uuid::new_v4(),
            rng: StdRng::seed_from_u64(seed),
            command_subscription: None,
            puzzle_event_emitter,
        };
        let refcell = Rc::new(RefCell::new(engine));
        PuzzleEngine::wire_subscription(refcell.clone(), command_observer);
        refcell
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        command_observer: EventObserver<PuzzleCommand>,
    ) {
        let engine_handler = engine.clone();
        let subscription = command_observer.subscribe(move |command| {
            let mut engine = engine_handler.borrow_mut();
            engine.handle_command(command.clone());
        });
        engine.borrow_mut().command_subscription = Some(subscription);
    }

    fn handle_command(&mut self, command: PuzzleCommand) {
        trace!(target: "engine", "Handling command: {:?}", command);
        match command {
            PuzzleCommand::NewPuzzle => {
                self.active = true;
                self.shuffle();
            }
            PuzzleCommand::Shuffle => {
                if self.active {
                    self.shuffle();
                } else {
                    trace!(target: "engine", "No session active, ignoring shuffle");
                }
            }
            PuzzleCommand::RotateTile(id) => self.rotate_tile(id),
        }
    }

    /// Re-randomizes every tile and restarts the timer. A shuffle may land
    /// with all tiles upright; that outcome stands, completion is only
    /// recomputed after a rotation.
    fn shuffle(&mut self) {
        self.board = PuzzleBoard::shuffled(&mut self.rng);
        self.solved = false;
        self.rotations = 0;
        self.timer_state = TimerState::default();
        self.playthrough_id = Uuid::new_v4();
        trace!(target: "engine", "Shuffled board: {:?}", self.board);

        self.puzzle_event_emitter
            .emit(PuzzleEvent::BoardShuffled(self.board.clone()));
        self.puzzle_event_emitter
            .emit(PuzzleEvent::RotationCountChanged(self.rotations));
        self.puzzle_event_emitter
            .emit(PuzzleEvent::TimerStateChanged(self.timer_state.clone()));
    }

    fn rotate_tile(&mut self, id: usize) {
        if !self.active || self.solved {
            trace!(target: "engine", "Ignoring rotation of tile {}", id);
            return;
        }

        let Some(tile) = self.board.rotate_tile(id) else {
            log::warn!(target: "engine", "Rotation of unknown tile {} requested", id);
            return;
        };
        self.rotations += 1;

        self.puzzle_event_emitter.emit(PuzzleEvent::TileRotated {
            id,
            rotation: tile.rotation,
        });
        self.puzzle_event_emitter
            .emit(PuzzleEvent::RotationCountChanged(self.rotations));

        if self.board.is_solved() {
            self.solved = true;
            self.timer_state = self.timer_state.ended(SystemTime::now());
            self.puzzle_event_emitter
                .emit(PuzzleEvent::TimerStateChanged(self.timer_state.clone()));
            self.puzzle_event_emitter
                .emit(PuzzleEvent::PuzzleSolved(self.solve_stats()));
        }
    }

    pub fn solve_stats(&self) -> SolveStats {
        SolveStats {
            solve_time: self.timer_state.elapsed(),
            rotations: self.rotations,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs() as i64,
            playthrough_id: self.playthrough_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Channel;
    use crate::model::{FULL_TURN, ROTATION_STEP, TILE_COUNT};

    struct Harness {
        command_emitter: EventEmitter<PuzzleCommand>,
        events: Rc<RefCell<Vec<PuzzleEvent>>>,
        _engine: Rc<RefCell<PuzzleEngine>>,
    }

    fn harness(seed: u64) -> Harness {
        let (command_emitter, command_observer) = Channel::<PuzzleCommand>::new();
        let (puzzle_event_emitter, puzzle_event_observer) = Channel::<PuzzleEvent>::new();

        let events = Rc::new(RefCell::new(Vec::new()));
        let events_clone = events.clone();
        let _ = puzzle_event_observer.subscribe(move |event: &PuzzleEvent| {
            events_clone.borrow_mut().push(event.clone());
        });

        let engine = PuzzleEngine::new(command_observer, puzzle_event_emitter, Some(seed));
        Harness {
            command_emitter,
            events,
            _engine: engine,
        }
    }

    fn last_shuffled_board(events: &[PuzzleEvent]) -> PuzzleBoard {
        events
            .iter()
            .rev()
            .find_map(|event| match event {
                PuzzleEvent::BoardShuffled(board) => Some(board.clone()),
                _ => None,
            })
            .expect("no BoardShuffled event seen")
    }

    /// Rotates every tile the exact complement of its shuffled rotation.
    /// Returns the number of rotations issued.
    fn drive_to_solved(harness: &Harness, board: &PuzzleBoard) -> u32 {
        let mut clicks = 0;
        if board.is_solved() {
            // Degenerate all-upright shuffle: a full turn of one tile also
            // ends in the solved position.
            for _ in 0..(FULL_TURN / ROTATION_STEP) {
                harness.command_emitter.emit(PuzzleCommand::RotateTile(0));
                clicks += 1;
            }
            return clicks;
        }
        for tile in board.tiles() {
            let remaining = ((FULL_TURN - tile.rotation) % FULL_TURN) / ROTATION_STEP;
            for _ in 0..remaining {
                harness
                    .command_emitter
                    .emit(PuzzleCommand::RotateTile(tile.id));
                clicks += 1;
            }
        }
        clicks
    }

    #[test]
    fn test_new_puzzle_shuffles_and_restarts_the_timer() {
        let harness = harness(11);
        harness.command_emitter.emit(PuzzleCommand::NewPuzzle);

        let events = harness.events.borrow();
        let board = last_shuffled_board(&events);
        assert_eq!(board.tiles().len(), TILE_COUNT);
        for (id, tile) in board.tiles().iter().enumerate() {
            assert_eq!(tile.id, id);
            assert_eq!(tile.rotation % ROTATION_STEP, 0);
            assert!(tile.rotation < FULL_TURN);
        }

        assert!(events
            .iter()
            .any(|e| matches!(e, PuzzleEvent::RotationCountChanged(0))));
        assert!(events
            .iter()
            .any(|e| matches!(e, PuzzleEvent::TimerStateChanged(ts) if !ts.is_ended())));
        assert!(!events
            .iter()
            .any(|e| matches!(e, PuzzleEvent::PuzzleSolved(_))));
    }

    #[test]
    fn test_same_seed_reproduces_the_scramble() {
        let first = harness(5);
        first.command_emitter.emit(PuzzleCommand::NewPuzzle);
        let second = harness(5);
        second.command_emitter.emit(PuzzleCommand::NewPuzzle);

        assert_eq!(
            last_shuffled_board(&first.events.borrow()),
            last_shuffled_board(&second.events.borrow())
        );
    }

    #[test]
    fn test_rotation_advances_by_quarter_turns() {
        let harness = harness(21);
        harness.command_emitter.emit(PuzzleCommand::NewPuzzle);
        let board = last_shuffled_board(&harness.events.borrow());
        let start = board.get(0).unwrap().rotation;
        // Clicking tile 0 twice cannot complete the board unless every other
        // tile shuffled upright; rule that degenerate draw out up front.
        assert!(
            !board.tiles().iter().skip(1).all(|t| t.is_upright()),
            "degenerate shuffle for this seed, pick another"
        );

        harness.command_emitter.emit(PuzzleCommand::RotateTile(0));
        harness.command_emitter.emit(PuzzleCommand::RotateTile(0));

        let events = harness.events.borrow();
        let rotations: Vec<u16> = events
            .iter()
            .filter_map(|event| match event {
                PuzzleEvent::TileRotated { id: 0, rotation } => Some(*rotation),
                _ => None,
            })
            .collect();
        assert_eq!(
            rotations,
            vec![
                (start + ROTATION_STEP) % FULL_TURN,
                (start + 2 * ROTATION_STEP) % FULL_TURN
            ]
        );
    }

    #[test]
    fn test_solving_the_last_tile_ends_the_timer() {
        let harness = harness(99);
        harness.command_emitter.emit(PuzzleCommand::NewPuzzle);
        let board = last_shuffled_board(&harness.events.borrow());

        let clicks = drive_to_solved(&harness, &board);

        let events = harness.events.borrow();
        let solves: Vec<&SolveStats> = events
            .iter()
            .filter_map(|event| match event {
                PuzzleEvent::PuzzleSolved(stats) => Some(stats),
                _ => None,
            })
            .collect();
        assert_eq!(solves.len(), 1);
        assert_eq!(solves[0].rotations, clicks);

        let last_timer = events
            .iter()
            .rev()
            .find_map(|event| match event {
                PuzzleEvent::TimerStateChanged(ts) => Some(ts.clone()),
                _ => None,
            })
            .unwrap();
        assert!(last_timer.is_ended());
    }

    #[test]
    fn test_rotations_after_solved_are_ignored() {
        let harness = harness(99);
        harness.command_emitter.emit(PuzzleCommand::NewPuzzle);
        let board = last_shuffled_board(&harness.events.borrow());
        drive_to_solved(&harness, &board);

        let events_before = harness.events.borrow().len();
        harness.command_emitter.emit(PuzzleCommand::RotateTile(3));
        assert_eq!(harness.events.borrow().len(), events_before);
    }

    #[test]
    fn test_reshuffle_after_solved_starts_a_fresh_round() {
        let harness = harness(99);
        harness.command_emitter.emit(PuzzleCommand::NewPuzzle);
        let board = last_shuffled_board(&harness.events.borrow());
        drive_to_solved(&harness, &board);

        harness.command_emitter.emit(PuzzleCommand::Shuffle);

        let events = harness.events.borrow();
        let last_timer = events
            .iter()
            .rev()
            .find_map(|event| match event {
                PuzzleEvent::TimerStateChanged(ts) => Some(ts.clone()),
                _ => None,
            })
            .unwrap();
        assert!(!last_timer.is_ended());
        assert!(matches!(
            events.last(),
            Some(PuzzleEvent::TimerStateChanged(_))
        ));
        assert!(events
            .iter()
            .rev()
            .take(3)
            .any(|e| matches!(e, PuzzleEvent::RotationCountChanged(0))));
    }

    #[test]
    fn test_commands_before_first_image_are_ignored() {
        let harness = harness(1);
        harness.command_emitter.emit(PuzzleCommand::Shuffle);
        harness.command_emitter.emit(PuzzleCommand::RotateTile(0));
        assert!(harness.events.borrow().is_empty());
    }
}
