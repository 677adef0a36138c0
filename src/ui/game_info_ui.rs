use std::{cell::RefCell, rc::Rc, time::Duration};

use fluent_i18n::t;
use glib::SourceId;
use gtk4::{prelude::WidgetExt, Label};

use crate::destroyable::Destroyable;
use crate::events::{EventObserver, Unsubscriber};
use crate::model::{PuzzleEvent, SolveStats, TimerState};

/// Elapsed-time display, rotation counter and the solved banner. Owns the
/// once-per-second label refresh and cancels it the moment the timer ends.
pub struct GameInfoUI {
    timer_state: TimerState,
    pub timer_label: Label,
    pub turns_label: Label,
    pub solved_banner: Label,
    timer: Option<SourceId>,
    puzzle_event_subscription: Option<Unsubscriber<PuzzleEvent>>,
}

impl Destroyable for GameInfoUI {
    fn destroy(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.remove();
        }
        if let Some(subscription) = self.puzzle_event_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl GameInfoUI {
    pub fn new(puzzle_event_observer: EventObserver<PuzzleEvent>) -> Rc<RefCell<Self>> {
        let timer_label = Label::new(None);
        timer_label.set_css_classes(&["timer"]);

        let turns_label = Label::new(Some("0"));
        turns_label.set_css_classes(&["turns"]);

        let solved_banner = Label::new(None);
        solved_banner.set_css_classes(&["solved-banner"]);
        solved_banner.set_halign(gtk4::Align::Center);
        solved_banner.set_visible(false);

        let timer_state = TimerState::default();
        GameInfoUI::update_timer_label(&timer_label, &timer_state);

        let game_info = Rc::new(RefCell::new(Self {
            timer_state,
            timer_label,
            turns_label,
            solved_banner,
            timer: None,
            puzzle_event_subscription: None,
        }));

        GameInfoUI::bind_observer(Rc::clone(&game_info), puzzle_event_observer);
        game_info
    }

    fn bind_observer(
        game_info: Rc<RefCell<Self>>,
        puzzle_event_observer: EventObserver<PuzzleEvent>,
    ) {
        let subscription = {
            let game_info = game_info.clone();
            puzzle_event_observer.subscribe(move |event| {
                game_info
                    .borrow_mut()
                    .handle_puzzle_event(game_info.clone(), event);
            })
        };
        game_info.borrow_mut().puzzle_event_subscription = Some(subscription);
    }

    fn handle_puzzle_event(&mut self, game_info: Rc<RefCell<Self>>, event: &PuzzleEvent) {
        match event {
            PuzzleEvent::TimerStateChanged(timer_state) => {
                self.update_timer_state(game_info, timer_state);
            }
            PuzzleEvent::RotationCountChanged(rotations) => {
                self.turns_label.set_text(&format!("{}", rotations));
            }
            PuzzleEvent::PuzzleSolved(stats) => {
                self.show_solved_banner(stats);
            }
            PuzzleEvent::BoardShuffled(_) => {
                self.solved_banner.set_visible(false);
            }
            _ => {}
        }
    }

    fn update_timer_state(&mut self, game_info: Rc<RefCell<Self>>, new_timer_state: &TimerState) {
        self.timer_state = new_timer_state.clone();
        GameInfoUI::update_timer_label(&self.timer_label, &self.timer_state);
        if self.timer_state.is_ended() {
            self.stop_timer_label_handler();
        } else {
            self.start_timer_label_handler(game_info);
        }
    }

    fn show_solved_banner(&self, stats: &SolveStats) {
        self.solved_banner.set_text(&format!(
            "🎉 {} {} {}",
            t!("picture-solved-in"),
            stats.solve_time.as_secs(),
            t!("seconds-short")
        ));
        self.solved_banner.set_visible(true);
    }

    fn stop_timer_label_handler(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.remove();
        }
    }

    fn start_timer_label_handler(&mut self, game_info: Rc<RefCell<Self>>) {
        // Already ticking? Do nothing.
        if self.timer.is_none() {
            let game_info_weak = Rc::downgrade(&game_info);
            let timer = glib::timeout_add_local(Duration::from_secs(1), move || {
                if let Some(game_info) = game_info_weak.upgrade() {
                    let game_info = game_info.borrow();
                    GameInfoUI::update_timer_label(&game_info.timer_label, &game_info.timer_state);
                    glib::ControlFlow::Continue
                } else {
                    glib::ControlFlow::Break
                }
            });
            self.timer = Some(timer);
        }
    }

    fn update_timer_label(timer_label: &Label, timer_state: &TimerState) {
        let elapsed = timer_state.elapsed_seconds();
        timer_label.set_text(&format!("⏱ {:02}:{:02}", elapsed / 60, elapsed % 60));
    }
}

impl Drop for GameInfoUI {
    fn drop(&mut self) {
        log::trace!(target: "game_info_ui", "Dropping GameInfoUI");
        if let Some(timer) = self.timer.take() {
            timer.remove();
        }
    }
}
