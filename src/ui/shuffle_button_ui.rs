use std::cell::RefCell;
use std::rc::Rc;

use fluent_i18n::t;
use gtk4::prelude::*;
use gtk4::Button;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{PuzzleCommand, PuzzleEvent};

/// The "shuffle again" control. Only visible once the puzzle is solved.
pub struct ShuffleButtonUI {
    pub button: Button,
    puzzle_event_subscription: Option<Unsubscriber<PuzzleEvent>>,
}

impl Destroyable for ShuffleButtonUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.puzzle_event_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl ShuffleButtonUI {
    pub fn new(
        command_emitter: EventEmitter<PuzzleCommand>,
        puzzle_event_observer: EventObserver<PuzzleEvent>,
    ) -> Rc<RefCell<Self>> {
        let button = Button::with_label(&t!("shuffle-again"));
        button.set_css_classes(&["shuffle-button"]);
        button.set_halign(gtk4::Align::Center);
        button.set_visible(false);

        button.connect_clicked(move |_| {
            command_emitter.emit(PuzzleCommand::Shuffle);
        });

        let shuffle_button_ui = Rc::new(RefCell::new(Self {
            button,
            puzzle_event_subscription: None,
        }));

        let shuffle_button_ui_moved = shuffle_button_ui.clone();
        let subscription = puzzle_event_observer.subscribe(move |event| match event {
            PuzzleEvent::PuzzleSolved(_) => {
                shuffle_button_ui_moved.borrow().button.set_visible(true);
            }
            PuzzleEvent::BoardShuffled(_) => {
                shuffle_button_ui_moved.borrow().button.set_visible(false);
            }
            _ => {}
        });
        shuffle_button_ui.borrow_mut().puzzle_event_subscription = Some(subscription);

        shuffle_button_ui
    }
}
