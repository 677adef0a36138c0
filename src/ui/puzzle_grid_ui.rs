use gtk4::prelude::*;
use gtk4::{Grid, Label, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

use fluent_i18n::t;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{GlobalEvent, PuzzleCommand, PuzzleEvent, GRID_SIZE, ROTATION_STEP, TILE_COUNT};

use super::tile_cell_ui::TileCellUI;

/// The 3×3 board. Shows a placeholder until the first image arrives, then
/// keeps the nine [`TileCellUI`]s in sync with engine events.
pub struct PuzzleGridUI {
    pub container: gtk4::Box,
    grid: Grid,
    placeholder: Label,
    cells: Vec<Rc<RefCell<TileCellUI>>>,
    puzzle_event_subscription: Option<Unsubscriber<PuzzleEvent>>,
    global_subscription: Option<Unsubscriber<GlobalEvent>>,
}

impl Destroyable for PuzzleGridUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.puzzle_event_subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(subscription) = self.global_subscription.take() {
            subscription.unsubscribe();
        }
        for cell in &self.cells {
            cell.borrow_mut().destroy();
        }
        self.container.unparent();
    }
}

impl PuzzleGridUI {
    pub fn new(
        command_emitter: EventEmitter<PuzzleCommand>,
        puzzle_event_observer: EventObserver<PuzzleEvent>,
        global_event_observer: EventObserver<GlobalEvent>,
    ) -> Rc<RefCell<Self>> {
        let grid = Grid::new();
        grid.set_row_spacing(0);
        grid.set_column_spacing(0);
        grid.set_hexpand(false);
        grid.set_vexpand(false);
        grid.set_halign(gtk4::Align::Center);
        grid.set_css_classes(&["puzzle-board"]);
        grid.set_visible(false);

        let mut cells = vec![];
        for id in 0..TILE_COUNT {
            let cell_ui = TileCellUI::new(id, command_emitter.clone());
            let col = (id % GRID_SIZE) as i32;
            let row = (id / GRID_SIZE) as i32;
            grid.attach(&cell_ui.borrow().frame, col, row, 1, 1);
            cells.push(cell_ui);
        }

        let placeholder = Label::new(Some(&t!("open-an-image-to-start")));
        placeholder.set_css_classes(&["empty-state"]);
        placeholder.set_halign(gtk4::Align::Center);
        placeholder.set_valign(gtk4::Align::Center);
        placeholder.set_vexpand(true);

        let container = gtk4::Box::builder()
            .name("puzzle-box")
            .orientation(Orientation::Vertical)
            .build();
        container.append(&placeholder);
        container.append(&grid);

        let puzzle_grid_ui = Rc::new(RefCell::new(Self {
            container,
            grid,
            placeholder,
            cells,
            puzzle_event_subscription: None,
            global_subscription: None,
        }));

        Self::connect_observers(
            puzzle_grid_ui.clone(),
            puzzle_event_observer,
            global_event_observer,
        );

        puzzle_grid_ui
    }

    fn connect_observers(
        puzzle_grid_ui: Rc<RefCell<Self>>,
        puzzle_event_observer: EventObserver<PuzzleEvent>,
        global_event_observer: EventObserver<GlobalEvent>,
    ) {
        let puzzle_grid_ui_moved = puzzle_grid_ui.clone();
        let puzzle_event_subscription = puzzle_event_observer.subscribe(move |event| {
            let puzzle_grid_ui = puzzle_grid_ui_moved.borrow();
            match event {
                PuzzleEvent::BoardShuffled(board) => {
                    for tile in board.tiles() {
                        if let Some(cell) = puzzle_grid_ui.cells.get(tile.id) {
                            cell.borrow_mut().snap_to(tile.rotation);
                            cell.borrow().set_interactive(true);
                        }
                    }
                    puzzle_grid_ui.grid.remove_css_class("solved");
                }
                PuzzleEvent::TileRotated { id, .. } => {
                    if let Some(cell) = puzzle_grid_ui.cells.get(*id) {
                        TileCellUI::animate_forward(cell, ROTATION_STEP as f64);
                    }
                }
                PuzzleEvent::PuzzleSolved(_) => {
                    puzzle_grid_ui.grid.add_css_class("solved");
                    for cell in &puzzle_grid_ui.cells {
                        cell.borrow().set_interactive(false);
                    }
                }
                _ => {}
            }
        });

        let puzzle_grid_ui_moved = puzzle_grid_ui.clone();
        let global_subscription = global_event_observer.subscribe(move |event| match event {
            GlobalEvent::ImageLoaded(image_set) => {
                let puzzle_grid_ui = puzzle_grid_ui_moved.borrow();
                for (id, cell) in puzzle_grid_ui.cells.iter().enumerate() {
                    if let Some(pixbuf) = image_set.tile(id) {
                        cell.borrow_mut().set_image(pixbuf);
                    }
                }
                puzzle_grid_ui.placeholder.set_visible(false);
                puzzle_grid_ui.grid.set_visible(true);
            }
        });

        let mut puzzle_grid_ui = puzzle_grid_ui.borrow_mut();
        puzzle_grid_ui.puzzle_event_subscription = Some(puzzle_event_subscription);
        puzzle_grid_ui.global_subscription = Some(global_subscription);
    }
}
