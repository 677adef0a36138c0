use std::cell::RefCell;
use std::rc::Rc;

use gdk_pixbuf::Pixbuf;
use gtk4::cairo;
use gtk4::gdk::prelude::GdkCairoContextExt;
use gtk4::gdk::FrameClock;
use gtk4::prelude::*;
use gtk4::{DrawingArea, Frame, GestureClick, TickCallbackId};
use log::{trace, warn};

use crate::destroyable::Destroyable;
use crate::events::EventEmitter;
use crate::model::{PuzzleCommand, FULL_TURN};

use super::image_set::TILE_PIXEL_SIZE;

/// A quarter turn plays out over 300 ms.
const ROTATION_DEG_PER_SEC: f64 = 300.0;

/// One clickable tile of the board. Draws its slice of the source image
/// rotated by the animated angle; clicking it asks the engine for a quarter
/// turn.
pub struct TileCellUI {
    pub frame: Frame,
    area: DrawingArea,
    tile_id: usize,
    pixbuf: Option<Rc<Pixbuf>>,
    /// Angle currently drawn, in degrees.
    shown_angle: f64,
    /// Angle the animation is heading to. Accumulates past 360 so a rotation
    /// always animates forward, never the shorter path backwards.
    target_angle: f64,
    tick_callback: Option<TickCallbackId>,
    last_frame_time: Option<i64>,
    gesture_click: Option<GestureClick>,
    command_emitter: EventEmitter<PuzzleCommand>,
}

impl TileCellUI {
    pub fn new(
        tile_id: usize,
        command_emitter: EventEmitter<PuzzleCommand>,
    ) -> Rc<RefCell<Self>> {
        let frame = Frame::new(None);
        frame.set_css_classes(&["tile-frame"]);

        let area = DrawingArea::new();
        area.set_content_width(TILE_PIXEL_SIZE);
        area.set_content_height(TILE_PIXEL_SIZE);
        frame.set_child(Some(&area));

        let cell_ui = Rc::new(RefCell::new(Self {
            frame,
            area: area.clone(),
            tile_id,
            pixbuf: None,
            shown_angle: 0.0,
            target_angle: 0.0,
            tick_callback: None,
            last_frame_time: None,
            gesture_click: None,
            command_emitter,
        }));

        {
            let cell_ui = Rc::downgrade(&cell_ui);
            area.set_draw_func(move |_, ctx, width, height| {
                if let Some(cell_ui) = cell_ui.upgrade() {
                    cell_ui.borrow().draw(ctx, width, height);
                }
            });
        }

        TileCellUI::register_click_handler(cell_ui.clone());
        cell_ui
    }

    fn register_click_handler(cell_ui: Rc<RefCell<Self>>) {
        let cell_ui_borrowed = cell_ui.borrow();
        let tile_id = cell_ui_borrowed.tile_id;
        let command_emitter = cell_ui_borrowed.command_emitter.clone();
        drop(cell_ui_borrowed);

        let gesture_click = GestureClick::new();
        gesture_click.set_button(1);
        gesture_click.connect_pressed(move |_gesture, _, _, _| {
            command_emitter.emit(PuzzleCommand::RotateTile(tile_id));
        });

        let mut cell_ui_borrowed = cell_ui.borrow_mut();
        cell_ui_borrowed.frame.add_controller(gesture_click.clone());
        cell_ui_borrowed.gesture_click = Some(gesture_click);
    }

    fn draw(&self, ctx: &cairo::Context, width: i32, height: i32) {
        let Some(pixbuf) = &self.pixbuf else {
            return;
        };
        ctx.translate(width as f64 / 2.0, height as f64 / 2.0);
        ctx.rotate(self.shown_angle.to_radians());
        ctx.set_source_pixbuf(
            pixbuf,
            -(pixbuf.width() as f64) / 2.0,
            -(pixbuf.height() as f64) / 2.0,
        );
        if let Err(err) = ctx.paint() {
            warn!(target: "tile_cell_ui", "Failed to paint tile {}: {}", self.tile_id, err);
        }
    }

    pub fn set_image(&mut self, pixbuf: Rc<Pixbuf>) {
        self.pixbuf = Some(pixbuf);
        self.area.queue_draw();
    }

    /// Jumps straight to `rotation` with no animation; used when the whole
    /// board is re-randomized.
    pub fn snap_to(&mut self, rotation: u16) {
        if let Some(tick_callback) = self.tick_callback.take() {
            tick_callback.remove();
        }
        self.last_frame_time = None;
        self.shown_angle = rotation as f64;
        self.target_angle = rotation as f64;
        self.area.queue_draw();
    }

    /// Advances the animation target by `degrees`; the frame-clock callback
    /// eases the shown angle after it.
    pub fn animate_forward(cell_ui: &Rc<RefCell<Self>>, degrees: f64) {
        let mut cell = cell_ui.borrow_mut();
        cell.target_angle += degrees;

        if cell.tick_callback.is_some() {
            // Animation already running; it picks up the new target.
            return;
        }

        let cell_ui_weak = Rc::downgrade(cell_ui);
        let tick_callback = cell.area.add_tick_callback(move |_area, frame_clock| {
            match cell_ui_weak.upgrade() {
                Some(cell_ui) => cell_ui.borrow_mut().step_animation(frame_clock),
                None => glib::ControlFlow::Break,
            }
        });
        cell.tick_callback = Some(tick_callback);
    }

    fn step_animation(&mut self, frame_clock: &FrameClock) -> glib::ControlFlow {
        let now = frame_clock.frame_time();
        let dt = self
            .last_frame_time
            .map(|last| (now - last) as f64 / 1_000_000.0)
            .unwrap_or(0.0);
        self.last_frame_time = Some(now);

        self.shown_angle = (self.shown_angle + ROTATION_DEG_PER_SEC * dt).min(self.target_angle);
        self.area.queue_draw();

        if self.shown_angle >= self.target_angle {
            // Normalize between animations so the angles stay bounded.
            self.shown_angle = self.shown_angle.rem_euclid(FULL_TURN as f64);
            self.target_angle = self.shown_angle;
            self.last_frame_time = None;
            self.tick_callback = None;
            glib::ControlFlow::Break
        } else {
            glib::ControlFlow::Continue
        }
    }

    pub fn set_interactive(&self, interactive: bool) {
        let cursor = if interactive { "pointer" } else { "default" };
        self.area.set_cursor_from_name(Some(cursor));
    }
}

impl Drop for TileCellUI {
    fn drop(&mut self) {
        trace!(target: "tile_cell_ui", "Dropping cell UI {}", self.tile_id);
        self.frame.unparent();
    }
}

impl Destroyable for TileCellUI {
    fn destroy(&mut self) {
        trace!(target: "tile_cell_ui", "Destroying cell UI {}", self.tile_id);
        if let Some(gesture_click) = self.gesture_click.take() {
            self.frame.remove_controller(&gesture_click);
        }
        if let Some(tick_callback) = self.tick_callback.take() {
            tick_callback.remove();
        }
    }
}
