use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use fluent_i18n::t;
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Button, FileDialog, FileFilter};
use log::{trace, warn};

use crate::events::EventEmitter;
use crate::game::settings::Settings;
use crate::model::{GlobalEvent, PuzzleCommand};

use super::image_set::ImageSet;

/// The "open image" control. A successful decode replaces the current
/// session: the sliced image is broadcast and a new shuffle is requested.
/// Cancelling the dialog, or picking a file that does not decode, changes
/// nothing.
pub struct ImagePickerUI {
    pub button: Button,
    window: Rc<ApplicationWindow>,
    settings: Rc<RefCell<Settings>>,
    command_emitter: EventEmitter<PuzzleCommand>,
    global_event_emitter: EventEmitter<GlobalEvent>,
}

impl ImagePickerUI {
    pub fn new(
        window: &Rc<ApplicationWindow>,
        settings: Rc<RefCell<Settings>>,
        command_emitter: EventEmitter<PuzzleCommand>,
        global_event_emitter: EventEmitter<GlobalEvent>,
    ) -> Rc<RefCell<Self>> {
        let button = Button::with_label(&t!("open-image"));
        button.set_tooltip_text(Some(&t!("open-image-tooltip")));

        let image_picker_ui = Rc::new(RefCell::new(Self {
            button: button.clone(),
            window: Rc::clone(window),
            settings,
            command_emitter,
            global_event_emitter,
        }));

        {
            let image_picker_ui = Rc::downgrade(&image_picker_ui);
            button.connect_clicked(move |_| {
                if let Some(image_picker_ui) = image_picker_ui.upgrade() {
                    image_picker_ui.borrow().open_dialog();
                }
            });
        }

        image_picker_ui
    }

    pub fn open_dialog(&self) {
        let filter = FileFilter::new();
        filter.add_pixbuf_formats();
        filter.set_name(Some(&t!("image-files")));

        let filters = gio::ListStore::new::<FileFilter>();
        filters.append(&filter);

        let dialog = FileDialog::builder()
            .title(t!("open-image"))
            .modal(true)
            .filters(&filters)
            .default_filter(&filter)
            .build();

        if let Some(folder) = &self.settings.borrow().last_image_folder {
            dialog.set_initial_folder(Some(&gio::File::for_path(folder)));
        }

        let settings = Rc::clone(&self.settings);
        let command_emitter = self.command_emitter.clone();
        let global_event_emitter = self.global_event_emitter.clone();
        dialog.open(
            Some(self.window.as_ref()),
            gio::Cancellable::NONE,
            move |result| match result {
                Ok(file) => {
                    let Some(path) = file.path() else {
                        warn!(target: "image_picker_ui", "Selected file has no local path");
                        return;
                    };
                    ImagePickerUI::load_image(
                        &path,
                        &settings,
                        &global_event_emitter,
                        &command_emitter,
                    );
                }
                Err(err) => {
                    trace!(target: "image_picker_ui", "Image selection dismissed: {}", err);
                }
            },
        );
    }

    fn load_image(
        path: &Path,
        settings: &Rc<RefCell<Settings>>,
        global_event_emitter: &EventEmitter<GlobalEvent>,
        command_emitter: &EventEmitter<PuzzleCommand>,
    ) {
        match ImageSet::from_file(path) {
            Ok(image_set) => {
                {
                    let mut settings = settings.borrow_mut();
                    settings.last_image_folder = path.parent().map(Path::to_path_buf);
                    let _ = settings.save();
                }
                trace!(target: "image_picker_ui", "Loaded {:?}", image_set);
                global_event_emitter.emit(GlobalEvent::ImageLoaded(Rc::new(image_set)));
                // The image is decoded and sliced at this point, so the board
                // can shuffle immediately.
                command_emitter.emit(PuzzleCommand::NewPuzzle);
            }
            Err(err) => {
                warn!(target: "image_picker_ui", "Could not load {:?}: {}", path, err);
            }
        }
    }
}
