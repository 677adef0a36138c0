use std::cell::RefCell;
use std::rc::Rc;

use fluent_i18n::t;
use gio::{Menu, SimpleAction};
use gtk4::gdk::Display;
use gtk4::{
    prelude::*, AboutDialog, Application, ApplicationWindow, CssProvider, HeaderBar, Label,
    License, MenuButton, Orientation, STYLE_PROVIDER_PRIORITY_APPLICATION,
};

use crate::destroyable::Destroyable;
use crate::events::Channel;
use crate::game::engine::PuzzleEngine;
use crate::game::settings::Settings;
use crate::model::{GlobalEvent, PuzzleCommand, PuzzleEvent};

use super::game_info_ui::GameInfoUI;
use super::image_picker_ui::ImagePickerUI;
use super::puzzle_grid_ui::PuzzleGridUI;
use super::shuffle_button_ui::ShuffleButtonUI;

pub fn build_ui(app: &Application) {
    let (command_emitter, command_observer) = Channel::<PuzzleCommand>::new();
    let (puzzle_event_emitter, puzzle_event_observer) = Channel::<PuzzleEvent>::new();
    let (global_event_emitter, global_event_observer) = Channel::<GlobalEvent>::new();

    let settings = Rc::new(RefCell::new(Settings::load()));

    let engine = PuzzleEngine::new(
        command_observer,
        puzzle_event_emitter.clone(),
        Settings::seed_from_env(),
    );

    let window = Rc::new(
        ApplicationWindow::builder()
            .application(app)
            .title(t!("app-title"))
            .resizable(false)
            .build(),
    );

    let provider = CssProvider::new();
    provider.load_from_string(include_str!("style.css"));
    gtk4::style_context_add_provider_for_display(
        &Display::default().expect("Could not connect to a display."),
        &provider,
        STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    // Keyboard shortcuts
    app.set_accels_for_action("win.open-image", &["<Control>o"]);
    app.set_accels_for_action("win.shuffle", &["<Control>r"]);

    let header_bar = HeaderBar::new();

    let image_picker_ui = ImagePickerUI::new(
        &window,
        settings.clone(),
        command_emitter.clone(),
        global_event_emitter.clone(),
    );
    header_bar.pack_start(&image_picker_ui.borrow().button);

    let game_info_ui = GameInfoUI::new(puzzle_event_observer.clone());
    let info_box = gtk4::Box::builder()
        .name("info-box")
        .orientation(Orientation::Horizontal)
        .spacing(10)
        .build();
    info_box.append(&game_info_ui.borrow().timer_label);
    let turns_caption = Label::new(Some(&t!("turns")));
    turns_caption.set_css_classes(&["turns-caption"]);
    info_box.append(&turns_caption);
    info_box.append(&game_info_ui.borrow().turns_label);
    header_bar.pack_start(&info_box);

    let menu = Menu::new();
    let open_label = t!("open-image");
    menu.append(Some(open_label.as_str()), Some("win.open-image"));
    let shuffle_label = t!("shuffle");
    menu.append(Some(shuffle_label.as_str()), Some("win.shuffle"));
    let about_label = t!("about");
    menu.append(Some(about_label.as_str()), Some("win.about"));

    let menu_button = MenuButton::builder()
        .icon_name("open-menu-symbolic")
        .menu_model(&menu)
        .build();
    header_bar.pack_end(&menu_button);

    window.set_titlebar(Some(&header_bar));

    let puzzle_grid_ui = PuzzleGridUI::new(
        command_emitter.clone(),
        puzzle_event_observer.clone(),
        global_event_observer.clone(),
    );
    let shuffle_button_ui =
        ShuffleButtonUI::new(command_emitter.clone(), puzzle_event_observer.clone());

    let content_box = gtk4::Box::builder()
        .name("content-box")
        .orientation(Orientation::Vertical)
        .spacing(12)
        .margin_top(16)
        .margin_bottom(16)
        .margin_start(16)
        .margin_end(16)
        .build();
    content_box.append(&game_info_ui.borrow().solved_banner);
    content_box.append(&puzzle_grid_ui.borrow().container);
    content_box.append(&shuffle_button_ui.borrow().button);

    window.set_child(Some(&content_box));
    window.present();

    let action_open = SimpleAction::new("open-image", None);
    {
        let image_picker_ui = image_picker_ui.clone();
        action_open.connect_activate(move |_, _| {
            image_picker_ui.borrow().open_dialog();
        });
    }
    window.add_action(&action_open);

    // Reshuffles an active session; the engine ignores it before the first
    // image is opened.
    let action_shuffle = SimpleAction::new("shuffle", None);
    let command_emitter_shuffle = command_emitter.clone();
    action_shuffle.connect_activate(move |_, _| {
        command_emitter_shuffle.emit(PuzzleCommand::Shuffle);
    });
    window.add_action(&action_shuffle);

    let action_about = SimpleAction::new("about", None);
    action_about.connect_activate(move |_, _| {
        let dialog = AboutDialog::builder()
            .program_name("PicTwist")
            .version(env!("CARGO_PKG_VERSION"))
            .comments(t!("about-comment"))
            .license_type(License::MitX11)
            .build();
        dialog.present();
    });
    window.add_action(&action_about);

    window.connect_close_request(move |_| {
        log::trace!(target: "window", "Tearing down window");
        engine.borrow_mut().destroy();
        game_info_ui.borrow_mut().destroy();
        puzzle_grid_ui.borrow_mut().destroy();
        shuffle_button_ui.borrow_mut().destroy();
        glib::signal::Propagation::Proceed
    });
}
