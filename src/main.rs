use gtk4::prelude::*;
use gtk4::Application;

use pictwist::ui;

const APP_ID: &str = "org.pictwist.PicTwist";

fn init_logging() {
    env_logger::init();
}

fn main() {
    init_logging();

    // Create a new application
    let app = Application::builder().application_id(APP_ID).build();

    // Connect to "activate" signal
    app.connect_activate(ui::window::build_ui);

    // Run the application
    app.run();
}
