pub mod game_info_ui;
pub mod image_picker_ui;
pub mod image_set;
pub mod puzzle_grid_ui;
pub mod shuffle_button_ui;
pub mod tile_cell_ui;
pub mod window;

pub use image_set::ImageSet;
