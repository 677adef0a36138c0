use gdk_pixbuf::Pixbuf;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::model::{GRID_SIZE, TILE_COUNT};

pub const TILE_PIXEL_SIZE: i32 = 100;
pub const BOARD_PIXEL_SIZE: i32 = TILE_PIXEL_SIZE * GRID_SIZE as i32;

/// The source image sliced into nine tile-sized pixbufs, one per tile id.
pub struct ImageSet {
    source_path: PathBuf,
    tiles: Vec<Rc<Pixbuf>>,
}

impl ImageSet {
    /// Decodes the image at `path`, scales it to the square board size
    /// (aspect ratio is not preserved, the board is always square) and cuts
    /// it into tile-sized sub-pixbufs in id order.
    pub fn from_file(path: &Path) -> Result<Self, glib::Error> {
        let scaled = Pixbuf::from_file_at_scale(path, BOARD_PIXEL_SIZE, BOARD_PIXEL_SIZE, false)?;
        let tiles = (0..TILE_COUNT)
            .map(|id| {
                let col = (id % GRID_SIZE) as i32;
                let row = (id / GRID_SIZE) as i32;
                Rc::new(scaled.new_subpixbuf(
                    col * TILE_PIXEL_SIZE,
                    row * TILE_PIXEL_SIZE,
                    TILE_PIXEL_SIZE,
                    TILE_PIXEL_SIZE,
                ))
            })
            .collect();
        Ok(Self {
            source_path: path.to_path_buf(),
            tiles,
        })
    }

    pub fn tile(&self, id: usize) -> Option<Rc<Pixbuf>> {
        self.tiles.get(id).map(Rc::clone)
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

impl std::fmt::Debug for ImageSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ImageSet({:?}, {} tiles)",
            self.source_path,
            self.tiles.len()
        )
    }
}
