use std::rc::Rc;

use crate::ui::ImageSet;

/// Events that are not specific to any one component.
#[derive(Debug)]
pub enum GlobalEvent {
    /// A new source image was decoded and sliced into tiles.
    ImageLoaded(Rc<ImageSet>),
}
