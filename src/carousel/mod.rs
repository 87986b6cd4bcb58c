//! Carousel core: the per-row state machine and the root registry.
//!
//! - [`CarouselController`]: index/scroll/drag/settle state for one row
//! - [`CarouselRegistry`]: binds controllers to deck rows exactly once

mod controller;
mod registry;

pub use controller::{
    CarouselController, CarouselOptions, ControlState, MOUSE_DRAG_GAIN, PointerKind,
    SCROLL_SETTLE_MS,
};
pub use registry::CarouselRegistry;
