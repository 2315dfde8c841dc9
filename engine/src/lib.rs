//! Headless UI plumbing: geometry, rate-limited resize listeners, a render tree and a CPU
//! rasteriser for it.

pub mod geometry;
pub mod raster;
pub mod resize;
pub mod throttle;
pub mod ui;
pub mod view_tree;

pub use geometry::{ClientRect, ScrollOffset, Viewport};
pub use resize::{ListenerId, ResizeListeners};
pub use throttle::Throttle;
