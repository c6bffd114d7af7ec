//! Markup rendering: HTML fragment builders and the region-addressed surface.

pub mod html;
pub mod surface;

pub use surface::{Region, RegionName, Surface};
