//! Page furniture with behaviour worth keeping out of the markup.

pub mod chat;
pub mod nav;
pub mod playground;
pub mod reveal;
pub mod slideshow;
pub mod theme;
