//! OLED Panel Graphics
//!
//! Line, rectangle, circle and icon rasterization, bitmap font glyph
//! decoding and text layout on top of any [`Canvas`], plus the
//! [`Graphics`] facade that binds a panel driver and a font.

pub mod font;
pub mod graphics;
pub mod primitives;
pub mod text;

pub use font::{Font, Glyph};
pub use graphics::Graphics;
pub use text::{Justify, Position, StringBound};

pub use oled_panel_hw::{Canvas, Display, Error, Result};
