//! Tool and palette definitions for the board toolbar.

use crate::shapes::Color;
use serde::{Deserialize, Serialize};

/// Default pen stroke width, in surface units.
pub const PEN_WIDTH: f64 = 3.0;

/// The toolbar's fixed color palette: black, blue, red.
pub const PALETTE: [Color; 3] = [
    Color::new(0x00, 0x00, 0x00, 0xff),
    Color::new(0x21, 0x96, 0xf3, 0xff),
    Color::new(0xf4, 0x43, 0x36, 0xff),
];

/// Active board tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}
