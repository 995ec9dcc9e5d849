//! Named colors a system file can refer to.

use std::collections::HashMap;
use tracing::warn;

pub const YELLOW: u32 = 0xFFFF00;
pub const LIGHTBLUE: u32 = 0x53D0F1;

lazy_static! {
    static ref COLORS: HashMap<&'static str, u32> = {
        let mut h = HashMap::new();
        h.insert("WHITE", 0xFFFFFF);
        h.insert("BLACK", 0x000000);
        h.insert("DARKGREY", 0x141414);
        h.insert("PASTEL_BLUE", 0x6446C8);
        h.insert("PURPLE", 0xC02898);
        h.insert("PINK", 0xE65470);
        h.insert("PASTEL_YELLOW", 0xE2C96E);
        h.insert("KAKI", 0x9C9A28);
        h.insert("PASTEL_GREEN", 0x007C35);
        h.insert("TURQUOISE", 0x00B09C);
        h.insert("LIGHTBLUE", LIGHTBLUE);
        h.insert("YELLOW", YELLOW);
        h.insert("RED", 0xFF0000);
        h.insert("GREEN", 0x00FF00);
        h.insert("BLUE", 0x0000FF);
        h
    };
}

/// Look up a color by name, ignoring case.
pub fn color_named(name: &str) -> Option<u32> {
    COLORS.get(name.to_uppercase().as_str()).copied()
}

/// The color for an optional name. Missing names get `fallback`;
/// names nobody has heard of get light blue.
pub fn resolve(name: Option<&str>, fallback: u32) -> u32 {
    match name {
        None => fallback,
        Some(name) => color_named(name).unwrap_or_else(|| {
            warn!(color = name, "unknown color, using LIGHTBLUE");
            LIGHTBLUE
        }),
    }
}
