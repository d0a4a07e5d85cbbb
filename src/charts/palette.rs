//! Colour palettes used by the chart renderers.

use serde::{Deserialize, Serialize, Serializer};

/// Opaque RGB colour. Serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Plotly default qualitative sequence
const PLOTLY: [Color; 10] = [
    Color::rgb(99, 110, 250),
    Color::rgb(239, 85, 59),
    Color::rgb(0, 204, 150),
    Color::rgb(171, 99, 250),
    Color::rgb(255, 161, 90),
    Color::rgb(25, 211, 243),
    Color::rgb(255, 102, 146),
    Color::rgb(182, 232, 128),
    Color::rgb(255, 151, 255),
    Color::rgb(254, 203, 82),
];

/// ColorBrewer Set1
const SET1: [Color; 9] = [
    Color::rgb(228, 26, 28),
    Color::rgb(55, 126, 184),
    Color::rgb(77, 175, 74),
    Color::rgb(152, 78, 163),
    Color::rgb(255, 127, 0),
    Color::rgb(255, 255, 51),
    Color::rgb(166, 86, 40),
    Color::rgb(247, 129, 191),
    Color::rgb(153, 153, 153),
];

/// ColorBrewer RdBu, dark red to dark blue
const RD_BU: [Color; 11] = [
    Color::rgb(103, 0, 31),
    Color::rgb(178, 24, 43),
    Color::rgb(214, 96, 77),
    Color::rgb(244, 165, 130),
    Color::rgb(253, 219, 199),
    Color::rgb(247, 247, 247),
    Color::rgb(209, 229, 240),
    Color::rgb(146, 197, 222),
    Color::rgb(67, 147, 195),
    Color::rgb(33, 102, 172),
    Color::rgb(5, 48, 97),
];

/// Named discrete colour sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    #[default]
    Plotly,
    Set1,
    RdBu,
}

impl Palette {
    pub fn colors(self) -> &'static [Color] {
        match self {
            Palette::Plotly => &PLOTLY,
            Palette::Set1 => &SET1,
            Palette::RdBu => &RD_BU,
        }
    }

    /// Colour for the n-th category, cycling through the sequence.
    pub fn color(self, index: usize) -> Color {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        assert_eq!(Palette::Set1.color(0), Palette::Set1.color(9));
        assert_eq!(Palette::RdBu.colors().len(), 11);
    }

    #[test]
    fn color_serializes_as_hex() {
        let json = serde_json::to_string(&Color::rgb(228, 26, 28)).expect("json");
        assert_eq!(json, "\"#e41a1c\"");
    }
}
