//! Default series palette and the fixed UI colors of the dashboard widgets.

use vantage_core::Color;

/// Fallback colors for series and pie slices, assigned by ordinal index.
pub const PALETTE_HEX: [&str; 10] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#A4DE6C", "#8884D8", "#82CA9D", "#FF6B6B",
    "#6A6AD5", "#FFA600",
];

/// Number of palette entries.
pub const PALETTE_SIZE: usize = PALETTE_HEX.len();

/// Palette color for ordinal `index`, wrapping around: `palette[index % size]`.
#[must_use]
pub fn palette_color(index: usize) -> Color {
    hex(PALETTE_HEX[index % PALETTE_SIZE])
}

/// Parse a known-good hex literal.
pub(crate) fn hex(value: &str) -> Color {
    Color::from_hex(value).unwrap_or(Color::BLACK)
}

pub(crate) fn text_primary() -> Color {
    hex("#111827")
}

pub(crate) fn text_muted() -> Color {
    hex("#6b7280")
}

pub(crate) fn border() -> Color {
    hex("#e5e7eb")
}

pub(crate) fn grid_line() -> Color {
    hex("#eeeeee")
}

pub(crate) fn skeleton() -> Color {
    hex("#e5e7eb")
}

pub(crate) fn surface() -> Color {
    Color::WHITE
}

pub(crate) fn accent() -> Color {
    hex("#2563eb")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_palette_entries_parse() {
        for (i, value) in PALETTE_HEX.iter().enumerate() {
            assert!(Color::from_hex(value).is_ok(), "entry {i} ({value}) must parse");
        }
    }

    #[test]
    fn test_palette_first_entry() {
        assert_eq!(palette_color(0).to_hex(), "#0088fe");
        assert_eq!(palette_color(9).to_hex(), "#ffa600");
    }

    proptest! {
        #[test]
        fn prop_palette_wraps(index in 0usize..1000) {
            prop_assert_eq!(palette_color(index), palette_color(index % PALETTE_SIZE));
            prop_assert_eq!(palette_color(index + PALETTE_SIZE), palette_color(index));
        }
    }
}
