//! Attribution text in the bottom margin of every figure.

use crate::style::{Theme, WatermarkAnchor};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use std::error::Error;

/// Draws the style's watermark; an empty text draws nothing.
pub fn draw<DB>(area: &DrawingArea<DB, Shift>, theme: &Theme<'_>) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let watermark = &theme.style().watermark;
    if watermark.text.is_empty() {
        return Ok(());
    }

    let (width, height) = area.dim_in_pixel();
    let (x, y) = anchor_point(watermark.anchor, width, height, theme.px_i32(6.0));
    let h_pos = match watermark.anchor {
        WatermarkAnchor::BottomRight => HPos::Right,
        WatermarkAnchor::BottomCenter => HPos::Center,
    };
    let style = theme
        .font(watermark.size)
        .color(&watermark.color.rgb())
        .pos(Pos::new(h_pos, VPos::Bottom));

    area.draw(&Text::new(watermark.text.clone(), (x, y), style))?;
    Ok(())
}

/// Pixel position of the text anchor inside a `width` by `height` area.
fn anchor_point(anchor: WatermarkAnchor, width: u32, height: u32, padding: i32) -> (i32, i32) {
    let (width, height) = (width as i32, height as i32);
    match anchor {
        WatermarkAnchor::BottomRight => (width - padding, height - padding),
        WatermarkAnchor::BottomCenter => (width / 2, height - padding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_points() {
        assert_eq!(anchor_point(WatermarkAnchor::BottomRight, 1200, 675, 8), (1192, 667));
        assert_eq!(anchor_point(WatermarkAnchor::BottomCenter, 1200, 675, 8), (600, 667));
    }
}
