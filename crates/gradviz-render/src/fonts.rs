//! The bundled typeface.
//!
//! Charts never depend on fonts installed on the host: DejaVu Sans ships
//! with the crate and is registered under whatever family the style names,
//! so text metrics are identical on every machine. The same bytes back the
//! font database used when converting SVG to PDF.

use crate::error::{RenderError, Result};
use plotters::style::{register_font, FontStyle};
use std::sync::{Arc, OnceLock};
use svg2pdf::usvg::fontdb;

/// DejaVu Sans, under the Bitstream Vera license in `assets/fonts`.
pub const DEJAVU_SANS: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Family name embedded in [`DEJAVU_SANS`].
pub const BUNDLED_FAMILY: &str = "DejaVu Sans";

/// Makes `family` resolve to the bundled face for every style.
///
/// Bold and italic text fall back to the regular face.
pub fn register(family: &str) -> Result<()> {
    register_font(family, FontStyle::Normal, DEJAVU_SANS)
        .map_err(|_| RenderError::invalid_style("font_family", "the bundled font could not be parsed"))
}

/// Font database for SVG text: system fonts, with the generic families
/// pointing at the bundled face.
pub(crate) fn database() -> Arc<fontdb::Database> {
    static DATABASE: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    DATABASE
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            db.load_font_data(DEJAVU_SANS.to_vec());
            db.set_sans_serif_family(BUNDLED_FAMILY);
            db.set_serif_family(BUNDLED_FAMILY);
            db.set_monospace_family(BUNDLED_FAMILY);
            Arc::new(db)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_font_is_a_truetype_file() {
        // TrueType outlines start with version 1.0.
        assert_eq!(&DEJAVU_SANS[..4], &[0, 1, 0, 0]);
        register("sans-serif").unwrap();
        register("Some Family Nobody Installed").unwrap();
    }

    #[test]
    fn test_database_knows_the_bundled_family() {
        let db = database();
        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..fontdb::Query::default()
        };
        let id = db.query(&query).unwrap();
        let face = db.face(id).unwrap();
        assert!(face.families.iter().any(|(name, _)| name == BUNDLED_FAMILY));
    }
}
