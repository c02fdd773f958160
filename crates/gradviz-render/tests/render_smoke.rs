//! Draws every figure to real files with the bundled font.

use gradviz_render::prelude::*;

fn small_style() -> ChartStyle {
    ChartStyle {
        png_dpi: 60,
        svg_dpi: 60,
        ..ChartStyle::presentation()
    }
}

#[test]
fn test_every_figure_renders_to_svg() {
    let dir = tempfile::tempdir().unwrap();
    let plan = ExportPlan::new(dir.path(), [OutputFormat::Svg]);

    let reports = export_all(&Figure::ALL, &small_style(), &plan).unwrap();
    assert_eq!(reports.len(), Figure::ALL.len());
    for report in reports {
        let figure = report.figure;
        let paths = report.into_result().unwrap_or_else(|e| panic!("{figure}: {e}"));
        let svg = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(svg.starts_with("<svg"), "{}", paths[0].display());
        assert!(svg.contains("Generated with Rust"), "{figure}");
    }
}

#[test]
fn test_unknown_font_family_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let style = ChartStyle {
        font_family: "Typeface Nobody Installed".to_string(),
        ..small_style()
    };
    let plan = ExportPlan::new(dir.path(), [OutputFormat::Svg, OutputFormat::Png]);

    let report = export_figure(Figure::DescentSteps, &style, &plan);
    assert!(report.is_success(), "{:?}", report.outcomes);
}

#[test]
fn test_png_has_style_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let style = small_style();
    let plan = ExportPlan::new(dir.path(), [OutputFormat::Png]);

    let paths = export_figure(Figure::LossSurface, &style, &plan)
        .into_result()
        .unwrap();
    let bytes = std::fs::read(&paths[0]).unwrap();
    // PNG signature, then the IHDR width and height.
    assert_eq!(&bytes[1..4], b"PNG");
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    assert_eq!((width, height), style.pixel_size(OutputFormat::Png));
}

#[test]
fn test_pdf_of_a_contour_figure() {
    let dir = tempfile::tempdir().unwrap();
    let plan = ExportPlan::new(dir.path(), [OutputFormat::Pdf]);

    let paths = export_figure(Figure::Rosenbrock, &small_style(), &plan)
        .into_result()
        .unwrap();
    let bytes = std::fs::read(&paths[0]).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}
