//! Export planning and failure reporting.

use gradviz_render::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn test_default_plan_writes_both_formats_to_cwd() {
    let plan = ExportPlan::default();
    assert_eq!(plan.directory, std::path::PathBuf::from("."));
    assert_eq!(plan.formats, vec![OutputFormat::Svg, OutputFormat::Png]);
}

#[test]
fn test_every_figure_gets_distinct_paths() {
    let plan = ExportPlan::new("charts", OutputFormat::ALL);
    let mut paths: Vec<_> = Figure::ALL
        .iter()
        .flat_map(|&figure| OutputFormat::ALL.map(|format| plan.path_for(figure, format)))
        .collect();
    let total = paths.len();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), total);
    assert_eq!(total, Figure::ALL.len() * 3);
}

#[test]
fn test_unwritable_directory_is_reported_per_format() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the output directory should be.
    let blocker = dir.path().join("charts");
    fs::write(&blocker, b"not a directory").unwrap();

    let plan = ExportPlan::new(&blocker, OutputFormat::ALL);
    let report = export_figure(Figure::DescentSteps, &ChartStyle::default(), &plan);

    assert_eq!(report.figure, Figure::DescentSteps);
    assert_eq!(report.outcomes.len(), 3);
    assert!(!report.is_success());
    assert_eq!(report.written().count(), 0);
    for outcome in report.failures() {
        assert!(matches!(outcome.result, Err(RenderError::Io { .. })));
    }
}

#[test]
fn test_export_all_rejects_invalid_style_before_drawing() {
    let dir = tempfile::tempdir().unwrap();
    let mut style = ChartStyle::default();
    style.png_dpi = 0;

    let plan = ExportPlan::new(dir.path().join("out"), [OutputFormat::Png]);
    let result = export_all(&Figure::ALL, &style, &plan);

    assert!(matches!(result, Err(RenderError::InvalidStyle { .. })));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_pdf_export_writes_a_pdf_document() {
    let dir = tempfile::tempdir().unwrap();
    let style = ChartStyle {
        svg_dpi: 50,
        ..ChartStyle::default()
    };
    let plan = ExportPlan::new(dir.path(), ["pdf".parse::<OutputFormat>().unwrap()]);

    let paths = export_figure(Figure::CrossEntropy, &style, &plan)
        .into_result()
        .unwrap();
    assert_eq!(paths, vec![dir.path().join("binary_cross_entropy.pdf")]);
    let bytes = fs::read(&paths[0]).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    // No SVG is left next to it.
    assert!(!dir.path().join("binary_cross_entropy.svg").exists());
}
