//! Argument parsing and the trajectory command's output.

use approx::assert_relative_eq;
use clap::Parser;
use gradviz::cli::{simulate, Cli, Commands, ObjectiveName};
use gradviz_render::{export::OutputFormat, figures::Figure};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn test_render_arguments() {
    let cli = Cli::try_parse_from([
        "gradviz",
        "-vv",
        "render",
        "rosenbrock",
        "pca",
        "-o",
        "charts",
        "-f",
        "png,svg,pdf",
    ])
    .unwrap();

    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Render {
            figures,
            all,
            output,
            formats,
        } => {
            assert_eq!(figures, vec![Figure::Rosenbrock, Figure::Pca]);
            assert!(!all);
            assert_eq!(output, Some(PathBuf::from("charts")));
            assert_eq!(formats, vec![OutputFormat::Png, OutputFormat::Svg, OutputFormat::Pdf]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_render_rejects_unknown_names_and_formats() {
    assert!(Cli::try_parse_from(["gradviz", "render", "histogram"]).is_err());
    assert!(Cli::try_parse_from(["gradviz", "render", "--all", "-f", "eps"]).is_err());
    assert!(Cli::try_parse_from(["gradviz", "render", "--all", "pca"]).is_err());
}

#[test]
fn test_trajectory_arguments_accept_negative_starts() {
    let cli = Cli::try_parse_from([
        "gradviz",
        "trajectory",
        "--objective",
        "elongated-bowl",
        "--start",
        "-3.5,1.8",
        "--learning-rate",
        "0.3",
        "--iterations",
        "6",
        "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Trajectory {
            objective,
            start,
            learning_rate,
            iterations,
            json,
        } => {
            assert_eq!(objective, ObjectiveName::ElongatedBowl);
            assert_eq!(start, vec![-3.5, 1.8]);
            assert_relative_eq!(learning_rate, 0.3);
            assert_eq!(iterations, 6);
            assert!(json);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_objective_names() {
    let names: Vec<String> = [
        ObjectiveName::Parabola,
        ObjectiveName::CosineWell,
        ObjectiveName::RipplingBowl,
        ObjectiveName::TwoBasin,
    ]
    .into_iter()
    .map(ObjectiveName::name)
    .collect();
    assert_eq!(names, vec!["parabola", "cosine-well", "rippling-bowl", "two-basin"]);
}

#[test]
fn test_simulate_parabola() {
    let report = simulate(ObjectiveName::Parabola, &[3.8], 0.15, 5).unwrap();

    assert_eq!(report.objective, "parabola");
    assert_eq!(report.iterations, 5);
    assert_eq!(report.points.len(), 6);
    assert_eq!(report.points[0], vec![3.8]);
    assert_relative_eq!(report.points[5][0], 3.8 * 0.7_f64.powi(5), epsilon = 1e-12);
    assert_relative_eq!(report.values[1], 2.66 * 2.66, epsilon = 1e-12);
    assert!(!report.diverged());

    let table = report.table();
    assert_eq!(table.lines().count(), 7);
    assert!(table.lines().next().unwrap().contains("f(x)"));
}

#[test]
fn test_simulate_reports_divergence() {
    let report = simulate(ObjectiveName::Parabola, &[3.0], 1.05, 20).unwrap();
    assert!(report.diverged());
    assert!(report.points[20][0].abs() > 3.0);
}

#[test]
fn test_simulate_checks_dimension() {
    assert!(simulate(ObjectiveName::Rosenbrock, &[1.0], 0.001, 10).is_err());
    assert!(simulate(ObjectiveName::Parabola, &[1.0], -0.1, 10).is_err());
}

#[test]
fn test_trajectory_json_layout() {
    let report = simulate(ObjectiveName::TwoBasin, &[0.0, 0.0], 0.1, 3).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["objective"], "two-basin");
    assert_eq!(value["points"][0], serde_json::json!([0.0, 0.0]));
    assert_eq!(value["values"].as_array().map(Vec::len), Some(4));
}
