//! Configuration file lookup and parsing.

use gradviz::config::{config_path, Config};
use gradviz_render::export::OutputFormat;
use pretty_assertions::assert_eq;
use std::{fs, path::PathBuf};

#[test]
fn test_defaults_without_a_file() {
    let config = Config::default();
    let plan = config.output.plan().unwrap();
    assert_eq!(plan.directory, PathBuf::from("."));
    assert_eq!(plan.formats, vec![OutputFormat::Svg, OutputFormat::Png]);
    assert_eq!(config.style.png_dpi, 300);
}

#[test]
fn test_file_overrides_only_what_it_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradviz.toml");
    fs::write(
        &path,
        r##"
[output]
directory = "slides/img"
formats = ["png"]

[style]
png_dpi = 200
grid_color = "#eeeeee"

[style.watermark]
text = "Course notes"
"##,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    let plan = config.output.plan().unwrap();
    assert_eq!(plan.directory, PathBuf::from("slides/img"));
    assert_eq!(plan.formats, vec![OutputFormat::Png]);
    assert_eq!(config.style.png_dpi, 200);
    assert_eq!(config.style.grid_color.to_string(), "#eeeeee");
    assert_eq!(config.style.watermark.text, "Course notes");
    assert_eq!(config.style.svg_dpi, 100);
}

#[test]
fn test_bad_values_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[output]\nformats = [\"gif\"]\n").unwrap();

    // Parses, but the format is rejected when planning.
    let config = Config::from_file(&path).unwrap();
    assert!(config.output.plan().is_err());

    fs::write(&path, "[style]\npng_dpi = \"high\"\n").unwrap();
    let error = Config::from_file(&path).unwrap_err();
    assert!(format!("{error:#}").contains("broken.toml"));

    let missing = dir.path().join("missing.toml");
    assert!(Config::from_file(&missing).is_err());
}

#[test]
fn test_lookup_order() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("gradviz.toml");
    let flag = PathBuf::from("flag.toml");
    let env = PathBuf::from("env.toml");

    assert_eq!(
        config_path(Some(flag.as_path()), Some(env.clone()), &local),
        Some(flag.clone())
    );
    assert_eq!(config_path(None, Some(env.clone()), &local), Some(env));
    assert_eq!(config_path(None, Some(PathBuf::new()), &local), None);
    assert_eq!(config_path(None, None, &local), None);

    fs::write(&local, "").unwrap();
    assert_eq!(config_path(None, None, &local), Some(local.clone()));
}
