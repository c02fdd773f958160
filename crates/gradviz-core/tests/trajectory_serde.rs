//! JSON form of trajectories, as printed by `gradviz trajectory --json`.

#![cfg(feature = "serde")]

use gradviz_core::{
    objectives::Parabola,
    simulator::{GradientDescent, Trajectory},
    types::{point, Point},
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_trajectory_json_layout() {
    let descent = GradientDescent::new(0.25, 2).unwrap();
    let trajectory = descent.run(|x: &Point| x * 2.0, point(&[4.0])).unwrap();

    let value = serde_json::to_value(&trajectory).unwrap();
    assert_eq!(value["learning_rate"], json!(0.25));
    assert_eq!(value["points"].as_array().map(Vec::len), Some(3));
    // Values are only present when an objective was evaluated.
    assert!(value.get("values").is_none());
}

#[test]
fn test_recorded_values_survive_json() {
    let descent = GradientDescent::new(0.25, 3).unwrap();
    let trajectory = descent.simulate(&Parabola::unit(), point(&[4.0])).unwrap();

    let text = serde_json::to_string(&trajectory).unwrap();
    let parsed: Trajectory = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.values(), Some(&[16.0, 4.0, 1.0, 0.25][..]));
    assert_eq!(parsed, trajectory);
}

#[test]
fn test_rejects_trajectory_without_points() {
    let err = serde_json::from_str::<Trajectory>(r#"{"learning_rate":0.1,"points":[]}"#)
        .unwrap_err();
    assert!(err.to_string().contains("start point"), "{err}");
}

#[test]
fn test_rejects_value_count_mismatch() {
    let descent = GradientDescent::new(0.25, 2).unwrap();
    let trajectory = descent.simulate(&Parabola::unit(), point(&[4.0])).unwrap();

    let mut value = serde_json::to_value(&trajectory).unwrap();
    value["values"] = json!([16.0, 4.0]);
    let err = serde_json::from_value::<Trajectory>(value).unwrap_err();
    assert!(err.to_string().contains("2 values recorded for 3 points"), "{err}");
}

#[test]
fn test_rejects_mixed_dimensions_and_bad_learning_rate() {
    let two_d = GradientDescent::new(0.25, 1)
        .unwrap()
        .run(|x: &Point| x * 2.0, point(&[4.0, 1.0]))
        .unwrap();
    let one_d = GradientDescent::new(0.25, 1)
        .unwrap()
        .run(|x: &Point| x * 2.0, point(&[4.0]))
        .unwrap();

    let mut mixed = serde_json::to_value(&two_d).unwrap();
    mixed["points"][1] = serde_json::to_value(&one_d).unwrap()["points"][1].clone();
    assert!(serde_json::from_value::<Trajectory>(mixed).is_err());

    let mut negative = serde_json::to_value(&one_d).unwrap();
    negative["learning_rate"] = json!(-0.25);
    assert!(serde_json::from_value::<Trajectory>(negative).is_err());
}
