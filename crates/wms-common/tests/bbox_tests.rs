//! Tests for BoundingBox parsing from capabilities attributes and corners.

use wms_common::bbox::{BboxParseError, BoundingBox};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox.min_x, -180.0);
    assert_eq!(bbox.min_y, -90.0);
    assert_eq!(bbox.max_x, 180.0);
    assert_eq!(bbox.max_y, 90.0);
}

#[test]
fn test_bbox_copy() {
    let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let bbox2 = bbox1;
    assert_eq!(bbox1, bbox2);
}

#[test]
fn test_bbox_into_array() {
    let array: [f64; 4] = BoundingBox::new(1.0, 2.0, 3.0, 4.0).into();
    assert_eq!(array, [1.0, 2.0, 3.0, 4.0]);
}

// ============================================================================
// from_attributes tests
// ============================================================================

#[test]
fn test_attributes_integer() {
    let bbox = BoundingBox::from_attributes("0", "0", "100", "100").unwrap();
    assert_eq!(bbox.to_array(), [0.0, 0.0, 100.0, 100.0]);
}

#[test]
fn test_attributes_keep_exact_values() {
    let bbox = BoundingBox::from_attributes("2420000.0", "1030000.0", "2900000.0", "1350000.0")
        .unwrap();
    assert_eq!(bbox.min_x, 2420000.0);
    assert_eq!(bbox.max_y, 1350000.0);
}

#[test]
fn test_attributes_scientific_notation() {
    let bbox = BoundingBox::from_attributes("1e-6", "2e-6", "1e6", "2e6").unwrap();
    assert!((bbox.min_x - 1e-6).abs() < 1e-10);
    assert!((bbox.max_x - 1e6).abs() < 0.001);
}

#[test]
fn test_attributes_surrounding_whitespace() {
    let bbox = BoundingBox::from_attributes(" 5.96 ", "45.82", "10.49", "47.81 ").unwrap();
    assert_eq!(bbox.min_x, 5.96);
    assert_eq!(bbox.max_y, 47.81);
}

#[test]
fn test_attributes_invalid_number() {
    let result = BoundingBox::from_attributes("0", "abc", "100", "100");
    assert!(matches!(result, Err(BboxParseError::InvalidNumber(_))));
}

#[test]
fn test_attributes_empty_string() {
    let result = BoundingBox::from_attributes("", "0", "100", "100");
    assert!(matches!(result, Err(BboxParseError::InvalidNumber(_))));
}

// ============================================================================
// from_corners tests
// ============================================================================

#[test]
fn test_corners_web_mercator() {
    let bbox = BoundingBox::from_corners(
        "-20037508.3428 -20037508.3428",
        "20037508.3428 20037508.3428",
    )
    .unwrap();
    assert!((bbox.min_x - (-20037508.3428)).abs() < 0.01);
    assert!((bbox.max_y - 20037508.3428).abs() < 0.01);
}

#[test]
fn test_corners_multiple_spaces() {
    let bbox = BoundingBox::from_corners("5.96   45.82", "10.49\t47.81").unwrap();
    assert_eq!(bbox.to_array(), [5.96, 45.82, 10.49, 47.81]);
}

#[test]
fn test_corners_too_many_values() {
    let result = BoundingBox::from_corners("1 2 3", "4 5");
    assert!(matches!(result, Err(BboxParseError::InvalidCorner(_))));
}

// ============================================================================
// Dimension tests (width/height)
// ============================================================================

#[test]
fn test_bbox_width_height() {
    let bbox = BoundingBox::new(2485071.58, 1075346.31, 2828515.82, 1299941.79);
    assert!((bbox.width() - 343444.24).abs() < 0.001);
    assert!((bbox.height() - 224595.48).abs() < 0.001);
}

#[test]
fn test_bbox_is_finite() {
    assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_finite());
    assert!(!BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
    assert!(!BoundingBox::new(0.0, 0.0, f64::INFINITY, 1.0).is_finite());
}
