//! Tests for BoundingBox parsing and containment.

use climate_common::bbox::{BboxParseError, BoundingBox};

// ============================================================================
// from_bbox_string tests
// ============================================================================

#[test]
fn test_parse_bbox_integer() {
    let bbox = BoundingBox::from_bbox_string("-121,34,-119,35").unwrap();
    assert_eq!(bbox.min_lon, -121.0);
    assert_eq!(bbox.min_lat, 34.0);
    assert_eq!(bbox.max_lon, -119.0);
    assert_eq!(bbox.max_lat, 35.0);
}

#[test]
fn test_parse_bbox_tolerates_spaces() {
    let bbox = BoundingBox::from_bbox_string(" -120.5, 34.0, -119.0, 35.0 ").unwrap();
    assert_eq!(bbox, BoundingBox::default());
}

#[test]
fn test_parse_bbox_too_few() {
    let result = BoundingBox::from_bbox_string("0,0,100");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_bbox_empty_string() {
    let result = BoundingBox::from_bbox_string("");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_bbox_invalid_number() {
    let result = BoundingBox::from_bbox_string("abc,0,100,100");
    assert!(matches!(result, Err(BboxParseError::InvalidNumber(_))));
}

#[test]
fn test_parse_bbox_inverted() {
    let result = BoundingBox::from_bbox_string("10,0,5,10");
    assert!(matches!(result, Err(BboxParseError::Inverted(_))));
}

#[test]
fn test_parse_bbox_nan() {
    let result = BoundingBox::from_bbox_string("NaN,0,5,10");
    assert!(matches!(result, Err(BboxParseError::NonFinite)));
}

#[test]
fn test_bbox_string_round_trip() {
    let bbox = BoundingBox::new(-120.25, 34.125, -119.5, 34.75);
    let parsed = BoundingBox::from_bbox_string(&bbox.to_bbox_string()).unwrap();
    assert_eq!(parsed, bbox);
}

// ============================================================================
// Containment tests
// ============================================================================

#[test]
fn test_contains_interior() {
    let bbox = BoundingBox::default();
    assert!(bbox.contains(34.4, -119.7));
}

#[test]
fn test_contains_every_edge() {
    let bbox = BoundingBox::from_ranges((34.3, 34.6), (-120.0, -119.4));
    assert!(bbox.contains(34.3, -119.7));
    assert!(bbox.contains(34.6, -119.7));
    assert!(bbox.contains(34.4, -120.0));
    assert!(bbox.contains(34.4, -119.4));
}

#[test]
fn test_degenerate_box_contains_its_point() {
    let bbox = BoundingBox::new(-119.7, 34.4, -119.7, 34.4);
    assert!(bbox.validate().is_ok());
    assert!(bbox.contains(34.4, -119.7));
    assert!(!bbox.contains(34.4, -119.6));
}

#[test]
fn test_nan_point_is_outside() {
    let bbox = BoundingBox::default();
    assert!(!bbox.contains(f64::NAN, -119.7));
    assert!(!bbox.contains(34.4, f64::NAN));
}
