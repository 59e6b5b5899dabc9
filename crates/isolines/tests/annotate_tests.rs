//! Tests for label placement along isolines.

use isolines::{
    AnnotationConfig, Annotator, GridField, IsolineBuilder, IsolineCollection, LevelLine, Point,
    Rect,
};
use test_utils::{assert_approx_eq, assert_coords_approx_eq, create_linear_ramp_grid};

fn polyline(points: &[(f64, f64)], level: f64) -> LevelLine {
    let mut line = LevelLine::new(Point::new(points[0].0, points[0].1), level, 0.5);
    line.other_points = points[1..].iter().map(|&(x, y)| Point::new(x, y)).collect();
    line
}

fn collection_of(lines: Vec<LevelLine>) -> IsolineCollection {
    let mut collection = IsolineCollection::new(0.0, 100.0);
    for line in lines {
        collection.push(line);
    }
    collection
}

fn everywhere() -> Rect {
    Rect::new(-1000.0, -1000.0, 2000.0, 2000.0)
}

#[test]
fn test_straight_line_anchors_every_spacing() {
    let collection = collection_of(vec![polyline(&[(0.0, 0.0), (10.0, 0.0)], 42.0)]);
    let labels = Annotator::with_spacing(3.0).annotate(&collection, everywhere());

    assert_eq!(labels.len(), 3);
    for (label, x) in labels.iter().zip([3.0, 6.0, 9.0]) {
        assert_coords_approx_eq!((label.position.x, label.position.y), (x, 0.0), 1e-9);
        assert_approx_eq!(label.rotation, 0.0, 1e-9);
        assert_eq!(label.value, 42.0);
    }
}

#[test]
fn test_split_segments_give_same_anchors() {
    let points: Vec<(f64, f64)> = (0..=10).map(|x| (x as f64, 0.0)).collect();
    let collection = collection_of(vec![polyline(&points, 1.0)]);
    let labels = Annotator::with_spacing(3.0).annotate(&collection, everywhere());

    let xs: Vec<f64> = labels.iter().map(|l| l.position.x).collect();
    assert_eq!(xs.len(), 3);
    assert_approx_eq!(xs[0], 3.0, 1e-9);
    assert_approx_eq!(xs[1], 6.0, 1e-9);
    assert_approx_eq!(xs[2], 9.0, 1e-9);
}

#[test]
fn test_rotation_follows_segment_direction() {
    let collection = collection_of(vec![polyline(&[(0.0, 0.0), (4.0, 4.0)], 1.0)]);
    let labels = Annotator::with_spacing(2.0).annotate(&collection, everywhere());

    assert_eq!(labels.len(), 2);
    for label in &labels {
        assert_approx_eq!(label.rotation, 45.0, 1e-9);
    }
}

#[test]
fn test_anchor_on_vertex_averages_directions() {
    let collection = collection_of(vec![polyline(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)], 1.0)]);
    let labels = Annotator::with_spacing(3.0).annotate(&collection, everywhere());

    assert_eq!(labels.len(), 2);
    assert_coords_approx_eq!((labels[0].position.x, labels[0].position.y), (3.0, 0.0), 1e-9);
    assert_approx_eq!(labels[0].rotation, 45.0, 1e-9);
    assert_coords_approx_eq!((labels[1].position.x, labels[1].position.y), (3.0, 3.0), 1e-9);
    assert_approx_eq!(labels[1].rotation, 90.0, 1e-9);
}

#[test]
fn test_keep_upright_flips_reversed_lines() {
    let collection = collection_of(vec![polyline(&[(10.0, 0.0), (0.0, 0.0)], 1.0)]);

    let plain = Annotator::with_spacing(5.0).annotate(&collection, everywhere());
    assert_approx_eq!(plain[0].rotation.abs(), 180.0, 1e-9);

    let upright = Annotator::new(AnnotationConfig {
        way_before_text: 5.0,
        keep_upright: true,
    })
    .annotate(&collection, everywhere());
    assert_approx_eq!(upright[0].rotation, 0.0, 1e-9);
}

#[test]
fn test_visible_rect_filters_anchors() {
    let collection = collection_of(vec![polyline(&[(0.0, 0.0), (10.0, 0.0)], 1.0)]);
    let labels = Annotator::with_spacing(3.0).annotate(&collection, Rect::new(0.0, -1.0, 5.0, 2.0));

    assert_eq!(labels.len(), 1);
    assert_approx_eq!(labels[0].position.x, 3.0, 1e-9);
}

#[test]
fn test_short_line_gets_no_label() {
    let collection = collection_of(vec![polyline(&[(0.0, 0.0), (2.0, 0.0)], 1.0)]);
    let labels = Annotator::with_spacing(3.0).annotate(&collection, everywhere());
    assert!(labels.is_empty());
}

#[test]
fn test_empty_collection_has_no_labels() {
    let labels = Annotator::default().annotate(&IsolineCollection::default(), everywhere());
    assert!(labels.is_empty());
}

#[test]
fn test_non_positive_spacing_has_no_labels() {
    let collection = collection_of(vec![polyline(&[(0.0, 0.0), (10.0, 0.0)], 1.0)]);
    assert!(Annotator::with_spacing(0.0)
        .annotate(&collection, everywhere())
        .is_empty());
    assert!(Annotator::with_spacing(-1.0)
        .annotate(&collection, everywhere())
        .is_empty());
}

#[test]
fn test_annotates_traced_field() {
    let field = GridField::new(4, 11, create_linear_ramp_grid(4, 11)).unwrap();
    let collection = IsolineBuilder::new()
        .with_data_source(&field)
        .build_isolines_for_levels(&[0.5, 2.5])
        .unwrap();
    let labels = Annotator::default().annotate(&collection, everywhere());

    // Each vertical line is 10 units long, so one label lands on its end.
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].value, 0.5);
    assert_eq!(labels[1].value, 2.5);
    for label in &labels {
        assert_approx_eq!(label.rotation.abs(), 90.0, 1e-9);
    }
}
