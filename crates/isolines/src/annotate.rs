//! Label anchors along traced isolines.

use crate::collection::{IsolineCollection, LevelLine};
use crate::config::AnnotationConfig;
use crate::field::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Where to draw a level label and how to orient it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsolineTextLabel {
    pub position: Point,
    /// Direction of the line at `position`, in degrees.
    pub rotation: f64,
    pub value: f64,
}

/// Places labels at a fixed arclength interval along every line.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    config: AnnotationConfig,
}

impl Annotator {
    pub fn new(config: AnnotationConfig) -> Self {
        Self { config }
    }

    /// Annotator with the given spacing and default orientation handling.
    pub fn with_spacing(way_before_text: f64) -> Self {
        Self::new(AnnotationConfig {
            way_before_text,
            ..AnnotationConfig::default()
        })
    }

    pub fn way_before_text(&self) -> f64 {
        self.config.way_before_text
    }

    /// Label anchors for every line of `collection` that fall inside `visible`.
    pub fn annotate(&self, collection: &IsolineCollection, visible: Rect) -> Vec<IsolineTextLabel> {
        let spacing = self.config.way_before_text;
        if collection.is_empty() || !(spacing.is_finite() && spacing > 0.0) {
            return vec![];
        }

        let mut labels = Vec::new();
        for line in collection {
            self.annotate_line(line, spacing, visible, &mut labels);
        }
        labels
    }

    fn annotate_line(&self, line: &LevelLine, spacing: f64, visible: Rect, labels: &mut Vec<IsolineTextLabel>) {
        let points: Vec<Point> = line.points().copied().collect();
        let mut accumulated_length = 0.0;
        let mut next_label_at = spacing;

        for (i, pair) in points.windows(2).enumerate() {
            let (p1, p2) = (pair[0], pair[1]);
            let segment_length = p1.distance(p2);
            if segment_length == 0.0 {
                continue;
            }

            // Check if this segment contains our next label position
            while accumulated_length + segment_length >= next_label_at {
                let t = (next_label_at - accumulated_length) / segment_length;
                let position = p1.lerp(p2, t);

                let mut rotation = direction(p1, p2);
                if t >= 1.0 - 1e-9 {
                    if let Some(&p3) = points.get(i + 2) {
                        rotation = mean_angle(rotation, direction(p2, p3));
                    }
                }
                if self.config.keep_upright {
                    rotation = upright(rotation);
                }

                if visible.contains(position) {
                    labels.push(IsolineTextLabel {
                        position,
                        rotation,
                        value: line.real_value,
                    });
                }
                next_label_at += spacing;
            }

            accumulated_length += segment_length;
        }
    }
}

/// Direction from `a` to `b` in degrees, in (-180, 180].
fn direction(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Circular mean of two angles in degrees.
fn mean_angle(a: f64, b: f64) -> f64 {
    let (a, b) = (a.to_radians(), b.to_radians());
    (a.sin() + b.sin()).atan2(a.cos() + b.cos()).to_degrees()
}

/// Fold an angle into (-90, 90].
fn upright(angle: f64) -> f64 {
    if angle > 90.0 {
        angle - 180.0
    } else if angle <= -90.0 {
        angle + 180.0
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_angle_wraps() {
        assert!((mean_angle(0.0, 90.0) - 45.0).abs() < 1e-9);
        assert!((mean_angle(170.0, -170.0).abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_upright() {
        assert_eq!(upright(180.0), 0.0);
        assert_eq!(upright(-90.0), 90.0);
        assert_eq!(upright(45.0), 45.0);
        assert_eq!(upright(-135.0), 45.0);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 10.0, 5.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(10.0, 5.0)));
        assert!(!rect.contains(Point::new(10.1, 2.0)));
    }
}
