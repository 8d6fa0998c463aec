use kurbo::{BezPath, Circle, Point, Rect, Shape};

const PATH_TOLERANCE: f64 = 0.05;

pub const OUTER_RADIUS_RATIO: f64 = 0.4;
pub const INNER_RADIUS_RATIO: f64 = 0.08;
pub const MARK_RING_RATIO: f64 = 0.7;
pub const MARK_COUNT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn is_inside(&self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

/// A path plus the rule used to decide which pixels it covers.
#[derive(Debug, Clone)]
pub struct ClipRegion {
    path: BezPath,
    rule: FillRule,
    bounds: Rect,
}

impl ClipRegion {
    pub fn new(path: BezPath, rule: FillRule) -> Self {
        let bounds = path.bounding_box();
        Self { path, rule, bounds }
    }

    /// Outer circle minus inner circle. Both subpaths wind the same way, so
    /// the hole only exists under [`FillRule::EvenOdd`].
    pub fn annulus(center: Point, outer_radius: f64, inner_radius: f64) -> Self {
        Self::new(two_circles(center, outer_radius, inner_radius), FillRule::EvenOdd)
    }

    pub fn with_rule(mut self, rule: FillRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> FillRule {
        self.rule
    }

    pub fn contains(&self, pt: Point) -> bool {
        if !self.bounds.contains(pt) {
            return false;
        }
        self.rule.is_inside(self.path.winding(pt))
    }

    /// Coverage test for the center of pixel `(x, y)`.
    pub fn covers_pixel(&self, x: u32, y: u32) -> bool {
        self.contains(pixel_center(x, y))
    }
}

fn two_circles(center: Point, outer_radius: f64, inner_radius: f64) -> BezPath {
    let mut path = Circle::new(center, outer_radius).to_path(PATH_TOLERANCE);
    path.extend(Circle::new(center, inner_radius).path_elements(PATH_TOLERANCE));
    path
}

pub fn pixel_center(x: u32, y: u32) -> Point {
    Point::new(x as f64 + 0.5, y as f64 + 0.5)
}

/// Radii and center of the disc for a square surface of side `size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscGeometry {
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl DiscGeometry {
    pub fn for_size(size: u32) -> Self {
        let side = size as f64;
        Self {
            center: Point::new(side / 2.0, side / 2.0),
            outer_radius: side * OUTER_RADIUS_RATIO,
            inner_radius: side * INNER_RADIUS_RATIO,
        }
    }

    pub fn annulus(&self) -> ClipRegion {
        ClipRegion::annulus(self.center, self.outer_radius, self.inner_radius)
    }

    pub fn outer_circle(&self) -> Circle {
        Circle::new(self.center, self.outer_radius)
    }

    pub fn inner_circle(&self) -> Circle {
        Circle::new(self.center, self.inner_radius)
    }

    /// Centers of the texture marks, evenly spaced on `0.7 * outer_radius`.
    pub fn mark_centers(&self) -> Vec<Point> {
        let ring = self.outer_radius * MARK_RING_RATIO;
        (0..MARK_COUNT)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / MARK_COUNT as f64;
                Point::new(
                    self.center.x + ring * angle.cos(),
                    self.center.y + ring * angle.sin(),
                )
            })
            .collect()
    }
}
