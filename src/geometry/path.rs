//! `Path`: an ordered sequence of vertices, optionally carrying per-vertex
//! arc information, per spec.md §3.1.

use serde::{Deserialize, Serialize};

use super::units::{Angle, Length, PositiveLength, Point, MAX_ARC_TOLERANCE_NM};

/// A single point on a [`Path`], plus the arc angle from this vertex to the
/// next one (`0` means a straight segment).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point,
    pub angle: Angle,
}

impl Vertex {
    #[must_use]
    pub const fn straight(position: Point) -> Self {
        Self {
            position,
            angle: Angle::zero(),
        }
    }

    #[must_use]
    pub const fn arc(position: Point, angle: Angle) -> Self {
        Self { position, angle }
    }
}

/// An ordered sequence of vertices. Closed iff the first and last vertex
/// share a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Path(pub Vec<Vertex>);

impl Path {
    #[must_use]
    pub const fn new(vertices: Vec<Vertex>) -> Self {
        Self(vertices)
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.0
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(a), Some(b)) if self.0.len() > 1 => a.position == b.position,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_curved(&self) -> bool {
        self.0.iter().any(|v| !v.angle.is_zero())
    }

    /// Duplicates the first vertex onto the end if the path is not already
    /// closed.
    #[must_use]
    pub fn to_closed_path(&self) -> Self {
        if self.is_closed() || self.0.is_empty() {
            return self.clone();
        }
        let mut vertices = self.0.clone();
        let mut first = vertices[0];
        first.angle = Angle::zero();
        vertices.push(first);
        Self(vertices)
    }

    #[must_use]
    pub fn translated(&self, dx: Length, dy: Length) -> Self {
        Self(
            self.0
                .iter()
                .map(|v| Vertex {
                    position: v.position.translated(dx, dy),
                    angle: v.angle,
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn rotated(&self, angle: Angle) -> Self {
        Self(
            self.0
                .iter()
                .map(|v| Vertex {
                    position: v.position.rotated(angle),
                    angle: v.angle,
                })
                .collect(),
        )
    }

    /// Mirrors about the Y axis (flips X), negating arc angles to preserve
    /// winding, matching the board's top/bottom mirror convention.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|v| Vertex {
                    position: v.position.mirrored(false),
                    angle: -v.angle,
                })
                .collect(),
        )
    }

    /// Flattens every arc segment to straight lines within `tolerance`,
    /// returning a path with only zero-angle vertices. Duplicate vertices
    /// produced at segment joins are dropped.
    #[must_use]
    pub fn flattened(&self, tolerance: PositiveLength) -> Self {
        if self.0.len() < 2 {
            return self.clone();
        }
        let mut out: Vec<Point> = Vec::with_capacity(self.0.len());
        for window in self.0.windows(2) {
            let from = window[0];
            let to = window[1].position;
            if out.last() != Some(&from.position) {
                out.push(from.position);
            }
            if from.angle.is_zero() {
                out.push(to);
            } else {
                let arc = flat_arc(from.position, to, from.angle, tolerance);
                for p in arc.into_iter().skip(1) {
                    out.push(p);
                }
            }
        }
        Self(out.into_iter().map(Vertex::straight).collect())
    }

    /// Minkowski sum of this path with a centered circle of `width`,
    /// producing the (possibly open) outline of a stroke of that width.
    /// For a closed path this returns the outer and inner offset contours;
    /// for an open path it returns a single closed "sausage" outline.
    #[must_use]
    pub fn to_outline_strokes(&self, width: PositiveLength) -> Vec<Path> {
        let flat = self.flattened(PositiveLength::new(MAX_ARC_TOLERANCE_NM).unwrap());
        let pts = &flat.0;
        if pts.len() < 2 {
            if let Some(v) = pts.first() {
                return vec![circle_path(width, v.position)];
            }
            return Vec::new();
        }
        let radius = width.get() as f64 / 2.0;
        let mut left = Vec::new();
        let mut right = Vec::new();
        for seg in pts.windows(2) {
            let (a, b) = (seg[0].position, seg[1].position);
            let dx = (b.x - a.x) as f64;
            let dy = (b.y - a.y) as f64;
            let len = dx.hypot(dy).max(1.0);
            let nx = -dy / len * radius;
            let ny = dx / len * radius;
            left.push(Point::new((a.x as f64 + nx).round() as Length, (a.y as f64 + ny).round() as Length));
            left.push(Point::new((b.x as f64 + nx).round() as Length, (b.y as f64 + ny).round() as Length));
            right.push(Point::new((a.x as f64 - nx).round() as Length, (a.y as f64 - ny).round() as Length));
            right.push(Point::new((b.x as f64 - nx).round() as Length, (b.y as f64 - ny).round() as Length));
        }
        right.reverse();
        let mut outline = left;
        outline.extend(right);
        if let Some(first) = outline.first().copied() {
            outline.push(first);
        }
        vec![Self(outline.into_iter().map(Vertex::straight).collect())]
    }

    // -- Construction helpers (spec.md §3.1) --

    #[must_use]
    pub fn circle(diameter: PositiveLength) -> Self {
        circle_path(diameter, Point::origin())
    }

    #[must_use]
    pub fn centered_rect(width: Length, height: Length, corner_radius: Length) -> Self {
        if corner_radius <= 0 {
            let (hw, hh) = (width / 2, height / 2);
            return Self(
                vec![
                    Point::new(-hw, -hh),
                    Point::new(hw, -hh),
                    Point::new(hw, hh),
                    Point::new(-hw, hh),
                    Point::new(-hw, -hh),
                ]
                .into_iter()
                .map(Vertex::straight)
                .collect(),
            );
        }
        rounded_rect_path(width, height, corner_radius, 4)
    }

    #[must_use]
    pub fn octagon(width: Length, height: Length, corner_cut: Length) -> Self {
        let (hw, hh) = (width / 2, height / 2);
        let c = corner_cut.min(hw.min(hh));
        Self(
            vec![
                Point::new(-hw + c, -hh),
                Point::new(hw - c, -hh),
                Point::new(hw, -hh + c),
                Point::new(hw, hh - c),
                Point::new(hw - c, hh),
                Point::new(-hw + c, hh),
                Point::new(-hw, hh - c),
                Point::new(-hw, -hh + c),
                Point::new(-hw + c, -hh),
            ]
            .into_iter()
            .map(Vertex::straight)
            .collect(),
        )
    }

    /// An open, straight two-point path between `p1` and `p2`. Callers stroke
    /// it with [`Path::to_outline_strokes`] at `width` to get an obround.
    #[must_use]
    pub fn obround(p1: Point, p2: Point, _width: Length) -> Self {
        Self(vec![Vertex::straight(p1), Vertex::straight(p2)])
    }

    /// Flattens a single arc from `from` to `to` subtending `angle`.
    #[must_use]
    pub fn flat_arc(from: Point, to: Point, angle: Angle, tolerance: PositiveLength) -> Vec<Point> {
        flat_arc(from, to, angle, tolerance)
    }
}

fn circle_path(diameter: PositiveLength, center: Point) -> Path {
    let r = diameter.get() / 2;
    Path(vec![
        Vertex::arc(Point::new(center.x + r, center.y), Angle::from_microdegrees(180_000_000)),
        Vertex::arc(Point::new(center.x - r, center.y), Angle::from_microdegrees(180_000_000)),
        Vertex::straight(Point::new(center.x + r, center.y)),
    ])
}

fn rounded_rect_path(width: Length, height: Length, radius: Length, _segments_hint: u32) -> Path {
    let (hw, hh) = (width / 2, height / 2);
    let r = radius.min(hw).min(hh);
    let quarter = Angle::from_microdegrees(90_000_000);
    Path(vec![
        Vertex::straight(Point::new(-hw + r, -hh)),
        Vertex::arc(Point::new(hw - r, -hh), Angle::zero()),
        Vertex::arc(Point::new(hw, -hh + r), quarter),
        Vertex::straight(Point::new(hw, hh - r)),
        Vertex::arc(Point::new(hw - r, hh), quarter),
        Vertex::straight(Point::new(-hw + r, hh)),
        Vertex::arc(Point::new(-hw, hh - r), quarter),
        Vertex::straight(Point::new(-hw, -hh + r)),
        Vertex::arc(Point::new(-hw + r, -hh), quarter),
    ])
}

/// Flattens an arc into a polyline whose maximum chord error stays within
/// `tolerance`, using the sagitta formula: for a chord of length `c` and
/// included angle `theta`, the radius is `r = c / (2 * sin(theta/2))`, and a
/// single segment's sagitta error is bounded by `r * (1 - cos(half_step))`.
/// The arc is subdivided until that error is within tolerance.
fn flat_arc(from: Point, to: Point, angle: Angle, tolerance: PositiveLength) -> Vec<Point> {
    let theta = angle.radians();
    if theta.abs() < 1e-9 {
        return vec![from, to];
    }
    let chord = from.distance_to(to);
    if chord < 1.0 {
        return vec![from, to];
    }
    let radius = (chord / 2.0) / (theta.abs() / 2.0).sin();
    let tol = tolerance.get() as f64;
    let max_step = if tol >= radius {
        theta.abs()
    } else {
        2.0 * (1.0 - tol / radius).acos()
    };
    let segments = (theta.abs() / max_step).ceil().max(1.0) as u32;

    // Center of the arc: offset from the chord midpoint along its normal.
    let mx = (from.x + to.x) as f64 / 2.0;
    let my = (from.y + to.y) as f64 / 2.0;
    let dx = (to.x - from.x) as f64;
    let dy = (to.y - from.y) as f64;
    let half_chord = chord / 2.0;
    let h = (radius * radius - half_chord * half_chord).max(0.0).sqrt();
    let (nx, ny) = (-dy / chord, dx / chord);
    let sign = if theta > 0.0 { 1.0 } else { -1.0 };
    let (cx, cy) = (mx + sign * nx * h, my + sign * ny * h);

    let start_angle = (from.y as f64 - cy).atan2(from.x as f64 - cx);
    let step = theta / segments as f64;
    let mut points = Vec::with_capacity(segments as usize + 1);
    points.push(from);
    for i in 1..segments {
        let a = start_angle + step * i as f64;
        points.push(Point::new(
            (cx + radius * a.cos()).round() as Length,
            (cy + radius * a.sin()).round() as Length,
        ));
    }
    points.push(to);
    points
}

/// A [`Path`] guaranteed to have at least one vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonEmptyPath(Path);

impl NonEmptyPath {
    #[must_use]
    pub fn new(path: Path) -> Option<Self> {
        (!path.0.is_empty()).then_some(Self(path))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    #[must_use]
    pub fn into_path(self) -> Path {
        self.0
    }
}
