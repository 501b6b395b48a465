// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for the grid wall model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest absolute grid coordinate a wall endpoint may take. Keeps every
/// length, offset and area computed from wall coordinates inside `i32`.
pub const COORD_LIMIT: i32 = 1 << 24;

/// A grid intersection, in cell units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, which is the wall length between two points on a
    /// shared axis. Saturates at `i32::MAX`.
    pub fn manhattan_to(&self, other: &Point) -> i32 {
        let dx = (i64::from(other.x) - i64::from(self.x)).abs();
        let dy = (i64::from(other.y) - i64::from(self.y)).abs();
        i32::try_from(dx + dy).unwrap_or(i32::MAX)
    }

    /// True when both coordinates are within [`COORD_LIMIT`]
    pub fn in_range(&self) -> bool {
        let range = -COORD_LIMIT..=COORD_LIMIT;
        range.contains(&self.x) && range.contains(&self.y)
    }
}

/// Axis of a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn other(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Unvalidated line between two grid points.
///
/// Used for previews, suggestion candidates and insertion input. Only
/// segments that pass [`Segment::line`] may become walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Segment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_points(start: Point, end: Point) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Axis of the segment, `None` for zero-length, diagonal or off-grid
    /// lines
    pub fn orientation(&self) -> Option<Orientation> {
        if !(self.start().in_range() && self.end().in_range()) {
            None
        } else if self.y1 == self.y2 && self.x1 != self.x2 {
            Some(Orientation::Horizontal)
        } else if self.x1 == self.x2 && self.y1 != self.y2 {
            Some(Orientation::Vertical)
        } else {
            None
        }
    }

    pub fn length(&self) -> i32 {
        self.start().manhattan_to(&self.end())
    }

    /// Footprint on the segment's infinite line
    pub fn line(&self) -> Option<WallLine> {
        match self.orientation()? {
            Orientation::Horizontal => Some(WallLine {
                orientation: Orientation::Horizontal,
                offset: self.y1,
                start: self.x1.min(self.x2),
                end: self.x1.max(self.x2),
            }),
            Orientation::Vertical => Some(WallLine {
                orientation: Orientation::Vertical,
                offset: self.x1,
                start: self.y1.min(self.y2),
                end: self.y1.max(self.y2),
            }),
        }
    }

    /// Same segment with endpoints ordered left-to-right or top-to-bottom
    pub fn normalized(&self) -> Segment {
        let (a, b) = (self.start(), self.end());
        if (self.x1 == self.x2 && self.y1 > self.y2) || (self.y1 == self.y2 && self.x1 > self.x2) {
            Segment::from_points(b, a)
        } else {
            Segment::from_points(a, b)
        }
    }

    /// Direction-independent identity, e.g. `"0,0-4,0"`
    pub fn key(&self) -> String {
        let n = self.normalized();
        format!("{},{}-{},{}", n.x1, n.y1, n.x2, n.y2)
    }
}

/// A wall's 1-D interval on its `(orientation, offset)` line. `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallLine {
    pub orientation: Orientation,
    /// Constant coordinate: `y` for horizontal lines, `x` for vertical ones
    pub offset: i32,
    pub start: i32,
    pub end: i32,
}

impl WallLine {
    pub fn length(&self) -> i32 {
        self.end - self.start
    }

    /// True when both lines lie on the same infinite line
    pub fn shares_line(&self, other: &WallLine) -> bool {
        self.orientation == other.orientation && self.offset == other.offset
    }

    /// Segment covering `[start, end]` on this line
    pub fn segment(&self, start: i32, end: i32) -> Segment {
        match self.orientation {
            Orientation::Horizontal => Segment::new(start, self.offset, end, self.offset),
            Orientation::Vertical => Segment::new(self.offset, start, self.offset, end),
        }
    }
}

/// Kind of opening hosted by a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

impl OpeningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpeningKind::Door => "door",
            OpeningKind::Window => "window",
        }
    }
}

impl std::str::FromStr for OpeningKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "door" => Ok(OpeningKind::Door),
            "window" => Ok(OpeningKind::Window),
            other => Err(Error::Config(format!("unknown opening kind '{}'", other))),
        }
    }
}

/// Door or window attached to a wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: OpeningKind,
    /// Fractional center along the wall, measured from `(x1, y1)`
    pub position: f64,
    pub length_cells: f64,
    pub width_units: f64,
    pub height_units: f64,
    pub area: f64,
}

impl Feature {
    /// Span along a wall of length `wall_length`, in cells from the wall start
    pub fn span_cells(&self, wall_length: f64) -> (f64, f64) {
        let center = self.position * wall_length;
        let half = self.length_cells / 2.0;
        (center - half, center + half)
    }
}

/// Stored wall: axis-aligned, non-zero length, owning its openings.
///
/// Construction validates geometry, so a `Wall` value is never diagonal or
/// degenerate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WallRecord")]
pub struct Wall {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct WallRecord {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    #[serde(default)]
    features: Vec<Feature>,
}

impl TryFrom<WallRecord> for Wall {
    type Error = Error;

    fn try_from(record: WallRecord) -> Result<Self> {
        let mut wall = Wall::from_segment(Segment::new(record.x1, record.y1, record.x2, record.y2))?;
        wall.features = record.features;
        Ok(wall)
    }
}

impl Wall {
    /// Validated wall between two grid points
    pub fn new(start: Point, end: Point) -> Result<Self> {
        Self::from_segment(Segment::from_points(start, end))
    }

    pub fn from_segment(segment: Segment) -> Result<Self> {
        if segment.orientation().is_none() {
            return Err(Error::InvalidGeometry);
        }
        Ok(Self {
            x1: segment.x1,
            y1: segment.y1,
            x2: segment.x2,
            y2: segment.y2,
            features: Vec::new(),
        })
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.x1, self.y1, self.x2, self.y2)
    }

    pub fn orientation(&self) -> Orientation {
        if self.y1 == self.y2 {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    pub fn length(&self) -> i32 {
        self.start().manhattan_to(&self.end())
    }

    pub fn line(&self) -> WallLine {
        let (orientation, offset, a, b) = match self.orientation() {
            Orientation::Horizontal => (Orientation::Horizontal, self.y1, self.x1, self.x2),
            Orientation::Vertical => (Orientation::Vertical, self.x1, self.y1, self.y2),
        };
        WallLine {
            orientation,
            offset,
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Coordinate along the wall axis: `x` for horizontal, `y` for vertical
    pub fn axis_coord(&self, point: Point) -> i32 {
        match self.orientation() {
            Orientation::Horizontal => point.x,
            Orientation::Vertical => point.y,
        }
    }

    /// +1 when the wall runs toward increasing axis coordinates, -1 otherwise
    pub fn direction(&self) -> i32 {
        let delta = self.axis_coord(self.end()) - self.axis_coord(self.start());
        delta.signum()
    }

    /// Distance from `(x1, y1)` to an absolute axis coordinate
    pub fn param_of(&self, axis: f64) -> f64 {
        (axis - self.axis_coord(self.start()) as f64) * self.direction() as f64
    }

    /// Absolute axis coordinate at distance `t` from `(x1, y1)`
    pub fn axis_at(&self, t: i32) -> i32 {
        self.axis_coord(self.start()) + t * self.direction()
    }

    /// Piece of this wall between distances `t0 < t1` from the start,
    /// keeping the start-to-end direction. Features are not carried over.
    pub fn sub_wall(&self, t0: i32, t1: i32) -> Result<Wall> {
        let (a, b) = (self.axis_at(t0), self.axis_at(t1));
        let segment = match self.orientation() {
            Orientation::Horizontal => Segment::new(a, self.y1, b, self.y1),
            Orientation::Vertical => Segment::new(self.x1, a, self.x1, b),
        };
        Wall::from_segment(segment)
    }

    /// Copy moved by whole cells, features preserved. Fails with
    /// [`Error::InvalidGeometry`] when the copy would leave the grid.
    pub fn translated(&self, dx: i32, dy: i32) -> Result<Wall> {
        let shift = |c: i32, d: i32| c.checked_add(d).ok_or(Error::InvalidGeometry);
        let segment = Segment::new(
            shift(self.x1, dx)?,
            shift(self.y1, dy)?,
            shift(self.x2, dx)?,
            shift(self.y2, dy)?,
        );
        Ok(Wall::from_segment(segment)?.with_features(self.features.clone()))
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub(crate) fn features_mut(&mut self) -> &mut Vec<Feature> {
        &mut self.features
    }

    pub(crate) fn set_endpoints(&mut self, start: Point, end: Point) -> Result<()> {
        let candidate = Segment::from_points(start, end);
        if candidate.orientation() != Some(self.orientation()) {
            return Err(Error::InvalidGeometry);
        }
        self.x1 = start.x;
        self.y1 = start.y;
        self.x2 = end.x;
        self.y2 = end.y;
        Ok(())
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Wall {
        self.features = features;
        self
    }
}
