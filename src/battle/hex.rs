//! Hex coordinate system for battle maps
//!
//! Units live on offset (row, col) coordinates in "odd-r" layout: odd rows are
//! shifted half a hex to the right. All distance and neighbor math is done in
//! cube coordinates (q + r + s == 0), and pixels only exist at the layout
//! boundary for renderers and facing geometry.

use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Offset hex coordinate (row, col) identifying a map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub row: i32,
    pub col: i32,
}

impl HexCoord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Convert to cube coordinates (odd-r)
    pub fn to_cube(self) -> CubeCoord {
        let q = self.col - (self.row - (self.row & 1)) / 2;
        CubeCoord::from_axial(q, self.row)
    }

    /// Minimum number of single-hex steps between two cells
    pub fn distance(&self, other: &Self) -> u32 {
        self.to_cube().distance(&other.to_cube())
    }

    /// All six neighbors, unbounded, in `HexDirection::all()` order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        self.to_cube().neighbors().map(CubeCoord::to_offset)
    }

    /// Neighbor in a single direction
    pub fn neighbor(&self, direction: HexDirection) -> HexCoord {
        self.to_cube().neighbor(direction).to_offset()
    }
}

/// Cube hex coordinate. Never stored on game objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CubeCoord {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl CubeCoord {
    /// Build from axial (q, r); s is derived
    pub fn from_axial(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Convert back to offset coordinates (odd-r)
    pub fn to_offset(self) -> HexCoord {
        let col = self.q + (self.r - (self.r & 1)) / 2;
        HexCoord::new(self.r, col)
    }

    pub fn is_valid(&self) -> bool {
        self.q + self.r + self.s == 0
    }

    /// Steps from the origin
    pub fn length(&self) -> u32 {
        ((self.q.abs() + self.r.abs() + self.s.abs()) / 2) as u32
    }

    /// Manhattan distance in cube space
    pub fn distance(&self, other: &Self) -> u32 {
        (*self - *other).length()
    }

    pub fn neighbor(&self, direction: HexDirection) -> CubeCoord {
        *self + direction.offset()
    }

    /// Get all 6 neighboring cube coordinates
    pub fn neighbors(&self) -> [CubeCoord; 6] {
        HexDirection::all().map(|direction| self.neighbor(direction))
    }

    /// Hexes on the straight line from self to other (inclusive).
    ///
    /// Endpoints are nudged off exact edges so ties round consistently.
    pub fn line_to(&self, other: &Self) -> Vec<CubeCoord> {
        let n = self.distance(other);
        let a = FractionalCube::new(
            self.q as f64 + 1e-6,
            self.r as f64 + 1e-6,
            self.s as f64 - 2e-6,
        );
        let b = FractionalCube::new(
            other.q as f64 + 1e-6,
            other.r as f64 + 1e-6,
            other.s as f64 - 2e-6,
        );
        let step = 1.0 / n.max(1) as f64;

        (0..=n)
            .map(|i| a.lerp(&b, step * i as f64).round())
            .collect()
    }

    /// Get all hexes within range (inclusive)
    pub fn hexes_in_range(&self, range: u32) -> Vec<CubeCoord> {
        let range = range as i32;
        let mut results = Vec::new();
        for dq in -range..=range {
            for dr in (-range).max(-dq - range)..=range.min(-dq + range) {
                results.push(*self + CubeCoord::from_axial(dq, dr));
            }
        }
        results
    }
}

impl std::ops::Add for CubeCoord {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            q: self.q + rhs.q,
            r: self.r + rhs.r,
            s: self.s + rhs.s,
        }
    }
}

impl std::ops::Sub for CubeCoord {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            q: self.q - rhs.q,
            r: self.r - rhs.r,
            s: self.s - rhs.s,
        }
    }
}

/// Fractional cube coordinate produced by pixel picking and interpolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionalCube {
    pub q: f64,
    pub r: f64,
    pub s: f64,
}

impl FractionalCube {
    pub fn new(q: f64, r: f64, s: f64) -> Self {
        Self { q, r, s }
    }

    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            self.q + (other.q - self.q) * t,
            self.r + (other.r - self.r) * t,
            self.s + (other.s - self.s) * t,
        )
    }

    /// Round to the nearest integer cube.
    ///
    /// The component with the largest rounding error is recomputed from the
    /// other two so the result always satisfies q + r + s == 0.
    pub fn round(&self) -> CubeCoord {
        let mut q = self.q.round();
        let mut r = self.r.round();
        let mut s = self.s.round();

        let q_diff = (q - self.q).abs();
        let r_diff = (r - self.r).abs();
        let s_diff = (s - self.s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            q = -r - s;
        } else if r_diff > s_diff {
            r = -q - s;
        } else {
            s = -q - r;
        }

        CubeCoord {
            q: q as i32,
            r: r as i32,
            s: s as i32,
        }
    }
}

/// 2D pixel-space point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Forward/backward matrices for one hex orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub f0: f64,
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    /// In multiples of 60 degrees
    pub start_angle: f64,
}

impl Orientation {
    pub const POINTY: Orientation = Orientation {
        f0: SQRT_3,
        f1: SQRT_3 / 2.0,
        f2: 0.0,
        f3: 3.0 / 2.0,
        b0: SQRT_3 / 3.0,
        b1: -1.0 / 3.0,
        b2: 0.0,
        b3: 2.0 / 3.0,
        start_angle: 0.5,
    };
}

/// Pixel layout: orientation, hex size and screen origin.
///
/// Pure input to the conversions below; holds no state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexLayout {
    pub orientation: Orientation,
    pub size: Point,
    pub origin: Point,
}

impl HexLayout {
    /// Pointy-top layout with camera zoom applied to the hex size
    pub fn pointy(hex_size: f64, origin: Point, zoom: f64) -> Self {
        let size = hex_size * zoom;
        Self {
            orientation: Orientation::POINTY,
            size: Point::new(size, size),
            origin,
        }
    }

    /// Pointy-top layout with unit hex size at the origin, used for
    /// resolution-independent geometry such as attack arcs
    pub fn unit() -> Self {
        Self::pointy(1.0, Point::default(), 1.0)
    }

    pub fn cube_to_pixel(&self, hex: CubeCoord) -> Point {
        let m = &self.orientation;
        let x = (m.f0 * hex.q as f64 + m.f1 * hex.r as f64) * self.size.x;
        let y = (m.f2 * hex.q as f64 + m.f3 * hex.r as f64) * self.size.y;
        Point::new(x + self.origin.x, y + self.origin.y)
    }

    /// Center of an offset cell in pixels
    pub fn hex_to_pixel(&self, coord: HexCoord) -> Point {
        self.cube_to_pixel(coord.to_cube())
    }

    pub fn pixel_to_fractional_cube(&self, point: Point) -> FractionalCube {
        let m = &self.orientation;
        let x = (point.x - self.origin.x) / self.size.x;
        let y = (point.y - self.origin.y) / self.size.y;
        let q = m.b0 * x + m.b1 * y;
        let r = m.b2 * x + m.b3 * y;
        FractionalCube::new(q, r, -q - r)
    }

    /// Cell under a pixel
    pub fn pixel_to_hex(&self, point: Point) -> HexCoord {
        self.pixel_to_fractional_cube(point).round().to_offset()
    }

    /// Offset of a corner from the hex center
    pub fn corner_offset(&self, corner: usize) -> Point {
        let angle = 2.0 * std::f64::consts::PI * (self.orientation.start_angle + corner as f64) / 6.0;
        Point::new(self.size.x * angle.cos(), self.size.y * angle.sin())
    }

    /// All 6 corners of a hex, clockwise on screen from corner 0
    pub fn polygon_corners(&self, coord: HexCoord) -> [Point; 6] {
        let center = self.hex_to_pixel(coord);
        std::array::from_fn(|i| {
            let offset = self.corner_offset(i);
            Point::new(center.x + offset.x, center.y + offset.y)
        })
    }
}

/// Neighbor directions, in cube-offset order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the cube offset for this direction
    pub fn offset(&self) -> CubeCoord {
        match self {
            HexDirection::East => CubeCoord::from_axial(1, 0),
            HexDirection::NorthEast => CubeCoord::from_axial(1, -1),
            HexDirection::NorthWest => CubeCoord::from_axial(0, -1),
            HexDirection::West => CubeCoord::from_axial(-1, 0),
            HexDirection::SouthWest => CubeCoord::from_axial(-1, 1),
            HexDirection::SouthEast => CubeCoord::from_axial(0, 1),
        }
    }

    /// Index of the pointy-top polygon edge (corner i to corner i+1) that
    /// borders the neighbor in this direction. Not the identity: corners run
    /// clockwise on screen while directions run counter-clockwise.
    pub fn edge_index(&self) -> usize {
        match self {
            HexDirection::East => 5,
            HexDirection::NorthEast => 4,
            HexDirection::NorthWest => 3,
            HexDirection::West => 2,
            HexDirection::SouthWest => 1,
            HexDirection::SouthEast => 0,
        }
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_coord_creation() {
        let coord = HexCoord::new(5, 10);
        assert_eq!(coord.row, 5);
        assert_eq!(coord.col, 10);
    }

    #[test]
    fn test_offset_cube_round_trip_over_map() {
        for row in 0..12 {
            for col in 0..16 {
                let coord = HexCoord::new(row, col);
                let cube = coord.to_cube();
                assert!(cube.is_valid());
                assert_eq!(cube.to_offset(), coord);
            }
        }
    }

    #[test]
    fn test_odd_row_shift() {
        // Odd rows are shifted right, so (1,0) sits between (0,0) and (0,1)
        let a = HexCoord::new(1, 0);
        assert_eq!(a.distance(&HexCoord::new(0, 0)), 1);
        assert_eq!(a.distance(&HexCoord::new(0, 1)), 1);
        let b = HexCoord::new(2, 0);
        assert_eq!(b.distance(&HexCoord::new(1, 0)), 1);
        assert_eq!(b.distance(&HexCoord::new(1, 1)), 2);
    }

    #[test]
    fn test_hex_distance_same() {
        let a = HexCoord::new(4, 4);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_hex_distance_along_row() {
        assert_eq!(HexCoord::new(5, 5).distance(&HexCoord::new(5, 8)), 3);
    }

    #[test]
    fn test_neighbors_are_adjacent_and_distinct() {
        for coord in [HexCoord::new(4, 4), HexCoord::new(5, 5)] {
            let neighbors = coord.neighbors();
            for (i, n) in neighbors.iter().enumerate() {
                assert_eq!(coord.distance(n), 1);
                assert!(!neighbors[..i].contains(n));
            }
        }
    }

    #[test]
    fn test_pixel_round_trip_at_centers() {
        let layout = HexLayout::pointy(40.0, Point::new(100.0, 50.0), 1.5);
        for row in 0..6 {
            for col in 0..6 {
                let coord = HexCoord::new(row, col);
                assert_eq!(layout.pixel_to_hex(layout.hex_to_pixel(coord)), coord);
            }
        }
    }

    #[test]
    fn test_pixel_near_center_picks_hex() {
        let layout = HexLayout::pointy(40.0, Point::default(), 1.0);
        let center = layout.hex_to_pixel(HexCoord::new(3, 3));
        let picked = layout.pixel_to_hex(Point::new(center.x + 10.0, center.y - 10.0));
        assert_eq!(picked, HexCoord::new(3, 3));
    }

    #[test]
    fn test_round_fixes_largest_error() {
        // q rounds furthest, so q is recomputed from r and s
        let cube = FractionalCube::new(0.6, 0.3, -0.9).round();
        assert!(cube.is_valid());
        assert_eq!(cube, CubeCoord { q: 1, r: 0, s: -1 });

        let tie = FractionalCube::new(0.5, -0.5, 0.0).round();
        assert!(tie.is_valid());
    }

    #[test]
    fn test_direction_edge_mapping_matches_geometry() {
        let layout = HexLayout::unit();
        let origin = CubeCoord::default();
        let center = layout.cube_to_pixel(origin);
        for direction in HexDirection::all() {
            let n = layout.cube_to_pixel(origin.neighbor(direction));
            let dir_angle = (n.y - center.y).atan2(n.x - center.x).to_degrees().rem_euclid(360.0);

            let edge = direction.edge_index();
            let a = layout.corner_offset(edge);
            let b = layout.corner_offset((edge + 1) % 6);
            let mid_angle = ((a.y + b.y) / 2.0)
                .atan2((a.x + b.x) / 2.0)
                .to_degrees()
                .rem_euclid(360.0);

            let diff = (dir_angle - mid_angle).abs();
            assert!(diff < 1e-6 || (360.0 - diff) < 1e-6, "{:?}", direction);
        }
    }

    #[test]
    fn test_edge_mapping_is_not_identity() {
        assert_ne!(HexDirection::East.edge_index(), 0);
    }

    #[test]
    fn test_hex_line() {
        let a = CubeCoord::from_axial(0, 0);
        let b = CubeCoord::from_axial(3, 0);
        let line = a.line_to(&b);
        assert_eq!(line.len(), 4);
        assert_eq!(line[0], a);
        assert_eq!(line[3], b);
    }

    #[test]
    fn test_hexes_in_range() {
        let center = CubeCoord::default();
        assert_eq!(center.hexes_in_range(1).len(), 7);
        assert_eq!(center.hexes_in_range(2).len(), 19);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(HexDirection::East.opposite(), HexDirection::West);
        assert_eq!(HexDirection::NorthEast.opposite(), HexDirection::SouthWest);
    }

    #[test]
    fn test_polygon_has_six_corners_at_hex_size() {
        let layout = HexLayout::pointy(40.0, Point::default(), 1.0);
        let center = layout.hex_to_pixel(HexCoord::new(2, 2));
        for corner in layout.polygon_corners(HexCoord::new(2, 2)) {
            let d = ((corner.x - center.x).powi(2) + (corner.y - center.y).powi(2)).sqrt();
            assert!((d - 40.0).abs() < 1e-9);
        }
    }
}
