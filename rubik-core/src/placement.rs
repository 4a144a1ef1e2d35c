/// Face placement: where a tile sits on a piece and how it is turned
use nalgebra::Point3;

use crate::side::Side;
use crate::transform::Orientation;

/// Edge length of a tile in world units
pub const TILE_SIZE: f32 = 1.0;

/// Center and orientation computed for one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point3<f32>,
    pub rotation: Orientation,
}

/// Place a tile of edge `tile_size` on `side` of a piece centered at `center`.
///
/// The tile center is pushed `tile_size / 2` out along the side's axis. The
/// rotation turns the XY-plane tile so it lies flat on that face; it does not
/// depend on the center.
pub fn place_tile(center: Point3<f32>, side: Side, tile_size: f32) -> Placement {
    let position = center + side.normal() * (tile_size / 2.0);

    Placement {
        position,
        rotation: side.orientation(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_angle(actual: f32, expected: f32) {
        assert!(
            (f64::from(actual) - f64::from(expected)).abs() < 1e-9,
            "angle {} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_unit_tiles_at_origin() {
        let expected = [
            (Side::Top, [0.0, 0.0, 0.5], [0.0, 0.0, 0.0]),
            (Side::Bottom, [0.0, 0.0, -0.5], [0.0, 0.0, 0.0]),
            (Side::Right, [0.5, 0.0, 0.0], [0.0, FRAC_PI_2, 0.0]),
            (Side::Left, [-0.5, 0.0, 0.0], [0.0, FRAC_PI_2, 0.0]),
            (Side::Front, [0.0, 0.5, 0.0], [FRAC_PI_2, 0.0, 0.0]),
            (Side::Back, [0.0, -0.5, 0.0], [FRAC_PI_2, 0.0, 0.0]),
        ];

        for (side, [x, y, z], [rx, ry, rz]) in expected {
            let placement = place_tile(Point3::origin(), side, TILE_SIZE);
            assert_eq!(placement.position, Point3::new(x, y, z), "{}", side);
            assert_angle(placement.rotation.rx, rx);
            assert_angle(placement.rotation.ry, ry);
            assert_angle(placement.rotation.rz, rz);
        }
    }

    #[test]
    fn test_translation_invariance() {
        let centers = [
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-4.0, 5.0, -2.0),
            Point3::new(0.25, -7.5, 10.0),
        ];

        for center in centers {
            for side in Side::ALL {
                let at_origin = place_tile(Point3::origin(), side, TILE_SIZE);
                let moved = place_tile(center, side, TILE_SIZE);

                assert_eq!(moved.position, center + at_origin.position.coords);
                assert_eq!(moved.rotation, at_origin.rotation);
            }
        }
    }

    #[test]
    fn test_offset_is_half_tile_along_one_axis() {
        let center = Point3::new(3.0, -1.0, 2.0);
        for side in Side::ALL {
            let offset = place_tile(center, side, 2.0).position - center;
            let moved: Vec<f32> = offset.iter().copied().filter(|c| *c != 0.0).collect();
            assert_eq!(moved.len(), 1);
            assert_eq!(moved[0].abs(), 1.0);
        }
    }
}
