//! Canvas Projection
//!
//! Maps 2D canvas pixels (origin top-left, y down) to clip space.

/// Column-major 4x4 projection for a `width` x `height` viewport
pub fn projection(width: f32, height: f32) -> [f32; 16] {
    [
        2.0 / width, 0.0, 0.0, 0.0,
        0.0, -2.0 / height, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        -1.0, 1.0, 0.0, 1.0,
    ]
}

/// Apply a column-major matrix to a 2D point
pub fn project_point(matrix: &[f32; 16], x: f32, y: f32) -> (f32, f32) {
    (
        matrix[0] * x + matrix[4] * y + matrix[12],
        matrix[1] * x + matrix[5] * y + matrix[13],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_map_to_clip_space() {
        let m = projection(512.0, 256.0);
        assert_eq!(project_point(&m, 0.0, 0.0), (-1.0, 1.0));
        assert_eq!(project_point(&m, 512.0, 256.0), (1.0, -1.0));
        assert_eq!(project_point(&m, 256.0, 128.0), (0.0, 0.0));
    }
}
