use ndarray::{arr1, arr2, Array2, ArrayView2};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Multiply two 2D arrays.
    pub fn multiply(lhs: ArrayView2<f64>, rhs: ArrayView2<f64>) -> Array2<f64> {
        lhs.dot(&rhs)
    }

    /// Rotation taking a (north, east, down) offset at the given origin into
    /// a geocentric delta. Only the origin latitude and longitude matter.
    pub fn ned_to_ecef(lat_rad: f64, lon_rad: f64) -> Array2<f64> {
        let (slat, clat) = lat_rad.sin_cos();
        let (slon, clon) = lon_rad.sin_cos();
        arr2(&[
            [-slat * clon, -slon, -clat * clon],
            [-slat * slon, clon, -clat * slon],
            [clat, 0.0, -slat],
        ])
    }

    /// Applies a 3x3 matrix to a column vector.
    pub fn apply(matrix: ArrayView2<f64>, vector: [f64; 3]) -> [f64; 3] {
        let out = matrix.dot(&arr1(&vector));
        [out[0], out[1], out[2]]
    }
}
