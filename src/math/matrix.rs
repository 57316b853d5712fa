use rand::Rng;
use std::f64::consts::PI;
use std::ops::{Index, IndexMut};

/// Dense row-major matrix of `f64`.
///
/// Layer weights are stored as `(inputs × outputs)`, so a layer's forward pass
/// is the row-vector product `x · W`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps row-major `data`. Panics when the length does not match the shape.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Matrix {
        assert_eq!(
            data.len(),
            rows * cols,
            "Matrix data length {} does not match shape {}x{}",
            data.len(),
            rows,
            cols
        );
        Matrix { rows, cols, data }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Xavier (Glorot) initialization: samples from N(0, sqrt(1 / fan_in)).
    ///
    /// Suited to the saturating tanh layers this engine uses.
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, fan_in: usize, rng: &mut R) -> Matrix {
        let std_dev = (1.0 / fan_in.max(1) as f64).sqrt();
        let data = (0..rows * cols)
            .map(|_| Matrix::sample_standard_normal(rng) * std_dev)
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row vector times matrix: returns `x · self`, length `cols`.
    pub fn vec_mul(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(x.len(), self.rows, "Matrices are of incorrect sizes");
        let mut res = vec![0.0; self.cols];
        for (i, &xi) in x.iter().enumerate() {
            if xi == 0.0 {
                continue;
            }
            for (r, w) in res.iter_mut().zip(self.row(i)) {
                *r += xi * w;
            }
        }
        res
    }

    /// Row vector times transpose: returns `d · selfᵀ`, length `rows`.
    pub fn vec_mul_transposed(&self, d: &[f64]) -> Vec<f64> {
        assert_eq!(d.len(), self.cols, "Matrices are of incorrect sizes");
        (0..self.rows)
            .map(|i| self.row(i).iter().zip(d).map(|(w, di)| w * di).sum())
            .collect()
    }

    /// Accumulates the outer product `xᵀ · d` into `self`.
    pub fn add_outer(&mut self, x: &[f64], d: &[f64]) {
        assert_eq!(x.len(), self.rows, "Matrices are of incorrect sizes");
        assert_eq!(d.len(), self.cols, "Matrices are of incorrect sizes");
        for (i, &xi) in x.iter().enumerate() {
            if xi == 0.0 {
                continue;
            }
            let start = i * self.cols;
            for (cell, di) in self.data[start..start + self.cols].iter_mut().zip(d) {
                *cell += xi * di;
            }
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_mul_matches_manual_product() {
        // [1 2] · [[1 2 3], [4 5 6]] = [9 12 15]
        let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.vec_mul(&[1.0, 2.0]), vec![9.0, 12.0, 15.0]);
        assert_eq!(m.vec_mul_transposed(&[1.0, 0.0, 1.0]), vec![4.0, 10.0]);
    }

    #[test]
    fn add_outer_accumulates() {
        let mut m = Matrix::zeros(2, 2);
        m.add_outer(&[1.0, 2.0], &[3.0, 4.0]);
        m.add_outer(&[1.0, 0.0], &[1.0, 1.0]);
        assert_eq!(m.data, vec![4.0, 5.0, 6.0, 8.0]);
        assert_eq!(m[(1, 0)], 6.0);
    }

    #[test]
    #[should_panic]
    fn from_vec_rejects_bad_shape() {
        Matrix::from_vec(2, 2, vec![1.0]);
    }
}
