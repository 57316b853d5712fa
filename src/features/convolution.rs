use super::grid::Grid;

pub type Kernel = [[f64; 3]; 3];

/// Fixed, non-learned kernels. `EngineConfig::feature_maps` selects a prefix,
/// so the order here is part of the weight-file compatibility contract.
pub const KERNEL_BANK: [Kernel; 4] = [
    // Gaussian smoothing
    [
        [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
        [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
        [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    ],
    // Horizontal Sobel (responds to vertical edges)
    [
        [-1.0 / 4.0, 0.0, 1.0 / 4.0],
        [-2.0 / 4.0, 0.0, 2.0 / 4.0],
        [-1.0 / 4.0, 0.0, 1.0 / 4.0],
    ],
    // Vertical Sobel (responds to horizontal edges)
    [
        [-1.0 / 4.0, -2.0 / 4.0, -1.0 / 4.0],
        [0.0, 0.0, 0.0],
        [1.0 / 4.0, 2.0 / 4.0, 1.0 / 4.0],
    ],
    // Laplacian
    [
        [0.0, 1.0 / 4.0, 0.0],
        [1.0 / 4.0, -1.0, 1.0 / 4.0],
        [0.0, 1.0 / 4.0, 0.0],
    ],
];

/// Valid (unpadded) 2-D correlation of `grid` with `kernel`.
/// The result is `grid.side - 2` on each axis.
pub fn convolve_valid(grid: &Grid, kernel: &Kernel) -> Grid {
    assert!(grid.side >= 3, "grid is smaller than the kernel");
    let side = grid.side - 2;
    let mut out = Grid::zeros(side);

    for r in 0..side {
        for c in 0..side {
            let mut acc = 0.0;
            for (kr, krow) in kernel.iter().enumerate() {
                for (kc, k) in krow.iter().enumerate() {
                    acc += k * grid.get(r + kr, c + kc);
                }
            }
            out.set(r, c, acc);
        }
    }

    out
}

/// Applies the first `count` kernels of the bank and flattens the maps,
/// map-major then row-major.
pub fn feature_maps(grid: &Grid, count: usize) -> Vec<f64> {
    KERNEL_BANK[..count]
        .iter()
        .flat_map(|k| convolve_valid(grid, k).cells)
        .collect()
}
