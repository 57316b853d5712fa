use super::grid::Grid;

/// Mean-pools `grid` over non-overlapping `pool_len × pool_len` windows.
///
/// `grid.side` must be a multiple of `pool_len` (checked by
/// `EngineConfig::validate`).
pub fn mean_pool(grid: &Grid, pool_len: usize) -> Grid {
    assert!(pool_len > 0 && grid.side % pool_len == 0, "grid side is not a multiple of the pool length");
    let side = grid.side / pool_len;
    let area = (pool_len * pool_len) as f64;
    let mut pooled = Grid::zeros(side);

    for pr in 0..side {
        for pc in 0..side {
            let mut sum = 0.0;
            for r in pr * pool_len..(pr + 1) * pool_len {
                sum += grid.row(r)[pc * pool_len..(pc + 1) * pool_len].iter().sum::<f64>();
            }
            pooled.set(pr, pc, sum / area);
        }
    }

    pooled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_each_window() {
        let grid = Grid::from_cells(
            4,
            vec![
                1.0, 1.0, 0.0, 0.0,
                1.0, 1.0, 0.0, 1.0,
                0.0, 0.0, 0.5, 0.5,
                0.0, 0.0, 0.5, 0.5,
            ],
        );
        let pooled = mean_pool(&grid, 2);
        assert_eq!(pooled.side, 2);
        assert_eq!(pooled.cells, vec![1.0, 0.25, 0.0, 0.5]);
    }
}
