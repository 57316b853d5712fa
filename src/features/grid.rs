/// Square grid of intensities, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub side: usize,
    pub cells: Vec<f64>,
}

impl Grid {
    pub fn zeros(side: usize) -> Grid {
        Grid { side, cells: vec![0.0; side * side] }
    }

    /// Wraps row-major `cells`. Panics when the length is not `side²`.
    pub fn from_cells(side: usize, cells: Vec<f64>) -> Grid {
        assert_eq!(cells.len(), side * side, "grid cells do not form a {side}x{side} square");
        Grid { side, cells }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.side + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row * self.side + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.side..(row + 1) * self.side]
    }
}
