//! Minimum-cost bipartite assignment (Kuhn–Munkres, potentials + shortest augmenting path).

/// Cost of a padding cell. Assignments landing on it are never reported.
pub const SENTINEL_COST: f64 = 1e9;

/// Dense row-major cost matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Cell of the square padding of this matrix.
    fn padded(&self, row: usize, col: usize) -> f64 {
        if row < self.rows && col < self.cols {
            self.get(row, col)
        } else {
            SENTINEL_COST
        }
    }
}

/// Solves the assignment problem for minimum total cost.
///
/// Rectangular inputs are padded to `max(rows, cols)` with [`SENTINEL_COST`]. Returns
/// `(row, col)` pairs ordered by column; pairs involving padding or sentinel-cost cells are
/// dropped, so at most `min(rows, cols)` pairs come back. Runs in `O(n³)` with flat arrays
/// indexed from 1 (index 0 is the virtual start column).
pub fn solve(cost: &CostMatrix) -> Vec<(usize, usize)> {
    let size = cost.rows.max(cost.cols);
    if size == 0 {
        return Vec::new();
    }

    let mut u = vec![0.0f64; size + 1];
    let mut v = vec![0.0f64; size + 1];
    // p[j]: row (1-based) currently assigned to column j; 0 = free.
    let mut p = vec![0usize; size + 1];
    let mut way = vec![0usize; size + 1];
    let mut minv = vec![f64::INFINITY; size + 1];
    let mut used = vec![false; size + 1];

    for i in 1..=size {
        p[0] = i;
        let mut j0 = 0usize;
        minv.fill(f64::INFINITY);
        used.fill(false);

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;
            for j in 1..=size {
                if used[j] {
                    continue;
                }
                let cur = cost.padded(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=size {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path back to the start column.
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut out = Vec::with_capacity(cost.rows.min(cost.cols));
    for j in 1..=size {
        if p[j] == 0 {
            continue;
        }
        let (row, col) = (p[j] - 1, j - 1);
        if row < cost.rows && col < cost.cols && cost.get(row, col) < SENTINEL_COST / 2.0 {
            out.push((row, col));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(cost: &CostMatrix, pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().map(|&(i, j)| cost.get(i, j)).sum()
    }

    fn matrix(rows: &[&[f64]]) -> CostMatrix {
        CostMatrix::from_fn(rows.len(), rows.first().map_or(0, |r| r.len()), |i, j| rows[i][j])
    }

    #[test]
    fn empty_matrix_has_no_assignment() {
        assert!(solve(&CostMatrix::new(0, 0)).is_empty());
        assert!(solve(&CostMatrix::new(0, 3)).is_empty());
    }

    #[test]
    fn finds_the_global_minimum_not_the_greedy_one() {
        // Greedy on row 0 would take (0,0)=1 and force (1,1)=10; optimum is 2 + 2.
        let cost = matrix(&[&[1.0, 2.0], &[2.0, 10.0]]);
        let pairs = solve(&cost);
        assert_eq!(pairs, vec![(1, 0), (0, 1)]);
        assert_eq!(total(&cost, &pairs), 4.0);
    }

    #[test]
    fn classic_three_by_three() {
        let cost = matrix(&[&[4.0, 1.0, 3.0], &[2.0, 0.0, 5.0], &[3.0, 2.0, 2.0]]);
        let pairs = solve(&cost);
        assert_eq!(pairs.len(), 3);
        assert_eq!(total(&cost, &pairs), 5.0);
    }

    #[test]
    fn more_rows_than_columns_leaves_rows_unassigned() {
        let cost = matrix(&[&[0.9], &[0.1], &[0.5]]);
        assert_eq!(solve(&cost), vec![(1, 0)]);
    }

    #[test]
    fn more_columns_than_rows_leaves_columns_unassigned() {
        let cost = matrix(&[&[0.7, 0.2, 0.4]]);
        assert_eq!(solve(&cost), vec![(0, 1)]);
    }

    #[test]
    fn sentinel_cells_are_never_reported() {
        let cost = matrix(&[&[SENTINEL_COST, SENTINEL_COST], &[0.3, SENTINEL_COST]]);
        assert_eq!(solve(&cost), vec![(1, 0)]);
    }

    #[test]
    fn every_row_and_column_used_at_most_once() {
        let cost = CostMatrix::from_fn(6, 4, |i, j| ((i * 7 + j * 3) % 5) as f64 * 0.1);
        let pairs = solve(&cost);
        assert_eq!(pairs.len(), 4);
        let mut rows: Vec<_> = pairs.iter().map(|p| p.0).collect();
        rows.sort();
        rows.dedup();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn matches_brute_force_on_small_square_matrices() {
        fn permutations(n: usize) -> Vec<Vec<usize>> {
            if n == 0 {
                return vec![Vec::new()];
            }
            let mut out = Vec::new();
            for perm in permutations(n - 1) {
                for pos in 0..=perm.len() {
                    let mut p = perm.clone();
                    p.insert(pos, n - 1);
                    out.push(p);
                }
            }
            out
        }

        for seed in 0..20u64 {
            let cost = CostMatrix::from_fn(4, 4, |i, j| {
                let cell = (i * 4 + j) as u64;
                let x = seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(cell.wrapping_mul(1442695040888963407));
                ((x >> 33) % 1000) as f64 / 1000.0
            });
            let best = permutations(4)
                .into_iter()
                .map(|perm| perm.iter().enumerate().map(|(i, &j)| cost.get(i, j)).sum::<f64>())
                .fold(f64::INFINITY, f64::min);
            let got = total(&cost, &solve(&cost));
            assert!((got - best).abs() < 1e-9, "seed {seed}: {got} vs {best}");
        }
    }
}
