//=========================================================================
// Puzzle Grid
//=========================================================================
//
// Flood-fill puzzle data and the connectivity algorithms on it.
//
// Layout:
//   N cells in row-major order, side = √N
//
//        0   1   2          east/west never wrap across rows,
//        3   4   5          north/south stop at the top/bottom row
//        6   7   8
//
// The player owns the region connected to cell 0. Clicking a cell on
// the border of that region recolours the whole region to the clicked
// colour, absorbing the clicked cell and everything of its colour that
// touches it. The puzzle is solved once every cell has one colour.
//
// Traversal is iterative with a per-call visited set: each cell is
// visited at most once and the grid itself is never mutated by a query.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeSet;

use rand::Rng;

//=== Internal Dependencies ===============================================

use crate::config::{exact_sqrt, ConfigError};
use crate::core::input::Position;

//=== Types ===============================================================

/// Index into the palette.
pub type ColorIndex = usize;

/// Cell the player's region grows from.
pub const ORIGIN: usize = 0;

/// Region and border found by one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Traversal {
    pub region: BTreeSet<usize>,
    pub border: BTreeSet<usize>,
    pub visits: usize,
}

//=== PuzzleGrid ==========================================================

/// Square grid of coloured cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleGrid {
    cells: Vec<ColorIndex>,
    side: usize,
}

impl PuzzleGrid {
    //--- Construction -----------------------------------------------------

    /// Wraps an existing row-major cell list.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotPerfectSquare`] if the length is not a perfect
    /// square, [`ConfigError::GridTooSmall`] if it is empty.
    pub fn from_cells(cells: Vec<ColorIndex>) -> Result<Self, ConfigError> {
        let side = exact_sqrt(cells.len()).ok_or(ConfigError::NotPerfectSquare(cells.len()))?;
        if side == 0 {
            return Err(ConfigError::GridTooSmall(side));
        }
        Ok(Self { cells, side })
    }

    /// Fills a `side` x `side` grid with uniformly random colours in
    /// `0..colors`.
    pub fn random<R: Rng + ?Sized>(side: usize, colors: usize, rng: &mut R) -> Self {
        let cells = (0..side * side)
            .map(|_| rng.random_range(0..colors.max(1)))
            .collect();
        Self { cells, side }
    }

    //--- Query API --------------------------------------------------------

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[ColorIndex] {
        &self.cells
    }

    pub fn color(&self, idx: usize) -> Option<ColorIndex> {
        self.cells.get(idx).copied()
    }

    /// True when every cell has the same colour.
    pub fn is_solved(&self) -> bool {
        match self.cells.split_first() {
            Some((first, rest)) => rest.iter().all(|c| c == first),
            None => true,
        }
    }

    //--- Connectivity -----------------------------------------------------

    /// Orthogonal neighbours of `idx`, in east, west, north, south order.
    ///
    /// Empty for an out-of-range index.
    pub fn neighbors(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(4);
        if idx >= self.cells.len() {
            return out;
        }

        let column = idx % self.side;

        if column + 1 < self.side {
            out.push(idx + 1);
        }
        if column > 0 {
            out.push(idx - 1);
        }
        if idx >= self.side {
            out.push(idx - self.side);
        }
        if idx + self.side < self.cells.len() {
            out.push(idx + self.side);
        }

        out
    }

    /// Maximal same-coloured region containing `origin`.
    pub fn connected_region(&self, origin: usize) -> BTreeSet<usize> {
        self.traverse(origin).region
    }

    /// Cells adjacent to the region of `origin` but of another colour.
    /// These are the legal click targets when `origin` is [`ORIGIN`].
    pub fn border_region(&self, origin: usize) -> BTreeSet<usize> {
        self.traverse(origin).border
    }

    pub(crate) fn traverse(&self, origin: usize) -> Traversal {
        let mut result = Traversal::default();
        let Some(color) = self.color(origin) else {
            return result;
        };

        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![origin];
        visited[origin] = true;

        while let Some(idx) = stack.pop() {
            result.visits += 1;
            result.region.insert(idx);

            for n in self.neighbors(idx) {
                if self.cells[n] != color {
                    result.border.insert(n);
                } else if !visited[n] {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }

        result
    }

    //--- Mutation ---------------------------------------------------------

    /// True if clicking `idx` would merge it into the player's region.
    pub fn is_legal_click(&self, idx: usize) -> bool {
        self.border_region(ORIGIN).contains(&idx)
    }

    /// Recolours the player's region to the colour at `idx`.
    ///
    /// Returns `false` and changes nothing when `idx` is not on the
    /// region's border.
    pub fn apply_click(&mut self, idx: usize) -> bool {
        let Traversal { region, border, .. } = self.traverse(ORIGIN);
        if !border.contains(&idx) {
            return false;
        }

        let color = self.cells[idx];
        for cell in region {
            self.cells[cell] = color;
        }
        true
    }

    //--- Screen Mapping ---------------------------------------------------

    /// Cell under a screen position, for cells `cell_size` pixels wide.
    ///
    /// Uses floor semantics: a point on a boundary belongs to the cell to
    /// its right / below. Points outside the grid map to `None`.
    pub fn index_at(&self, position: Position, cell_size: f32) -> Option<usize> {
        if cell_size <= 0.0 || position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let column = (position.x / cell_size).floor() as usize;
        let row = (position.y / cell_size).floor() as usize;

        if column >= self.side || row >= self.side {
            return None;
        }

        Some(column + row * self.side)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    //--- Test Helpers -----------------------------------------------------

    fn grid(cells: &[ColorIndex]) -> PuzzleGrid {
        PuzzleGrid::from_cells(cells.to_vec()).unwrap()
    }

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    fn checkerboard(side: usize) -> PuzzleGrid {
        let cells = (0..side * side).map(|i| (i % side + i / side) % 2).collect();
        PuzzleGrid::from_cells(cells).unwrap()
    }

    /// Every grid of `side` x `side` cells over `colors` colours.
    fn all_grids(side: usize, colors: usize) -> impl Iterator<Item = PuzzleGrid> {
        let n = side * side;
        let total = colors.pow(n as u32);
        (0..total).map(move |mut code| {
            let cells = (0..n)
                .map(|_| {
                    let c = code % colors;
                    code /= colors;
                    c
                })
                .collect();
            PuzzleGrid::from_cells(cells).unwrap()
        })
    }

    /// Longest sequence of legal clicks before the grid is solved,
    /// over every possible choice of click.
    fn longest_game(grid: &PuzzleGrid) -> usize {
        if grid.is_solved() {
            return 0;
        }
        grid.border_region(ORIGIN)
            .into_iter()
            .map(|idx| {
                let mut next = grid.clone();
                assert!(next.apply_click(idx));
                1 + longest_game(&next)
            })
            .max()
            .unwrap_or(0)
    }

    fn assert_region_invariants(grid: &PuzzleGrid) {
        let traversal = grid.traverse(ORIGIN);
        let origin_color = grid.cells()[ORIGIN];

        assert!(traversal.region.contains(&ORIGIN));
        assert!(traversal.region.iter().all(|&i| i < grid.len()));
        assert!(traversal.region.iter().all(|&i| grid.cells()[i] == origin_color));
        assert_eq!(traversal.visits, traversal.region.len(), "Each cell visited once");

        for &b in &traversal.border {
            assert_ne!(grid.cells()[b], origin_color);
            assert!(
                traversal.region.iter().any(|&r| grid.neighbors(r).contains(&b)),
                "Border cell {} must touch the region",
                b
            );
        }
    }

    //=====================================================================
    // Construction
    //=====================================================================

    #[test]
    fn from_cells_requires_perfect_square() {
        assert_eq!(
            PuzzleGrid::from_cells(vec![0; 5]),
            Err(ConfigError::NotPerfectSquare(5))
        );
        assert_eq!(PuzzleGrid::from_cells(vec![]), Err(ConfigError::GridTooSmall(0)));
        assert_eq!(grid(&[0; 9]).side(), 3);
    }

    #[test]
    fn random_grid_uses_palette_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = PuzzleGrid::random(12, 6, &mut rng);
        assert_eq!(grid.len(), 144);
        assert_eq!(grid.side(), 12);
        assert!(grid.cells().iter().all(|&c| c < 6));
    }

    //=====================================================================
    // Neighbours
    //=====================================================================

    #[test]
    fn neighbors_in_3x3() {
        let g = grid(&[0; 9]);
        assert_eq!(g.neighbors(0), vec![1, 3]);
        assert_eq!(g.neighbors(2), vec![1, 5]);
        assert_eq!(g.neighbors(4), vec![5, 3, 1, 7]);
        assert_eq!(g.neighbors(6), vec![7, 3]);
        assert_eq!(g.neighbors(8), vec![7, 5]);
        assert!(g.neighbors(9).is_empty());
    }

    #[test]
    fn neighbors_never_wrap_rows() {
        let g = grid(&[0; 16]);
        for idx in 0..16 {
            for n in g.neighbors(idx) {
                let same_row = n / 4 == idx / 4;
                let same_column = n % 4 == idx % 4;
                assert!(same_row ^ same_column, "{} -> {} is not orthogonal", idx, n);
            }
        }
        assert!(!g.neighbors(3).contains(&4));
        assert!(!g.neighbors(4).contains(&3));
    }

    //=====================================================================
    // Regions
    //=====================================================================

    #[test]
    fn uniform_grid_region_is_everything() {
        let g = grid(&[2; 16]);
        let traversal = g.traverse(ORIGIN);
        assert_eq!(traversal.region.len(), 16);
        assert!(traversal.border.is_empty());
        assert_eq!(traversal.visits, 16);
        assert!(g.is_solved());
    }

    #[test]
    fn checkerboard_region_is_origin_only() {
        let g = checkerboard(4);
        assert_eq!(g.connected_region(ORIGIN), set(&[0]));
        assert_eq!(g.border_region(ORIGIN), set(&[1, 4]));
        assert_eq!(g.traverse(ORIGIN).visits, 1);
    }

    #[test]
    fn region_follows_winding_path() {
        // 0 0 1
        // 1 0 1
        // 0 0 1
        let g = grid(&[0, 0, 1, 1, 0, 1, 0, 0, 1]);
        assert_eq!(g.connected_region(ORIGIN), set(&[0, 1, 4, 6, 7]));
        assert_eq!(g.border_region(ORIGIN), set(&[2, 3, 5, 8]));
        assert_region_invariants(&g);
    }

    #[test]
    fn region_from_other_origin() {
        let g = grid(&[0, 0, 1, 1, 0, 1, 0, 0, 1]);
        assert_eq!(g.connected_region(2), set(&[2, 5, 8]));
        assert!(g.connected_region(42).is_empty());
    }

    #[test]
    fn invariants_hold_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(1234);
        for side in 2..=8 {
            for _ in 0..25 {
                assert_region_invariants(&PuzzleGrid::random(side, 4, &mut rng));
            }
        }
    }

    //=====================================================================
    // Clicking
    //=====================================================================

    #[test]
    fn legal_click_recolours_region() {
        let mut g = grid(&[0, 0, 1, 1, 0, 1, 0, 0, 1]);
        let before = g.connected_region(ORIGIN).len();

        assert!(g.is_legal_click(2));
        assert!(g.apply_click(2));

        assert_eq!(g.cells(), &[1, 1, 1, 1, 1, 1, 1, 1, 1]);
        assert!(g.connected_region(ORIGIN).len() >= before);
        assert!(g.is_solved());
    }

    #[test]
    fn illegal_click_changes_nothing() {
        let mut g = grid(&[0, 1, 2, 1, 2, 0, 2, 0, 1]);
        let before = g.clone();

        // In the region, far from the region, and off the grid.
        for idx in [0, 8, 4, 100] {
            assert!(!g.apply_click(idx), "Click on {} should be ignored", idx);
            assert_eq!(g, before);
        }
    }

    #[test]
    fn legal_click_strictly_grows_region() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let g = PuzzleGrid::random(6, 5, &mut rng);
            let before = g.connected_region(ORIGIN).len();
            for idx in g.border_region(ORIGIN) {
                let mut next = g.clone();
                assert!(next.apply_click(idx));
                let after = next.connected_region(ORIGIN);
                assert!(after.len() > before);
                assert!(after.contains(&idx));
            }
        }
    }

    //=====================================================================
    // Termination
    //=====================================================================

    #[test]
    fn every_click_sequence_terminates_on_2x2() {
        for g in all_grids(2, 3) {
            assert!(longest_game(&g) <= g.len() - 1, "{:?}", g);
        }
    }

    #[test]
    fn greedy_play_solves_every_3x3() {
        for mut g in all_grids(3, 3) {
            let mut clicks = 0;
            while !g.is_solved() {
                let target = *g.border_region(ORIGIN).iter().next().unwrap();
                assert!(g.apply_click(target));
                clicks += 1;
                assert!(clicks <= g.len() - 1);
            }
        }
    }

    #[test]
    fn exhaustive_play_terminates_on_random_3x3() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let g = PuzzleGrid::random(3, 3, &mut rng);
            assert!(longest_game(&g) <= 8);
        }
    }

    //=====================================================================
    // Screen Mapping
    //=====================================================================

    #[test]
    fn index_at_uses_floor() {
        let g = grid(&[0; 144]);
        assert_eq!(g.index_at(Position::new(0.0, 0.0), 50.0), Some(0));
        assert_eq!(g.index_at(Position::new(49.9, 0.0), 50.0), Some(0));
        assert_eq!(g.index_at(Position::new(50.0, 0.0), 50.0), Some(1));
        assert_eq!(g.index_at(Position::new(0.0, 50.0), 50.0), Some(12));
        assert_eq!(g.index_at(Position::new(549.0, 549.0), 50.0), Some(130));
        assert_eq!(g.index_at(Position::new(599.0, 599.0), 50.0), Some(143));
    }

    #[test]
    fn index_at_outside_grid_is_none() {
        let g = grid(&[0; 144]);
        assert_eq!(g.index_at(Position::new(600.0, 10.0), 50.0), None);
        assert_eq!(g.index_at(Position::new(10.0, 600.0), 50.0), None);
        assert_eq!(g.index_at(Position::new(-1.0, 10.0), 50.0), None);
        assert_eq!(g.index_at(Position::new(10.0, 10.0), 0.0), None);
    }
}
