// Grid utilities: pure geometric and color functions over a row-major grid.
//
// Every function returns a new grid. Inputs are assumed rectangular
// (validated when tasks are loaded); a grid with no rows is 0x0.

pub type Grid = Vec<Vec<u8>>;

/// Distance reported for grids whose shapes differ.
pub const MISMATCH: u64 = 1_000_000_000;

static NEIGHBORS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    TopLeft,
    Center,
}

/// A 4-connected single-color region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub cells: Vec<(usize, usize)>,
    pub color: u8,
    pub min_r: usize,
    pub min_c: usize,
    pub max_r: usize,
    pub max_c: usize,
}

impl Object {
    pub fn from_cells(cells: Vec<(usize, usize)>, color: u8) -> Self {
        let min_r = cells.iter().map(|&(r, _)| r).min().unwrap_or(0);
        let min_c = cells.iter().map(|&(_, c)| c).min().unwrap_or(0);
        let max_r = cells.iter().map(|&(r, _)| r).max().unwrap_or(0);
        let max_c = cells.iter().map(|&(_, c)| c).max().unwrap_or(0);
        Self { cells, color, min_r, min_c, max_r, max_c }
    }

    pub fn width(&self) -> usize { self.max_c - self.min_c + 1 }
    pub fn height(&self) -> usize { self.max_r - self.min_r + 1 }
    pub fn area(&self) -> usize { self.cells.len() }
}

pub fn grid_dimensions(grid: &Grid) -> (usize, usize) {
    if grid.is_empty() { (0, 0) } else { (grid.len(), grid[0].len()) }
}

pub fn is_empty_grid(grid: &Grid) -> bool {
    let (rows, cols) = grid_dimensions(grid);
    rows == 0 || cols == 0
}

pub fn has_shape(grid: &Grid, rows: usize, cols: usize) -> bool {
    grid.len() == rows && grid.iter().all(|row| row.len() == cols)
}

fn color_counts(grid: &Grid) -> [usize; 256] {
    let mut counts = [0usize; 256];
    for row in grid {
        for &c in row {
            counts[c as usize] += 1;
        }
    }
    counts
}

/// Most frequent color. Ties go to the smallest value; an empty grid gives 0.
pub fn bg_color(grid: &Grid) -> u8 {
    let counts = color_counts(grid);
    let mut best = 0u8;
    let mut best_n = 0usize;
    for (color, &n) in counts.iter().enumerate() {
        if n > best_n {
            best = color as u8;
            best_n = n;
        }
    }
    best
}

/// Same statistic as [`bg_color`]; named separately where the caller means
/// "dominant color" rather than "fill color".
pub fn majority_color(grid: &Grid) -> u8 {
    bg_color(grid)
}

/// Every color present, by descending frequency. Ties keep the order in
/// which colors first appear in a row-major scan.
pub fn colors_by_frequency(grid: &Grid) -> Vec<u8> {
    let counts = color_counts(grid);
    let mut seen = [false; 256];
    let mut colors = Vec::new();
    for &c in grid.iter().flat_map(|row| row.iter()) {
        if !seen[c as usize] {
            seen[c as usize] = true;
            colors.push(c);
        }
    }
    // stable sort, so first-seen order survives among equal counts
    colors.sort_by(|a, b| counts[*b as usize].cmp(&counts[*a as usize]));
    colors
}

pub fn count_foreground(grid: &Grid, bg: u8) -> usize {
    grid.iter().flat_map(|row| row.iter()).filter(|&&c| c != bg).count()
}

/// Cell-wise mismatch count, or [`MISMATCH`] when shapes differ.
pub fn hamming(a: &Grid, b: &Grid) -> u64 {
    if a.len() != b.len() || a.iter().zip(b.iter()).any(|(ra, rb)| ra.len() != rb.len()) {
        return MISMATCH;
    }
    a.iter()
        .zip(b.iter())
        .flat_map(|(ra, rb)| ra.iter().zip(rb.iter()))
        .filter(|(x, y)| x != y)
        .count() as u64
}

// --- Dihedral transforms ---

fn rotate_ccw(g: &Grid) -> Grid {
    let (rows, cols) = grid_dimensions(g);
    (0..cols).rev().map(|c| (0..rows).map(|r| g[r][c]).collect()).collect()
}

/// `k` counter-clockwise quarter turns.
pub fn rotate(grid: &Grid, k: usize) -> Grid {
    let mut out = grid.clone();
    for _ in 0..k % 4 {
        out = rotate_ccw(&out);
    }
    out
}

/// Left-right reversal of every row.
pub fn mirror_h(grid: &Grid) -> Grid {
    grid.iter().map(|row| row.iter().rev().copied().collect()).collect()
}

/// Top-bottom reversal of the rows.
pub fn mirror_v(grid: &Grid) -> Grid {
    grid.iter().rev().cloned().collect()
}

pub fn transpose(grid: &Grid) -> Grid {
    let (rows, cols) = grid_dimensions(grid);
    (0..cols).map(|c| (0..rows).map(|r| grid[r][c]).collect()).collect()
}

// --- Cropping, padding, scaling ---

pub fn sub_grid(grid: &Grid, r: usize, c: usize, h: usize, w: usize) -> Grid {
    grid.iter().skip(r).take(h).map(|row| row.iter().skip(c).take(w).copied().collect()).collect()
}

/// Minimal rectangle holding every non-`bg` cell; the grid itself when all cells are `bg`.
pub fn crop_to_bbox(grid: &Grid, bg: u8) -> Grid {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for (r, row) in grid.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            if v == bg { continue; }
            bounds = Some(match bounds {
                None => (r, c, r, c),
                Some((r0, c0, r1, c1)) => (r0.min(r), c0.min(c), r1.max(r), c1.max(c)),
            });
        }
    }
    match bounds {
        Some((r0, c0, r1, c1)) => sub_grid(grid, r0, c0, r1 - r0 + 1, c1 - c0 + 1),
        None => grid.clone(),
    }
}

/// (destination offset, source offset) along one axis.
fn placement(target: usize, size: usize, align: Align) -> (usize, usize) {
    match align {
        Align::TopLeft => (0, 0),
        Align::Center if target >= size => ((target - size) / 2, 0),
        Align::Center => (0, (size - target) / 2),
    }
}

/// Copy `grid` into a fresh `rows` x `cols` canvas of `bg`.
///
/// Lossy: a grid larger than the target is truncated, on the bottom/right
/// for [`Align::TopLeft`]. [`Align::Center`] keeps the middle, cutting any
/// odd cell from the bottom/right.
pub fn pad_to(grid: &Grid, rows: usize, cols: usize, bg: u8, align: Align) -> Grid {
    let (h, w) = grid_dimensions(grid);
    let mut out = vec![vec![bg; cols]; rows];
    let (dst_r, src_r) = placement(rows, h, align);
    let (dst_c, src_c) = placement(cols, w, align);
    let copy_h = (h - src_r).min(rows - dst_r);
    let copy_w = (w - src_c).min(cols - dst_c);
    for i in 0..copy_h {
        out[dst_r + i][dst_c..dst_c + copy_w]
            .copy_from_slice(&grid[src_r + i][src_c..src_c + copy_w]);
    }
    out
}

/// Nearest-neighbor replication by independent row/column factors.
pub fn upscale(grid: &Grid, sy: usize, sx: usize) -> Grid {
    let mut result = Vec::with_capacity(grid.len() * sy);
    for row in grid {
        let scaled_row: Vec<u8> = row.iter().flat_map(|&c| std::iter::repeat(c).take(sx)).collect();
        for _ in 0..sy {
            result.push(scaled_row.clone());
        }
    }
    result
}

fn scale_factor(target: usize, size: usize) -> usize {
    ((target as f64 / size as f64).round_ties_even() as usize).max(1)
}

/// Replicate `obj` by `round(rows/h)` x `round(cols/w)`, then center-crop or
/// center-pad to exactly `rows` x `cols`.
pub fn resize_integer_scale(obj: &Grid, rows: usize, cols: usize, bg: u8) -> Grid {
    let (h, w) = grid_dimensions(obj);
    if h == 0 || w == 0 {
        return vec![vec![bg; cols]; rows];
    }
    let scaled = upscale(obj, scale_factor(rows, h), scale_factor(cols, w));
    let (sh, sw) = grid_dimensions(&scaled);
    if sh >= rows && sw >= cols {
        sub_grid(&scaled, (sh - rows) / 2, (sw - cols) / 2, rows, cols)
    } else {
        pad_to(&scaled, rows, cols, bg, Align::Center)
    }
}

// --- Periodicity ---

/// Repeat `tile` to cover exactly `rows` x `cols`, truncating the excess.
pub fn tile_to(tile: &Grid, rows: usize, cols: usize) -> Grid {
    let (th, tw) = grid_dimensions(tile);
    if th == 0 || tw == 0 {
        return vec![vec![0; cols]; rows];
    }
    (0..rows).map(|r| (0..cols).map(|c| tile[r % th][c % tw]).collect()).collect()
}

/// Smallest top-left rectangle whose tiling reproduces the grid exactly.
///
/// Tile heights are scanned in increasing order, and widths in increasing
/// order within each height. `None` when only the whole grid qualifies.
pub fn smallest_tile(grid: &Grid) -> Option<Grid> {
    let (rows, cols) = grid_dimensions(grid);
    if rows == 0 || cols == 0 { return None; }
    for th in (1..=rows).filter(|th| rows % th == 0) {
        for tw in (1..=cols).filter(|tw| cols % tw == 0) {
            if th == rows && tw == cols { return None; }
            let periodic = (0..rows).all(|r| (0..cols).all(|c| grid[r][c] == grid[r % th][c % tw]));
            if periodic {
                return Some(sub_grid(grid, 0, 0, th, tw));
            }
        }
    }
    None
}

// --- Objects ---

/// 4-connected regions of equal color, skipping `bg`. Regions are listed in
/// row-major order of their first cell; adjacent regions of different colors
/// stay separate.
pub fn connected_components(grid: &Grid, bg: u8) -> Vec<Object> {
    let (rows, cols) = grid_dimensions(grid);
    let mut visited = vec![vec![false; cols]; rows];
    let mut objects = Vec::new();

    for r in 0..rows {
        for c in 0..cols {
            if visited[r][c] { continue; }
            let color = grid[r][c];
            if color == bg { continue; }

            let mut cells = Vec::new();
            let mut stack = vec![(r, c)];
            visited[r][c] = true;

            while let Some((cr, cc)) = stack.pop() {
                cells.push((cr, cc));
                for (nr, nc) in neighbors(cr, cc, rows, cols) {
                    if !visited[nr][nc] && grid[nr][nc] == color {
                        visited[nr][nc] = true;
                        stack.push((nr, nc));
                    }
                }
            }
            objects.push(Object::from_cells(cells, color));
        }
    }
    objects
}

fn neighbors(r: usize, c: usize, rows: usize, cols: usize) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBORS_4.iter().filter_map(move |&(dr, dc)| {
        let nr = r as i32 + dr;
        let nc = c as i32 + dc;
        if nr >= 0 && nr < rows as i32 && nc >= 0 && nc < cols as i32 {
            Some((nr as usize, nc as usize))
        } else {
            None
        }
    })
}

/// True when a 4-neighbor of (r, c) is `bg` or lies outside the grid.
pub fn touches_background(grid: &Grid, r: usize, c: usize, bg: u8) -> bool {
    let (rows, cols) = grid_dimensions(grid);
    NEIGHBORS_4.iter().any(|&(dr, dc)| {
        let nr = r as i32 + dr;
        let nc = c as i32 + dc;
        nr < 0 || nr >= rows as i32 || nc < 0 || nc >= cols as i32
            || grid[nr as usize][nc as usize] == bg
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1usize..7, 1usize..7).prop_flat_map(|(h, w)| {
            proptest::collection::vec(proptest::collection::vec(0u8..10, w), h)
        })
    }

    #[test]
    fn rotate_is_counter_clockwise() {
        let g = vec![vec![1, 2], vec![3, 4]];
        assert_eq!(rotate(&g, 1), vec![vec![2, 4], vec![1, 3]]);
        assert_eq!(rotate(&g, 2), vec![vec![4, 3], vec![2, 1]]);
    }

    #[test]
    fn rotate_changes_shape() {
        let g = vec![vec![1, 2, 3]];
        assert_eq!(rotate(&g, 1), vec![vec![3], vec![2], vec![1]]);
        assert_eq!(transpose(&g), vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn bg_color_ties_pick_smallest() {
        let g = vec![vec![5, 3], vec![3, 5]];
        assert_eq!(bg_color(&g), 3);
        assert_eq!(bg_color(&vec![]), 0);
        assert_eq!(bg_color(&vec![vec![7, 7, 1]]), 7);
    }

    #[test]
    fn colors_by_frequency_ranks_counts() {
        let g = vec![vec![0, 0, 0, 2], vec![1, 1, 2, 3], vec![0, 1, 0, 0]];
        assert_eq!(colors_by_frequency(&g), vec![0, 1, 2, 3]);
    }

    #[test]
    fn colors_by_frequency_ties_follow_scan_order() {
        let g = vec![vec![2, 1, 0, 0, 0], vec![9, 9, 3, 3, 1]];
        assert_eq!(colors_by_frequency(&g), vec![0, 1, 9, 3, 2]);
        assert!(colors_by_frequency(&vec![]).is_empty());
    }

    #[test]
    fn hamming_counts_and_shape_sentinel() {
        let a = vec![vec![1, 2], vec![3, 4]];
        let b = vec![vec![1, 0], vec![0, 4]];
        assert_eq!(hamming(&a, &b), 2);
        assert_eq!(hamming(&a, &a), 0);
        assert_eq!(hamming(&a, &vec![vec![1, 2]]), MISMATCH);
        assert_eq!(hamming(&a, &transpose(&vec![vec![1, 2, 3], vec![4, 5, 6]])), MISMATCH);
    }

    #[test]
    fn crop_to_bbox_basic() {
        let g = vec![
            vec![0, 0, 0, 0],
            vec![0, 1, 2, 0],
            vec![0, 0, 3, 0],
        ];
        assert_eq!(crop_to_bbox(&g, 0), vec![vec![1, 2], vec![0, 3]]);
        let blank = vec![vec![0, 0], vec![0, 0]];
        assert_eq!(crop_to_bbox(&blank, 0), blank);
    }

    #[test]
    fn pad_center_and_top_left() {
        let g = vec![vec![1]];
        assert_eq!(pad_to(&g, 3, 3, 0, Align::Center)[1], vec![0, 1, 0]);
        assert_eq!(pad_to(&g, 2, 2, 9, Align::TopLeft), vec![vec![1, 9], vec![9, 9]]);
    }

    #[test]
    fn pad_truncates_larger_grid() {
        let g = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
        assert_eq!(pad_to(&g, 2, 2, 0, Align::TopLeft), vec![vec![1, 2], vec![4, 5]]);
        assert_eq!(pad_to(&g, 1, 1, 0, Align::Center), vec![vec![5]]);
        assert_eq!(pad_to(&g, 0, 4, 0, Align::Center), Grid::new());
    }

    #[test]
    fn connected_components_split_by_color() {
        let g = vec![
            vec![1, 1, 2],
            vec![0, 1, 2],
            vec![3, 0, 0],
        ];
        let comps = connected_components(&g, 0);
        assert_eq!(comps.len(), 3);
        assert_eq!(comps[0].color, 1);
        assert_eq!(comps[0].area(), 3);
        assert_eq!(comps[1].color, 2);
        assert_eq!((comps[1].height(), comps[1].width()), (2, 1));
        assert_eq!(comps[2].cells, vec![(2, 0)]);
    }

    #[test]
    fn resize_integer_scale_replicates() {
        let obj = vec![vec![1, 2]];
        let out = resize_integer_scale(&obj, 2, 4, 0);
        assert_eq!(out, vec![vec![1, 1, 2, 2], vec![1, 1, 2, 2]]);
    }

    #[test]
    fn resize_integer_scale_pads_when_short() {
        // 5/2 rounds half-to-even to 2, so the 4x4 result is padded into 5x5
        let out = resize_integer_scale(&vec![vec![1, 2], vec![3, 4]], 5, 5, 0);
        assert_eq!(grid_dimensions(&out), (5, 5));
        assert_eq!(count_foreground(&out, 0), 16);
        assert_eq!(out[0][0], 1);
        assert_eq!(out[3][3], 4);
        assert_eq!(out[4], vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn smallest_tile_finds_period() {
        let g = vec![
            vec![1, 2, 1, 2],
            vec![3, 4, 3, 4],
            vec![1, 2, 1, 2],
            vec![3, 4, 3, 4],
        ];
        assert_eq!(smallest_tile(&g), Some(vec![vec![1, 2], vec![3, 4]]));
        assert_eq!(smallest_tile(&vec![vec![1, 2], vec![3, 4]]), None);
        assert_eq!(smallest_tile(&vec![vec![5, 5, 5]]), Some(vec![vec![5]]));
    }

    #[test]
    fn touches_background_at_edges() {
        let g = vec![vec![1, 1, 1], vec![1, 1, 1], vec![1, 1, 1]];
        assert!(touches_background(&g, 0, 0, 0));
        assert!(!touches_background(&g, 1, 1, 0));
    }

    proptest! {
        #[test]
        fn four_quarter_turns_are_identity(g in arb_grid()) {
            let once = rotate(&g, 1);
            prop_assert_eq!(rotate(&rotate(&rotate(&once, 1), 1), 1), g);
        }

        #[test]
        fn mirrors_are_involutions(g in arb_grid()) {
            prop_assert_eq!(mirror_h(&mirror_h(&g)), g.clone());
            prop_assert_eq!(mirror_v(&mirror_v(&g)), g);
        }

        #[test]
        fn pad_to_always_hits_target_shape(
            g in arb_grid(),
            rows in 0usize..12,
            cols in 0usize..12,
            center in any::<bool>(),
        ) {
            let align = if center { Align::Center } else { Align::TopLeft };
            let out = pad_to(&g, rows, cols, 0, align);
            prop_assert!(has_shape(&out, rows, cols));
        }

        #[test]
        fn smallest_tile_recovers_replicated_tile(
            tile in arb_grid(),
            ry in 1usize..4,
            rx in 1usize..4,
        ) {
            let (th, tw) = grid_dimensions(&tile);
            let tiled = tile_to(&tile, th * ry, tw * rx);
            let found = smallest_tile(&tiled).unwrap_or_else(|| tiled.clone());
            // the detected tile regenerates the replicated grid, and is never larger than the seed tile
            let (fh, fw) = grid_dimensions(&found);
            prop_assert!((fh <= th && fw <= tw) || found == tiled);
            prop_assert_eq!(tile_to(&found, th * ry, tw * rx), tiled);
        }
    }
}
