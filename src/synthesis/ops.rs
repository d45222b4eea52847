// Operator catalog: sixteen fixed grid transformations sharing one signature,
// (grid, target rows, target cols, training examples) -> grid of that shape.
//
// Operators that need no training data ignore the examples argument. An
// operator that cannot handle its input reports `Inapplicable` instead of
// panicking; the candidate generator drops those.

use std::fmt;

use rustc_hash::FxHashMap;

use super::dsl::{
    bg_color, connected_components, count_foreground, crop_to_bbox, grid_dimensions, is_empty_grid,
    majority_color, mirror_h, mirror_v, pad_to, colors_by_frequency, resize_integer_scale, rotate,
    smallest_tile, sub_grid, tile_to, touches_background, transpose, Align, Grid,
};
use crate::core::{Inapplicable, OpResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Op {
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
    MirrorH,
    MirrorV,
    Transpose,
    CropCenterPad,
    RecolorLearned,
    LargestCcCenter,
    IntegerResizeFg,
    MajorityFill,
    CompleteByReflection,
    ProjectRowsOrCols,
    TileSmallestPatch,
    OutlineCc,
}

impl Op {
    /// Catalog order. Candidate enumeration and tie-breaks follow it.
    pub const ALL: [Op; 16] = [
        Op::Identity,
        Op::Rotate90,
        Op::Rotate180,
        Op::Rotate270,
        Op::MirrorH,
        Op::MirrorV,
        Op::Transpose,
        Op::CropCenterPad,
        Op::RecolorLearned,
        Op::LargestCcCenter,
        Op::IntegerResizeFg,
        Op::MajorityFill,
        Op::CompleteByReflection,
        Op::ProjectRowsOrCols,
        Op::TileSmallestPatch,
        Op::OutlineCc,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Op::Identity => "op_identity",
            Op::Rotate90 => "op_rotate90",
            Op::Rotate180 => "op_rotate180",
            Op::Rotate270 => "op_rotate270",
            Op::MirrorH => "op_mirror_h",
            Op::MirrorV => "op_mirror_v",
            Op::Transpose => "op_transpose",
            Op::CropCenterPad => "op_crop_center_pad",
            Op::RecolorLearned => "op_recolor_learned",
            Op::LargestCcCenter => "op_largest_cc_center",
            Op::IntegerResizeFg => "op_integer_resize_fg",
            Op::MajorityFill => "op_majority_fill",
            Op::CompleteByReflection => "op_complete_by_reflection",
            Op::ProjectRowsOrCols => "op_project_rows_or_cols",
            Op::TileSmallestPatch => "op_tile_smallest_patch",
            Op::OutlineCc => "op_outline_cc",
        }
    }

    pub fn apply(&self, grid: &Grid, rows: usize, cols: usize, examples: &[(Grid, Grid)]) -> OpResult<Grid> {
        if is_empty_grid(grid) {
            return Err(Inapplicable::EmptyGrid);
        }
        let out = match self {
            Op::Identity => pad_center(grid, rows, cols),
            Op::Rotate90 => pad_like(&rotate(grid, 1), grid, rows, cols),
            Op::Rotate180 => pad_like(&rotate(grid, 2), grid, rows, cols),
            Op::Rotate270 => pad_like(&rotate(grid, 3), grid, rows, cols),
            Op::MirrorH => pad_like(&mirror_h(grid), grid, rows, cols),
            Op::MirrorV => pad_like(&mirror_v(grid), grid, rows, cols),
            Op::Transpose => pad_like(&transpose(grid), grid, rows, cols),
            Op::CropCenterPad => crop_center_pad(grid, rows, cols),
            Op::RecolorLearned => recolor_learned(grid, rows, cols, examples),
            Op::LargestCcCenter => largest_cc_center(grid, rows, cols),
            Op::IntegerResizeFg => integer_resize_fg(grid, rows, cols),
            Op::MajorityFill => majority_fill(grid, rows, cols),
            Op::CompleteByReflection => complete_by_reflection(grid, rows, cols),
            Op::ProjectRowsOrCols => project_rows_or_cols(grid, rows, cols),
            Op::TileSmallestPatch => tile_smallest_patch(grid, rows, cols),
            Op::OutlineCc => outline_cc(grid, rows, cols),
        };
        Ok(out)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn pad_center(grid: &Grid, rows: usize, cols: usize) -> Grid {
    pad_to(grid, rows, cols, bg_color(grid), Align::Center)
}

/// Pad a transformed grid using the background of the grid it came from.
fn pad_like(transformed: &Grid, source: &Grid, rows: usize, cols: usize) -> Grid {
    pad_to(transformed, rows, cols, bg_color(source), Align::Center)
}

fn crop_center_pad(grid: &Grid, rows: usize, cols: usize) -> Grid {
    let bg = bg_color(grid);
    pad_to(&crop_to_bbox(grid, bg), rows, cols, bg, Align::Center)
}

/// Color map learned from rank agreement: in every training pair, the i-th
/// most frequent non-background input color maps to the i-th most frequent
/// non-background output color, and background maps to background. Frequency
/// ties are broken by first appearance in a row-major scan, and the
/// background here is the first-ranked color. Later pairs overwrite earlier
/// ones.
pub fn learn_rank_color_map(examples: &[(Grid, Grid)]) -> FxHashMap<u8, u8> {
    let mut mapping: FxHashMap<u8, u8> = FxHashMap::default();
    for (input, output) in examples {
        let in_ranked = colors_by_frequency(input);
        let out_ranked = colors_by_frequency(output);
        let (Some((&bg_in, in_rest)), Some((&bg_out, out_rest))) =
            (in_ranked.split_first(), out_ranked.split_first())
        else {
            continue;
        };
        for (&from, &to) in in_rest.iter().zip(out_rest.iter()) {
            mapping.insert(from, to);
        }
        mapping.insert(bg_in, bg_out);
    }
    mapping
}

/// Substitute every cell through `map`; unmapped colors are kept.
pub fn apply_color_map(grid: &Grid, map: &FxHashMap<u8, u8>) -> Grid {
    grid.iter().map(|row| {
        row.iter().map(|&c| *map.get(&c).unwrap_or(&c)).collect()
    }).collect()
}

fn recolor_learned(grid: &Grid, rows: usize, cols: usize, examples: &[(Grid, Grid)]) -> Grid {
    let recolored = apply_color_map(grid, &learn_rank_color_map(examples));
    pad_center(&recolored, rows, cols)
}

fn largest_cc_center(grid: &Grid, rows: usize, cols: usize) -> Grid {
    let bg = bg_color(grid);
    let largest = connected_components(grid, bg)
        .into_iter()
        .reduce(|best, o| if o.area() > best.area() { o } else { best });
    match largest {
        Some(obj) => {
            let patch = sub_grid(grid, obj.min_r, obj.min_c, obj.height(), obj.width());
            pad_to(&patch, rows, cols, bg, Align::Center)
        }
        None => pad_to(grid, rows, cols, bg, Align::Center),
    }
}

fn integer_resize_fg(grid: &Grid, rows: usize, cols: usize) -> Grid {
    let bg = bg_color(grid);
    resize_integer_scale(&crop_to_bbox(grid, bg), rows, cols, bg)
}

// Majority is taken over the padded canvas, which almost always makes it the
// background again; the operator is then a plain pad.
fn majority_fill(grid: &Grid, rows: usize, cols: usize) -> Grid {
    let bg = bg_color(grid);
    let mut out = pad_to(grid, rows, cols, bg, Align::Center);
    let maj = majority_color(&out);
    for cell in out.iter_mut().flat_map(|row| row.iter_mut()) {
        if *cell == bg {
            *cell = maj;
        }
    }
    out
}

fn count_region(grid: &Grid, r0: usize, r1: usize, c0: usize, c1: usize, bg: u8) -> usize {
    count_foreground(&sub_grid(grid, r0, c0, r1 - r0, c1 - c0), bg)
}

fn complete_by_reflection(grid: &Grid, rows: usize, cols: usize) -> Grid {
    let bg = bg_color(grid);
    let a = pad_to(grid, rows, cols, bg, Align::Center);
    let mut out = a.clone();
    let hw = cols / 2;
    let hh = rows / 2;

    let left = count_region(&a, 0, rows, 0, hw, bg);
    let right = count_region(&a, 0, rows, cols - hw, cols, bg);
    if right < left / 4 {
        for r in 0..rows {
            for j in 0..hw {
                out[r][cols - hw + j] = a[r][hw - 1 - j];
            }
        }
        return out;
    }
    if left < right / 4 {
        for r in 0..rows {
            for j in 0..hw {
                out[r][j] = a[r][cols - 1 - j];
            }
        }
        return out;
    }

    let top = count_region(&a, 0, hh, 0, cols, bg);
    let bottom = count_region(&a, rows - hh, rows, 0, cols, bg);
    if bottom < top / 4 {
        for i in 0..hh {
            out[rows - hh + i] = a[hh - 1 - i].clone();
        }
        return out;
    }
    if top < bottom / 4 {
        for i in 0..hh {
            out[i] = a[rows - 1 - i].clone();
        }
    }
    out
}

/// Most repeated line, first-seen on ties.
fn dominant_line(lines: Vec<Vec<u8>>) -> Option<(Vec<u8>, usize)> {
    let mut tally: Vec<(Vec<u8>, usize)> = Vec::new();
    for line in lines {
        match tally.iter_mut().find(|(l, _)| *l == line) {
            Some((_, n)) => *n += 1,
            None => tally.push((line, 1)),
        }
    }
    tally.into_iter().reduce(|best, t| if t.1 > best.1 { t } else { best })
}

fn project_rows_or_cols(grid: &Grid, rows: usize, cols: usize) -> Grid {
    let a = pad_center(grid, rows, cols);
    if let Some((row, n)) = dominant_line(a.clone()) {
        if n >= rows / 2 {
            return vec![row; rows];
        }
    }
    if let Some((col, n)) = dominant_line(transpose(&a)) {
        if n >= cols / 2 {
            return (0..rows).map(|r| vec![col[r]; cols]).collect();
        }
    }
    a
}

// Without a proper sub-period the whole grid is its own tile.
fn tile_smallest_patch(grid: &Grid, rows: usize, cols: usize) -> Grid {
    match smallest_tile(grid) {
        Some(tile) => tile_to(&tile, rows, cols),
        None => tile_to(grid, rows, cols),
    }
}

fn outline_cc(grid: &Grid, rows: usize, cols: usize) -> Grid {
    let bg = bg_color(grid);
    let a = pad_to(grid, rows, cols, bg, Align::Center);
    let (h, w) = grid_dimensions(&a);
    let mut out = vec![vec![bg; cols]; rows];
    for r in 0..h {
        for c in 0..w {
            if a[r][c] != bg && touches_background(&a, r, c, bg) {
                out[r][c] = a[r][c];
            }
        }
    }
    out
}
