use serde::{Deserialize, Serialize};

use super::board::{Tile, BOARD_SIZE};

/// 单行数据，0 表示空格。
pub type Row = [Tile; BOARD_SIZE];

/// 单行向左压缩合并后的结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowSlide {
    pub row: Row,
    pub changed: bool,
    /// 本行合并次数。
    pub merges: u8,
    /// 本行合并产生的新数值之和。
    pub gained: u32,
}

/// 向左滑动一行：去掉空格，相邻相等的数字合并一次，右侧补 0。
pub fn slide_row_left(row: &Row) -> RowSlide {
    let mut compacted = [0; BOARD_SIZE];
    let mut len = 0;
    for &tile in row.iter().filter(|tile| **tile != 0) {
        compacted[len] = tile;
        len += 1;
    }

    let mut result = [0; BOARD_SIZE];
    let mut merges = 0;
    let mut gained = 0;
    let mut write = 0;
    let mut read = 0;
    while read < len {
        let tile = compacted[read];
        if read + 1 < len && compacted[read + 1] == tile {
            let merged = tile * 2;
            result[write] = merged;
            merges += 1;
            gained += merged;
            read += 2;
        } else {
            result[write] = tile;
            read += 1;
        }
        write += 1;
    }

    RowSlide {
        row: result,
        changed: merges > 0 || compacted != *row,
        merges,
        gained,
    }
}

/// 向右滑动一行，复用向左的实现。
pub fn slide_row_right(row: &Row) -> RowSlide {
    let mut reversed = *row;
    reversed.reverse();
    let mut slide = slide_row_left(&reversed);
    slide.row.reverse();
    slide
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn random_row(rng: &mut SmallRng) -> Row {
        let mut row = [0; BOARD_SIZE];
        for tile in &mut row {
            *tile = match rng.gen_range(0..5u32) {
                0 => 0,
                exp => 1u32 << exp,
            };
        }
        row
    }

    #[test]
    fn three_equal_tiles_merge_only_the_first_pair() {
        let slide = slide_row_left(&[2, 2, 2, 0]);
        assert_eq!(slide.row, [4, 2, 0, 0]);
        assert!(slide.changed);
        assert_eq!(slide.merges, 1);
        assert_eq!(slide.gained, 4);
    }

    #[test]
    fn empty_row_is_unchanged() {
        let slide = slide_row_left(&[0, 0, 0, 0]);
        assert_eq!(slide.row, [0, 0, 0, 0]);
        assert!(!slide.changed);
        assert_eq!(slide.gained, 0);
    }

    #[test]
    fn gap_is_closed_before_merging() {
        let slide = slide_row_left(&[2, 0, 2, 2]);
        assert_eq!(slide.row, [4, 2, 0, 0]);
        assert!(slide.changed);
    }

    #[test]
    fn compacted_row_without_pairs_is_unchanged() {
        let slide = slide_row_left(&[2, 4, 8, 0]);
        assert_eq!(slide.row, [2, 4, 8, 0]);
        assert!(!slide.changed);
    }

    #[test]
    fn sliding_without_merge_counts_as_change() {
        let slide = slide_row_left(&[0, 0, 4, 8]);
        assert_eq!(slide.row, [4, 8, 0, 0]);
        assert!(slide.changed);
        assert_eq!(slide.merges, 0);
    }

    #[test]
    fn merged_tile_is_not_merged_again() {
        let slide = slide_row_left(&[4, 4, 8, 0]);
        assert_eq!(slide.row, [8, 8, 0, 0]);

        let slide = slide_row_left(&[2, 2, 2, 2]);
        assert_eq!(slide.row, [4, 4, 0, 0]);
        assert_eq!(slide.merges, 2);
        assert_eq!(slide.gained, 8);
    }

    #[test]
    fn right_slide_mirrors_left_slide() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            let row = random_row(&mut rng);
            let mut reversed = row;
            reversed.reverse();
            let mut expected = slide_row_left(&reversed);
            expected.row.reverse();
            assert_eq!(slide_row_right(&row), expected, "row {row:?}");
        }
        assert_eq!(slide_row_right(&[2, 2, 2, 0]).row, [0, 0, 2, 4]);
    }

    #[test]
    fn slide_conserves_sum_and_drops_one_tile_per_merge() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..500 {
            let row = random_row(&mut rng);
            let slide = slide_row_left(&row);
            let sum = |r: &Row| r.iter().sum::<u32>();
            let count = |r: &Row| r.iter().filter(|tile| **tile != 0).count();
            assert_eq!(sum(&row), sum(&slide.row));
            assert_eq!(count(&row) - slide.merges as usize, count(&slide.row));
        }
    }
}
