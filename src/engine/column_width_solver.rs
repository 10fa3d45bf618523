//! Partitions a container width across fixed/flex/auto column specs.

use crate::model::{Column, WidthSpec};

/// One pixel width per input column, in input order.
pub fn solve(columns: &[Column], container_width: u32) -> Vec<u32> {
    let fixed_total: u32 = columns
        .iter()
        .filter_map(|c| match c.width {
            Some(WidthSpec::Fixed(w)) => Some(w.max(c.min_width)),
            _ => None,
        })
        .sum();

    let flex_total: u32 = columns
        .iter()
        .filter_map(|c| match c.width {
            Some(WidthSpec::Flex(weight)) => Some(weight),
            _ => None,
        })
        .sum();

    let remaining = container_width.saturating_sub(fixed_total);
    let auto_count = columns
        .iter()
        .filter(|c| matches!(c.width, None | Some(WidthSpec::Auto)))
        .count();

    // Flex columns are sized before auto columns split whatever flex left
    // behind, mirroring CSS grid's fr-then-auto precedence.
    let flex_share_base = remaining;
    let auto_share = if auto_count > 0 && flex_total == 0 {
        remaining / auto_count as u32
    } else if auto_count > 0 {
        0
    } else {
        0
    };

    columns
        .iter()
        .map(|c| match c.width {
            Some(WidthSpec::Fixed(w)) => w.max(c.min_width),
            Some(WidthSpec::Flex(weight)) => {
                if flex_total == 0 {
                    c.min_width
                } else {
                    let share = (flex_share_base as u64 * weight as u64 / flex_total as u64) as u32;
                    share.max(c.min_width)
                }
            }
            None | Some(WidthSpec::Auto) => {
                if flex_total > 0 {
                    c.min_width
                } else {
                    auto_share.max(c.min_width)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_columns_are_honored_and_clamped_to_min_width() {
        let cols = vec![Column::new("a", "A").width(WidthSpec::Fixed(10)).min_width(50)];
        assert_eq!(solve(&cols, 500), vec![50]);
    }

    #[test]
    fn flex_columns_split_remaining_space_by_weight() {
        let cols = vec![
            Column::new("a", "A").width(WidthSpec::Flex(1)).min_width(0),
            Column::new("b", "B").width(WidthSpec::Flex(3)).min_width(0),
        ];
        assert_eq!(solve(&cols, 400), vec![100, 300]);
    }

    #[test]
    fn auto_columns_split_leftover_evenly() {
        let cols = vec![
            Column::new("a", "A").min_width(0),
            Column::new("b", "B").min_width(0),
        ];
        assert_eq!(solve(&cols, 200), vec![100, 100]);
    }

    #[test]
    fn mixed_fixed_and_auto() {
        let cols = vec![
            Column::new("a", "A").width(WidthSpec::Fixed(100)).min_width(0),
            Column::new("b", "B").min_width(0),
            Column::new("c", "C").min_width(0),
        ];
        assert_eq!(solve(&cols, 300), vec![100, 100, 100]);
    }
}
