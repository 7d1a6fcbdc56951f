//! Properties of the cell walk and of highlight style reuse

use proptest::prelude::*;
use sheetdiff::prelude::*;
use sheetdiff::{diff_grids, FormatPolicy, StyleCache, StyleResolver};
use sheetdiff_core::Style;
use std::collections::BTreeSet;

/// Ragged rows of short texts drawn from a small alphabet so that equal
/// cells are common
fn grid_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(vec!["", "a", "b", "1"]), 0..6),
        0..8,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect()
    })
}

fn brute_force_count(a: &Grid, b: &Grid) -> usize {
    let rows = a.row_count().max(b.row_count());
    let cols = a.max_column_count().max(b.max_column_count());
    let mut count = 0;
    for r in 0..rows {
        for c in 0..cols {
            if a.value_at(r, c) != b.value_at(r, c) {
                count += 1;
            }
        }
    }
    count
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn diff_count_matches_cell_by_cell_check(a in grid_rows(), b in grid_rows()) {
        let a = Grid::from_rows(a);
        let b = Grid::from_rows(b);
        prop_assert_eq!(diff_grids(&a, &b).count(), brute_force_count(&a, &b));
    }

    #[test]
    fn swapped_inputs_differ_at_same_cells(a in grid_rows(), b in grid_rows()) {
        let a = Grid::from_rows(a);
        let b = Grid::from_rows(b);

        let forward: BTreeSet<_> = diff_grids(&a, &b)
            .map(|d| (d.address, d.old_value, d.new_value))
            .collect();
        let backward: BTreeSet<_> = diff_grids(&b, &a)
            .map(|d| (d.address, d.new_value, d.old_value))
            .collect();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn highlight_styles_bounded_by_source_styles(handles in prop::collection::vec(0usize..4, 0..40)) {
        let mut source = Workbook::new();
        let palette: Vec<_> = [8.0, 10.0, 12.0, 14.0]
            .iter()
            .map(|size| source.register_style(Style::new().font_size(*size)))
            .collect();

        let mut output = Workbook::new();
        let before = output.style_count();
        let resolver =
            StyleResolver::new(FormatPolicy::Preserve, Color::YELLOW, &source, &mut output);
        let mut cache = StyleCache::new();

        let mut seen = BTreeSet::new();
        for i in &handles {
            seen.insert(palette[*i]);
            resolver.resolve(Some(palette[*i]), &mut output, &mut cache);
        }

        prop_assert!(output.style_count() - before <= seen.len() + 1);
        prop_assert_eq!(cache.len(), seen.len());
    }
}
