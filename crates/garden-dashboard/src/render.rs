//! Plain-text rendering of the garden grid

use garden_core::{GardenCell, GardenGrid, RewardLevel};
use std::fmt::Write as _;

/// Render `grid` as rows of `columns` glyphs followed by a legend
///
/// A `columns` of zero is treated as one.
#[must_use]
pub fn render_grid(grid: &GardenGrid, columns: usize) -> String {
    let columns = columns.max(1);
    let mut out = String::new();
    for row in grid.cells().chunks(columns) {
        let line: Vec<&str> = row.iter().map(GardenCell::glyph).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    let _ = writeln!(out, "{} of {} cells grown", grid.earned_count(), grid.len());
    let legend: Vec<String> = [
        RewardLevel::Sprout,
        RewardLevel::Leaf,
        RewardLevel::Flower,
        RewardLevel::Tree,
    ]
    .iter()
    .map(|level| format!("{} {level:?}", level.glyph()))
    .collect();
    let _ = writeln!(out, "⬜ open  {}", legend.join("  "));
    out
}

/// One line per cell: glyph, then the reward title or the suggestion
#[must_use]
pub fn describe_cells(grid: &GardenGrid) -> String {
    let mut out = String::new();
    for (index, cell) in grid.iter().enumerate() {
        let _ = match cell {
            GardenCell::Empty { suggestion } => {
                writeln!(out, "{index:>2} {} {}", cell.glyph(), suggestion.text())
            }
            GardenCell::Earned { title, date, .. } => {
                writeln!(out, "{index:>2} {} {title} ({date})", cell.glyph())
            }
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use garden_core::{AchievementId, Reward};

    #[test]
    fn renders_rows_and_summary() {
        let text = render_grid(&GardenGrid::initial(), 4);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "⬜ ⬜ ⬜ ⬜");
        assert_eq!(lines[4], "0 of 16 cells grown");
    }

    #[test]
    fn earned_cells_show_their_glyph() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let grid = GardenGrid::from_cells(vec![
            Reward::new(RewardLevel::Flower, "5-Day Streak", "five").earn(date),
            GardenCell::empty(AchievementId::StartNewRoutine),
        ]);
        let text = render_grid(&grid, 0);
        assert!(text.starts_with("🌸\n⬜\n1 of 2 cells grown"));

        let described = describe_cells(&grid);
        assert!(described.contains(" 0 🌸 5-Day Streak (2024-05-01)"));
        assert!(described.contains(" 1 ⬜ Start a new routine"));
    }
}
