//! Text rendering of grid outlines for the terminal

use console::Style;
use datagridlib::GridOutline;

/// Widest label column before truncation
const MAX_LABEL_WIDTH: usize = 48;

/// Truncate a label to fit within max_len, adding ".." suffix if needed
fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() > max_len {
        let kept: String = label.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", kept)
    } else {
        label.to_string()
    }
}

/// Render an outline as an aligned text table
pub fn render_outline(outline: &GridOutline) -> String {
    let aggregate_style = Style::new().bold();
    let title_style = Style::new().bold().underlined();
    let footer_style = Style::new().dim();

    let labels: Vec<String> = outline
        .rows
        .iter()
        .map(|row| truncate_label(&row.indented_label(), MAX_LABEL_WIDTH))
        .collect();
    let label_width = labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(outline.headers.get(2).map_or(0, |h| h.len()));
    let index_width = outline
        .rows
        .iter()
        .map(|row| row.index.to_string().len())
        .max()
        .unwrap_or(0)
        .max(3);

    let mut out = String::new();
    if let Some(ref title) = outline.title {
        out.push_str(&title_style.apply_to(title).to_string());
        out.push('\n');
    }

    out.push_str(&format!(
        "{:>iw$}  {:>5}  {:<lw$}  {}\n",
        outline.headers.first().map_or("", String::as_str),
        outline.headers.get(1).map_or("", String::as_str),
        outline.headers.get(2).map_or("", String::as_str),
        outline.headers.get(3).map_or("", String::as_str),
        iw = index_width,
        lw = label_width,
    ));
    out.push_str(&"-".repeat(index_width + label_width + 16));
    out.push('\n');

    for (row, label) in outline.rows.iter().zip(&labels) {
        let padding = " ".repeat(label_width - label.chars().count());
        let label = if row.aggregate {
            aggregate_style.apply_to(label).to_string()
        } else {
            label.clone()
        };
        let line = format!(
            "{:>iw$}  {:>5}  {}{}  {}",
            row.index,
            row.level,
            label,
            padding,
            row.values.join("  "),
            iw = index_width,
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&footer_style.apply_to(&outline.footer).to_string());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagridlib::{Grid, GridStyle, Row};

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("a very long label", 8), "a very..");
    }

    #[test]
    fn test_render_outline() {
        console::set_colors_enabled(false);
        let grid = Grid::build(
            vec![
                Row::with_cells(1, vec!["Smith".to_string(), "28.5".to_string()]),
                Row::with_cells(0, vec!["Bob".to_string(), "32".to_string()]),
            ],
            &GridStyle::new(),
        );
        let text = render_outline(&GridOutline::from_grid(&grid).title("people"));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "people");
        assert!(lines[1].contains("Label"));
        assert!(lines[3].contains("▾ Smith"));
        assert!(lines[3].ends_with("28.5"));
        assert!(lines[4].contains("    Bob"));
        assert_eq!(lines[5], "2 rows (0 hidden)");
    }
}
