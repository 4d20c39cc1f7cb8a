//! Task tables and progress bars for the terminal.

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

use crate::config::DEFAULT_DATE_FORMAT;
use crate::task::{FilteredView, Task};

pub const DONE_GLYPH: &str = "✓";
pub const PENDING_GLYPH: &str = "○";

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Number,
    Name,
    Hash,
    AddedOn,
    Status,
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Right,
    Center,
}

/// Cell text plus the task status it shows, if any.
struct Cell {
    text: String,
    status: Option<bool>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: None,
        }
    }

    fn painted(&self) -> ColoredString {
        let text = self.text.as_str();
        match self.status {
            Some(true) => text.green().bold(),
            Some(false) => text.red().bold(),
            None => text.normal(),
        }
    }
}

impl Column {
    pub fn title(self) -> &'static str {
        match self {
            Column::Number => "No.",
            Column::Name => "Name",
            Column::Hash => "Hash",
            Column::AddedOn => "Added On",
            Column::Status => "Status",
        }
    }

    fn align(self) -> Align {
        match self {
            Column::Number => Align::Right,
            Column::Name => Align::Left,
            _ => Align::Center,
        }
    }

    fn cell(self, index: usize, task: &Task, config: &DisplayConfig) -> Cell {
        match self {
            Column::Number => Cell::plain((index + 1).to_string()),
            Column::Name => Cell::plain(task.name()),
            Column::Hash => Cell::plain(task.fingerprint().short()),
            Column::AddedOn => Cell::plain(format_added_on(task, &config.date_format)),
            Column::Status => {
                let glyph = if task.status() {
                    &config.done_glyph
                } else {
                    &config.pending_glyph
                };
                Cell {
                    text: glyph.clone(),
                    status: Some(task.status()),
                }
            }
        }
    }
}

/// Format the creation time, falling back to RFC 3339 when `format` cannot
/// display a date.
fn format_added_on(task: &Task, format: &str) -> String {
    let mut text = String::new();
    if write!(text, "{}", task.added_on().format(format)).is_err() {
        tracing::warn!(format, "date format cannot display timestamps");
        return task.added_on().to_rfc3339();
    }
    text
}

/// What the table shows and how.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub columns: Vec<Column>,
    pub done_glyph: String,
    pub pending_glyph: String,
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: vec![
                Column::Number,
                Column::Name,
                Column::Hash,
                Column::AddedOn,
                Column::Status,
            ],
            done_glyph: DONE_GLYPH.to_string(),
            pending_glyph: PENDING_GLYPH.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Terminal columns taken by `text`.
fn width_of(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn pad(cell: &Cell, width: usize, align: Align) -> String {
    let gap = width.saturating_sub(width_of(&cell.text));
    let text = cell.painted();
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(gap)),
        Align::Right => format!("{}{}", " ".repeat(gap), text),
        Align::Center => {
            let left = gap / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
        }
    }
}

/// Render `view` as a table. Returns `None` when the view has no rows.
///
/// Task numbers are shown 1-based and keep their position in the full list,
/// so a filtered table can be used to pick ids for other commands.
pub fn render_table(view: &FilteredView<'_>, config: &DisplayConfig) -> Option<String> {
    let rows: Vec<Vec<Cell>> = view
        .iter()
        .map(|(index, task)| {
            config
                .columns
                .iter()
                .map(|column| column.cell(index, task, config))
                .collect()
        })
        .collect();
    if rows.is_empty() {
        return None;
    }

    let widths: Vec<usize> = config
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| width_of(&row[i].text))
                .chain(std::iter::once(width_of(column.title())))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: Vec<Cell>| -> String {
        cells
            .iter()
            .zip(&config.columns)
            .zip(&widths)
            .map(|((cell, column), width)| format!(" {} ", pad(cell, *width, column.align())))
            .collect::<Vec<_>>()
            .join("│")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(
        config.columns.iter().map(|c| Cell::plain(c.title())).collect(),
    ));
    lines.push(
        widths
            .iter()
            .map(|width| "─".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("┼"),
    );
    lines.extend(rows.into_iter().map(format_row));

    Some(lines.join("\n"))
}

/// A completion bar such as `━━━━━━──────── 3/7`, drawn to `target`.
///
/// The bar is left at `done`; call `abandon()` to keep it on screen.
pub fn progress_bar(
    done: usize,
    total: usize,
    width: usize,
    target: ProgressDrawTarget,
) -> ProgressBar {
    let template = format!("{{bar:{}.green/red}} {{pos}}/{{len}}", width);
    let style = ProgressStyle::with_template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━─");
    let bar = ProgressBar::with_draw_target(Some(total as u64), target).with_style(style);
    bar.set_position(done.min(total) as u64);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Filter, TaskList};

    fn sample() -> TaskList<'static> {
        let mut list = TaskList::new(vec![
            Task::new("Buy milk").unwrap(),
            Task::new("Walk the dog").unwrap(),
        ]);
        list.set_status_at(1, true).unwrap();
        list
    }

    #[test]
    fn empty_view_renders_nothing() {
        let list = TaskList::new(Vec::new());
        let view = list.filtered_view(Filter::All);
        assert!(render_table(&view, &DisplayConfig::default()).is_none());
    }

    #[test]
    fn table_has_header_rule_and_rows() {
        let list = sample();
        let table = render_table(&list.filtered_view(Filter::All), &DisplayConfig::default())
            .expect("rows");
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("No."));
        assert!(lines[0].contains("Added On"));
        assert!(lines[1].starts_with('─'));
        assert!(lines[2].contains("Buy milk"));
        assert!(lines[2].contains(PENDING_GLYPH));
        assert!(lines[3].contains("Walk the dog"));
        assert!(lines[3].contains(DONE_GLYPH));
        assert!(lines[2].contains(&Task::new("Buy milk").unwrap().fingerprint().short().to_string()));
    }

    #[test]
    fn filtered_table_keeps_list_numbers() {
        let list = sample();
        let config = DisplayConfig {
            columns: vec![Column::Number, Column::Name],
            ..DisplayConfig::default()
        };
        let table = render_table(&list.filtered_view(Filter::Done), &config).expect("rows");
        let last = table.lines().last().unwrap();
        assert!(last.trim_start().starts_with("2 "));
        assert!(last.contains("Walk the dog"));
        assert!(!table.contains("Buy milk"));
    }

    #[test]
    fn columns_are_aligned() {
        let list = sample();
        let config = DisplayConfig {
            columns: vec![Column::Name, Column::Status],
            ..DisplayConfig::default()
        };
        let table = render_table(&list.filtered_view(Filter::All), &config).expect("rows");
        let positions: Vec<usize> = table
            .lines()
            .filter(|line| !line.starts_with('─'))
            .map(|line| line.chars().position(|c| c == '│').unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn status_cells_are_coloured() {
        let done = Cell {
            text: DONE_GLYPH.to_string(),
            status: Some(true),
        }
        .painted();
        assert_eq!(done.fgcolor(), Some(colored::Color::Green));
        assert!(done.style().contains(colored::Styles::Bold));

        let pending = Cell {
            text: PENDING_GLYPH.to_string(),
            status: Some(false),
        }
        .painted();
        assert_eq!(pending.fgcolor(), Some(colored::Color::Red));
        assert!(Cell::plain("Buy milk").painted().fgcolor().is_none());
    }

    #[test]
    fn wide_names_keep_columns_aligned() {
        let list = TaskList::new(vec![
            Task::new("牛奶牛奶").unwrap(),
            Task::new("Buy milk").unwrap(),
        ]);
        let config = DisplayConfig {
            columns: vec![Column::Name, Column::Hash],
            ..DisplayConfig::default()
        };
        let table = render_table(&list.filtered_view(Filter::All), &config).expect("rows");
        let offsets: Vec<usize> = table
            .lines()
            .filter(|line| !line.starts_with('─'))
            .map(|line| width_of(&line[..line.find('│').unwrap()]))
            .collect();
        assert_eq!(offsets.len(), 3);
        assert!(offsets.windows(2).all(|w| w[0] == w[1]), "{offsets:?}");
        assert_eq!(width_of("牛奶牛奶"), 8);
    }

    #[test]
    fn parse_only_date_format_does_not_panic() {
        let list = sample();
        let config = DisplayConfig {
            columns: vec![Column::Name, Column::AddedOn],
            date_format: "%#z".to_string(),
            ..DisplayConfig::default()
        };
        let table = render_table(&list.filtered_view(Filter::All), &config).expect("rows");
        let added_on = list.get(0).unwrap().added_on().to_rfc3339();
        assert!(table.contains(&added_on));
    }

    #[test]
    fn progress_bar_tracks_done_and_total() {
        let bar = progress_bar(1, 2, 10, ProgressDrawTarget::hidden());
        assert_eq!(bar.position(), 1);
        assert_eq!(bar.length(), Some(2));

        let bar = progress_bar(5, 3, 10, ProgressDrawTarget::hidden());
        assert_eq!(bar.position(), 3);
        bar.abandon();
        assert!(bar.is_finished());
    }
}
