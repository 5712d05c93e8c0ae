//! Renderable console content
//!
//! Everything the console prints goes through [`Render`], which turns content
//! into lines for a given width and color mode. Layout (table columns, rules,
//! tab stops) is computed from display width, so it is identical whether the
//! result ends up on a terminal or in a capture buffer.

use console::{Alignment, StyledObject, measure_text_width, pad_str, style, truncate_str};
use std::fmt::Display;

/// How content should be laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Line width available for rules and tables
    pub width: usize,
    /// Emit ANSI styling
    pub color: bool,
    /// Columns per tab stop
    pub tab_size: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            color: false,
            tab_size: 4,
        }
    }
}

/// Content that can be printed on a console
pub trait Render {
    /// Render without a trailing newline
    fn render(&self, options: &RenderOptions) -> String;
}

impl Render for str {
    fn render(&self, options: &RenderOptions) -> String {
        expand_tabs(self, options.tab_size)
    }
}

impl Render for String {
    fn render(&self, options: &RenderOptions) -> String {
        self.as_str().render(options)
    }
}

impl<D: Display + Clone> Render for StyledObject<D> {
    fn render(&self, options: &RenderOptions) -> String {
        let text = self.clone().force_styling(options.color).to_string();
        expand_tabs(&text, options.tab_size)
    }
}

/// Expand tab characters to the next tab stop, line by line
pub fn expand_tabs(text: &str, tab_size: usize) -> String {
    if !text.contains('\t') || tab_size == 0 {
        return text.to_string();
    }

    let mut expanded = String::with_capacity(text.len());
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            expanded.push('\n');
        }
        let mut column = 0;
        for segment in line.split_inclusive('\t') {
            match segment.strip_suffix('\t') {
                Some(head) => {
                    column += measure_text_width(head);
                    let pad = tab_size - (column % tab_size);
                    expanded.push_str(head);
                    expanded.push_str(&" ".repeat(pad));
                    column += pad;
                }
                None => {
                    column += measure_text_width(segment);
                    expanded.push_str(segment);
                }
            }
        }
    }
    expanded
}

/// Horizontal line across the full width, with an optional centered title
#[derive(Debug, Clone, Default)]
pub struct Rule {
    title: Option<String>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

impl Render for Rule {
    fn render(&self, options: &RenderOptions) -> String {
        let width = options.width.max(1);
        let Some(title) = &self.title else {
            return style("─".repeat(width))
                .dim()
                .force_styling(options.color)
                .to_string();
        };

        let label = format!(" {} ", title);
        let label_width = measure_text_width(&label);
        if label_width + 2 > width {
            return truncate_str(&label, width, "…").into_owned();
        }

        let left = (width - label_width) / 2;
        let right = width - label_width - left;
        format!(
            "{}{}{}",
            style("─".repeat(left)).dim().force_styling(options.color),
            style(label).bold().force_styling(options.color),
            style("─".repeat(right)).dim().force_styling(options.color),
        )
    }
}

/// Column-aligned table with a header row
#[derive(Debug, Clone, Default)]
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

const COLUMN_GAP: &str = "  ";
const MIN_LAST_COLUMN: usize = 8;

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: None,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a row; missing cells render empty, extra cells are dropped
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self, total: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|header| measure_text_width(header))
            .collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(measure_text_width(cell));
            }
        }

        // Only the last column gives way when the table is wider than the line
        if let Some((last, leading)) = widths.split_last_mut() {
            let fixed: usize = leading.iter().sum::<usize>() + COLUMN_GAP.len() * leading.len();
            let available = total.saturating_sub(fixed).max(MIN_LAST_COLUMN);
            *last = (*last).min(available);
        }
        widths
    }

    fn render_row(cells: &[String], widths: &[usize]) -> String {
        let last = widths.len().saturating_sub(1);
        let line = cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(index, (cell, width))| {
                if index == last {
                    truncate_str(cell, *width, "…").into_owned()
                } else {
                    pad_str(cell, *width, Alignment::Left, Some("…")).into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        line.trim_end().to_string()
    }
}

impl Render for Table {
    fn render(&self, options: &RenderOptions) -> String {
        let widths = self.column_widths(options.width);
        let mut lines = Vec::with_capacity(self.rows.len() + 3);

        if let Some(title) = &self.title {
            lines.push(style(title).bold().force_styling(options.color).to_string());
        }

        let header = Self::render_row(&self.headers, &widths);
        lines.push(style(header).bold().force_styling(options.color).to_string());

        let underline = widths
            .iter()
            .map(|width| "─".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        lines.push(style(underline).dim().force_styling(options.color).to_string());

        for row in &self.rows {
            lines.push(expand_tabs(&Self::render_row(row, &widths), options.tab_size));
        }

        lines.join("\n")
    }
}
