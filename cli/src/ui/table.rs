//! Column-aligned text tables

use colored::{Color, Colorize};

const COLUMN_GAP: &str = "  ";

/// A table cell, optionally coloured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub color: Option<Color>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }

    fn render(&self, width: usize) -> String {
        let padded = format!("{:<width$}", self.text, width = width);
        match self.color {
            Some(color) => padded.color(color).to_string(),
            None => padded,
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::new(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::new(text)
    }
}

/// A table with a header row.
///
/// Column widths come from the uncoloured text so escape codes never skew
/// alignment.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        (0..columns)
            .map(|i| {
                let header = self.headers.get(i).map_or(0, |h| h.chars().count());
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(Cell::width)
                    .fold(header, usize::max)
            })
            .collect()
    }

    /// Render the table, one line per row
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", h.to_uppercase(), w = *w).bold().to_string())
            .collect();
        lines.push(header.join(COLUMN_GAP).trim_end().to_string());

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| cell.render(*w))
                .collect();
            lines.push(cells.join(COLUMN_GAP).trim_end().to_string());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        colored::control::set_override(false);

        let mut table = Table::new(["Name", "Rev"]);
        table.add_row(vec![Cell::new("a"), Cell::new("10")]);
        table.add_row(vec![Cell::colored("longer", Color::Green), Cell::new("2")]);

        let rendered = table.render();

        assert_eq!(rendered, "NAME    REV\na       10\nlonger  2");
    }

    #[test]
    fn test_render_handles_ragged_rows() {
        colored::control::set_override(false);

        let mut table = Table::new(["A"]);
        table.add_row(vec![Cell::new("x"), Cell::new("extra")]);

        assert_eq!(table.render(), "A\nx  extra");
    }
}
