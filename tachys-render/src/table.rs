//! Plain text, Markdown and HTML tables

use std::fmt::{self, Write};
use std::io::Write as _;
use std::str::FromStr;

use tabwriter::TabWriter;

use crate::RenderError;

/// Output format of a [`Table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Space aligned columns with a dashed header rule, left aligned
    #[default]
    Simple,
    /// GitHub flavoured Markdown
    Markdown,
    Html,
}

impl FromStr for TableFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(TableFormat::Simple),
            "markdown" | "md" => Ok(TableFormat::Markdown),
            "html" => Ok(TableFormat::Html),
            other => Err(RenderError::UnknownFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableFormat::Simple => "simple",
            TableFormat::Markdown => "markdown",
            TableFormat::Html => "html",
        })
    }
}

/// Table cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    /// Numeric cells are right aligned in Markdown and HTML
    pub numeric: bool,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            numeric: false,
        }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            numeric: true,
        }
    }

    pub fn empty() -> Self {
        Self::text("")
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::text(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::text(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Table with a header row
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

    /// Append a row, padded or truncated to the header width
    pub fn push_row(&mut self, row: impl IntoIterator<Item = Cell>) {
        let mut row: Vec<Cell> = row.into_iter().collect();
        row.resize_with(self.headers.len(), Cell::empty);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// A column is numeric if every non-empty cell is
    fn alignments(&self) -> Vec<Align> {
        (0..self.headers.len())
            .map(|col| {
                let mut cells = self.rows.iter().map(|row| &row[col]).filter(|c| !c.text.is_empty());
                let mut any = false;
                let numeric = cells.all(|c| {
                    any = true;
                    c.numeric
                });
                if numeric && any {
                    Align::Right
                } else {
                    Align::Left
                }
            })
            .collect()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .map(|row| row[col].text.chars().count())
                    .chain([header.chars().count()])
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self, format: TableFormat) -> Result<String, RenderError> {
        match format {
            TableFormat::Simple => self.render_simple(),
            TableFormat::Markdown => Ok(self.render_markdown()),
            TableFormat::Html => Ok(self.render_html()),
        }
    }

    /// Tab separated cells aligned by [`TabWriter`], with a dashed header rule
    fn render_simple(&self) -> Result<String, RenderError> {
        let rule: Vec<String> = self.widths().iter().map(|&w| "-".repeat(w)).collect();

        let mut tw = TabWriter::new(Vec::new()).padding(2);
        tw.write_all(format!("{}\n", self.headers.join("\t")).as_bytes())?;
        tw.write_all(format!("{}\n", rule.join("\t")).as_bytes())?;
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(|c| c.text.as_str()).collect();
            tw.write_all(format!("{}\n", cells.join("\t")).as_bytes())?;
        }
        tw.flush()?;

        let bytes = tw
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(text.lines().map(|line| format!("{}\n", line.trim_end())).collect())
    }

    fn render_markdown(&self) -> String {
        let widths = self.widths();
        let aligns = self.alignments();
        let mut out = String::new();

        let escape = |text: &str| text.replace('|', "\\|");
        let header: Vec<String> = self
            .headers
            .iter()
            .zip(widths.iter().zip(&aligns))
            .map(|(h, (&w, a))| pad(&escape(h), w, *a))
            .collect();
        let _ = writeln!(out, "| {} |", header.join(" | "));

        let rule: Vec<String> = widths
            .iter()
            .zip(&aligns)
            .map(|(&w, align)| {
                let dashes = "-".repeat(w.max(3) - 1);
                match align {
                    Align::Left => format!(":{dashes}"),
                    Align::Right => format!("{dashes}:"),
                }
            })
            .collect();
        let _ = writeln!(out, "|{}|", rule.iter().map(|r| format!(" {r} ")).collect::<Vec<_>>().join("|"));

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(widths.iter().zip(&aligns))
                .map(|(c, (&w, a))| pad(&escape(&c.text), w, *a))
                .collect();
            let _ = writeln!(out, "| {} |", cells.join(" | "));
        }
        out
    }

    fn render_html(&self) -> String {
        let aligns = self.alignments();
        let mut out = String::from("<table>\n<thead>\n<tr>");
        for (header, align) in self.headers.iter().zip(&aligns) {
            let _ = write!(out, "<th{}>{}</th>", style(*align), escape_html(header));
        }
        out.push_str("</tr>\n</thead>\n<tbody>\n");
        for row in &self.rows {
            out.push_str("<tr>");
            for (cell, align) in row.iter().zip(&aligns) {
                let _ = write!(out, "<td{}>{}</td>", style(*align), escape_html(&cell.text));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>\n");
        out
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
    }
}

fn style(align: Align) -> &'static str {
    match align {
        Align::Left => "",
        Align::Right => r#" style="text-align: right;""#,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["name", "value", "units"]);
        table.push_row([Cell::text("R"), Cell::number("0.5"), Cell::text("Ohm")]);
        table.push_row([Cell::text("Kt"), Cell::number("0.11"), Cell::text("N m/A")]);
        table.push_row([Cell::text("J"), Cell::empty()]);
        table
    }

    #[test]
    fn test_simple() {
        let text = sample().render(TableFormat::Simple).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "name  value  units");
        assert_eq!(lines[1], "----  -----  -----");
        assert_eq!(lines[2], "R     0.5    Ohm");
        assert_eq!(lines[3], "Kt    0.11   N m/A");
        assert_eq!(lines[4], "J");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_markdown() {
        let text = sample().render(TableFormat::Markdown).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "| name | value | units |");
        assert_eq!(lines[1], "| :--- | ----: | :---- |");
        assert_eq!(lines[2], "| R    |   0.5 | Ohm   |");
    }

    #[test]
    fn test_html_escapes() {
        let mut table = Table::new(["a<b"]);
        table.push_row([Cell::text("x & y")]);
        let html = table.render(TableFormat::Html).unwrap();
        assert!(html.contains("<th>a&lt;b</th>"));
        assert!(html.contains("<td>x &amp; y</td>"));
        assert!(html.starts_with("<table>"));
    }

    #[test]
    fn test_numeric_alignment() {
        let html = sample().render(TableFormat::Html).unwrap();
        assert!(html.contains(r#"<td style="text-align: right;">0.5</td>"#));
        assert!(html.contains("<td>Ohm</td>"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!("markdown".parse::<TableFormat>().unwrap(), TableFormat::Markdown);
        assert_eq!("md".parse::<TableFormat>().unwrap(), TableFormat::Markdown);
        assert!("latex".parse::<TableFormat>().is_err());
        assert_eq!(TableFormat::Html.to_string(), "html");
    }

    #[test]
    fn test_row_padding() {
        let table = sample();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[2].len(), 3);
        assert!(table.rows()[2][2].text.is_empty());
    }
}
