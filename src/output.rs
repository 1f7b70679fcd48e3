//! Plain-text grid files consumed by the plotting tools.
//!
//! Layout: the row count on the first line, the column count on the second,
//! then one line per row holding that row's values separated by a single
//! space. Values are written with the shortest representation that parses
//! back to the same `f64`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::DMatrix;

use crate::error::{PlateError, Result};
use crate::grid::TemperatureGrid;

/// Serializes `grid` into `writer`.
pub fn write_grid<W: Write>(grid: &TemperatureGrid, mut writer: W) -> Result<()> {
    writeln!(writer, "{}", grid.rows())?;
    writeln!(writer, "{}", grid.cols())?;
    for row in 0..grid.rows() {
        let mut values = grid.row_values(row);
        if let Some(first) = values.next() {
            write!(writer, "{first}")?;
        }
        for value in values {
            write!(writer, " {value}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parses a grid written by [`write_grid`].
///
/// Any run of whitespace separates values, so files with padded columns are
/// accepted as well.
pub fn read_grid<R: BufRead>(reader: R) -> Result<TemperatureGrid> {
    let mut lines = reader.lines().enumerate().map(|(index, line)| (index + 1, line));

    let rows = read_dimension(&mut lines, 1, "row count")?;
    let cols = read_dimension(&mut lines, 2, "column count")?;

    let mut values = Vec::new();
    for expected_row in 0..rows {
        let (number, line) = lines.next().ok_or_else(|| {
            PlateError::malformed(expected_row + 3, format!("expected {rows} rows"))
        })?;
        let line = line?;
        let before = values.len();
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|err| {
                PlateError::malformed(number, format!("invalid value `{token}`: {err}"))
            })?;
            values.push(value);
        }
        let found = values.len() - before;
        if found != cols {
            return Err(PlateError::malformed(
                number,
                format!("expected {cols} values, found {found}"),
            ));
        }
    }

    for (number, line) in lines {
        if !line?.trim().is_empty() {
            return Err(PlateError::malformed(number, "unexpected data after last row"));
        }
    }

    TemperatureGrid::from_matrix(DMatrix::from_row_slice(rows, cols, &values))
}

fn read_dimension<I>(lines: &mut I, expected_line: usize, what: &str) -> Result<usize>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
{
    let (number, line) = lines
        .next()
        .ok_or_else(|| PlateError::malformed(expected_line, format!("missing {what}")))?;
    let line = line?;
    line.trim()
        .parse()
        .map_err(|err| PlateError::malformed(number, format!("invalid {what}: {err}")))
}

/// Writes `grid` to the file at `path`, replacing any existing contents.
pub fn save_grid<P: AsRef<Path>>(grid: &TemperatureGrid, path: P) -> Result<()> {
    let file = File::create(path)?;
    write_grid(grid, BufWriter::new(file))
}

/// Reads a grid from the file at `path`.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<TemperatureGrid> {
    let file = File::open(path)?;
    read_grid(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BoundaryConditions;

    #[test]
    fn layout_has_dimensions_then_rows() {
        let grid = TemperatureGrid::initialized(3, 4, &BoundaryConditions::default()).unwrap();
        let mut buffer = Vec::new();
        write_grid(&grid, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "3");
        assert_eq!(lines[1], "4");
        assert_eq!(lines[2], "0 0 0 0");
        assert_eq!(lines[4], "100 100 100 100");
        assert!(lines[3].starts_with("100 "));
    }

    #[test]
    fn reads_back_exact_values() {
        let mut grid = TemperatureGrid::initialized(4, 5, &BoundaryConditions::default()).unwrap();
        grid.set(1, 2, 1.0 / 3.0);
        grid.set(2, 3, -2.5e-17);
        let mut buffer = Vec::new();
        write_grid(&grid, &mut buffer).unwrap();
        let back = read_grid(buffer.as_slice()).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn accepts_padded_legacy_rows() {
        let text = "3\n3\n  0  0  0\n  100  50.5  100\n  100  100  100\n";
        let grid = read_grid(text.as_bytes()).unwrap();
        assert_eq!(grid.get(1, 1), 50.5);
    }

    #[test]
    fn short_row_is_reported_with_line_number() {
        let text = "3\n3\n0 0 0\n1 2\n0 0 0\n";
        match read_grid(text.as_bytes()) {
            Err(PlateError::MalformedOutput { line, .. }) => assert_eq!(line, 4),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_dimensions_report_their_line() {
        for (text, expected) in [("", 1), ("5\n", 2)] {
            match read_grid(text.as_bytes()) {
                Err(PlateError::MalformedOutput { line, .. }) => assert_eq!(line, expected),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn missing_rows_are_rejected() {
        let text = "4\n3\n0 0 0\n";
        assert!(matches!(
            read_grid(text.as_bytes()),
            Err(PlateError::MalformedOutput { .. })
        ));
    }
}
