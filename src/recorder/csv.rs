// src/recorder/csv.rs
// Flat CSV output for sensor logs: one header line, then one line per record.

use std::fmt::Write as _;
use std::io::{self, Write};

/// One cell of a sensor log row
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// Scalar measurement
    Float(f64),
    /// Integer nanosecond timestamp
    Nanos(u64),
    /// Sequence of measurements stored in a single cell
    Sequence(Vec<f64>),
    /// Value the message did not carry; written as an empty cell
    Missing,
}

impl Field {
    /// Renders the cell text before CSV quoting
    fn render(&self) -> String {
        match self {
            Field::Float(value) => format!("{:?}", value),
            Field::Nanos(value) => value.to_string(),
            Field::Sequence(values) => {
                let mut out = String::from("[");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{:?}", value);
                }
                out.push(']');
                out
            }
            Field::Missing => String::new(),
        }
    }
}

/// Destination for log rows
pub trait RecordSink {
    /// Writes the column names once, before any row
    fn write_header(&mut self, columns: &[&'static str]) -> io::Result<()>;

    /// Appends one complete row
    fn append_row(&mut self, row: &[Field]) -> io::Result<()>;
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn write_header(&mut self, columns: &[&'static str]) -> io::Result<()> {
        (**self).write_header(columns)
    }

    fn append_row(&mut self, row: &[Field]) -> io::Result<()> {
        (**self).append_row(row)
    }
}

/// Quotes a cell when it contains a delimiter, quote or line break
fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn join_line<I: IntoIterator<Item = String>>(cells: I) -> String {
    let mut line = cells
        .into_iter()
        .map(|cell| escape(&cell))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// CSV writer over any `Write`. Every line goes out in one `write_all`
/// followed by a flush, so an interrupted node never leaves half a row.
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    /// Wraps a writer
    pub fn new(writer: W) -> Self {
        CsvSink { writer }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_header(&mut self, columns: &[&'static str]) -> io::Result<()> {
        let line = join_line(columns.iter().map(|c| c.to_string()));
        self.write_line(&line)
    }

    fn append_row(&mut self, row: &[Field]) -> io::Result<()> {
        let line = join_line(row.iter().map(Field::render));
        self.write_line(&line)
    }
}
