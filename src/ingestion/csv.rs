//! CSV decode/encode for [`Table`] values.
//!
//! CSV is both an accepted raw input format and the pipeline's canonical
//! persisted form, so this module covers both directions. Decoding is
//! schema-less: the header row defines the column set, every value is text,
//! and empty cells map to [`Cell::Missing`].

use std::path::Path;

use crate::error::PipelineResult;
use crate::types::{Cell, Table};

/// Read a CSV file into an in-memory [`Table`].
///
/// The first record is taken as the header row. Values are kept as raw text
/// (untrimmed); empty values become [`Cell::Missing`].
pub fn read_csv_from_path(path: impl AsRef<Path>) -> PipelineResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> PipelineResult<Table> {
    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_owned()).collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<Cell> = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            let raw = record.get(idx).unwrap_or("");
            if raw.is_empty() {
                row.push(Cell::Missing);
            } else {
                row.push(Cell::Text(raw.to_owned()));
            }
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

/// Write a [`Table`] to a UTF-8 CSV file with a header row.
///
/// Missing cells render as empty fields; numeric cells render without a
/// trailing `.0` when whole.
pub fn write_csv_to_path(table: &Table, path: impl AsRef<Path>) -> PipelineResult<()> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    write_csv_to_writer(table, &mut wtr)
}

/// Write a [`Table`] through an existing CSV writer.
pub fn write_csv_to_writer<W: std::io::Write>(
    table: &Table,
    wtr: &mut csv::Writer<W>,
) -> PipelineResult<()> {
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|c| c.render()))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_csv_from_reader, write_csv_to_writer};
    use crate::types::{Cell, Table};

    fn reader_from(input: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes())
    }

    #[test]
    fn read_keeps_header_order_and_missing_cells() {
        let input = "date,location,species\n2024-01-05,London,\n,Leeds,Ixodes\n";
        let table = read_csv_from_reader(&mut reader_from(input)).unwrap();

        assert_eq!(table.columns, vec!["date", "location", "species"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows[0],
            vec![
                Cell::Text("2024-01-05".to_string()),
                Cell::Text("London".to_string()),
                Cell::Missing,
            ]
        );
        assert_eq!(table.rows[1][0], Cell::Missing);
    }

    #[test]
    fn write_round_trips_through_read() {
        let table = Table::new(
            vec!["date".to_string(), "location".to_string()],
            vec![
                vec![
                    Cell::Text("2024-01-05T00:00:00".to_string()),
                    Cell::Text("London".to_string()),
                ],
                vec![Cell::Text("Unknown".to_string()), Cell::Text("Leeds".to_string())],
            ],
        );

        let mut buf = Vec::new();
        {
            let mut wtr = csv::WriterBuilder::new().from_writer(&mut buf);
            write_csv_to_writer(&table, &mut wtr).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("date,location\n"));

        let back = read_csv_from_reader(&mut reader_from(&text)).unwrap();
        assert_eq!(back, table);
    }
}
