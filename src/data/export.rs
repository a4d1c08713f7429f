use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};

use super::model::{Record, discover_fields};

/// File name offered for the explorer's CSV download.
pub const EXPORT_FILE_NAME: &str = "donnees.csv";

// ---------------------------------------------------------------------------
// Flat CSV export
// ---------------------------------------------------------------------------

/// Render records as header-less, comma-separated lines joined by `\n`.
///
/// Column order is the first record's field order, applied to every record; a
/// record lacking one of those fields gets an empty cell. Values are written in
/// their natural representation and are never quoted or escaped, so a value
/// containing a comma or newline produces an ambiguous line. That matches the
/// dashboard's plain download and is kept as-is.
pub fn to_csv(records: &[Record]) -> Result<String> {
    let fields = discover_fields(records);
    let mut builder = WriterBuilder::new();
    builder.has_headers(false).quote_style(QuoteStyle::Never);

    let mut lines = Vec::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        let cells: Vec<String> = fields
            .iter()
            .map(|field| {
                record
                    .get(field)
                    .map(|value| value.to_string())
                    .unwrap_or_default()
            })
            .collect();

        // The writer marks a lone empty field as `""`; such a row is an empty line.
        if cells.iter().all(String::is_empty) && cells.len() <= 1 {
            lines.push(String::new());
            continue;
        }

        let mut writer = builder.from_writer(Vec::new());
        writer
            .write_record(&cells)
            .with_context(|| format!("writing CSV row {row}"))?;
        let bytes = writer.into_inner().context("flushing CSV writer")?;
        let mut line = String::from_utf8(bytes).context("CSV output is not UTF-8")?;
        if line.ends_with('\n') {
            line.pop();
        }
        lines.push(line);
    }

    Ok(lines.join("\n"))
}

/// Write the export artifact to `path`.
pub fn write_csv(records: &[Record], path: &Path) -> Result<()> {
    let text = to_csv(records)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FieldValue;

    #[test]
    fn empty_input_is_empty_text() {
        assert_eq!(to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn one_line_per_record_without_header() {
        let records = vec![
            Record::new().with("a", 1).with("b", 2),
            Record::new().with("a", 3).with("b", 4.5),
        ];
        assert_eq!(to_csv(&records[..1]).unwrap(), "1,2");
        assert_eq!(to_csv(&records).unwrap(), "1,2\n3,4.5");
    }

    #[test]
    fn first_record_order_applies_to_all() {
        let records = vec![
            Record::new().with("pays", "France").with("date", "2024-01-05"),
            Record::new().with("date", "2024-02-10").with("pays", "Italie"),
            Record::new().with("pays", "Espagne"),
        ];
        assert_eq!(
            to_csv(&records).unwrap(),
            "France,2024-01-05\nItalie,2024-02-10\nEspagne,"
        );
    }

    #[test]
    fn embedded_delimiters_are_not_escaped() {
        let records = vec![Record::new().with("lieu", "Paris, FR").with("n", 2)];
        assert_eq!(to_csv(&records).unwrap(), "Paris, FR,2");
    }

    #[test]
    fn lone_empty_cells_render_as_empty_lines() {
        let records = vec![Record::new().with("a", ""), Record::new().with("a", "x")];
        assert_eq!(to_csv(&records).unwrap(), "\nx");

        let records = vec![Record::new().with("a", FieldValue::Null)];
        assert_eq!(to_csv(&records).unwrap(), "");

        assert_eq!(to_csv(&[Record::new(), Record::new()]).unwrap(), "\n");
    }

    #[test]
    fn all_empty_multi_column_row_keeps_its_delimiters() {
        let records = vec![Record::new().with("a", "").with("b", FieldValue::Null)];
        assert_eq!(to_csv(&records).unwrap(), ",");
    }

    #[test]
    fn write_csv_creates_the_file() {
        let path = std::env::temp_dir().join(format!("epi-export-{}.csv", std::process::id()));
        let records = vec![Record::new().with("pays", "France").with("maladie", "Grippe")];
        write_csv(&records, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "France,Grippe");
        let _ = std::fs::remove_file(&path);
    }
}
