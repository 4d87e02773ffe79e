use crate::error::Error;

use super::HolidayFrame;

/// Field separator of staged objects.
pub const PIPE_DELIMITER: u8 = b'|';

const LINE_TERMINATOR: &str = "\n";

impl HolidayFrame {
    /// Serializes the frame as delimited text.
    /// ---
    /// Header row first, `\n` line endings, no quoting and no index column.
    /// Without quoting a cell cannot carry the delimiter or a line break,
    /// such cells are rejected instead of producing an unreadable object.
    pub fn to_delimited(&self, delimiter: u8) -> Result<Vec<u8>, Error> {
        if self.columns.is_empty() {
            return Ok(Vec::new());
        }

        let separator = char::from(delimiter).to_string();
        let mut out = String::new();

        write_line(&mut out, &self.columns, &separator, "header", delimiter)?;
        for (idx, row) in self.rows.iter().enumerate() {
            write_line(&mut out, row, &separator, &format!("row {idx}"), delimiter)?;
        }

        Ok(out.into_bytes())
    }

    /// Parses delimited text produced by [`HolidayFrame::to_delimited`].
    /// ---
    /// The first line is the header. Every data row must have as many
    /// fields as the header.
    pub fn from_delimited(data: &[u8], delimiter: u8) -> Result<Self, Error> {
        if data.is_empty() {
            return Ok(Self::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quoting(false)
            .has_headers(true)
            .flexible(false)
            .from_reader(data);

        let columns: Vec<String> = reader
            .headers()
            .map_err(codec_error)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(codec_error)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        // The reader skips blank lines, which are legitimate rows of a
        // single-column frame whose only cell is empty.
        let expected_rows = line_count(data).saturating_sub(1);
        if rows.len() != expected_rows {
            return Err(Error::Codec(format!(
                "Parsed {} rows from {} data lines, blank lines cannot be read back",
                rows.len(),
                expected_rows
            )));
        }

        Ok(Self { columns, rows })
    }
}

/// Lines in `data`, a trailing terminator does not start a new line.
fn line_count(data: &[u8]) -> usize {
    let breaks = data.iter().filter(|b| **b == b'\n').count();
    match data.last() {
        Some(b'\n') | None => breaks,
        Some(_) => breaks + 1,
    }
}

fn write_line(
    out: &mut String,
    cells: &[String],
    separator: &str,
    location: &str,
    delimiter: u8,
) -> Result<(), Error> {
    if let Some(cell) = cells.iter().find(|cell| {
        cell.bytes()
            .any(|b| b == delimiter || b == b'\n' || b == b'\r')
    }) {
        return Err(Error::Codec(format!(
            "Value {:?} in {} contains the delimiter or a line break and cannot be written unquoted",
            cell, location
        )));
    }

    out.push_str(&cells.join(separator));
    out.push_str(LINE_TERMINATOR);

    Ok(())
}

fn codec_error(e: csv::Error) -> Error {
    Error::Codec(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> HolidayFrame {
        HolidayFrame::new(
            vec!["date".into(), "localName".into(), "fixed".into(), "counties".into()],
            vec![
                vec!["2023-01-01".into(), "Новы год".into(), "True".into(), "".into()],
                vec![
                    "2023-05-09".into(),
                    "Дзень Перамогі".into(),
                    "True".into(),
                    r#"["BY-HM"]"#.into(),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_writes_header_and_rows_unquoted() {
        let bytes = sample_frame().to_delimited(PIPE_DELIMITER).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "date|localName|fixed|counties\n\
             2023-01-01|Новы год|True|\n\
             2023-05-09|Дзень Перамогі|True|[\"BY-HM\"]\n"
        );
    }

    #[test]
    fn test_reserialization_is_byte_identical() {
        let staged = sample_frame().to_delimited(PIPE_DELIMITER).unwrap();
        let parsed = HolidayFrame::from_delimited(&staged, PIPE_DELIMITER).unwrap();

        assert_eq!(parsed, sample_frame());
        assert_eq!(parsed.to_delimited(PIPE_DELIMITER).unwrap(), staged);
    }

    #[test]
    fn test_rejects_cells_containing_the_delimiter() {
        let frame = HolidayFrame::new(vec!["name".into()], vec![vec!["a|b".into()]]).unwrap();
        assert!(matches!(
            frame.to_delimited(PIPE_DELIMITER),
            Err(Error::Codec(_))
        ));
    }

    #[test]
    fn test_header_only_parses_to_zero_rows() {
        let frame = HolidayFrame::from_delimited(b"date|name\n", PIPE_DELIMITER).unwrap();
        assert_eq!(frame.columns(), &["date", "name"]);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_empty_frame_round_trips_through_empty_object() {
        let bytes = HolidayFrame::default().to_delimited(PIPE_DELIMITER).unwrap();
        assert!(bytes.is_empty());
        assert_eq!(
            HolidayFrame::from_delimited(&bytes, PIPE_DELIMITER).unwrap(),
            HolidayFrame::default()
        );
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let result = HolidayFrame::from_delimited(b"a|b\n1|2|3\n", PIPE_DELIMITER);
        assert!(matches!(result, Err(Error::Codec(_))));
    }

    #[test]
    fn test_blank_rows_are_not_dropped_silently() {
        let frame = HolidayFrame::new(
            vec!["name".into()],
            vec![vec!["a".into()], vec!["".into()], vec!["b".into()]],
        )
        .unwrap();
        let staged = frame.to_delimited(PIPE_DELIMITER).unwrap();

        assert_eq!(staged, b"name\na\n\nb\n");
        assert!(matches!(
            HolidayFrame::from_delimited(&staged, PIPE_DELIMITER),
            Err(Error::Codec(_))
        ));
    }

    #[test]
    fn test_missing_final_terminator_still_counts_last_row() {
        let frame = HolidayFrame::from_delimited(b"a|b\n1|2\n3|4", PIPE_DELIMITER).unwrap();
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let result = HolidayFrame::from_delimited(b"a|b\n\xff|2\n", PIPE_DELIMITER);
        assert!(matches!(result, Err(Error::Codec(_))));
    }
}
