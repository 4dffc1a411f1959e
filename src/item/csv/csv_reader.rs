use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::Read,
    path::Path,
    sync::Arc,
};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    customer::row::RawRow,
    error::BatchError,
};

/// A CSV reader producing header-mapped [`RawRow`]s.
///
/// The first record of the input is the header. Every following record is
/// paired positionally with the header names. Values are not trimmed.
///
/// A record whose field count differs from the header count is reported as
/// [`BatchError::ColumnCount`] and the reader moves on to the next record, so
/// the step decides through its skip limit whether the run goes on.
///
/// An I/O failure of the underlying stream is returned as [`BatchError::Io`],
/// and every later call fails the same way.
///
/// # Examples
///
/// ```
/// use customer_batch::item::csv::csv_reader::CsvRowReaderBuilder;
/// use customer_batch::core::item::ItemReader;
///
/// let data = "id,name\n1,Alice\n2,Bob,extra\n3,Carol";
/// let reader = CsvRowReaderBuilder::new().from_reader(data.as_bytes()).unwrap();
///
/// let first = reader.read().unwrap().unwrap();
/// assert_eq!(first.get("name"), Some("Alice"));
///
/// // The second record has one field too many.
/// assert!(reader.read().is_err());
///
/// let third = reader.read().unwrap().unwrap();
/// assert_eq!(third.get("id"), Some("3"));
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvRowReader<R> {
    reader: RefCell<csv::Reader<R>>,
    headers: Arc<[String]>,
    record: RefCell<StringRecord>,
    /// Set once an I/O error made the underlying stream unusable.
    broken: Cell<bool>,
}

impl<R: Read> CsvRowReader<R> {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> ItemReader<RawRow> for CsvRowReader<R> {
    fn read(&self) -> ItemReaderResult<RawRow> {
        if self.broken.get() {
            return Err(BatchError::Io(std::io::Error::other(
                "input stream failed on an earlier read",
            )));
        }

        let mut record = self.record.borrow_mut();
        let has_record = self
            .reader
            .borrow_mut()
            .read_record(&mut record)
            .map_err(|err| {
                if !err.is_io_error() {
                    return BatchError::ItemReader(err.to_string());
                }
                self.broken.set(true);
                match err.into_kind() {
                    csv::ErrorKind::Io(io) => BatchError::Io(io),
                    kind => BatchError::ItemReader(format!("{:?}", kind)),
                }
            })?;

        if !has_record {
            return Ok(None);
        }

        let line = record.position().map_or(0, |pos| pos.line());

        if record.len() != self.headers.len() {
            return Err(BatchError::ColumnCount {
                line,
                expected: self.headers.len(),
                found: record.len(),
            });
        }

        let values = record.iter().map(str::to_string).collect();
        Ok(Some(RawRow::new(line, Arc::clone(&self.headers), values)))
    }
}

/// A builder for configuring CSV row reading.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Header names trimmed, values left untouched
/// - No expected columns
#[derive(Default)]
pub struct CsvRowReaderBuilder<'a> {
    delimiter: Option<u8>,
    expected_columns: &'a [&'a str],
}

impl<'a> CsvRowReaderBuilder<'a> {
    pub fn new() -> Self {
        Self {
            delimiter: Some(b','),
            expected_columns: &[],
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Column names the caller relies on; a warning is logged for each one
    /// missing from the header. Rows are still read.
    pub fn expected_columns(mut self, columns: &'a [&'a str]) -> Self {
        self.expected_columns = columns;
        self
    }

    /// Creates a reader over any `Read` source, consuming the header record.
    ///
    /// # Errors
    /// Returns `BatchError::ItemReader` if the header record cannot be read.
    pub fn from_reader<R: Read>(self, rdr: R) -> Result<CsvRowReader<R>, BatchError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .delimiter(self.delimiter.unwrap_or(b','))
            .has_headers(true)
            // Field counts are checked per record to report the line.
            .flexible(true)
            .from_reader(rdr);

        let headers: Arc<[String]> = reader
            .headers()
            .map_err(|err| BatchError::ItemReader(format!("unable to read header: {}", err)))?
            .iter()
            .map(str::to_string)
            .collect();

        debug!("CSV header: {:?}", headers);
        for column in self.expected_columns {
            if !headers.iter().any(|header| header == column) {
                warn!("Column '{}' is missing from the CSV header", column);
            }
        }

        Ok(CsvRowReader {
            reader: RefCell::new(reader),
            headers,
            record: RefCell::new(StringRecord::new()),
            broken: Cell::new(false),
        })
    }

    /// Creates a reader over the file at `path`.
    ///
    /// # Errors
    /// Returns `BatchError::Io` if the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvRowReader<File>, BatchError> {
        let file = File::open(path.as_ref()).map_err(|err| {
            BatchError::Io(std::io::Error::new(
                err.kind(),
                format!("cannot open {}: {}", path.as_ref().display(), err),
            ))
        })?;
        self.from_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read, Write};

    use tempfile::NamedTempFile;

    use super::CsvRowReaderBuilder;
    use crate::{core::item::ItemReader, error::BatchError};

    #[test]
    fn rows_are_mapped_on_trimmed_headers() {
        let data = " id , name ,email\n7, John Smith ,john@example.com\n";
        let reader = CsvRowReaderBuilder::new()
            .from_reader(data.as_bytes())
            .unwrap();

        assert_eq!(reader.headers(), ["id", "name", "email"]);

        let row = reader.read().unwrap().unwrap();
        assert_eq!(row.get("id"), Some("7"));
        assert_eq!(row.get("name"), Some(" John Smith "));
        assert_eq!(row.line(), 2);
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn quoted_fields_keep_delimiters() {
        let data = "id,name\n1,\"Smith, John\"\n";
        let reader = CsvRowReaderBuilder::new()
            .from_reader(data.as_bytes())
            .unwrap();

        let row = reader.read().unwrap().unwrap();
        assert_eq!(row.get("name"), Some("Smith, John"));
    }

    #[test]
    fn column_count_mismatch_is_reported_with_line() {
        let data = "id,name,email\n1,Alice\n2,Bob,bob@example.com\n";
        let reader = CsvRowReaderBuilder::new()
            .from_reader(data.as_bytes())
            .unwrap();

        match reader.read() {
            Err(BatchError::ColumnCount {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected a column count error, got {:?}", other.map(|_| ())),
        }

        let row = reader.read().unwrap().unwrap();
        assert_eq!(row.get("email"), Some("bob@example.com"));
    }

    #[test]
    fn custom_delimiter() {
        let data = "id;name\n5;Eve\n";
        let reader = CsvRowReaderBuilder::new()
            .delimiter(b';')
            .from_reader(data.as_bytes())
            .unwrap();

        let row = reader.read().unwrap().unwrap();
        assert_eq!(row.get("name"), Some("Eve"));
        assert_eq!(row.joined(';'), "5;Eve");
    }

    #[test]
    fn empty_input_has_no_rows() {
        let reader = CsvRowReaderBuilder::new().from_reader("".as_bytes()).unwrap();
        assert!(reader.headers().is_empty());
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id,name").unwrap();
        writeln!(file, "1,Alice").unwrap();

        let reader = CsvRowReaderBuilder::new()
            .expected_columns(&["id", "age"])
            .from_path(file.path())
            .unwrap();
        assert_eq!(reader.read().unwrap().unwrap().get("name"), Some("Alice"));
    }

    /// Yields `data`, then fails like a vanished disk.
    struct FailingSource {
        data: &'static [u8],
    }

    impl Read for FailingSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::other("device gone"));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn io_failure_mid_file_is_reported_on_every_later_read() {
        let reader = CsvRowReaderBuilder::new()
            .from_reader(FailingSource {
                data: b"id,name\n1,Alice\n",
            })
            .unwrap();

        assert_eq!(reader.read().unwrap().unwrap().get("name"), Some("Alice"));
        assert!(matches!(reader.read(), Err(BatchError::Io(_))));
        assert!(matches!(reader.read(), Err(BatchError::Io(_))));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = CsvRowReaderBuilder::new().from_path("/nonexistent/customers.csv");
        assert!(matches!(result, Err(BatchError::Io(_))));
    }
}
