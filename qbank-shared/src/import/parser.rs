/// CSV upload decoding
///
/// Turns the raw bytes of an uploaded file into a lazy sequence of
/// [`ImportRow`]s, one per data line. The first line must be a header; its
/// column names become the keys of every row.

use std::collections::HashMap;

use csv::{Reader, ReaderBuilder, StringRecord};

/// Errors that reject an upload as a whole
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Upload is not valid UTF-8 text
    #[error("upload is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Header row could not be read
    #[error("could not read header row: {0}")]
    Header(#[source] csv::Error),

    /// Upload has no header row at all
    #[error("upload has no header row")]
    MissingHeader,
}

/// Error for a single data row that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// One decoded data row, keyed by header name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    fields: HashMap<String, String>,
}

impl ImportRow {
    fn from_record(headers: &StringRecord, record: &StringRecord) -> Self {
        // Later duplicate columns overwrite earlier ones; extra fields are dropped.
        headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    /// Raw value of a column, if the row has it
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Trimmed value of a column, treating blank values as absent
    pub fn value(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ImportRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Lazy iterator over the data rows of an upload
///
/// Rows are yielded in input order. The iterator is consumed as it goes and
/// cannot be restarted.
pub struct ImportRows<'a> {
    reader: Reader<&'a [u8]>,
    headers: StringRecord,
    finished: bool,
}

impl ImportRows<'_> {
    /// Column names from the header row
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }
}

impl Iterator for ImportRows<'_> {
    type Item = Result<ImportRow, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => Some(Ok(ImportRow::from_record(&self.headers, &record))),
            Ok(false) => {
                self.finished = true;
                None
            }
            Err(err) => {
                // An I/O error leaves the reader unusable; anything else is
                // local to this record.
                if err.is_io_error() {
                    self.finished = true;
                }
                Some(Err(RowError::Malformed(err.to_string())))
            }
        }
    }
}

/// Decodes an upload and reads its header row
///
/// # Errors
///
/// - [`ParseError::Encoding`] if the bytes are not UTF-8
/// - [`ParseError::Header`] if the header row cannot be parsed
/// - [`ParseError::MissingHeader`] if there is no header row at all
///
/// # Example
///
/// ```
/// use qbank_shared::import::parser::parse_upload;
///
/// let upload = b"email,role\na@x.com,admin\n";
/// let rows: Vec<_> = parse_upload(upload).unwrap().collect();
///
/// assert_eq!(rows.len(), 1);
/// let row = rows[0].as_ref().unwrap();
/// assert_eq!(row.value("email"), Some("a@x.com"));
/// assert_eq!(row.value("batch"), None);
/// ```
pub fn parse_upload(upload: &[u8]) -> Result<ImportRows<'_>, ParseError> {
    let text = std::str::from_utf8(upload)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(ParseError::Header)?.clone();
    if headers.is_empty() {
        return Err(ParseError::MissingHeader);
    }

    Ok(ImportRows {
        reader,
        headers,
        finished: false,
    })
}
