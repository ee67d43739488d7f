//! Streaming CSV/TSV reader with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{AssayError, Result};
use super::source::{Record, SourceMetadata};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Read buffer size; also bounds how much input delimiter detection sees.
const BUFFER_CAPACITY: usize = 64 * 1024;

/// Parser configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Opens header-qualified delimited text as a lazy record stream.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Open a file as a record stream.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<RecordStream<File>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AssayError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.stream(file)
    }

    /// Wrap any reader as a record stream. The first row is the header.
    pub fn stream<R: Read>(&self, reader: R) -> Result<RecordStream<R>> {
        let mut buffered = BufReader::with_capacity(BUFFER_CAPACITY, DigestReader::new(reader));

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => {
                let peeked = buffered.fill_buf().map_err(|e| AssayError::StreamRead {
                    row: 0,
                    message: e.to_string(),
                })?;
                detect_delimiter(peeked)?
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .from_reader(BlankLineReader::new(buffered, delimiter, self.config.quote));

        let raw_headers: Vec<String> = reader
            .headers()
            .map_err(|e| AssayError::StreamRead {
                row: 0,
                message: e.to_string(),
            })?
            .iter()
            .map(|s| s.to_string())
            .collect();

        if raw_headers.is_empty() || raw_headers.iter().all(|h| h.is_empty()) {
            return Err(AssayError::EmptyData("No columns found".to_string()));
        }

        let (headers, slots) = unique_headers(raw_headers);
        if slots.len() > headers.len() {
            warn!(
                duplicates = slots.len() - headers.len(),
                "repeated column names; the last value of each is kept"
            );
        }

        debug!(
            columns = headers.len(),
            delimiter = ?(delimiter as char),
            "opened record stream"
        );

        Ok(RecordStream {
            reader,
            headers: headers.into(),
            slots,
            record: csv::StringRecord::new(),
            delimiter,
            max_rows: self.config.max_rows,
            rows_read: 0,
            finished: false,
        })
    }

    /// Stream records from an in-memory buffer.
    pub fn stream_bytes<'a>(&self, bytes: &'a [u8]) -> Result<RecordStream<&'a [u8]>> {
        self.stream(bytes)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy, finite, non-restartable sequence of records.
///
/// Yields `Err` at most once; after an error or the end of input the stream
/// is exhausted.
pub struct RecordStream<R: Read> {
    reader: csv::Reader<BlankLineReader<BufReader<DigestReader<R>>>>,
    headers: Arc<[String]>,
    /// Unique header index for each raw field.
    slots: Vec<usize>,
    record: csv::StringRecord,
    delimiter: u8,
    max_rows: Option<usize>,
    rows_read: usize,
    finished: bool,
}

impl<R: Read> RecordStream<R> {
    /// Column names from the header row, in order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows yielded so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Describe what has been consumed so far. Call after the stream is
    /// drained to get the digest of the whole input.
    pub fn source_metadata(&self, source: impl Into<String>) -> SourceMetadata {
        let digest = self.reader.get_ref().get_ref().get_ref();
        SourceMetadata {
            source: source.into(),
            hash: digest.hex_digest(),
            size_bytes: digest.bytes_read(),
            format: format_name(self.delimiter).to_string(),
            row_count: self.rows_read,
            column_count: self.headers.len(),
            read_at: Utc::now(),
        }
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.max_rows.is_some_and(|max| self.rows_read >= max) {
            self.finished = true;
            return None;
        }

        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                self.rows_read += 1;
                let mut values = vec![String::new(); self.headers.len()];
                for (&slot, field) in self.slots.iter().zip(self.record.iter()) {
                    values[slot] = field.to_string();
                }
                Some(Ok(Record::new(Arc::clone(&self.headers), values)))
            }
            Ok(false) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(AssayError::StreamRead {
                    row: self.rows_read + 1,
                    message: e.to_string(),
                }))
            }
        }
    }
}

/// Reader adapter that hashes every byte passing through it.
struct DigestReader<R> {
    inner: R,
    hasher: Sha256,
    bytes: u64,
}

impl<R> DigestReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes: 0,
        }
    }

    fn hex_digest(&self) -> String {
        format!("sha256:{:x}", self.hasher.clone().finalize())
    }

    fn bytes_read(&self) -> u64 {
        self.bytes
    }
}

impl<R: Read> Read for DigestReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        Ok(n)
    }
}

/// Reader adapter that turns each blank data line into a quoted empty field,
/// so the CSV reader yields it as a record instead of skipping it.
///
/// Blank lines before the first line with content are left alone, as are
/// newlines inside quoted fields.
struct BlankLineReader<R> {
    inner: R,
    delimiter: u8,
    quote: u8,
    in_quotes: bool,
    /// The previous byte closed a quoted section (`""` re-opens it).
    closed_quote: bool,
    at_field_start: bool,
    seen_content: bool,
    at_line_start: bool,
    pending: Vec<u8>,
    pos: usize,
}

impl<R> BlankLineReader<R> {
    fn new(inner: R, delimiter: u8, quote: u8) -> Self {
        Self {
            inner,
            delimiter,
            quote,
            in_quotes: false,
            closed_quote: false,
            at_field_start: true,
            seen_content: false,
            at_line_start: false,
            pending: Vec::new(),
            pos: 0,
        }
    }

    fn get_ref(&self) -> &R {
        &self.inner
    }

    fn push(&mut self, b: u8) {
        let newline = b == b'\n' || b == b'\r';
        if self.at_line_start && newline {
            self.pending.extend_from_slice(&[self.quote, self.quote]);
        }
        self.pending.push(b);

        let toggles =
            b == self.quote && (self.in_quotes || self.at_field_start || self.closed_quote);
        self.closed_quote = toggles && self.in_quotes;
        if toggles {
            self.in_quotes = !self.in_quotes;
        }
        if !newline {
            self.seen_content = true;
        }

        let boundary = !self.in_quotes && (newline || b == self.delimiter);
        self.at_field_start = boundary;
        // CRLF: only the LF starts a new line.
        self.at_line_start = self.seen_content && boundary && b == b'\n';
    }
}

impl<R: Read> Read for BlankLineReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.pos >= self.pending.len() {
            let mut chunk = [0u8; 8192];
            let n = self.inner.read(&mut chunk)?;
            if n == 0 {
                return Ok(0);
            }

            self.pending.clear();
            self.pos = 0;
            for &b in &chunk[..n] {
                self.push(b);
            }
        }

        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Collapse repeated header names, keeping the first position of each.
/// Returns the unique names and, for each raw field, its unique index.
fn unique_headers(raw: Vec<String>) -> (Vec<String>, Vec<usize>) {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());
    let mut slots = Vec::with_capacity(raw.len());

    for name in raw {
        match headers.iter().position(|h| *h == name) {
            Some(index) => slots.push(index),
            None => {
                slots.push(headers.len());
                headers.push(name);
            }
        }
    }

    (headers, slots)
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines: Vec<&str> = text
        .lines()
        .take(10)
        .filter(|l| !l.trim().is_empty())
        .collect();

    // The buffer may end mid-line.
    if lines.len() > 1 && lines.len() < 10 && !bytes.ends_with(b"\n") {
        lines.pop();
    }

    if lines.is_empty() {
        return Err(AssayError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab gets a small bonus.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
