//! Tab-separated output that never quotes.
//!
//! Fields are written verbatim apart from tabs and line breaks, which become
//! spaces so a value can never spill into another column or row.

use std::borrow::Cow;
use std::io::{self, Write};

use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Row writer for the training-set files.
#[derive(Debug)]
pub struct TsvWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> TsvWriter<W> {
    /// Wrap `output`.
    pub fn new(output: W) -> Self {
        let inner = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(output);
        Self { inner }
    }

    /// Write one row.
    pub fn write_row<I, S>(&mut self, fields: I) -> csv::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cleaned: Vec<String> = fields
            .into_iter()
            .map(|field| escape_field(field.as_ref()).into_owned())
            .collect();
        self.inner.write_record(&cleaned)
    }

    /// Flush buffered rows.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Flush and return the underlying writer.
    pub fn finish(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|err| err.into_error())
    }
}

/// Replace tabs and line breaks in `field` with spaces.
#[must_use]
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '\r', '\n']) {
        Cow::Owned(field.replace(['\t', '\r', '\n'], " "))
    } else {
        Cow::Borrowed(field)
    }
}
