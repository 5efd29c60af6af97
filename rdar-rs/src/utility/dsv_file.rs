use crate::error::RdarError;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A single non-empty row of a DSV file together with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DSVRow {
    pub(crate) line: usize,
    pub(crate) fields: Vec<String>,
}

/// A struct to hold a Delimiter Separated Value File (DSV)
#[derive(Debug)]
pub(crate) struct DSVFile {
    /// The delimiter string
    delimiter: String,
    /// The comment indicator string
    comment: Option<String>,
    /// The rows within the DSV file
    pub(crate) rows: Vec<DSVRow>,
}

impl DSVFile {
    /// Initializes a new instance with a given delimiter and optional comment string
    pub(crate) fn with_delimiter(delimiter: &str, comment: Option<&str>) -> Self {
        Self {
            delimiter: delimiter.to_string(),
            comment: comment.filter(|c| !c.is_empty()).map(str::to_string),
            rows: Vec::new(),
        }
    }

    /// Reads a whole DSV file from disk
    pub(crate) fn from_file<P: AsRef<Path>>(
        file: P,
        delimiter: &str,
        comment: Option<&str>,
    ) -> Result<Self, RdarError> {
        let file = File::open(file)?;
        let mut dsv = Self::with_delimiter(delimiter, comment);
        dsv.load(file)?;
        Ok(dsv)
    }

    /// Appends the rows of `reader`, skipping blank and comment lines
    pub(crate) fn load<R: Read>(&mut self, reader: R) -> Result<(), RdarError> {
        let buffered = BufReader::new(reader);

        for (number, line) in buffered.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(ref comment) = self.comment {
                if trimmed.starts_with(comment.as_str()) {
                    continue;
                }
            }
            let fields = trimmed
                .split(self.delimiter.as_str())
                .map(|s| s.trim().to_string())
                .collect();
            self.rows.push(DSVRow {
                line: number + 1,
                fields,
            });
        }
        Ok(())
    }
}
