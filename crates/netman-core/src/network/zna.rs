//! ZNA mixed-mode CSV ingestion
//!
//! Reads the mixed-mode export of an R&S ZNA: semicolon separated, `|` as
//! quote character, three header lines, then one row per frequency point
//! with the frequency followed by sixteen (re, im) pairs in the order of
//! [`MIXED_MODE_KEYS`].

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use num_complex::Complex64;

use super::mixed_mode::{parse_mixed_mode_key, MixedModeParams, Mode, MIXED_MODE_KEYS};
use crate::constants::{ZNA_COLUMNS, ZNA_HEADER_ROWS};
use crate::error::{NetmanError, Result};
use crate::frequency::Frequency;

/// One parsed data row: frequency in Hz and the sixteen complex values
struct ZnaRow {
    frequency: f64,
    values: [Complex64; 16],
}

impl MixedModeParams {
    /// Read a ZNA mixed-mode CSV export
    ///
    /// # Example
    /// ```ignore
    /// let mm = MixedModeParams::from_zna_csv("cmc_mixed_mode.csv")?;
    /// let sdd21 = mm.get("Sdd21");
    /// ```
    pub fn from_zna_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(NetmanError::InvalidArgument("path is empty".to_string()));
        }
        let file = File::open(path)?;
        Self::from_zna_reader(file)
    }

    /// Read a ZNA mixed-mode export from any reader
    ///
    /// Rows are kept in file order; frequencies must already be strictly
    /// increasing.
    pub fn from_zna_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = BufReader::new(reader);

        // Header lines are skipped whatever they contain
        let mut header = Vec::new();
        for _ in 0..ZNA_HEADER_ROWS {
            header.clear();
            if reader.read_until(b'\n', &mut header)? == 0 {
                break;
            }
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .quote(b'|')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let layout: Vec<(Mode, Mode, usize, usize)> = MIXED_MODE_KEYS
            .iter()
            .filter_map(|key| parse_mixed_mode_key(key))
            .collect();

        let mut rows: Vec<ZnaRow> = Vec::new();
        for result in csv_reader.byte_records() {
            let record = result?;
            let line = ZNA_HEADER_ROWS
                + record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(rows.len() + 1);
            let row = parse_row(&record, line)?;

            if let Some(prev) = rows.last() {
                if row.frequency <= prev.frequency {
                    return Err(NetmanError::MalformedRecord {
                        line,
                        message: format!(
                            "frequency {} does not increase (previous {})",
                            row.frequency, prev.frequency
                        ),
                    });
                }
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(NetmanError::MalformedRecord {
                line: ZNA_HEADER_ROWS + 1,
                message: "no data rows after header".to_string(),
            });
        }
        tracing::debug!(rows = rows.len(), "read ZNA mixed-mode export");

        let frequency = Frequency::from_hz(rows.iter().map(|r| r.frequency).collect())?;
        let mut mm = MixedModeParams::zeros(frequency);
        for (f, row) in rows.iter().enumerate() {
            for (&(response, stimulus, i, j), value) in layout.iter().zip(row.values.iter()) {
                mm.block_mut(response, stimulus)[[f, i - 1, j - 1]] = *value;
            }
        }
        Ok(mm)
    }
}

fn parse_row(record: &csv::ByteRecord, line: usize) -> Result<ZnaRow> {
    if record.len() < ZNA_COLUMNS {
        return Err(NetmanError::MalformedRecord {
            line,
            message: format!("expected {} fields, got {}", ZNA_COLUMNS, record.len()),
        });
    }

    let mut fields = [0.0_f64; ZNA_COLUMNS];
    for (col, slot) in fields.iter_mut().enumerate() {
        *slot = parse_field(&record[col], line, col)?;
    }

    let frequency = fields[0];
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(NetmanError::MalformedRecord {
            line,
            message: format!("frequency must be positive, got {}", frequency),
        });
    }

    let mut values = [Complex64::new(0.0, 0.0); 16];
    for (k, value) in values.iter_mut().enumerate() {
        *value = Complex64::new(fields[1 + 2 * k], fields[2 + 2 * k]);
    }
    Ok(ZnaRow { frequency, values })
}

fn parse_field(raw: &[u8], line: usize, col: usize) -> Result<f64> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| NetmanError::MalformedRecord {
            line,
            message: format!("field {} is not valid UTF-8", col + 1),
        })?
        .trim();
    text.parse::<f64>().map_err(|_| NetmanError::MalformedRecord {
        line,
        message: format!("field {} is not numeric: '{}'", col + 1, text),
    })
}
