//! Tabulation of per-center counts
//!
//! The aggregator holds no classification logic: it takes ordered counts
//! per center and produces a status × center table with a computed Total
//! column. Derived ratios are recomputed from the raw totals; averaging
//! per-center percentages would distort centers of different size.

use std::path::Path;

use crate::error::Result;

/// A fixed-row report table, one column per center plus a computed total
#[derive(Debug, Clone)]
pub struct ReportTable {
    row_header: String,
    rows: Vec<String>,
    columns: Vec<(String, Vec<usize>)>,
}

impl ReportTable {
    /// Create an empty table with the given row labels
    #[must_use]
    pub fn new(row_header: &str, rows: &[&str]) -> Self {
        Self {
            row_header: row_header.to_string(),
            rows: rows.iter().map(|r| (*r).to_string()).collect(),
            columns: Vec::new(),
        }
    }

    /// Append one center's counts, in row order
    pub fn push_column(&mut self, center: &str, counts: Vec<usize>) {
        assert_eq!(
            counts.len(),
            self.rows.len(),
            "column length must match the row set"
        );
        self.columns.push((center.to_string(), counts));
    }

    /// Row labels, in emission order
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Row-wise sums across all center columns
    #[must_use]
    pub fn totals(&self) -> Vec<usize> {
        let mut totals = vec![0usize; self.rows.len()];
        for (_, counts) in &self.columns {
            for (total, count) in totals.iter_mut().zip(counts) {
                *total += count;
            }
        }
        totals
    }

    /// The total for the first row with this label
    #[must_use]
    pub fn total_for(&self, row: &str) -> Option<usize> {
        let idx = self.rows.iter().position(|r| r == row)?;
        Some(self.totals()[idx])
    }

    /// Ratio of two rows per center and overall, recomputed from the raw
    /// counts in each column. Columns with a zero denominator are skipped.
    #[must_use]
    pub fn rate(&self, numerator: &str, denominator: &str) -> Option<Vec<(String, f64)>> {
        let num_idx = self.rows.iter().position(|r| r == numerator)?;
        let den_idx = self.rows.iter().position(|r| r == denominator)?;

        let mut rates = Vec::with_capacity(self.columns.len() + 1);
        for (center, counts) in &self.columns {
            if counts[den_idx] > 0 {
                rates.push((
                    center.clone(),
                    counts[num_idx] as f64 / counts[den_idx] as f64,
                ));
            }
        }

        let totals = self.totals();
        if totals[den_idx] > 0 {
            rates.push((
                "Total".to_string(),
                totals[num_idx] as f64 / totals[den_idx] as f64,
            ));
        }

        Some(rates)
    }

    /// Write the table as CSV: label column, one column per center, and
    /// the Total column
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec![self.row_header.clone()];
        header.extend(self.columns.iter().map(|(center, _)| center.clone()));
        header.push("Total".to_string());
        writer.write_record(&header)?;

        let totals = self.totals();
        for (idx, row) in self.rows.iter().enumerate() {
            let mut record = vec![row.clone()];
            record.extend(self.columns.iter().map(|(_, counts)| counts[idx].to_string()));
            record.push(totals[idx].to_string());
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
