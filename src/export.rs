use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::dataset::{COLUMNS, Cell, Dataset};

/// `youtube_analysis_<label>.xlsx`, with anything but letters, digits, `-` and `_` replaced.
pub fn default_file_name(label: &str) -> PathBuf {
  let safe: String =
    label.trim().chars().map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' }).collect();
  let safe = if safe.is_empty() { "results".to_string() } else { safe };
  PathBuf::from(format!("youtube_analysis_{}.xlsx", safe))
}

/// Render the dataset as a single-sheet workbook: header row in `COLUMNS` order, one row per record.
pub fn workbook(dataset: &Dataset) -> Result<Workbook> {
  let mut workbook = Workbook::new();
  let header = Format::new().set_bold();
  let integer = Format::new().set_num_format("#,##0");
  let percent = Format::new().set_num_format("0.00");

  let sheet = workbook.add_worksheet();
  sheet.set_name("Sheet1")?;
  for (col, name) in COLUMNS.iter().enumerate() {
    sheet.write_string_with_format(0, col as u16, *name, &header)?;
  }

  for (idx, record) in dataset.rows().iter().enumerate() {
    let row = idx as u32 + 1;
    for (col, cell) in record.cells().iter().enumerate() {
      let col = col as u16;
      match cell {
        Cell::Text(s) => sheet.write_string(row, col, *s)?,
        Cell::Int(n) => sheet.write_number_with_format(row, col, *n as f64, &integer)?,
        Cell::Percent(p) => sheet.write_number_with_format(row, col, *p, &percent)?,
        Cell::Date(d) => sheet.write_string(row, col, d.as_str())?,
        Cell::Link(url) => sheet.write_url(row, col, *url)?,
      };
    }
  }
  sheet.set_freeze_panes(1, 0)?;
  sheet.autofit();
  Ok(workbook)
}

pub fn write_xlsx(dataset: &Dataset, path: &Path) -> Result<()> {
  let mut workbook = workbook(dataset)?;
  workbook.save(path).with_context(|| format!("Failed to write {}", path.display()))?;
  info!(path = %path.display(), rows = dataset.len(), "export: workbook written");
  Ok(())
}
