//! Export assembled daily series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::AppError;
use crate::series::DailySeries;

#[derive(Debug, Serialize)]
struct SeriesRow<'a> {
    date: String,
    time: String,
    seconds: u32,
    utc: String,
    quantity: &'a str,
    value: f64,
}

/// File name used for a series export, e.g. `20141029_Bz.csv`.
pub fn series_file_name(series: &DailySeries) -> String {
    format!("{}_{}.csv", series.date().format("%Y%m%d"), series.quantity().slug())
}

/// Write one daily series as CSV (`date,time,seconds,utc,quantity,value`).
pub fn write_series_csv(path: &Path, series: &DailySeries) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let date = series.date().format("%Y%m%d").to_string();
    for (sample, (utc, value)) in series.samples().iter().zip(series.timestamped()) {
        writer
            .serialize(SeriesRow {
                date: date.clone(),
                time: sample.time.to_hhmm(),
                seconds: sample.time.seconds(),
                utc: utc.to_rfc3339(),
                quantity: series.quantity().slug(),
                value,
            })
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV '{}': {e}", path.display())))?;
    Ok(())
}

/// Write every non-empty series into `dir`; returns the files written.
pub fn export_series(dir: &Path, series: &[&DailySeries]) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::new();
    for s in series.iter().filter(|s| !s.is_empty()) {
        let path = dir.join(series_file_name(s));
        write_series_csv(&path, s)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quantity;
    use crate::series::assemble_daily;
    use crate::series::tests::{day, obs};

    #[test]
    fn writes_header_and_rows() {
        let dir = std::env::temp_dir().join(format!("swx-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let bz = assemble_daily(
            &[obs(day(29), "0001", Quantity::Bz, -2.5), obs(day(29), "0000", Quantity::Bz, 1.0)],
            day(29),
            Quantity::Bz,
        );
        let empty = DailySeries::empty(day(29), Quantity::Speed);

        let written = export_series(&dir, &[&bz, &empty]).unwrap();
        assert_eq!(written, vec![dir.join("20141029_Bz.csv")]);

        let text = std::fs::read_to_string(&written[0]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,time,seconds,utc,quantity,value");
        assert_eq!(lines[1], "20141029,0000,0,2014-10-29T00:00:00+00:00,Bz,1.0");
        assert_eq!(lines[2], "20141029,0001,60,2014-10-29T00:01:00+00:00,Bz,-2.5");

        std::fs::remove_dir_all(&dir).ok();
    }
}
