//! Shared per-date pipeline used by the `run` and `plot` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> parse -> assemble -> chart -> (export, preview)
//!
//! Dates are processed one after another. Each date gets its own
//! `ObservationBatch`; nothing carries over between dates.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::data::{Archive, FetchOutcome};
use crate::domain::{DataProduct, Quantity, RunConfig};
use crate::error::AppError;
use crate::io::ingest::ParseStats;
use crate::plot::{self, ChartKind, ChartRenderer, ChartSpec};
use crate::series::{DailySeries, DualAxisSeries, ObservationBatch};

/// What happened to one product on one date.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductStatus {
    Parsed(ParseStats),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductReport {
    pub product: DataProduct,
    pub status: ProductStatus,
}

/// Outputs of one processed date.
#[derive(Debug, Clone)]
pub struct DayReport {
    pub date: NaiveDate,
    pub products: Vec<ProductReport>,
    /// Sample count per assembled series.
    pub series_len: Vec<(Quantity, usize)>,
    pub charts: Vec<(ChartKind, PathBuf)>,
    pub exports: Vec<PathBuf>,
    /// ASCII preview of Bz when requested.
    pub preview: Option<String>,
}

impl DayReport {
    pub fn retrieved_any(&self) -> bool {
        self.products
            .iter()
            .any(|p| matches!(p.status, ProductStatus::Parsed(_)))
    }
}

/// All computed outputs of a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub days: Vec<DayReport>,
}

impl RunOutput {
    pub fn chart_count(&self) -> usize {
        self.days.iter().map(|d| d.charts.len()).sum()
    }

    pub fn retrieved_any(&self) -> bool {
        self.days.iter().any(DayReport::retrieved_any)
    }

    /// Parse accounting summed over every retrieved file of the run.
    pub fn totals(&self) -> ParseStats {
        let mut total = ParseStats::default();
        for report in self.days.iter().flat_map(|d| &d.products) {
            if let ProductStatus::Parsed(stats) = &report.status {
                total.merge(stats);
            }
        }
        total
    }
}

/// Process every date in the configured range.
///
/// Only local I/O and rendering failures abort the run; a missing daily file
/// just skips that product for that date.
pub fn run_range(
    config: &RunConfig,
    archive: &dyn Archive,
    renderer: &dyn ChartRenderer,
) -> Result<RunOutput, AppError> {
    ensure_dir(&config.out_dir)?;
    if let Some(dir) = &config.export_dir {
        ensure_dir(dir)?;
    }

    log::info!(
        "Processing {} to {} from {}",
        config.start,
        config.end,
        archive.describe()
    );

    let mut out = RunOutput::default();
    for date in config.dates() {
        out.days.push(process_day(date, config, archive, renderer)?);
    }
    Ok(out)
}

/// Fetch, parse, chart and export a single date.
pub fn process_day(
    date: NaiveDate,
    config: &RunConfig,
    archive: &dyn Archive,
    renderer: &dyn ChartRenderer,
) -> Result<DayReport, AppError> {
    let mut batch = ObservationBatch::new();
    let mut products = Vec::with_capacity(DataProduct::ALL.len());

    for product in DataProduct::ALL {
        let status = match archive.fetch_daily(date, product) {
            FetchOutcome::Body(text) => {
                let stats = batch.ingest(&text, date, &product.layout());
                log::info!(
                    "{date} {}: {} records, {} skipped, {} missing values",
                    product.display_name(),
                    stats.parsed,
                    stats.rejected_total(),
                    stats.absent
                );
                ProductStatus::Parsed(stats)
            }
            FetchOutcome::Unavailable { reason, .. } => {
                log::warn!("{date} {}: no data ({reason})", product.display_name());
                ProductStatus::Unavailable(reason)
            }
        };
        products.push(ProductReport { product, status });
    }

    let bz = batch.daily(date, Quantity::Bz);
    let bt = batch.daily(date, Quantity::Bt);
    let speed = batch.daily(date, Quantity::Speed);

    let mut planned: Vec<(ChartKind, ChartSpec)> = Vec::new();
    if let Some(chart) = plot::bz_bt_chart(&bz, &bt) {
        planned.push((ChartKind::BzBt, chart));
    }
    if let Some(chart) = plot::truncated_bz_chart(&bz, config.truncate) {
        planned.push((ChartKind::TruncatedBz, chart));
    }
    let pair = DualAxisSeries::new(bz.clone(), speed.clone())?;
    if let Some(chart) = plot::bz_speed_chart(&pair) {
        planned.push((ChartKind::BzSpeed, chart));
    }
    if config.speed_chart {
        if let Some(chart) = plot::speed_chart(&speed) {
            planned.push((ChartKind::Speed, chart));
        }
    }

    let mut charts = Vec::with_capacity(planned.len());
    for (kind, chart) in planned {
        let path = config.out_dir.join(kind.file_name(date));
        renderer.render(&chart, &path)?;
        log::info!("{date}: wrote {}", path.display());
        charts.push((kind, path));
    }
    if charts.is_empty() {
        log::warn!("{date}: no chart produced");
    }

    let exports = match &config.export_dir {
        Some(dir) => crate::io::export::export_series(dir, &[&bz, &bt, &speed])?,
        None => Vec::new(),
    };

    let preview = config
        .preview
        .then(|| plot::render_ascii_series(&bz, config.preview_width, config.preview_height));

    Ok(DayReport {
        date,
        products,
        series_len: series_lengths(&[&bz, &bt, &speed]),
        charts,
        exports,
        preview,
    })
}

fn series_lengths(series: &[&DailySeries]) -> Vec<(Quantity, usize)> {
    series.iter().map(|s| (s.quantity(), s.len())).collect()
}

fn ensure_dir(dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create directory '{}': {e}", dir.display())))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use chrono::TimeDelta;

    use super::*;

    struct MemoryArchive {
        files: HashMap<(NaiveDate, DataProduct), String>,
    }

    impl Archive for MemoryArchive {
        fn fetch_daily(&self, date: NaiveDate, product: DataProduct) -> FetchOutcome {
            match self.files.get(&(date, product)) {
                Some(text) => FetchOutcome::Body(text.clone()),
                None => FetchOutcome::Unavailable {
                    status: Some(404),
                    reason: "404 Not Found".to_string(),
                },
            }
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        rendered: RefCell<Vec<(ChartSpec, PathBuf)>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), AppError> {
            self.rendered.borrow_mut().push((chart.clone(), path.to_path_buf()));
            Ok(())
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2014, 10, d).unwrap()
    }

    fn mag_file(date: NaiveDate, bz_offset: f64) -> String {
        let mut text = String::from("#YR MO DA  HHMM    Day      Day    S     Bx      By      Bz      Bt     Lat.   Long.\n");
        for hour in 0..24 {
            let bz = if hour == 5 { "-999.9".to_string() } else { format!("{:.1}", bz_offset + hour as f64) };
            text.push_str(&format!(
                "{}  {:02}00   56959   {:5}   0    -2.1     3.4   {bz}     4.2   -16.3   121.5\n",
                date.format("%Y %m %d"),
                hour,
                hour * 3600
            ));
        }
        text.push_str("bad line\n");
        text
    }

    fn swepam_file(date: NaiveDate) -> String {
        let mut text = String::from(":Data_list: swepam\n");
        for hour in [0, 6, 12, 18] {
            text.push_str(&format!(
                "{}  {:02}07   56959   {:5}   0      4.3      {}.0   7.3e+04\n",
                date.format("%Y %m %d"),
                hour,
                hour * 3600 + 420,
                400 + hour
            ));
        }
        text
    }

    fn config(out_dir: PathBuf) -> RunConfig {
        RunConfig {
            start: day(29),
            end: day(31),
            out_dir,
            data_dir: None,
            archive_url: String::new(),
            truncate: TimeDelta::hours(8),
            chart_width: 400,
            chart_height: 300,
            speed_chart: true,
            export_dir: None,
            preview: false,
            preview_width: 60,
            preview_height: 10,
        }
    }

    fn temp_out(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("swx-pipeline-{tag}-{}", std::process::id()))
    }

    #[test]
    fn failed_fetch_skips_only_that_product_and_date() {
        let mut files = HashMap::new();
        files.insert((day(29), DataProduct::Mag), mag_file(day(29), 0.0));
        files.insert((day(29), DataProduct::Swepam), swepam_file(day(29)));
        // 30th: mag missing, speed present. 31st: nothing.
        files.insert((day(30), DataProduct::Swepam), swepam_file(day(30)));
        let archive = MemoryArchive { files };
        let renderer = RecordingRenderer::default();
        let out_dir = temp_out("skip");

        let run = run_range(&config(out_dir.clone()), &archive, &renderer).unwrap();
        assert_eq!(run.days.len(), 3);

        let first = &run.days[0];
        let kinds: Vec<ChartKind> = first.charts.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            [ChartKind::BzBt, ChartKind::TruncatedBz, ChartKind::BzSpeed, ChartKind::Speed]
        );
        assert_eq!(first.charts[0].1, out_dir.join("20141029BzandBt.png"));
        assert_eq!(first.series_len, vec![(Quantity::Bz, 23), (Quantity::Bt, 24), (Quantity::Speed, 4)]);
        let ProductStatus::Parsed(stats) = &first.products[0].status else {
            panic!("mag should have parsed");
        };
        assert_eq!(stats.parsed, 24);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.rejected_total(), 1);
        assert_eq!(stats.ignored, 1);

        let second = &run.days[1];
        assert!(matches!(second.products[0].status, ProductStatus::Unavailable(_)));
        assert!(matches!(second.products[1].status, ProductStatus::Parsed(_)));
        let kinds: Vec<ChartKind> = second.charts.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, [ChartKind::Speed]);

        let third = &run.days[2];
        assert!(!third.retrieved_any());
        assert!(third.charts.is_empty());

        assert!(run.retrieved_any());
        assert_eq!(run.chart_count(), 5);
        let totals = run.totals();
        assert_eq!(totals.parsed, 24 + 4 + 4);
        assert_eq!(totals.absent, 1);
        assert_eq!(totals.ignored, 3);
        assert_eq!(renderer.rendered.borrow().len(), 5);

        std::fs::remove_dir_all(&out_dir).ok();
    }

    #[test]
    fn dual_axis_chart_only_uses_its_own_date() {
        let mut files = HashMap::new();
        files.insert((day(29), DataProduct::Mag), mag_file(day(29), 0.0));
        files.insert((day(29), DataProduct::Swepam), swepam_file(day(29)));
        files.insert((day(30), DataProduct::Mag), mag_file(day(30), 100.0));
        files.insert((day(30), DataProduct::Swepam), swepam_file(day(30)));
        let archive = MemoryArchive { files };
        let renderer = RecordingRenderer::default();
        let out_dir = temp_out("dual");
        let mut config = config(out_dir.clone());
        config.end = day(30);
        config.speed_chart = false;

        run_range(&config, &archive, &renderer).unwrap();

        let rendered = renderer.rendered.borrow();
        let dual: Vec<&ChartSpec> = rendered
            .iter()
            .filter(|(_, p)| p.to_string_lossy().ends_with("BzandSWSpeed.png"))
            .map(|(c, _)| c)
            .collect();
        assert_eq!(dual.len(), 2);
        // 29th: Bz in [0, 23]; 30th: Bz in [100, 123].
        assert_eq!(dual[0].primary.value_range(), Some((0.0, 23.0)));
        assert_eq!(dual[1].primary.value_range(), Some((100.0, 123.0)));
        assert_eq!(dual[0].primary.lines[0].points.len(), 23);
        assert_eq!(dual[0].secondary.as_ref().unwrap().lines[0].points.len(), 4);

        std::fs::remove_dir_all(&out_dir).ok();
    }

    #[test]
    fn truncated_chart_follows_config() {
        let mut files = HashMap::new();
        files.insert((day(29), DataProduct::Mag), mag_file(day(29), 0.0));
        let archive = MemoryArchive { files };
        let renderer = RecordingRenderer::default();
        let out_dir = temp_out("trunc");
        let mut config = config(out_dir.clone());
        config.end = day(29);
        config.truncate = TimeDelta::hours(20);
        config.preview = true;

        let run = run_range(&config, &archive, &renderer).unwrap();
        let day = &run.days[0];
        let truncated = renderer
            .rendered
            .borrow()
            .iter()
            .find(|(_, p)| p.ends_with("20141029_Bz.png"))
            .map(|(c, _)| c.clone())
            .unwrap();
        // Last sample 23:00, minus 20h -> 03:00; hour 5 is the sentinel.
        assert_eq!(truncated.x_range, (0.0, 3.0));
        assert_eq!(truncated.primary.lines[0].points.len(), 4);
        assert!(day.preview.as_deref().unwrap().starts_with("20141029 Bz [nT] | n=23"));

        std::fs::remove_dir_all(&out_dir).ok();
    }
}
