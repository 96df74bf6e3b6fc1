//! Export Center: every downloadable artifact, rebuilt from the session on
//! demand.
//!
//! ```text
//!   Dataset ──┬─> xlsx::workbook ───────> Emperor_Report.xlsx
//!             └─> csv::to_csv ──────────> data.csv
//!   Histogram ──> png::render_histogram ─> chart.png
//!   Stats ──────> pdf::report ──────────> report.pdf
//! ```

pub mod csv;
pub mod pdf;
pub mod png;
pub mod xlsx;

use crate::analysis::anova::AnovaResult;
use crate::analysis::describe::DescriptiveStats;
use crate::analysis::histogram::Histogram;
use crate::analysis::regression::RegressionResult;
use crate::data::model::Dataset;
use crate::error::{AnalysisError, AnalysisResult};

pub const WORKBOOK_FILE: &str = "Emperor_Report.xlsx";
pub const CSV_FILE: &str = "data.csv";
pub const CHART_FILE: &str = "chart.png";
pub const PDF_FILE: &str = "report.pdf";

/// One downloadable file, fully rendered in memory.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: &'static str,
    /// Text of the download button.
    pub label: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Extension without the dot, for save-dialog filters.
    pub fn extension(&self) -> &'static str {
        self.file_name.rsplit('.').next().unwrap_or("")
    }
}

/// All artifacts of one Export Center visit, in display order.
#[derive(Debug, Clone, Default)]
pub struct ExportBundle {
    pub artifacts: Vec<Artifact>,
}

impl ExportBundle {
    /// Render every artifact.  `chart.png` is included only when a chart
    /// exists.  The first exporter failure aborts the whole bundle.
    pub fn build(
        dataset: &Dataset,
        stats: &DescriptiveStats,
        regression: Option<&RegressionResult>,
        anova: Option<&AnovaResult>,
        chart: Option<&Histogram>,
    ) -> AnalysisResult<Self> {
        let mut artifacts = vec![
            Artifact {
                file_name: WORKBOOK_FILE,
                label: "Download Full Excel Report",
                bytes: xlsx::workbook(dataset, stats, regression, anova)
                    .map_err(AnalysisError::Export)?,
            },
            Artifact {
                file_name: CSV_FILE,
                label: "Download CSV",
                bytes: csv::to_csv(dataset).map_err(AnalysisError::Export)?,
            },
        ];

        if let Some(histogram) = chart {
            artifacts.push(Artifact {
                file_name: CHART_FILE,
                label: "Download Chart PNG",
                bytes: png::render_histogram(histogram).map_err(AnalysisError::Export)?,
            });
        }

        artifacts.push(Artifact {
            file_name: PDF_FILE,
            label: "Download PDF Report",
            bytes: pdf::report(stats).map_err(AnalysisError::Export)?,
        });

        Ok(Self { artifacts })
    }

    pub fn get(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.file_name == file_name)
    }

    pub fn file_names(&self) -> Vec<&'static str> {
        self.artifacts.iter().map(|a| a.file_name).collect()
    }
}
