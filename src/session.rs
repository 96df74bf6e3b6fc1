use std::fmt;
use std::path::PathBuf;

use crate::analysis::anova::{self, AnovaResult};
use crate::analysis::describe::{self, DescriptiveStats};
use crate::analysis::histogram::{self, Histogram};
use crate::analysis::regression::{self, RegressionResult};
use crate::data::clean::{self, CleanReport};
use crate::data::loader;
use crate::data::model::Dataset;
use crate::error::{AnalysisError, AnalysisResult};
use crate::export::ExportBundle;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One user action.  Each variant runs exactly one component.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload(PathBuf),
    Clean,
    Visualize { column: String },
    Regress { target: String },
    Anova { group: String },
}

/// What a successful command did; its `Display` is the status message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Uploaded { rows: usize, columns: usize },
    Cleaned(CleanReport),
    Charted { column: String },
    Regressed { r_squared: f64 },
    Anova { f_value: f64, p_value: f64 },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Uploaded { .. } => write!(f, "Uploaded Successfully"),
            Outcome::Cleaned(report) => write!(
                f,
                "Cleaned: {} duplicate rows removed, {} missing values filled",
                report.duplicates_removed, report.values_filled
            ),
            Outcome::Charted { column } => write!(f, "Histogram of {column}"),
            Outcome::Regressed { r_squared } => write!(f, "R2 Score: {r_squared}"),
            Outcome::Anova { f_value, p_value } => {
                write!(f, "F Value: {f_value}, P Value: {p_value}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Session store
// ---------------------------------------------------------------------------

/// Everything one running application remembers.
///
/// Upload and Clean replace only the dataset; the regression, ANOVA and
/// chart results stay until the same component runs again.
#[derive(Debug, Default)]
pub struct Session {
    pub dataset: Option<Dataset>,
    pub regression: Option<RegressionResult>,
    pub anova: Option<AnovaResult>,
    pub chart: Option<Histogram>,
}

impl Session {
    /// Run one command.  On error the session is left exactly as it was.
    pub fn apply(&mut self, command: Command) -> AnalysisResult<Outcome> {
        let result = match command {
            Command::Upload(path) => self.upload(path),
            Command::Clean => self.clean(),
            Command::Visualize { column } => self.visualize(column),
            Command::Regress { target } => self.regress(target),
            Command::Anova { group } => self.anova(group),
        };

        match &result {
            Ok(outcome) => log::info!("{outcome}"),
            Err(AnalysisError::Load(e)) => log::error!("Failed to load file: {e:#}"),
            Err(e) => log::warn!("Command rejected: {e}"),
        }
        result
    }

    fn dataset(&self) -> AnalysisResult<&Dataset> {
        self.dataset.as_ref().ok_or(AnalysisError::NoDataset)
    }

    fn upload(&mut self, path: PathBuf) -> AnalysisResult<Outcome> {
        let dataset = loader::load_file(&path).map_err(|e| {
            // Keep domain errors raised by the loader (unsupported format)
            // as they are; everything else is a load failure.
            e.downcast::<AnalysisError>()
                .unwrap_or_else(AnalysisError::Load)
        })?;

        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            dataset.len(),
            dataset.column_names(),
            path.display()
        );
        let outcome = Outcome::Uploaded {
            rows: dataset.len(),
            columns: dataset.width(),
        };
        self.dataset = Some(dataset);
        Ok(outcome)
    }

    fn clean(&mut self) -> AnalysisResult<Outcome> {
        let (cleaned, report) = clean::clean(self.dataset()?);
        self.dataset = Some(cleaned);
        Ok(Outcome::Cleaned(report))
    }

    fn visualize(&mut self, column: String) -> AnalysisResult<Outcome> {
        let chart = histogram::histogram(self.dataset()?, &column)?;
        self.chart = Some(chart);
        Ok(Outcome::Charted { column })
    }

    fn regress(&mut self, target: String) -> AnalysisResult<Outcome> {
        let result = regression::fit(self.dataset()?, &target)?;
        let r_squared = result.r_squared;
        self.regression = Some(result);
        Ok(Outcome::Regressed { r_squared })
    }

    fn anova(&mut self, group: String) -> AnalysisResult<Outcome> {
        let result = anova::one_way(self.dataset()?, &group)?;
        let outcome = Outcome::Anova {
            f_value: result.f_value,
            p_value: result.p_value,
        };
        self.anova = Some(result);
        Ok(outcome)
    }

    // ---- read-only views ----

    pub fn describe(&self) -> AnalysisResult<DescriptiveStats> {
        Ok(describe::describe(self.dataset()?))
    }

    /// Regenerate every export artifact from the current state.
    pub fn export_bundle(&self) -> AnalysisResult<ExportBundle> {
        let dataset = self.dataset()?;
        let stats = describe::describe(dataset);
        let bundle = ExportBundle::build(
            dataset,
            &stats,
            self.regression.as_ref(),
            self.anova.as_ref(),
            self.chart.as_ref(),
        )?;
        log::debug!("Export bundle ready: {:?}", bundle.file_names());
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use calamine::{Reader, Xlsx};

    use super::*;
    use crate::data::model::CellValue;
    use crate::export::{CHART_FILE, WORKBOOK_FILE};
    use crate::export::xlsx::{SHEET_ANOVA, SHEET_DATA, SHEET_REGRESSION, SHEET_STATISTICS};

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn sheet_names(bundle: &ExportBundle) -> Vec<String> {
        let bytes = bundle.get(WORKBOOK_FILE).unwrap().bytes.clone();
        Xlsx::new(std::io::Cursor::new(bytes))
            .unwrap()
            .sheet_names()
            .to_vec()
    }

    const SAMPLE: &str = "group,x,y\n\
                          a,1,2\n\
                          a,2,4\n\
                          b,3,6\n\
                          b,4,\n\
                          a,1,2\n";

    #[test]
    fn commands_need_a_dataset() {
        let mut session = Session::default();
        assert!(matches!(session.apply(Command::Clean), Err(AnalysisError::NoDataset)));
        assert!(matches!(
            session.apply(Command::Regress { target: "y".into() }),
            Err(AnalysisError::NoDataset)
        ));
        assert!(matches!(session.describe(), Err(AnalysisError::NoDataset)));
        assert!(matches!(session.export_bundle(), Err(AnalysisError::NoDataset)));
    }

    #[test]
    fn full_session_flow() {
        let file = csv_file(SAMPLE);
        let mut session = Session::default();

        let outcome = session.apply(Command::Upload(file.path().to_path_buf())).unwrap();
        assert_eq!(outcome.to_string(), "Uploaded Successfully");
        assert_eq!(session.dataset.as_ref().unwrap().len(), 5);

        // Gaps block the regression until the data is cleaned.
        assert!(matches!(
            session.apply(Command::Regress { target: "y".into() }),
            Err(AnalysisError::MissingValues(_))
        ));
        assert!(session.regression.is_none());

        let outcome = session.apply(Command::Clean).unwrap();
        assert_eq!(
            outcome,
            Outcome::Cleaned(CleanReport {
                duplicates_removed: 1,
                values_filled: 1
            })
        );
        let ds = session.dataset.as_ref().unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.rows[3][2], CellValue::Float(4.0));

        let bundle = session.export_bundle().unwrap();
        assert_eq!(sheet_names(&bundle), vec![SHEET_DATA, SHEET_STATISTICS]);
        assert!(bundle.get(CHART_FILE).is_none());

        session.apply(Command::Visualize { column: "x".into() }).unwrap();
        let outcome = session.apply(Command::Regress { target: "y".into() }).unwrap();
        assert!(outcome.to_string().starts_with("R2 Score: "));
        session.apply(Command::Anova { group: "group".into() }).unwrap();

        let bundle = session.export_bundle().unwrap();
        assert_eq!(
            sheet_names(&bundle),
            vec![SHEET_DATA, SHEET_STATISTICS, SHEET_REGRESSION, SHEET_ANOVA]
        );
        assert!(bundle.get(CHART_FILE).is_some());
    }

    #[test]
    fn failed_upload_keeps_previous_state() {
        let file = csv_file("a,b\n1,2\n3,4\n");
        let mut session = Session::default();
        session.apply(Command::Upload(file.path().to_path_buf())).unwrap();
        session.apply(Command::Visualize { column: "a".into() }).unwrap();
        let before = session.dataset.clone();

        let err = session
            .apply(Command::Upload(PathBuf::from("notes.txt")))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat(ext) if ext == "txt"));

        let err = session
            .apply(Command::Upload(PathBuf::from("/nonexistent/missing.csv")))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Load(_)));

        assert_eq!(session.dataset, before);
        assert!(session.chart.is_some());
    }

    #[test]
    fn failed_analysis_keeps_previous_result() {
        let file = csv_file("g,x\na,1\na,2\nb,5\nb,7\n");
        let mut session = Session::default();
        session.apply(Command::Upload(file.path().to_path_buf())).unwrap();
        session.apply(Command::Anova { group: "g".into() }).unwrap();
        let before = session.anova.clone();

        assert!(session.apply(Command::Anova { group: "missing".into() }).is_err());
        assert!(session
            .apply(Command::Visualize { column: "g".into() })
            .is_err());
        assert_eq!(session.anova, before);
        assert!(session.chart.is_none());
    }

    #[test]
    fn upload_keeps_earlier_results() {
        let first = csv_file("x,y\n1,2\n2,4\n3,7\n");
        let second = csv_file("u\n1\n");
        let mut session = Session::default();

        session.apply(Command::Upload(first.path().to_path_buf())).unwrap();
        session.apply(Command::Regress { target: "y".into() }).unwrap();
        session.apply(Command::Upload(second.path().to_path_buf())).unwrap();

        assert_eq!(session.dataset.as_ref().unwrap().column_names(), vec!["u"]);
        assert!(session.regression.is_some());
    }
}
