use crate::export::ExportBundle;
use crate::session::{Command, Session};

// ---------------------------------------------------------------------------
// Menu modes
// ---------------------------------------------------------------------------

/// Sidebar menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Upload,
    Clean,
    Statistics,
    Visualization,
    Regression,
    Anova,
    ExportCenter,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Upload,
        Mode::Clean,
        Mode::Statistics,
        Mode::Visualization,
        Mode::Regression,
        Mode::Anova,
        Mode::ExportCenter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Upload => "Upload",
            Mode::Clean => "Clean",
            Mode::Statistics => "Statistics",
            Mode::Visualization => "Visualization",
            Mode::Regression => "Regression",
            Mode::Anova => "ANOVA",
            Mode::ExportCenter => "Export Center",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Status line content; errors are drawn in red.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub mode: Mode,

    /// Dataset and analysis results.
    pub session: Session,

    /// Column picked in the Visualization view.
    pub chart_column: Option<String>,

    /// Target picked in the Regression view.
    pub regression_target: Option<String>,

    /// Grouping column picked in the ANOVA view.
    pub anova_group: Option<String>,

    /// Artifacts of the current Export Center visit.
    pub export: Option<ExportBundle>,

    pub status: Option<Status>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::Upload,
            session: Session::default(),
            chart_column: None,
            regression_target: None,
            anova_group: None,
            export: None,
            status: None,
        }
    }
}

impl AppState {
    /// Switch menu entry.  Entering the Export Center rebuilds every
    /// artifact; leaving it drops them.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.status = None;
        self.refresh_export();
    }

    /// Run one command and record its message in the status line.
    ///
    /// A command run while the Export Center is open (File → Open is always
    /// reachable) rebuilds the artifacts, so downloads always match the
    /// current session.
    pub fn run(&mut self, command: Command) {
        let is_upload = matches!(command, Command::Upload(_));
        let result = self.session.apply(command);
        let succeeded = result.is_ok();
        self.status = Some(match result {
            Ok(outcome) => Status::Info(outcome.to_string()),
            Err(e) => Status::Error(e.to_string()),
        });
        if is_upload {
            self.reset_selections();
        }
        if succeeded && self.mode == Mode::ExportCenter {
            self.refresh_export();
        }
    }

    /// Rebuild the export bundle when the Export Center is open, drop it
    /// otherwise.
    fn refresh_export(&mut self) {
        self.export = None;
        if self.mode != Mode::ExportCenter || self.session.dataset.is_none() {
            return;
        }
        match self.session.export_bundle() {
            Ok(bundle) => self.export = Some(bundle),
            Err(e) => {
                log::error!("{e}");
                self.status = Some(Status::Error(e.to_string()));
            }
        }
    }

    /// Drop picks that no longer name a suitable column.
    fn reset_selections(&mut self) {
        let Some(ds) = &self.session.dataset else {
            return;
        };
        let numeric = ds.numeric_column_names();
        let all = ds.column_names();
        let keep = |pick: &mut Option<String>, allowed: &[String]| {
            if pick.as_ref().is_some_and(|p| !allowed.contains(p)) {
                *pick = None;
            }
        };
        keep(&mut self.chart_column, &numeric);
        keep(&mut self.regression_target, &numeric);
        keep(&mut self.anova_group, &all);
    }

    pub fn set_error(&mut self, message: String) {
        self.status = Some(Status::Error(message));
    }

    pub fn set_info(&mut self, message: String) {
        self.status = Some(Status::Info(message));
    }
}
