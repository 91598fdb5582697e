//! Spreadsheet and document exports.

/// Landscape PDF rendering of the team preview.
pub mod pdf;
/// Tabular views shared by every export format.
pub mod table;
/// xlsx serialization of tabular views.
pub mod xlsx;

pub use table::{Cell, Sheet, TeamSheetLayout};

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::{models::team_title, state::TrackerState};

/// File name of the combined workbook.
pub const COMBINED_FILENAME: &str = "player_gameday_tracker.xlsx";

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("failed to compile whitespace regex"));

/// File name of a per-team preview export: `Team 1` + `pdf` gives
/// `team_1_preview.pdf`.
pub fn preview_filename(title: &str, extension: &str) -> String {
    let stem = WHITESPACE_RE.replace_all(&title.trim().to_lowercase(), "_").into_owned();
    format!("{stem}_preview.{extension}")
}

/// Writes exports of a tracker snapshot into a target directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    out_dir: PathBuf,
    layout: TeamSheetLayout,
}

impl Exporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            layout: TeamSheetLayout::default(),
        }
    }

    /// Choose the team sheet layout of the combined workbook.
    pub fn with_layout(mut self, layout: TeamSheetLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Roster plus every team in one workbook.
    pub fn export_workbook(&self, state: &TrackerState) -> Result<PathBuf> {
        let sheets = table::workbook_sheets(state, self.layout);
        let bytes = xlsx::workbook_bytes(&sheets)?;
        let path = self.write(COMBINED_FILENAME, &bytes)?;
        info!(path = %path.display(), sheets = sheets.len(), "Workbook exported");
        Ok(path)
    }

    /// Preview layout of one team as a single-sheet workbook.
    pub fn export_team_preview(&self, state: &TrackerState, team: usize) -> Result<PathBuf> {
        let title = team_title(team);
        let sheet = table::team_preview_sheet(state, team);
        let bytes = xlsx::workbook_bytes(std::slice::from_ref(&sheet))?;
        let path = self.write(&preview_filename(&title, "xlsx"), &bytes)?;
        info!(path = %path.display(), team, "Team preview exported");
        Ok(path)
    }

    /// Preview layout of one team as a landscape PDF page.
    ///
    /// Returns `None` without writing anything when the team has no game days.
    pub fn export_team_document(
        &self,
        state: &TrackerState,
        team: usize,
    ) -> Result<Option<PathBuf>> {
        let title = team_title(team);
        let sheet = table::team_preview_sheet(state, team);
        let Some(bytes) = pdf::preview_document(&title, &sheet)? else {
            warn!(team, "Team has no game days to capture; document skipped");
            return Ok(None);
        };
        let path = self.write(&preview_filename(&title, "pdf"), &bytes)?;
        info!(path = %path.display(), team, "Team document exported");
        Ok(Some(path))
    }

    fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("failed to create {}", self.out_dir.display()))?;
        let path = self.out_dir.join(file_name);
        fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
