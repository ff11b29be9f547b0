use crate::core::selector::ScheduleSelector;
use crate::core::{Degree, Result, Schedule, TermCatalog, TermKey, Viewer};
use crate::domain::model::DegreeKey;
use serde::{Deserialize, Serialize};

/// Degree summary shown next to the class schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeInfo {
    pub key: DegreeKey,
    pub code: String,
    pub name: String,
    pub curricular_plan: Option<String>,
}

impl From<&Degree> for DegreeInfo {
    fn from(degree: &Degree) -> Self {
        Self {
            key: degree.key.clone(),
            code: degree.code.clone(),
            name: degree.name.clone(),
            curricular_plan: degree
                .most_recent_curricular_plan()
                .map(|plan| plan.name.clone()),
        }
    }
}

/// Values handed to the page template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePage {
    pub degree_info: DegreeInfo,
    pub classes_by_curricular_year_and_semesters: Schedule,
}

impl SchedulePage {
    /// Builds the page for a request addressed by `request_path` segments.
    pub fn assemble<C: TermCatalog>(
        selector: &ScheduleSelector<C>,
        degree: &Degree,
        request_path: &[&str],
        viewer: Option<&Viewer>,
    ) -> Result<Self> {
        let requested = term_key_from_path(request_path);
        tracing::debug!(
            "Assembling classes page for {} (term: {})",
            degree.code,
            requested.as_ref().map_or("current", |k| k.as_str())
        );

        let schedule = selector.assemble_schedule(degree, requested.as_ref(), viewer)?;
        Ok(Self {
            degree_info: DegreeInfo::from(degree),
            classes_by_curricular_year_and_semesters: schedule,
        })
    }
}

/// 路徑超過兩段時，第二段為學期鍵值；否則使用目前學期
pub fn term_key_from_path(segments: &[&str]) -> Option<TermKey> {
    if segments.len() > 2 {
        let key = segments[1].trim();
        if !key.is_empty() {
            return Some(TermKey::new(key));
        }
    }
    None
}

/// Splits a request path such as `/classes/2024-S1/view` into its segments.
///
/// Only the leading and trailing slash are dropped; empty inner segments are
/// kept so `/classes//view` still addresses three segments.
pub fn split_request_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}
