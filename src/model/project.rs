use std::collections::BTreeMap;

use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dates;
use super::status::ProjectStatus;
use super::task::Task;
use super::user::UserRef;

/// Sparse per-month plan markers: `{"2026": {"3": "actual"}}`.
///
/// Years and 1-based months are JSON object keys, so both are strings on the
/// wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectTimeline(BTreeMap<String, BTreeMap<String, String>>);

impl ProjectTimeline {
    /// Plan type recorded for `month` (1-12) of `year`, if any.
    pub fn plan_for(&self, year: i32, month: u32) -> Option<&str> {
        let months = self.0.get(&year.to_string())?;
        months
            .get(&month.to_string())
            .or_else(|| months.get(&format!("{:02}", month)))
            .map(String::as_str)
    }

    #[cfg(test)]
    pub fn set(&mut self, year: i32, month: u32, plan_type: impl Into<String>) {
        self.0
            .entry(year.to_string())
            .or_default()
            .insert(month.to_string(), plan_type.into());
    }

    /// Years carrying at least one marker.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.0
            .iter()
            .filter(|(_, months)| !months.is_empty())
            .filter_map(|(year, _)| year.parse().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }
}

/// A project with the metadata the board, timeline and Gantt views need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Hex color string as stored by the server.
    #[serde(default)]
    pub color: Option<String>,
    pub status: ProjectStatus,
    #[serde(default, with = "dates::optional")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "dates::optional")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub members: Vec<UserRef>,
    #[serde(default)]
    pub owner: Option<UserRef>,
    #[serde(default)]
    pub category: Option<String>,
    /// Percent complete as maintained by the server.
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub task_count: Option<u32>,
    /// Child rows shown when the project is expanded in the timeline.
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub timeline: Option<ProjectTimeline>,
}

impl Project {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            color: None,
            status,
            start_date: None,
            end_date: None,
            members: Vec::new(),
            owner: None,
            category: None,
            progress: 0.0,
            sort_order: 0,
            task_count: None,
            tasks: Vec::new(),
            timeline: None,
        }
    }

    /// Number of tasks, preferring the server's count over the embedded list.
    pub fn total_tasks(&self) -> u32 {
        self.task_count.unwrap_or(self.tasks.len() as u32)
    }

    pub fn plan_for(&self, year: i32, month: u32) -> Option<&str> {
        self.timeline.as_ref().and_then(|t| t.plan_for(year, month))
    }

    /// Display color, or `fallback` when unset or malformed.
    pub fn display_color(&self, fallback: Color32) -> Color32 {
        self.color
            .as_deref()
            .and_then(|hex| parse_hex_color(hex).ok())
            .unwrap_or(fallback)
    }

    /// Date range declared on the project itself.
    pub fn date_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.start_date, self.end_date)
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(s: &str) -> Result<Color32, String> {
    let s = s.trim().trim_start_matches('#');
    let channel = |i: usize| {
        s.get(i..i + 2)
            .ok_or_else(|| format!("Invalid hex color '{}'", s))
            .and_then(|h| u8::from_str_radix(h, 16).map_err(|e| e.to_string()))
    };
    match s.len() {
        6 => Ok(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Ok(Color32::from_rgba_unmultiplied(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => Err(format!("Invalid hex color '{}': expected 6 or 8 hex digits", s)),
    }
}
