//! Annual project timeline: category groups, one row per project and twelve
//! month cells colored from the project's sparse plan map.
//!
//! Cell colors come only from the plan map, never from the project's own
//! status.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use egui::Color32;
use uuid::Uuid;

use crate::model::Project;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const ACTUAL_COLOR: Color32 = Color32::from_rgb(82, 196, 26);
pub const DELAYED_COLOR: Color32 = Color32::from_rgb(250, 173, 20);
pub const PLANNED_COLOR: Color32 = Color32::from_rgb(255, 77, 79);

/// Group name for projects without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Marker recorded for a project in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMarker {
    Planned,
    Actual,
    Delayed,
}

impl PlanMarker {
    /// `"actual"` and `"delayed"` are recognised; anything else counts as planned.
    pub fn from_plan_type(plan_type: &str) -> Self {
        match plan_type {
            "actual" => PlanMarker::Actual,
            "delayed" => PlanMarker::Delayed,
            _ => PlanMarker::Planned,
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            PlanMarker::Actual => ACTUAL_COLOR,
            PlanMarker::Delayed => DELAYED_COLOR,
            PlanMarker::Planned => PLANNED_COLOR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlanMarker::Actual => "Completed",
            PlanMarker::Delayed => "Delayed",
            PlanMarker::Planned => "Planned",
        }
    }
}

/// Marker for `month0` (0 = January) of `year`.
pub fn month_marker(project: &Project, year: i32, month0: u32) -> Option<PlanMarker> {
    project
        .plan_for(year, month0 + 1)
        .map(PlanMarker::from_plan_type)
}

/// Bar color for `month0` of `year`; `None` means no bar.
pub fn month_color(project: &Project, year: i32, month0: u32) -> Option<Color32> {
    month_marker(project, year, month0).map(PlanMarker::color)
}

/// 0-indexed month of `today`.
pub fn current_month(today: NaiveDate) -> u32 {
    today.month0()
}

/// Projects sharing a category, in incoming order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub name: String,
    pub projects: Vec<&'a Project>,
}

/// Partition by category. Preferred categories come first in preference
/// order; the rest follow in the order they are first seen.
pub fn group_by_category<'a>(projects: &'a [Project], preference: &[String]) -> Vec<CategoryGroup<'a>> {
    let mut groups: Vec<CategoryGroup<'a>> = Vec::new();
    for project in projects {
        let name = match project.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => UNCATEGORIZED,
        };
        match groups.iter_mut().find(|g| g.name.eq_ignore_ascii_case(name)) {
            Some(group) => group.projects.push(project),
            None => groups.push(CategoryGroup {
                name: name.to_string(),
                projects: vec![project],
            }),
        }
    }

    let rank = |name: &str| {
        preference
            .iter()
            .position(|p| p.eq_ignore_ascii_case(name))
            .unwrap_or(preference.len())
    };
    // Stable: unknown categories share the last rank and keep first-seen order.
    groups.sort_by_key(|g| rank(&g.name));
    groups
}

/// Header figures for the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineStats {
    pub total_projects: usize,
    pub total_tasks: u32,
    /// Rounded mean of the projects' own progress values.
    pub average_progress: u32,
}

impl TimelineStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        if projects.is_empty() {
            return Self::default();
        }
        let total_tasks = projects.iter().map(Project::total_tasks).sum();
        let sum: f64 = projects.iter().map(|p| f64::from(p.progress)).sum();
        let mean = sum / projects.len() as f64;
        Self {
            total_projects: projects.len(),
            total_tasks,
            average_progress: mean.round().clamp(0.0, 100.0) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthCell {
    pub month0: u32,
    pub marker: Option<PlanMarker>,
    pub color: Option<Color32>,
    /// Today's month in today's year.
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow<'a> {
    pub project: &'a Project,
    pub months: [MonthCell; 12],
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineGroup<'a> {
    pub name: String,
    pub rows: Vec<TimelineRow<'a>>,
}

/// Everything the timeline view renders for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineGrid<'a> {
    pub year: i32,
    pub current_month: Option<u32>,
    pub stats: TimelineStats,
    pub groups: Vec<TimelineGroup<'a>>,
}

pub fn build_year_grid<'a>(
    projects: &'a [Project],
    year: i32,
    today: NaiveDate,
    preference: &[String],
) -> TimelineGrid<'a> {
    let current = (today.year() == year).then(|| current_month(today));
    let groups = group_by_category(projects, preference)
        .into_iter()
        .map(|group| TimelineGroup {
            name: group.name,
            rows: group
                .projects
                .into_iter()
                .map(|project| TimelineRow {
                    project,
                    months: std::array::from_fn(|i| {
                        let month0 = i as u32;
                        MonthCell {
                            month0,
                            marker: month_marker(project, year, month0),
                            color: month_color(project, year, month0),
                            current: current == Some(month0),
                        }
                    }),
                })
                .collect(),
        })
        .collect();

    TimelineGrid {
        year,
        current_month: current,
        stats: TimelineStats::from_projects(projects),
        groups,
    }
}

/// Years worth offering in the year picker: every year with a marker, plus
/// the current one.
pub fn available_years(projects: &[Project], today: NaiveDate) -> Vec<i32> {
    let mut years: Vec<i32> = projects
        .iter()
        .filter_map(|p| p.timeline.as_ref())
        .flat_map(|t| t.years())
        .chain(std::iter::once(today.year()))
        .collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Projects whose task rows are shown. Empty by default.
#[derive(Debug, Clone, Default)]
pub struct ExpandedProjects(HashSet<Uuid>);

impl ExpandedProjects {
    pub fn is_expanded(&self, project_id: Uuid) -> bool {
        self.0.contains(&project_id)
    }

    /// Flip a project's state. Projects without tasks never expand.
    /// Returns the new state.
    pub fn toggle(&mut self, project: &Project) -> bool {
        if project.total_tasks() == 0 && project.tasks.is_empty() {
            return false;
        }
        if !self.0.remove(&project.id) {
            self.0.insert(project.id);
        }
        self.is_expanded(project.id)
    }

    pub fn collapse_all(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::model::project::ProjectTimeline;
    use crate::model::{ProjectStatus, Task, TaskStatus};

    fn project(name: &str, category: Option<&str>) -> Project {
        let mut p = Project::new(name, ProjectStatus::Active);
        p.category = category.map(String::from);
        p
    }

    fn with_plan(mut p: Project, year: i32, month: u32, plan: &str) -> Project {
        p.timeline
            .get_or_insert_with(ProjectTimeline::default)
            .set(year, month, plan);
        p
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[rstest]
    #[case("actual", ACTUAL_COLOR)]
    #[case("delayed", DELAYED_COLOR)]
    #[case("planned", PLANNED_COLOR)]
    #[case("tentative", PLANNED_COLOR)]
    #[case("", PLANNED_COLOR)]
    #[case("ACTUAL", PLANNED_COLOR)]
    fn plan_types_map_to_three_colors(#[case] plan: &str, #[case] expected: Color32) {
        let p = with_plan(project("p", None), 2026, 3, plan);
        assert_eq!(month_color(&p, 2026, 2), Some(expected));
    }

    #[test]
    fn absent_or_empty_timeline_has_no_bars() {
        let absent = project("absent", None);
        let mut empty = project("empty", None);
        empty.timeline = Some(ProjectTimeline::default());
        for p in [&absent, &empty] {
            for month0 in 0..12 {
                assert_eq!(month_color(p, 2026, month0), None);
            }
        }
    }

    #[test]
    fn color_ignores_project_status() {
        let mut p = with_plan(project("p", None), 2026, 1, "actual");
        p.status = ProjectStatus::Delay;
        assert_eq!(month_color(&p, 2026, 0), Some(ACTUAL_COLOR));
        assert_eq!(month_color(&p, 2025, 0), None);
    }

    #[test]
    fn categories_follow_preference_then_first_seen() {
        let projects = vec![
            project("a", Some("Zeta")),
            project("b", Some("Development")),
            project("c", None),
            project("d", Some("Strategic")),
            project("e", Some("Zeta")),
            project("f", Some("development")),
        ];
        let preference = vec!["Strategic".to_string(), "Development".to_string()];
        let groups = group_by_category(&projects, &preference);

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Strategic", "Development", "Zeta", UNCATEGORIZED]);
        let zeta: Vec<&str> = groups[2].projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(zeta, vec!["a", "e"]);
        let dev: Vec<&str> = groups[1].projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(dev, vec!["b", "f"]);
    }

    #[test]
    fn stats_trust_project_progress() {
        let mut a = project("a", None);
        a.progress = 33.0;
        a.task_count = Some(4);
        let mut b = project("b", None);
        b.progress = 66.5;
        b.tasks = vec![Task::new("t", b.id, TaskStatus::Done)];
        let stats = TimelineStats::from_projects(&[a, b]);
        assert_eq!(stats.total_projects, 2);
        assert_eq!(stats.total_tasks, 5);
        assert_eq!(stats.average_progress, 50);
        assert_eq!(TimelineStats::from_projects(&[]), TimelineStats::default());
    }

    #[test]
    fn grid_flags_only_the_current_month_of_the_current_year() {
        let projects = vec![with_plan(project("p", Some("Development")), 2026, 10, "delayed")];
        let grid = build_year_grid(&projects, 2026, today(), &[]);
        assert_eq!(grid.current_month, Some(9));
        let row = &grid.groups[0].rows[0];
        assert!(row.months[9].current);
        assert_eq!(row.months[9].marker, Some(PlanMarker::Delayed));
        assert_eq!(row.months.iter().filter(|m| m.current).count(), 1);
        assert_eq!(row.months.iter().filter(|m| m.color.is_some()).count(), 1);

        let other = build_year_grid(&projects, 2027, today(), &[]);
        assert_eq!(other.current_month, None);
        assert!(other.groups[0].rows[0].months.iter().all(|m| !m.current && m.color.is_none()));
    }

    #[test]
    fn years_include_markers_and_today() {
        let projects = vec![
            with_plan(project("a", None), 2024, 1, "actual"),
            with_plan(project("b", None), 2028, 5, "planned"),
        ];
        assert_eq!(available_years(&projects, today()), vec![2024, 2026, 2028]);
    }

    #[test]
    fn expanding_requires_tasks() {
        let mut expanded = ExpandedProjects::default();
        let empty = project("empty", None);
        assert!(!expanded.toggle(&empty));
        assert!(!expanded.is_expanded(empty.id));

        let mut busy = project("busy", None);
        busy.task_count = Some(2);
        assert!(expanded.toggle(&busy));
        assert!(expanded.is_expanded(busy.id));
        assert!(!expanded.toggle(&busy));
        assert!(!expanded.is_expanded(busy.id));
    }
}
