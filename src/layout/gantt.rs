//! Gantt layout: visible date range, week/month header buckets and per-task
//! bar geometry in percent of the visible range.
//!
//! Everything shares one axis. The range starts on a week boundary and ends
//! where the last week bucket ends, so `total_days` is always a multiple of
//! seven and week gridlines land on the same dates as the bars.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use egui::Color32;
use uuid::Uuid;

use crate::model::{Task, TaskPriority, TaskStatus};

/// Days of padding before the earliest date.
pub const LEAD_PADDING_DAYS: i64 = 3;
/// Days of padding after the latest date.
pub const TRAIL_PADDING_DAYS: i64 = 7;
/// Bars never get narrower than this, so one-day tasks stay clickable.
pub const MIN_BAR_WIDTH_PERCENT: f32 = 1.0;

/// One week column of the header.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    pub start: NaiveDate,
    /// Offset of `start` on the chart axis.
    pub left_percent: f32,
    pub label: String,
    pub year: i32,
    pub month: u32,
}

/// A month spanning one or more consecutive weeks.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthHeader {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub weeks: usize,
    pub width_percent: f32,
}

/// Geometry and styling of one task bar.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttRow {
    pub task_id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub progress: u8,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub duration_days: i64,
    pub left_percent: f32,
    pub width_percent: f32,
    /// Fill, from the status.
    pub bar_color: Color32,
    /// Left border, from the priority.
    pub border_color: Color32,
    pub is_subtask: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GanttLayout {
    /// First day on the chart, always a week start.
    pub range_start: Option<NaiveDate>,
    /// First day after the chart, the end of the last week bucket.
    pub range_end: Option<NaiveDate>,
    pub total_days: i64,
    pub weeks: Vec<WeekBucket>,
    pub months: Vec<MonthHeader>,
    pub rows: Vec<GanttRow>,
    /// Tasks left off the chart for lack of dates.
    pub undated: usize,
}

impl GanttLayout {
    /// Layout with nothing to draw.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.total_days == 0
    }

    /// Lay out `tasks`, widening the range to include the project's own
    /// start/end dates when given.
    pub fn compute(
        tasks: &[Task],
        project_range: (Option<NaiveDate>, Option<NaiveDate>),
        week_start: Weekday,
    ) -> Self {
        let mut dated: Vec<(&Task, NaiveDate, NaiveDate)> = tasks
            .iter()
            .filter_map(|t| t.date_span().map(|(start, end)| (t, start, end)))
            .collect();
        let undated = tasks.len() - dated.len();
        if dated.is_empty() {
            return Self {
                undated,
                ..Self::empty()
            };
        }

        let (project_start, project_end) = project_range;
        let all_dates = dated
            .iter()
            .flat_map(|(_, start, end)| [*start, *end])
            .chain(project_start)
            .chain(project_end);
        let (min, max) = all_dates.fold((NaiveDate::MAX, NaiveDate::MIN), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        });

        let range_start = start_of_week(min - Duration::days(LEAD_PADDING_DAYS), week_start);
        let padded_end = max + Duration::days(TRAIL_PADDING_DAYS);
        let weeks = week_buckets(range_start, padded_end);
        let range_end = range_start + Duration::days(7 * weeks.len() as i64);
        let total_days = (range_end - range_start).num_days();
        let months = month_headers(&weeks);

        // Stable sort keeps input order for equal starts.
        dated.sort_by_key(|(task, _, _)| task.effective_start());
        let rows = dated
            .into_iter()
            .map(|(task, start, end)| bar_for(task, start, end, range_start, total_days))
            .collect();

        Self {
            range_start: Some(range_start),
            range_end: Some(range_end),
            total_days,
            weeks,
            months,
            rows,
            undated,
        }
    }

    /// Offset of `date` on the chart axis in percent, when inside the range.
    pub fn percent_at(&self, date: NaiveDate) -> Option<f32> {
        let (start, end) = (self.range_start?, self.range_end?);
        if self.total_days == 0 || date < start || date >= end {
            return None;
        }
        Some(percent_of((date - start).num_days(), self.total_days))
    }

    /// Horizontal position of the today marker.
    pub fn today_percent(&self, today: NaiveDate) -> Option<f32> {
        self.percent_at(today)
    }
}

fn percent_of(days: i64, total_days: i64) -> f32 {
    (days as f64 / total_days as f64 * 100.0) as f32
}

fn bar_for(task: &Task, start: NaiveDate, end: NaiveDate, range_start: NaiveDate, total_days: i64) -> GanttRow {
    // Both ends count: a task due the day it starts lasts one day.
    let duration_days = (end - start).num_days() + 1;
    let left_percent = percent_of((start - range_start).num_days(), total_days).clamp(0.0, 100.0);
    let width_percent = percent_of(duration_days, total_days).max(MIN_BAR_WIDTH_PERCENT);
    GanttRow {
        task_id: task.id,
        title: task.title.clone(),
        status: task.status,
        priority: task.priority,
        progress: task.progress,
        start,
        end,
        duration_days,
        left_percent,
        width_percent,
        bar_color: task.status.color(),
        border_color: task.priority.color(),
        is_subtask: task.is_subtask(),
    }
}

/// First day of the week containing `date`.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
    date - Duration::days(i64::from(offset))
}

/// Seven-day buckets from `range_start` (already aligned) until one starts
/// after `padded_end`.
fn week_buckets(range_start: NaiveDate, padded_end: NaiveDate) -> Vec<WeekBucket> {
    let count = (padded_end - range_start).num_days() / 7 + 1;
    let total_days = count * 7;
    (0..count)
        .map(|i| {
            let start = range_start + Duration::days(i * 7);
            WeekBucket {
                start,
                left_percent: percent_of(i * 7, total_days),
                label: start.format("%d %b").to_string(),
                year: start.year(),
                month: start.month(),
            }
        })
        .collect()
}

fn month_headers(weeks: &[WeekBucket]) -> Vec<MonthHeader> {
    let mut months: Vec<MonthHeader> = Vec::new();
    for week in weeks {
        match months.last_mut() {
            Some(m) if m.year == week.year && m.month == week.month => m.weeks += 1,
            _ => months.push(MonthHeader {
                label: week.start.format("%b %Y").to_string(),
                year: week.year,
                month: week.month,
                weeks: 1,
                width_percent: 0.0,
            }),
        }
    }
    let total = weeks.len().max(1) as f32;
    for month in &mut months {
        month.width_percent = month.weeks as f32 / total * 100.0;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(title: &str, start: Option<NaiveDate>, due: Option<NaiveDate>) -> Task {
        Task::new(title, Uuid::nil(), TaskStatus::Todo).with_dates(start, due)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn no_dated_tasks_gives_empty_layout() {
        let tasks = vec![task("a", None, None), task("b", None, None)];
        let layout = GanttLayout::compute(&tasks, (Some(date(2026, 1, 1)), None), Weekday::Mon);
        assert!(layout.is_empty());
        assert_eq!(layout.total_days, 0);
        assert!(layout.weeks.is_empty());
        assert!(layout.rows.is_empty());
        assert_eq!(layout.undated, 2);
        assert_eq!(layout.today_percent(date(2026, 1, 1)), None);

        assert!(GanttLayout::compute(&[], (None, None), Weekday::Mon).is_empty());
    }

    #[test]
    fn single_task_layout() {
        let tasks = vec![task("a", Some(date(2026, 3, 1)), Some(date(2026, 3, 5)))];
        let layout = GanttLayout::compute(&tasks, (None, None), Weekday::Mon);

        // 02-26 after padding, pulled back to Monday 02-23; the padded end
        // 03-12 falls in the week of 03-09, which ends before 03-16.
        assert_eq!(layout.range_start, Some(date(2026, 2, 23)));
        assert_eq!(layout.range_end, Some(date(2026, 3, 16)));
        assert_eq!(layout.total_days, 21);
        assert_eq!(layout.total_days, layout.weeks.len() as i64 * 7);

        let row = &layout.rows[0];
        assert_eq!(row.duration_days, 5);
        assert!(row.left_percent > 0.0);
        assert!(approx(row.left_percent, 6.0 / 21.0 * 100.0));
        assert!(approx(row.width_percent, 5.0 / 21.0 * 100.0));
    }

    #[test]
    fn week_gridlines_share_the_bar_axis() {
        // Starts on a Monday, so the bar must begin exactly on a gridline.
        let tasks = vec![task("a", Some(date(2026, 3, 2)), Some(date(2026, 3, 4)))];
        let layout = GanttLayout::compute(&tasks, (None, None), Weekday::Mon);

        let week = layout.weeks.iter().find(|w| w.start == date(2026, 3, 2)).unwrap();
        assert!(approx(week.left_percent, layout.rows[0].left_percent));

        // Equal-width header columns put week i at i / weeks.len().
        let n = layout.weeks.len() as f32;
        for (i, week) in layout.weeks.iter().enumerate() {
            assert!(approx(week.left_percent, i as f32 / n * 100.0));
            assert!(approx(layout.percent_at(week.start).unwrap(), week.left_percent));
        }

        // Month widths add up on the same axis.
        let march = layout.months.iter().find(|m| m.month == 3).unwrap();
        let first_march_week = layout.weeks.iter().find(|w| w.month == 3).unwrap();
        let before: f32 = layout
            .months
            .iter()
            .take_while(|m| m.month != 3)
            .map(|m| m.width_percent)
            .sum();
        assert!(approx(before, first_march_week.left_percent));
        assert!(march.width_percent > 0.0);
    }

    #[test]
    fn weeks_align_to_week_start_and_group_into_months() {
        let tasks = vec![task("a", Some(date(2026, 3, 1)), Some(date(2026, 3, 5)))];
        let layout = GanttLayout::compute(&tasks, (None, None), Weekday::Mon);

        let starts: Vec<NaiveDate> = layout.weeks.iter().map(|w| w.start).collect();
        assert_eq!(starts, vec![date(2026, 2, 23), date(2026, 3, 2), date(2026, 3, 9)]);

        assert_eq!(layout.months.len(), 2);
        assert_eq!(layout.months[0].month, 2);
        assert_eq!(layout.months[0].weeks, 1);
        assert!(approx(layout.months[1].width_percent, 200.0 / 3.0));
        let total: f32 = layout.months.iter().map(|m| m.width_percent).sum();
        assert!(approx(total, 100.0));

        let sunday = GanttLayout::compute(&tasks, (None, None), Weekday::Sun);
        assert_eq!(sunday.weeks[0].start, date(2026, 2, 22));
    }

    #[test]
    fn single_date_tasks_and_minimum_width() {
        let tasks = vec![
            task("long", Some(date(2026, 1, 1)), Some(date(2027, 12, 31))),
            task("due only", None, Some(date(2026, 6, 1))),
            task("undated", None, None),
        ];
        let layout = GanttLayout::compute(&tasks, (None, None), Weekday::Mon);
        assert_eq!(layout.undated, 1);
        assert_eq!(layout.rows.len(), 2);

        let due_only = layout.rows.iter().find(|r| r.title == "due only").unwrap();
        assert_eq!(due_only.start, due_only.end);
        assert_eq!(due_only.duration_days, 1);
        assert!(approx(due_only.width_percent, MIN_BAR_WIDTH_PERCENT));
    }

    #[test]
    fn rows_sort_by_effective_start_stably() {
        let tasks = vec![
            task("late", Some(date(2026, 5, 1)), None),
            task("tie-1", Some(date(2026, 4, 1)), Some(date(2026, 4, 3))),
            task("due-fallback", None, Some(date(2026, 3, 1))),
            task("tie-2", Some(date(2026, 4, 1)), Some(date(2026, 4, 9))),
        ];
        let layout = GanttLayout::compute(&tasks, (None, None), Weekday::Mon);
        let order: Vec<&str> = layout.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(order, vec!["due-fallback", "tie-1", "tie-2", "late"]);
    }

    #[test]
    fn project_dates_widen_the_range() {
        let tasks = vec![task("a", Some(date(2026, 3, 1)), Some(date(2026, 3, 5)))];
        let layout = GanttLayout::compute(
            &tasks,
            (Some(date(2026, 2, 1)), Some(date(2026, 4, 30))),
            Weekday::Mon,
        );
        // 01-29 pulled back to Monday 01-26; 05-07 sits in the week ending 05-11.
        assert_eq!(layout.range_start, Some(date(2026, 1, 26)));
        assert_eq!(layout.range_end, Some(date(2026, 5, 11)));
        assert!(layout.rows[0].left_percent > 0.0);
    }

    #[test]
    fn colors_come_from_status_and_priority_separately() {
        let mut t = task("a", Some(date(2026, 3, 1)), None);
        t.status = TaskStatus::InProgress;
        t.priority = TaskPriority::Urgent;
        let layout = GanttLayout::compute(&[t], (None, None), Weekday::Mon);
        let row = &layout.rows[0];
        assert_eq!(row.bar_color, TaskStatus::InProgress.color());
        assert_eq!(row.border_color, TaskPriority::Urgent.color());
    }

    #[test]
    fn today_marker_inside_range_only() {
        let tasks = vec![task("a", Some(date(2026, 3, 1)), Some(date(2026, 3, 5)))];
        let layout = GanttLayout::compute(&tasks, (None, None), Weekday::Mon);
        assert!(approx(layout.today_percent(date(2026, 3, 5)).unwrap(), 10.0 / 21.0 * 100.0));
        assert!(approx(layout.today_percent(date(2026, 2, 23)).unwrap(), 0.0));
        assert_eq!(layout.today_percent(date(2026, 3, 16)), None);
        assert_eq!(layout.today_percent(date(2026, 2, 22)), None);
    }
}
