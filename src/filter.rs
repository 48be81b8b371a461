/*
Filter engine and other read-side views.
Kept free of HTTP and storage so it can be tested with a fixed clock.
*/

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Priority, Task, TaskStatus};

// Coarse view selector, applied before the fine-grained filter
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Active,
    Completed,
    Today,
    Important,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DueDateFilter {
    #[default]
    All,
    Today,
    Tomorrow,
    ThisWeek,
    Overdue,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    pub selected_tags: Vec<String>,
    pub selected_priority: Option<Priority>,
    pub search_query: String,
    pub show_completed: bool,
    pub due_date_filter: DueDateFilter,
    pub only_reminders: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            selected_tags: Vec::new(),
            selected_priority: None,
            search_query: String::new(),
            show_completed: true,
            due_date_filter: DueDateFilter::All,
            only_reminders: false,
        }
    }
}

impl FilterConfig {
    pub fn add_tag(&mut self, tag: &str) {
        if !self.selected_tags.iter().any(|t| t == tag) {
            self.selected_tags.push(tag.to_string());
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.selected_tags.retain(|t| t != tag);
    }

    pub fn clear_tags(&mut self) {
        self.selected_tags.clear();
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.selected_priority = priority;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn toggle_show_completed(&mut self) {
        self.show_completed = !self.show_completed;
    }

    pub fn set_due_date(&mut self, filter: DueDateFilter) {
        self.due_date_filter = filter;
    }

    pub fn toggle_only_reminders(&mut self) {
        self.only_reminders = !self.only_reminders;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when any predicate would hide something.
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }
}

/// Current local time with the system offset.
pub fn now_local() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

// Calendar day of a due date, seen from the caller's offset
fn due_day(task: &Task, now: &DateTime<FixedOffset>) -> Option<NaiveDate> {
    task.due_date
        .map(|due| due.with_timezone(now.offset()).date_naive())
}

fn matches_tab(task: &Task, tab: Tab, today: NaiveDate, now: &DateTime<FixedOffset>) -> bool {
    match tab {
        Tab::All => true,
        Tab::Active => task.status == TaskStatus::NotCompleted,
        Tab::Completed => task.status == TaskStatus::Completed,
        Tab::Today => due_day(task, now) == Some(today),
        Tab::Important => task.priority == Priority::High,
    }
}

// Day-granularity buckets:
//     thisWeek -> strictly after today and strictly before today + 7
//     overdue  -> before today and not completed
fn matches_due_date(
    task: &Task,
    filter: DueDateFilter,
    today: NaiveDate,
    now: &DateTime<FixedOffset>,
) -> bool {
    let day = due_day(task, now);
    match filter {
        DueDateFilter::All => true,
        DueDateFilter::None => day.is_none(),
        DueDateFilter::Today => day == Some(today),
        DueDateFilter::Tomorrow => day == Some(today + Duration::days(1)),
        DueDateFilter::ThisWeek => {
            day.is_some_and(|d| d > today && d < today + Duration::days(7))
        }
        DueDateFilter::Overdue => day.is_some_and(|d| d < today) && !task.is_completed(),
    }
}

fn matches_filter(
    task: &Task,
    filter: &FilterConfig,
    search: &str,
    today: NaiveDate,
    now: &DateTime<FixedOffset>,
) -> bool {
    if !filter.show_completed && task.is_completed() {
        return false;
    }
    if !search.is_empty() && !task.title.to_lowercase().contains(search) {
        return false;
    }
    if !filter.selected_tags.is_empty() && !filter.selected_tags.iter().any(|t| task.has_tag(t)) {
        return false;
    }
    if filter.selected_priority.is_some_and(|p| p != task.priority) {
        return false;
    }
    if !matches_due_date(task, filter.due_date_filter, today, now) {
        return false;
    }
    !filter.only_reminders || task.reminder
}

/// Derive the visible list: sorted by position, then every tab and filter
/// predicate ANDed. Output keeps position order.
///
/// `now` fixes both "today" and the offset used to read due dates as
/// calendar days.
pub fn apply(tasks: &[Task], tab: Tab, filter: &FilterConfig, now: DateTime<FixedOffset>) -> Vec<Task> {
    let today = now.date_naive();
    let search = filter.search_query.to_lowercase();

    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by_key(|t| t.position);

    sorted
        .into_iter()
        .filter(|t| matches_tab(t, tab, today, &now))
        .filter(|t| matches_filter(t, filter, &search, today, &now))
        .cloned()
        .collect()
}

// Badge counts shown next to each tab
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high_priority: usize,
    pub due_today: usize,
}

pub fn counts(tasks: &[Task], now: DateTime<FixedOffset>) -> TaskCounts {
    let today = now.date_naive();
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    TaskCounts {
        total: tasks.len(),
        completed,
        pending: tasks.len() - completed,
        high_priority: tasks.iter().filter(|t| t.priority == Priority::High).count(),
        due_today: tasks
            .iter()
            .filter(|t| due_day(t, &now) == Some(today))
            .count(),
    }
}

/// Every distinct tag in use, sorted.
pub fn all_tags(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .flat_map(|t| t.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Open tasks with a reminder whose due day has already passed.
pub fn overdue_reminders(tasks: &[Task], now: DateTime<FixedOffset>) -> Vec<Task> {
    let today = now.date_naive();
    let mut due: Vec<Task> = tasks
        .iter()
        .filter(|t| t.reminder && !t.is_completed())
        .filter(|t| due_day(t, &now).is_some_and(|d| d < today))
        .cloned()
        .collect();
    due.sort_by_key(|t| t.position);
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TaskId};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-18T10:00:00+02:00").unwrap()
    }

    fn task(title: &str, position: i64) -> Task {
        Task {
            id: TaskId::generate(),
            title: title.to_string(),
            status: TaskStatus::NotCompleted,
            category: Category::Uncategorized,
            priority: Priority::Medium,
            tags: Vec::new(),
            due_date: None,
            reminder: false,
            position,
            notes: None,
        }
    }

    fn due_in(title: &str, position: i64, days: i64) -> Task {
        Task {
            due_date: Some(now() + Duration::days(days)),
            ..task(title, position)
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    fn with_due(due_date_filter: DueDateFilter) -> FilterConfig {
        FilterConfig {
            due_date_filter,
            ..FilterConfig::default()
        }
    }

    #[test]
    fn default_view_sorts_by_position() {
        let tasks = vec![task("c", 2), task("a", 0), task("b", 1)];
        let view = apply(&tasks, Tab::All, &FilterConfig::default(), now());
        assert_eq!(titles(&view), vec!["a", "b", "c"]);
    }

    #[test]
    fn tabs() {
        let mut done = task("done", 0);
        done.status = TaskStatus::Completed;
        let mut urgent = task("urgent", 1);
        urgent.priority = Priority::High;
        let today = due_in("today", 2, 0);
        let tasks = vec![done, urgent, today];
        let f = FilterConfig::default();

        assert_eq!(titles(&apply(&tasks, Tab::Completed, &f, now())), vec!["done"]);
        assert_eq!(titles(&apply(&tasks, Tab::Active, &f, now())), vec!["urgent", "today"]);
        assert_eq!(titles(&apply(&tasks, Tab::Important, &f, now())), vec!["urgent"]);
        assert_eq!(titles(&apply(&tasks, Tab::Today, &f, now())), vec!["today"]);
    }

    #[test]
    fn today_tab_still_applies_filters() {
        let mut a = due_in("today done", 0, 0);
        a.status = TaskStatus::Completed;
        let b = due_in("today open", 1, 0);
        let f = FilterConfig {
            show_completed: false,
            ..FilterConfig::default()
        };
        assert_eq!(titles(&apply(&[a, b], Tab::Today, &f, now())), vec!["today open"]);
    }

    #[test]
    fn completed_tab_with_hidden_completed_is_empty() {
        let mut done = task("done", 0);
        done.status = TaskStatus::Completed;
        let f = FilterConfig {
            show_completed: false,
            ..FilterConfig::default()
        };
        assert!(apply(&[done], Tab::Completed, &f, now()).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_on_title() {
        let tasks = vec![task("Buy MILK", 0), task("call mom", 1)];
        let mut f = FilterConfig::default();
        f.set_search("milk");
        assert_eq!(titles(&apply(&tasks, Tab::All, &f, now())), vec!["Buy MILK"]);
    }

    #[test]
    fn tags_match_any() {
        let mut a = task("a", 0);
        a.tags = vec!["work".into()];
        let mut b = task("b", 1);
        b.tags = vec!["home".into(), "garden".into()];
        let c = task("c", 2);
        let mut f = FilterConfig::default();
        f.add_tag("garden");
        f.add_tag("work");
        assert_eq!(titles(&apply(&[a, b, c], Tab::All, &f, now())), vec!["a", "b"]);
    }

    #[test]
    fn priority_and_reminders() {
        let mut a = task("a", 0);
        a.priority = Priority::Low;
        a.reminder = true;
        let mut b = task("b", 1);
        b.priority = Priority::Low;
        let tasks = vec![a, b, task("c", 2)];

        let mut f = FilterConfig::default();
        f.set_priority(Some(Priority::Low));
        assert_eq!(titles(&apply(&tasks, Tab::All, &f, now())), vec!["a", "b"]);
        f.toggle_only_reminders();
        assert_eq!(titles(&apply(&tasks, Tab::All, &f, now())), vec!["a"]);
    }

    #[test]
    fn this_week_is_exclusive_on_both_ends() {
        let tasks = vec![
            due_in("today", 0, 0),
            due_in("tomorrow", 1, 1),
            due_in("six days", 2, 6),
            due_in("seven days", 3, 7),
            due_in("ten days", 4, 10),
            task("undated", 5),
        ];
        let view = apply(&tasks, Tab::All, &with_due(DueDateFilter::ThisWeek), now());
        assert_eq!(titles(&view), vec!["tomorrow", "six days"]);
    }

    #[test]
    fn today_tomorrow_and_none_buckets() {
        let tasks = vec![due_in("today", 0, 0), due_in("tomorrow", 1, 1), task("undated", 2)];
        let pick = |f| titles(&apply(&tasks, Tab::All, &with_due(f), now()))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        assert_eq!(pick(DueDateFilter::Today), vec!["today"]);
        assert_eq!(pick(DueDateFilter::Tomorrow), vec!["tomorrow"]);
        assert_eq!(pick(DueDateFilter::None), vec!["undated"]);
        assert_eq!(pick(DueDateFilter::All).len(), 3);
    }

    #[test]
    fn overdue_skips_completed() {
        let mut done = due_in("done yesterday", 0, -1);
        done.status = TaskStatus::Completed;
        let open = due_in("open yesterday", 1, -1);
        let earlier_today = Task {
            due_date: Some(now() - Duration::hours(2)),
            ..task("earlier today", 2)
        };
        let view = apply(
            &[done, open, earlier_today],
            Tab::All,
            &with_due(DueDateFilter::Overdue),
            now(),
        );
        assert_eq!(titles(&view), vec!["open yesterday"]);
    }

    #[test]
    fn due_days_follow_the_callers_offset() {
        // 23:30 UTC on the 17th is already the 18th at +02:00
        let late = Task {
            due_date: Some(DateTime::parse_from_rfc3339("2026-10-17T23:30:00Z").unwrap()),
            ..task("late", 0)
        };
        let view = apply(&[late], Tab::Today, &FilterConfig::default(), now());
        assert_eq!(titles(&view), vec!["late"]);
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let mut a = due_in("Alpha", 3, 2);
        a.tags = vec!["x".into()];
        a.reminder = true;
        let mut b = due_in("alps", 1, 3);
        b.tags = vec!["x".into()];
        let tasks = vec![a, b, task("beta", 0), due_in("alpine", 2, -4)];
        let mut f = with_due(DueDateFilter::ThisWeek);
        f.set_search("al");
        f.add_tag("x");

        let once = apply(&tasks, Tab::Active, &f, now());
        let twice = apply(&once, Tab::Active, &f, now());
        assert_eq!(titles(&once), vec!["alps", "Alpha"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_config_mutators() {
        let mut f = FilterConfig::default();
        assert!(!f.is_active());

        f.add_tag("work");
        f.add_tag("work");
        assert_eq!(f.selected_tags, vec!["work"]);
        f.remove_tag("work");
        f.add_tag("home");
        f.clear_tags();
        assert!(f.selected_tags.is_empty());

        f.toggle_show_completed();
        f.set_due_date(DueDateFilter::Overdue);
        assert!(f.is_active());
        f.reset();
        assert_eq!(f, FilterConfig::default());
    }

    #[test]
    fn counts_and_tags() {
        let mut a = due_in("a", 0, 0);
        a.status = TaskStatus::Completed;
        a.tags = vec!["work".into(), "alpha".into()];
        let mut b = task("b", 1);
        b.priority = Priority::High;
        b.tags = vec!["work".into()];
        let tasks = vec![a, b];

        assert_eq!(
            counts(&tasks, now()),
            TaskCounts {
                total: 2,
                completed: 1,
                pending: 1,
                high_priority: 1,
                due_today: 1,
            }
        );
        assert_eq!(all_tags(&tasks), vec!["alpha", "work"]);
    }

    #[test]
    fn reminders_due() {
        let mut overdue = due_in("overdue", 1, -2);
        overdue.reminder = true;
        let mut silent = due_in("silent", 0, -2);
        silent.reminder = false;
        let mut upcoming = due_in("upcoming", 2, 1);
        upcoming.reminder = true;
        let view = overdue_reminders(&[overdue, silent, upcoming], now());
        assert_eq!(titles(&view), vec!["overdue"]);
    }

    #[test]
    fn query_names_parse() {
        let tab: Tab = serde_json::from_str(r#""important""#).unwrap();
        let due: DueDateFilter = serde_json::from_str(r#""thisWeek""#).unwrap();
        assert_eq!(tab, Tab::Important);
        assert_eq!(due, DueDateFilter::ThisWeek);
    }
}
