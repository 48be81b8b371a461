use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Deserializer, Serialize, de::IntoDeserializer};

use crate::app::AppState;
use crate::filter::{self, DueDateFilter, FilterConfig, Tab, TaskCounts, now_local};
use crate::models::{Priority, Task};
use crate::routes_tasks::{TaskView, task_views};

// Query string form of tab + filter.
//     tags is comma separated: ?tags=work,home
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewQuery {
    pub tab: Tab,
    pub tags: Option<String>,
    #[serde(deserialize_with = "priority_or_all")]
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub show_completed: Option<bool>,
    pub due_date: DueDateFilter,
    pub only_reminders: bool,
}

// "all" or an empty value means no priority filter
fn priority_or_all<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => {
            Priority::deserialize(IntoDeserializer::<D::Error>::into_deserializer(value)).map(Some)
        }
    }
}

impl ViewQuery {
    pub fn filter_config(&self) -> FilterConfig {
        let mut config = FilterConfig::default();
        for tag in self.tags.iter().flat_map(|t| t.split(',')) {
            let tag = tag.trim();
            if !tag.is_empty() {
                config.add_tag(tag);
            }
        }
        config.set_priority(self.priority);
        if let Some(search) = &self.search {
            config.set_search(search.trim());
        }
        if self.show_completed == Some(false) {
            config.toggle_show_completed();
        }
        config.set_due_date(self.due_date);
        if self.only_reminders {
            config.toggle_only_reminders();
        }
        config
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub tab: Tab,
    pub filter: FilterConfig,
    pub filter_active: bool,
    pub tasks: Vec<TaskView>,
    pub counts: TaskCounts,
    pub tags: Vec<String>,
    pub selected_count: usize,
    pub zen_mode: bool,
}

// -----------------------------
// GET /api/view
// Filtered, position-ordered list for rendering
// -----------------------------
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ViewQuery>,
) -> Json<ViewResponse> {
    let config = q.filter_config();
    let now = now_local();
    let list = state.todos.lock();

    let visible = filter::apply(list.tasks(), q.tab, &config, now);

    Json(ViewResponse {
        tab: q.tab,
        filter_active: config.is_active(),
        tasks: task_views(&list, visible),
        counts: filter::counts(list.tasks(), now),
        tags: filter::all_tags(list.tasks()),
        selected_count: list.selected_count(),
        zen_mode: list.zen_mode(),
        filter: config,
    })
}

// -----------------------------
// GET /api/reminders
// Open tasks with a reminder that are past due
// -----------------------------
pub async fn get_reminders(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    let list = state.todos.lock();
    let due = filter::overdue_reminders(list.tasks(), now_local());
    for task in &due {
        tracing::info!(id = %task.id, title = %task.title, "reminder: task is overdue");
    }
    Json(due)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn query_builds_filter() {
        let q = ViewQuery {
            tags: Some("work, home,,work".to_string()),
            priority: Some(Priority::High),
            search: Some("  milk ".to_string()),
            show_completed: Some(false),
            due_date: DueDateFilter::Overdue,
            only_reminders: true,
            ..ViewQuery::default()
        };
        let f = q.filter_config();
        assert_eq!(f.selected_tags, vec!["work", "home"]);
        assert_eq!(f.selected_priority, Some(Priority::High));
        assert_eq!(f.search_query, "milk");
        assert!(!f.show_completed);
        assert_eq!(f.due_date_filter, DueDateFilter::Overdue);
        assert!(f.only_reminders);
    }

    fn query(raw: &str) -> Result<ViewQuery, String> {
        let uri: axum::http::Uri = format!("/api/view?{raw}").parse().unwrap();
        Query::<ViewQuery>::try_from_uri(&uri)
            .map(|Query(q)| q)
            .map_err(|e| e.body_text())
    }

    fn parse(raw: &str) -> ViewQuery {
        query(raw).unwrap()
    }

    #[test]
    fn priority_all_or_empty_means_any() {
        assert_eq!(parse("priority=all").priority, None);
        assert_eq!(parse("priority=ALL").priority, None);
        assert_eq!(parse("priority=").priority, None);
        assert_eq!(parse("tab=today").priority, None);
        assert_eq!(parse("priority=LOW").priority, Some(Priority::Low));
        assert!(query("priority=urgent").is_err());
    }

    #[test]
    fn empty_query_is_default_filter() {
        assert_eq!(ViewQuery::default().filter_config(), FilterConfig::default());
    }
}
