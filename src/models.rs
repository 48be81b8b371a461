use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identifier.
///
/// New tasks get a v4 UUID, but ids read back from storage are kept as
/// written: the web app stores shorter nanoid-style ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Any non-blank string is a valid id.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (!raw.is_empty()).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Completed,
    #[default]
    NotCompleted,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Completed => TaskStatus::NotCompleted,
            TaskStatus::NotCompleted => TaskStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

// Closed set of labels offered by the UI and the text-generation service
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Admin,
    Meetings,
    Emails,
    ProjectWork,
    Development,
    Design,
    Marketing,
    Sales,
    ClientWork,
    Research,
    Home,
    Finance,
    Errands,
    Health,
    Family,
    Travel,
    Appointments,
    Learning,
    Reading,
    Habits,
    Journaling,
    Meditation,
    Fitness,
    Career,
    Social,
    EventPlanning,
    Birthdays,
    CatchUp,
    SideProject,
    PassionProject,
    ContentCreation,
    Resume,
    JobSearch,
    Explore,
    TechSetup,
    Subscriptions,
    Maintenance,
    Backups,
    #[default]
    Uncategorized,
}

/// A single todo item as stored under the "todos" key.
///
/// Selection is session state and lives in [`crate::todo_list::TodoList`],
/// so a legacy `selected` field in stored data is ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, with = "due_date")]
    pub due_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub reminder: bool,
    pub position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Caller-supplied fields for a new task. `id` and `position` are assigned
/// on ingest; any echoed values in the payload are dropped by serde.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, with = "due_date")]
    pub due_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub reminder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

// Due dates are RFC 3339 date-times; a bare "YYYY-MM-DD" is read as midnight UTC.
pub mod due_date {
    use chrono::{DateTime, FixedOffset, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt);
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        let utc = FixedOffset::east_opt(0)?;
        date.and_hms_opt(0, 0, 0)?.and_local_timezone(utc).single()
    }

    pub fn serialize<S>(value: &Option<DateTime<FixedOffset>>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => s.serialize_str(&dt.to_rfc3339()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse(text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid due date: {text}"))),
        }
    }
}

// -----------------------------
// App settings ("app-settings" key)
// Opaque to the task list; every field defaults so partial objects load.
// -----------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UiDensity {
    Compact,
    #[default]
    Default,
    Comfortable,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    Performance,
    #[default]
    Balanced,
    Fresh,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: ThemeSettings,
    pub appearance: AppearanceSettings,
    pub performance: PerformanceSettings,
    pub notifications: NotificationSettings,
    pub developer: DeveloperSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub high_contrast: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppearanceSettings {
    pub ui_density: UiDensity,
    pub font_size: u32,
    pub animations_enabled: bool,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            ui_density: UiDensity::Default,
            font_size: 16,
            animations_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceSettings {
    pub hardware_acceleration: bool,
    pub cache_strategy: CacheStrategy,
    pub animation_speed: f64,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            hardware_acceleration: true,
            cache_strategy: CacheStrategy::Balanced,
            animation_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub browser: bool,
    pub email: bool,
    pub reminders: bool,
    pub email_address: String,
    pub notification_types: NotificationTypes,
    pub quiet_hours: QuietHours,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            browser: true,
            email: true,
            reminders: true,
            email_address: "user@example.com".to_string(),
            notification_types: NotificationTypes::default(),
            quiet_hours: QuietHours::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationTypes {
    pub tasks: bool,
    pub comments: bool,
    pub mentions: bool,
    pub updates: bool,
}

impl Default for NotificationTypes {
    fn default() -> Self {
        Self {
            tasks: true,
            comments: true,
            mentions: true,
            updates: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct QuietHours {
    pub enabled: bool,
    pub start_time: String, // "HH:MM"
    pub end_time: String,   // "HH:MM"
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start_time: "22:00".to_string(),
            end_time: "08:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DeveloperSettings {
    pub dev_mode: bool,
    pub api_endpoint: String,
    pub console_logging: bool,
}

impl Default for DeveloperSettings {
    fn default() -> Self {
        Self {
            dev_mode: false,
            api_endpoint: "https://api.example.com".to_string(),
            console_logging: false,
        }
    }
}
