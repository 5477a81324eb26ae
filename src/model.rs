#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WasteCategory {
    Organic,
    Plastic,
    Paper,
    Glass,
    Mixed,
    Custom,
}

impl WasteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WasteCategory::Organic => "organic",
            WasteCategory::Plastic => "plastic",
            WasteCategory::Paper => "paper",
            WasteCategory::Glass => "glass",
            WasteCategory::Mixed => "mixed",
            WasteCategory::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "organic" => Some(WasteCategory::Organic),
            "plastic" => Some(WasteCategory::Plastic),
            "paper" => Some(WasteCategory::Paper),
            "glass" => Some(WasteCategory::Glass),
            "mixed" => Some(WasteCategory::Mixed),
            "custom" => Some(WasteCategory::Custom),
            _ => None,
        }
    }

    /// Custom has no defaults; name and icon must come from the user.
    pub fn default_name(&self) -> Option<&'static str> {
        match self {
            WasteCategory::Organic => Some("Organic"),
            WasteCategory::Plastic => Some("Plastic"),
            WasteCategory::Paper => Some("Paper"),
            WasteCategory::Glass => Some("Glass"),
            WasteCategory::Mixed => Some("Mixed"),
            WasteCategory::Custom => None,
        }
    }

    pub fn default_icon(&self) -> Option<&'static str> {
        match self {
            WasteCategory::Organic => Some("🗑️"),
            WasteCategory::Plastic => Some("♻️"),
            WasteCategory::Paper => Some("📄"),
            WasteCategory::Glass => Some("🫙"),
            WasteCategory::Mixed => Some("🗑️"),
            WasteCategory::Custom => None,
        }
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            WasteCategory::Organic => "green",
            WasteCategory::Plastic => "blue",
            WasteCategory::Paper => "yellow",
            WasteCategory::Glass => "purple",
            WasteCategory::Mixed => "gray",
            WasteCategory::Custom => "green",
        }
    }
}

/// A recurring pickup rule. `days` holds weekday numbers (Sun=0..Sat=6),
/// sorted ascending and never empty. The next occurrence is always derived
/// from `days` and "today"; it is never stored.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Schedule {
    pub id: String,
    pub category: WasteCategory,
    pub name: String,
    pub days: Vec<u8>,
    pub icon: String,
    pub color: String,
    pub created_date: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserStats {
    pub total_confirmations: u32,
    pub current_streak: u32,
    pub last_confirmation_day: Option<String>,
    pub points: u32,
    pub level: u32,
    pub unlocked_achievements: Vec<String>,
}

/// One entry per calendar day; same-day confirmations update in place.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub count: u32,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PendingNotification {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub fire_at: String,
}

/// Reminder arm bookkeeping. At most one pending notification exists;
/// arming cancels the prior one first. The pending record is persisted so a
/// later invocation can reclaim and cancel it (the in-process timer itself
/// does not survive a restart).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ArmState {
    pub scheduled: bool,
    pub last_armed_date: Option<String>,
    pub pending: Option<PendingNotification>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VacationWindow {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ShareCodeEntry {
    pub code: String,
    pub token: String,
    pub created_date: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Db {
    pub version: u32,
    pub meta: Meta,
    pub schedules: Vec<Schedule>,
    pub stats: UserStats,
    pub history: Vec<HistoryEntry>,
    pub best_streak: u32,
    pub reminder_hour: u32,
    pub notifications_enabled: bool,
    pub reminder: ArmState,
    pub vacation: Option<VacationWindow>,
    pub share_codes: Vec<ShareCodeEntry>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Meta {
    pub next_schedule_number: u32,
    pub next_notification_number: u32,
}

pub fn default_db() -> Db {
    Db {
        version: 1,
        meta: Meta {
            next_schedule_number: 1,
            next_notification_number: 1,
        },
        schedules: Vec::new(),
        stats: UserStats {
            total_confirmations: 0,
            current_streak: 0,
            last_confirmation_day: None,
            points: 0,
            level: 1,
            unlocked_achievements: Vec::new(),
        },
        history: Vec::new(),
        best_streak: 0,
        reminder_hour: crate::reminder::DEFAULT_REMINDER_HOUR,
        notifications_enabled: false,
        reminder: ArmState::default(),
        vacation: None,
        share_codes: Vec::new(),
    }
}
