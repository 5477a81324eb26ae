use crate::date::{add_days, date_range_inclusive};
use crate::error::CliError;
use crate::model::{Db, HistoryEntry, UserStats};

pub const POINTS_PER_CONFIRMATION: u32 = 10;
pub const POINTS_PER_LEVEL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    FirstCollection,
    WeekStreak,
    EcoWarrior,
}

pub const ALL_ACHIEVEMENTS: [Achievement; 3] = [
    Achievement::FirstCollection,
    Achievement::WeekStreak,
    Achievement::EcoWarrior,
];

impl Achievement {
    pub fn id(&self) -> &'static str {
        match self {
            Achievement::FirstCollection => "first-collection",
            Achievement::WeekStreak => "week-streak",
            Achievement::EcoWarrior => "eco-warrior",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::FirstCollection => "First Step",
            Achievement::WeekStreak => "Green Week",
            Achievement::EcoWarrior => "Eco Warrior",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstCollection => "First pickup confirmed",
            Achievement::WeekStreak => "7 consecutive days",
            Achievement::EcoWarrior => "50 pickups confirmed",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Achievement::FirstCollection => "🌟",
            Achievement::WeekStreak => "🔥",
            Achievement::EcoWarrior => "🌱",
        }
    }

    fn unlocked_by(&self, stats: &UserStats) -> bool {
        match self {
            Achievement::FirstCollection => stats.total_confirmations == 1,
            Achievement::WeekStreak => stats.current_streak == 7,
            Achievement::EcoWarrior => stats.total_confirmations == 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Confirmation {
    pub category_name: String,
    pub points_awarded: u32,
    pub points: u32,
    pub level: u32,
    pub streak: u32,
    pub unlocked: Vec<Achievement>,
}

#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    Confirmed(Confirmation),
    /// At most one confirmation per calendar day; the second attempt is an
    /// informational no-op, not an error.
    AlreadyConfirmed,
}

/// Records a confirmed pickup for `today`. All mutations land together or
/// not at all: the same-day guard runs before anything is touched.
pub fn confirm(db: &mut Db, category_name: &str, today: &str) -> Result<ConfirmOutcome, CliError> {
    if db.stats.last_confirmation_day.as_deref() == Some(today) {
        return Ok(ConfirmOutcome::AlreadyConfirmed);
    }

    let yesterday = add_days(today, -1)?;

    let stats = &mut db.stats;
    stats.total_confirmations += 1;
    stats.current_streak = if stats.last_confirmation_day.as_deref() == Some(yesterday.as_str()) {
        stats.current_streak + 1
    } else {
        1
    };
    stats.points += POINTS_PER_CONFIRMATION;
    stats.level = stats.points / POINTS_PER_LEVEL + 1;
    stats.last_confirmation_day = Some(today.to_string());

    db.best_streak = db.best_streak.max(stats.current_streak);

    match db.history.iter_mut().find(|h| h.date == today) {
        Some(entry) => {
            entry.count += 1;
            entry.types.push(category_name.to_string());
        }
        None => db.history.push(HistoryEntry {
            date: today.to_string(),
            count: 1,
            types: vec![category_name.to_string()],
        }),
    }

    let mut unlocked = Vec::new();
    for a in ALL_ACHIEVEMENTS {
        if db.stats.unlocked_achievements.iter().any(|u| u == a.id()) {
            continue;
        }
        if a.unlocked_by(&db.stats) {
            db.stats.unlocked_achievements.push(a.id().to_string());
            unlocked.push(a);
        }
    }

    Ok(ConfirmOutcome::Confirmed(Confirmation {
        category_name: category_name.to_string(),
        points_awarded: POINTS_PER_CONFIRMATION,
        points: db.stats.points,
        level: db.stats.level,
        streak: db.stats.current_streak,
        unlocked,
    }))
}

pub fn streak_emoji(streak: u32) -> &'static str {
    if streak >= 30 {
        "🔥🔥🔥"
    } else if streak >= 14 {
        "🔥🔥"
    } else if streak >= 7 {
        "🔥"
    } else if streak >= 3 {
        "✨"
    } else {
        "⭐"
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub count: u32,
    pub is_today: bool,
}

/// The last 30 calendar days (oldest first) for the streak grid.
pub fn last_30_days(db: &Db, today: &str) -> Result<Vec<HistoryDay>, CliError> {
    let from = add_days(today, -29)?;
    let days = date_range_inclusive(&from, today)?;

    Ok(days
        .into_iter()
        .map(|d| {
            let count = db
                .history
                .iter()
                .find(|h| h.date == d)
                .map(|h| h.count)
                .unwrap_or(0);
            HistoryDay {
                is_today: d == today,
                date: d,
                count,
            }
        })
        .collect())
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Milestone {
    pub label: String,
    pub progress: u32,
    pub target: u32,
}

/// The next streak/total targets shown on the streak page.
pub fn milestones(stats: &UserStats) -> Vec<Milestone> {
    let mut out = Vec::new();

    if stats.current_streak < 7 {
        out.push(Milestone {
            label: "One week streak".to_string(),
            progress: stats.current_streak,
            target: 7,
        });
    } else if stats.current_streak < 30 {
        out.push(Milestone {
            label: "One month streak".to_string(),
            progress: stats.current_streak,
            target: 30,
        });
    }

    if stats.total_confirmations < 50 {
        out.push(Milestone {
            label: "50 pickups".to_string(),
            progress: stats.total_confirmations,
            target: 50,
        });
    } else if stats.total_confirmations < 100 {
        out.push(Milestone {
            label: "100 pickups".to_string(),
            progress: stats.total_confirmations,
            target: 100,
        });
    }

    out
}
