use crate::error::CliError;
use crate::model::{Db, Schedule, WasteCategory};

const DAY_NAME_TO_NUMBER: [(&str, u8); 7] = [
    ("sun", 0),
    ("mon", 1),
    ("tue", 2),
    ("wed", 3),
    ("thu", 4),
    ("fri", 5),
    ("sat", 6),
];

pub fn day_short_name(d: u8) -> Option<&'static str> {
    match d {
        0 => Some("sun"),
        1 => Some("mon"),
        2 => Some("tue"),
        3 => Some("wed"),
        4 => Some("thu"),
        5 => Some("fri"),
        6 => Some("sat"),
        _ => None,
    }
}

/// Parses a weekday pattern into a canonical (ascending, de-duplicated)
/// day set. Accepts `everyday`, `weekdays`, `weekends`, or a comma list of
/// day names (`mon,thu`). Weekday numbers are Sun=0..Sat=6.
pub fn parse_days_pattern(pattern_raw: &str) -> Result<Vec<u8>, CliError> {
    let pattern = pattern_raw.trim().to_lowercase();
    if pattern.is_empty() {
        return Err(CliError::validation("Invalid days pattern"));
    }

    let mut days: Vec<u8> = if pattern == "everyday" {
        vec![0, 1, 2, 3, 4, 5, 6]
    } else if pattern == "weekdays" {
        vec![1, 2, 3, 4, 5]
    } else if pattern == "weekends" {
        vec![0, 6]
    } else {
        let parts: Vec<&str> = pattern
            .split(',')
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            return Err(CliError::validation(format!(
                "Invalid days pattern: {}",
                pattern_raw
            )));
        }
        let mut out: Vec<u8> = Vec::new();
        for p in parts {
            let num = DAY_NAME_TO_NUMBER
                .iter()
                .find(|(name, _)| *name == p)
                .map(|(_, d)| *d)
                .ok_or_else(|| {
                    CliError::validation(format!("Invalid days pattern: {}", pattern_raw))
                })?;
            if !out.contains(&num) {
                out.push(num);
            }
        }
        out
    };

    days.sort();
    Ok(days)
}

pub fn days_to_string(days: &[u8]) -> String {
    let mut sorted = days.to_vec();
    sorted.sort();

    let is_everyday = sorted.len() == 7;
    let is_weekdays = sorted == [1, 2, 3, 4, 5];
    let is_weekends = sorted == [0, 6];

    if is_everyday {
        return "everyday".to_string();
    }
    if is_weekdays {
        return "weekdays".to_string();
    }
    if is_weekends {
        return "weekends".to_string();
    }

    sorted
        .iter()
        .filter_map(|d| day_short_name(*d))
        .collect::<Vec<&str>>()
        .join(",")
}

pub fn validate_days(days: &[u8]) -> Result<(), CliError> {
    if days.is_empty() {
        return Err(CliError::validation("At least one pickup day is required"));
    }
    for d in days.iter() {
        if *d > 6 {
            return Err(CliError::validation(format!("Invalid weekday: {}", d)));
        }
    }
    Ok(())
}

pub fn next_schedule_id(db: &mut Db) -> String {
    let n = db.meta.next_schedule_number;
    let id = format!("s{:04}", n);
    db.meta.next_schedule_number = n + 1;
    id
}

pub fn stable_schedule_sort(a: &Schedule, b: &Schedule) -> std::cmp::Ordering {
    let an = a.name.to_lowercase();
    let bn = b.name.to_lowercase();
    match an.cmp(&bn) {
        std::cmp::Ordering::Equal => a.id.cmp(&b.id),
        o => o,
    }
}

pub fn list_schedules(db: &Db) -> Vec<Schedule> {
    let mut out: Vec<Schedule> = db.schedules.to_vec();
    out.sort_by(stable_schedule_sort);
    out
}

/// Resolves a selector to an index: exact id (s0001) or unique
/// case-insensitive name prefix.
pub fn select_schedule_index(db: &Db, selector: &str) -> Result<usize, CliError> {
    let s = selector.trim();
    if s.is_empty() {
        return Err(CliError::validation("Schedule selector is required"));
    }

    if s.len() == 5 && s.starts_with('s') && s[1..].chars().all(|c| c.is_ascii_digit()) {
        return db
            .schedules
            .iter()
            .position(|sch| sch.id == s)
            .ok_or_else(|| CliError::not_found(format!("Schedule not found: {}", selector)));
    }

    let prefix = s.to_lowercase();
    let mut matches: Vec<(usize, Schedule)> = db
        .schedules
        .iter()
        .enumerate()
        .filter(|(_, sch)| sch.name.to_lowercase().starts_with(&prefix))
        .map(|(i, sch)| (i, sch.clone()))
        .collect();

    matches.sort_by(|a, b| stable_schedule_sort(&a.1, &b.1));

    if matches.is_empty() {
        return Err(CliError::not_found(format!(
            "Schedule not found: {}",
            selector
        )));
    }

    if matches.len() > 1 {
        let candidates = matches
            .iter()
            .map(|(_, sch)| format!("{} {}", sch.id, sch.name))
            .collect::<Vec<String>>()
            .join(", ");
        return Err(CliError::ambiguous(format!(
            "Ambiguous selector '{}'. Candidates: {}",
            selector, candidates
        )));
    }

    Ok(matches[0].0)
}

/// Builds a validated schedule. Non-custom categories fall back to their
/// default name/icon/color; custom requires an explicit name and icon.
pub fn make_schedule(
    id: String,
    category: WasteCategory,
    name: Option<&str>,
    days: Vec<u8>,
    icon: Option<&str>,
    color: Option<&str>,
    today: &str,
) -> Result<Schedule, CliError> {
    validate_days(&days)?;

    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .or_else(|| category.default_name().map(|n| n.to_string()))
        .ok_or_else(|| CliError::validation("Custom schedules require a name"))?;

    let icon = icon
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .or_else(|| category.default_icon().map(|i| i.to_string()))
        .ok_or_else(|| CliError::validation("Custom schedules require an icon"))?;

    let color = color
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| category.default_color().to_string());

    let mut days = days;
    days.sort();
    days.dedup();

    Ok(Schedule {
        id,
        category,
        name,
        days,
        icon,
        color,
        created_date: today.to_string(),
    })
}

/// Starter set for a fresh database: organic Mon+Thu, plastic Tue, paper Wed.
pub fn seed_starter_schedules(db: &mut Db, today: &str) -> Result<Vec<Schedule>, CliError> {
    let starters = [
        (WasteCategory::Organic, vec![1u8, 4]),
        (WasteCategory::Plastic, vec![2]),
        (WasteCategory::Paper, vec![3]),
    ];

    let mut created = Vec::new();
    for (category, days) in starters {
        let id = next_schedule_id(db);
        let schedule = make_schedule(id, category, None, days, None, None, today)?;
        db.schedules.push(schedule.clone());
        created.push(schedule);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_patterns_roundtrip() {
        assert_eq!(days_to_string(&parse_days_pattern("everyday").unwrap()), "everyday");
        assert_eq!(days_to_string(&parse_days_pattern("weekdays").unwrap()), "weekdays");
        assert_eq!(days_to_string(&parse_days_pattern("weekends").unwrap()), "weekends");
        assert_eq!(days_to_string(&parse_days_pattern("mon,thu").unwrap()), "mon,thu");
        assert_eq!(parse_days_pattern("thu,mon,thu").unwrap(), vec![1, 4]);
    }

    #[test]
    fn days_pattern_rejects_unknown_names() {
        assert!(parse_days_pattern("monday").is_err());
        assert!(parse_days_pattern("").is_err());
        assert!(parse_days_pattern(",").is_err());
    }

    #[test]
    fn custom_category_requires_name_and_icon() {
        let r = make_schedule(
            "s0001".into(),
            WasteCategory::Custom,
            None,
            vec![1],
            Some("🔋"),
            None,
            "2026-08-03",
        );
        assert!(r.is_err());

        let r = make_schedule(
            "s0001".into(),
            WasteCategory::Custom,
            Some("Batteries"),
            vec![1],
            None,
            None,
            "2026-08-03",
        );
        assert!(r.is_err());

        let s = make_schedule(
            "s0001".into(),
            WasteCategory::Custom,
            Some("Batteries"),
            vec![1],
            Some("🔋"),
            None,
            "2026-08-03",
        )
        .unwrap();
        assert_eq!(s.name, "Batteries");
        assert_eq!(s.icon, "🔋");
    }

    #[test]
    fn empty_days_rejected() {
        let r = make_schedule(
            "s0001".into(),
            WasteCategory::Organic,
            None,
            vec![],
            None,
            None,
            "2026-08-03",
        );
        assert!(r.is_err());
    }

    #[test]
    fn category_defaults_fill_in() {
        let s = make_schedule(
            "s0001".into(),
            WasteCategory::Plastic,
            None,
            vec![4, 2],
            None,
            None,
            "2026-08-03",
        )
        .unwrap();
        assert_eq!(s.name, "Plastic");
        assert_eq!(s.icon, "♻️");
        assert_eq!(s.color, "blue");
        assert_eq!(s.days, vec![2, 4]);
    }
}
