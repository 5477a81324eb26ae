use crate::date::{add_days, weekday};
use crate::error::CliError;
use crate::model::{Db, Schedule};
use crate::schedules::stable_schedule_sort;

/// Minimum day offset `d` with `(reference_weekday + d) % 7` in `days`.
/// `allow_today` includes offset 0; otherwise the search starts at 1 and a
/// rule matching only the reference weekday resolves a full week out.
/// Returns None for an empty day set.
pub fn days_until(days: &[u8], reference_weekday: u8, allow_today: bool) -> Option<u8> {
    let start: u8 = if allow_today { 0 } else { 1 };
    (start..start + 7).find(|d| days.contains(&((reference_weekday + d) % 7)))
}

/// Earliest matching date >= the reference date.
pub fn next_occurrence(schedule: &Schedule, date: &str) -> Result<String, CliError> {
    let wd = weekday(date)?;
    let offset = days_until(&schedule.days, wd, true)
        .ok_or_else(|| CliError::validation("Schedule has no pickup days"))?;
    add_days(date, offset as i64)
}

/// Earliest matching date strictly after the reference date; the canonical
/// value for sorting and display.
pub fn next_future_occurrence(schedule: &Schedule, date: &str) -> Result<String, CliError> {
    let wd = weekday(date)?;
    let offset = days_until(&schedule.days, wd, false)
        .ok_or_else(|| CliError::validation("Schedule has no pickup days"))?;
    add_days(date, offset as i64)
}

pub fn is_due_on(schedule: &Schedule, date: &str) -> Result<bool, CliError> {
    let wd = weekday(date)?;
    Ok(schedule.days.contains(&wd))
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct OverviewRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub icon: String,
    pub color: String,
}

fn overview_row(s: &Schedule) -> OverviewRow {
    OverviewRow {
        id: s.id.clone(),
        name: s.name.clone(),
        category: s.category.as_str().to_string(),
        icon: s.icon.clone(),
        color: s.color.clone(),
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Overview {
    pub date: String,
    pub tomorrow_date: String,
    pub today: Vec<OverviewRow>,
    pub tomorrow: Vec<OverviewRow>,
}

/// The today/tomorrow partition shown by `binday due`.
pub fn build_overview(db: &Db, date: &str) -> Result<Overview, CliError> {
    let tomorrow = add_days(date, 1)?;

    let mut schedules = db.schedules.to_vec();
    schedules.sort_by(stable_schedule_sort);

    let mut today_rows = Vec::new();
    let mut tomorrow_rows = Vec::new();
    for s in schedules.iter() {
        if is_due_on(s, date)? {
            today_rows.push(overview_row(s));
        }
        if is_due_on(s, &tomorrow)? {
            tomorrow_rows.push(overview_row(s));
        }
    }

    Ok(Overview {
        date: date.to_string(),
        tomorrow_date: tomorrow,
        today: today_rows,
        tomorrow: tomorrow_rows,
    })
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UpcomingDay {
    pub date: String,
    pub weekday: String,
    pub due: Vec<OverviewRow>,
}

/// Due lists for each of the next `horizon_days` days starting tomorrow.
pub fn build_upcoming(db: &Db, date: &str, horizon_days: u32) -> Result<Vec<UpcomingDay>, CliError> {
    let mut schedules = db.schedules.to_vec();
    schedules.sort_by(stable_schedule_sort);

    let mut out = Vec::new();
    for offset in 1..=horizon_days as i64 {
        let day = add_days(date, offset)?;
        let wd = weekday(&day)?;
        let due: Vec<OverviewRow> = schedules
            .iter()
            .filter(|s| s.days.contains(&wd))
            .map(overview_row)
            .collect();
        out.push(UpcomingDay {
            date: day,
            weekday: crate::schedules::day_short_name(wd).unwrap_or("?").to_string(),
            due,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WasteCategory;

    fn schedule(days: Vec<u8>) -> Schedule {
        Schedule {
            id: "s0001".to_string(),
            category: WasteCategory::Organic,
            name: "Organic".to_string(),
            days,
            icon: "🗑️".to_string(),
            color: "green".to_string(),
            created_date: "2026-01-01".to_string(),
        }
    }

    #[test]
    fn smallest_offset_wins() {
        // Mon+Thu rule. 2026-08-05 is a Wednesday: next is Thursday (offset 1).
        let s = schedule(vec![1, 4]);
        assert_eq!(next_occurrence(&s, "2026-08-05").unwrap(), "2026-08-06");
        // 2026-08-07 is a Friday: next is Monday (offset 3).
        assert_eq!(next_occurrence(&s, "2026-08-07").unwrap(), "2026-08-10");
    }

    #[test]
    fn today_counts_unless_strictly_future() {
        // Thursday rule on a Thursday.
        let s = schedule(vec![4]);
        assert_eq!(next_occurrence(&s, "2026-08-06").unwrap(), "2026-08-06");
        assert_eq!(next_future_occurrence(&s, "2026-08-06").unwrap(), "2026-08-13");
        assert!(is_due_on(&s, "2026-08-06").unwrap());
        assert!(!is_due_on(&s, "2026-08-07").unwrap());
    }

    #[test]
    fn next_occurrence_weekday_is_in_rule() {
        let s = schedule(vec![0, 2, 5]);
        for date in ["2026-08-02", "2026-08-03", "2026-08-04", "2026-08-05"] {
            let next = next_occurrence(&s, date).unwrap();
            assert!(s.days.contains(&weekday(&next).unwrap()));
            assert!(next.as_str() >= date);
        }
    }

    #[test]
    fn overview_partitions_today_and_tomorrow() {
        let mut db = crate::model::default_db();
        let mut thu = schedule(vec![4]);
        thu.id = "s0001".into();
        thu.name = "Organic".into();
        let mut fri = schedule(vec![5]);
        fri.id = "s0002".into();
        fri.name = "Plastic".into();
        db.schedules = vec![thu, fri];

        // 2026-08-06 is a Thursday.
        let overview = build_overview(&db, "2026-08-06").unwrap();
        assert_eq!(overview.today.len(), 1);
        assert_eq!(overview.today[0].name, "Organic");
        assert_eq!(overview.tomorrow.len(), 1);
        assert_eq!(overview.tomorrow[0].name, "Plastic");
        assert_eq!(overview.tomorrow_date, "2026-08-07");
    }

    #[test]
    fn upcoming_starts_tomorrow() {
        let mut db = crate::model::default_db();
        db.schedules = vec![schedule(vec![4])];

        // Wednesday reference: the horizon must not include Wednesday itself.
        let days = build_upcoming(&db, "2026-08-05", 7).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, "2026-08-06");
        assert_eq!(days[0].due.len(), 1);
        assert!(days[1].due.is_empty());
        // The following Thursday appears at the end of the horizon.
        assert_eq!(days[6].date, "2026-08-12");
        assert!(days[6].due.is_empty());
    }
}
