use crate::date::parse_date_string;
use crate::error::CliError;
use crate::model::{Db, VacationWindow};

/// Validates and builds a window. The end date must be strictly after the
/// start date.
pub fn make_window(start: &str, end: &str) -> Result<VacationWindow, CliError> {
    parse_date_string(start, "start")?;
    parse_date_string(end, "end")?;
    if end <= start {
        return Err(CliError::validation(
            "Invalid vacation window: end date must be after start date",
        ));
    }
    Ok(VacationWindow {
        start: start.trim().to_string(),
        end: end.trim().to_string(),
    })
}

/// Reminders are suppressed while today falls inside [start, end].
pub fn is_active(window: &VacationWindow, today: &str) -> bool {
    window.start.as_str() <= today && today <= window.end.as_str()
}

/// Drops a window whose end date has passed. Returns true if one was removed.
pub fn drop_if_expired(db: &mut Db, today: &str) -> bool {
    if let Some(w) = db.vacation.as_ref() {
        if w.end.as_str() < today {
            db.vacation = None;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_must_follow_start() {
        assert!(make_window("2026-08-10", "2026-08-10").is_err());
        assert!(make_window("2026-08-10", "2026-08-09").is_err());
        assert!(make_window("2026-08-10", "2026-08-20").is_ok());
        assert!(make_window("2026-08-10", "garbage").is_err());
    }

    #[test]
    fn active_bounds_are_inclusive() {
        let w = make_window("2026-08-10", "2026-08-20").unwrap();
        assert!(!is_active(&w, "2026-08-09"));
        assert!(is_active(&w, "2026-08-10"));
        assert!(is_active(&w, "2026-08-15"));
        assert!(is_active(&w, "2026-08-20"));
        assert!(!is_active(&w, "2026-08-21"));
    }

    #[test]
    fn expired_window_is_dropped() {
        let mut db = crate::model::default_db();
        db.vacation = Some(make_window("2026-08-01", "2026-08-05").unwrap());
        assert!(!drop_if_expired(&mut db, "2026-08-05"));
        assert!(db.vacation.is_some());
        assert!(drop_if_expired(&mut db, "2026-08-06"));
        assert!(db.vacation.is_none());
    }
}
