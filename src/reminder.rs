use crate::date::{add_days, weekday, Clock};
use crate::error::CliError;
use crate::model::{ArmState, PendingNotification, Schedule, VacationWindow};
use crate::schedules::stable_schedule_sort;
use crate::vacation;

pub const DEFAULT_REMINDER_HOUR: u32 = 19;
/// A missed evening slot shifts to next morning. Fixed on purpose.
pub const FALLBACK_HOUR: u32 = 8;

pub const REMINDER_TITLE: &str = "♻️ Collection reminder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationHandle(pub u32);

/// Seam to the platform notification capability. Delivery itself is outside
/// this crate; the scheduler only needs permission checks and a cancellable
/// deferred display.
pub trait Notifier {
    fn has_permission(&self) -> bool;
    fn schedule(&mut self, title: &str, body: &str, fire_at: &str) -> NotificationHandle;
    fn cancel(&mut self, handle: NotificationHandle);
}

/// Default CLI notifier: permission comes from the persisted grant, and
/// handles are numbered from a persisted counter. The armed reminder is
/// observable through `remind status` rather than an OS banner.
pub struct LocalNotifier {
    pub enabled: bool,
    pub next_number: u32,
}

impl Notifier for LocalNotifier {
    fn has_permission(&self) -> bool {
        self.enabled
    }

    fn schedule(&mut self, _title: &str, _body: &str, _fire_at: &str) -> NotificationHandle {
        let id = self.next_number;
        self.next_number += 1;
        NotificationHandle(id)
    }

    fn cancel(&mut self, _handle: NotificationHandle) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArmOutcome {
    Armed { fire_at: String, names: Vec<String> },
    AlreadyArmed { date: String },
    NothingDue,
    VacationSuppressed,
    PermissionDenied,
}

/// Owns the single pending notification. Arming is idempotent per calendar
/// day, always cancels the previous handle before creating a new one, and
/// refuses to arm during a vacation window or without permission.
pub struct ReminderScheduler<'a, N: Notifier> {
    notifier: &'a mut N,
    state: ArmState,
}

impl<'a, N: Notifier> ReminderScheduler<'a, N> {
    pub fn new(notifier: &'a mut N, state: ArmState) -> Self {
        Self { notifier, state }
    }

    pub fn into_state(self) -> ArmState {
        self.state
    }

    fn cancel_pending(&mut self) {
        if let Some(p) = self.state.pending.take() {
            self.notifier.cancel(NotificationHandle(p.id));
        }
    }

    pub fn arm(
        &mut self,
        schedules: &[Schedule],
        reminder_hour: u32,
        now: &Clock,
        window: Option<&VacationWindow>,
    ) -> Result<ArmOutcome, CliError> {
        if let Some(w) = window {
            if vacation::is_active(w, &now.date) {
                self.cancel_pending();
                self.state.scheduled = false;
                return Ok(ArmOutcome::VacationSuppressed);
            }
        }

        if self.state.scheduled && self.state.last_armed_date.as_deref() == Some(now.date.as_str())
        {
            return Ok(ArmOutcome::AlreadyArmed {
                date: now.date.clone(),
            });
        }

        if !self.notifier.has_permission() {
            return Ok(ArmOutcome::PermissionDenied);
        }

        self.cancel_pending();

        let tomorrow = add_days(&now.date, 1)?;
        let tomorrow_wd = weekday(&tomorrow)?;
        let mut due: Vec<&Schedule> = schedules
            .iter()
            .filter(|s| s.days.contains(&tomorrow_wd))
            .collect();
        due.sort_by(|a, b| stable_schedule_sort(a, b));

        // Bookkeeping happens even when nothing is due, so repeated arm
        // calls within the same day stay no-ops.
        self.state.scheduled = true;
        self.state.last_armed_date = Some(now.date.clone());

        if due.is_empty() {
            return Ok(ArmOutcome::NothingDue);
        }

        let fire_at = target_fire_time(now, reminder_hour)?;
        let names: Vec<String> = due.iter().map(|s| s.name.clone()).collect();
        let body = format!(
            "Remember to take out: {}",
            due.iter()
                .map(|s| format!("{} {}", s.icon, s.name))
                .collect::<Vec<String>>()
                .join(", ")
        );

        let handle = self.notifier.schedule(REMINDER_TITLE, &body, &fire_at);
        self.state.pending = Some(PendingNotification {
            id: handle.0,
            title: REMINDER_TITLE.to_string(),
            body,
            fire_at: fire_at.clone(),
        });

        Ok(ArmOutcome::Armed { fire_at, names })
    }

    /// The reminder hour changed: drop the pending handle and force the
    /// next arm call to recompute.
    pub fn reconfigure(&mut self) {
        self.cancel_pending();
        self.state.scheduled = false;
    }

    pub fn cancel_all(&mut self) {
        self.cancel_pending();
        self.state.scheduled = false;
    }
}

/// Today at `reminder_hour:00`, unless that moment has already passed;
/// then tomorrow morning at the fallback hour.
fn target_fire_time(now: &Clock, reminder_hour: u32) -> Result<String, CliError> {
    if now.minutes_since_midnight < reminder_hour * 60 {
        Ok(format!("{}T{:02}:00:00", now.date, reminder_hour))
    } else {
        let tomorrow = add_days(&now.date, 1)?;
        Ok(format!("{}T{:02}:00:00", tomorrow, FALLBACK_HOUR))
    }
}
