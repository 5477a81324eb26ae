mod backup;
mod date;
mod db;
mod error;
mod model;
mod occurrence;
mod output;
mod reminder;
mod schedules;
mod streak;
mod transfer;
mod vacation;

use crate::date::{clock_from_rfc3339, parse_date_string, system_clock, system_today, Clock};
use crate::db::{read_db, resolve_db_path, update_db};
use crate::error::CliError;
use crate::model::{Db, Schedule, ShareCodeEntry, UserStats, WasteCategory};
use crate::occurrence::{build_overview, build_upcoming, next_future_occurrence};
use crate::output::{render_simple_table, Styler};
use crate::reminder::{ArmOutcome, LocalNotifier, ReminderScheduler};
use crate::schedules::{
    days_to_string, list_schedules, make_schedule, next_schedule_id, parse_days_pattern,
    seed_starter_schedules, select_schedule_index, validate_days,
};
use crate::streak::{ConfirmOutcome, ALL_ACHIEVEMENTS};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CategoryArg {
    Organic,
    Plastic,
    Paper,
    Glass,
    Mixed,
    Custom,
}

impl CategoryArg {
    fn to_category(self) -> WasteCategory {
        match self {
            CategoryArg::Organic => WasteCategory::Organic,
            CategoryArg::Plastic => WasteCategory::Plastic,
            CategoryArg::Paper => WasteCategory::Paper,
            CategoryArg::Glass => WasteCategory::Glass,
            CategoryArg::Mixed => WasteCategory::Mixed,
            CategoryArg::Custom => WasteCategory::Custom,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "binday", version, about = "Local waste-collection reminder CLI")]
struct Cli {
    /// Overrides the DB path for this invocation.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Overrides logical "today" for deterministic output/testing.
    #[arg(long, global = true)]
    today: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value = "table")]
    format: Format,

    /// Disables ANSI color output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seeds the starter schedules (organic Mon+Thu, plastic Tue, paper Wed).
    Init,
    Add(AddArgs),
    List,
    Show(SelectorArgs),
    Edit(EditArgs),
    Remove(SelectorArgs),
    /// What goes out today and tomorrow.
    Due(DueArgs),
    /// Pickup calendar for the coming days.
    Upcoming(UpcomingArgs),
    /// Confirms today's pickup and updates the streak.
    Done(SelectorArgs),
    /// Streak, points, achievements and the last 30 days.
    Streak,
    Remind(RemindArgs),
    Vacation(VacationArgs),
    Share(ShareArgs),
    Export(ExportArgs),
    Import(ImportArgs),
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Display name. Optional unless --category custom.
    name: Option<String>,

    #[arg(long, value_enum, default_value = "organic")]
    category: CategoryArg,

    /// One of: everyday, weekdays, weekends, or day names (mon,thu)
    #[arg(long)]
    days: String,

    /// Icon glyph. Optional unless --category custom.
    #[arg(long)]
    icon: Option<String>,

    #[arg(long)]
    color: Option<String>,
}

#[derive(Args, Debug)]
struct SelectorArgs {
    /// Schedule selector: exact id (s0001) or unique name prefix (case-insensitive)
    schedule: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Schedule selector: exact id (s0001) or unique name prefix (case-insensitive)
    schedule: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    icon: Option<String>,

    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    days: Option<String>,
}

#[derive(Args, Debug)]
struct DueArgs {
    /// Reference date (defaults to today)
    #[arg(long)]
    date: Option<String>,
}

#[derive(Args, Debug)]
struct UpcomingArgs {
    /// Horizon in days, starting tomorrow
    #[arg(long, default_value_t = 7)]
    days: u32,
}

#[derive(Args, Debug)]
struct RemindArgs {
    #[command(subcommand)]
    command: RemindCommand,
}

#[derive(Subcommand, Debug)]
enum RemindCommand {
    /// Arms tomorrow's reminder (idempotent per day).
    Arm(TsArgs),
    Status,
    /// Sets the reminder hour [0-23] and re-arms on the next `arm`.
    Hour(HourArgs),
    Cancel,
    /// Records the notification permission grant.
    Enable,
    Disable,
}

#[derive(Args, Debug)]
struct TsArgs {
    /// RFC3339 wall-clock override (no implicit system clock)
    #[arg(long)]
    ts: Option<String>,
}

#[derive(Args, Debug)]
struct HourArgs {
    hour: u32,
}

#[derive(Args, Debug)]
struct VacationArgs {
    #[command(subcommand)]
    command: VacationCommand,
}

#[derive(Subcommand, Debug)]
enum VacationCommand {
    /// Suppresses reminders between two dates.
    Set(VacationSetArgs),
    Clear,
    Status,
}

#[derive(Args, Debug)]
struct VacationSetArgs {
    #[arg(long)]
    start: String,

    #[arg(long)]
    end: String,
}

#[derive(Args, Debug)]
struct ShareArgs {
    #[command(subcommand)]
    command: ShareCommand,
}

#[derive(Subcommand, Debug)]
enum ShareCommand {
    /// Generates a family code backed by the local code store.
    Create(TsArgs),
    /// Imports schedules from a family code or a raw token.
    Import(ShareImportArgs),
    /// Prints the raw portable token.
    Token(TsArgs),
}

#[derive(Args, Debug)]
struct ShareImportArgs {
    code: String,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output path (defaults to binday-backup-<today>.json)
    #[arg(long)]
    out: Option<String>,

    /// RFC3339 export timestamp override
    #[arg(long)]
    ts: Option<String>,
}

#[derive(Args, Debug)]
struct ImportArgs {
    file: String,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let exit = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code
        }
    };

    std::process::exit(exit);
}

fn print_line(s: &str) {
    println!("{}", s);
}

fn print_json<T: serde::Serialize>(obj: &T) -> Result<(), CliError> {
    let s = serde_json::to_string_pretty(obj).map_err(|_| CliError::storage("DB IO error"))?;
    println!("{}", s);
    Ok(())
}

fn resolve_today(cli_today: Option<&str>) -> Result<String, CliError> {
    if let Some(t) = cli_today {
        parse_date_string(t, "today")?;
        return Ok(t.trim().to_string());
    }

    if let Ok(t) = std::env::var("BINDAY_TODAY") {
        let tt = t.trim();
        if !tt.is_empty() {
            parse_date_string(tt, "today")?;
            return Ok(tt.to_string());
        }
    }

    Ok(system_today())
}

/// Wall clock for reminder arming: an explicit --ts wins; otherwise the
/// system clock, with the date pinned to logical "today".
fn resolve_clock(ts: Option<&str>, today: &str) -> Result<Clock, CliError> {
    match ts {
        Some(t) => clock_from_rfc3339(t, "ts"),
        None => {
            let mut clock = system_clock();
            clock.date = today.to_string();
            Ok(clock)
        }
    }
}

fn resolve_color_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    true
}

/// Runs scheduler operations against the persisted arm state and the
/// persisted handle counter, putting both back afterwards.
fn with_scheduler<R>(
    db: &mut Db,
    f: impl FnOnce(&mut ReminderScheduler<'_, LocalNotifier>) -> Result<R, CliError>,
) -> Result<R, CliError> {
    let mut notifier = LocalNotifier {
        enabled: db.notifications_enabled,
        next_number: db.meta.next_notification_number,
    };
    let state = std::mem::take(&mut db.reminder);
    let mut scheduler = ReminderScheduler::new(&mut notifier, state);
    let out = f(&mut scheduler);
    db.reminder = scheduler.into_state();
    db.meta.next_notification_number = notifier.next_number;
    out
}

fn schedule_table_row(s: &Schedule, today: &str) -> Result<Vec<String>, CliError> {
    Ok(vec![
        s.id.clone(),
        s.icon.clone(),
        s.name.clone(),
        s.category.as_str().to_string(),
        days_to_string(&s.days),
        next_future_occurrence(s, today)?,
    ])
}

fn print_imported(
    format: Format,
    styler: &Styler,
    created: &[Schedule],
    source: &str,
) -> Result<(), CliError> {
    if format == Format::Json {
        #[derive(serde::Serialize)]
        struct Out<'a> {
            imported: usize,
            schedules: &'a [Schedule],
        }
        print_json(&Out {
            imported: created.len(),
            schedules: created,
        })?;
    } else {
        print_line(&styler.green(&format!(
            "📥 Imported {} schedule(s) from {}",
            created.len(),
            source
        )));
        for s in created.iter() {
            print_line(&format!("- {} {} ({})", s.icon, s.name, s.id));
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let db_path = resolve_db_path(cli.db.as_deref())?;
    let today = resolve_today(cli.today.as_deref())?;

    let styler = Styler::new(resolve_color_enabled(cli.no_color));

    match cli.command {
        Command::Init => {
            let created = update_db(&db_path, |db| {
                if !db.schedules.is_empty() {
                    return Err(CliError::validation(
                        "Already initialized: schedules exist",
                    ));
                }
                seed_starter_schedules(db, &today)
            })?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    schedules: Vec<Schedule>,
                }
                print_json(&Out { schedules: created })?;
            } else {
                let mut rows = Vec::new();
                for s in created.iter() {
                    rows.push(schedule_table_row(s, &today)?);
                }
                print_line(&render_simple_table(
                    &["id", "icon", "name", "category", "days", "next"],
                    &rows,
                ));
            }

            Ok(())
        }

        Command::Add(args) => {
            let days = parse_days_pattern(&args.days)?;
            validate_days(&days)?;

            let created = update_db(&db_path, |db| {
                let id = next_schedule_id(db);
                let schedule = make_schedule(
                    id,
                    args.category.to_category(),
                    args.name.as_deref(),
                    days.clone(),
                    args.icon.as_deref(),
                    args.color.as_deref(),
                    &today,
                )?;
                db.schedules.push(schedule.clone());
                Ok(schedule)
            })?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    schedule: Schedule,
                }
                print_json(&Out { schedule: created })?;
            } else {
                print_line(&render_simple_table(
                    &["id", "icon", "name", "category", "days", "next"],
                    &[schedule_table_row(&created, &today)?],
                ));
            }

            Ok(())
        }

        Command::List => {
            let db = read_db(&db_path)?;
            let schedules = list_schedules(&db);

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Row {
                    id: String,
                    name: String,
                    category: String,
                    days: Vec<u8>,
                    icon: String,
                    color: String,
                    next_collection: String,
                }

                let mut rows = Vec::new();
                for s in schedules.iter() {
                    rows.push(Row {
                        id: s.id.clone(),
                        name: s.name.clone(),
                        category: s.category.as_str().to_string(),
                        days: s.days.clone(),
                        icon: s.icon.clone(),
                        color: s.color.clone(),
                        next_collection: next_future_occurrence(s, &today)?,
                    });
                }

                #[derive(serde::Serialize)]
                struct Out {
                    schedules: Vec<Row>,
                }
                print_json(&Out { schedules: rows })?;
            } else if schedules.is_empty() {
                print_line(&styler.gray("(no schedules configured)"));
            } else {
                let mut rows = Vec::new();
                for s in schedules.iter() {
                    rows.push(schedule_table_row(s, &today)?);
                }
                print_line(&render_simple_table(
                    &["id", "icon", "name", "category", "days", "next"],
                    &rows,
                ));
            }

            Ok(())
        }

        Command::Show(args) => {
            let db = read_db(&db_path)?;
            let idx = select_schedule_index(&db, &args.schedule)?;
            let schedule = db.schedules[idx].clone();
            let next = next_future_occurrence(&schedule, &today)?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    schedule: Schedule,
                    next_collection: String,
                }
                print_json(&Out {
                    schedule,
                    next_collection: next,
                })?;
            } else {
                print_line(&format!(
                    "{} {} ({})",
                    schedule.icon, schedule.name, schedule.id
                ));
                print_line(&format!("category: {}", schedule.category.as_str()));
                print_line(&format!("days: {}", days_to_string(&schedule.days)));
                print_line(&format!("color: {}", schedule.color));
                print_line(&format!("next: {}", next));
                print_line(&format!("created: {}", schedule.created_date));
            }

            Ok(())
        }

        Command::Edit(args) => {
            if args.name.is_none()
                && args.icon.is_none()
                && args.color.is_none()
                && args.days.is_none()
            {
                return Err(CliError::validation("Nothing to change"));
            }

            let updated = update_db(&db_path, |db| {
                let idx = select_schedule_index(db, &args.schedule)?;
                let schedule = &mut db.schedules[idx];

                if let Some(name) = args.name.as_deref() {
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(CliError::validation("Schedule name cannot be empty"));
                    }
                    schedule.name = name.to_string();
                }
                if let Some(icon) = args.icon.as_deref() {
                    let icon = icon.trim();
                    if icon.is_empty() {
                        return Err(CliError::validation("Schedule icon cannot be empty"));
                    }
                    schedule.icon = icon.to_string();
                }
                if let Some(color) = args.color.as_deref() {
                    let color = color.trim();
                    if color.is_empty() {
                        return Err(CliError::validation("Schedule color cannot be empty"));
                    }
                    schedule.color = color.to_string();
                }
                if let Some(pattern) = args.days.as_deref() {
                    let days = parse_days_pattern(pattern)?;
                    validate_days(&days)?;
                    schedule.days = days;
                }

                Ok(schedule.clone())
            })?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    schedule: Schedule,
                }
                print_json(&Out { schedule: updated })?;
            } else {
                print_line(&format!("Updated: {} ({})", updated.name, updated.id));
            }

            Ok(())
        }

        Command::Remove(args) => {
            let removed = update_db(&db_path, |db| {
                let idx = select_schedule_index(db, &args.schedule)?;
                Ok(db.schedules.remove(idx))
            })?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    schedule: Schedule,
                }
                print_json(&Out { schedule: removed })?;
            } else {
                print_line(&format!("Removed: {} ({})", removed.name, removed.id));
            }

            Ok(())
        }

        Command::Due(args) => {
            let date = args.date.as_deref().unwrap_or(&today);
            parse_date_string(date, "date")?;

            let db = read_db(&db_path)?;
            let overview = build_overview(&db, date)?;

            if cli.format == Format::Json {
                print_json(&overview)?;
            } else {
                print_line(&format!("Today ({})", overview.date));
                if overview.today.is_empty() {
                    print_line(&styler.gray("(nothing to take out today)"));
                } else {
                    for row in overview.today.iter() {
                        print_line(&format!("- {} {}", row.icon, row.name));
                    }
                }

                print_line("");
                print_line(&format!("Tomorrow ({})", overview.tomorrow_date));
                if overview.tomorrow.is_empty() {
                    print_line(&styler.gray("(nothing due tomorrow)"));
                } else {
                    for row in overview.tomorrow.iter() {
                        print_line(&format!("- {} {}", row.icon, row.name));
                    }
                }
            }

            Ok(())
        }

        Command::Upcoming(args) => {
            if args.days < 1 || args.days > 30 {
                return Err(CliError::validation("Invalid horizon: --days must be 1-30"));
            }

            let db = read_db(&db_path)?;
            let days = build_upcoming(&db, &today, args.days)?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    days: Vec<crate::occurrence::UpcomingDay>,
                }
                print_json(&Out { days })?;
            } else {
                let rows: Vec<Vec<String>> = days
                    .iter()
                    .map(|d| {
                        let due = if d.due.is_empty() {
                            "-".to_string()
                        } else {
                            d.due
                                .iter()
                                .map(|r| format!("{} {}", r.icon, r.name))
                                .collect::<Vec<String>>()
                                .join(", ")
                        };
                        vec![d.date.clone(), d.weekday.clone(), due]
                    })
                    .collect();
                print_line(&render_simple_table(&["date", "day", "pickups"], &rows));
            }

            Ok(())
        }

        Command::Done(args) => {
            let (name, outcome, stats) = update_db(&db_path, |db| {
                let idx = select_schedule_index(db, &args.schedule)?;
                let name = db.schedules[idx].name.clone();
                let outcome = streak::confirm(db, &name, &today)?;
                Ok((name, outcome, db.stats.clone()))
            })?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    confirmed: bool,
                    category: String,
                    streak: u32,
                    points: u32,
                    level: u32,
                    unlocked: Vec<String>,
                }

                let out = match &outcome {
                    ConfirmOutcome::Confirmed(c) => Out {
                        confirmed: true,
                        category: name.clone(),
                        streak: c.streak,
                        points: c.points,
                        level: c.level,
                        unlocked: c.unlocked.iter().map(|a| a.id().to_string()).collect(),
                    },
                    ConfirmOutcome::AlreadyConfirmed => Out {
                        confirmed: false,
                        category: name.clone(),
                        streak: stats.current_streak,
                        points: stats.points,
                        level: stats.level,
                        unlocked: Vec::new(),
                    },
                };
                print_json(&out)?;
            } else {
                match &outcome {
                    ConfirmOutcome::Confirmed(c) => {
                        print_line(&styler.green(&format!(
                            "✅ {} confirmed! +{} points (streak: {} days)",
                            name, c.points_awarded, c.streak
                        )));
                        for a in c.unlocked.iter() {
                            print_line(&styler.yellow(&format!(
                                "{} Achievement unlocked: {} ({})",
                                a.icon(),
                                a.title(),
                                a.description()
                            )));
                        }
                    }
                    ConfirmOutcome::AlreadyConfirmed => {
                        print_line("🎯 Already confirmed today");
                    }
                }
            }

            Ok(())
        }

        Command::Streak => {
            let db = read_db(&db_path)?;
            let grid = streak::last_30_days(&db, &today)?;
            let milestones = streak::milestones(&db.stats);

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct AchievementRow {
                    id: String,
                    title: String,
                    description: String,
                    unlocked: bool,
                }

                #[derive(serde::Serialize)]
                struct Out {
                    stats: UserStats,
                    best_streak: u32,
                    achievements: Vec<AchievementRow>,
                    last_30_days: Vec<streak::HistoryDay>,
                    milestones: Vec<streak::Milestone>,
                }

                let achievements = ALL_ACHIEVEMENTS
                    .iter()
                    .map(|a| AchievementRow {
                        id: a.id().to_string(),
                        title: a.title().to_string(),
                        description: a.description().to_string(),
                        unlocked: db.stats.unlocked_achievements.iter().any(|u| u == a.id()),
                    })
                    .collect();

                print_json(&Out {
                    stats: db.stats.clone(),
                    best_streak: db.best_streak,
                    achievements,
                    last_30_days: grid,
                    milestones,
                })?;
            } else {
                print_line(&format!(
                    "Streak: {} {} (best {})",
                    db.stats.current_streak,
                    streak::streak_emoji(db.stats.current_streak),
                    db.best_streak
                ));
                print_line(&format!(
                    "Total pickups: {}   Level {} ({} points)",
                    db.stats.total_confirmations, db.stats.level, db.stats.points
                ));
                if let Some(last) = db.stats.last_confirmation_day.as_deref() {
                    print_line(&format!("Last confirmed: {}", last));
                }

                let cells: String = grid
                    .iter()
                    .map(|d| {
                        if d.count > 0 {
                            '█'
                        } else if d.is_today {
                            '●'
                        } else {
                            '·'
                        }
                    })
                    .collect();
                print_line(&format!("Last 30 days: {}", cells));

                print_line("");
                print_line("Achievements:");
                for a in ALL_ACHIEVEMENTS {
                    let unlocked = db.stats.unlocked_achievements.iter().any(|u| u == a.id());
                    let mark = if unlocked {
                        styler.yellow("[unlocked]")
                    } else {
                        styler.gray("[locked]")
                    };
                    print_line(&format!(
                        "- {} {} {}: {}",
                        a.icon(),
                        mark,
                        a.title(),
                        a.description()
                    ));
                }

                if !milestones.is_empty() {
                    print_line("");
                    print_line("Next goals:");
                    for m in milestones.iter() {
                        print_line(&format!("- {}: {}/{}", m.label, m.progress, m.target));
                    }
                }
            }

            Ok(())
        }

        Command::Remind(args) => match args.command {
            RemindCommand::Arm(ts_args) => {
                let clock = resolve_clock(ts_args.ts.as_deref(), &today)?;

                let outcome = update_db(&db_path, |db| {
                    vacation::drop_if_expired(db, &clock.date);
                    let schedules = db.schedules.clone();
                    let hour = db.reminder_hour;
                    let window = db.vacation.clone();
                    with_scheduler(db, |scheduler| {
                        scheduler.arm(&schedules, hour, &clock, window.as_ref())
                    })
                })?;

                if let ArmOutcome::PermissionDenied = outcome {
                    return Err(CliError::permission(
                        "Notifications are not enabled. Run `binday remind enable` first.",
                    ));
                }

                if cli.format == Format::Json {
                    #[derive(serde::Serialize)]
                    struct Out {
                        outcome: String,
                        fire_at: Option<String>,
                        names: Vec<String>,
                    }

                    let out = match &outcome {
                        ArmOutcome::Armed { fire_at, names } => Out {
                            outcome: "armed".to_string(),
                            fire_at: Some(fire_at.clone()),
                            names: names.clone(),
                        },
                        ArmOutcome::AlreadyArmed { .. } => Out {
                            outcome: "already-armed".to_string(),
                            fire_at: None,
                            names: Vec::new(),
                        },
                        ArmOutcome::NothingDue => Out {
                            outcome: "nothing-due".to_string(),
                            fire_at: None,
                            names: Vec::new(),
                        },
                        ArmOutcome::VacationSuppressed => Out {
                            outcome: "vacation-suppressed".to_string(),
                            fire_at: None,
                            names: Vec::new(),
                        },
                        ArmOutcome::PermissionDenied => unreachable!(),
                    };
                    print_json(&out)?;
                } else {
                    match &outcome {
                        ArmOutcome::Armed { fire_at, names } => {
                            print_line(&styler.green(&format!(
                                "🔔 Reminder armed for {}: {}",
                                fire_at,
                                names.join(", ")
                            )));
                        }
                        ArmOutcome::AlreadyArmed { date } => {
                            print_line(&format!("Reminder already armed today ({})", date));
                        }
                        ArmOutcome::NothingDue => {
                            print_line("No pickups tomorrow; reminder not armed");
                        }
                        ArmOutcome::VacationSuppressed => {
                            print_line("🏖️ Vacation mode active; reminder suppressed");
                        }
                        ArmOutcome::PermissionDenied => unreachable!(),
                    }
                }

                Ok(())
            }

            RemindCommand::Status => {
                let db = read_db(&db_path)?;

                if cli.format == Format::Json {
                    #[derive(serde::Serialize)]
                    struct Out {
                        enabled: bool,
                        hour: u32,
                        scheduled: bool,
                        last_armed_date: Option<String>,
                        pending: Option<crate::model::PendingNotification>,
                        vacation: Option<crate::model::VacationWindow>,
                    }
                    print_json(&Out {
                        enabled: db.notifications_enabled,
                        hour: db.reminder_hour,
                        scheduled: db.reminder.scheduled,
                        last_armed_date: db.reminder.last_armed_date.clone(),
                        pending: db.reminder.pending.clone(),
                        vacation: db.vacation.clone(),
                    })?;
                } else {
                    print_line(&format!(
                        "Notifications: {}",
                        if db.notifications_enabled {
                            styler.green("enabled")
                        } else {
                            styler.gray("disabled")
                        }
                    ));
                    print_line(&format!("Reminder hour: {:02}:00", db.reminder_hour));
                    match db.reminder.pending.as_ref() {
                        Some(p) => {
                            print_line(&format!("Pending: {} at {}", p.title, p.fire_at));
                            print_line(&format!("  {}", p.body));
                        }
                        None => print_line(&styler.gray("Pending: (none)")),
                    }
                    if let Some(w) = db.vacation.as_ref() {
                        print_line(&format!("Vacation: {} to {}", w.start, w.end));
                    }
                }

                Ok(())
            }

            RemindCommand::Hour(hour_args) => {
                if hour_args.hour > 23 {
                    return Err(CliError::validation("Invalid hour: must be 0-23"));
                }

                update_db(&db_path, |db| {
                    db.reminder_hour = hour_args.hour;
                    with_scheduler(db, |scheduler| {
                        scheduler.reconfigure();
                        Ok(())
                    })
                })?;

                print_line(&format!("Reminder hour set to {:02}:00", hour_args.hour));
                Ok(())
            }

            RemindCommand::Cancel => {
                update_db(&db_path, |db| {
                    with_scheduler(db, |scheduler| {
                        scheduler.cancel_all();
                        Ok(())
                    })
                })?;

                print_line("Reminder cancelled");
                Ok(())
            }

            RemindCommand::Enable => {
                update_db(&db_path, |db| {
                    db.notifications_enabled = true;
                    Ok(())
                })?;

                print_line(&styler.green("🔔 Notifications enabled"));
                Ok(())
            }

            RemindCommand::Disable => {
                update_db(&db_path, |db| {
                    db.notifications_enabled = false;
                    with_scheduler(db, |scheduler| {
                        scheduler.cancel_all();
                        Ok(())
                    })
                })?;

                print_line("Notifications disabled");
                Ok(())
            }
        },

        Command::Vacation(args) => match args.command {
            VacationCommand::Set(set_args) => {
                let window = update_db(&db_path, |db| {
                    let window = vacation::make_window(&set_args.start, &set_args.end)?;
                    db.vacation = Some(window.clone());
                    with_scheduler(db, |scheduler| {
                        scheduler.cancel_all();
                        Ok(())
                    })?;
                    Ok(window)
                })?;

                print_line(&format!(
                    "🏖️ Vacation mode from {} to {}; reminders suppressed",
                    window.start, window.end
                ));
                Ok(())
            }

            VacationCommand::Clear => {
                update_db(&db_path, |db| {
                    db.vacation = None;
                    Ok(())
                })?;

                print_line("🏠 Vacation mode cleared; reminders resume");
                Ok(())
            }

            VacationCommand::Status => {
                let db = read_db(&db_path)?;

                if cli.format == Format::Json {
                    #[derive(serde::Serialize)]
                    struct Out {
                        window: Option<crate::model::VacationWindow>,
                        active: bool,
                    }
                    let active = db
                        .vacation
                        .as_ref()
                        .map(|w| vacation::is_active(w, &today))
                        .unwrap_or(false);
                    print_json(&Out {
                        window: db.vacation.clone(),
                        active,
                    })?;
                } else {
                    match db.vacation.as_ref() {
                        None => print_line(&styler.gray("(no vacation window)")),
                        Some(w) if vacation::is_active(w, &today) => {
                            print_line(&format!(
                                "🏖️ Vacation active: {} to {} (reminders suppressed)",
                                w.start, w.end
                            ));
                        }
                        Some(w) if today.as_str() < w.start.as_str() => {
                            print_line(&format!("Vacation scheduled: {} to {}", w.start, w.end));
                        }
                        Some(w) => {
                            print_line(&format!("Vacation ended on {}", w.end));
                        }
                    }
                }

                Ok(())
            }
        },

        Command::Share(args) => match args.command {
            ShareCommand::Create(ts_args) => {
                let timestamp = resolve_timestamp_ms(ts_args.ts.as_deref())?;

                let (code, token, count) = update_db(&db_path, |db| {
                    if db.schedules.is_empty() {
                        return Err(CliError::validation("No schedules to share"));
                    }
                    let token = transfer::encode_token(&db.schedules, timestamp)?;
                    let mut rng = rand::thread_rng();
                    let code = transfer::generate_family_code(db, &mut rng);
                    db.share_codes.push(ShareCodeEntry {
                        code: code.clone(),
                        token: token.clone(),
                        created_date: today.clone(),
                    });
                    Ok((code, token, db.schedules.len()))
                })?;

                if cli.format == Format::Json {
                    #[derive(serde::Serialize)]
                    struct Out {
                        code: String,
                        token: String,
                        schedules: usize,
                    }
                    print_json(&Out {
                        code,
                        token,
                        schedules: count,
                    })?;
                } else {
                    print_line(&styler.green("📤 Share code created!"));
                    print_line(&format!("Family code: {}", code));
                    print_line(&format!("Token: {}", token));
                    print_line("Family members import with `binday share import <code-or-token>`");
                }

                Ok(())
            }

            ShareCommand::Import(import_args) => {
                let created = update_db(&db_path, |db| {
                    let arg = import_args.code.trim();
                    let as_code = arg.to_uppercase();
                    let token = if transfer::looks_like_family_code(&as_code) {
                        transfer::find_stored_token(db, &as_code)
                            .map(|e| e.token.clone())
                            .ok_or_else(|| {
                                CliError::not_found(format!("Unknown family code: {}", as_code))
                            })?
                    } else {
                        arg.to_string()
                    };

                    let inputs = transfer::decode_token(&token)?;
                    Ok(transfer::merge_imported(db, inputs, &today))
                })?;

                print_imported(cli.format, &styler, &created, "share code")?;
                Ok(())
            }

            ShareCommand::Token(ts_args) => {
                let timestamp = resolve_timestamp_ms(ts_args.ts.as_deref())?;
                let db = read_db(&db_path)?;
                if db.schedules.is_empty() {
                    return Err(CliError::validation("No schedules to share"));
                }
                let token = transfer::encode_token(&db.schedules, timestamp)?;

                if cli.format == Format::Json {
                    #[derive(serde::Serialize)]
                    struct Out {
                        token: String,
                    }
                    print_json(&Out { token })?;
                } else {
                    print_line(&token);
                }

                Ok(())
            }
        },

        Command::Export(args) => {
            let export_date = match args.ts.as_deref() {
                Some(ts) => {
                    clock_from_rfc3339(ts, "ts")?;
                    ts.trim().to_string()
                }
                None => chrono::Utc::now().to_rfc3339(),
            };

            let db = read_db(&db_path)?;
            let schedules = list_schedules(&db);
            let path = args
                .out
                .clone()
                .unwrap_or_else(|| backup::default_backup_filename(&today));

            backup::export_to_path(&path, &schedules, &export_date)?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    path: String,
                    schedules: usize,
                }
                print_json(&Out {
                    path,
                    schedules: schedules.len(),
                })?;
            } else {
                print_line(&styler.green(&format!(
                    "💾 Exported {} schedule(s) to {}",
                    schedules.len(),
                    path
                )));
            }

            Ok(())
        }

        Command::Import(args) => {
            let inputs = backup::import_from_path(&args.file)?;
            let created =
                update_db(&db_path, |db| Ok(transfer::merge_imported(db, inputs, &today)))?;

            print_imported(cli.format, &styler, &created, "backup file")?;
            Ok(())
        }
    }
}

fn resolve_timestamp_ms(ts: Option<&str>) -> Result<u64, CliError> {
    match ts {
        Some(t) => {
            let dt = chrono::DateTime::parse_from_rfc3339(t.trim())
                .map_err(|_| CliError::validation(format!("Invalid ts: {}", t)))?;
            Ok(dt.timestamp_millis().max(0) as u64)
        }
        None => Ok(chrono::Utc::now().timestamp_millis().max(0) as u64),
    }
}
