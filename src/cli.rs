use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::app::App;
use crate::error::{AppError, Result};
use crate::models::{
    format_date, parse_date, NewSchedule, NewTask, Schedule, TaskStatus, TaskType, TaskUpdate,
    Theme,
};
use crate::services::week::week_bounds;
use crate::services::PlannerService;

#[derive(Parser)]
#[command(name = "study-planner")]
#[command(about = "Study schedules, tasks and streaks kept in one JSON file")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Data file to use instead of the configured one
    #[arg(short, long)]
    pub data: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start up, then deliver reminders until Ctrl-C
    Run,
    /// Manage study sessions
    Schedule {
        #[command(subcommand)]
        action: ScheduleCommand,
    },
    /// Manage daily, weekly and monthly tasks
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Streak, completion stats and today's quote
    Stats,
    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// Add a study session
    Add {
        name: String,
        #[arg(long)]
        subject: String,
        /// Start time (HH:MM)
        #[arg(long)]
        time: String,
        /// Date (DD-MM-YYYY), today if omitted
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Send a reminder at the start time
        #[arg(long)]
        notify: bool,
    },
    /// List sessions, optionally for one date (DD-MM-YYYY)
    List {
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete every session with this name
    Delete { name: String },
    /// Per-day progress for the week containing a date (DD-MM-YYYY), this week if omitted
    Week {
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove sessions outside the current week
    Clean,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        name: String,
        #[arg(long)]
        description: String,
        /// Due date (DD-MM-YYYY)
        #[arg(long)]
        due: String,
        /// Daily, Weekly or Monthly
        #[arg(long = "type", default_value = "Daily")]
        task_type: TaskType,
        /// Pending, In-Progress or Done
        #[arg(long, default_value = "Pending")]
        status: TaskStatus,
    },
    /// List tasks grouped by type
    List,
    /// Change the status of the first task with this name
    Status { name: String, status: TaskStatus },
    /// Mark the first task with this name as done
    Complete { name: String },
    /// Delete every task with this name
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    /// Set name and title
    Set { name: String, title: String },
    /// Set the avatar image path
    Avatar { path: String },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    Show,
    /// Light or Dark
    Theme { theme: Theme },
    /// Primary colour name
    Color { color: String },
    /// Turn reminders on or off
    Notifications { switch: Switch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

pub async fn execute(command: Commands, app: &App) -> Result<()> {
    let planner = app.planner.as_ref();
    match command {
        Commands::Run => app.run().await,
        Commands::Schedule { action } => handle_schedule(action, planner).await,
        Commands::Task { action } => handle_task(action, planner).await,
        Commands::Stats => handle_stats(planner).await,
        Commands::Profile { action } => handle_profile(action, planner).await,
        Commands::Settings { action } => handle_settings(action, planner).await,
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDate> {
    parse_date(value).ok_or_else(|| {
        AppError::Validation(format!("invalid date '{}', expected DD-MM-YYYY", value))
    })
}

fn print_schedule(schedule: &Schedule) {
    let bell = if schedule.notification { " [reminder]" } else { "" };
    println!(
        "{} {}  {} ({}){}",
        schedule.date, schedule.time, schedule.name, schedule.subject, bell
    );
    if !schedule.description.is_empty() {
        println!("    {}", schedule.description);
    }
}

async fn handle_schedule(action: ScheduleCommand, planner: &PlannerService) -> Result<()> {
    match action {
        ScheduleCommand::Add {
            name,
            subject,
            time,
            date,
            description,
            notify,
        } => {
            let date = date.unwrap_or_else(|| format_date(planner.today()));
            let schedule = planner
                .add_schedule(NewSchedule {
                    name,
                    subject,
                    description,
                    time,
                    date,
                    notification: notify,
                })
                .await?;
            println!("Schedule added successfully (ID: {})", schedule.id);
        }
        ScheduleCommand::List { date } => {
            let schedules = match date {
                Some(date) => planner.schedules_on(parse_date_arg(&date)?).await?,
                None => planner.get_all_schedules().await?,
            };
            if schedules.is_empty() {
                println!("No schedules");
            }
            for schedule in &schedules {
                print_schedule(schedule);
            }
        }
        ScheduleCommand::Delete { name } => {
            let removed = planner.delete_schedule_by_name(&name).await?;
            println!("Deleted {} schedule(s)", removed);
        }
        ScheduleCommand::Week { date } => {
            let day = match date {
                Some(date) => parse_date_arg(&date)?,
                None => planner.today(),
            };
            let (monday, _) = week_bounds(day);
            let view = planner.build_week_view(monday).await?;
            for progress in &view.days {
                println!(
                    "{} {}  {:>5}  {:>3}%",
                    progress.date.format("%a"),
                    format_date(progress.date),
                    progress.label(),
                    progress.percent()
                );
            }
        }
        ScheduleCommand::Clean => {
            let removed = planner.clean_old_schedules().await?;
            println!("Removed {} schedule(s) outside this week", removed);
        }
    }
    Ok(())
}

async fn handle_task(action: TaskCommand, planner: &PlannerService) -> Result<()> {
    match action {
        TaskCommand::Add {
            name,
            description,
            due,
            task_type,
            status,
        } => {
            let task = planner
                .add_task(NewTask {
                    name,
                    description,
                    due_date: due,
                    task_type,
                    status,
                })
                .await?;
            println!("Task created successfully (ID: {})", task.id);
        }
        TaskCommand::List => {
            let grouped = planner.tasks_by_type().await?;
            for task_type in TaskType::ALL {
                println!("{}:", task_type);
                let section = grouped.section(task_type);
                if section.is_empty() {
                    println!("    -");
                }
                for task in section {
                    println!(
                        "    [{}] {} (due {}): {}",
                        task.status, task.name, task.due_date, task.description
                    );
                }
            }
        }
        TaskCommand::Status { name, status } => {
            if planner.update_task(&name, TaskUpdate::status(status)).await? {
                println!("'{}' is now {}", name, status);
            } else {
                println!("No task named '{}'", name);
            }
        }
        TaskCommand::Complete { name } => {
            let task = planner
                .find_task_by_name(&name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("task '{}'", name)))?;
            planner.complete_task(task.id).await?;
            println!(
                "'{}' done. Streak: {} day(s)",
                name,
                planner.current_streak().await?
            );
        }
        TaskCommand::Delete { name } => {
            let removed = planner.delete_task(&name).await?;
            println!("Deleted {} task(s)", removed);
        }
    }
    Ok(())
}

async fn handle_stats(planner: &PlannerService) -> Result<()> {
    let dash = planner.dashboard().await?;
    println!("Streak:      {} day(s)", dash.current_streak);
    println!(
        "Tasks:       {}/{} done ({:.1}%)",
        dash.stats.completed, dash.stats.total, dash.stats.completion_percentage
    );
    println!("GPA:         {:.1}", dash.gpa);
    println!("Study hours: {:.1}", dash.study_hours);
    println!();
    println!("{}", dash.quote);
    println!("Tip: {}", dash.tip);
    Ok(())
}

async fn handle_profile(action: ProfileCommand, planner: &PlannerService) -> Result<()> {
    let profile = match action {
        ProfileCommand::Show => planner.get_profile().await?,
        ProfileCommand::Set { name, title } => planner.update_profile(&name, &title).await?,
        ProfileCommand::Avatar { path } => planner.set_avatar(&path).await?,
    };
    println!("Name:   {}", profile.name);
    println!("Title:  {}", profile.title);
    println!("Avatar: {}", profile.avatar_path);
    Ok(())
}

async fn handle_settings(action: SettingsCommand, planner: &PlannerService) -> Result<()> {
    let settings = match action {
        SettingsCommand::Show => planner.get_settings().await?,
        SettingsCommand::Theme { theme } => planner.set_theme(theme).await?,
        SettingsCommand::Color { color } => planner.set_primary_color(&color).await?,
        SettingsCommand::Notifications { switch } => {
            planner
                .set_notifications_enabled(switch == Switch::On)
                .await?
        }
    };
    let notifications = if settings.notifications_enabled { "on" } else { "off" };
    println!("Notifications: {}", notifications);
    println!("Theme:         {}", settings.theme);
    println!("Colour:        {}", settings.primary_color);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_task_flags() {
        let cli = Cli::try_parse_from([
            "study-planner",
            "--data",
            "/tmp/plan.json",
            "task",
            "add",
            "Essay",
            "--description",
            "draft",
            "--due",
            "21-03-2025",
            "--type",
            "weekly",
            "--status",
            "in-progress",
        ])
        .unwrap();
        assert_eq!(cli.data.as_deref(), Some("/tmp/plan.json"));
        match cli.command {
            Commands::Task {
                action: TaskCommand::Add {
                    task_type, status, ..
                },
            } => {
                assert_eq!(task_type, TaskType::Weekly);
                assert_eq!(status, TaskStatus::InProgress);
            }
            _ => panic!("expected task add"),
        }
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["study-planner", "settings", "theme", "Sepia"]).is_err());
        assert!(Cli::try_parse_from(["study-planner", "settings", "theme", "dark"]).is_ok());
    }
}
