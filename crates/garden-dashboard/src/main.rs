use anyhow::Context;
use chrono::{Local, NaiveDate, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use garden_core::{Priority, RuleCatalog, Task, TaskId, UserId};
use garden_dashboard::{
    describe_cells, init_tracing, render_grid, Dashboard, DashboardConfig, DashboardView,
};
use garden_store::FileStore;
use std::path::PathBuf;
use std::sync::Arc;

const GRID_COLUMNS: usize = 4;

fn today_arg() -> Arg {
    Arg::new("today")
        .long("today")
        .value_parser(value_parser!(NaiveDate))
        .help("Evaluate as of this date (YYYY-MM-DD), defaults to the local date")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn cli() -> Command {
    Command::new("garden")
        .version(garden_dashboard::VERSION)
        .about("Grow a garden by finishing tasks and keeping routines")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Data directory, overrides the configuration"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .default_value("default")
                .help("User whose garden to use"),
        )
        .subcommand(Command::new("init").about("Create the garden if it does not exist"))
        .subcommand(
            Command::new("refresh")
                .about("Evaluate achievements and save any new rewards")
                .arg(today_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Show the garden and today's tasks without evaluating")
                .arg(today_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("routine")
                .about("Mark a routine done for today")
                .arg(Arg::new("name").required(true).help("Routine name"))
                .arg(today_arg()),
        )
        .subcommand(
            Command::new("task")
                .about("Manage tasks")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Add a task")
                        .arg(Arg::new("title").required(true).help("Task title"))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_parser(value_parser!(NaiveDate))
                                .help("Due date (YYYY-MM-DD), defaults to today"),
                        )
                        .arg(
                            Arg::new("high")
                                .long("high")
                                .action(ArgAction::SetTrue)
                                .help("High priority"),
                        )
                        .arg(Arg::new("category").long("category").help("Category label")),
                )
                .subcommand(
                    Command::new("toggle")
                        .about("Flip a task between open and done")
                        .arg(Arg::new("id").required(true).help("Task id"))
                        .arg(today_arg()),
                ),
        )
        .subcommand(Command::new("catalog").about("List every achievement and its reward"))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<DashboardConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    Ok(match matches.get_one::<PathBuf>("data-dir") {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    })
}

fn today(args: &ArgMatches) -> NaiveDate {
    args.try_get_one::<NaiveDate>("today")
        .ok()
        .flatten()
        .copied()
        .unwrap_or_else(|| Local::now().date_naive())
}

fn print_view(view: &DashboardView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    print!("{}", render_grid(&view.grid, GRID_COLUMNS));
    for award in &view.awarded {
        println!("New: {} (cell {})", award.achievement, award.index);
    }
    for fault in &view.faults {
        println!("Could not check {}: {}", fault.achievement, fault.error);
    }
    println!();
    println!(
        "Streak: {} day(s), longest {}, {} full day(s)",
        view.streak.current, view.streak.longest, view.streak.completed_days
    );
    println!("Today ({}):", view.today);
    for shown in &view.today_tasks {
        let mark = if shown.task.completed { "x" } else { " " };
        let overdue = shown
            .days_overdue
            .map(|d| format!(" [{d}d overdue]"))
            .unwrap_or_default();
        println!("  [{mark}] {} {}{overdue}", shown.task.id, shown.task.title);
    }
    println!("Routines:");
    for routine in view.routines.iter().filter(|r| r.unlocked) {
        let mark = if routine.done_today { "x" } else { " " };
        println!("  [{mark}] {} {}/{}", routine.name, routine.streak, routine.goal);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config.logging)?;

    let user = UserId::new(
        matches
            .get_one::<String>("user")
            .context("no user given")?
            .as_str(),
    );
    let store = Arc::new(FileStore::new(config.data_dir.clone()));
    let dashboard = Dashboard::new(store, config);

    match matches.subcommand() {
        Some(("init", _)) => {
            let grid = dashboard.garden().ensure_grid(&user).await?;
            print!("{}", render_grid(&grid, GRID_COLUMNS));
        }
        Some(("refresh", args)) => {
            let view = dashboard.refresh(&user, today(args), Utc::now()).await?;
            print_view(&view, args.get_flag("json"))?;
        }
        Some(("show", args)) => {
            let view = dashboard.show(&user, today(args)).await?;
            if args.get_flag("json") {
                print_view(&view, true)?;
            } else {
                print!("{}", describe_cells(&view.grid));
                println!();
                print_view(&view, false)?;
            }
        }
        Some(("routine", args)) => {
            let name = args.get_one::<String>("name").context("no routine name")?;
            let report = dashboard
                .complete_routine(&user, name, today(args), Utc::now())
                .await?;
            println!("{}", serde_json::to_string(&report.completion)?);
            for unlocked in &report.unlocked {
                println!("Unlocked: {unlocked}");
            }
        }
        Some(("task", args)) => match args.subcommand() {
            Some(("add", add)) => {
                let title = add.get_one::<String>("title").context("no title")?;
                let date = add
                    .get_one::<NaiveDate>("date")
                    .copied()
                    .unwrap_or_else(|| Local::now().date_naive());
                let mut task = Task::new(title.as_str(), date);
                if add.get_flag("high") {
                    task = task.with_priority(Priority::High);
                }
                if let Some(category) = add.get_one::<String>("category") {
                    task = task.with_category(category.as_str());
                }
                let task = dashboard.add_task(&user, task).await?;
                println!("{}", task.id);
            }
            Some(("toggle", toggle)) => {
                let id = toggle.get_one::<String>("id").context("no task id")?;
                let task = dashboard
                    .toggle_task(&user, &TaskId::from(id.as_str()), today(toggle))
                    .await?;
                let state = if task.completed { "done" } else { "open" };
                println!("{} {state}", task.id);
            }
            _ => unreachable!("subcommand_required"),
        },
        Some(("catalog", _)) => {
            for rule in RuleCatalog::standard().iter() {
                let reward = rule.reward();
                println!(
                    "{} {:<40} {} - {}",
                    reward.level.glyph(),
                    rule.id().suggestion(),
                    reward.title,
                    reward.detail
                );
            }
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
