#![forbid(unsafe_code)]
//! List course topics, check the exercise/solution layout, and show a
//! topic's header, TODOs and workflow.

use blockfund::cli::{init_logging, load_course, topics_table};
use blockfund::course::{Side, TopicReport};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Configuration file (defaults to ./blockfund.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Course root, overriding the configuration
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List topics and whether each has an exercise and a solution
    List,
    /// Check exercise/solution pairing and TODO ordering
    Check,
    /// Show a topic's header comment and how to work through it
    Show {
        /// Topic name, name without its number, or number
        topic: String,
        /// Read the solution instead of the exercise
        #[arg(long)]
        solution: bool,
    },
    /// List the TODO markers of a topic
    Todos {
        topic: String,
        #[arg(long)]
        solution: bool,
    },
}

fn side(solution: bool) -> Side {
    if solution {
        Side::Solution
    } else {
        Side::Exercise
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let course = load_course(cli.config.as_deref(), cli.root.clone())?;

    match &cli.command {
        Commands::List => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&course.topics)?);
            } else if course.topics.is_empty() {
                println!("{}", "No topics found.".yellow());
            } else {
                println!("{}", topics_table(&course.topics));
            }
        }
        Commands::Check => {
            let issues = course.check()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&issues)?);
            } else if issues.is_empty() {
                println!(
                    "{} {} topics checked",
                    "Course layout OK:".bright_green(),
                    course.topics.len()
                );
            } else {
                for issue in &issues {
                    println!("{} {}", "•".bright_red(), issue);
                }
            }
            if !issues.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Show { topic, solution } => {
            let report = course.report(topic, side(*solution))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_show(&report);
            }
        }
        Commands::Todos { topic, solution } => {
            let report = course.report(topic, side(*solution))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report.todos)?);
            } else {
                print_todos(&report);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_show(report: &TopicReport) {
    println!(
        "{} ({})",
        report.topic.name.bright_cyan().bold(),
        report.side
    );
    println!("{}", report.entry_point.display().to_string().dimmed());
    println!();
    if report.header.is_empty() {
        println!("{}", "No header comment.".yellow());
    } else {
        println!("{}", report.header);
    }
    println!();
    println!("{}", "Workflow:".bright_green().underline());
    for (i, step) in report.workflow.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}

fn print_todos(report: &TopicReport) {
    if report.todos.is_empty() {
        println!("{}", "No TODO markers.".yellow());
        return;
    }
    for marker in &report.todos {
        let label = match marker.number {
            Some(n) => format!("TODO {}", n),
            None => "TODO".to_string(),
        };
        println!("{:>5}  {}", marker.line, label.bright_yellow());
    }
}
