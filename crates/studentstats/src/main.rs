//! `stustat` - CLI for studentstats
//!
//! This binary imports student directory records into the local database and
//! prints the statistics dashboard computed from them.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, error};

use studentstats::cli::{
    Cli, Command, ConfigCommand, DeleteCommand, ImportCommand, OutputFormat, SearchCommand,
    ShowCommand,
};
use studentstats::stats::{CategoryCount, WordCount};
use studentstats::{course, init_logging, Config, StatisticsReport, Storage, StudentRecord};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Config commands work even when the database cannot be opened
    match cli.command {
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
        Command::Import(cmd) => handle_import(&mut open_storage(cli.config)?.1, &cmd),
        Command::Stats(cmd) => {
            let (config, storage) = open_storage(cli.config)?;
            handle_stats(&storage, &config, cmd.format)
        }
        Command::List(cmd) => {
            let (_, storage) = open_storage(cli.config)?;
            print_students(&storage.list(cmd.limit)?, cmd.format)
        }
        Command::Search(cmd) => handle_search(&open_storage(cli.config)?.1, &cmd),
        Command::Show(cmd) => handle_show(&open_storage(cli.config)?.1, &cmd),
        Command::Delete(cmd) => handle_delete(&open_storage(cli.config)?.1, &cmd),
        Command::Status(cmd) => handle_status(&open_storage(cli.config)?.1, cmd.json),
    }
}

fn open_storage(config_path: Option<PathBuf>) -> Result<(Config, Storage)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    let db_path = config.database_path();
    let storage = Storage::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    Ok((config, storage))
}

fn handle_import(storage: &mut Storage, cmd: &ImportCommand) -> Result<()> {
    let students = read_students(&cmd.file)?;
    let summary = storage
        .import(&students)
        .with_context(|| format!("failed to import {}", cmd.file.display()))?;

    println!(
        "Imported {} students ({} new, {} updated)",
        students.len(),
        summary.inserted,
        summary.updated
    );
    Ok(())
}

fn read_students(path: &Path) -> Result<Vec<StudentRecord>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let students: Vec<StudentRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of student records", path.display()))?;
    debug!("Read {} records from {}", students.len(), path.display());
    Ok(students)
}

fn handle_stats(storage: &Storage, config: &Config, format: OutputFormat) -> Result<()> {
    let snapshot = match storage.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to load student snapshot: {}", e);
            bail!("statistics unavailable: {e}");
        }
    };

    let report = StatisticsReport::compute(&snapshot, &config.statistics);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain | OutputFormat::Table => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &StatisticsReport) {
    println!("Student statistics");
    println!("==================");
    println!("Registered students: {}", report.total_students);
    println!("Snapshot:            {}", report.snapshot_digest);

    println!();
    println!("[Cohorts]");
    for cohort in &report.cohorts {
        println!(
            "  {:<8} {:>4} / {:<4} {:>3}%",
            cohort.label, cohort.registered_count, cohort.total_count, cohort.percentage
        );
    }

    println!();
    println!("[Courses]");
    for course in &report.courses {
        print_category(&course.name, &course.category);
    }

    println!();
    println!("[Courses by cohort]");
    for cohort in &report.courses_by_cohort {
        println!("  {} ({} students)", cohort.cohort, cohort.registered_count);
        for course in &cohort.courses {
            print!("  ");
            print_category(&course.name, &course.category);
        }
    }

    print_section("Blood types", &report.blood_types);
    print_section("Prefectures", &report.prefectures);
    print_section("Star signs", &report.star_signs);
    print_section("Personality types", &report.personality_types);

    print_words("Hobbies", &report.word_clouds.hobbies);
    print_words("Circles", &report.word_clouds.circles);
    print_words("Likes", &report.word_clouds.likes);
    print_words("Dislikes", &report.word_clouds.dislikes);
}

fn print_section(title: &str, entries: &[CategoryCount]) {
    println!();
    println!("[{title}]");
    if entries.is_empty() {
        println!("  (none)");
    }
    for entry in entries {
        print_category(&entry.label, entry);
    }
}

fn print_category(name: &str, entry: &CategoryCount) {
    println!("  {:<24} {:>4} {:>3}%", name, entry.count, entry.percentage);
}

fn print_words(title: &str, words: &[WordCount]) {
    println!();
    println!("[{title}]");
    if words.is_empty() {
        println!("  (none)");
        return;
    }
    let line = words
        .iter()
        .map(|w| format!("{} ({})", w.text, w.value))
        .collect::<Vec<_>>()
        .join(", ");
    println!("  {line}");
}

fn handle_search(storage: &Storage, cmd: &SearchCommand) -> Result<()> {
    let students = storage.search(&cmd.to_query())?;
    print_students(&students, cmd.format)
}

fn handle_show(storage: &Storage, cmd: &ShowCommand) -> Result<()> {
    let student = match storage.require_by_student_number(&cmd.student_number) {
        Ok(student) => student,
        Err(e) if e.is_not_found() => {
            bail!("no student with number {}", cmd.student_number)
        }
        Err(e) => return Err(e.into()),
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&student)?);
        return Ok(());
    }

    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();
    println!("ID:             {}", student.id.unwrap_or_default());
    println!("Student number: {}", student.student_number);
    println!("Name:           {}", student.full_name);
    println!(
        "Birth date:     {}",
        student
            .birth_date
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
    );
    println!("Hometown:       {}", or_dash(student.hometown.as_deref()));
    println!("Blood type:     {}", or_dash(student.blood_type.as_deref()));
    println!(
        "Star sign:      {}",
        or_dash(student.effective_star_sign().as_deref())
    );
    println!(
        "Personality:    {}",
        or_dash(student.personality_code.as_deref())
    );
    println!("Cohort:         {}", student.cohort);
    println!(
        "Course:         {} ({})",
        course::display_name(&student.course),
        student.course
    );
    println!("Hobby:          {}", or_dash(student.hobby.as_deref()));
    println!("Circle:         {}", or_dash(student.circle.as_deref()));
    println!("Likes:          {}", or_dash(student.likes.as_deref()));
    println!("Dislikes:       {}", or_dash(student.dislikes.as_deref()));
    Ok(())
}

fn handle_delete(storage: &Storage, cmd: &DeleteCommand) -> Result<()> {
    if !cmd.yes {
        match storage.get(cmd.id)? {
            Some(student) => {
                println!(
                    "This will delete {} ({}).",
                    student.full_name, student.student_number
                );
                println!("Use --yes to confirm.");
            }
            None => println!("No student with id {}.", cmd.id),
        }
        return Ok(());
    }

    if storage.delete(cmd.id)? {
        println!("Deleted student {}.", cmd.id);
    } else {
        println!("No student with id {}.", cmd.id);
    }
    Ok(())
}

fn handle_status(storage: &Storage, json: bool) -> Result<()> {
    let stats = storage.stats()?;
    let last_updated = stats
        .last_updated
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string());

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "total_students": stats.total_students,
            "cohorts": stats.cohorts,
            "courses": stats.courses,
            "last_updated": last_updated,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("stustat status");
        println!("--------------");
        println!("Database:      {}", storage.path().display());
        println!("Students:      {}", stats.total_students);
        println!("Cohorts:       {}", stats.cohorts);
        println!("Courses:       {}", stats.courses);
        println!(
            "Last updated:  {}",
            last_updated.as_deref().unwrap_or("never")
        );
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn print_students(students: &[StudentRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(students)?),
        OutputFormat::Plain => {
            for s in students {
                println!("{}\t{}\t{}\t{}", s.student_number, s.full_name, s.cohort, s.course);
            }
        }
        OutputFormat::Table => {
            if students.is_empty() {
                println!("No students found.");
                return Ok(());
            }
            println!(
                "{:>6}  {:<12} {:<20} {:<6} {}",
                "ID", "NUMBER", "NAME", "COHORT", "COURSE"
            );
            for s in students {
                println!(
                    "{:>6}  {:<12} {:<20} {:<6} {}",
                    s.id.unwrap_or_default(),
                    s.student_number,
                    s.full_name,
                    s.cohort,
                    course::display_name(&s.course)
                );
            }
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Statistics]");
                println!(
                    "  Word cloud limit:   {}",
                    config.statistics.word_cloud_limit
                );
                println!(
                    "  Prefecture limit:   {}",
                    config.statistics.prefecture_limit
                );
                println!("  Cohorts:");
                for cohort in &config.statistics.cohorts {
                    println!("    {:<8} {}", cohort.label, cohort.total);
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
