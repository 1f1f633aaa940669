//! `rotime` - CLI for rightontime
//!
//! This binary derives identities, reports dashboard statistics and replays
//! scripted attendance days against the engine.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use rightontime::cli::{Cli, Command, ConfigCommand, DeriveCommand, ReplayCommand, StatsCommand};
use rightontime::identity::{normalize_key, IdentityDeriver};
use rightontime::metrics::{compute_stats, format_date, format_duration, format_time};
use rightontime::script::Script;
use rightontime::seed;
use rightontime::store::HISTORY_LIMIT;
use rightontime::{init_logging, AttendanceEngine, AttendanceRecord, Config, DashboardStats};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Derive(cmd) => handle_derive(&config, &cmd),
        Command::Stats(cmd) => handle_stats(&config, &cmd),
        Command::Replay(cmd) => handle_replay(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_derive(config: &Config, cmd: &DeriveCommand) -> anyhow::Result<()> {
    let deriver = IdentityDeriver::with_config(config.identity.clone());
    let key = normalize_key(&cmd.credential);
    let profile = deriver.derive_profile(&cmd.credential);

    if cmd.json {
        let output = serde_json::json!({
            "key": key,
            "id": profile.id,
            "name": profile.name,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Key:   {}", key.as_str());
        println!("Id:    {}", profile.id);
        println!("Name:  {}", profile.name);
    }
    Ok(())
}

fn handle_stats(config: &Config, cmd: &StatsCommand) -> anyhow::Result<()> {
    let mut engine = AttendanceEngine::from_config(config)?;
    if let Some(path) = &cmd.records {
        engine.import_records(seed::load_records(path)?);
    }

    let records: Vec<AttendanceRecord> = match &cmd.employee {
        Some(id) => engine.store().for_employee(id).cloned().collect(),
        None => engine.records().to_vec(),
    };
    let stats = compute_stats(&records);

    if cmd.json {
        let output = serde_json::json!({
            "records": records.len(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match &cmd.employee {
            Some(id) => {
                let history: Vec<AttendanceRecord> = engine
                    .store()
                    .history(id, HISTORY_LIMIT)
                    .into_iter()
                    .cloned()
                    .collect();
                print_records(&history);
            }
            None => print_records(&records),
        }
        println!();
        print_stats(&stats);
    }
    Ok(())
}

async fn handle_replay(config: &Config, cmd: &ReplayCommand) -> anyhow::Result<()> {
    let script = Script::load(&cmd.script)?;
    let mut engine = AttendanceEngine::from_config(config)?;
    script
        .replay(&mut engine)
        .await
        .with_context(|| format!("replay of {} stopped", cmd.script.display()))?;

    if cmd.json {
        let output = serde_json::json!({
            "session": engine.session(),
            "flash_message": engine.flash_message(),
            "records": engine.records(),
            "stats": engine.stats(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let session = engine
            .session()
            .role()
            .map_or_else(|| "logged out".to_string(), |role| role.to_string());
        println!("Session:  {session}");
        if let Some(profile) = engine.session().employee() {
            println!("Employee: {} ({})", profile.name, profile.id);
        }
        if let Some(message) = engine.flash_message() {
            println!("Notice:   {message}");
        }
        println!();
        print_records(engine.records());
        println!();
        print_stats(&engine.stats());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Identity]");
                println!("  Id prefix:          {}", config.identity.id_prefix);
                println!("  Title placeholder:  {}", config.identity.title_placeholder);
                println!("  Name placeholder:   {}", config.identity.name_placeholder);
                println!();
                println!("[Records]");
                println!("  Seed:               {}", config.records.seed);
                match &config.records.path {
                    Some(path) => println!("  Path:               {}", path.display()),
                    None => println!("  Path:               (none)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_records(records: &[AttendanceRecord]) {
    if records.is_empty() {
        println!("No records.");
        return;
    }
    println!(
        "{:<12} {:<12} {:<24} {:>6} {:>6} {:>8}",
        "Date", "Id", "Name", "In", "Out", "Worked"
    );
    for record in records {
        println!(
            "{:<12} {:<12} {:<24} {:>6} {:>6} {:>8}",
            format_date(&record.check_in),
            record.employee_id,
            record.name,
            format_time(Some(&record.check_in)),
            format_time(record.check_out.as_ref()),
            format_duration(record.worked_minutes()),
        );
    }
}

fn print_stats(stats: &DashboardStats) {
    println!("Average entry:       {}", stats.average_entry);
    println!("Average exit:        {}", stats.average_exit);
    println!("Average worked:      {}", stats.average_worked);
    println!("Pending check-outs:  {}", stats.pending_check_outs);
}
