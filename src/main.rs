// Only compile the UI module when the TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use std::env;
use std::path::PathBuf;

use kitakitar::{
    login, logout, rank_centers, register, request_password_reset, restore_session, BatchItem,
    MaterialKind, RedemptionPayload, Registration, Session, SqliteStore, UserRepository,
    ALL_MATERIALS,
};

fn store_path() -> PathBuf {
    env::var("KITAKITAR_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("kitakitar.db"))
}

fn open_repo() -> Result<UserRepository<SqliteStore>> {
    Ok(UserRepository::new(SqliteStore::open(&store_path())?))
}

fn require_session(repo: &UserRepository<SqliteStore>) -> Result<Session> {
    restore_session(repo)?.ok_or_else(|| anyhow!("not logged in. Run: kitakitar login <email> <password>"))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("register") => run_register(&args[2..]),
        Some("login") => run_login(&args[2..]),
        Some("logout") => run_logout(),
        Some("submit") => run_submit(&args[2..]),
        Some("history") => run_history(),
        Some("leaderboard") => run_leaderboard(),
        Some("reset-password") => run_reset(&args[2..]),
        Some("rates") => run_rates(),
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
        None => run_ui_mode(),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  kitakitar register <center-name> <address> <email> <password>");
    eprintln!("  kitakitar login <email> <password>");
    eprintln!("  kitakitar logout");
    eprintln!("  kitakitar submit <material>:<kg> [...]");
    eprintln!("  kitakitar history");
    eprintln!("  kitakitar leaderboard");
    eprintln!("  kitakitar reset-password <email>");
    eprintln!("  kitakitar rates");
    eprintln!("  kitakitar              (interactive UI)");
}

fn run_register(args: &[String]) -> Result<()> {
    let [center_name, address, email, password] = args else {
        bail!("usage: kitakitar register <center-name> <address> <email> <password>");
    };

    let mut repo = open_repo()?;
    let session = register(
        &mut repo,
        Registration {
            center_name: center_name.clone(),
            address: address.clone(),
            email: email.clone(),
            password: password.clone(),
        },
        Utc::now(),
    )?;

    println!("✅ Registered and logged in: {}", session.user.center_name);
    Ok(())
}

fn run_login(args: &[String]) -> Result<()> {
    let [email, password] = args else {
        bail!("usage: kitakitar login <email> <password>");
    };

    let mut repo = open_repo()?;
    let session = login(&mut repo, email, password)?;
    println!("✅ Logged in: {}", session.user.center_name);
    Ok(())
}

fn run_logout() -> Result<()> {
    let mut repo = open_repo()?;
    logout(&mut repo)?;
    println!("✅ Logged out");
    Ok(())
}

/// Parse a `material:weight` CLI argument, e.g. `plastic:10.5`.
fn parse_batch_arg(arg: &str) -> Result<BatchItem> {
    let (material, weight) = arg
        .split_once(':')
        .ok_or_else(|| anyhow!("expected <material>:<kg>, got '{}'", arg))?;

    let material: MaterialKind = material.parse()?;
    let weight: f64 = weight
        .parse()
        .map_err(|_| anyhow!("bad weight in '{}'", arg))?;

    Ok(BatchItem::new(material, weight))
}

fn run_submit(args: &[String]) -> Result<()> {
    if args.is_empty() {
        bail!("usage: kitakitar submit <material>:<kg> [...]");
    }

    let batch = args
        .iter()
        .map(|arg| parse_batch_arg(arg))
        .collect::<Result<Vec<_>>>()?;

    let mut repo = open_repo()?;
    let mut session = require_session(&repo)?;

    match session.submit_batch(&mut repo, &batch, Utc::now())? {
        Some(tx) => {
            println!("♻️  Recorded: {}", tx.summary);
            println!("   Weight: {:.1} kg", tx.total_weight);
            println!("   Points: +{:.2}", tx.points);
            let payload = RedemptionPayload::new(&session.user.center_name, &tx);
            println!("   QR payload: {}", payload.to_json()?);
        }
        None => println!("Nothing to record (all weights were zero or negative)."),
    }

    Ok(())
}

fn run_history() -> Result<()> {
    let repo = open_repo()?;
    let session = require_session(&repo)?;

    if session.history().is_empty() {
        println!("No transactions yet. Start recycling!");
        return Ok(());
    }

    println!("📋 History for {}:", session.user.center_name);
    for tx in session.history() {
        println!(
            "  {}  {:<50}  {:>7.1} kg  +{:.2}",
            tx.recorded_at.format("%Y-%m-%d %H:%M"),
            tx.summary,
            tx.total_weight,
            tx.points
        );
    }

    let (weight, points) = session.history_totals();
    println!("  Total: {:.1} kg, +{:.2} points", weight, points);
    Ok(())
}

fn run_leaderboard() -> Result<()> {
    let repo = open_repo()?;
    let users = repo.load_users()?;
    let current_email = restore_session(&repo)?.map(|s| s.user.email);

    let board = rank_centers(&users, current_email.as_deref());
    if board.is_empty() {
        println!("No centers registered yet.");
        return Ok(());
    }

    println!("🏆 Leaderboard:");
    for entry in board {
        let marker = if entry.is_you { " (You)" } else { "" };
        println!(
            "  #{:<3} {:<30} {:>10.2} pts{}",
            entry.rank, entry.center_name, entry.points, marker
        );
    }
    Ok(())
}

fn run_reset(args: &[String]) -> Result<()> {
    let [email] = args else {
        bail!("usage: kitakitar reset-password <email>");
    };

    let repo = open_repo()?;
    let request = request_password_reset(&repo, email)?;
    println!("{}", request.message());
    Ok(())
}

fn run_rates() -> Result<()> {
    println!("♻️  Reward rates (points per kg):");
    for material in ALL_MATERIALS {
        println!("  {:<26} {:.2}", material.label(), material.rate());
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    let repo = open_repo()?;
    let session = require_session(&repo)?;
    let users = repo.load_users()?;
    let board = rank_centers(&users, Some(&session.user.email));

    let mut app = ui::App::new(session, board);
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    print_usage();
    Ok(())
}
