//! gitlet CLI — command dispatch and rendering.
//!
//! The first argument names the command, arity is exact, and every
//! expected failure prints a fixed message to standard output with
//! exit status 0. Diagnostics go to standard error and only when
//! `GITLET_LOG` asks for them.

use std::env;

use gitlet_core::commit::Commit;
use gitlet_core::merge::MergeOutcome;
use gitlet_core::status::StatusReport;
use gitlet_core::{GitletResult, Repository};

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        println!("Please enter a command.");
        return;
    }

    let result = match args[0].as_str() {
        "init" => cmd_init(&args),
        "add" => cmd_add(&args),
        "commit" => cmd_commit(&args),
        "rm" => cmd_rm(&args),
        "log" => cmd_log(&args),
        "global-log" => cmd_global_log(&args),
        "find" => cmd_find(&args),
        "status" => cmd_status(&args),
        "restore" => cmd_restore(&args),
        "branch" => cmd_branch(&args),
        "switch" => cmd_switch(&args),
        "rm-branch" => cmd_rm_branch(&args),
        "reset" => cmd_reset(&args),
        "merge" => cmd_merge(&args),
        _ => {
            println!("No command with that name exists.");
            Ok(())
        }
    };

    // Expected failures are part of the interface: print and exit 0.
    if let Err(e) = result {
        println!("{e}");
    }
}

/// Route stderr-only diagnostics through `GITLET_LOG`; off by default.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env("GITLET_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Check exact operand count, printing the contract message otherwise.
fn operands_ok(args: &[String], expected: usize) -> bool {
    if args.len() != expected {
        println!("Incorrect operands.");
        return false;
    }
    true
}

fn open_here() -> GitletResult<Repository> {
    Repository::open(&env::current_dir()?)
}

fn cmd_init(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 1) {
        return Ok(());
    }
    Repository::init(&env::current_dir()?)?;
    Ok(())
}

fn cmd_add(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 2) {
        return Ok(());
    }
    open_here()?.add(&args[1])
}

fn cmd_commit(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 2) {
        return Ok(());
    }
    open_here()?.commit(&args[1])?;
    Ok(())
}

fn cmd_rm(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 2) {
        return Ok(());
    }
    open_here()?.remove(&args[1])
}

fn cmd_log(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 1) {
        return Ok(());
    }
    for commit in open_here()?.log()? {
        print_commit(&commit);
    }
    Ok(())
}

fn cmd_global_log(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 1) {
        return Ok(());
    }
    for commit in open_here()?.global_log()? {
        print_commit(&commit);
    }
    Ok(())
}

fn cmd_find(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 2) {
        return Ok(());
    }
    let ids = open_here()?.find(&args[1])?;
    if ids.is_empty() {
        println!("Found no commit with that message.");
    } else {
        for id in ids {
            println!("{id}");
        }
    }
    Ok(())
}

fn cmd_status(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 1) {
        return Ok(());
    }
    print_status(&open_here()?.status()?);
    Ok(())
}

/// `restore -- <path>` or `restore <commit> -- <path>`; the literal
/// `--` is required in both forms.
fn cmd_restore(args: &[String]) -> GitletResult<()> {
    if args.len() == 3 && args[1] == "--" {
        open_here()?.restore_from_head(&args[2])
    } else if args.len() == 4 && args[2] == "--" {
        open_here()?.restore_from_commit(&args[1], &args[3])
    } else {
        println!("Incorrect operands.");
        Ok(())
    }
}

fn cmd_branch(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 2) {
        return Ok(());
    }
    open_here()?.create_branch(&args[1])
}

fn cmd_switch(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 2) {
        return Ok(());
    }
    open_here()?.switch(&args[1])
}

fn cmd_rm_branch(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 2) {
        return Ok(());
    }
    open_here()?.remove_branch(&args[1])
}

fn cmd_reset(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 2) {
        return Ok(());
    }
    open_here()?.reset(&args[1])
}

fn cmd_merge(args: &[String]) -> GitletResult<()> {
    if !operands_ok(args, 2) {
        return Ok(());
    }
    match open_here()?.merge(&args[1])? {
        MergeOutcome::FastForwarded => {
            println!("Current branch fast-forwarded.");
        }
        MergeOutcome::AlreadyAncestor => {
            println!("Given branch is an ancestor of the current branch.");
        }
        MergeOutcome::Merged { conflicts, .. } => {
            for _path in &conflicts {
                println!("Encountered a merge conflict.");
            }
        }
    }
    Ok(())
}

/// Render one history entry for `log`/`global-log`.
fn print_commit(commit: &Commit) {
    println!("===");
    println!("commit {}", commit.id);
    if let (Some(first), Some(second)) = (&commit.parent, &commit.second_parent) {
        println!("Merge: {} {}", &first[..7], &second[..7]);
    }
    println!("Date: {}", commit.format_date());
    println!("{}", commit.message);
    println!();
}

/// Render the five `status` sections, each followed by a blank line.
fn print_status(report: &StatusReport) {
    println!("=== Branches ===");
    for branch in &report.branches {
        if *branch == report.current_branch {
            println!("*{branch}");
        } else {
            println!("{branch}");
        }
    }
    println!();

    println!("=== Staged Files ===");
    for path in &report.staged {
        println!("{path}");
    }
    println!();

    println!("=== Removed Files ===");
    for path in &report.removed {
        println!("{path}");
    }
    println!();

    println!("=== Modifications Not Staged For Commit ===");
    for entry in &report.modifications {
        println!("{entry}");
    }
    println!();

    println!("=== Untracked Files ===");
    for path in &report.untracked {
        println!("{path}");
    }
    println!();
}
