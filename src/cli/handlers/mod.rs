mod board;
mod config;
mod contact;
mod session;
mod task;

use crate::cli::commands::*;
use crate::cli::context::Context;
use crate::model::board::Board;
use crate::ops::contact_ops;
use crate::ops::store::OpError;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let ctx = Context::load(&cli)?;

    match cli.command {
        None => Err("no command given (run `kb` without arguments for the board UI)".into()),
        Some(cmd) => match cmd {
            // Session (no login needed, except to log out)
            Commands::Signup(args) => session::cmd_signup(&ctx, args),
            Commands::Login(args) => session::cmd_login(&ctx, args),
            Commands::Logout => session::cmd_logout(&ctx),
            Commands::Whoami => session::cmd_whoami(&ctx),

            // Read commands
            Commands::Board(args) => board::cmd_board(&ctx, args),
            Commands::Summary(args) => board::cmd_summary(&ctx, args),

            // Write commands
            Commands::Task(cmd) => task::cmd_task(&ctx, cmd.action),
            Commands::Subtask(cmd) => task::cmd_subtask(&ctx, cmd.action),
            Commands::Contact(cmd) => contact::cmd_contact(&ctx, cmd.action),

            // Config
            Commands::Config(cmd) => config::cmd_config(&ctx, cmd.action),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

/// Resolve contact names, emails or keys to storage keys, failing on any
/// that match nobody.
fn resolve_contacts(board: &Board, needles: &[String]) -> Result<Vec<String>, OpError> {
    let mut keys: Vec<String> = Vec::new();
    let mut unknown = Vec::new();
    for needle in needles {
        match contact_ops::resolve_contact(board, needle) {
            Some(user) if !keys.contains(&user.id) => keys.push(user.id.clone()),
            Some(_) => {}
            None => unknown.push(needle.as_str()),
        }
    }
    if unknown.is_empty() {
        Ok(keys)
    } else {
        Err(OpError::UnknownContacts(unknown.join(", ")))
    }
}

fn resolve_contact_key(board: &Board, needle: &str) -> Result<String, OpError> {
    contact_ops::resolve_contact(board, needle)
        .map(|u| u.id.clone())
        .ok_or_else(|| OpError::ContactNotFound(needle.to_string()))
}
