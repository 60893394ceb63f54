use std::{env, env::VarError};

use clap::{Parser, Subcommand};
use storefront_engine::db_types::{Actor, ActorId, Role};

#[derive(Parser, Debug)]
#[command(name = "storefront_server", version, disable_help_subcommand = true)]
pub struct Arguments {
    /// What to do. Runs the server when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    pub fn command(self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the server
    Serve,
    /// Create the database if necessary, run the migrations and exit
    Migrate,
    /// Print a signed access token for an actor and exit
    Token {
        /// The role the token grants: buyer or seller
        #[arg(required = true, index = 1)]
        role: Role,
        /// The actor id carried in the token
        #[arg(required = true, index = 2, value_parser = parse_actor_id)]
        id: ActorId,
    },
    /// Print the help text and the current (non-secret) configuration
    Help,
}

impl Command {
    /// The actor to sign a token for, if this is a `token` command.
    pub fn token_actor(&self) -> Option<Actor> {
        match self {
            Command::Token { role, id } => Some(Actor::new(id.clone(), *role)),
            _ => None,
        }
    }
}

fn parse_actor_id(s: &str) -> Result<ActorId, String> {
    if s.trim().is_empty() {
        Err("The actor id cannot be empty".to_string())
    } else {
        Ok(ActorId::new(s))
    }
}

pub fn display_help() {
    display_readme();
    display_envs();
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 7] = [
        "RUST_LOG",
        "SF_HOST",
        "SF_PORT",
        "SF_DATABASE_URL",
        "SF_DB_MAX_CONNECTIONS",
        "SF_DB_TIMEOUT_SECS",
        "SF_TOKEN_LIFETIME_HRS",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
