pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::database::{DatabaseManager, PgStore, SharedStore};

#[derive(Parser)]
#[command(name = "lms")]
#[command(about = "LMS CLI - operator tasks against the course database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply embedded database migrations")]
    Migrate,

    #[command(about = "Insert catalog and curriculum sample data")]
    Seed {
        #[command(subcommand)]
        cmd: commands::seed::SeedCommands,
    },

    #[command(about = "Inspect accounts and change roles")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Seed { cmd } => commands::seed::handle(cmd, output_format).await,
        Commands::Users { cmd } => commands::users::handle(cmd, output_format).await,
    }
}

/// PostgreSQL-backed store from DATABASE_URL; the CLI never uses the memory backend
pub(crate) async fn connect_store() -> anyhow::Result<SharedStore> {
    let pool = DatabaseManager::connect(&config::config().database).await?;
    Ok(Arc::new(PgStore::new(pool)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_promote_with_role() {
        let cli = Cli::try_parse_from(["lms", "--json", "users", "promote", "ana@x.com", "--role", "admin"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::Users {
                cmd: commands::users::UserCommands::Promote { email, role },
            } => {
                assert_eq!(email, "ana@x.com");
                assert_eq!(role, crate::types::Role::Admin);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn seed_curriculum_defaults() {
        let cli = Cli::try_parse_from(["lms", "seed", "curriculum"]).unwrap();
        match cli.command {
            Commands::Seed {
                cmd: commands::seed::SeedCommands::Curriculum { modules, lessons },
            } => {
                assert_eq!((modules, lessons), (3, 4));
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
