//! Command-line interface for Cinedex.

mod commands;

use clap::{Parser, Subcommand};

/// Cinedex - movie and director catalog
#[derive(Parser)]
#[command(name = "cinedex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Insert sample users, directors and movies
    Seed,

    /// Create a user account
    CreateUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Give the account the admin role
        #[arg(long)]
        admin: bool,
    },

    /// Grant the admin role to an existing user
    Promote {
        /// Email of the account
        email: String,
    },

    /// List user accounts
    Users,

    /// List directors
    #[command(alias = "ls-directors")]
    Directors {
        /// Filter by name, birth year, creator or date
        #[arg(long, short)]
        query: Option<String>,
    },

    /// List movies
    #[command(alias = "ls-movies")]
    Movies {
        /// Filter by title, director or release year
        #[arg(long, short)]
        query: Option<String>,
    },
}

pub use commands::*;
