//! CLI administration tool for the movie catalog.
//!
//! Provides commands for inspecting and curating the catalog and performing
//! database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List the best rated movies
//! cargo run --bin admin -- movie list --page 0 --limit 20
//!
//! # Show one movie
//! cargo run --bin admin -- movie show 42
//!
//! # Add a movie interactively
//! cargo run --bin admin -- movie add
//!
//! # Delete a movie
//! cargo run --bin admin -- movie delete 42
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//!
//! # Features
//!
//! - **Movie Management**: List, show, add, delete and count movies
//! - **Database Tools**: Connection checks and info queries
//! - **Interactive Prompts**: User-friendly CLI with confirmation dialogs
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use movie_catalog::domain::entities::{Movie, NewMovie};
use movie_catalog::domain::repositories::{
    MovieRepository, PageRequest, SortDirection, SortField,
};
use movie_catalog::infrastructure::persistence::PgMovieRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing the movie catalog.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage movies
    Movie {
        #[command(subcommand)]
        action: MovieAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Sort keys accepted by `movie list`.
#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Rating,
    Year,
    Title,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Rating => SortField::AverageRating,
            SortArg::Year => SortField::ReleaseYear,
            SortArg::Title => SortField::Title,
        }
    }
}

/// Movie management subcommands.
#[derive(Subcommand)]
enum MovieAction {
    /// List one page of movies
    List {
        /// Page number, starting at 0
        #[arg(short, long, default_value_t = 0)]
        page: i64,

        /// Movies per page
        #[arg(short, long, default_value_t = 10)]
        limit: i64,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Sort key
        #[arg(short, long, value_enum, default_value_t = SortArg::Rating)]
        sort: SortArg,
    },

    /// Show a single movie
    Show {
        /// Movie ID
        id: i32,
    },

    /// Add a movie
    Add {
        /// Title (prompted if omitted)
        #[arg(short, long)]
        title: Option<String>,

        /// Release year (prompted if omitted)
        #[arg(short = 'r', long)]
        year: Option<i32>,

        /// Description (prompted if omitted)
        #[arg(short, long)]
        description: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Delete a movie
    Delete {
        /// Movie ID
        id: i32,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Count movies
    Count,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Movie { action } => handle_movie_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches movie management commands.
async fn handle_movie_action(action: MovieAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgMovieRepository::new(Arc::new(pool.clone())));

    match action {
        MovieAction::List {
            page,
            limit,
            asc,
            sort,
        } => list_movies(repo, page, limit, asc, sort.into()).await?,
        MovieAction::Show { id } => show_movie(repo, id).await?,
        MovieAction::Add {
            title,
            year,
            description,
            yes,
        } => add_movie(repo, title, year, description, yes).await?,
        MovieAction::Delete { id, yes } => delete_movie(repo, id, yes).await?,
        MovieAction::Count => count_movies(repo).await?,
    }

    Ok(())
}

/// Lists one page of movies as a table.
///
/// # Output Format
///
/// ```text
/// 🎬 Movies (page 0, by rating, descending)
///
///   ID    Title                                    Year   Rating   Votes
///   ───────────────────────────────────────────────────────────────────────
///   12    Alien                                    1979   8.50     14
/// ```
async fn list_movies(
    repo: Arc<PgMovieRepository>,
    page: i64,
    limit: i64,
    asc: bool,
    sort: SortField,
) -> Result<()> {
    anyhow::ensure!(page >= 0, "--page must not be negative");
    anyhow::ensure!(limit >= 1, "--limit must be at least 1");

    let direction = if asc {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };

    println!(
        "{}",
        format!(
            "🎬 Movies (page {}, by {}, {})",
            page,
            sort_label(sort),
            if asc { "ascending" } else { "descending" }
        )
        .bright_blue()
        .bold()
    );
    println!();

    let movies = repo
        .list_page(PageRequest {
            page,
            limit,
            sort,
            direction,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list movies: {}", e))?;

    if movies.is_empty() {
        println!("{}", "  No movies on this page".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<40} {:<6} {:<8} {:<6}",
        "ID".bright_white().bold(),
        "Title".bright_white().bold(),
        "Year".bright_white().bold(),
        "Rating".bright_white().bold(),
        "Votes".bright_white().bold()
    );
    println!("  {}", "─".repeat(71).bright_black());

    for movie in &movies {
        println!(
            "  {:<5} {:<40} {:<6} {:<8} {}",
            movie.id.to_string().bright_black(),
            truncate(&movie.title, 40).cyan(),
            movie.release_year,
            format!("{:.2}", movie.average_rating).bright_yellow(),
            movie.scores.to_string().bright_black()
        );
    }

    println!();
    println!(
        "  Shown: {}",
        movies.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Prints every field of one movie.
async fn show_movie(repo: Arc<PgMovieRepository>, id: i32) -> Result<()> {
    let movie = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Movie not found")?;

    print_movie(&movie);

    Ok(())
}

/// Adds a movie with interactive prompts for missing fields.
///
/// # Flow
///
/// 1. Prompt for title, release year and description (or use provided)
/// 2. Validate the fields
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Store in database
async fn add_movie(
    repo: Arc<PgMovieRepository>,
    title: Option<String>,
    year: Option<i32>,
    description: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "➕ Add Movie".bright_blue().bold());
    println!();

    let title = match title {
        Some(t) => t,
        None => Input::new().with_prompt("Title").interact_text()?,
    };

    let release_year = match year {
        Some(y) => y,
        None => Input::new().with_prompt("Release year").interact_text()?,
    };

    let description = match description {
        Some(d) => d,
        None => Input::new()
            .with_prompt("Description")
            .allow_empty(true)
            .interact_text()?,
    };

    let new_movie = NewMovie {
        title,
        release_year,
        description,
    };
    new_movie
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid movie: {}", e))?;

    println!();
    println!("{}", "Movie details:".bright_white().bold());
    println!("  Title:       {}", new_movie.title.cyan());
    println!("  Year:        {}", new_movie.release_year);
    println!("  Description: {}", new_movie.description.bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Add this movie?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let movie = repo
        .create(new_movie)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to add movie: {}", e))?;

    println!();
    println!(
        "{} (ID {})",
        "✅ Movie added successfully!".green().bold(),
        movie.id.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Deletes a movie after confirmation (default: No).
async fn delete_movie(repo: Arc<PgMovieRepository>, id: i32, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Movie".bright_blue().bold());
    println!();

    let Some(movie) = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    else {
        println!("{}", "⚠️  No movie with this ID".yellow());
        return Ok(());
    };

    print_movie(&movie);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this movie?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete movie: {}", e))?;

    println!();
    println!("{}", "✅ Movie deleted".green().bold());
    println!();

    Ok(())
}

async fn count_movies(repo: Arc<PgMovieRepository>) -> Result<()> {
    let count = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count movies: {}", e))?;

    println!("  Movies: {}", count.to_string().bright_green().bold());

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
                    .fetch_one(pool)
                    .await
                    .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

fn print_movie(movie: &Movie) {
    println!("  ID:          {}", movie.id.to_string().bright_black());
    println!("  Title:       {}", movie.title.cyan().bold());
    println!("  Year:        {}", movie.release_year);
    println!(
        "  Rating:      {} ({} votes)",
        format!("{:.2}", movie.average_rating).bright_yellow(),
        movie.scores
    );
    if !movie.description.is_empty() {
        println!("  Description: {}", movie.description);
    }
    println!();
}

fn sort_label(sort: SortField) -> &'static str {
    match sort {
        SortField::AverageRating => "rating",
        SortField::ReleaseYear => "year",
        SortField::Title => "title",
    }
}

/// Shortens `s` to at most `max` characters, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}
