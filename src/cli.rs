//! CLI - Command Line Interface for StreamVibe
//!
//! Every screen action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search the catalog
//! streamvibe search "the batman" --json
//!
//! # Inspect a title and its streaming sources
//! streamvibe info 550
//! streamvibe sources 550 --quality hd
//!
//! # Manage the watchlist (requires a session)
//! streamvibe login --email user@example.com --password password123
//! streamvibe list add 550
//! streamvibe list show
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::{MediaType, SourceQuality};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Missing or invalid session
    Unauthorized = 4,
    /// Requested record not found
    NotFound = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// StreamVibe - terminal front-end for the StreamVibe movie & TV catalog
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "streamvibe",
    version,
    about = "Terminal front-end for the StreamVibe movie & TV catalog",
    long_about = "Browse, search, and stream the StreamVibe catalog from your \
                  terminal.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  streamvibe                          Launch interactive TUI\n\
                  streamvibe search \"blade runner\"    Search the catalog\n\
                  streamvibe sources 550              List streaming sources\n\
                  streamvibe list add 550             Add to your watchlist"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get trending content
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Get popular content
    #[command(visible_alias = "p")]
    Popular(PopularCmd),

    /// Get details for a movie or show
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List streaming sources for a title
    #[command(visible_alias = "src")]
    Sources(SourcesCmd),

    /// Manage your watchlist
    #[command(visible_alias = "l")]
    List(ListCmd),

    /// Sign in with demo credentials
    Login(LoginCmd),

    /// Sign out and clear the stored session
    Logout(LogoutCmd),

    /// Show the current session
    Whoami(WhoamiCmd),
}

/// Media type filter
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeFilter {
    /// Movies only
    Movie,
    /// TV shows only
    Tv,
}

impl From<MediaTypeFilter> for MediaType {
    fn from(filter: MediaTypeFilter) -> MediaType {
        match filter {
            MediaTypeFilter::Movie => MediaType::Movie,
            MediaTypeFilter::Tv => MediaType::Tv,
        }
    }
}

/// Minimum source quality filter
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityFilter {
    /// 4K / UHD
    #[value(name = "4k", alias = "uhd")]
    Q4k,
    /// HD
    Hd,
    /// SD
    Sd,
}

impl From<QualityFilter> for SourceQuality {
    fn from(filter: QualityFilter) -> SourceQuality {
        match filter {
            QualityFilter::Q4k => SourceQuality::Uhd4k,
            QualityFilter::Hd => SourceQuality::Hd,
            QualityFilter::Sd => SourceQuality::Sd,
        }
    }
}

// =============================================================================
// Catalog Commands
// =============================================================================

/// Search for movies and TV shows by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Filter by media type (default: both)
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,
}

/// Get trending movies and TV shows
#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Filter by media type (default: both)
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,
}

/// Get popular movies and TV shows
#[derive(Args, Debug)]
pub struct PopularCmd {
    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Filter by media type (default: both)
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,

    /// Filter by genre id (see `streamvibe --help` for the genre table)
    #[arg(long, short = 'g')]
    pub genre: Option<u64>,
}

/// Get detailed information about a movie or TV show
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// Catalog item id
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the id
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeFilter,
}

/// List streaming sources for a title
#[derive(Args, Debug)]
pub struct SourcesCmd {
    /// Catalog item id
    #[arg(required = true)]
    pub id: u64,

    /// Filter by minimum quality
    #[arg(long, short = 'Q', value_enum)]
    pub quality: Option<QualityFilter>,
}

// =============================================================================
// Watchlist Commands
// =============================================================================

/// Manage your watchlist
#[derive(Args, Debug)]
pub struct ListCmd {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand, Debug)]
pub enum ListAction {
    /// Add a title to the watchlist
    Add {
        /// Catalog item id
        id: u64,

        /// Media type of the id
        #[arg(long, short = 't', value_enum, default_value = "movie")]
        media_type: MediaTypeFilter,
    },
    /// Remove a title from the watchlist
    Remove {
        /// Catalog item id
        id: u64,
    },
    /// Show the watchlist
    Show,
}

// =============================================================================
// Session Commands
// =============================================================================

/// Sign in with demo credentials
#[derive(Args, Debug)]
pub struct LoginCmd {
    /// Account email
    #[arg(long, short = 'e', required = true)]
    pub email: String,

    /// Account password
    #[arg(long, short = 'p', required = true)]
    pub password: String,
}

/// Sign out and clear the stored session
#[derive(Args, Debug)]
pub struct LogoutCmd {}

/// Show the current session
#[derive(Args, Debug)]
pub struct WhoamiCmd {}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Status OK response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl Default for StatusOk {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

/// Session info response (whoami/login)
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub expires_at: String,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // For non-JSON, caller should handle formatting
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from::<_, &str>(["streamvibe"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["streamvibe", "search", "batman"]);
        assert!(cli.is_cli_mode());
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.query, "batman");
            assert_eq!(cmd.limit, 20);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["streamvibe", "--json", "--quiet", "search", "test"]);
        assert!(cli.json);
        assert!(cli.quiet);
    }

    #[test]
    fn test_sources_with_quality() {
        let cli = Cli::parse_from(["streamvibe", "sources", "550", "-Q", "4k"]);
        if let Some(Command::Sources(cmd)) = cli.command {
            assert_eq!(cmd.id, 550);
            assert_eq!(cmd.quality, Some(QualityFilter::Q4k));
        } else {
            panic!("Expected Sources command");
        }
    }

    #[test]
    fn test_list_subcommands() {
        let cli = Cli::parse_from(["streamvibe", "list", "add", "550"]);
        if let Some(Command::List(cmd)) = cli.command {
            assert!(matches!(
                cmd.action,
                ListAction::Add {
                    id: 550,
                    media_type: MediaTypeFilter::Movie
                }
            ));
        } else {
            panic!("Expected List command");
        }

        let cli = Cli::parse_from(["streamvibe", "list", "remove", "550"]);
        if let Some(Command::List(cmd)) = cli.command {
            assert!(matches!(cmd.action, ListAction::Remove { id: 550 }));
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_login_command() {
        let cli = Cli::parse_from([
            "streamvibe",
            "login",
            "--email",
            "user@example.com",
            "--password",
            "password123",
        ]);
        if let Some(Command::Login(cmd)) = cli.command {
            assert_eq!(cmd.email, "user@example.com");
            assert_eq!(cmd.password, "password123");
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_quality_filter_conversion() {
        assert_eq!(SourceQuality::from(QualityFilter::Q4k), SourceQuality::Uhd4k);
        assert_eq!(SourceQuality::from(QualityFilter::Hd), SourceQuality::Hd);
        assert_eq!(SourceQuality::from(QualityFilter::Sd), SourceQuality::Sd);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::Unauthorized), 4);
        assert_eq!(i32::from(ExitCode::NotFound), 5);
    }
}
