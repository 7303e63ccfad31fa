//! Clap derive structures for the `brilliant` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// brilliant -- license gate and catalog access for the Brilliant backend
#[derive(Debug, Parser)]
#[command(
    name = "brilliant",
    version,
    about = "Manage the Brilliant jewelry catalog from the command line",
    long_about = "Talks to the Brilliant backend's command bridge.\n\n\
        Catalog commands require a valid license: the license gate runs first,\n\
        reusing a recent verification when one is cached.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides config)
    #[arg(long, short = 'b', env = "BRILLIANT_BACKEND_URL", global = true)]
    pub backend: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "BRILLIANT_BACKEND_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Directory for the license verification cache (overrides config)
    #[arg(long, env = "BRILLIANT_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check, activate, renew or release the license
    #[command(alias = "lic")]
    License(LicenseArgs),

    /// Inspect or clear the cached license verification
    Cache(CacheArgs),

    /// Manage catalog sections
    #[command(alias = "sec")]
    Sections(SectionsArgs),

    /// Manage catalog items
    Items(ItemsArgs),

    /// View, change or remove item attributes
    Infos(InfosArgs),

    /// Catalog-wide queries
    #[command(alias = "cat")]
    Catalog(CatalogArgs),

    /// Show or change the user profile
    Settings(SettingsArgs),

    /// Check for and install application updates
    Update(UpdateArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LICENSE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LicenseArgs {
    #[command(subcommand)]
    pub command: LicenseCommand,
}

#[derive(Debug, Subcommand)]
pub enum LicenseCommand {
    /// Run the license gate and show the result
    Status,

    /// Activate a license key on this machine
    Activate {
        /// License key (prompted for when omitted)
        key: Option<String>,
    },

    /// Renew the current license
    Renew,

    /// Release the license from this machine
    Deactivate,

    /// Validate the current license against the backend
    Validate,

    /// Show details of the active license
    Info,

    /// Print this machine's code
    MachineCode,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CACHE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Show the stored verification record and whether it is still fresh
    Show,

    /// Delete the stored verification record
    Clear,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SECTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SectionsArgs {
    #[command(subcommand)]
    pub command: SectionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SectionsCommand {
    /// List sections
    #[command(alias = "ls")]
    List,

    /// Show one section
    Get {
        /// Section ID
        id: String,
    },

    /// Create a section (names are stored lowercase, max 50 characters)
    Create {
        /// Section name
        name: String,
    },

    /// Rename a section
    Rename {
        /// Section ID
        id: String,

        /// New name
        name: String,
    },

    /// Delete a section
    Delete {
        /// Section ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ITEMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ItemsArgs {
    #[command(subcommand)]
    pub command: ItemsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    /// List the items of a section
    #[command(alias = "ls")]
    List {
        /// Section name
        #[arg(long, short = 's')]
        section: String,
    },

    /// Show one item
    Get {
        /// Item ID
        id: String,
    },

    /// Create an item with its image and attributes
    Create {
        /// Item code
        #[arg(long)]
        code: String,

        /// Section name
        #[arg(long, short = 's')]
        section: String,

        /// Image file to upload
        #[arg(long)]
        image: PathBuf,

        /// Free-text description
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Attribute as NAME=VALUE (repeatable, at least one)
        #[arg(long = "info", short = 'i', value_parser = parse_info, required = true)]
        infos: Vec<(String, String)>,
    },

    /// Edit an item; omitted fields keep their stored values
    Update {
        /// Item ID
        id: String,

        /// New item code
        #[arg(long)]
        code: Option<String>,

        /// New section name
        #[arg(long, short = 's')]
        section: Option<String>,

        /// Replacement image file
        #[arg(long)]
        image: Option<PathBuf>,

        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Add an attribute as NAME=VALUE (repeatable)
        #[arg(long = "info", short = 'i', value_parser = parse_info)]
        infos: Vec<(String, String)>,

        /// Change a stored attribute as ID:NAME=VALUE (repeatable)
        #[arg(long = "set-info", value_parser = parse_info_edit)]
        edits: Vec<(String, String, String)>,

        /// Remove a stored attribute by ID (repeatable)
        #[arg(long = "remove-info")]
        removed: Vec<String>,
    },

    /// Delete an item
    Delete {
        /// Item ID
        id: String,
    },
}

/// Parse a `NAME=VALUE` attribute.
fn parse_info(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    Ok((name.trim().to_owned(), value.trim().to_owned()))
}

/// Parse an `ID:NAME=VALUE` attribute edit.
fn parse_info_edit(s: &str) -> Result<(String, String, String), String> {
    let (id, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ID:NAME=VALUE, got '{s}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing attribute ID in '{s}'"));
    }
    let (name, value) = parse_info(rest)?;
    Ok((id.to_owned(), name, value))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INFOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InfosArgs {
    #[command(subcommand)]
    pub command: InfosCommand,
}

#[derive(Debug, Subcommand)]
pub enum InfosCommand {
    /// List the attributes of an item
    #[command(alias = "ls")]
    List {
        /// Item code
        code: String,
    },

    /// Change one attribute
    Update {
        /// Attribute ID
        id: String,

        /// Code of the item it belongs to
        #[arg(long)]
        item: String,

        /// Attribute as NAME=VALUE
        #[arg(value_parser = parse_info)]
        info: (String, String),
    },

    /// Delete one attribute
    Delete {
        /// Attribute ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATALOG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Report whether any sections and items exist
    Summary,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SETTINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the stored profile
    Show,

    /// Change profile fields; omitted fields keep their stored values
    Set {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Contact email
        #[arg(long)]
        email: Option<String>,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        /// Instagram username
        #[arg(long)]
        instagram: Option<String>,

        /// Website URL
        #[arg(long)]
        website: Option<String>,

        /// YouTube channel
        #[arg(long)]
        youtube: Option<String>,

        /// Color palette name
        #[arg(long)]
        palette: Option<String>,

        /// Directory exported catalogs are written to
        #[arg(long)]
        save_path: Option<String>,
    },

    /// Manage the profile image
    Image(ImageArgs),
}

#[derive(Debug, Args)]
pub struct ImageArgs {
    #[command(subcommand)]
    pub command: ImageCommand,
}

#[derive(Debug, Subcommand)]
pub enum ImageCommand {
    /// Upload a profile image (at most 5 MiB)
    Set {
        /// Image file
        path: PathBuf,
    },

    /// Write the profile image to a file
    Get {
        /// Destination file
        path: PathBuf,
    },

    /// Remove the profile image
    Remove,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  UPDATE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(subcommand)]
    pub command: UpdateCommand,
}

#[derive(Debug, Subcommand)]
pub enum UpdateCommand {
    /// Ask the backend whether a newer version is available
    Check,

    /// Download and install the available update
    Install,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
