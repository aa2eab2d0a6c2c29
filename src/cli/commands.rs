//! CLI commands and argument parsing

use crate::engine::Window;
use crate::output::ExportFormat;
use crate::types::CollectionType;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// WordPress REST API scraper
#[derive(Parser, Debug)]
#[command(name = "wpjson-scraper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the WordPress installation
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Proxy URL for all requests
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Cookie header value ("name1=value1; name2=value2")
    #[arg(long, global = true)]
    pub cookies: Option<String>,

    /// Basic authentication credentials (user:password)
    #[arg(long, global = true)]
    pub credentials: Option<String>,

    /// Items requested per remote page
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// A single command, then exit
    #[command(flatten)]
    Action(Action),

    /// Start an interactive shell keeping the cache between commands
    Shell,
}

/// Commands available both from the command line and the shell
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Action {
    /// Show general information about the target
    Info {
        /// Fetch again even if already known
        #[arg(long)]
        no_cache: bool,
    },

    /// List a collection
    List {
        /// What to list
        what: What,

        /// Window to list
        #[command(flatten)]
        window: WindowArgs,

        /// Bypass the cache
        #[arg(long)]
        no_cache: bool,

        /// Also fetch comments and attach them to posts
        #[arg(long)]
        comments: bool,

        /// Export destination
        #[command(flatten)]
        export: ExportArgs,
    },

    /// List an arbitrary route under the API root
    Namespace {
        /// Route, e.g. wp/v2/block-types
        route: String,

        /// Window to list
        #[command(flatten)]
        window: WindowArgs,

        /// Bypass the cache
        #[arg(long)]
        no_cache: bool,

        /// Export destination
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Get one item by id
    Get {
        /// What to look up
        what: What,

        /// Item id
        id: u64,

        /// Always ask the remote API
        #[arg(long)]
        no_cache: bool,
    },

    /// Search collections for keywords
    Search {
        /// Keywords to search for
        keywords: String,

        /// Types to search (comma-separated, default = all)
        #[arg(long = "type", value_delimiter = ',')]
        types: Vec<What>,

        /// Window to list
        #[command(flatten)]
        window: WindowArgs,
    },
}

/// Built-in collection types as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum What {
    /// Every built-in type
    All,
    /// Blog posts
    Posts,
    /// Static pages
    Pages,
    /// Authors and other users
    Users,
    /// Post tags
    Tags,
    /// Post categories
    Categories,
    /// Comments on posts
    Comments,
    /// Uploaded media
    Media,
}

impl What {
    /// The one collection type named, `None` for `all`
    pub fn single(self) -> Option<CollectionType> {
        match self {
            Self::All => None,
            Self::Posts => Some(CollectionType::Posts),
            Self::Pages => Some(CollectionType::Pages),
            Self::Users => Some(CollectionType::Users),
            Self::Tags => Some(CollectionType::Tags),
            Self::Categories => Some(CollectionType::Categories),
            Self::Comments => Some(CollectionType::Comments),
            Self::Media => Some(CollectionType::Media),
        }
    }

    /// The collection types selected
    pub fn collections(self) -> Vec<CollectionType> {
        match self.single() {
            Some(collection) => vec![collection],
            None => CollectionType::builtin().to_vec(),
        }
    }
}

/// Session setting shown by `show`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ShowWhat {
    /// Every setting and the version
    #[default]
    All,
    /// Target site
    Target,
    /// Proxy URL
    Proxy,
    /// Cookie header
    Cookies,
    /// Basic credentials, password masked
    Credentials,
    /// Program version
    Version,
}

/// Window selection flags
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowArgs {
    /// Position of the first item (0-based)
    #[arg(long)]
    pub start: Option<usize>,

    /// Number of items
    #[arg(long)]
    pub limit: Option<usize>,
}

impl WindowArgs {
    /// The requested window
    pub fn window(&self) -> Window {
        Window::new(self.start, self.limit)
    }
}

/// Export flags
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ExportArgs {
    /// Write the listed items to a file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export format (default: from the file extension, else json)
    #[arg(long, requires = "export")]
    pub format: Option<ExportFormat>,
}

impl ExportArgs {
    /// The export path and resolved format, if an export was asked for
    pub fn destination(&self) -> Option<(&PathBuf, ExportFormat)> {
        let path = self.export.as_ref()?;
        let format = self
            .format
            .or_else(|| ExportFormat::from_path(path))
            .unwrap_or_default();
        Some((path, format))
    }
}

/// One line typed in the interactive shell
#[derive(Parser, Debug)]
#[command(name = "wpjson", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    /// The command on the line
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Shell commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum ShellCommand {
    /// A command shared with the command line
    #[command(flatten)]
    Action(Action),

    /// Change a session setting
    Set {
        /// Setting to change
        #[command(subcommand)]
        setting: Setting,
    },

    /// Show the session settings
    Show {
        /// Setting to show
        #[arg(value_enum, default_value_t = ShowWhat::All)]
        what: ShowWhat,
    },

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Session settings changeable from the shell
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Setting {
    /// Target site (discards the cache)
    Target {
        /// Site address
        url: String,
    },
    /// Proxy URL; omit to disable
    Proxy {
        /// Proxy address
        url: Option<String>,
    },
    /// Cookie header value; omit to clear
    Cookies {
        /// Cookies as "name1=value1; name2=value2"
        value: Option<String>,
    },
    /// Basic credentials (user:password); omit to clear
    Credentials {
        /// user:password
        value: Option<String>,
    },
}
