//! CLI runner - executes commands

use crate::cli::commands::{
    Action, Cli, Commands, ExportArgs, Setting, ShellCommand, ShowWhat, What, WindowArgs,
};
use crate::cli::console;
use crate::cli::display;
use crate::cli::progress::BarProgress;
use crate::cli::shell;
use crate::config::{api_root, normalize_target, Credentials, ScraperConfig};
use crate::engine::{Engine, NoProgress, ProgressReporter};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::output::{export_items, References};
use crate::types::{CollectionType, Item};
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        if self.cli.no_color {
            console::disable_colors();
        }
        let config = self.load_config()?;
        let mut session = Session::new(config, !self.cli.no_progress);

        match &self.cli.command {
            Commands::Action(action) => session.execute(action).await,
            Commands::Shell => shell::run(&mut session).await,
        }
    }

    /// Load the config file, then apply command-line overrides
    fn load_config(&self) -> Result<ScraperConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ScraperConfig::from_file(path)?,
            None => ScraperConfig::default(),
        };

        if let Some(target) = &self.cli.target {
            config.target = Some(target.clone());
        }
        if let Some(proxy) = &self.cli.proxy {
            config.proxy = Some(proxy.clone());
        }
        if let Some(cookies) = &self.cli.cookies {
            config.cookies = Some(cookies.clone());
        }
        if let Some(credentials) = &self.cli.credentials {
            config.credentials = Some(Credentials::parse(credentials));
        }
        if let Some(page_size) = self.cli.page_size {
            config.page_size = page_size;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Settings plus the engine they configure, shared by every command of a run
pub struct Session {
    config: ScraperConfig,
    progress: bool,
    engine: Option<Engine>,
}

impl Session {
    /// Create a session. The engine is built on first use.
    pub fn new(config: ScraperConfig, progress: bool) -> Self {
        Self {
            config,
            progress,
            engine: None,
        }
    }

    /// Current settings
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// The engine, built from the settings if needed
    fn engine(&mut self) -> Result<&mut Engine> {
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => self.build_engine()?,
        };
        Ok(self.engine.insert(engine))
    }

    fn build_engine(&self) -> Result<Engine> {
        if self.config.target.is_none() {
            return Err(Error::config(
                "No target specified (use --target, a config file or `set target <url>`)",
            ));
        }
        let progress: Box<dyn ProgressReporter> = if self.progress {
            Box::new(BarProgress::new())
        } else {
            Box::new(NoProgress)
        };
        Ok(Engine::from_config(self.client()?, &self.config)?.with_progress(progress))
    }

    fn client(&self) -> Result<HttpClient> {
        HttpClient::with_config(HttpClientConfig::from_scraper_config(&self.config))
    }

    /// Execute a shell command. Returns `false` when the shell should stop.
    pub async fn handle(&mut self, command: ShellCommand) -> Result<bool> {
        match command {
            ShellCommand::Action(action) => self.execute(&action).await?,
            ShellCommand::Set { setting } => self.apply(setting)?,
            ShellCommand::Show { what } => print!("{}", self.describe(what)),
            ShellCommand::Exit => return Ok(false),
        }
        Ok(true)
    }

    /// Change one setting. A new target drops every cache; other settings
    /// only rebuild the HTTP client.
    pub fn apply(&mut self, setting: Setting) -> Result<()> {
        let mut updated = self.config.clone();
        match setting {
            Setting::Target { url } => {
                let target = normalize_target(&url)?;
                if let Some(engine) = &mut self.engine {
                    engine.set_target(api_root(&target, &updated.api_path));
                    console::info("Cache is erased but session settings are kept");
                }
                updated.target = Some(target);
                self.config = updated;
                return Ok(());
            }
            Setting::Proxy { url } => updated.proxy = url,
            Setting::Cookies { value } => updated.cookies = value,
            Setting::Credentials { value } => {
                updated.credentials = value.as_deref().map(Credentials::parse);
            }
        }

        let client = HttpClient::with_config(HttpClientConfig::from_scraper_config(&updated))?;
        if let Some(engine) = &mut self.engine {
            engine.set_transport(client);
        }
        self.config = updated;
        info!("Session settings updated");
        Ok(())
    }

    /// Session settings as printed by `show`
    pub fn describe(&self, what: ShowWhat) -> String {
        let unset = || "(none)".to_string();
        let config = &self.config;
        let shown = |item: ShowWhat| what == ShowWhat::All || what == item;
        let mut lines = Vec::new();

        if shown(ShowWhat::Target) {
            lines.push(format!(
                "target: {}",
                config.target.clone().unwrap_or_else(unset)
            ));
        }
        if what == ShowWhat::All {
            lines.push(format!("api path: {}", config.api_path));
            lines.push(format!("page size: {}", config.page_size));
        }
        if shown(ShowWhat::Proxy) {
            lines.push(format!("proxy: {}", config.proxy.clone().unwrap_or_else(unset)));
        }
        if shown(ShowWhat::Cookies) {
            lines.push(format!(
                "cookies: {}",
                config.cookies.clone().unwrap_or_else(unset)
            ));
        }
        if shown(ShowWhat::Credentials) {
            let credentials = config
                .credentials
                .as_ref()
                .map_or_else(unset, |c| format!("{}:****", c.username));
            lines.push(format!("credentials: {credentials}"));
        }
        if shown(ShowWhat::Version) {
            lines.push(format!("{} version: {}", crate::NAME, crate::VERSION));
        }

        lines.iter().map(|line| format!("{line}\n")).collect()
    }

    /// Execute one action and print its result
    pub async fn execute(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Info { no_cache } => {
                console::info("General information on the target");
                let info = self.engine()?.basic_info(*no_cache).await?;
                print!("{}", display::render_site_info(&info));
                if !info.has_v2() {
                    warn!("The target does not advertise the wp/v2 namespace");
                }
            }
            Action::List {
                what,
                window,
                no_cache,
                comments,
                export,
            } => match what.single() {
                Some(collection) => {
                    self.list_one(&collection, *window, *no_cache, *comments, export)
                        .await?;
                }
                None => {
                    if export.export.is_some() {
                        return Err(Error::config(
                            "Export needs a single collection type, not `all`",
                        ));
                    }
                    for collection in What::All.collections() {
                        match self
                            .list_one(&collection, *window, *no_cache, *comments, export)
                            .await
                        {
                            Ok(()) => {}
                            Err(e) if e.is_transport() => return Err(e),
                            Err(e) => console::error(&format!("{collection}: {e}")),
                        }
                    }
                }
            },
            Action::Namespace {
                route,
                window,
                no_cache,
                export,
            } => {
                let collection = CollectionType::namespace(route);
                let engine = self.engine()?;
                let items = engine.list(&collection, window.window(), *no_cache).await?;
                console::success(&format!("Got {} entries", items.len()));
                print!("{}", display::render_items(&collection, &items));
                export_listing(&collection, &items, export, &References::from_engine(engine))?;
            }
            Action::Get { what, id, no_cache } => {
                let collection = what
                    .single()
                    .ok_or_else(|| Error::config("`get` needs a single collection type"))?;
                let items = self
                    .engine()?
                    .get_by_id(&collection, *id, !*no_cache)
                    .await?;
                if items.is_empty() {
                    println!("No {collection} with id {id}");
                } else {
                    print!("{}", display::render_items(&collection, &items));
                }
            }
            Action::Search {
                keywords,
                types,
                window,
            } => {
                let mut types: Vec<CollectionType> =
                    types.iter().flat_map(|what| what.collections()).collect();
                types.sort();
                types.dedup();
                let results = self
                    .engine()?
                    .search(&types, keywords, window.window())
                    .await?;
                print!("{}", display::render_search(&results));
            }
        }
        Ok(())
    }

    /// List one built-in collection, print it and export it if asked
    async fn list_one(
        &mut self,
        collection: &CollectionType,
        window: WindowArgs,
        no_cache: bool,
        comments: bool,
        export: &ExportArgs,
    ) -> Result<()> {
        println!("{} list", capitalized(&collection.spec().label));
        let engine = self.engine()?;
        let items: Vec<Item> = if *collection == CollectionType::Posts {
            let posts = engine
                .get_posts(window.window(), no_cache, comments)
                .await?;
            console::success(&format!("Got {} entries", posts.len()));
            print!("{}", display::render_posts(&posts));
            if comments {
                print!("{}", display::render_orphans(engine.orphans()));
            }
            posts.into_iter().map(|linked| linked.post).collect()
        } else {
            let items = engine.list(collection, window.window(), no_cache).await?;
            console::success(&format!("Got {} entries", items.len()));
            print!("{}", display::render_items(collection, &items));
            items
        };
        export_listing(collection, &items, export, &References::from_engine(engine))
    }
}

fn export_listing(
    collection: &CollectionType,
    items: &[Item],
    export: &ExportArgs,
    refs: &References<'_>,
) -> Result<()> {
    if let Some((path, format)) = export.destination() {
        let rows = export_items(collection, items, format, path, refs)?;
        console::success(&format!(
            "Exported {rows} {collection} to {}",
            path.display()
        ));
    }
    Ok(())
}

fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
