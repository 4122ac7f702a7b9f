use anyhow::Result;
use clap::{Parser, ValueEnum};
use fttb::{
    archive::Extractor,
    catalog::Catalog,
    cleanup,
    commands::{self, Config, Options},
    config::{AliasConfig, ConfigState},
    runtime::RealRuntime,
};
use std::path::PathBuf;

/// fttb - JetBrains toolbox for the command line
///
/// Installs JetBrains IDEs under a per-version directory and publishes a
/// desktop launcher and a `~/bin` shim for the one in use.
///
/// Examples:
///   fttb config               # Fetch the alias table (run this first)
///   fttb list                 # List the configured IDEs
///   fttb list goland          # List every GoLand release
///   fttb use pycharm          # Install the latest PyCharm and launch it from ~/bin
///   fttb remove clion 2023.3  # Delete one installed version
#[derive(Parser, Debug)]
#[command(author, version = env!("FTTB_VERSION"), about)]
struct Cli {
    /// What to do
    #[arg(value_enum)]
    action: Action,

    /// IDE alias or product code (search query for `search`)
    #[arg(default_value = "all")]
    ide: String,

    /// Version to act on
    #[arg(id = "version_token", value_name = "VERSION", default_value = "latest")]
    version: String,

    /// Unused
    cmd: Option<String>,

    /// Home directory every path is derived from (also via FTTB_HOME)
    #[arg(long, env = "FTTB_HOME", value_name = "PATH")]
    home: Option<PathBuf>,

    /// Directory holding the installed versions (also via FTTB_INSTALL_ROOT)
    #[arg(long = "install-root", env = "FTTB_INSTALL_ROOT", value_name = "PATH")]
    install_root: Option<PathBuf>,

    /// Catalog API URL (defaults to https://data.services.jetbrains.com)
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,

    /// Alias table URL
    #[arg(long = "config-url", env = "FTTB_CONFIG_URL", value_name = "URL", hide = true)]
    config_url: Option<String>,

    /// Desktop entry template URL
    #[arg(long = "template-url", env = "FTTB_TEMPLATE_URL", value_name = "URL", hide = true)]
    template_url: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    /// List configured IDEs, or the releases of one
    List,
    /// Search the catalog by name, code or description
    Search,
    /// Show one product
    Infos,
    /// Install a version
    Download,
    /// Install a version and make it the launched one
    Use,
    /// Create the directory layout and fetch the alias table
    Config,
    /// Empty the download cache
    Clear,
    /// Delete an installed version
    Remove,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            home: self.home.clone(),
            install_root: self.install_root.clone(),
            api_url: self.api_url.clone(),
            config_url: self.config_url.clone(),
            template_url: self.template_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::new(RealRuntime, cli.options())?;
    let _interrupt = cleanup::spawn_interrupt_handler(config.cleanup.clone());
    let (ide, version) = (cli.ide.as_str(), cli.version.as_str());

    match cli.action {
        Action::Config => commands::setup(&config).await,
        Action::List => commands::list(&config, &load_aliases(&config)?, ide).await,
        Action::Search => {
            load_aliases(&config)?;
            commands::search(&config, ide).await
        }
        Action::Infos => commands::infos(&config, &load_aliases(&config)?, ide).await,
        Action::Download => {
            commands::download(&config, &load_aliases(&config)?, ide, version).await?;
            Ok(())
        }
        Action::Use => commands::use_version(&config, &load_aliases(&config)?, ide, version).await,
        Action::Clear => {
            load_aliases(&config)?;
            commands::clear(&config)
        }
        Action::Remove => commands::remove(&config, &load_aliases(&config)?, ide, version).await,
    }
}

/// Every action but `config` needs the alias table.
fn load_aliases<C: Catalog, E: Extractor>(
    config: &Config<RealRuntime, C, E>,
) -> Result<AliasConfig> {
    let state = ConfigState::load(&config.runtime, &config.layout.config_file())?;
    Ok(state.require()?.clone())
}
