use clap::{Parser, Subcommand};

/// atelier — command-line shell over the atelier host bridge.
#[derive(Parser, Debug)]
#[command(name = "atelier", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error, or a full
    /// tracing directive).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Host bridge endpoint override (ws:// or wss://).
    #[arg(long, global = true)]
    pub host_url: Option<String>,

    /// Skip host detection and use the canned stub transport.
    #[arg(long, global = true)]
    pub stub: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the host machine's system inventory.
    Info,

    /// Compile a source file on the host, streaming build logs.
    Build {
        /// Source file to compile.
        source: String,
        /// Output artifact path.
        #[arg(short, long, default_value = "a.out")]
        output: String,
        /// Extra compiler flag; repeatable.
        #[arg(long = "flag")]
        flags: Vec<String>,
    },

    /// Run a built artifact on the host, streaming its output.
    Run {
        /// Artifact to execute.
        path: String,
    },

    /// Workspace file operations, executed by the host.
    #[command(subcommand)]
    Fs(FsCommand),

    /// Container management through the host's Docker service.
    #[command(subcommand)]
    Docker(DockerCommand),

    /// Plugin listing and generation.
    #[command(subcommand)]
    Plugin(PluginCommand),

    /// Updater operations.
    #[command(subcommand)]
    Update(UpdateCommand),

    /// Install the host toolchain, streaming progress.
    Setup,
}

#[derive(Subcommand, Debug)]
pub enum FsCommand {
    /// List a directory on the host.
    Ls {
        #[arg(default_value = ".")]
        path: String,
    },
    /// Print a file's content.
    Cat { path: String },
    /// Write content to a file.
    Write { path: String, content: String },
    /// Create a directory.
    Mkdir { path: String },
    /// Delete a file.
    Rm { path: String },
}

#[derive(Subcommand, Debug)]
pub enum DockerCommand {
    /// List containers.
    Ps,
    /// Search the registry for images.
    Search { query: String },
    /// Print a container's logs.
    Logs {
        id: String,
        #[arg(long, default_value_t = 100)]
        lines: u32,
    },
    /// Start a container.
    Start { id: String },
    /// Stop a container.
    Stop { id: String },
    /// Restart a container.
    Restart { id: String },
    /// Remove a container.
    Rm {
        id: String,
        #[arg(long)]
        force: bool,
    },
    /// Pull an image.
    Pull {
        image: String,
        #[arg(long, default_value = "latest")]
        tag: String,
    },
    /// Check the Docker daemon's health.
    Health,
    /// Clean dangling images.
    Clean,
}

#[derive(Subcommand, Debug)]
pub enum PluginCommand {
    /// List installed plugins.
    Ls,
    /// Generate a plugin from a local code file.
    New {
        name: String,
        /// Local file whose content becomes the plugin code.
        code_file: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UpdateCommand {
    /// Check whether an update is available.
    Check,
    /// Download the available update, streaming progress.
    Download,
}

pub fn parse() -> Args {
    Args::parse()
}
