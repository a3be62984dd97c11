//! Dispatcher configuration

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "loadtest-dispatcher")]
#[command(about = "Records proxied HTTP requests as load generator ammo", long_about = None)]
pub struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8888)]
    pub port: u16,

    /// Forward requests over HTTPS
    #[arg(long)]
    pub ssl: bool,

    /// Save requests without forwarding them
    #[arg(long)]
    pub noproxy: bool,

    /// Save every forwarded request regardless of the response status
    #[arg(long)]
    pub saveall: bool,

    /// Skip static files (css, js, images, fonts)
    #[arg(long)]
    pub nostatic: bool,

    /// Host to forward to instead of the one the client asked for
    #[arg(long)]
    pub target: Option<String>,

    /// Directory the payload files are appended to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

/// Runtime settings of the dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub ssl: bool,
    /// Forward requests upstream; when off, requests are only recorded
    pub proxy: bool,
    pub save_all: bool,
    pub skip_static: bool,
    pub target: Option<String>,
    pub output_dir: PathBuf,
}

impl DispatcherConfig {
    pub fn scheme(&self) -> &'static str {
        if self.ssl { "https" } else { "http" }
    }
}

impl From<Args> for DispatcherConfig {
    fn from(args: Args) -> Self {
        Self {
            ssl: args.ssl,
            proxy: !args.noproxy,
            save_all: args.saveall,
            skip_static: args.nostatic,
            target: args.target.filter(|t| !t.trim().is_empty()),
            output_dir: args.output_dir,
        }
    }
}
