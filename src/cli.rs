//! Defines the command-line interface structure using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blog-planner", version, about = "Blog topic ideas and outlines from an LLM")]
pub struct Cli {
    /// Config file to use instead of ~/.blog-planner/config.toml
    #[arg(long, global = true, env = "BLOG_PLANNER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Brainstorm blog topic ideas for a theme
    Topics {
        /// The blog theme or topic area
        theme: String,
        /// Number of ideas to generate (1-10, defaults to the configured value)
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..=10))]
        count: Option<u64>,
        /// Print the topics as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Generate a structured outline for a blog topic
    Outline {
        /// The blog post topic to outline
        topic: String,
        /// Target audience (defaults to the configured audience)
        #[arg(long)]
        audience: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutlineFormat::Markdown)]
        format: OutlineFormat,
        /// Write the outline to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Serve the JSON HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        listen: SocketAddr,
    },
    /// Start an interactive planning session
    Interactive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutlineFormat {
    Json,
    Markdown,
}
