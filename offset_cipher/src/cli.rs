use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use offset_cipher::query::QueryKind;

#[derive(Parser)]
#[command(
    name = "offset-cipher",
    about = "Derive a key from the words of a text and encrypt or decrypt with it",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a RON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive the key from a source text and write its report
    Key {
        /// Text whose words make up the key
        #[arg(long)]
        source: PathBuf,

        #[command(flatten)]
        query: QueryArgs,

        /// Key report file (defaults to `key_out` of the config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Encrypt a file with the key derived from a source text
    Encrypt(TransformArgs),

    /// Decrypt a file with the key derived from a source text
    Decrypt(TransformArgs),
}

#[derive(Args)]
pub struct QueryArgs {
    /// Which values of the word map form the key
    #[arg(long, value_enum)]
    pub query: Option<QueryKind>,

    /// Exclusive lower bound word for `--query range`
    #[arg(long)]
    pub low: Option<String>,

    /// Exclusive upper bound word for `--query range`
    #[arg(long)]
    pub high: Option<String>,
}

#[derive(Args)]
pub struct TransformArgs {
    /// Text whose words make up the key
    #[arg(long)]
    pub source: PathBuf,

    /// File to read
    #[arg(long)]
    pub input: PathBuf,

    /// File to write
    #[arg(long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Also write the key report to this file
    #[arg(long)]
    pub key_out: Option<PathBuf>,
}
