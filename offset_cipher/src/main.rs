mod cli;

use std::{error::Error, path::Path, process};

use clap::Parser;
use cli::{Cli, Commands, QueryArgs, TransformArgs};
use offset_cipher::{
    cipher::{decrypt_file, encrypt_file},
    config::Config,
    key_file::{write_key, write_key_file},
    query::derive_key,
    CipherError, Result,
};
use ord_multimap::KeySequence;
use tracing::info;

fn init_tracing(cli: &Cli) {
    //   --quiet   -> "off"
    //   --verbose -> RUST_LOG if set, otherwise "info"
    //   default   -> "warn"
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli) {
        exit_with_error(e);
    }
}

fn exit_with_error(err: CipherError) -> ! {
    eprintln!("error: {err}");
    let mut source = err.source();
    while let Some(e) = source {
        eprintln!("  caused by: {e}");
        source = e.source();
    }
    process::exit(1)
}

fn load_config(cli_config: Option<&Path>, args: QueryArgs, key_out: Option<&Path>) -> Result<Config> {
    let mut config = Config::load_or_default(cli_config)?;
    config.apply_overrides(args.query, args.low, args.high, key_out.map(Path::to_owned));
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Key { source, query, out } => {
            let config = load_config(config_path, query, out.as_deref())?;
            let key = derive_key(&source, &config.key_query()?)?;
            match &config.key_out {
                Some(path) => write_key_file(path, key.as_ref().map(|k| k.as_slice())),
                // without a file the report goes to stdout
                None => write_key(std::io::stdout().lock(), key.as_ref().map(|k| k.as_slice())),
            }
        }
        Commands::Encrypt(args) => transform(config_path, args, true),
        Commands::Decrypt(args) => transform(config_path, args, false),
    }
}

fn transform(config_path: Option<&Path>, args: TransformArgs, encrypt: bool) -> Result<()> {
    let TransformArgs {
        source,
        input,
        output,
        query,
        key_out,
    } = args;
    let config = load_config(config_path, query, key_out.as_deref())?;
    let key = derive_key(&source, &config.key_query()?)?;
    if let Some(path) = &config.key_out {
        write_key_file(path, key.as_ref().map(|k| k.as_slice()))?;
    }
    // an empty source has no key, which is rejected like an empty key
    let key = key.map(KeySequence::into_vec).unwrap_or_default();
    let bytes = if encrypt {
        encrypt_file(&input, &output, &key)?
    } else {
        decrypt_file(&input, &output, &key)?
    };
    info!(bytes, output = %output.display(), "done");
    Ok(())
}
