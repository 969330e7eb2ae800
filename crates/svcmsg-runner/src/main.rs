use clap::Parser;
use std::io;
use svcmsg_reporter::WriterSink;
use svcmsg_runner::{execute_decode, execute_encode, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Encode(command) => {
            let mut sink = WriterSink::new(io::stdout().lock());
            execute_encode(command, &mut sink).map(|_| None)
        }
        Commands::Decode(command) => execute_decode(command).map(Some),
    };

    match result {
        Ok(Some(output)) => {
            println!("{output}");
        }
        Ok(None) => {}
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
