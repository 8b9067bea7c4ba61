mod args;
mod create;
mod restore_cmd;

use anyhow::Result;
use clap::Parser;

use args::{Cli, Command};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Create {
            buffer_size,
            infile,
            basefile,
            outfile,
        } => create::run(buffer_size, &infile, &basefile, &outfile),
        Command::Restore {
            buffer_size,
            difffile,
            outfile,
        } => restore_cmd::run(buffer_size, &difffile, &outfile),
        Command::Version => {
            println!("diffdd {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Help => {
            println!("{}", args::usage());
            Ok(())
        }
    }
}
