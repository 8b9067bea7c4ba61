use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "diffdd",
    version,
    about = "Create and restore differential binary images"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a diff of INFILE relative to BASEFILE, writing to OUTFILE.
    Create {
        #[arg(short = 'B', long = "buffer-size", value_name = "BUFFER_SIZE", default_value_t = common::DEFAULT_BUFFER_SIZE)]
        buffer_size: u32,

        #[arg(short = 'i', long = "in", value_name = "INFILE")]
        infile: PathBuf,

        #[arg(short = 'b', long = "base", value_name = "BASEFILE")]
        basefile: PathBuf,

        #[arg(short = 'o', long = "out", value_name = "OUTFILE")]
        outfile: PathBuf,
    },

    /// Apply DIFFFILE onto OUTFILE (opened read-write, not truncated).
    Restore {
        #[arg(short = 'B', long = "buffer-size", value_name = "BUFFER_SIZE", default_value_t = common::DEFAULT_BUFFER_SIZE)]
        buffer_size: u32,

        #[arg(short = 'd', long = "diff", value_name = "DIFFFILE")]
        difffile: PathBuf,

        #[arg(short = 'o', long = "out", value_name = "OUTFILE")]
        outfile: PathBuf,
    },

    /// Print the tool's name and version.
    Version,

    /// Print usage for all subcommands.
    Help,
}

/// The four-line usage synopsis, same shape for both the `help` subcommand
/// and the message printed on an unrecognized/missing subcommand.
pub fn usage() -> &'static str {
    "Usage: diffdd create [-B BUFFER_SIZE] -i INFILE -b BASEFILE -o OUTFILE\n\
        \x20  Or: diffdd restore [-B BUFFER_SIZE] -d DIFFFILE -o OUTFILE\n\
        \x20  Or: diffdd version\n\
        \x20  Or: diffdd help"
}
