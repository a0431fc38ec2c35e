use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pg_dump_splitter::{split_dump, SplitOptions};

#[derive(Parser)]
#[command(name = "pg-dump-splitter")]
#[command(author, version, about = "Split a pg_dump schema dump into per-object SQL files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a schema dump into one file per database object
    Split {
        /// Path to the schema dump (plain-text pg_dump output)
        #[arg(short, long)]
        dump: PathBuf,

        /// Output directory (defaults to a directory named after the dump file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            dump,
            output,
            verbose,
        } => {
            let options = SplitOptions {
                dump_path: dump,
                output_dir: output,
                verbose,
            };

            let summary = split_dump(options)?;

            let kinds = summary
                .objects_by_kind
                .iter()
                .map(|(kind, count)| format!("{} {}", count, plural(kind, *count)))
                .collect::<Vec<_>>()
                .join(", ");
            if kinds.is_empty() {
                println!("No objects recognized; see residual.sql");
            } else {
                println!("Split {}", kinds);
            }
            println!(
                "{} files written to {}",
                summary.files_written,
                summary.output_dir.display()
            );
        }
    }

    Ok(())
}

fn plural(kind: &pg_dump_splitter::ObjectKind, count: usize) -> String {
    if count == 1 {
        kind.to_string()
    } else {
        format!("{}s", kind)
    }
}
