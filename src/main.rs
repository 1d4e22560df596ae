use clap::{CommandFactory, Parser, Subcommand};
use env_logger::Env;
use git_diff_parser::{Parsed, format_listing, format_summary, parse_file, parse_reader};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-diff-parser", version)]
#[command(about = "Parse git diffs and format-patch files into files, hunks and numbered lines")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every hunk line with its previous and new line numbers
    Show {
        /// Diff or patch file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Print added and deleted line counts per file
    Summary {
        /// Diff or patch file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Man,
}

fn read(file: Option<PathBuf>) -> Result<Parsed, git_diff_parser::DiffParserError> {
    match file {
        Some(path) => parse_file(path),
        None => parse_reader(io::stdin().lock(), "stdin"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { file } => print!("{}", format_listing(&read(file)?)),
        Commands::Summary { file } => print!("{}", format_summary(&read(file)?)),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "git-diff-parser", &mut io::stdout())
        }
        Commands::Man => clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?,
    }

    Ok(())
}
