use clap::{Parser, Subcommand};
use diff_select::DiffSelect;

#[derive(Parser)]
#[command(name = "diff-select")]
#[command(about = "Line-level selection and staging of unified diff changes")]
struct Cli {
    /// Repository path
    #[arg(short, long, default_value = ".")]
    repo: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a file's selectable diff lines with their toggle ordinals
    Show {
        /// File to inspect
        file: String,
    },
    /// Stage selected lines by ordinal list (e.g., "0,2..5")
    Stage {
        /// File to stage from
        file: String,
        /// Ordinals printed by `show` (e.g., "0" or "1..3,6")
        lines: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let select = DiffSelect::new(&cli.repo);

    match cli.command {
        Commands::Show { file } => print!("{}", select.show(&file)?),
        Commands::Stage { file, lines } => select.stage(&file, &lines)?,
    }

    Ok(())
}
