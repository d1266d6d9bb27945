mod ansi;
mod compose;
mod fonts;
mod layout;
mod pipeline;
mod skia;
mod surface;

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::pipeline::{run, RenderArgs};

#[derive(Debug, Parser)]
#[command(name = "termshot")]
#[command(about = "Render piped terminal output (with ANSI colors) to a styled PNG")]
struct Cli {
    /// Output PNG path
    output: PathBuf,

    /// Prepend a "$ <COMMAND>" prompt line to the captured text
    #[arg(long)]
    command: Option<String>,

    /// Monospace font file (default: probe common system locations)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold font file (default: the regular face)
    #[arg(long)]
    bold_font: Option<PathBuf>,

    /// Font size in pixels
    #[arg(long, default_value_t = 20.0)]
    font_size: f32,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = error.print();
            std::process::exit(code);
        }
    };

    let args = RenderArgs {
        output: cli.output,
        command: cli.command,
        font: cli.font,
        bold_font: cli.bold_font,
        font_size: cli.font_size,
    };

    if let Err(error) = run(&args) {
        eprintln!("termshot: {error:#}");
        std::process::exit(1);
    }
}
