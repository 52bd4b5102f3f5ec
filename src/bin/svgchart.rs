use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use svgchart::markdown::{MarkdownOptions, convert};
use svgchart::{parse_definitions, render_markdown_chart};

#[derive(Parser, Debug)]
#[command(
    name = "svgchart",
    version,
    about = "Render plain-text chart definitions to SVG"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart definition file to SVG.
    Render(RenderArgs),
    /// Print the parsed chart definitions as JSON.
    Parse(ParseArgs),
    /// Convert a Markdown document to HTML, rendering chart fences inline.
    Markdown(MarkdownArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Chart definition file (`-` reads stdin).
    input: PathBuf,
    /// Output file; defaults to the input path with an `.svg` extension. `-` writes to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Chart definition file (`-` reads stdin).
    input: PathBuf,
}

#[derive(Args, Debug)]
struct MarkdownArgs {
    /// Markdown document (`-` reads stdin).
    input: PathBuf,
    /// Output file; defaults to the input path with an `.html` extension. `-` writes to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Fence language that marks a chart block.
    #[arg(long, default_value = svgchart::markdown::DEFAULT_LANGUAGE)]
    language: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Parse(args) => cmd_parse(args),
        Command::Markdown(args) => cmd_markdown(args),
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdio(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

/// Explicit output, else the input path with `ext`; stdin input defaults to stdout.
/// Never resolves to the input file itself.
fn output_path(input: &Path, output: Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    let out = match output {
        Some(p) => p,
        None if is_stdio(input) => PathBuf::from("-"),
        None => input.with_extension(ext),
    };
    if !is_stdio(&out) && same_file(input, &out) {
        anyhow::bail!(
            "output {} would overwrite the input; choose another path with -o",
            out.display()
        );
    }
    Ok(out)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if is_stdio(path) {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.write_all(b"\n")?;
        return Ok(());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let out = output_path(&args.input, args.output, "svg")?;
    let text = read_input(&args.input)?;
    let svg = render_markdown_chart(&text)?;
    write_output(&out, &svg)?;
    if !is_stdio(&out) {
        eprintln!("Wrote chart to {}", out.display());
    }
    Ok(())
}

fn cmd_parse(args: ParseArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let defs = parse_definitions(&text)?;
    println!("{}", serde_json::to_string_pretty(&defs)?);
    Ok(())
}

fn cmd_markdown(args: MarkdownArgs) -> Result<()> {
    let out = output_path(&args.input, args.output, "html")?;
    let text = read_input(&args.input)?;
    let options = MarkdownOptions {
        language: args.language,
    };
    let converted = convert(&text, &options);
    write_output(&out, &converted.html)?;
    eprintln!(
        "Rendered {} chart(s), {} failed",
        converted.charts, converted.failed
    );
    if !is_stdio(&out) {
        eprintln!("Wrote {} to {}", args.input.display(), out.display());
    }
    Ok(())
}
