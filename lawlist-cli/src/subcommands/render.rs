use std::{
    io::{self, Read, Write},
    ops::Range,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{ArgAction, Args as ClapArgs};
use lawlist_core::{LevelResolver, PatternTable, RenderPass};
use lawlist_markdown::Document;
use rayon::prelude::*;

use crate::settings::{self, Indent};

/// Print markdown with every list marker replaced by its custom label
#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Markdown files to render
    #[arg(conflicts_with = "stdin")]
    pub files: Vec<PathBuf>,

    /// Input from stdin
    #[arg(long, conflicts_with = "files")]
    pub stdin: bool,

    /// Settings file (JSON)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Cursor byte offset; items it touches keep their source marker
    #[arg(long, value_name = "OFFSET", action = ArgAction::Append)]
    pub cursor: Vec<usize>,

    /// Selected byte range; items it touches keep their source marker
    #[arg(long, value_name = "START..END", value_parser = settings::parse_range, action = ArgAction::Append)]
    pub selection: Vec<Range<usize>>,

    /// Only decorate items inside these byte ranges
    #[arg(long, value_name = "START..END", value_parser = settings::parse_range, action = ArgAction::Append)]
    pub visible: Vec<Range<usize>>,

    /// How item levels are measured
    #[arg(long, value_enum, default_value_t = Indent::Tree)]
    pub indent: Indent,

    /// Columns per level when measuring by text indentation
    #[arg(long, default_value_t = lawlist_core::level::DEFAULT_INDENT_WIDTH)]
    pub indent_width: usize,
}

impl Args {
    fn selections(&self) -> Vec<Range<usize>> {
        self.cursor
            .iter()
            .map(|&offset| offset..offset)
            .chain(self.selection.iter().cloned())
            .collect()
    }
}

/// Everything needed to render one source.
struct Renderer<'a> {
    table: PatternTable,
    resolver: LevelResolver,
    selections: Vec<Range<usize>>,
    visible: &'a [Range<usize>],
    indent: Indent,
}

impl<'a> Renderer<'a> {
    fn new(args: &'a Args) -> anyhow::Result<Self> {
        let settings = settings::load(args.settings.as_deref())?;
        let table = settings.pattern_table()?;
        let resolver = LevelResolver::builder()
            .mode(settings.level_mode)
            .indent_width(args.indent_width)
            .build();
        Ok(Self {
            table,
            resolver,
            selections: args.selections(),
            visible: args.visible.as_slice(),
            indent: args.indent,
        })
    }

    fn render(&self, source: &str) -> String {
        let document = Document::parse(source).with_indent_strategy(self.indent.into());
        let pass = RenderPass::new(&self.table, &self.resolver).selections(&self.selections);
        let decorations = document.decorate(&pass, self.visible);
        tracing::debug!(decorations = decorations.len(), "rendered document");
        lawlist_markdown::apply(source, &decorations)
    }
}

fn render_file(renderer: &Renderer<'_>, file: &Path) -> anyhow::Result<String> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    Ok(renderer.render(&source))
}

pub fn run(args: &Args) -> anyhow::Result<()> {
    if !args.stdin && args.files.is_empty() {
        anyhow::bail!("pass at least one file, or --stdin");
    }

    let renderer = Renderer::new(args)?;
    let mut stdout = io::stdout().lock();

    if args.stdin {
        let mut source = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut source)
            .context("reading stdin")?;
        stdout.write_all(renderer.render(&source).as_bytes())?;
        return Ok(());
    }

    // Render in parallel, print in argument order.
    let results: Vec<(&PathBuf, anyhow::Result<String>)> = args
        .files
        .par_iter()
        .map(|file| (file, render_file(&renderer, file)))
        .collect();

    let with_headers = args.files.len() > 1;
    let mut errors = Vec::new();
    for (file, result) in results {
        match result {
            Ok(output) => {
                if with_headers {
                    writeln!(stdout, "==> {} <==", file.display())?;
                }
                stdout.write_all(output.as_bytes())?;
            }
            Err(error) => errors.push((file, error)),
        }
    }
    stdout.flush()?;

    if !errors.is_empty() {
        eprintln!("\nFailed to render {} file(s):", errors.len());
        for (idx, (file, error)) in errors.iter().enumerate() {
            eprintln!("\n{}. File: {}", idx + 1, file.display());
            eprintln!("  × {error:#}");
        }
        anyhow::bail!("{} of {} file(s) failed", errors.len(), args.files.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        args: Args,
    }

    fn parse(argv: &[&str]) -> Args {
        Cli::parse_from(std::iter::once("render").chain(argv.iter().copied())).args
    }

    #[test]
    fn test_cursors_and_selections_merge() {
        let args = parse(&["--cursor", "4", "--selection", "10..12", "--stdin"]);
        assert_eq!(args.selections(), vec![4..4, 10..12]);
    }

    #[test]
    fn test_render_with_defaults() -> anyhow::Result<()> {
        let args = parse(&["--stdin"]);
        let renderer = Renderer::new(&args)?;
        assert_eq!(renderer.render("1. one\n2. two\n"), "1. one\n2. two\n");
        Ok(())
    }

    #[test]
    fn test_render_keeps_marker_under_cursor() -> anyhow::Result<()> {
        let args = parse(&["--stdin", "--cursor", "0"]);
        let renderer = Renderer::new(&args)?;
        let output = renderer.render("3. {(a) }three\n");
        assert_eq!(output, "3. {(a) }three\n");
        let args = parse(&["--stdin"]);
        let renderer = Renderer::new(&args)?;
        assert_eq!(renderer.render("3. {(a) }three\n"), "(c) three\n");
        Ok(())
    }
}
