use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use crossterm::style::Stylize;
use lawlist_core::{LevelResolver, ListItemRef, RenderPass, VisibleItem};
use lawlist_markdown::{Document, ItemView};

use crate::settings::{self, Indent};

/// Show how each list item of a markdown file is resolved
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Input markdown file
    pub file: PathBuf,

    /// Settings file (JSON)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// How item levels are measured
    #[arg(long, value_enum, default_value_t = Indent::Tree)]
    pub indent: Indent,

    /// Columns per level when measuring by text indentation
    #[arg(long, default_value_t = lawlist_core::level::DEFAULT_INDENT_WIDTH)]
    pub indent_width: usize,

    /// Print JSON instead of the annotated listing
    #[arg(long)]
    pub json: bool,

    /// Show byte ranges of markers and directives
    #[arg(long)]
    pub show_ranges: bool,
}

struct ItemPrinter<W: Write> {
    writer: W,
    show_ranges: bool,
}

impl<W: Write> ItemPrinter<W> {
    fn print_item(
        &mut self,
        view: &ItemView<'_>,
        item: &ListItemRef,
        label: Option<&str>,
    ) -> io::Result<()> {
        write!(self.writer, "{}", "  ".repeat(item.level))?;
        write!(
            self.writer,
            "{}",
            format!("{} L{} #{}", item.kind.tag(), item.level, item.ordinal)
                .cyan()
                .bold()
        )?;
        write!(self.writer, " {}", format!("{:?}", view.marker_text()).yellow())?;
        if let Some(directive) = &item.directive {
            write!(self.writer, " {}", directive.to_string().magenta())?;
        }
        match label {
            Some(label) => write!(self.writer, " -> {}", format!("{label:?}").green())?,
            None => write!(self.writer, " -> {}", "unchanged".dark_grey())?,
        }
        let mut location = format!(" @{}", view.item().line + 1);
        if self.show_ranges {
            location.push_str(&format!(
                " [{}..{}]",
                item.source_range.start, item.source_range.end
            ));
        }
        writeln!(self.writer, "{}", location.dark_grey())
    }

    fn print_error(&mut self, view: &ItemView<'_>, error: &lawlist_core::Error) -> io::Result<()> {
        writeln!(
            self.writer,
            "{} {}",
            format!("line {}:", view.item().line + 1).red().bold(),
            error.to_string().red()
        )
    }
}

pub fn run(args: &Args) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let settings = settings::load(args.settings.as_deref())?;
    let table = settings.pattern_table()?;
    let resolver = LevelResolver::builder()
        .mode(settings.level_mode)
        .indent_width(args.indent_width)
        .build();
    let pass = RenderPass::new(&table, &resolver);
    let document = Document::parse(&content).with_indent_strategy(args.indent.into());

    let stdout = io::stdout();
    if args.json {
        let entries: Vec<serde_json::Value> = document
            .items()
            .map(|view| match pass.item_ref(&view) {
                Ok(item) => {
                    let pattern = pass.effective_pattern(&item);
                    serde_json::json!({
                        "line": view.item().line + 1,
                        "marker": view.marker_text(),
                        "directive": item.directive.as_ref().map(ToString::to_string),
                        "pattern": pattern.as_ref().map(|p| p.source()),
                        "label": pattern.map(|p| p.render(item.ordinal)),
                        "item": item,
                    })
                }
                Err(error) => serde_json::json!({
                    "line": view.item().line + 1,
                    "marker": view.marker_text(),
                    "error": error.to_string(),
                }),
            })
            .collect();
        serde_json::to_writer_pretty(stdout.lock(), &entries)?;
        println!();
        return Ok(());
    }

    let mut printer = ItemPrinter {
        writer: stdout.lock(),
        show_ranges: args.show_ranges,
    };
    writeln!(printer.writer, "{}", args.file.display().to_string().blue().bold())?;
    for view in document.items() {
        match pass.item_ref(&view) {
            Ok(item) => {
                let label = pass
                    .effective_pattern(&item)
                    .map(|pattern| pattern.render(item.ordinal));
                printer.print_item(&view, &item, label.as_deref())?;
            }
            Err(error) => {
                tracing::warn!(%error, marker = ?view.marker(), "could not resolve list item");
                printer.print_error(&view, &error)?;
            }
        }
    }

    Ok(())
}
