use std::{fs::File, io, path::PathBuf};

use anyhow::Context;
use clap::Args as ClapArgs;
use lawlist_converters_css::{Stylesheet, StylesheetOptions};

use crate::settings;

/// Generate the read-mode stylesheet for a settings file
#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Settings file (JSON); defaults apply without one
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit the counter styles and rules as JSON
    #[arg(long)]
    pub json: bool,

    /// Selector every rule is scoped to, e.g. `.markdown-preview-view`
    #[arg(long)]
    pub scope: Option<String>,

    /// Prefix of the generated counter style names
    #[arg(long, default_value = "lawlist")]
    pub name_prefix: String,
}

impl Args {
    fn options(&self, settings: &lawlist_core::Settings) -> StylesheetOptions {
        let builder = StylesheetOptions::builder()
            .level_mode(settings.level_mode)
            .name_prefix(self.name_prefix.clone());
        match &self.scope {
            Some(scope) => builder.scope(scope.clone()),
            None => builder,
        }
        .build()
    }
}

pub fn run(args: &Args) -> anyhow::Result<()> {
    let settings = settings::load(args.settings.as_deref())?;
    let table = settings.pattern_table()?;
    let sheet = Stylesheet::from_table(&table, &args.options(&settings));

    if args.json {
        let json = sheet.to_json()?;
        match &args.output {
            Some(path) => std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("writing {}", path.display()))?,
            None => println!("{json}"),
        }
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            sheet.write_to(io::BufWriter::new(file))?;
            tracing::info!(path = %path.display(), "wrote stylesheet");
        }
        None => sheet.write_to(io::stdout().lock())?,
    }
    Ok(())
}
