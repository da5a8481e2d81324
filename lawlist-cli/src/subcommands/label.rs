use clap::Args as ClapArgs;
use lawlist_core::CompiledPattern;

/// Render a pattern for one or more ordinals
#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Pattern containing a placeholder such as `1.`, `(a)` or `§ I`
    pub pattern: String,

    /// Ordinals to render
    #[arg(default_value = "1")]
    pub ordinals: Vec<u64>,

    /// Also print the equivalent `@counter-style`
    #[arg(long)]
    pub css: bool,

    /// Counter style name used with `--css`
    #[arg(long, default_value = "lawlist-preview")]
    pub name: String,
}

fn labels(pattern: &CompiledPattern, ordinals: &[u64]) -> Vec<String> {
    ordinals
        .iter()
        .map(|&ordinal| pattern.render(ordinal))
        .collect()
}

pub fn run(args: &Args) -> anyhow::Result<()> {
    let pattern = CompiledPattern::new(&args.pattern);
    tracing::debug!(system = %pattern.system(), "compiled pattern");
    for label in labels(&pattern, &args.ordinals) {
        println!("{label}");
    }
    if args.css {
        let style = pattern.counter_style(&args.name);
        println!("{style}");
        if let Some(fallback) = style.fallback_style() {
            println!("{fallback}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_labels() {
        let pattern = CompiledPattern::new("§ I. ");
        assert_eq!(
            labels(&pattern, &[1, 4, 9]),
            vec!["§ I. ", "§ IV. ", "§ IX. "]
        );
        assert_eq!(labels(&CompiledPattern::new("(aa) "), &[27]), vec!["(aaaa) "]);
    }
}
