use lawlist_core::Decoration;

/// Splice `decorations` into `source`, producing the edit-mode preview.
///
/// Decorations are applied in order of their start. One that reaches past the
/// source, splits a character, or overlaps an earlier one is skipped.
#[tracing::instrument(skip_all, fields(decorations = decorations.len()))]
#[must_use]
pub fn apply(source: &str, decorations: &[Decoration]) -> String {
    let mut sorted: Vec<&Decoration> = decorations.iter().collect();
    sorted.sort_by_key(|decoration| decoration.range().start);

    let mut preview = String::with_capacity(source.len());
    let mut cursor = 0;
    for decoration in sorted {
        let range = decoration.range();
        if range.start < cursor || source.get(range.clone()).is_none() {
            tracing::warn!(?range, "skipping decoration that does not fit the source");
            continue;
        }
        preview.push_str(source.get(cursor..range.start).unwrap_or_default());
        if let Decoration::Replace { label, .. } = decoration {
            preview.push_str(label);
        }
        cursor = range.end;
    }
    preview.push_str(source.get(cursor..).unwrap_or_default());
    preview
}
