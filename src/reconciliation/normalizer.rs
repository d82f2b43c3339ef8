use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const APPROVAL_MARKERS: [&str; 2] = ["aprovado", "aprovada"];

/// Comparison key for driver names and hub codes: trimmed and uppercased.
pub(crate) fn normalize_key(value: &str) -> String {
    value.trim().to_uppercase()
}

/// First whitespace-delimited token, or `""` when there is none.
pub(crate) fn first_token(normalized: &str) -> &str {
    normalized.split_whitespace().next().unwrap_or("")
}

pub(crate) fn is_approved_status(status: Option<&str>) -> bool {
    let Some(status) = status else {
        return false;
    };
    let lowered = status.to_lowercase();
    APPROVAL_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Folds a column header so that spelling variants compare equal:
/// accents stripped, lowercase, `_`/`-`/`.` treated as spaces, whitespace collapsed.
pub(crate) fn fold_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let folded: String = cleaned
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            '_' | '-' | '.' => ' ',
            other => other,
        })
        .collect();
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}
