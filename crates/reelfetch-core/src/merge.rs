//! Combines the two providers' results into one [`MergedRecord`].
//!
//! Field ownership:
//! * `title` / `original_title` come from the canonical-title provider only.
//! * `year` comes from the plot provider only.
//! * `summary` prefers the plot provider's text unless it is missing or
//!   looks truncated, in which case the canonical-title provider's overview
//!   is used instead.
//!
//! Truncation is detected by the literal substring `"..."` anywhere in the
//! plot. This is a known weak heuristic: a plot that legitimately contains an
//! ellipsis will also be swapped for the overview.

use reelfetch_models::{MergedRecord, PrimaryMetadata, SecondaryMetadata};

pub const TRUNCATION_MARKER: &str = "...";

pub fn is_truncated(text: &str) -> bool {
    text.contains(TRUNCATION_MARKER)
}

pub fn merge(primary: PrimaryMetadata, secondary: SecondaryMetadata, source_url: &str) -> MergedRecord {
    let summary = match primary.plot {
        Some(plot) if !is_truncated(&plot) => plot,
        _ => secondary.overview.unwrap_or_default(),
    };

    let foreign_title = (secondary.title != secondary.original_title).then_some(true);

    MergedRecord {
        title: secondary.title,
        original_title: secondary.original_title,
        source_url: source_url.to_string(),
        year: primary.year,
        summary,
        foreign_title,
    }
}
