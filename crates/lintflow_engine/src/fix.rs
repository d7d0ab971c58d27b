//! Applies message fixes to source text.

use tracing::{debug, warn};

use crate::message::{Fix, LintMessage};

/// Outcome of applying fixes to a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Number of fixes applied.
    pub fixes_applied: usize,
    /// The text after fixes.
    pub fixed_content: String,
    /// Whether the text changed.
    pub modified: bool,
}

impl FixOutcome {
    fn unchanged(content: &str) -> Self {
        Self {
            fixes_applied: 0,
            fixed_content: content.to_string(),
            modified: false,
        }
    }
}

/// Applies the fixes carried by `messages` to `content`.
///
/// Fixes are applied from the end of the text toward the beginning so earlier
/// spans stay valid while later ones are replaced. Overlapping fixes keep the
/// later-starting one; spans outside the text are skipped with a warning.
pub fn apply_fixes(content: &str, messages: &[LintMessage]) -> FixOutcome {
    let mut fixes: Vec<&Fix> = messages.iter().filter_map(|m| m.fix.as_ref()).collect();
    if fixes.is_empty() {
        return FixOutcome::unchanged(content);
    }

    fixes.sort_by(|a, b| b.span.start.cmp(&a.span.start));
    let fixes = drop_overlapping(fixes);

    let mut fixed = content.to_string();
    let mut applied = 0;

    for fix in fixes {
        let start = fix.span.start as usize;
        let end = fix.span.end as usize;

        if start > end || end > fixed.len() {
            warn!(
                "Skipping fix with invalid span [{}, {}] over {} byte(s)",
                start,
                end,
                fixed.len()
            );
            continue;
        }

        debug!("Applying fix: replace [{start}..{end}] with {:?}", fix.text);
        fixed.replace_range(start..end, &fix.text);
        applied += 1;
    }

    FixOutcome {
        fixes_applied: applied,
        modified: applied > 0,
        fixed_content: fixed,
    }
}

/// Drops fixes that overlap an already-kept fix.
///
/// Expects `fixes` sorted by start descending; a candidate then only needs
/// to be checked against the last kept fix, which has the smallest start
/// among those accepted so far.
fn drop_overlapping(fixes: Vec<&Fix>) -> Vec<&Fix> {
    if fixes.len() <= 1 {
        return fixes;
    }

    debug_assert!(
        fixes.windows(2).all(|w| w[0].span.start >= w[1].span.start),
        "fixes must be sorted by start descending"
    );

    let mut kept: Vec<&Fix> = Vec::with_capacity(fixes.len());
    for fix in fixes {
        let overlaps = kept
            .last()
            .is_some_and(|last| fix.span.end > last.span.start && fix.span.start < last.span.end);

        if overlaps {
            warn!(
                "Skipping overlapping fix at [{}, {}]",
                fix.span.start, fix.span.end
            );
        } else {
            kept.push(fix);
        }
    }

    kept
}
