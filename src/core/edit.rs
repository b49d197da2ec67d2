use std::ops::Range;

use crate::core::synthesize::ReplacementPlan;

/// Result of applying replacement plans to one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdits {
    pub text: String,
    pub applied: usize,
    /// Plans dropped because they overlapped an earlier plan or fell outside the buffer.
    pub skipped: usize,
}

/// Apply plans whose absolute ranges start at `base` for this buffer.
///
/// Plans are taken in order of their start offset; one overlapping an already
/// accepted plan is skipped. Accepted edits are applied back to front so
/// earlier offsets stay valid.
pub fn apply_plans(text: &str, base: usize, plans: &[ReplacementPlan]) -> AppliedEdits {
    let mut ordered: Vec<&ReplacementPlan> = plans.iter().collect();
    ordered.sort_by_key(|plan| (plan.range.start, plan.range.end));

    let mut accepted: Vec<(Range<usize>, &str)> = Vec::with_capacity(ordered.len());
    let mut skipped = 0;
    for plan in ordered {
        let Some(local) = to_local(text, base, &plan.range) else {
            log::debug!("plan {:?} outside buffer", plan.range);
            skipped += 1;
            continue;
        };
        let overlaps = accepted
            .last()
            .is_some_and(|(previous, _)| local.start < previous.end);
        if overlaps {
            log::debug!("plan {:?} overlaps an earlier one", plan.range);
            skipped += 1;
            continue;
        }
        accepted.push((local, plan.text.as_str()));
    }

    let mut out = text.to_string();
    for (range, replacement) in accepted.iter().rev() {
        out.replace_range(range.clone(), replacement);
    }

    AppliedEdits {
        text: out,
        applied: accepted.len(),
        skipped,
    }
}

fn to_local(text: &str, base: usize, range: &Range<usize>) -> Option<Range<usize>> {
    let start = range.start.checked_sub(base)?;
    let end = range.end.checked_sub(base)?;
    let valid = start <= end
        && end <= text.len()
        && text.is_char_boundary(start)
        && text.is_char_boundary(end);
    valid.then_some(start..end)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::synthesize::PlanKind;

    fn plan(range: Range<usize>, text: &str) -> ReplacementPlan {
        ReplacementPlan {
            range,
            text: text.to_string(),
            kind: PlanKind::Call,
        }
    }

    #[test]
    fn test_applies_in_any_input_order() {
        let text = "a = '一'; b = '二';";
        let plans = vec![plan(15..20, "t('b')"), plan(4..9, "t('a')")];

        let edits = apply_plans(text, 0, &plans);
        assert_eq!(edits.text, "a = t('a'); b = t('b');");
        assert_eq!(edits.applied, 2);
        assert_eq!(edits.skipped, 0);
    }

    #[test]
    fn test_overlap_is_skipped() {
        let text = "<i title=\"一\">";
        let plans = vec![plan(3..14, ":title=\"t('a')\""), plan(10..13, "t('a')")];

        let edits = apply_plans(text, 0, &plans);
        assert_eq!(edits.text, "<i :title=\"t('a')\">");
        assert_eq!(edits.skipped, 1);
    }

    #[test]
    fn test_base_and_bounds() {
        let text = "x = '一';";
        let plans = vec![plan(104..109, "t('k')"), plan(50..52, "bad"), plan(105..106, "mid")];

        let edits = apply_plans(text, 100, &plans);
        assert_eq!(edits.text, "x = t('k');");
        assert_eq!(edits.applied, 1);
        assert_eq!(edits.skipped, 2);
    }
}
