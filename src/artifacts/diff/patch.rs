//! Reversible line patches
//!
//! A [`Patch`] is the ordered list of zero-context hunks turning one version of a file
//! into another. Without context lines the hunk ranges alone locate every edit, so the
//! same patch replays in both directions:
//!
//! - `apply_forward(old)` swaps each hunk's old range for its new range,
//! - `apply_backward(new)` swaps each hunk's new range for its old range.
//!
//! Each direction is a single left-to-right pass. The output position is checked
//! against the hunk's recorded start on the other side, which is how the offset
//! left by earlier hunks is compensated and verified at the same time.

use crate::artifacts::diff::diff_algorithm::MyersDiff;
use crate::artifacts::diff::hunk::Hunk;
use crate::errors::CvsError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    hunks: Vec<Hunk>,
}

/// One side of a hunk as seen by a replay direction
struct Range<'h> {
    start: usize,
    lines: &'h [String],
}

impl Patch {
    pub fn from_hunks(hunks: Vec<Hunk>) -> Self {
        Patch { hunks }
    }

    /// Minimal zero-context patch turning `old` into `new`; equal inputs yield no hunks
    pub fn diff(old: &[String], new: &[String]) -> Self {
        if old == new {
            return Patch::default();
        }

        let hunks = MyersDiff::new(old, new)
            .changed_regions()
            .into_iter()
            .map(|region| {
                Hunk::new(
                    region.old.start,
                    old[region.old].to_vec(),
                    region.new.start,
                    new[region.new].to_vec(),
                )
            })
            .collect();

        Patch { hunks }
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn apply_forward(&self, old: &[String]) -> anyhow::Result<Vec<String>> {
        Self::replay(
            old,
            self.hunks.iter().map(|hunk| {
                (
                    hunk,
                    Range {
                        start: hunk.old_start,
                        lines: &hunk.old_lines,
                    },
                    Range {
                        start: hunk.new_start,
                        lines: &hunk.new_lines,
                    },
                )
            }),
        )
    }

    pub fn apply_backward(&self, new: &[String]) -> anyhow::Result<Vec<String>> {
        Self::replay(
            new,
            self.hunks.iter().map(|hunk| {
                (
                    hunk,
                    Range {
                        start: hunk.new_start,
                        lines: &hunk.new_lines,
                    },
                    Range {
                        start: hunk.old_start,
                        lines: &hunk.old_lines,
                    },
                )
            }),
        )
    }

    fn replay<'h>(
        source: &[String],
        hunks: impl Iterator<Item = (&'h Hunk, Range<'h>, Range<'h>)>,
    ) -> anyhow::Result<Vec<String>> {
        let mut output = Vec::with_capacity(source.len());
        let mut cursor = 0;

        for (hunk, from, to) in hunks {
            let from_end = from.start + from.lines.len();

            if from.start < cursor || from_end > source.len() {
                return Err(CvsError::patch_corruption(format!(
                    "hunk '{}' falls outside the {} lines of the file",
                    hunk.header(),
                    source.len()
                ))
                .into());
            }

            output.extend_from_slice(&source[cursor..from.start]);

            if output.len() != to.start {
                return Err(CvsError::patch_corruption(format!(
                    "hunk '{}' lands at line {} instead of {}",
                    hunk.header(),
                    output.len(),
                    to.start
                ))
                .into());
            }

            if source[from.start..from_end] != *from.lines {
                return Err(CvsError::patch_corruption(format!(
                    "hunk '{}' does not match the file content",
                    hunk.header()
                ))
                .into());
            }

            output.extend_from_slice(to.lines);
            cursor = from_end;
        }

        output.extend_from_slice(&source[cursor..]);

        Ok(output)
    }

    /// Unified zero-context text form, one entry per line
    pub fn to_lines(&self) -> Vec<String> {
        self.hunks.iter().flat_map(Hunk::to_lines).collect()
    }

    pub fn parse(lines: &[String]) -> anyhow::Result<Self> {
        let mut hunks = Vec::new();
        let mut rest = lines;

        while !rest.is_empty() {
            let (hunk, consumed) = Hunk::parse(rest)?;
            hunks.push(hunk);
            rest = &rest[consumed..];
        }

        Ok(Patch { hunks })
    }
}

/// Split text into lines that keep their terminators, so joining them restores the bytes
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, error_kind};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn lines(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[rstest]
    #[case::adding(&["a\n", "b\n"], &["a\n", "b\n", "c\n", "d\n"])]
    #[case::adding_to_empty(&[], &["a\n", "b"])]
    #[case::deleting(&["a\n", "b\n", "c\n"], &["a\n"])]
    #[case::deleting_everything(&["a\n", "b\n"], &[])]
    #[case::changing(&["a\n", "b\n"], &["a\n", "c\n"])]
    #[case::adjacent_changes(&["a\n", "b\n", "c\n"], &["x\n", "y\n", "c\n"])]
    #[case::distant_changes(
        &["1\n", "2\n", "3\n", "4\n", "5\n", "6\n", "7\n", "8\n"],
        &["0\n", "1\n", "2\n", "three\n", "4\n", "5\n", "6\n", "8\n", "9\n"]
    )]
    #[case::missing_final_newline(&["a\n", "b\n"], &["a\n", "b"])]
    fn patch_replays_in_both_directions(#[case] old: &[&str], #[case] new: &[&str]) {
        let (old, new) = (lines(old), lines(new));
        let patch = Patch::diff(&old, &new);

        assert!(!patch.is_empty());
        assert_eq!(patch.apply_forward(&old).unwrap(), new);
        assert_eq!(patch.apply_backward(&new).unwrap(), old);
    }

    #[test]
    fn equal_inputs_give_empty_patch() {
        let text = lines(&["same\n", "content\n"]);

        assert!(Patch::diff(&text, &text).is_empty());
        assert!(Patch::diff(&[], &[]).is_empty());
    }

    #[test]
    fn hunks_carry_no_context() {
        let patch = Patch::diff(
            &lines(&["a\n", "b\n", "c\n", "d\n"]),
            &lines(&["a\n", "B\n", "c\n", "d\n"]),
        );

        assert_eq!(
            patch.to_lines(),
            lines(&["@@ -2 +2 @@", "-b\n", "+B\n"])
        );
    }

    #[test]
    fn text_form_parses_back_to_same_patch() {
        let patch = Patch::diff(
            &lines(&["1\n", "2\n", "3\n", "4\n"]),
            &lines(&["2\n", "3\n", "x\n", "4\n", "5\n"]),
        );

        assert_eq!(Patch::parse(&patch.to_lines()).unwrap(), patch);
    }

    #[test]
    fn out_of_range_hunk_is_patch_corruption() {
        let patch = Patch::from_hunks(vec![Hunk::new(5, lines(&["x\n"]), 5, lines(&["y\n"]))]);

        let error = patch.apply_forward(&lines(&["a\n"])).unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::PatchCorruption));
    }

    #[test]
    fn mismatching_content_is_patch_corruption() {
        let patch = Patch::diff(&lines(&["a\n", "b\n"]), &lines(&["a\n", "c\n"]));

        let error = patch.apply_forward(&lines(&["a\n", "z\n"])).unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::PatchCorruption));
    }

    #[test]
    fn overlapping_hunks_are_patch_corruption() {
        let patch = Patch::from_hunks(vec![
            Hunk::new(1, lines(&["b\n"]), 1, vec![]),
            Hunk::new(0, lines(&["a\n"]), 0, vec![]),
        ]);

        let error = patch.apply_forward(&lines(&["a\n", "b\n"])).unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::PatchCorruption));
    }

    #[test]
    fn split_lines_keeps_terminators() {
        assert_eq!(split_lines("a\nb\n\nc"), lines(&["a\n", "b\n", "\n", "c"]));
        assert!(split_lines("").is_empty());
    }

    fn arb_lines() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(prop::sample::select(vec!["a\n", "b\n", "c\n", "d\n", "e"]), 0..24)
            .prop_map(|values| values.into_iter().map(str::to_string).collect())
    }

    proptest! {
        #[test]
        fn diff_then_apply_round_trips(old in arb_lines(), new in arb_lines()) {
            let patch = Patch::diff(&old, &new);

            prop_assert_eq!(patch.apply_forward(&old).unwrap(), new.clone());
            prop_assert_eq!(patch.apply_backward(&new).unwrap(), old.clone());
            prop_assert_eq!(Patch::parse(&patch.to_lines()).unwrap(), patch);
        }
    }
}
