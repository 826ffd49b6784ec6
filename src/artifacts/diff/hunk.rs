use crate::errors::CvsError;
use derive_new::new;
use regex::Regex;
use std::sync::LazyLock;

const HUNK_HEADER_REGEX: &str = r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@$";

/// Compiled once; replay parses a header per hunk of every object on a route
static HUNK_HEADER: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(HUNK_HEADER_REGEX));

/// A zero-context replacement of `old_lines` (starting at `old_start`) by `new_lines`
/// (starting at `new_start`).
///
/// Starts are zero-based. For an empty range the start is the insertion point,
/// i.e. the number of lines that precede it.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Hunk {
    pub old_start: usize,
    pub old_lines: Vec<String>,
    pub new_start: usize,
    pub new_lines: Vec<String>,
}

impl Hunk {
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            Self::format_range(self.old_start, self.old_lines.len()),
            Self::format_range(self.new_start, self.new_lines.len())
        )
    }

    /// Unified-format rendering: the header followed by `-` old lines and `+` new lines
    pub fn to_lines(&self) -> Vec<String> {
        std::iter::once(self.header())
            .chain(self.old_lines.iter().map(|line| format!("-{line}")))
            .chain(self.new_lines.iter().map(|line| format!("+{line}")))
            .collect()
    }

    /// Parse one hunk from the front of `lines`, returning it with the number of lines consumed
    pub fn parse(lines: &[String]) -> anyhow::Result<(Self, usize)> {
        let header = lines
            .first()
            .ok_or_else(|| CvsError::patch_corruption("expected a hunk header, found end of patch"))?;
        let (old_start, old_count, new_start, new_count) = Self::parse_header(header)?;

        let body = &lines[1..];
        if body.len() < old_count + new_count {
            return Err(CvsError::patch_corruption(format!(
                "hunk '{}' announces {} lines but only {} follow",
                header,
                old_count + new_count,
                body.len()
            ))
            .into());
        }

        let old_lines = Self::strip_marker(&body[..old_count], '-', header)?;
        let new_lines = Self::strip_marker(&body[old_count..old_count + new_count], '+', header)?;

        Ok((
            Hunk::new(old_start, old_lines, new_start, new_lines),
            1 + old_count + new_count,
        ))
    }

    // count is omitted when it equals 1; an empty range reports the line it follows
    fn format_range(start: usize, len: usize) -> String {
        match len {
            0 => format!("{start},0"),
            1 => format!("{}", start + 1),
            _ => format!("{},{}", start + 1, len),
        }
    }

    fn parse_header(header: &str) -> anyhow::Result<(usize, usize, usize, usize)> {
        let re = HUNK_HEADER
            .as_ref()
            .map_err(|error| anyhow::anyhow!("invalid hunk header regex: {error}"))?;
        let captures = re
            .captures(header)
            .ok_or_else(|| CvsError::patch_corruption(format!("malformed hunk header '{header}'")))?;

        let number = |idx: usize, default: usize| -> anyhow::Result<usize> {
            match captures.get(idx) {
                Some(value) => value.as_str().parse::<usize>().map_err(|_| {
                    anyhow::Error::from(CvsError::patch_corruption(format!(
                        "malformed hunk header '{header}'"
                    )))
                }),
                None => Ok(default),
            }
        };

        let old_count = number(2, 1)?;
        let new_count = number(4, 1)?;
        let old_start = Self::zero_based(number(1, 0)?, old_count, header)?;
        let new_start = Self::zero_based(number(3, 0)?, new_count, header)?;

        Ok((old_start, old_count, new_start, new_count))
    }

    fn zero_based(start: usize, count: usize, header: &str) -> anyhow::Result<usize> {
        match (start, count) {
            (start, 0) => Ok(start),
            (0, _) => Err(CvsError::patch_corruption(format!(
                "hunk header '{header}' names line 0 of a non-empty range"
            ))
            .into()),
            (start, _) => Ok(start - 1),
        }
    }

    fn strip_marker(lines: &[String], marker: char, header: &str) -> anyhow::Result<Vec<String>> {
        lines
            .iter()
            .map(|line| {
                line.strip_prefix(marker).map(str::to_string).ok_or_else(|| {
                    anyhow::Error::from(CvsError::patch_corruption(format!(
                        "line '{}' in hunk '{}' should start with '{}'",
                        line.trim_end(),
                        header,
                        marker
                    )))
                })
            })
            .collect()
    }
}
