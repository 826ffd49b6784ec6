use crate::errors::CvsError;
use anyhow::Context;

/// Where `reset` or `switch` should move HEAD
///
/// - `Tag`: the commit bound to a tag
/// - `Back(n)`: n commits up the `prev` chain
/// - `Forward(n)`: n commits down the current branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Tag(String),
    Back(usize),
    Forward(usize),
}

impl Revision {
    /// Build a revision from command arguments; a tag wins over step counts
    pub fn from_args(
        tag: Option<String>,
        steps_back: Option<usize>,
        steps_forward: Option<usize>,
    ) -> anyhow::Result<Self> {
        match (tag, steps_back, steps_forward) {
            (Some(tag), _, _) => Ok(Revision::Tag(tag)),
            (None, Some(back), _) => Ok(Revision::Back(back)),
            (None, None, Some(forward)) => Ok(Revision::Forward(forward)),
            (None, None, None) => Err(CvsError::MissingTarget.into()),
        }
    }

    /// Parse a signed step count: `-N` walks back, `+N` or `N` walks forward
    pub fn parse_steps(raw: &str) -> anyhow::Result<Self> {
        let raw = raw.trim();

        if let Some(back) = raw.strip_prefix('-') {
            let back = back
                .parse::<usize>()
                .with_context(|| format!("invalid step count '{raw}'"))?;
            return Ok(Revision::Back(back));
        }

        let forward = raw
            .strip_prefix('+')
            .unwrap_or(raw)
            .parse::<usize>()
            .with_context(|| format!("invalid step count '{raw}'"))?;

        Ok(Revision::Forward(forward))
    }
}
