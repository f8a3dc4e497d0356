use std::collections::BTreeSet;
use std::fmt;

/// Terminal status of a run, as shown in summaries and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Succeeded,
    Failed,
}

impl Status {
    pub fn from_success(success: bool) -> Self {
        if success { Status::Succeeded } else { Status::Failed }
    }

    /// Short indicator used as a prefix in notification titles.
    pub fn glyph(self) -> &'static str {
        match self {
            Status::Succeeded => "\u{1F7E2}",
            Status::Failed => "\u{1F534}",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Succeeded => f.write_str("Succeeded"),
            Status::Failed => f.write_str("Failed"),
        }
    }
}

/// Set of exit codes that count as a healthy run.
///
/// Never empty: constructing from an empty list yields `{0}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthyExitCodes(BTreeSet<i32>);

impl HealthyExitCodes {
    pub fn new(codes: impl IntoIterator<Item = i32>) -> Self {
        let set: BTreeSet<i32> = codes.into_iter().collect();
        if set.is_empty() {
            Self::default()
        } else {
            Self(set)
        }
    }

    pub fn contains(&self, code: i32) -> bool {
        self.0.contains(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for HealthyExitCodes {
    fn default() -> Self {
        Self(BTreeSet::from([0]))
    }
}

/// Alternate identity the child runs as.
///
/// `uid`/`gid` are applied independently; `home`, when known, replaces the
/// child's `HOME`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunAsUser {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub username: Option<String>,
    pub home: Option<String>,
}

impl fmt::Display for RunAsUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
        write!(f, "UID {}, GID {}", id(self.uid), id(self.gid))?;
        if let Some(name) = &self.username {
            write!(f, ", user {name}")?;
        }
        Ok(())
    }
}
