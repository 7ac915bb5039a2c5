//! Linux software RAID state from `/proc/mdstat`.
//!
//! Each array is a two-line record:
//!
//! ```text
//! md1 : active raid5 sdd1[3](S) sdc1[2] sdb1[1] sda1[0](F)
//!       2093056 blocks super 1.2 level 5, 512k chunk, algorithm 2 [3/2] [_UU]
//! ```
//!
//! Records that do not have this shape are left out of the result.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::collector::diagnostics::{Diagnostics, MDSTAT};
use crate::collector::error::CollectError;
use crate::collector::reader::PseudoFileReader;
use crate::collector::traits::FileSystem;
use crate::model::{RaidArray, RaidMember, RaidMemberState};

static ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(\S+)\s*:\s*(\w+)\s*raid(\d+)\s*([\w\[\]() ]+?)\s*\n\s+(\d+) blocks\s*(?:super \S+\s*)?(level \d+, \w+ chunk, algorithm \d+)?\s*\[(\d+)/(\d+)\] \[([U_]+)\]",
    )
    .expect("mdstat array regex")
});

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(md\w*)\s*:").expect("mdstat header regex"));

static MEMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\[\d+\](\(\w+\))?$").expect("mdstat member regex"));

/// Parses every well-formed array record in `/proc/mdstat`.
pub fn parse_mdstat(content: &str) -> Vec<RaidArray> {
    ARRAY_RE
        .captures_iter(content)
        .filter_map(|caps| {
            Some(RaidArray {
                device: format!("/dev/{}", &caps[1]),
                status: caps[2].to_string(),
                level: caps[3].parse().ok()?,
                members: caps[4].split(' ').filter_map(parse_member).collect(),
                blocks: caps[5].parse().ok()?,
                algorithm: caps.get(6).map(|m| m.as_str().trim().to_string()),
                total_count: caps[7].parse().ok()?,
                active_count: caps[8].parse().ok()?,
                chart: caps[9].to_string(),
            })
        })
        .collect()
}

/// Parses one `name[slot](flag)` member token.
pub fn parse_member(token: &str) -> Option<RaidMember> {
    let caps = MEMBER_RE.captures(token)?;
    let state = match caps.get(2).map(|m| m.as_str()) {
        None => RaidMemberState::Normal,
        Some("(S)") => RaidMemberState::Spare,
        Some("(F)") => RaidMemberState::Failed,
        Some(_) => RaidMemberState::Unknown,
    };
    Some(RaidMember {
        device: format!("/dev/{}", &caps[1]),
        state,
    })
}

/// Array names that have a header line but no well-formed record.
pub fn unparsed_arrays(content: &str, parsed: &[RaidArray]) -> Vec<String> {
    let seen: HashSet<&str> = parsed
        .iter()
        .filter_map(|a| a.device.strip_prefix("/dev/"))
        .collect();
    HEADER_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !seen.contains(name))
        .map(str::to_string)
        .collect()
}

pub struct RaidCollector<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
}

impl<F: FileSystem> RaidCollector<F> {
    pub fn new(fs: F, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    /// Collects md arrays. Arrays with malformed records are skipped and
    /// reported to `diagnostics`.
    pub fn collect(&self, diagnostics: &mut Diagnostics) -> Result<Vec<RaidArray>, CollectError> {
        let path = self.proc_path.join("mdstat");
        let content = PseudoFileReader::new(&self.fs).read_required(&path)?;

        let arrays = parse_mdstat(&content);
        for name in unparsed_arrays(&content, &arrays) {
            diagnostics.record(MDSTAT, format!("cannot parse status of {}", name));
        }
        debug!(count = arrays.len(), "collected md arrays");
        Ok(arrays)
    }
}
