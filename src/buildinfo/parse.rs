use thiserror::Error;
use tracing::warn;

use crate::models::{BuildInfo, ModuleReference};

/// Failure to parse `go version -m` output. Messages echo the offending line verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognised version line: {0}")]
    UnrecognisedVersionLine(String),
    #[error("invalid {kind} line: {line}")]
    InvalidLine { kind: &'static str, line: String },
}

/// Parser position within the dump.
#[derive(Debug)]
enum State {
    AwaitingHeader,
    /// Devel builds carry no structured records; anything up to the next header is skipped.
    InDevelBlock(BuildInfo),
    /// `can_replace` holds while the previous record was a `dep` or `=>` line.
    InVersionedBlock { info: BuildInfo, can_replace: bool },
}

impl State {
    /// Start a new block from a header line (`<path>: <version-info>`).
    fn from_header(line: &str) -> Result<State, ParseError> {
        let unrecognised = || ParseError::UnrecognisedVersionLine(line.to_string());

        // Split on the first ": " only; Windows paths contain "C:\".
        let (path, version) = line.split_once(": ").ok_or_else(unrecognised)?;
        let info = BuildInfo {
            path: path.to_string(),
            ..Default::default()
        };

        if is_devel(version) {
            Ok(State::InDevelBlock(info))
        } else if is_toolchain_version(version) {
            Ok(State::InVersionedBlock {
                info,
                can_replace: false,
            })
        } else {
            Err(unrecognised())
        }
    }

    /// Consume a tab-prefixed record line. `record` is `line` without its leading tab.
    fn record(self, line: &str, record: &str) -> Result<State, ParseError> {
        let (mut info, can_replace) = match self {
            State::AwaitingHeader => {
                return Err(ParseError::UnrecognisedVersionLine(line.to_string()))
            }
            State::InDevelBlock(info) => {
                warn!(
                    binary = %info.path,
                    record,
                    "skipping record of a devel toolchain build, its modules are not checked"
                );
                return Ok(State::InDevelBlock(info));
            }
            State::InVersionedBlock { info, can_replace } => (info, can_replace),
        };

        let fields: Vec<&str> = record.split('\t').collect();
        let can_replace = match fields[0] {
            "path" => {
                expect_fields("path", line, &fields, 2, 2)?;
                info.package_path = fields[1].to_string();
                false
            }
            "mod" => {
                expect_fields("mod", line, &fields, 4, 4)?;
                info.module_path = fields[1].to_string();
                false
            }
            "dep" => {
                expect_fields("dep", line, &fields, 3, 4)?;
                info.module_refs.push(ModuleReference::new(fields[1], fields[2]));
                true
            }
            "=>" => {
                expect_fields("=>", line, &fields, 3, 4)?;
                let target = info
                    .module_refs
                    .last_mut()
                    .filter(|_| can_replace)
                    .ok_or_else(|| invalid("=>", line))?;
                *target = ModuleReference::new(fields[1], fields[2]);
                true
            }
            // Newer toolchains add `build` lines; they carry nothing we track.
            _ => false,
        };

        Ok(State::InVersionedBlock { info, can_replace })
    }

    fn finish(self) -> Option<BuildInfo> {
        match self {
            State::AwaitingHeader => None,
            State::InDevelBlock(info) | State::InVersionedBlock { info, .. } => Some(info),
        }
    }
}

/// Parse the (possibly concatenated) output of `go version -m` into one
/// [`BuildInfo`] per binary, in input order.
///
/// Parsing is fail-fast: the first malformed line aborts and no partial
/// result is returned.
pub fn parse(raw: &str) -> Result<Vec<BuildInfo>, ParseError> {
    let mut parsed = Vec::new();
    let mut state = State::AwaitingHeader;

    for line in raw.split('\n') {
        if line.is_empty() {
            continue;
        }

        state = match line.strip_prefix('\t') {
            Some(record) => state.record(line, record)?,
            None => {
                let next = State::from_header(line)?;
                if let Some(done) = state.finish() {
                    parsed.push(done);
                }
                next
            }
        };
    }

    if let Some(done) = state.finish() {
        parsed.push(done);
    }

    Ok(parsed)
}

fn is_devel(version: &str) -> bool {
    version
        .strip_prefix("devel")
        .is_some_and(|rest| rest.chars().next().map_or(true, char::is_whitespace))
}

fn is_toolchain_version(version: &str) -> bool {
    version
        .strip_prefix("go")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

fn expect_fields(
    kind: &'static str,
    line: &str,
    fields: &[&str],
    min: usize,
    max: usize,
) -> Result<(), ParseError> {
    if (min..=max).contains(&fields.len()) {
        Ok(())
    } else {
        Err(invalid(kind, line))
    }
}

fn invalid(kind: &'static str, line: &str) -> ParseError {
    ParseError::InvalidLine {
        kind,
        line: line.to_string(),
    }
}
