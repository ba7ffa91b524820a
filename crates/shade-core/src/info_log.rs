//! Parsing of compiler and linker info logs.
//!
//! Drivers do not agree on a log format, but most lines follow one of a few
//! shapes:
//!
//! - `ERROR: 0:12: 'foo' : undeclared identifier` (ANGLE, glslang, most browsers)
//! - `0:12(5): error: 'foo' undeclared` (Mesa)
//! - `0(12) : error C1008: undefined variable "foo"` (NVIDIA)
//!
//! Lines matching none of them are kept verbatim with [`Severity::Unknown`].

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, digit1, space0, space1},
    combinator::{map_res, opt, value},
    sequence::{preceded, tuple},
    IResult,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Error,
    Warning,
    Info,
    Unknown,
}

/// One line of an info log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LogEntry {
    pub severity: Severity,
    /// Index of the source string the line refers to (usually 0).
    pub source: Option<u32>,
    /// 1-based line in the shader source.
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub message: String,
}

impl LogEntry {
    fn unlocated(severity: Severity, message: &str) -> Self {
        Self {
            severity,
            source: None,
            line: None,
            column: None,
            message: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Location and severity parsed from the start of a line; the rest is the message.
#[derive(Debug, Clone, Copy)]
struct Header {
    severity: Severity,
    source: Option<u32>,
    line: Option<u32>,
    column: Option<u32>,
}

/// Parse a raw info log into entries, one per non-empty line.
pub fn parse_info_log(log: &str) -> Vec<LogEntry> {
    log.lines()
        .map(|line| line.trim_end_matches(|c: char| c == '\0' || c.is_whitespace()))
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> LogEntry {
    let trimmed = line.trim_start();
    match alt((severity_first, mesa_location, nvidia_location, bare_severity))(trimmed) {
        Ok((message, header)) => LogEntry {
            severity: header.severity,
            source: header.source,
            line: header.line,
            column: header.column,
            message: message.trim().to_string(),
        },
        Err(_) => LogEntry::unlocated(Severity::Unknown, trimmed),
    }
}

fn severity(input: &str) -> IResult<&str, Severity> {
    alt((
        value(Severity::Error, tag_no_case("error")),
        value(Severity::Warning, tag_no_case("warning")),
        value(Severity::Info, tag_no_case("info")),
    ))(input)
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse)(input)
}

fn separator(input: &str) -> IResult<&str, ()> {
    value((), tuple((space0, char(':'), space0)))(input)
}

/// `ERROR: 0:12: message`
fn severity_first(input: &str) -> IResult<&str, Header> {
    let (input, severity) = severity(input)?;
    let (input, _) = separator(input)?;
    let (input, (source, _, line)) = tuple((number, char(':'), number))(input)?;
    let (input, _) = separator(input)?;
    Ok((
        input,
        Header {
            severity,
            source: Some(source),
            line: Some(line),
            column: None,
        },
    ))
}

/// `0:12(5): error: message`
fn mesa_location(input: &str) -> IResult<&str, Header> {
    let (input, (source, _, line, _, column, _)) =
        tuple((number, char(':'), number, char('('), number, char(')')))(input)?;
    let (input, _) = separator(input)?;
    let (input, severity) = severity(input)?;
    let (input, _) = separator(input)?;
    Ok((
        input,
        Header {
            severity,
            source: Some(source),
            line: Some(line),
            column: Some(column),
        },
    ))
}

/// `0(12) : error C1008: message`
fn nvidia_location(input: &str) -> IResult<&str, Header> {
    let (input, (source, _, line, _)) = tuple((number, char('('), number, char(')')))(input)?;
    let (input, _) = separator(input)?;
    let (input, severity) = severity(input)?;
    let (input, _) = opt(preceded(space1, take_while1(|c: char| c.is_ascii_alphanumeric())))(input)?;
    let (input, _) = separator(input)?;
    Ok((
        input,
        Header {
            severity,
            source: Some(source),
            line: Some(line),
            column: None,
        },
    ))
}

/// `ERROR: message` with no location.
fn bare_severity(input: &str) -> IResult<&str, Header> {
    let (input, severity) = severity(input)?;
    let (input, _) = separator(input)?;
    Ok((
        input,
        Header {
            severity,
            source: None,
            line: None,
            column: None,
        },
    ))
}
