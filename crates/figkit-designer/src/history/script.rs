//! The generated block inside a figure script.
//!
//! ```text
//! #% start: automatic generated code from figkit [figure 1]
//! plt.figure(1).axes[0].set_position([0.1, 0.1, 0.4, 0.4])
//! #% end: automatic generated code from figkit
//! ```
//!
//! A script holds at most one block per figure. A start line without the
//! `[figure N]` suffix belongs to figure 1.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use figkit_settings::OutputSettings;

use super::codegen::{parse_block, Statement};
use crate::error::{EditError, EditResult};

/// Where a figure's block sits in a script, as 0-based line indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    pub start: usize,
    /// Line of the end marker
    pub end: usize,
    pub indent: String,
}

fn indent_of(line: &str) -> String {
    line.chars().take_while(|c| c.is_whitespace()).collect()
}

/// Figure number named by a start marker line, `None` if the line is not a
/// start marker.
fn start_marker_figure(line: &str, output: &OutputSettings) -> Option<u32> {
    let rest = line.trim().strip_prefix(&output.start_marker())?.trim();
    if rest.is_empty() {
        return Some(1);
    }
    rest.strip_prefix("[figure")?
        .strip_suffix(']')?
        .trim()
        .parse()
        .ok()
}

fn is_end_marker(line: &str, output: &OutputSettings) -> bool {
    line.trim().starts_with(&output.end_marker())
}

/// Finds the block of `figure`.
pub fn find_block(text: &str, output: &OutputSettings, figure: u32) -> EditResult<Option<BlockLocation>> {
    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if start_marker_figure(line, output) != Some(figure) {
            continue;
        }
        let end = lines[i + 1..]
            .iter()
            .position(|l| is_end_marker(l, output))
            .map(|offset| i + 1 + offset)
            .ok_or_else(|| EditError::parse(i + 1, "generated block has no end marker"))?;
        return Ok(Some(BlockLocation {
            start: i,
            end,
            indent: indent_of(line),
        }));
    }
    Ok(None)
}

/// Statements of the block of `figure`, empty when there is none.
pub fn extract_block(text: &str, output: &OutputSettings, figure: u32) -> EditResult<Vec<Statement>> {
    let Some(block) = find_block(text, output, figure)? else {
        return Ok(Vec::new());
    };
    let body: Vec<&str> = text.lines().skip(block.start + 1).take(block.end - block.start - 1).collect();
    // 1-based number of the first body line
    parse_block(&body.join("\n"), block.start + 2)
}

/// Returns `text` with the block of `figure` replaced by `statements`.
///
/// Without an existing block the new one goes in front of the first
/// `plt.show()` call, at its indentation, or at the end of the script.
/// A script using CRLF line endings keeps them.
pub fn splice_block(
    text: &str,
    output: &OutputSettings,
    figure: u32,
    statements: &[String],
) -> EditResult<String> {
    let lines: Vec<&str> = text.lines().collect();
    let (range, indent) = match find_block(text, output, figure)? {
        Some(block) => (block.start..block.end + 1, block.indent),
        None => match lines.iter().position(|l| l.trim_start().starts_with("plt.show(")) {
            Some(i) => (i..i, indent_of(lines[i])),
            None => (lines.len()..lines.len(), String::new()),
        },
    };

    let mut block = Vec::with_capacity(statements.len() + 2);
    block.push(format!("{}{} [figure {}]", indent, output.start_marker(), figure));
    block.extend(statements.iter().map(|s| format!("{}{}", indent, s)));
    block.push(format!("{}{}", indent, output.end_marker()));

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + block.len());
    out.extend(lines[..range.start].iter().map(|l| l.to_string()));
    out.extend(block);
    out.extend(lines[range.end..].iter().map(|l| l.to_string()));

    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut joined = out.join(newline);
    joined.push_str(newline);
    Ok(joined)
}

/// Replaces `path` with `contents` without ever leaving a partial file.
///
/// An existing file's permissions carry over to the replacement.
pub fn write_atomic(path: &Path, contents: &str) -> EditResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    match fs::metadata(path) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    tmp.persist(path).map_err(|e| EditError::Io(e.error))?;
    Ok(())
}
