//! Parses and serializes the text format popularized by `diff -u` and used
//! by git, plus `reverse`, `apply`, and `validate` over the parsed
//! representation, including the multi-file `diff --git` variant.

use crate::error::{DiffError, Result};
use crate::hunk::{Change, Hunk};
use crate::line::Line;

/// One file's worth of parsed unified-diff content.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDiff {
    pub old_path: String,
    pub new_path: String,
    pub is_binary: bool,
    pub hunks: Vec<Hunk>,
}

/// A full parsed diff: one or more files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnifiedDiff {
    pub files: Vec<FileDiff>,
}

/// Parses a single-file unified diff (no `diff --git` headers).
pub fn parse_unified(text: &str) -> Result<UnifiedDiff> {
    let mut lines = text.lines().enumerate().peekable();
    let file = parse_one_file(&mut lines)?;
    Ok(UnifiedDiff { files: vec![file] })
}

/// Parses a multi-file patch delimited by `diff --git a/P b/Q` headers.
pub fn parse_multi_file(text: &str) -> Result<UnifiedDiff> {
    let mut files = Vec::new();
    let mut lines = text.lines().enumerate().peekable();

    while let Some(&(lineno, line)) = lines.peek() {
        if line.starts_with("diff --git") {
            lines.next();
            let mut is_binary = false;
            // Skip extended-header lines (`index`, `new file mode`, etc.)
            // until the `---`/`+++` pair or a binary marker.
            loop {
                match lines.peek() {
                    Some(&(_, l)) if l.starts_with("---") => break,
                    Some(&(_, l)) if l.starts_with("Binary files") || l.starts_with("GIT binary patch") => {
                        is_binary = true;
                        lines.next();
                        break;
                    }
                    Some(&(_, l))
                        if l.starts_with("new file mode")
                            || l.starts_with("deleted file mode")
                            || l.starts_with("index ") =>
                    {
                        lines.next();
                    }
                    Some(_) => break,
                    None => break,
                }
            }
            if is_binary {
                let (old_path, new_path) = parse_git_header(line, lineno)?;
                files.push(FileDiff {
                    old_path,
                    new_path,
                    is_binary: true,
                    hunks: Vec::new(),
                });
                // Skip any remaining binary payload lines until the next
                // file header or end of input.
                while let Some(&(_, l)) = lines.peek() {
                    if l.starts_with("diff --git") {
                        break;
                    }
                    lines.next();
                }
                continue;
            }
            let mut file = parse_one_file(&mut lines)?;
            if file.old_path.is_empty() && file.new_path.is_empty() {
                let (old_path, new_path) = parse_git_header(line, lineno)?;
                file.old_path = old_path;
                file.new_path = new_path;
            }
            files.push(file);
        } else {
            lines.next();
        }
    }

    Ok(UnifiedDiff { files })
}

fn parse_git_header(line: &str, lineno: usize) -> Result<(String, String)> {
    let rest = line.strip_prefix("diff --git ").ok_or_else(|| DiffError::UnifiedDiff {
        line: lineno + 1,
        message: "malformed diff --git header".to_string(),
    })?;
    let mut parts = rest.splitn(2, " b/");
    let a = parts.next().unwrap_or_default();
    let b = parts.next().unwrap_or_default();
    let old_path = a.strip_prefix("a/").unwrap_or(a).to_string();
    Ok((old_path, b.to_string()))
}

type Lines<'a> = std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>;

fn parse_one_file(lines: &mut Lines<'_>) -> Result<FileDiff> {
    let mut old_path = String::new();
    let mut new_path = String::new();

    if let Some(&(lineno, line)) = lines.peek() {
        if line.starts_with("---") {
            old_path = parse_file_header_path(line, lineno)?;
            lines.next();
        }
    }
    if let Some(&(lineno, line)) = lines.peek() {
        if line.starts_with("+++") {
            new_path = parse_file_header_path(line, lineno)?;
            lines.next();
        }
    }

    let mut hunks = Vec::new();
    while let Some(&(lineno, line)) = lines.peek() {
        if line.starts_with("@@") {
            hunks.push(parse_hunk(lines, lineno)?);
        } else {
            break;
        }
    }

    Ok(FileDiff {
        old_path,
        new_path,
        is_binary: false,
        hunks,
    })
}

fn parse_file_header_path(line: &str, lineno: usize) -> Result<String> {
    let rest = line
        .get(4..)
        .ok_or_else(|| DiffError::UnifiedDiff {
            line: lineno + 1,
            message: "truncated file header".to_string(),
        })?;
    let path = rest.split('\t').next().unwrap_or(rest).trim();
    let path = path
        .strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path);
    Ok(path.to_string())
}

fn parse_hunk_header(line: &str, lineno: usize) -> Result<(usize, usize, usize, usize)> {
    let body = line
        .strip_prefix("@@ -")
        .ok_or_else(|| malformed_hunk_header(lineno))?;
    let (ranges, _trailing) = body.split_once(" @@").ok_or_else(|| malformed_hunk_header(lineno))?;
    let (old_part, new_part) = ranges
        .split_once(" +")
        .ok_or_else(|| malformed_hunk_header(lineno))?;
    let (old_start, old_len) = parse_range(old_part, lineno)?;
    let (new_start, new_len) = parse_range(new_part, lineno)?;
    Ok((old_start, old_len, new_start, new_len))
}

fn malformed_hunk_header(lineno: usize) -> DiffError {
    DiffError::UnifiedDiff {
        line: lineno + 1,
        message: "malformed hunk header".to_string(),
    }
}

fn parse_range(part: &str, lineno: usize) -> Result<(usize, usize)> {
    let mut split = part.splitn(2, ',');
    let start = split
        .next()
        .unwrap_or("")
        .parse::<usize>()
        .map_err(|_| malformed_hunk_header(lineno))?;
    let len = match split.next() {
        Some(l) => l.parse::<usize>().map_err(|_| malformed_hunk_header(lineno))?,
        None => 1,
    };
    Ok((start, len))
}

fn parse_hunk(lines: &mut Lines<'_>, header_lineno: usize) -> Result<Hunk> {
    let (_, header_line) = lines.next().expect("peeked");
    let (old_start, old_line_count_hdr, new_start, new_line_count_hdr) =
        parse_hunk_header(header_line, header_lineno)?;

    let mut changes = Vec::new();
    let mut old_cursor = old_start;
    let mut new_cursor = new_start;

    while let Some(&(_, line)) = lines.peek() {
        if line.starts_with("@@") || line.starts_with("---") || line.starts_with("diff --git") {
            break;
        }
        let (marker, content) = line.split_at(line.len().min(1));
        match marker {
            "-" => {
                changes.push(Change::Delete { old_line: old_cursor, text: Line::new(content) });
                old_cursor += 1;
            }
            "+" => {
                changes.push(Change::Add { new_line: new_cursor, text: Line::new(content) });
                new_cursor += 1;
            }
            "\\" => {
                // "No newline at end of file" marker: not a content line.
            }
            " " | "" => {
                changes.push(Change::Normal {
                    old_line: old_cursor,
                    new_line: new_cursor,
                    text: Line::new(content),
                });
                old_cursor += 1;
                new_cursor += 1;
            }
            _ => break,
        }
        lines.next();
    }

    let old_line_count = changes.iter().filter(|c| !matches!(c, Change::Add { .. })).count();
    let new_line_count = changes.iter().filter(|c| !matches!(c, Change::Delete { .. })).count();
    debug_assert!(old_line_count_hdr == old_line_count || changes.is_empty());
    debug_assert!(new_line_count_hdr == new_line_count || changes.is_empty());

    let header = format!(
        "@@ -{}{} +{}{} @@",
        old_start,
        if old_line_count == 1 { String::new() } else { format!(",{old_line_count}") },
        new_start,
        if new_line_count == 1 { String::new() } else { format!(",{new_line_count}") },
    );

    Ok(Hunk {
        old_start,
        old_line_count,
        new_start,
        new_line_count,
        changes,
        header,
    })
}

/// Serializes `diff` back to unified-diff text. Each [`Hunk`]'s [`Change`]s
/// already carry their own line text, so this is a closed pipeline from a
/// [`crate::options::DiffResult`]'s hunks straight to patch text.
pub fn serialize(old_path: &str, new_path: &str, hunks: &[Hunk]) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- {old_path}\n"));
    out.push_str(&format!("+++ {new_path}\n"));
    for hunk in hunks {
        out.push_str(&hunk.header);
        out.push('\n');
        for change in &hunk.changes {
            let marker = match change {
                Change::Normal { .. } => ' ',
                Change::Add { .. } => '+',
                Change::Delete { .. } => '-',
            };
            out.push(marker);
            out.push_str(change.text());
            out.push('\n');
        }
    }
    out
}

/// Swaps add/delete and old/new throughout `diff`. Reversing twice is the
/// identity on every field.
pub fn reverse(diff: &UnifiedDiff) -> UnifiedDiff {
    UnifiedDiff {
        files: diff
            .files
            .iter()
            .map(|file| FileDiff {
                old_path: file.new_path.clone(),
                new_path: file.old_path.clone(),
                is_binary: file.is_binary,
                hunks: file.hunks.iter().map(reverse_hunk).collect(),
            })
            .collect(),
    }
}

fn reverse_hunk(hunk: &Hunk) -> Hunk {
    let changes = hunk
        .changes
        .iter()
        .map(|change| match change {
            Change::Normal { old_line, new_line, text } => Change::Normal {
                old_line: *new_line,
                new_line: *old_line,
                text: text.clone(),
            },
            Change::Add { new_line, text } => Change::Delete { old_line: *new_line, text: text.clone() },
            Change::Delete { old_line, text } => Change::Add { new_line: *old_line, text: text.clone() },
        })
        .collect();
    Hunk {
        old_start: hunk.new_start,
        old_line_count: hunk.new_line_count,
        new_start: hunk.old_start,
        new_line_count: hunk.old_line_count,
        changes,
        header: format_reversed_header(hunk),
    }
}

fn format_reversed_header(hunk: &Hunk) -> String {
    let old_part = if hunk.new_line_count == 1 {
        format!("{}", hunk.new_start)
    } else {
        format!("{},{}", hunk.new_start, hunk.new_line_count)
    };
    let new_part = if hunk.old_line_count == 1 {
        format!("{}", hunk.old_start)
    } else {
        format!("{},{}", hunk.old_start, hunk.old_line_count)
    };
    format!("@@ -{old_part} +{new_part} @@")
}

/// Applies `hunks` to `old_lines`, producing the new content. Each
/// `Add`/`Normal` change already carries its own line text.
pub fn apply(old_lines: &[&str], hunks: &[Hunk]) -> Vec<String> {
    let mut result = Vec::new();
    let mut old_cursor = 0usize; // 0-based index into old_lines

    for hunk in hunks {
        let prefix_end = hunk.old_start.saturating_sub(1);
        while old_cursor < prefix_end && old_cursor < old_lines.len() {
            result.push(old_lines[old_cursor].to_string());
            old_cursor += 1;
        }
        for change in &hunk.changes {
            match change {
                Change::Normal { text, .. } | Change::Add { text, .. } => {
                    result.push(text.as_str().to_string());
                }
                Change::Delete { .. } => {}
            }
            if !matches!(change, Change::Add { .. }) {
                old_cursor += 1;
            }
        }
    }
    while old_cursor < old_lines.len() {
        result.push(old_lines[old_cursor].to_string());
        old_cursor += 1;
    }
    result
}

/// A string is a well-formed unified diff iff it contains at least one hunk
/// header matching `@@ -\d+(,\d+)? +\d+(,\d+)? @@`.
pub fn validate(text: &str) -> bool {
    text.lines().any(is_hunk_header)
}

fn is_hunk_header(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("@@ -") else {
        return false;
    };
    let Some((old_part, rest)) = rest.split_once(' ') else {
        return false;
    };
    let Some(new_part) = rest.strip_prefix('+') else {
        return false;
    };
    let Some(new_part) = new_part.split(' ').next() else {
        return false;
    };
    rest.ends_with("@@") && is_range(old_part) && is_range(new_part)
}

fn is_range(part: &str) -> bool {
    let mut split = part.splitn(2, ',');
    let Some(start) = split.next() else { return false };
    if start.is_empty() || !start.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match split.next() {
        Some(len) => !len.is_empty() && len.chars().all(|c| c.is_ascii_digit()),
        None => true,
    }
}
