//! Comment elision run before tokenization.
//!
//! Comments are overwritten with spaces, newlines are kept, so offsets into
//! the normalized text are offsets into the original source as well.
//!
//! A `%*` block comment is elided up to the first `*%` when it closes on the
//! line it opens, or when its body holds no other `%`. A multiline body with
//! another `%` in it degrades: the opener is read as a plain line comment
//! and everything after its line is source again, which usually leaves the
//! parser to resynchronize on the next `.`.

use std::fmt;

use thiserror::Error;

use crate::lexer::line_col;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Text,
    BlockComment,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::Text => write!(f, "text literal"),
            LiteralKind::BlockComment => write!(f, "block comment"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unterminated {kind} opened at {line}:{column}")]
pub struct UnterminatedLiteral {
    pub kind: LiteralKind,
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Source with comments blanked out, truncated at an unterminated literal.
    pub text: String,
    /// Error to report once every clause before it has been produced.
    pub unterminated: Option<UnterminatedLiteral>,
}

#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn normalize(source: &str) -> Normalized {
    let bytes = source.as_bytes();
    let mut text = String::with_capacity(source.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => match closing_quote(bytes, i) {
                Some(end) => {
                    text.push_str(&source[i..=end]);
                    i = end + 1;
                }
                None => return unterminated(source, text, LiteralKind::Text, i),
            },
            b'%' if bytes.get(i + 1) == Some(&b'*') => {
                let body_start = i + 2;
                match source[body_start..].find("*%") {
                    Some(len) if elided_whole(&source[body_start..body_start + len]) => {
                        let end = body_start + len + 2;
                        blank(&mut text, &source[i..end]);
                        i = end;
                    }
                    Some(_) => {
                        tracing::debug!(position = i, "block comment is not elided as a whole");
                        i = line_comment(source, &mut text, i);
                    }
                    None => return unterminated(source, text, LiteralKind::BlockComment, i),
                }
            }
            b'%' => i = line_comment(source, &mut text, i),
            _ => {
                let ch = source[i..].chars().next().unwrap_or(' ');
                text.push(ch);
                i += ch.len_utf8();
            }
        }
    }
    Normalized {
        text,
        unterminated: None,
    }
}

fn elided_whole(body: &str) -> bool {
    !body.contains('\n') || !body.contains('%')
}

/// Index of the quote closing the text literal opened at `open`.
fn closing_quote(bytes: &[u8], open: usize) -> Option<usize> {
    let mut j = open + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return Some(j),
            _ => j += 1,
        }
    }
    None
}

/// Blanks from `start` up to the end of its line, returns where to resume.
fn line_comment(source: &str, text: &mut String, start: usize) -> usize {
    let end = source[start..]
        .find('\n')
        .map_or(source.len(), |len| start + len);
    blank(text, &source[start..end]);
    end
}

fn blank(text: &mut String, comment: &str) {
    for ch in comment.chars() {
        match ch {
            '\n' | '\r' => text.push(ch),
            _ => text.extend(std::iter::repeat(' ').take(ch.len_utf8())),
        }
    }
}

fn unterminated(source: &str, text: String, kind: LiteralKind, position: usize) -> Normalized {
    let (line, column) = line_col(source, position);
    tracing::debug!(%kind, line, column, "unterminated literal, truncating input");
    Normalized {
        text,
        unterminated: Some(UnterminatedLiteral {
            kind,
            position,
            line,
            column,
        }),
    }
}
