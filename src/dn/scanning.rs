//! Splitting DN strings at structural delimiters.
//!
//! Splitting is done by a small state machine instead of a backtracking grammar so that its cost
//! stays linear even on long runs of backslashes.


#[cfg(feature = "tracing")] use tracing::{instrument, trace};

use crate::dn::ParseErrorKind;
#[cfg(not(feature = "tracing"))] use crate::no_trace as trace;


/// A piece of a DN string between two delimiters.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Piece<'a> {
    /// The content, with unescaped surrounding whitespace removed.
    pub text: &'a str,

    /// The byte position of `text` within the complete input.
    pub index: usize,

    /// The whitespace between the preceding delimiter (or the start) and `text`.
    pub leading: &'a str,

    /// The whitespace between `text` and the following delimiter (or the end).
    pub trailing: &'a str,
}


#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum ScanState {
    Normal,
    Escaped,
    Quoted,
    QuotedEscaped,
}


/// Splits `input` at every delimiter that is neither escaped nor within a quoted region.
///
/// `offset` is the position of `input` within the complete string and is added to all reported
/// positions. At most `max_pieces` pieces are returned; once that many have been started, further
/// delimiters are treated as content.
#[cfg_attr(feature = "tracing", instrument(skip_all))]
pub(crate) fn split_unescaped<'a>(
    input: &'a str,
    offset: usize,
    delimiters: &[char],
    max_pieces: usize,
) -> Result<Vec<Piece<'a>>, ParseErrorKind> {
    trace!("splitting {:?} at {:?}", input, delimiters);

    let mut pieces = Vec::new();
    let mut state = ScanState::Normal;
    let mut piece_start = 0;
    let mut content: Option<(usize, usize)> = None;
    let mut escape_start = 0;
    let mut quote_start = 0;

    for (i, c) in input.char_indices() {
        let end = i + c.len_utf8();
        match state {
            ScanState::Normal => {
                if delimiters.contains(&c) && pieces.len() + 1 < max_pieces {
                    pieces.push(make_piece(input, offset, piece_start, i, content));
                    piece_start = end;
                    content = None;
                    continue;
                }
                if c.is_whitespace() {
                    continue;
                }
                extend_content(&mut content, i, end);
                if c == '\\' {
                    escape_start = i;
                    state = ScanState::Escaped;
                } else if c == '"' {
                    quote_start = i;
                    state = ScanState::Quoted;
                }
            },
            ScanState::Escaped => {
                extend_content(&mut content, i, end);
                state = ScanState::Normal;
            },
            ScanState::Quoted => {
                extend_content(&mut content, i, end);
                if c == '\\' {
                    state = ScanState::QuotedEscaped;
                } else if c == '"' {
                    state = ScanState::Normal;
                }
            },
            ScanState::QuotedEscaped => {
                extend_content(&mut content, i, end);
                state = ScanState::Quoted;
            },
        }
    }

    match state {
        ScanState::Normal => {},
        ScanState::Escaped => return Err(ParseErrorKind::DanglingEscape { pos: offset + escape_start }),
        ScanState::Quoted|ScanState::QuotedEscaped
            => return Err(ParseErrorKind::UnterminatedQuote { pos: offset + quote_start }),
    }

    pieces.push(make_piece(input, offset, piece_start, input.len(), content));
    Ok(pieces)
}

fn extend_content(content: &mut Option<(usize, usize)>, start: usize, end: usize) {
    match content {
        Some((_, content_end)) => *content_end = end,
        None => *content = Some((start, end)),
    }
}

fn make_piece(input: &str, offset: usize, start: usize, end: usize, content: Option<(usize, usize)>) -> Piece<'_> {
    match content {
        Some((content_start, content_end)) => Piece {
            text: &input[content_start..content_end],
            index: offset + content_start,
            leading: &input[start..content_start],
            trailing: &input[content_end..end],
        },
        None => Piece {
            text: &input[end..end],
            index: offset + end,
            leading: &input[start..end],
            trailing: &input[end..end],
        },
    }
}
