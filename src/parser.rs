//! A `nom`-based parser for dotted path expressions.
use crate::ast::{PathExpr, Segment};
use crate::error::PathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, take_while1},
    character::complete::{char, u64 as nom_u64},
    combinator::{all_consuming, opt, recognize, rest, verify},
    multi::{many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};

/// Upper bound on the number of segments in a single path. Resolution
/// recurses once per segment, so this also bounds the stack depth.
pub(crate) const MAX_SEGMENTS: usize = 128;

// --- Main Public Parsers ---

/// Splits a path into raw, unclassified segments.
///
/// The separator is `.`, a `.` inside a pair of double quotes is literal,
/// and one layer of surrounding quotes is stripped from each piece:
/// `aaa.bbb."ccc ddd".eee` becomes `["aaa", "bbb", "ccc ddd", "eee"]`.
pub fn split_path(path: &str) -> Result<Vec<String>, PathError> {
    if path.is_empty() {
        return Err(PathError::EmptyPath);
    }
    let segments = match raw_segments(path) {
        Ok(("", segments)) => segments,
        Ok((remainder, _)) => return Err(PathError::InvalidSegment(remainder.to_string())),
        Err(_) => return Err(PathError::InvalidSegment(path.to_string())),
    };
    if segments.len() > MAX_SEGMENTS {
        return Err(PathError::TooManySegments {
            count: segments.len(),
            max: MAX_SEGMENTS,
        });
    }
    Ok(segments.into_iter().map(strip_quotes).collect())
}

/// Splits a path and classifies every segment, yielding a full expression.
pub fn parse_path(path: &str) -> Result<PathExpr, PathError> {
    let segments = split_path(path)?
        .iter()
        .map(|raw| classify_segment(raw))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PathExpr { segments })
}

/// Classifies one raw segment as a key, an index, or a predicate.
///
/// A segment without `[` is always a literal key. `[<digits>]` is an index.
/// `[(name:)?field(=value)?]` is a predicate. Anything else containing `[`
/// is malformed.
pub fn classify_segment(raw: &str) -> Result<Segment, PathError> {
    if !raw.contains('[') {
        return Ok(Segment::Key(raw.to_string()));
    }
    if let Some(index) = parse_index(raw) {
        return Ok(Segment::Index(index));
    }
    predicate_segment(raw).ok_or_else(|| PathError::InvalidSegment(raw.to_string()))
}

/// Parses a segment of the exact form `[<digits>]`.
pub(crate) fn parse_index(raw: &str) -> Option<usize> {
    let result: IResult<&str, u64> =
        all_consuming(delimited(char('['), nom_u64, char(']'))).parse(raw);
    match result {
        Ok((_, index)) => Some(index as usize),
        Err(_) => None,
    }
}

// --- Combinators ---

/// A quoted span, kept verbatim (quotes included) so the separator split
/// never sees the dots inside it.
fn quoted_span(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('"'), opt(is_not("\"")), char('"'))).parse(input)
}

fn plain_span(input: &str) -> IResult<&str, &str> {
    is_not(".\"").parse(input)
}

fn raw_segment(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((quoted_span, plain_span)))).parse(input)
}

fn raw_segments(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char('.'), raw_segment).parse(input)
}

/// A name made of word characters, as in `name:` prefixes and filter fields.
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)
}

fn predicate_segment(raw: &str) -> Option<Segment> {
    let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
    let result: IResult<&str, (Option<&str>, (&str, Option<&str>))> = all_consuming(pair(
        opt(terminated(word, char(':'))),
        pair(
            word,
            opt(preceded(char('='), verify(rest, |s: &str| !s.is_empty()))),
        ),
    ))
    .parse(inner);
    let (_, (capture, (field, value))) = result.ok()?;
    Some(Segment::Predicate {
        capture: capture.unwrap_or(field).to_string(),
        field: field.to_string(),
        value: value.map(str::to_string),
    })
}

fn strip_quotes(raw: &str) -> String {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
        .to_string()
}
