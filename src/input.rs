use crate::error::{DecodeErrorKind, Error, Result};
use crate::graph::RouteGraph;
use crate::types::{Route, Stop};
use std::path::Path;
use tracing::debug;

/// One adjacency line of the solver dump: a source stop and its weighted destinations.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjacencyRecord {
    pub source: Stop,
    pub destinations: Vec<(Stop, f64)>,
}

/// Everything the solver printed, decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    pub records: Vec<AdjacencyRecord>,
    pub route: Route,
}

impl Decoded {
    /// All `(source, destination, weight)` triples in output order.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.records.iter().flat_map(|record| {
            record
                .destinations
                .iter()
                .map(move |(dest, weight)| (record.source.as_str(), dest.as_str(), *weight))
        })
    }

    /// Folds the records into a graph. See [`RouteGraph::from_records`].
    pub fn graph(&self) -> RouteGraph {
        RouteGraph::from_records(&self.records)
    }
}

/// Decodes a captured solver dump.
///
/// Solver output format:
/// - every line but the last is an adjacency record `node:dest=weight/dest=weight/`,
/// - the last line is the shortest route `node-node-node`.
///
/// Lines are trimmed before decoding. The first malformed line aborts decoding.
///
/// Example input:
/// ```text
/// Stop1:Stop2=3.0/
/// Stop2:Stop1=3.0/Stop3=4.0/
/// Stop1-Stop2-Stop3
/// ```
pub fn decode<S: AsRef<str>>(lines: &[S]) -> Result<Decoded> {
    let Some((last, rest)) = lines.split_last() else {
        return Err(Error::Decode {
            line: 0,
            text: String::new(),
            kind: DecodeErrorKind::MissingPath,
        });
    };

    let mut records = Vec::with_capacity(rest.len());
    for (i, line) in rest.iter().enumerate() {
        let text = line.as_ref().trim();
        let record = parse_adjacency(text).map_err(|kind| Error::Decode {
            line: i + 1,
            text: text.to_string(),
            kind,
        })?;
        records.push(record);
    }

    let text = last.as_ref().trim();
    let route = parse_route(text).map_err(|kind| Error::Decode {
        line: lines.len(),
        text: text.to_string(),
        kind,
    })?;

    debug!(records = records.len(), route = %route, "decoded solver output");
    Ok(Decoded { records, route })
}

/// This is equivalent to [`decode`], but takes the whole dump as one string.
pub fn from_str(input: &str) -> Result<Decoded> {
    let lines: Vec<&str> = input.lines().collect();
    decode(&lines)
}

/// Decodes a solver dump previously saved to a file.
pub fn from_file(path: impl AsRef<Path>) -> Result<Decoded> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_str(&input)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Colon,
    Slash,
    Equals,
}

/// Splits an adjacency line on `:`, `/` and `=`. Text between delimiters is kept untrimmed.
fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, c) in line.char_indices() {
        let delimiter = match c {
            ':' => Token::Colon,
            '/' => Token::Slash,
            '=' => Token::Equals,
            _ => continue,
        };
        if start < i {
            tokens.push(Token::Text(&line[start..i]));
        }
        tokens.push(delimiter);
        start = i + c.len_utf8();
    }
    if start < line.len() {
        tokens.push(Token::Text(&line[start..]));
    }
    tokens
}

/// Parses `node:dest=weight/dest=weight/`. A trailing `/` is optional and adds nothing.
pub fn parse_adjacency(line: &str) -> std::result::Result<AdjacencyRecord, DecodeErrorKind> {
    if line.trim().is_empty() {
        return Err(DecodeErrorKind::EmptyRecord);
    }

    let tokens = tokenize(line);
    let mut it = tokens.into_iter();

    let source = match it.next() {
        Some(Token::Text(text)) => text.trim(),
        Some(Token::Colon) => return Err(DecodeErrorKind::EmptySource),
        _ => return Err(DecodeErrorKind::MissingColon),
    };
    if source.is_empty() {
        return Err(DecodeErrorKind::EmptySource);
    }
    match it.next() {
        Some(Token::Colon) => {}
        _ => return Err(DecodeErrorKind::MissingColon),
    }

    if no_destinations(it.clone()) {
        return Ok(AdjacencyRecord {
            source: source.to_string(),
            destinations: Vec::new(),
        });
    }

    let mut destinations = Vec::new();
    loop {
        let position = destinations.len() + 1;
        let name = match it.next() {
            None => break,
            Some(Token::Text(text)) => text.trim(),
            Some(Token::Colon) => return Err(DecodeErrorKind::ExtraColon),
            Some(Token::Slash) | Some(Token::Equals) => {
                return Err(DecodeErrorKind::EmptyDestination(position));
            }
        };
        if name.is_empty() {
            return Err(DecodeErrorKind::EmptyDestination(position));
        }

        match it.next() {
            Some(Token::Equals) => {}
            Some(Token::Colon) => return Err(DecodeErrorKind::ExtraColon),
            _ => return Err(DecodeErrorKind::MissingWeight(position)),
        }

        let weight = match it.next() {
            Some(Token::Text(text)) => parse_weight(text)?,
            Some(Token::Equals) => return Err(DecodeErrorKind::ExtraEquals(position)),
            Some(Token::Colon) => return Err(DecodeErrorKind::ExtraColon),
            Some(Token::Slash) | None => return Err(DecodeErrorKind::InvalidWeight(String::new())),
        };
        destinations.push((name.to_string(), weight));

        match it.next() {
            None => break,
            Some(Token::Slash) => {}
            Some(Token::Equals) => return Err(DecodeErrorKind::ExtraEquals(position)),
            Some(Token::Colon) => return Err(DecodeErrorKind::ExtraColon),
            // tokenize never yields two adjacent texts
            Some(Token::Text(_)) => unreachable!("adjacent text tokens"),
        }
    }

    Ok(AdjacencyRecord {
        source: source.to_string(),
        destinations,
    })
}

/// `A:`, `A:/` and `A: /` all register `A` alone: blanks and at most one slash.
fn no_destinations<'a>(rest: impl Iterator<Item = Token<'a>>) -> bool {
    let mut slashes = 0;
    for token in rest {
        match token {
            Token::Text(text) if text.trim().is_empty() => {}
            Token::Slash if slashes == 0 => slashes += 1,
            _ => return false,
        }
    }
    true
}

fn parse_weight(text: &str) -> std::result::Result<f64, DecodeErrorKind> {
    let text = text.trim();
    let weight: f64 = text
        .parse()
        .map_err(|_| DecodeErrorKind::InvalidWeight(text.to_string()))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(DecodeErrorKind::WeightOutOfRange(weight));
    }
    Ok(weight)
}

/// Parses `node-node-node`. Every stop must be non-empty.
pub fn parse_route(line: &str) -> std::result::Result<Route, DecodeErrorKind> {
    if line.trim().is_empty() {
        return Err(DecodeErrorKind::EmptyPath);
    }

    let mut stops = Vec::new();
    for (i, segment) in line.split('-').enumerate() {
        let stop = segment.trim();
        if stop.is_empty() {
            return Err(DecodeErrorKind::EmptyPathStop(i + 1));
        }
        // an adjacency record in last position means the solver found no route
        if stop.contains([':', '/', '=']) {
            return Err(DecodeErrorKind::DelimiterInPath(stop.to_string()));
        }
        stops.push(stop.to_string());
    }

    Route::new(stops).ok_or(DecodeErrorKind::EmptyPath)
}
