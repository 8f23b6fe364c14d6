//! Text graph format.
//!
//! ```text
//! N M
//! u v w     ← M lines: 1-based source, 1-based target, i32 weight
//! ```
//!
//! Blank lines are skipped. Anything after the M-th edge line is ignored.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::error::GraphError;

use super::{Edge, EdgeList, Weight};

/// Read and parse a graph file.
///
/// # Errors
///
/// Returns [`GraphError::Io`] if the file cannot be read, or any error from
/// [`parse_graph`].
#[instrument]
pub fn read_graph(path: &Path) -> Result<EdgeList, GraphError> {
    let text = fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_graph(&text)
}

/// Parse the text graph format into a 0-based [`EdgeList`].
///
/// # Errors
///
/// - [`GraphError::Parse`] for a bad header or edge line (1-based line number).
/// - [`GraphError::MissingEdges`] when fewer than `M` edge lines are present.
pub fn parse_graph(text: &str) -> Result<EdgeList, GraphError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Err(GraphError::Parse {
            line: 1,
            reason: "missing `N M` header".to_string(),
        });
    };

    let mut fields = Fields::new(header_line, header);
    let node_count: usize = fields.next("node count")?;
    let edge_count: usize = fields.next("edge count")?;
    fields.finish()?;

    let mut list = EdgeList::new(node_count);
    // Cap the reservation: M comes from untrusted input.
    list.edges.reserve(edge_count.min(1 << 20));

    for (line, text) in lines.take(edge_count) {
        let mut fields = Fields::new(line, text);
        let source = node_id(&mut fields, "source", node_count)?;
        let target = node_id(&mut fields, "target", node_count)?;
        let weight: i32 = fields.next("weight")?;
        fields.finish()?;
        list.edges.push(Edge::new(source, target, Weight::from(weight)));
    }

    if list.edges.len() < edge_count {
        return Err(GraphError::MissingEdges {
            expected: edge_count,
            found: list.edges.len(),
        });
    }

    debug!(nodes = node_count, edges = edge_count, "parsed graph");
    Ok(list)
}

/// Parse a 1-based node id and convert it to a 0-based index.
fn node_id(fields: &mut Fields<'_>, what: &str, node_count: usize) -> Result<usize, GraphError> {
    let id: usize = fields.next(what)?;
    if id == 0 || id > node_count {
        return Err(fields.error(format!("{what} node {id} outside 1..={node_count}")));
    }
    Ok(id - 1)
}

/// Whitespace-separated fields of one input line.
struct Fields<'a> {
    line: usize,
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(line: usize, text: &'a str) -> Self {
        Self {
            line,
            tokens: text.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T, GraphError> {
        let Some(token) = self.tokens.next() else {
            return Err(self.error(format!("missing {what}")));
        };
        token
            .parse()
            .map_err(|_| self.error(format!("invalid {what} `{token}`")))
    }

    fn finish(mut self) -> Result<(), GraphError> {
        match self.tokens.next() {
            Some(extra) => Err(self.error(format!("unexpected trailing field `{extra}`"))),
            None => Ok(()),
        }
    }

    fn error(&self, reason: String) -> GraphError {
        GraphError::Parse {
            line: self.line,
            reason,
        }
    }
}
