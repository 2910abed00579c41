use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use common::error::Error;
use common::types::{Edge, Graph};
use tracing::{debug, instrument, warn};

/// How each `u v w` line of an edge-list file becomes arcs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeMode {
    /// Each line yields `(u, v, w)` followed by `(v, u, w)`.
    ///
    /// The reverse arc carries the same weight, so a single negative line is
    /// a negative 2-cycle `u -> v -> u` as far as the solver is concerned.
    #[default]
    Undirected,
    /// Each line yields exactly `(u, v, w)`.
    Directed,
}

/// Parses edge-list text into a [`Graph`].
///
/// The expected input is a header line `V E` (vertex count and an advisory
/// edge count) followed by one `u v w` line per edge, all fields integers.
/// Blank lines are skipped. Any malformed line or out-of-range vertex aborts
/// the whole load; a partially built graph is never returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphLoader {
    mode: EdgeMode,
}

impl GraphLoader {
    pub fn new(mode: EdgeMode) -> Self {
        GraphLoader { mode }
    }

    /// Opens `path` and loads it. The file handle is dropped before this
    /// returns, whether or not parsing succeeded.
    #[instrument(skip(self, path), fields(path = %path.display(), mode = ?self.mode))]
    pub fn load_path(&self, path: &Path) -> Result<Graph, Error> {
        let file = File::open(path)?;
        self.load_reader(BufReader::new(file))
    }

    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<Graph, Error> {
        let mut lines = reader.lines().enumerate().map(|(i, line)| (i + 1, line));

        let mut last_line = 0;
        let mut header = None;
        for (line_no, line) in lines.by_ref() {
            let text = read_line(line_no, line)?;
            last_line = line_no;
            if text.trim().is_empty() {
                continue;
            }
            header = Some(parse_header(line_no, &text)?);
            break;
        }

        let (vertex_count, nominal_edges) = header.ok_or_else(|| Error::MalformedInput {
            line: last_line + 1,
            reason: "missing `V E` header line".to_string(),
        })?;

        let mut edges: Vec<Edge> = Vec::new();
        let mut data_lines = 0usize;

        for (line_no, line) in lines {
            let text = read_line(line_no, line)?;
            if text.trim().is_empty() {
                continue;
            }

            let [u, v, w] = parse_fields::<3>(line_no, &text, "three integers `u v w`")?;
            let u = check_vertex(u, vertex_count, line_no)?;
            let v = check_vertex(v, vertex_count, line_no)?;
            data_lines += 1;

            match self.mode {
                EdgeMode::Undirected => {
                    edges.push((u, v, w));
                    edges.push((v, u, w));
                }
                EdgeMode::Directed => edges.push((u, v, w)),
            }
        }

        if data_lines != nominal_edges {
            warn!(
                nominal = nominal_edges,
                found = data_lines,
                "Header edge count does not match the number of edge lines"
            );
        }

        let graph = Graph::from_edges(vertex_count, edges)?;
        debug!(
            vertices = graph.vertex_count(),
            arcs = graph.edge_count(),
            "Graph loaded"
        );
        Ok(graph)
    }
}

fn read_line(line_no: usize, line: io::Result<String>) -> Result<String, Error> {
    line.map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => malformed(line_no, "line is not valid UTF-8".to_string()),
        _ => Error::Io(e),
    })
}

fn parse_header(line_no: usize, text: &str) -> Result<(usize, usize), Error> {
    let [v, e] = parse_fields::<2>(line_no, text, "two integers `V E`")?;
    let vertex_count = usize::try_from(v)
        .map_err(|_| malformed(line_no, format!("vertex count {v} is negative")))?;
    let nominal_edges = usize::try_from(e)
        .map_err(|_| malformed(line_no, format!("edge count {e} is negative")))?;
    Ok((vertex_count, nominal_edges))
}

fn parse_fields<const N: usize>(line_no: usize, text: &str, expected: &str) -> Result<[i64; N], Error> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != N {
        return Err(malformed(
            line_no,
            format!("expected {expected}, found {} field(s)", tokens.len()),
        ));
    }

    let mut fields = [0i64; N];
    for (slot, token) in fields.iter_mut().zip(&tokens) {
        *slot = token
            .parse()
            .map_err(|_| malformed(line_no, format!("`{token}` is not an integer")))?;
    }
    Ok(fields)
}

fn check_vertex(vertex: i64, vertex_count: usize, line_no: usize) -> Result<usize, Error> {
    usize::try_from(vertex)
        .ok()
        .filter(|&id| id < vertex_count)
        .ok_or(Error::VertexOutOfRange {
            vertex,
            vertex_count,
            line: Some(line_no),
        })
}

fn malformed(line: usize, reason: String) -> Error {
    Error::MalformedInput { line, reason }
}
