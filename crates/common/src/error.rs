use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A header or data line did not parse as the required integer tuple.
    #[error("Malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// An edge references a vertex outside `[0, vertex_count)`.
    #[error(
        "Vertex {vertex} is out of range for a graph with {vertex_count} vertices{}",
        at_line(.line)
    )]
    VertexOutOfRange {
        vertex: i64,
        vertex_count: usize,
        line: Option<usize>,
    },

    /// The requested source vertex does not exist in the graph.
    #[error("Source vertex {vertex} is invalid for a graph with {vertex_count} vertices")]
    InvalidSource { vertex: usize, vertex_count: usize },

    /// A shortest distance, last set through arc `from -> to`, does not fit in an `i64`.
    #[error("Distance overflow at arc {from} -> {to}")]
    DistanceOverflow { from: usize, to: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" (line {n})"),
        None => String::new(),
    }
}

/// Raised by the numeric kernel when a sum leaves the `i128` working range or
/// a distance does not narrow back to `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("distance arithmetic overflowed")]
pub struct ArithmeticOverflow;

/// Raised when a report field is neither an integer nor the `INF` marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a distance (expected an integer or `INF`)")]
pub struct ParseDistanceError(pub String);
