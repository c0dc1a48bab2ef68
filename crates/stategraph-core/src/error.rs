pub type Result<T> = std::result::Result<T, Error>;

/// Which end of a link failed identity resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEndpoint {
    Source,
    Target,
}

impl std::fmt::Display for LinkEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkEndpoint::Source => f.write_str("source"),
            LinkEndpoint::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A link references a node that is not part of the graph.
    #[error("invalid graph: link #{link_index} has unknown {endpoint} `{node_id}`")]
    InvalidGraph {
        link_index: usize,
        endpoint: LinkEndpoint,
        node_id: String,
    },

    #[error("invalid graph: duplicate node id `{id}`")]
    DuplicateNode { id: String },

    #[error("invalid graph: initial state `{init_state_id}` matches no node")]
    UnknownInitialState { init_state_id: String },

    #[error("invalid graph: node `{id}` has a non-finite or negative position ({x}, {y})")]
    InvalidPosition { id: String, x: f64, y: f64 },

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
