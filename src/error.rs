use std::path::PathBuf;

/// Why a single solver output line could not be decoded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("solver produced no output")]
    MissingPath,
    #[error("path record is empty")]
    EmptyPath,
    #[error("path record has an empty stop at position {0}")]
    EmptyPathStop(usize),
    #[error("path stop {0:?} contains an adjacency delimiter")]
    DelimiterInPath(String),
    #[error("adjacency record is empty")]
    EmptyRecord,
    #[error("adjacency record has no ':' after the source stop")]
    MissingColon,
    #[error("adjacency record has more than one ':'")]
    ExtraColon,
    #[error("adjacency record has an empty source stop")]
    EmptySource,
    #[error("destination {0} has an empty stop name")]
    EmptyDestination(usize),
    #[error("destination {0} has no '=' before its weight")]
    MissingWeight(usize),
    #[error("destination {0} has more than one '='")]
    ExtraEquals(usize),
    #[error("weight {0:?} is not a number")]
    InvalidWeight(String),
    #[error("weight {0} is negative or not finite")]
    WeightOutOfRange(f64),
}

/// Failures while turning the classified graph into an image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to parse SVG: {0}")]
    SvgParse(String),
    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    PngEncode(String),
    #[error("invalid background color {0:?}")]
    Background(String),
    #[error("failed to produce DOT output: {0}")]
    Dot(#[source] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The solver rejected its input. Holds the solver's line verbatim.
    #[error("{0}")]
    SolverValidation(String),
    #[error("failed to start solver {program:?}: {source}")]
    SolverSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read solver output: {0}")]
    SolverIo(#[source] std::io::Error),
    #[error("line {line}: {kind} ({text:?})")]
    Decode {
        line: usize,
        text: String,
        kind: DecodeErrorKind,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input file {} does not exist", .0.display())]
    MissingInput(PathBuf),
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
