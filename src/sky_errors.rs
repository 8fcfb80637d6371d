use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the edges of the crate: shared region attach, configuration and star
/// catalog files, body lookups by name and the system clock. The computational core never
/// returns these.
#[derive(Error, Debug)]
pub enum SkyError {
    #[error("Unable to access shared ephemeris region {path}: {source}")]
    SharedRegionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shared ephemeris region {0} has an invalid header (magic or version mismatch)")]
    SharedRegionHeader(PathBuf),

    #[error("Shared ephemeris region {path} is too small: expected {expected} bytes, found {found}")]
    SharedRegionSize {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Failed to read config: {0}")]
    ConfigRead(#[source] std::io::Error),

    #[error("Failed to write config: {0}")]
    ConfigWrite(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[source] ron::error::SpannedError),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[source] ron::Error),

    #[error("System clock unavailable: {0}")]
    SystemClock(String),

    #[error("Unknown celestial body: {0}")]
    UnknownBody(String),

    #[error("Invalid star record at line {line}: {content:?}")]
    StarParse { line: usize, content: String },

    #[error("Unable to read star catalog {path}: {source}")]
    StarCatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PartialEq for SkyError {
    fn eq(&self, other: &Self) -> bool {
        use SkyError::*;
        match (self, other) {
            (SharedRegionIo { path: a, .. }, SharedRegionIo { path: b, .. }) => a == b,
            (SharedRegionHeader(a), SharedRegionHeader(b)) => a == b,
            (
                SharedRegionSize {
                    path: pa,
                    expected: ea,
                    found: fa,
                },
                SharedRegionSize {
                    path: pb,
                    expected: eb,
                    found: fb,
                },
            ) => pa == pb && ea == eb && fa == fb,

            // io / ron errors are not comparable: same variant is enough
            (ConfigRead(_), ConfigRead(_)) => true,
            (ConfigWrite(_), ConfigWrite(_)) => true,
            (ConfigParse(_), ConfigParse(_)) => true,
            (ConfigSerialize(_), ConfigSerialize(_)) => true,

            (SystemClock(a), SystemClock(b)) => a == b,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (
                StarParse {
                    line: la,
                    content: ca,
                },
                StarParse {
                    line: lb,
                    content: cb,
                },
            ) => la == lb && ca == cb,
            (StarCatalogRead { path: a, .. }, StarCatalogRead { path: b, .. }) => a == b,
            _ => false,
        }
    }
}
