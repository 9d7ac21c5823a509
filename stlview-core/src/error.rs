use std::io;
use std::path::PathBuf;

use crate::stl::StlFormat;

/// Errors that abort an STL load. No variant ever comes with a partial mesh.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt binary STL{}: {reason}", at_triangle(.triangle))]
    CorruptFile {
        triangle: Option<u32>,
        reason: String,
    },

    #[error("line {line}: {reason} ({content:?})")]
    Parse {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("no triangles found in {format} STL")]
    EmptyResult { format: StlFormat },
}

impl LoadError {
    pub(crate) fn corrupt(triangle: Option<u32>, reason: impl Into<String>) -> Self {
        LoadError::CorruptFile {
            triangle,
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(line: usize, content: &str, reason: impl Into<String>) -> Self {
        LoadError::Parse {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }
}

fn at_triangle(triangle: &Option<u32>) -> String {
    match triangle {
        Some(index) => format!(" at triangle {}", index),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_message_includes_index() {
        let err = LoadError::corrupt(Some(7), "unexpected end of data");
        assert_eq!(
            err.to_string(),
            "corrupt binary STL at triangle 7: unexpected end of data"
        );
    }

    #[test]
    fn test_parse_message_quotes_line() {
        let err = LoadError::parse(4, "endfacet", "'endfacet' with unclosed loop");
        assert_eq!(
            err.to_string(),
            "line 4: 'endfacet' with unclosed loop (\"endfacet\")"
        );
    }
}
