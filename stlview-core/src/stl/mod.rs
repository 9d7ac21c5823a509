//! STL file loading for binary and ASCII formats

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::error::LoadError;
use crate::geometry::Mesh;

pub mod ascii;
pub mod binary;

pub use ascii::parse_ascii_stl;
pub use binary::parse_binary_stl;

/// Which of the two STL layouts a file uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlFormat {
    Binary,
    Text,
}

impl fmt::Display for StlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StlFormat::Binary => f.write_str("binary"),
            StlFormat::Text => f.write_str("text"),
        }
    }
}

/// Decide between the binary and text layouts.
///
/// A leading `solid` line only suggests text: binary headers are free-form
/// and sometimes start with the same word. An exact match between the file
/// length and the size implied by the binary triangle count always wins.
pub fn detect(data: &[u8]) -> StlFormat {
    let looks_like_text = data.starts_with(b"solid") && {
        let first_line = data.split(|&b| b == b'\n').next().unwrap_or_default();
        let first_line = String::from_utf8_lossy(first_line);
        let first_line = first_line.trim();
        first_line == "solid" || first_line.contains("solid ")
    };

    let Some(count) = binary::declared_count(data) else {
        debug!("{} bytes is too short for binary STL", data.len());
        return StlFormat::Text;
    };

    let expected = (binary::HEADER_LEN + 4) as u64 + u64::from(count) * binary::RECORD_LEN as u64;
    if expected == data.len() as u64 {
        if looks_like_text {
            debug!("file starts with 'solid' but matches binary size for {} triangles", count);
        }
        StlFormat::Binary
    } else {
        debug!(
            "binary size mismatch (expected {}, actual {}), text prefix: {}",
            expected,
            data.len(),
            looks_like_text
        );
        StlFormat::Text
    }
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    let format = detect(data);
    let mesh = match format {
        StlFormat::Binary => parse_binary_stl(data)?,
        StlFormat::Text => parse_ascii_stl(data)?,
    };

    let degenerate = mesh.degenerate_count();
    if degenerate > 0 {
        warn!("{} of {} triangles are degenerate and have no normal", degenerate, mesh.len());
    }
    debug!("parsed {} triangles from {} STL", mesh.len(), format);

    Ok(mesh)
}

/// Read and parse an STL file from disk.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_stl(&data)?;
    info!("Loaded: {} ({} triangles)", path.display(), mesh.len());
    Ok(mesh)
}
