//! stlview terminal viewer
//!
//! Usage: stlview-terminal [--animate] [--fps N] [file.stl]
//! Without a file a demo cube is shown.
//! Controls:
//!   - WASD / Arrow Keys: Rotate
//!   - +/-: Zoom
//!   - 0: Reset view
//!   - Space: Toggle auto-rotation
//!   - O: Toggle orthographic projection
//!   - Q/ESC: Quit

use log::{error, info};
use nalgebra::Vector3;
use std::io;
use stlview_core::{load_mesh, normalize, Mesh};
use stlview_terminal::{Args, TerminalApp};

fn main() -> io::Result<()> {
    env_logger::init();

    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("Usage: stlview-terminal [--animate] [--fps N] [file.stl]");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let (mesh, title) = match &args.path {
        Some(path) => {
            println!("Loading STL file: {}", path.display());
            let mesh = load_mesh(path).map_err(|e| {
                error!("{}", e);
                io::Error::new(io::ErrorKind::InvalidData, format!("Failed to load STL file: {}", e))
            })?;
            let title = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            (mesh, title)
        }
        None => {
            info!("no STL file given, showing demo cube");
            (Mesh::cube(2.0, Vector3::zeros()), "cube".to_string())
        }
    };

    let normalized = normalize(&mesh);
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(normalized, title, args.config)?;
    app.run()?;

    Ok(())
}
