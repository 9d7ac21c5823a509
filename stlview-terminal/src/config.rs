//! Viewer settings and command-line parsing

use std::path::PathBuf;

use nalgebra::Vector3;

/// Tunable settings for the terminal viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Frame rate the main loop aims for
    pub target_fps: u32,
    /// Drag units applied per arrow/WASD key press
    pub key_drag: f32,
    /// Wheel notches applied per +/- key press
    pub key_scroll: f32,
    /// Start with auto-rotation enabled
    pub animate: bool,
    /// Terminal cells are roughly twice as tall as they are wide
    pub cell_aspect: f32,
    pub light_position: Vector3<f32>,
    pub ambient_strength: f32,
    pub specular_strength: f32,
    pub shininess: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            key_drag: 10.0,
            key_scroll: 1.0,
            animate: false,
            cell_aspect: 2.0,
            light_position: Vector3::new(2.0, 2.0, 2.0),
            ambient_strength: 0.3,
            specular_strength: 0.5,
            shininess: 32.0,
        }
    }
}

/// Parsed command line: `stlview-terminal [--animate] [--fps N] [file.stl]`
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub path: Option<PathBuf>,
    pub config: ViewerConfig,
}

impl Args {
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut path = None;
        let mut config = ViewerConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--animate" => config.animate = true,
                "--fps" => {
                    let value = args.next().ok_or("--fps needs a value")?;
                    config.target_fps = value
                        .parse::<u32>()
                        .ok()
                        .filter(|fps| *fps > 0)
                        .ok_or_else(|| format!("invalid frame rate: {}", value))?;
                }
                flag if flag.starts_with("--") => return Err(format!("unknown option: {}", flag)),
                _ if path.is_some() => return Err("only one STL file can be shown".to_string()),
                _ => path = Some(PathBuf::from(&arg)),
            }
        }

        Ok(Self { path, config })
    }
}
