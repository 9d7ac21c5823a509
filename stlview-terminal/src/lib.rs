//! Terminal-based STL viewer

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::debug;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use stlview_core::{Camera, NormalizedMesh, Transform, ViewControls};

pub mod config;
pub mod renderer;

pub use config::{Args, ViewerConfig};
pub use renderer::{AsciiRenderer, Lighting};

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: NormalizedMesh,
    title: String,
    config: ViewerConfig,
    controls: ViewControls,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: NormalizedMesh, title: String, config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut controls = ViewControls::new();
        controls.animating = config.animate;

        Ok(Self {
            camera: Camera::new(width as f32, height as f32 * config.cell_aspect),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            mesh,
            title,
            config,
            controls,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.target_fps.max(1)));

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.controls.tick();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                debug!("terminal resized to {}x{}", width, height);
                self.camera
                    .resize(width as f32, height as f32 * self.config.cell_aspect);
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let step = self.config.key_drag;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.controls.drag(0.0, -step),
            KeyCode::Char('s') | KeyCode::Down => self.controls.drag(0.0, step),
            KeyCode::Char('a') | KeyCode::Left => self.controls.drag(-step, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.controls.drag(step, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.controls.scroll(self.config.key_scroll),
            KeyCode::Char('-') => self.controls.scroll(-self.config.key_scroll),
            KeyCode::Char('0') => self.controls.reset(),
            KeyCode::Char(' ') => self.controls.toggle_animation(),
            KeyCode::Char('o') => {
                self.camera.toggle_projection();
                debug!("projection switched to {:?}", self.camera.mode);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let model = Transform::model_matrix(&self.controls, self.mesh.transform.scale);
        let lighting = Lighting::new(&self.config, &self.camera);

        self.renderer.clear();
        self.renderer
            .render_mesh(&self.mesh, &model, &self.camera, &lighting);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Status line
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} ({} triangles) | FPS: {:.1} | zoom {:.1} | WASD/Arrows=Rotate +/-=Zoom 0=Reset Space=Spin O=Ortho Q=Quit",
                self.title,
                self.mesh.triangle_count(),
                self.fps,
                self.controls.zoom,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
