/// Terminal front end: renders a cube piece into the terminal every frame
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Point3;
use rubik_core::{Camera, Light, Orientation, Piece, PieceError, Rgb, Scene};
use std::fmt;
use std::io::{self, stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub mod config;
pub mod renderer;

pub use config::{AppConfig, ConfigError};
pub use renderer::SoftwareRenderer;

/// Top-level application error
#[derive(Debug)]
pub enum AppError {
    /// Terminal I/O failure
    Io(io::Error),
    /// Configuration could not be loaded
    Config(ConfigError),
    /// The configured piece is invalid
    Piece(PieceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "Terminal IO error: {}", err),
            AppError::Config(err) => write!(f, "{}", err),
            AppError::Piece(err) => write!(f, "Piece error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Piece(err) => Some(err),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<PieceError> for AppError {
    fn from(err: PieceError) -> Self {
        AppError::Piece(err)
    }
}

/// Shared flag that asks the render loop to stop
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Call `frame` once per frame until `stop` is raised or `max_frames` frames
/// have been drawn. Returns the number of frames drawn.
pub fn run_render_loop<F>(
    stop: &StopSignal,
    frame_time: Duration,
    max_frames: Option<u64>,
    mut frame: F,
) -> io::Result<u64>
where
    F: FnMut() -> io::Result<()>,
{
    let mut frames = 0;

    while !stop.is_raised() {
        if max_frames.is_some_and(|max| frames >= max) {
            break;
        }

        let frame_start = Instant::now();
        frame()?;
        frames += 1;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    log::debug!("Render loop stopped after {} frames", frames);
    Ok(frames)
}

/// Everything a frame needs: the scene, the camera looking at it and the
/// framebuffer it is drawn into
pub struct RenderContext {
    pub scene: Scene,
    pub camera: Camera,
    pub renderer: SoftwareRenderer,
    pub background: Rgb,
}

impl RenderContext {
    /// Build the lit scene holding the configured piece
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let [x, y, z] = config.piece.center;
        let piece = Piece::with_tile_size(
            Point3::new(x, y, z),
            &config.piece.faces,
            config.piece.tile_size,
        )?;

        let lighting = &config.lighting;
        let mut scene = Scene::new();
        scene.add_light(Light::Ambient {
            color: Rgb::from_hex(lighting.ambient_color),
            intensity: lighting.ambient_intensity,
        });
        let [lx, ly, lz] = lighting.directional_position;
        scene.add_light(Light::directional(
            lighting.directional_color,
            lighting.directional_intensity,
            Point3::new(lx, ly, lz),
        ));
        scene.add_piece(&piece);

        let surface = &config.surface;
        let [cx, cy, cz] = config.camera.position;
        let camera = Camera::perspective(
            config.camera.fov,
            surface.width as f32 / surface.height.max(1) as f32,
            config.camera.near,
            config.camera.far,
        )
        .with_position(Point3::new(cx, cy, cz))
        .with_rotation(Orientation::from(config.camera.rotation));

        log::info!(
            "Scene ready: {} objects, {} lights, {}x{} surface",
            scene.objects().len(),
            scene.lights().len(),
            surface.width,
            surface.height
        );

        Ok(Self {
            scene,
            camera,
            renderer: SoftwareRenderer::new(surface.width as usize, surface.height as usize),
            background: Rgb::from_hex(lighting.background),
        })
    }

    pub fn render_frame(&mut self) {
        self.renderer.clear(self.background);
        self.renderer.render(&self.scene, &self.camera);
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    context: RenderContext,
    stop: StopSignal,
    target_fps: u32,
    max_frames: Option<u64>,
}

impl TerminalApp {
    pub fn new(context: RenderContext, config: &config::SurfaceConfig) -> Self {
        Self {
            context,
            stop: StopSignal::new(),
            target_fps: config.target_fps.max(1),
            max_frames: config.max_frames,
        }
    }

    /// Handle that stops the app from outside the render loop
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn run(&mut self) -> io::Result<u64> {
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
            return keep_first_error(Err(err), [terminal::disable_raw_mode()]);
        }

        let result = self.main_loop();

        // Cleanup: every step runs even if an earlier one failed
        keep_first_error(
            result,
            [
                terminal::disable_raw_mode(),
                execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show),
            ],
        )
    }

    fn main_loop(&mut self) -> io::Result<u64> {
        let frame_time = Duration::from_secs(1) / self.target_fps;
        let stop = self.stop.clone();
        let context = &mut self.context;

        let mut last_sample = Instant::now();
        let mut sampled_frames = 0u32;
        let mut fps = 0.0f32;

        run_render_loop(&stop, frame_time, self.max_frames, || {
            if event::poll(Duration::from_millis(0))? {
                handle_input(&stop)?;
            }

            context.render_frame();
            present(context, fps)?;

            // Update FPS counter
            sampled_frames += 1;
            let now = Instant::now();
            if (now - last_sample).as_secs() >= 1 {
                fps = sampled_frames as f32 / (now - last_sample).as_secs_f32();
                sampled_frames = 0;
                last_sample = now;
            }
            Ok(())
        })
    }
}

/// Combine a result with the outcomes of cleanup steps that already ran.
/// The result's own error wins, then the first cleanup error.
fn keep_first_error<T>(
    result: io::Result<T>,
    cleanup: impl IntoIterator<Item = io::Result<()>>,
) -> io::Result<T> {
    let mut first_cleanup_error = None;
    for outcome in cleanup {
        if let Err(err) = outcome {
            log::warn!("Terminal cleanup failed: {}", err);
            first_cleanup_error.get_or_insert(err);
        }
    }

    match (result, first_cleanup_error) {
        (Err(err), _) => Err(err),
        (Ok(_), Some(err)) => Err(err),
        (Ok(value), None) => Ok(value),
    }
}

fn handle_input(stop: &StopSignal) -> io::Result<()> {
    if let Event::Key(KeyEvent {
        code, modifiers, ..
    }) = event::read()?
    {
        let ctrl_c = code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
            stop.raise();
        }
    }
    Ok(())
}

fn present(context: &RenderContext, fps: f32) -> io::Result<()> {
    let (columns, rows) = terminal::size()?;
    // Keep the first row for the status line
    let (columns, rows) = renderer::fit_viewport(
        context.renderer.width(),
        context.renderer.height(),
        columns,
        rows.saturating_sub(1),
    );

    let mut stdout = stdout();
    context.renderer.draw(&mut stdout, columns, rows)?;

    queue!(
        stdout,
        cursor::MoveTo(0, rows),
        SetForegroundColor(Color::Yellow),
        Print(format!("Rubik piece | FPS: {:.1} | Q=Quit", fps)),
        ResetColor
    )?;

    stdout.flush()
}
