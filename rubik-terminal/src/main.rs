/// Rubik Terminal - Single cube piece
///
/// Renders one corner piece of a Rubik's cube into the terminal.
/// Usage: `rubik [CONFIG_DIR]` (defaults to `config`)
/// Controls:
///   - Q/ESC/Ctrl-C: Quit

use rubik_terminal::{AppConfig, AppError, RenderContext, TerminalApp};

fn main() -> Result<(), AppError> {
    let config_dir = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let config = AppConfig::load_from(&config_dir)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Loaded configuration from {}", config_dir);

    let context = RenderContext::from_config(&config)?;
    let mut app = TerminalApp::new(context, &config.surface);
    let frames = app.run()?;

    log::info!("Rendered {} frames", frames);
    Ok(())
}
