use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use vidlist::utils::{self, Config};

/// vidlist - a video playlist player driving mpv
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video files or directories to queue
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Set initial volume (0-100)
    #[arg(short, long, value_name = "VOLUME", value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: Option<u8>,

    /// Start with shuffle enabled
    #[arg(short, long)]
    shuffle: bool,

    /// Start playing the first queued video immediately
    #[arg(short, long)]
    play: bool,

    /// Start the video window in fullscreen mode
    #[arg(short, long)]
    fullscreen: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// mpv executable to use
    #[arg(long, value_name = "PATH")]
    mpv: Option<String>,

    /// Save the effective configuration to the user config file and exit
    #[arg(long)]
    write_config: bool,
}

impl Args {
    /// Command line flags win over config files and environment
    fn apply_to(&self, config: &mut Config) {
        if let Some(volume) = self.volume {
            config.playback.volume = volume;
        }
        if let Some(mpv) = &self.mpv {
            config.engine.mpv_path = mpv.clone();
        }
        config.playback.shuffle |= self.shuffle;
        config.playback.autoplay |= self.play;
        config.engine.fullscreen |= self.fullscreen;
        if self.debug {
            config.general.log_level = "debug".to_string();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => utils::load_config()?,
    };
    args.apply_to(&mut config);
    config.validate()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.general.log_level.as_str()))
        .format_timestamp_millis()
        .init();

    if args.write_config {
        config.save()?;
        info!("Configuration written to {:?}", Config::user_config_path());
        return Ok(());
    }

    info!("Starting vidlist v{}", env!("CARGO_PKG_VERSION"));

    run(config, args.files)
}

#[cfg(not(unix))]
fn run(_config: Config, _files: Vec<PathBuf>) -> Result<()> {
    Err(vidlist::PlayerError::UnsupportedPlatform(
        "the mpv engine needs Unix domain sockets".to_string(),
    )
    .into())
}

#[cfg(unix)]
fn run(config: Config, files: Vec<PathBuf>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session::event_loop(config, files))
}

/// Single-threaded session: user commands and engine events share one loop
#[cfg(unix)]
mod session {
    use anyhow::Result;
    use log::{debug, info, warn};
    use std::path::PathBuf;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::sync::mpsc;

    use vidlist::console::{render_playlist, render_transport, Command, HELP};
    use vidlist::engine::MpvEngine;
    use vidlist::media::collect_media;
    use vidlist::utils::Config;
    use vidlist::{EngineEvent, PlaybackEngine, RandomPicker, TransportController};

    pub async fn event_loop(config: Config, files: Vec<PathBuf>) -> Result<()> {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let engine = MpvEngine::spawn(&config.engine, event_tx)?;

        let mut controller = TransportController::new(engine, Box::new(RandomPicker::new()));
        controller.set_volume(config.playback.volume);
        if config.playback.shuffle {
            controller.toggle_shuffle();
        }

        let extensions = config.library.extensions;
        if !files.is_empty() {
            add_paths(&mut controller, &files, &extensions);
            if config.playback.autoplay {
                if let Err(e) = controller.toggle_play_pause() {
                    warn!("Autoplay skipped: {}", e);
                }
            }
        }

        println!("Type 'help' for a list of commands.");
        println!("{}", render_playlist(&controller));
        println!("{}", render_transport(&controller));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if !handle_line(&mut controller, &line, &extensions) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                event = event_rx.recv() => {
                    match event {
                        Some(event) => handle_event(&mut controller, event),
                        None => {
                            warn!("Engine event channel closed");
                            break;
                        }
                    }
                }
            }
        }

        info!("Shutting down");
        Ok(())
    }

    /// Run one typed command; returns false when the user asked to quit
    fn handle_line<E: PlaybackEngine>(
        controller: &mut TransportController<E>,
        line: &str,
        extensions: &[String],
    ) -> bool {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return true,
            Err(e) => {
                println!("{}", e);
                return true;
            }
        };

        let playlist_changed = matches!(
            command,
            Command::Add(_) | Command::Remove(_) | Command::Clear
        );

        let result = match command {
            Command::Add(paths) => {
                add_paths(controller, &paths, extensions);
                Ok(())
            }
            Command::TogglePlay => controller.toggle_play_pause(),
            Command::Stop => {
                controller.stop();
                Ok(())
            }
            Command::Next => {
                controller.next();
                Ok(())
            }
            Command::Previous => {
                controller.previous();
                Ok(())
            }
            Command::Shuffle => {
                controller.toggle_shuffle();
                Ok(())
            }
            Command::Remove(index) => controller.remove_selected(index).map(|_| ()),
            Command::Clear => {
                controller.clear();
                Ok(())
            }
            Command::Goto(index) => controller.play_at(index),
            Command::Seek(position_ms) => {
                controller.seek_to(position_ms);
                Ok(())
            }
            Command::Volume(percent) => {
                controller.set_volume(percent);
                Ok(())
            }
            Command::List => {
                println!("{}", render_playlist(controller));
                return true;
            }
            Command::Status => {
                let engine = controller.engine();
                println!(
                    "Engine: {:?} at {} of {} ms",
                    engine.state(),
                    engine.current_position(),
                    engine.current_duration()
                );
                Ok(())
            }
            Command::Help => {
                println!("{}", HELP);
                return true;
            }
            Command::Quit => return false,
        };

        if let Err(e) = result {
            warn!("{}", e);
            println!("{}", e.status_message());
        }
        if playlist_changed {
            println!("{}", render_playlist(controller));
        }
        println!("{}", render_transport(controller));
        true
    }

    fn handle_event<E: PlaybackEngine>(controller: &mut TransportController<E>, event: EngineEvent) {
        let visible = match &event {
            EngineEvent::PositionChanged(ms) => {
                debug!("Position: {} ms", ms);
                false
            }
            EngineEvent::DurationChanged(_) => false,
            _ => true,
        };

        controller.handle_engine_event(event);

        if visible {
            println!("{}", render_transport(controller));
        }
    }

    fn add_paths<E: PlaybackEngine>(
        controller: &mut TransportController<E>,
        paths: &[PathBuf],
        extensions: &[String],
    ) {
        let collected = collect_media(paths, extensions);
        if collected.skipped > 0 {
            warn!("Skipped {} path(s)", collected.skipped);
        }
        if collected.media.is_empty() {
            println!("No supported videos found");
            return;
        }
        controller.add(collected.media);
    }
}
