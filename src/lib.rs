use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use clap::{Arg, ArgAction, Command};

pub mod core;
pub mod cube;
pub mod pipeline;
pub mod util;

pub use core::Camera;
pub use core::Color;
pub use core::Triangle;
pub use cube::{Face, Move, RubiksCube};
pub use pipeline::{assemble_frame, FrameBuffer};
pub use util::format_mat4;

/// Frame timing bookkeeping for the main loop. FPS is recomputed once per
/// second from the counter instead of per frame.
pub struct Metrics {
    pub last_frame: Instant,
    pub frame_time: Duration,
    pub fps_counter: u32,
    pub fps_update_timer: Instant,
    pub current_fps: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            frame_time: Duration::from_secs_f32(1.0 / 60.0),
            fps_counter: 0,
            fps_update_timer: Instant::now(),
            current_fps: 0.0,
        }
    }

    /// Record a finished frame. True once per second, when the FPS figure has
    /// just been refreshed and is worth logging.
    pub fn update(&mut self, frame_delta: Duration) -> bool {
        self.frame_time = frame_delta;
        self.fps_counter += 1;

        if self.fps_update_timer.elapsed() >= Duration::from_secs(1) {
            self.current_fps = self.fps_counter as f32 / self.fps_update_timer.elapsed().as_secs_f32();
            self.fps_counter = 0;
            self.fps_update_timer = Instant::now();
            return true;
        }
        false
    }
}

impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FPS: {:.2} | Frame: {:.2}ms",
            self.current_fps,
            self.frame_time.as_secs_f32() * 1000.0
        )
    }
}

/// Startup options collected from the command line.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub width: usize,
    pub height: usize,
    pub scramble: usize,
    pub seed: Option<u64>,
}

pub fn create_clap_command() -> Command {
    Command::new("rubiks_renderer")
        .about("Rubik's cube in a software-rendered window (using minifb)")
        .version("0.1")
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .help("Window width in pixels")
                .value_parser(clap::value_parser!(usize))
                .default_value("1280"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .help("Window height in pixels")
                .value_parser(clap::value_parser!(usize))
                .default_value("960"),
        )
        .arg(
            Arg::new("scramble")
                .short('s')
                .long("scramble")
                .value_name("MOVES")
                .help("Scramble the cube with this many random moves before the window opens")
                .value_parser(clap::value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for the scramble, for a reproducible starting position")
                .value_parser(clap::value_parser!(u64))
                .action(ArgAction::Set),
        )
}

pub fn handle_clap_matches(matches: &clap::ArgMatches) -> Options {
    Options {
        width: *matches.get_one::<usize>("width").unwrap_or(&1280),
        height: *matches.get_one::<usize>("height").unwrap_or(&960),
        scramble: *matches.get_one::<usize>("scramble").unwrap_or(&0),
        seed: matches.get_one::<u64>("seed").copied(),
    }
}
