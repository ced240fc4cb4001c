use std::fs::File;
use std::io;
use std::time::Instant;

use glam::{Vec2, Vec3};
use log::{error, info, warn};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Scale, Window, WindowOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{Config, LevelFilter, WriteLogger};

use rubiks_renderer::cube::{Face, Move, RubiksCube};
use rubiks_renderer::{
    assemble_frame, create_clap_command, format_mat4, handle_clap_matches, Camera, Color,
    FrameBuffer, Metrics,
};

const SCRAMBLE_MOVES: usize = 20;

fn main() -> io::Result<()> {
    if let Err(e) = WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        File::create("rubiks_renderer.log")?,
    ) {
        eprintln!("logging disabled: {e}");
    }

    let matches = create_clap_command().get_matches();
    let options = handle_clap_matches(&matches);
    info!("starting with {options:?}");

    let mut cube = RubiksCube::new();
    if options.scramble > 0 {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        if let Err(e) = cube.scramble(&mut rng, options.scramble) {
            error!("scramble failed: {e}");
        }
    }

    let camera = Camera::new(
        Vec3::new(4.0, 3.0, 6.0),
        Vec3::ZERO,
        options.width as f32 / options.height as f32,
    );

    let window = Window::new(
        "Rubik's Cube",
        options.width,
        options.height,
        WindowOptions {
            resize: false,
            scale: Scale::X1,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| io::Error::other(e.to_string()))?;

    run(window, cube, camera, options.width, options.height)
}

fn run(
    mut window: Window,
    mut cube: RubiksCube,
    mut camera: Camera,
    width: usize,
    height: usize,
) -> io::Result<()> {
    window.set_target_fps(60);

    let mut buffer = FrameBuffer::new(width, height);
    let mut metrics = Metrics::new();
    let mut last_mouse: Option<Vec2> = None;

    while window.is_open() {
        if window.is_key_down(Key::Escape) || window.is_key_down(Key::Q) {
            break;
        }

        handle_keys(&window, &mut cube, &camera);
        handle_mouse(&window, &mut camera, &mut last_mouse, width, height);

        cube.tick();

        let frame_start = Instant::now();
        let triangles = assemble_frame(&cube, &camera);

        buffer.clear(Color::CYAN);
        buffer.draw_triangles(&triangles);
        buffer.present(&mut window)?;

        if metrics.update(frame_start.elapsed()) {
            info!("{metrics} | triangles drawn: {}", triangles.len());
        }
    }

    Ok(())
}

fn handle_keys(window: &Window, cube: &mut RubiksCube, camera: &Camera) {
    let inverted =
        window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift);

    for key in window.get_keys_pressed(KeyRepeat::No) {
        let face = match key {
            Key::F => Some(Face::Front),
            Key::R => Some(Face::Right),
            Key::B => Some(Face::Back),
            Key::L => Some(Face::Left),
            Key::U => Some(Face::Top),
            Key::D => Some(Face::Down),
            _ => None,
        };

        if let Some(face) = face {
            let mv = Move::new(face, inverted);
            if let Err(e) = cube.start_move(mv) {
                warn!("move {mv} ignored: {e}");
            }
            continue;
        }

        match key {
            Key::N => {
                let mut rng = StdRng::from_entropy();
                if let Err(e) = cube.scramble(&mut rng, SCRAMBLE_MOVES) {
                    warn!("scramble ignored: {e}");
                }
            }
            Key::Slash => {
                info!("{}", format_mat4("view", &camera.view_matrix()));
                info!("{}", format_mat4("projection", &camera.projection_matrix()));
                info!("{}", format_mat4("cube", &cube.transform));
            }
            _ => {}
        }
    }
}

/// Mouse gestures in the original window manner: left drag orbits, right drag
/// pans, the wheel zooms. Drags are normalized to window size so the feel is
/// resolution independent.
fn handle_mouse(
    window: &Window,
    camera: &mut Camera,
    last_mouse: &mut Option<Vec2>,
    width: usize,
    height: usize,
) {
    let Some((x, y)) = window.get_mouse_pos(MouseMode::Pass) else {
        *last_mouse = None;
        return;
    };
    let position = Vec2::new(x, y);

    if let Some(previous) = *last_mouse {
        let drag = (position - previous) / Vec2::new(width as f32, height as f32);

        if window.get_mouse_down(MouseButton::Left) {
            camera.orbit(drag);
        } else if window.get_mouse_down(MouseButton::Right) {
            camera.pan(drag);
        }
    }
    *last_mouse = Some(position);

    if let Some((_, scroll_y)) = window.get_scroll_wheel() {
        if scroll_y != 0.0 {
            camera.zoom(scroll_y);
        }
    }
}
