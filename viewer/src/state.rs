//! Handles the state for the simulator.

use simulator::units::SECONDS_PER_DAY;
use simulator::SolarSystem;

use euclid::default::Point3D;
use ggez::event::{self, EventHandler, KeyCode, KeyMods};
use ggez::nalgebra::Point2;
use ggez::{
    graphics::{self, DrawMode, DrawParam, MeshBuilder, Text},
    timer, Context, GameResult,
};
use tracing::error;

use graphics::Color;

/// The state of the solar system.
pub struct State {
    solar_system: SolarSystem,
    /// Julian date the simulation started at
    start: f64,
    /// Seconds per integration step
    step: f64,
    /// Integration steps per frame
    iterations: usize,
    /// 1 for forwards in time, -1 for backwards
    direction: f64,
    /// Show the list of bodies. The simulation holds still while it's up.
    show_names: bool,

    // Display stuff
    /// This many meters in distance = 1 pixel
    distance_scale: f64,
    /// What I'm focusing on
    focus: usize,
}

impl State {
    pub fn new(ctx: &mut Context, solar_system: SolarSystem, start: f64, step: f64) -> Self {
        let (scr_w, scr_h) = graphics::drawable_size(ctx);
        let distance_scale = fit_scale(solar_system.max_extent(), scr_w.min(scr_h));
        State {
            solar_system,
            start,
            step,
            iterations: DEFAULT_ITERATIONS,
            direction: 1.0,
            show_names: false,
            distance_scale,
            focus: 0,
        }
    }

    /// Fix the screen space to always have (0, 0) in the corner and (w, h) in the other.
    fn fix_coordinates(&mut self, ctx: &mut Context, width: f32, height: f32) -> GameResult<()> {
        let rect = graphics::Rect::new(0.0, 0.0, width, height);
        graphics::set_screen_coordinates(ctx, rect)
    }

    fn cycle_focus(&mut self, by: isize) {
        if let Some(next) = self.solar_system.next_body_index(self.focus, by) {
            self.focus = next;
        }
    }

    /// Turn a point in space into a point on screen, relative to the focus.
    fn project(&self, pos: Point3D<f64>, focus: Point3D<f64>, scr_w: f32, scr_h: f32) -> Point2<f32> {
        let relative = pos - focus;
        // Screen y grows downwards, space y grows upwards
        Point2::new(
            scr_w / 2f32 + (relative.x / self.distance_scale) as f32,
            scr_h / 2f32 - (relative.y / self.distance_scale) as f32,
        )
    }

    fn draw_body_list(&self, ctx: &mut Context) -> GameResult<()> {
        const LINE_HEIGHT: f32 = 18.0;
        let bodies = self.solar_system.bodies();
        let height = LINE_HEIGHT * (bodies.len() as f32 + 1.0);
        let backdrop = MeshBuilder::new()
            .rectangle(
                DrawMode::fill(),
                graphics::Rect::new(10.0, 40.0, 200.0, height),
                Color::from_rgb_u32(0x000000),
            )
            .rectangle(
                DrawMode::stroke(1.0),
                graphics::Rect::new(10.0, 40.0, 200.0, height),
                Color::from_rgb_u32(0xFFFFFF),
            )
            .build(ctx)?;
        graphics::draw(ctx, &backdrop, DrawParam::default())?;

        for (idx, body) in bodies.iter().enumerate() {
            let color = if idx == self.focus {
                Color::from_rgb_u32(0xE2C96E)
            } else {
                Color::from_rgb_u32(0xFFFFFF)
            };
            let text = Text::new(body.name.clone());
            graphics::draw(
                ctx,
                &text,
                DrawParam::default()
                    .dest(Point2::new(20.0, 40.0 + LINE_HEIGHT * (idx as f32 + 0.5)))
                    .color(color),
            )?;
        }
        Ok(())
    }
}

impl EventHandler for State {
    fn update(&mut self, ctx: &mut Context) -> GameResult<()> {
        const DESIRED_FPS: u32 = 60;
        while timer::check_update_time(ctx, DESIRED_FPS) {
            if self.show_names || self.iterations == 0 {
                continue;
            }
            if let Err(err) = self
                .solar_system
                .advance(self.iterations, self.step * self.direction)
            {
                error!(%err, "simulation stopped");
                self.iterations = 0;
            }
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult<()> {
        graphics::clear(ctx, Color::from_rgb_u32(0x141414));

        let (scr_w, scr_h) = graphics::drawable_size(ctx);
        let bodies = self.solar_system.bodies();
        let focus = bodies
            .get(self.focus)
            .map(|body| body.state.pos)
            .unwrap_or_else(Point3D::origin);

        let mut mesh = MeshBuilder::new();
        let mut shapes = 0;
        for body in bodies {
            let draw_pos = self.project(body.state.pos, focus, scr_w, scr_h);

            // Trails fade out the older they get
            let mut previous = draw_pos;
            for (age, point) in body.trail.iter().enumerate() {
                let vert = self.project(*point, focus, scr_w, scr_h);
                if vert != previous {
                    let mut color = Color::from_rgb_u32(body.color);
                    color.a = trail_alpha(age, body.trail.capacity());
                    mesh.line(&[previous, vert], 1.0, color)?;
                    shapes += 1;
                }
                previous = vert;
            }

            let draw_radius = scale_planet(body.radius, self.distance_scale);
            // Only spend processing time drawing it if it's in frame.
            if draw_pos.x + draw_radius > 0.0
                && draw_pos.x - draw_radius <= scr_w
                && draw_pos.y + draw_radius > 0.0
                && draw_pos.y - draw_radius <= scr_h
            {
                mesh.circle(
                    DrawMode::fill(),
                    draw_pos,
                    draw_radius,
                    0.1,
                    Color::from_rgb_u32(body.color),
                );
                shapes += 1;
            }
        }
        if shapes > 0 {
            let mesh = mesh.build(ctx)?;
            graphics::draw(ctx, &mesh, DrawParam::default())?;
        }

        for body in bodies {
            let draw_pos = self.project(body.state.pos, focus, scr_w, scr_h);
            let label = Text::new(body.name.clone());
            graphics::draw(
                ctx,
                &label,
                DrawParam::default()
                    .dest(Point2::new(draw_pos.x + 6.0, draw_pos.y - 18.0))
                    .color(Color::from_rgb_u32(0xFFFFFF)),
            )?;
        }

        let jd = self.start + self.solar_system.elapsed() / SECONDS_PER_DAY;
        let hud = [
            (format!("JD: {:.3}", jd), 10.0),
            (
                format!(
                    "{} steps/frame{}",
                    self.iterations,
                    if self.direction < 0.0 { " (reversed)" } else { "" }
                ),
                scr_h - 24.0,
            ),
        ];
        for (line, y) in hud.iter() {
            graphics::draw(
                ctx,
                &Text::new(line.clone()),
                DrawParam::default().dest(Point2::new(10.0, *y)),
            )?;
        }

        if self.show_names {
            self.draw_body_list(ctx)?;
        }

        graphics::present(ctx)
    }

    fn key_down_event(&mut self, ctx: &mut Context, keycode: KeyCode, _keymods: KeyMods, _repeat: bool) {
        match keycode {
            KeyCode::Escape => event::quit(ctx),
            KeyCode::Up => self.iterations = (self.iterations * 2).max(1),
            KeyCode::Down => self.iterations = (self.iterations / 2).max(1),
            KeyCode::Space => self.iterations = 0,
            KeyCode::Minus => self.direction = -1.0,
            KeyCode::Equals => self.direction = 1.0,
            KeyCode::LBracket => self.cycle_focus(-1),
            KeyCode::RBracket => self.cycle_focus(1),
            KeyCode::Tab => self.show_names = !self.show_names,
            KeyCode::Q => self.distance_scale /= ZOOM_SPEED,
            KeyCode::Z => self.distance_scale *= ZOOM_SPEED,
            other => {
                if let Some(iterations) = number_key_iterations(other) {
                    self.iterations = iterations;
                }
            }
        }
    }

    fn mouse_wheel_event(&mut self, _ctx: &mut Context, _x: f32, y: f32) {
        self.distance_scale *= ZOOM_SPEED.powf(-y as f64);
    }

    fn resize_event(&mut self, ctx: &mut Context, width: f32, height: f32) {
        if let Err(err) = self.fix_coordinates(ctx, width, height) {
            error!(%err, "couldn't resize");
        }
    }
}

/// Pick meters-per-pixel so something `extent` wide fits in `pixels`, with a little margin.
fn fit_scale(extent: f64, pixels: f32) -> f64 {
    if extent > 0.0 && pixels > 0.0 {
        extent * 1.1 / pixels as f64
    } else {
        DEFAULT_SCALE
    }
}

/// Keys 1 through 0 pick 10 through 100 steps per frame.
fn number_key_iterations(key: KeyCode) -> Option<usize> {
    let n = match key {
        KeyCode::Key1 => 1,
        KeyCode::Key2 => 2,
        KeyCode::Key3 => 3,
        KeyCode::Key4 => 4,
        KeyCode::Key5 => 5,
        KeyCode::Key6 => 6,
        KeyCode::Key7 => 7,
        KeyCode::Key8 => 8,
        KeyCode::Key9 => 9,
        KeyCode::Key0 => 10,
        _ => return None,
    };
    Some(10 * n)
}

/// Newest trail segments are solid, the oldest are nearly invisible.
fn trail_alpha(age: usize, capacity: usize) -> f32 {
    if capacity == 0 {
        return 0.0;
    }
    (capacity.saturating_sub(age) as f32 / capacity as f32).max(0.0)
}

/// Planets are tiny. Fake their size so they can be seen at all.
fn scale_planet(radius: f64, scale: f64) -> f32 {
    ((10f64 * (radius / scale).powf(0.3)) as f32).max(2f32) // Everything has to be at least a couple of pixels wide. Otherwise it becomes impossible to see.
}

const ZOOM_SPEED: f64 = 1.1f64; // multiply / divide by this many meters per frame
const DEFAULT_SCALE: f64 = 1e9;
const DEFAULT_ITERATIONS: usize = 10;
