//! Alien Descent entry point
//!
//! Web: canvas + keyboard driver around the simulation.
//! Native: headless autopilot run that logs how far it gets.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, KeyboardEvent};

    use alien_descent::audio::AudioManager;
    use alien_descent::render::{Align, DrawCommand, Sheet, frame_commands};
    use alien_descent::sim::{TickInput, World, tick};
    use alien_descent::{ConfigError, GameConfig};

    /// Sprite sheets looked up from the page
    struct Sprites {
        alien: HtmlImageElement,
        ship: HtmlImageElement,
        explosion: HtmlImageElement,
    }

    impl Sprites {
        fn load(document: &Document) -> Result<Self, ConfigError> {
            let image = |id: &str| {
                document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
                    .ok_or_else(|| ConfigError::MissingResource(id.to_string()))
            };
            Ok(Self {
                alien: image("imgAlien")?,
                ship: image("imgShip")?,
                explosion: image("imgExpl")?,
            })
        }

        fn sheet(&self, sheet: Sheet) -> &HtmlImageElement {
            match sheet {
                Sheet::Alien => &self.alien,
                Sheet::Ship => &self.ship,
                Sheet::Explosion => &self.explosion,
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        world: World,
        input: TickInput,
        audio: AudioManager,
        ctx: CanvasRenderingContext2d,
        sprites: Sprites,
    }

    impl Game {
        fn frame(&mut self, timestamp: f64) {
            tick(&mut self.world, &self.input, timestamp);

            // Clear one-shot inputs after processing
            self.input.pause = false;
            self.input.swap_weapon = false;

            let events = self.world.drain_events();
            self.audio.handle_events(&events);

            self.draw();
        }

        fn draw(&self) {
            let bounds = self.world.bounds;
            self.ctx
                .clear_rect(0.0, 0.0, bounds.width as f64, bounds.height as f64);

            for command in frame_commands(&self.world) {
                if let Err(e) = self.draw_command(&command) {
                    log::debug!("Draw {:?} failed: {:?}", command, e);
                }
            }
        }

        fn draw_command(&self, command: &DrawCommand) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            match command {
                DrawCommand::Sprite { sheet, src_x, x, y, size } => {
                    let size = *size as f64;
                    ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                        self.sprites.sheet(*sheet),
                        *src_x as f64,
                        0.0,
                        size,
                        size,
                        *x as f64,
                        *y as f64,
                        size,
                        size,
                    )?;
                }
                DrawCommand::Rect { x, y, w, h, color } => {
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(*x as f64, *y as f64, *w as f64, *h as f64);
                }
                DrawCommand::Circle { x, y, radius, color } => {
                    ctx.set_fill_style_str(color);
                    ctx.begin_path();
                    ctx.arc(*x as f64, *y as f64, *radius as f64, 0.0, std::f64::consts::TAU)?;
                    ctx.fill();
                }
                DrawCommand::Line { from, to, color } => {
                    ctx.set_stroke_style_str(color);
                    ctx.set_line_width(1.0);
                    ctx.begin_path();
                    ctx.move_to(from.0 as f64, from.1 as f64);
                    ctx.line_to(to.0 as f64, to.1 as f64);
                    ctx.stroke();
                }
                DrawCommand::Text { text, x, y, align, color } => {
                    ctx.set_fill_style_str(color);
                    ctx.set_font("15px Consolas");
                    ctx.set_text_align(match align {
                        Align::Left => "left",
                        Align::Center => "center",
                        Align::Right => "right",
                    });
                    ctx.fill_text(text, *x as f64, *y as f64)?;
                }
            }
            Ok(())
        }

        fn key(&mut self, key: &str, down: bool, repeat: bool) {
            match key {
                "q" | "Q" | "a" | "A" | "ArrowLeft" => self.input.direction.left = down,
                "d" | "D" | "ArrowRight" => self.input.direction.right = down,
                " " => self.input.shooting = down,
                "p" | "P" | "Escape" if down && !repeat => self.input.pause = true,
                "w" | "W" if down && !repeat => self.input.swap_weapon = true,
                "m" | "M" if down && !repeat => {
                    self.audio.toggle_music();
                }
                _ => {}
            }
        }
    }

    fn start() -> Result<Rc<RefCell<Game>>, ConfigError> {
        let missing = |what: &str| ConfigError::MissingResource(what.to_string());

        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let document = window.document().ok_or_else(|| missing("document"))?;
        let canvas = document
            .get_element_by_id("plateau")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| missing("plateau"))?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| missing("2d context"))?;
        let sprites = Sprites::load(&document)?;

        let config = GameConfig {
            screen_width: canvas.width() as f32,
            screen_height: canvas.height() as f32,
            seed: js_sys::Date::now() as u64,
            ..Default::default()
        };
        let audio = AudioManager::from_config(&config);
        let world = World::new(config)?;

        Ok(Rc::new(RefCell::new(Game {
            world,
            input: TickInput::default(),
            audio,
            ctx,
            sprites,
        })))
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        for (event, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().key(&event.key(), down, event.repeat());
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(f.as_ref().unchecked_ref());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Alien Descent starting...");

        let game = match start() {
            Ok(game) => game,
            Err(e) => {
                log::error!("Startup failed: {e}");
                return;
            }
        };

        setup_keyboard(game.clone());

        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            game.borrow_mut().frame(timestamp);
            if let Some(cb) = f.borrow().as_ref() {
                request_animation_frame(cb);
            }
        }));
        if let Some(cb) = g.borrow().as_ref() {
            request_animation_frame(cb);
        }

        log::info!("Alien Descent running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Alien Descent (native) starting...");
    log::info!("Native mode runs a headless autopilot - use a wasm build to play");

    let config = match load_config(std::env::args().nth(1)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = autopilot(config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: Option<String>) -> Result<alien_descent::GameConfig, alien_descent::ConfigError> {
    use alien_descent::{ConfigError, GameConfig};

    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = std::fs::read_to_string(&path)
        .map_err(|e| ConfigError::MissingResource(format!("{path}: {e}")))?;
    let config = GameConfig::from_json(&json)?;
    log::info!("Loaded config from {path}");
    Ok(config)
}

/// Play a few simulated minutes: chase the lowest alien and keep firing
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(config: alien_descent::GameConfig) -> Result<(), alien_descent::ConfigError> {
    use alien_descent::audio::AudioManager;
    use alien_descent::sim::{Direction, GamePhase, TickInput, World, tick};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const FRAMES: u32 = 60 * 180;

    let audio = AudioManager::from_config(&config);
    let mut world = World::new(config)?;
    let unit = world.bounds.unit;

    for frame in 0..FRAMES {
        let target = world
            .aliens
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|a| a.pos.x);
        let direction = match target {
            Some(x) if x + unit / 2.0 < world.ship.muzzle(unit).x - 2.0 => Direction {
                left: true,
                right: false,
            },
            Some(x) if x + unit / 2.0 > world.ship.muzzle(unit).x + 2.0 => Direction {
                left: false,
                right: true,
            },
            _ => Direction::default(),
        };

        let input = TickInput {
            direction,
            shooting: true,
            // Try the beam for a while every twenty seconds
            swap_weapon: frame > 0 && frame % 1200 == 0,
            ..Default::default()
        };
        tick(&mut world, &input, frame as f64 * FRAME_MS);
        audio.handle_events(&world.drain_events());

        if world.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Autopilot finished: level {}, score {}, lives {}",
        world.level,
        world.score,
        world.lives
    );
    Ok(())
}
