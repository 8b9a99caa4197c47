//! Draw command generation
//!
//! Turns the world into a flat list of 2D primitives. The host owns the
//! actual canvas and sprite sheets and just replays these in order.

use crate::sim::{GamePhase, World, WeaponKind};

/// Sprite strips the host must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    Alien,
    Ship,
    Explosion,
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A single primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `size`-square cell at `src_x` in `sheet`, drawn at (x, y)
    Sprite {
        sheet: Sheet,
        src_x: f32,
        x: f32,
        y: f32,
        size: f32,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: &'static str,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: &'static str,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: &'static str,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        align: Align,
        color: &'static str,
    },
}

const HUD_BACKGROUND: &str = "#18226a";
const HUD_RULE: &str = "#FF0000";
const HUD_TEXT: &str = "orange";
const PHOTON_COLOR: &str = "#FFFFFF";
const BEAM_COLOR: &str = "cyan";

/// Everything to draw for the current frame, back to front
pub fn frame_commands(world: &World) -> Vec<DrawCommand> {
    let unit = world.bounds.unit;
    let height = world.bounds.height;
    let mut commands = Vec::with_capacity(
        world.aliens.len() + world.projectiles.len() * 2 + world.explosions.len() + 8,
    );

    for alien in &world.aliens {
        commands.push(DrawCommand::Sprite {
            sheet: Sheet::Alien,
            src_x: alien.animation.sprite_offset(unit),
            x: alien.pos.x,
            y: alien.pos.y,
            size: unit,
        });
    }

    let ship = &world.ship;
    commands.push(DrawCommand::Sprite {
        sheet: Sheet::Ship,
        src_x: ship.animation.sprite_offset(unit),
        x: ship.pos.x,
        y: ship.pos.y,
        size: unit,
    });

    for projectile in &world.projectiles {
        match projectile.kind {
            WeaponKind::Photon => commands.push(DrawCommand::Rect {
                x: projectile.pos.x - 1.0,
                y: projectile.pos.y,
                w: 2.0,
                h: 4.0,
                color: PHOTON_COLOR,
            }),
            WeaponKind::Beam => {
                // Column from the top of the screen down to the cannon
                commands.push(DrawCommand::Rect {
                    x: projectile.pos.x - 1.0,
                    y: 0.0,
                    w: 2.0,
                    h: height - unit * 2.0,
                    color: BEAM_COLOR,
                });
                commands.push(DrawCommand::Circle {
                    x: ship.pos.x + unit / 2.0,
                    y: ship.pos.y - 6.0,
                    radius: 4.0,
                    color: BEAM_COLOR,
                });
            }
        }
    }

    for explosion in &world.explosions {
        commands.push(DrawCommand::Sprite {
            sheet: Sheet::Explosion,
            src_x: explosion.animation.sprite_offset(unit),
            x: explosion.pos.x,
            y: explosion.pos.y,
            size: unit,
        });
    }

    hud_commands(world, &mut commands);
    commands
}

fn hud_commands(world: &World, commands: &mut Vec<DrawCommand>) {
    let unit = world.bounds.unit;
    let width = world.bounds.width;
    let bar = unit * 2.0;

    commands.push(DrawCommand::Rect {
        x: 0.0,
        y: 0.0,
        w: width,
        h: bar,
        color: HUD_BACKGROUND,
    });
    commands.push(DrawCommand::Line {
        from: (0.0, bar),
        to: (width, bar),
        color: HUD_RULE,
    });
    commands.push(DrawCommand::Text {
        text: format!(
            "Level {} | Enemies [{}] | {}",
            world.level,
            world.aliens.len(),
            world.ship.weapon.kind.as_str()
        ),
        x: unit / 2.0,
        y: bar * 0.6,
        align: Align::Left,
        color: HUD_TEXT,
    });
    commands.push(DrawCommand::Text {
        text: format!("Score [{}] | Lives [{}]", world.score, world.lives),
        x: width - unit / 2.0,
        y: bar * 0.6,
        align: Align::Right,
        color: HUD_TEXT,
    });

    let banner = match world.phase {
        GamePhase::Running => None,
        GamePhase::Paused => Some("PAUSED"),
        GamePhase::GameOver => Some("GAME OVER"),
    };
    if let Some(banner) = banner {
        commands.push(DrawCommand::Text {
            text: banner.to_string(),
            x: width / 2.0,
            y: world.bounds.height / 2.0,
            align: Align::Center,
            color: HUD_TEXT,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::sim::{Projectile, Weapon};
    use glam::Vec2;

    #[test]
    fn test_sprite_offset_follows_frame() {
        let mut world = World::new(GameConfig::default()).unwrap();
        world.aliens.truncate(1);
        world.aliens[0].animation.frame = 1;

        let commands = frame_commands(&world);
        assert_eq!(
            commands[0],
            DrawCommand::Sprite {
                sheet: Sheet::Alien,
                src_x: 16.0,
                x: world.aliens[0].pos.x,
                y: world.aliens[0].pos.y,
                size: 16.0,
            }
        );
    }

    #[test]
    fn test_beam_draws_column_and_muzzle() {
        let mut world = World::new(GameConfig::default()).unwrap();
        world.aliens.clear();
        world
            .projectiles
            .push(Projectile::new(Vec2::new(100.0, 216.0), &Weapon::beam(), 90.0, 1));

        let commands = frame_commands(&world);
        assert!(commands.contains(&DrawCommand::Rect {
            x: 99.0,
            y: 0.0,
            w: 2.0,
            h: 208.0,
            color: BEAM_COLOR,
        }));
        assert!(
            commands
                .iter()
                .any(|c| matches!(c, DrawCommand::Circle { .. }))
        );
    }

    #[test]
    fn test_pause_banner() {
        let mut world = World::new(GameConfig::default()).unwrap();
        world.phase = GamePhase::Paused;
        let commands = frame_commands(&world);
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "PAUSED"
        )));
    }
}
