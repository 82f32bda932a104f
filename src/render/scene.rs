//! World rendering: background, clouds, ground, pipes, bird, particles.
//!
//! Reads the game state only. The one mutation is scrolling the host-owned
//! cloud layer, which has no effect on the simulation.

use super::assets::{AssetKind, Assets};
use super::raster::{Raster, Rotation};
use crate::color::Rgb;
use crate::constants::GROUND_HEIGHT;
use crate::game::{Bird, FlappyGame, Particle, Pipe, Sky};

pub const SKY_TOP: Rgb = Rgb(0x7a, 0xd0, 0xdd);
pub const SKY_BOTTOM: Rgb = Rgb(0xba, 0xf0, 0xff);
pub const GROUND: Rgb = Rgb(0x6e, 0xc0, 0x6e);
pub const PIPE: Rgb = Rgb(0x2e, 0xa4, 0x4f);
pub const BIRD_BODY: Rgb = Rgb(0xff, 0xdd, 0x57);
pub const BIRD_WING: Rgb = Rgb(0xf3, 0xc1, 0x4a);
pub const BIRD_EYE: Rgb = Rgb(0x22, 0x22, 0x22);

const CLOUD_ALPHA: f64 = 0.9;
const PIPE_LIP_ALPHA: f64 = 0.08;
const PIPE_LIP_HEIGHT: f64 = 8.0;
const BIRD_SPRITE_SIZE: (f64, f64) = (48.0, 36.0);

/// Draw one frame of the world into `raster`, scrolling `sky` by one frame.
pub fn render_world(raster: &mut Raster, game: &FlappyGame, sky: &mut Sky, assets: &Assets) {
    let (width, height) = (game.viewport.width, game.viewport.height);

    match assets.get(AssetKind::Background) {
        Some(bg) => raster.draw_image(bg, 0.0, 0.0, width, height, &Rotation::NONE),
        None => raster.fill_vertical_gradient(SKY_TOP, SKY_BOTTOM),
    }

    sky.advance(width);
    draw_clouds(raster, sky, assets);

    raster.fill_rect(0.0, height - GROUND_HEIGHT, width, GROUND_HEIGHT, GROUND, 1.0);

    for pipe in &game.pipes {
        draw_pipe(raster, pipe, height, assets);
    }

    draw_bird(raster, &game.bird, game.frames, assets);

    for particle in &game.particles {
        draw_particle(raster, particle);
    }
}

fn draw_clouds(raster: &mut Raster, sky: &Sky, assets: &Assets) {
    for cloud in &sky.clouds {
        match assets.get(AssetKind::Cloud) {
            Some(image) => raster.draw_image(
                image,
                cloud.x,
                cloud.y,
                220.0 * cloud.scale,
                120.0 * cloud.scale,
                &Rotation::NONE,
            ),
            None => raster.fill_ellipse(
                cloud.x + 80.0,
                cloud.y + 30.0,
                60.0 * cloud.scale,
                28.0 * cloud.scale,
                0.0,
                Rgb::WHITE,
                CLOUD_ALPHA,
            ),
        }
    }
}

/// Both segments of a pipe, tilted together around the top of its center line.
fn draw_pipe(raster: &mut Raster, pipe: &Pipe, height: f64, assets: &Assets) {
    let rotation = Rotation::around(pipe.x + pipe.width / 2.0, 0.0, pipe.tilt());
    let bottom_y = pipe.bottom();
    let bottom_h = height - bottom_y - GROUND_HEIGHT;

    if let Some(image) = assets.get(AssetKind::Pipe) {
        raster.draw_image(image, pipe.x, 0.0, pipe.width, pipe.top, &rotation);
        raster.draw_image(image, pipe.x, bottom_y, pipe.width, bottom_h, &rotation);
        return;
    }

    raster.fill_rotated_rect(pipe.x, 0.0, pipe.width, pipe.top, &rotation, PIPE, 1.0);
    raster.fill_rotated_rect(pipe.x, bottom_y, pipe.width, bottom_h, &rotation, PIPE, 1.0);
    raster.fill_rotated_rect(
        pipe.x,
        (pipe.top - PIPE_LIP_HEIGHT).max(0.0),
        pipe.width,
        PIPE_LIP_HEIGHT,
        &rotation,
        Rgb::BLACK,
        PIPE_LIP_ALPHA,
    );
}

fn draw_bird(raster: &mut Raster, bird: &Bird, frames: u64, assets: &Assets) {
    let body = Rotation::around(bird.x, bird.y, bird.rotation);

    if let Some(image) = assets.get(AssetKind::Bird) {
        let (w, h) = BIRD_SPRITE_SIZE;
        raster.draw_image(image, bird.x - w / 2.0, bird.y - h / 2.0, w, h, &body);
        return;
    }

    raster.fill_ellipse(
        bird.x,
        bird.y,
        bird.radius,
        bird.radius * 0.85,
        bird.rotation,
        BIRD_BODY,
        1.0,
    );

    // Wing bobs with the frame counter
    let flutter = (frames as f64 / 6.0).sin() * 6.0;
    let (wx, wy) = body.apply(bird.x - 4.0, bird.y + 4.0 + flutter / 6.0);
    raster.fill_ellipse(
        wx,
        wy,
        bird.radius * 0.6,
        bird.radius * 0.25,
        bird.rotation - 0.4,
        BIRD_WING,
        1.0,
    );

    let (ex, ey) = body.apply(bird.x + 6.0, bird.y - 4.0);
    raster.fill_circle(ex, ey, 3.0, BIRD_EYE, 1.0);
}

fn draw_particle(raster: &mut Raster, particle: &Particle) {
    raster.fill_circle(
        particle.x,
        particle.y,
        particle.radius(),
        particle.color,
        particle.alpha(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{self, Viewport};
    use image::RgbaImage;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world(width: f64, height: f64) -> (FlappyGame, Sky, Raster) {
        let viewport = Viewport::new(width, height);
        let game = FlappyGame::new(viewport, 0, 1);
        // 1 raster pixel per world pixel
        let raster = Raster::new(width as usize, height as usize, width, height);
        (game, Sky::default(), raster)
    }

    #[test]
    fn test_fallback_scene_without_assets() {
        let (game, mut sky, mut raster) = world(480.0, 360.0);
        render_world(&mut raster, &game, &mut sky, &Assets::none());

        assert_eq!(raster.pixel(5, 0), SKY_TOP);
        assert_eq!(raster.pixel(5, 350), GROUND);
        let (bx, by) = (game.bird.x as usize, game.bird.y as usize);
        assert_eq!(raster.pixel(bx + 15, by), BIRD_BODY);
    }

    #[test]
    fn test_pipes_drawn_with_gap() {
        let (mut game, mut sky, mut raster) = world(480.0, 360.0);
        game.pipes.push(Pipe {
            x: 300.0,
            top: 100.0,
            gap: 120.0,
            width: 60.0,
            passed: false,
            rotation: 0.0,
            wobble: 0.0,
        });
        render_world(&mut raster, &game, &mut sky, &Assets::none());

        assert_eq!(raster.pixel(330, 50), PIPE);
        assert_eq!(raster.pixel(330, 250), PIPE);
        // Open gap shows the sky
        assert_ne!(raster.pixel(330, 160), PIPE);
        // Shadow lip just above the gap
        let lip = raster.pixel(330, 96);
        assert_eq!(lip, PIPE.lerp(Rgb::BLACK, PIPE_LIP_ALPHA));
    }

    #[test]
    fn test_each_pipe_tilts_by_its_own_wobble() {
        let (mut game, mut sky, mut raster) = world(480.0, 360.0);
        game.bird.x = 420.0;
        game.bird.y = 300.0;
        let tilted = Pipe {
            x: 100.0,
            top: 200.0,
            gap: 100.0,
            width: 60.0,
            passed: false,
            rotation: 0.2,
            wobble: std::f64::consts::FRAC_PI_2,
        };
        let upright = Pipe {
            x: 300.0,
            wobble: 0.0,
            ..tilted.clone()
        };
        assert!((tilted.tilt() - 0.2).abs() < 1e-12);
        assert_eq!(upright.tilt(), 0.0);
        game.pipes = vec![tilted.clone(), upright];
        render_world(&mut raster, &game, &mut sky, &Assets::none());

        // Near the bottom corners of the tilted pipe's top segment
        let rotation = Rotation::around(130.0, 0.0, tilted.tilt());
        let (lx, ly) = rotation.apply(103.0, 185.0);
        let (rx, ry) = rotation.apply(157.0, 185.0);
        assert_eq!(raster.pixel(lx.round() as usize, ly.round() as usize), PIPE);
        assert_eq!(raster.pixel(rx.round() as usize, ry.round() as usize), PIPE);
        // Swung out past its upright column on the left
        assert!(lx < 100.0);
        assert_ne!(raster.pixel(157, 185), PIPE);

        // The untilted pipe keeps its upright edges
        assert_eq!(raster.pixel(302, 185), PIPE);
        assert_eq!(raster.pixel(357, 185), PIPE);
        assert_ne!(raster.pixel(297, 185), PIPE);
        assert_ne!(raster.pixel(363, 185), PIPE);
    }

    #[test]
    fn test_render_advances_clouds_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (mut game, _, mut raster) = world(480.0, 360.0);
        let mut sky = Sky::new(game.viewport, &mut rng);
        game::reset(&mut game, &mut rng);
        let before = game.clone();
        let clouds_before: Vec<f64> = sky.clouds.iter().map(|c| c.x).collect();

        render_world(&mut raster, &game, &mut sky, &Assets::none());

        assert_eq!(game.bird, before.bird);
        assert_eq!(game.pipes, before.pipes);
        assert_eq!(game.frames, before.frames);
        for (cloud, x) in sky.clouds.iter().zip(clouds_before) {
            assert!(cloud.x < x || cloud.x > game.viewport.width);
        }
    }

    #[test]
    fn test_assets_replace_primitives_per_asset() {
        let (game, mut sky, mut raster) = world(480.0, 360.0);
        let mut assets = Assets::none();
        let red = RgbaImage::from_fn(2, 2, |_, _| image::Rgba([255, 0, 0, 255]));
        assets.insert(AssetKind::Background, red);
        render_world(&mut raster, &game, &mut sky, &assets);

        assert_eq!(raster.pixel(5, 5), Rgb(255, 0, 0));
        // Ground and bird still use primitives
        assert_eq!(raster.pixel(5, 350), GROUND);
        let (bx, by) = (game.bird.x as usize, game.bird.y as usize);
        assert_eq!(raster.pixel(bx + 15, by), BIRD_BODY);
    }

    #[test]
    fn test_particles_fade_over_background() {
        let (mut game, mut sky, mut raster) = world(200.0, 200.0);
        game.particles.push(Particle {
            x: 50.0,
            y: 50.0,
            vx: 0.0,
            vy: 0.0,
            life: 30,
            color: Rgb::WHITE,
        });
        render_world(&mut raster, &game, &mut sky, &Assets::none());
        let px = raster.pixel(50, 50);
        assert_ne!(px, Rgb::WHITE);
        assert_ne!(px, raster.pixel(50, 10));
    }
}
