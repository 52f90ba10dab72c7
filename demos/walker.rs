use macroquad::logging::error;
use macroquad::prelude::*;
use macroquad_tiles::render::backend::MacroquadBackend;
use macroquad_tiles::{Assets, Sprite, TextureConfig};

fn window_conf() -> Conf {
    Conf {
        window_title: "Walker".into(),
        window_width: 800,
        window_height: 450,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(e) = run().await {
        error!("{:#}", e);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut backend = MacroquadBackend::new(TextureConfig::default());
    backend.textures.preload("assets/hero.png").await?;
    let mut assets = Assets::new();
    let hero = assets.load_animation("assets/hero.json", &mut backend.textures)?;

    let mut sprite = Sprite::new(hero, vec2(screen_width() / 2.0, screen_height() / 2.0));
    sprite.set_uniform_scale(4.0);

    loop {
        let dt = get_frame_time();
        let mut step = Vec2::ZERO;
        if is_key_down(KeyCode::Right) {
            step.x += 1.0;
        }
        if is_key_down(KeyCode::Left) {
            step.x -= 1.0;
        }
        if is_key_down(KeyCode::Down) {
            step.y += 1.0;
        }
        if is_key_down(KeyCode::Up) {
            step.y -= 1.0;
        }

        if let Some(player) = assets.players.get_mut(hero) {
            if step == Vec2::ZERO {
                player.play("idle", true);
            } else {
                player.play("walk", true);
            }
        }
        if step.x != 0.0 {
            sprite.set_flip_x(step.x < 0.0);
        }
        sprite.set_position(sprite.position() + step.normalize_or_zero() * 150.0 * dt);
        sprite.update(&mut assets.players, dt)?;

        clear_background(DARKGREEN);
        sprite.draw(&assets.players, &mut backend.canvas())?;
        draw_text("arrows to walk", 20.0, 30.0, 24.0, WHITE);
        next_frame().await;
    }
}
