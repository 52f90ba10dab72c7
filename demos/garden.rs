use macroquad::logging::{error, info};
use macroquad::prelude::*;
use macroquad_tiles::render::backend::MacroquadBackend;
use macroquad_tiles::{Assets, Camera, Map, TextureConfig};

const SCALE: f32 = 3.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "Garden".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

/// World-space view of `camera` scaled up by `SCALE`.
fn world_camera(camera: &Camera, view: Vec2) -> Camera2D {
    let tl = camera.top_left();
    Camera2D::from_display_rect(Rect::new(tl.x, tl.y + view.y, view.x, -view.y))
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(e) = run().await {
        error!("{:#}", e);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = TextureConfig::from_file("assets/textures.json")?;
    let mut backend = MacroquadBackend::new(config);
    backend.textures.preload("assets/garden.png").await?;
    let mut assets = Assets::new();
    let garden = assets.load_tileset("assets/garden.json", &mut backend.textures)?;

    let mut map = Map::new("garden", 40, 24, 16);
    let ground = map.add_layer("ground", garden)?;
    let water = map.add_layer("water", garden)?;
    {
        let mut layer = map.layer_mut(ground)?;
        for row in 0..24 {
            for col in 0..40 {
                layer.set_tile(if (row + col) % 7 == 0 { 2 } else { 1 }, row, col)?;
            }
        }
    }
    {
        let mut layer = map.layer_mut(water)?;
        for row in 8..14 {
            for col in 12..22 {
                layer.set_tile(3, row, col)?;
            }
        }
        for col in 0..40 {
            layer.set_tile(6, 0, col)?;
        }
    }
    let nav = map.generate_navigation_map(&assets)?;
    info!("{} of {} cells are solid", nav.solid_count(), nav.cells().len());

    let mut camera = Camera::new(Vec2::ZERO);
    loop {
        let dt = get_frame_time();
        let speed = 120.0 * dt;
        if is_key_down(KeyCode::Right) {
            camera.target.x += speed;
        }
        if is_key_down(KeyCode::Left) {
            camera.target.x -= speed;
        }
        if is_key_down(KeyCode::Down) {
            camera.target.y += speed;
        }
        if is_key_down(KeyCode::Up) {
            camera.target.y -= speed;
        }

        map.update(&mut assets, dt)?;

        clear_background(BLACK);
        let view = vec2(screen_width(), screen_height()) / SCALE;
        set_camera(&world_camera(&camera, view));
        map.draw(&assets, &camera, view.x, view.y, &mut backend.canvas())?;
        set_default_camera();

        draw_text(&format!("FPS: {}", get_fps()), 20.0, 40.0, 30.0, RED);
        next_frame().await;
    }
}
