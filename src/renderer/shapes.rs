//! Tessellation of scene commands into colored triangles
//!
//! Everything is drawn as axis-aligned quads in screen pixels; the pipeline
//! maps pixels to NDC. Text (score, captions) is left to the HUD layer.

use super::scene::{DrawCommand, Scene};
use super::vertex::{Vertex, colors};
use crate::assets::Sprite;
use crate::consts::*;
use crate::sim::{LaneCategory, Rect};

/// Two triangles covering `rect`
pub fn quad(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0) = (rect.pos.x, rect.pos.y);
    let (x1, y1) = (rect.right(), rect.bottom());
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Rectangle border of the given thickness, drawn inside `rect`
pub fn outline(rect: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (x, y, w, h) = (rect.pos.x, rect.pos.y, rect.size.x, rect.size.y);
    let sides = [
        Rect::new(x, y, w, thickness),
        Rect::new(x, y + h - thickness, w, thickness),
        Rect::new(x, y, thickness, h),
        Rect::new(x + w - thickness, y, thickness, h),
    ];
    sides.iter().flat_map(|side| quad(side, color)).collect()
}

fn lane_color(category: LaneCategory, texture: u8) -> [f32; 4] {
    let palette: &[[f32; 4]] = match category {
        LaneCategory::Grass => &colors::GRASS,
        LaneCategory::Road => &colors::ROAD,
        LaneCategory::River => &colors::RIVER,
    };
    palette[usize::from(texture) % palette.len()]
}

fn lane(out: &mut Vec<Vertex>, category: LaneCategory, texture: u8, screen_y: f32) {
    let strip = Rect::new(0.0, screen_y, SCREEN_WIDTH, GRID);
    out.extend(quad(&strip, lane_color(category, texture)));
    if category == LaneCategory::Road {
        // Dashed centre line
        let mut x = 10.0;
        while x < SCREEN_WIDTH {
            let dash = Rect::new(x, screen_y + GRID / 2.0 - 1.5, 20.0, 3.0);
            out.extend(quad(&dash, colors::ROAD_MARKING));
            x += 50.0;
        }
    }
}

fn sprite(out: &mut Vec<Vertex>, sprite: Sprite, rect: &Rect, flipped: bool) {
    // Inset so neighbouring sprites read as separate shapes
    let body = Rect::new(rect.pos.x + 2.0, rect.pos.y + 6.0, rect.size.x - 4.0, rect.size.y - 12.0);
    match sprite {
        Sprite::Car(variant) => {
            let color = colors::CARS[usize::from(variant) % colors::CARS.len()];
            out.extend(quad(&body, color));
            // Headlights on the leading edge; art faces left unless flipped
            let lamp_x = if flipped { body.right() - 6.0 } else { body.pos.x };
            for lamp_y in [body.pos.y + 4.0, body.bottom() - 10.0] {
                out.extend(quad(&Rect::new(lamp_x, lamp_y, 6.0, 6.0), colors::HEADLIGHT));
            }
        }
        Sprite::Log => {
            out.extend(quad(&body, colors::LOG));
            for end_x in [body.pos.x, body.right() - 8.0] {
                out.extend(quad(&Rect::new(end_x, body.pos.y, 8.0, body.size.y), colors::LOG_END));
            }
        }
        Sprite::Crab => {
            let shell = Rect::new(rect.pos.x + 8.0, rect.pos.y + 12.0, rect.size.x - 16.0, rect.size.y - 20.0);
            out.extend(quad(&shell, colors::CRAB));
            // Claws
            out.extend(quad(&Rect::new(rect.pos.x, rect.pos.y + 8.0, 10.0, 10.0), colors::CRAB));
            out.extend(quad(&Rect::new(rect.right() - 10.0, rect.pos.y + 8.0, 10.0, 10.0), colors::CRAB));
            // Eyes
            for eye_x in [shell.pos.x + 8.0, shell.right() - 14.0] {
                out.extend(quad(&Rect::new(eye_x, shell.pos.y + 4.0, 6.0, 6.0), colors::CRAB_EYE));
            }
        }
    }
}

fn game_over(out: &mut Vec<Vertex>, retry: &Rect) {
    out.extend(quad(
        &Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
        colors::OVERLAY,
    ));
    out.extend(quad(retry, colors::RETRY_FILL));
    out.extend(outline(retry, 2.0, colors::RETRY_BORDER));
}

/// Tessellate a whole scene, back to front
pub fn tessellate(scene: &Scene) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(scene.commands.len() * 18);
    for command in &scene.commands {
        match command {
            DrawCommand::Background => out.extend(quad(
                &Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
                colors::BACKGROUND,
            )),
            DrawCommand::Lane {
                category,
                texture,
                screen_y,
            } => lane(&mut out, *category, *texture, *screen_y),
            DrawCommand::Sprite {
                sprite: kind,
                rect,
                flipped,
            } => sprite(&mut out, *kind, rect, *flipped),
            DrawCommand::Score { .. } => {}
            DrawCommand::GameOver { retry, .. } => game_over(&mut out, retry),
        }
    }
    out
}
