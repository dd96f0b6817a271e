use macroquad::prelude::*;

use crate::field::ParticleField;
use crate::particle::ParticleView;

const BG_COLOR: Color = Color::new(0.02, 0.03, 0.08, 1.0);

/// Fill color of one dot: the shared color with the dot's own opacity.
pub fn dot_color(fill: Color, view: &ParticleView) -> Color {
    Color::new(fill.r, fill.g, fill.b, fill.a * view.alpha as f32 / 255.0)
}

pub fn draw_particles(views: &[ParticleView], fill: Color) {
    for v in views {
        draw_circle(v.x, v.y, v.radius, dot_color(fill, v));
    }
}

/// Clear the screen and draw the field's latest snapshot.
pub fn draw<R: ::rand::Rng>(field: &ParticleField<R>) {
    clear_background(BG_COLOR);
    draw_particles(field.snapshot(), field.fill_color());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_color_scales_fill_alpha() {
        let view = ParticleView {
            x: 0.0,
            y: 0.0,
            radius: 3.0,
            alpha: 51,
        };
        let c = dot_color(Color::new(1.0, 0.5, 0.25, 1.0), &view);
        assert_eq!((c.r, c.g, c.b), (1.0, 0.5, 0.25));
        assert!((c.a - 0.2).abs() < 1e-6);

        let half = dot_color(Color::new(1.0, 1.0, 1.0, 0.5), &ParticleView { alpha: 255, ..view });
        assert!((half.a - 0.5).abs() < 1e-6);
    }
}
