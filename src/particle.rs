use macroquad::prelude::*;

/// One dot of the field. Respawned in place, never replaced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub angle: f32,
    pub distance: f32,
    pub base_distance: f32,
    pub velocity: f32,
    pub radius: f32,
    pub alpha: f32,
    pub base_alpha: f32,
}

impl Particle {
    /// Move one step toward the center and fade with the remaining distance.
    pub fn advance(&mut self) {
        self.distance = (self.distance - self.velocity).max(0.0);
        self.alpha = if self.base_distance > 0.0 {
            self.base_alpha * (self.distance / self.base_distance)
        } else {
            self.base_alpha
        };
    }

    pub fn position(&self, center: Vec2) -> Vec2 {
        center + Vec2::from_angle(self.angle) * self.distance
    }

    pub fn view(&self, center: Vec2) -> ParticleView {
        let pos = self.position(center);
        ParticleView {
            x: pos.x,
            y: pos.y,
            radius: self.radius,
            alpha: self.alpha.clamp(0.0, 255.0) as u8,
        }
    }
}

/// Render-ready snapshot entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_particle(distance: f32, velocity: f32) -> Particle {
        Particle {
            angle: 0.0,
            distance,
            base_distance: distance,
            velocity,
            radius: 4.0,
            alpha: 200.0,
            base_alpha: 200.0,
        }
    }

    #[test]
    fn advance_fades_linearly_with_distance() {
        let mut p = test_particle(400.0, 100.0);
        p.advance();
        assert_eq!(p.distance, 300.0);
        assert!((p.alpha - 150.0).abs() < 1e-4);
        p.advance();
        assert!((p.alpha - 100.0).abs() < 1e-4);
    }

    #[test]
    fn advance_never_goes_negative() {
        let mut p = test_particle(1.5, 2.0);
        p.advance();
        assert_eq!(p.distance, 0.0);
        assert_eq!(p.alpha, 0.0);
    }

    #[test]
    fn view_clamps_alpha_into_byte_range() {
        let mut p = test_particle(100.0, 1.0);
        p.alpha = 412.0;
        assert_eq!(p.view(Vec2::ZERO).alpha, 255);
        p.alpha = -3.0;
        assert_eq!(p.view(Vec2::ZERO).alpha, 0);
        p.alpha = 199.7;
        assert_eq!(p.view(Vec2::ZERO).alpha, 199);
    }

    #[test]
    fn position_is_polar_around_center() {
        let mut p = test_particle(10.0, 1.0);
        p.angle = std::f32::consts::FRAC_PI_2;
        let pos = p.position(vec2(100.0, 50.0));
        assert!((pos.x - 100.0).abs() < 1e-4);
        assert!((pos.y - 60.0).abs() < 1e-4);
    }
}
