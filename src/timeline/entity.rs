use glam::{Vec2, Vec3};
use rand::Rng;

use super::animation::CollisionAnimation;
use crate::config::{KindStyle, TimelineConfig};
use crate::core::Color;

/// Which casualty an entity stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Kind {
    Death,
    Injury,
}

impl Kind {
    pub fn style(self, config: &TimelineConfig) -> &KindStyle {
        match self {
            Kind::Death => &config.death,
            Kind::Injury => &config.injury,
        }
    }
}

/// One casualty point drifting on its disc
#[derive(Debug, Clone)]
pub struct Entity {
    kind: Kind,
    radius: f32,
    base_color: Color,
    color: Color,
    position: Vec3,
    /// Planar drift (x, z); y stays on the disc plane
    velocity: Vec2,
    collision_anim: Option<CollisionAnimation>,
}

impl Entity {
    pub fn new(kind: Kind, style: &KindStyle, velocity: Vec2) -> Self {
        Self {
            kind,
            radius: style.radius,
            base_color: style.color,
            color: style.color,
            position: Vec3::ZERO,
            velocity,
            collision_anim: style
                .animation
                .map(|anim| CollisionAnimation::new(style.color, anim)),
        }
    }

    /// Entity with a random drift in `[-max_speed, max_speed)` per axis
    pub fn spawn<R: Rng + ?Sized>(kind: Kind, style: &KindStyle, max_speed: f32, rng: &mut R) -> Self {
        let velocity = if max_speed > 0.0 {
            Vec2::new(
                rng.gen_range(-max_speed..max_speed),
                rng.gen_range(-max_speed..max_speed),
            )
        } else {
            Vec2::ZERO
        };
        Self::new(kind, style, velocity)
    }

    pub fn place(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Bounce back along the incoming direction on collision, then drift
    pub fn update_position(&mut self, collided: bool) -> Vec3 {
        if collided {
            self.velocity = -self.velocity;
        }
        self.position.x += self.velocity.x;
        self.position.z += self.velocity.y;
        self.position
    }

    pub fn update_color(&mut self, collided: bool) -> Color {
        let Some(anim) = self.collision_anim.as_mut() else {
            self.color = self.base_color;
            return self.color;
        };

        if collided {
            anim.start();
        }

        if anim.is_finished() {
            anim.stop();
            self.color = self.base_color;
        } else {
            self.color = anim.current_color();
            anim.advance();
        }
        self.color
    }

    /// Sphere overlap test against another entity
    pub fn is_colliding(&self, other: &Entity) -> bool {
        self.position.distance(other.position) <= self.radius + other.radius
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    /// Color produced by the last `update_color`
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn collision_animation(&self) -> Option<&CollisionAnimation> {
        self.collision_anim.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn death() -> Entity {
        Entity::new(Kind::Death, &KindStyle::death(), Vec2::new(0.01, -0.005))
    }

    #[test]
    fn test_drift_without_collision() {
        let mut entity = death();
        entity.place(Vec3::new(1.0, 5.0, 1.0));
        let pos = entity.update_position(false);
        assert_abs_diff_eq!(pos.x, 1.01, epsilon = 1e-6);
        assert_abs_diff_eq!(pos.y, 5.0);
        assert_abs_diff_eq!(pos.z, 0.995, epsilon = 1e-6);
    }

    #[test]
    fn test_collision_reverses_velocity() {
        let mut entity = death();
        let before = entity.velocity();
        entity.update_position(true);
        assert_eq!(entity.velocity(), -before);
        entity.update_position(true);
        assert_eq!(entity.velocity(), before);
    }

    #[test]
    fn test_spawn_velocity_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1000 {
            let entity = Entity::spawn(Kind::Injury, &KindStyle::injury(), 0.01, &mut rng);
            assert!(entity.velocity().x.abs() <= 0.01);
            assert!(entity.velocity().y.abs() <= 0.01);
        }
    }

    #[test]
    fn test_injury_keeps_base_color() {
        let mut entity = Entity::new(Kind::Injury, &KindStyle::injury(), Vec2::ZERO);
        assert!(entity.collision_animation().is_none());
        assert_eq!(entity.update_color(true), KindStyle::injury().color);
        assert_eq!(entity.update_color(false), KindStyle::injury().color);
    }

    #[test]
    fn test_death_flashes_then_settles() {
        let mut entity = death();
        let flash = entity.update_color(true);
        assert_ne!(flash, entity.base_color());

        let frames = KindStyle::death().animation.unwrap().frames;
        let mut last = flash;
        for _ in 0..frames {
            last = entity.update_color(false);
        }
        assert_eq!(last, entity.base_color());
        assert!(entity.collision_animation().unwrap().is_finished());
    }

    #[test]
    fn test_entity_overlap() {
        let mut a = death();
        let mut b = death();
        a.place(Vec3::ZERO);
        b.place(Vec3::new(1.0, 0.0, 0.0));
        assert!(a.is_colliding(&b));
        b.place(Vec3::new(1.01, 0.0, 0.0));
        assert!(!a.is_colliding(&b));
    }
}
