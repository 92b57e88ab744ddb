/// One record's time slice: a flat disc of drifting casualty points
///
/// Points bounce off the disc's rim and flash when they do. The disc also
/// owns the screen placement of its date label.

use glam::{Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use super::entity::{Entity, Kind};
use super::label::{LabelId, LabelStyle, LabelSurface};
use super::record::Record;
use crate::config::{CollisionPolicy, DiscConfigData, LabelConfigData, TimelineConfig};
use crate::core::{world_to_screen, Camera, ScreenPoint, Viewport};

#[derive(Debug, Clone)]
pub struct Disc {
    date_label: String,
    radius: f32,
    center: Vec3,
    /// Age-faded opacity, may fall below zero for very old records
    opacity: f32,
    entities: Vec<Entity>,
    label: LabelId,
    collision_policy: CollisionPolicy,

    /// Share of deaths among all casualties, drives ring spin
    severity: f32,
    ring_speed: f32,
    group_speed: f32,
    ring_angle: f32,
    group_angle: f32,
}

impl Disc {
    /// Build the disc for `record`, scatter its entities and register its label
    pub fn new<R, S>(
        record: &Record,
        config: &TimelineConfig,
        reference_ms: i64,
        rng: &mut R,
        surface: &mut S,
    ) -> Self
    where
        R: Rng + ?Sized,
        S: LabelSurface + ?Sized,
    {
        let total = record.total();
        let radius = total as f32 * config.disc.radius_factor;
        let center = Vec3::new(0.0, plane_height(record.timestamp_ms, reference_ms, &config.disc), 0.0);
        let opacity = age_opacity(record.timestamp_ms, reference_ms, &config.disc);

        let kinds = std::iter::repeat(Kind::Death)
            .take(record.death_count as usize)
            .chain(std::iter::repeat(Kind::Injury).take(record.injury_count as usize));

        let mut entities = Vec::with_capacity(total as usize);
        for kind in kinds {
            let mut entity = Entity::spawn(kind, kind.style(config), config.motion.max_speed, rng);
            let position = sample_in_circle(rng, center, radius - entity.radius());
            entity.place(position);
            entities.push(entity);
        }

        let severity = if total > 0 {
            record.death_count as f32 / total as f32
        } else {
            0.0
        };
        let (ring_speed, group_speed) = if config.rotation.enabled {
            (severity * severity * config.rotation.ring_speed_factor, config.rotation.group_speed)
        } else {
            (0.0, 0.0)
        };

        let label = surface.create_label(&record.date_label);

        Self {
            date_label: record.date_label.clone(),
            radius,
            center,
            opacity,
            entities,
            label,
            collision_policy: config.motion.collision_policy,
            severity,
            ring_speed,
            group_speed,
            ring_angle: 0.0,
            group_angle: 0.0,
        }
    }

    /// Advance every entity one frame; returns how many collided
    pub fn tick(&mut self) -> usize {
        let collided: Vec<bool> = match self.collision_policy {
            CollisionPolicy::DiscBoundary => self
                .entities
                .iter()
                .map(|entity| self.hits_boundary(entity))
                .collect(),
            CollisionPolicy::EntityProximity => (0..self.entities.len())
                .map(|i| {
                    let entity = &self.entities[i];
                    self.entities
                        .iter()
                        .enumerate()
                        .any(|(j, other)| i != j && entity.is_colliding(other))
                })
                .collect(),
        };

        for (entity, &hit) in self.entities.iter_mut().zip(&collided) {
            entity.update_position(hit);
            entity.update_color(hit);
        }

        collided.iter().filter(|&&hit| hit).count()
    }

    /// Entity has reached or crossed the rim
    pub fn hits_boundary(&self, entity: &Entity) -> bool {
        self.center.distance(entity.position()) + entity.radius() >= self.radius
    }

    /// Advance the cosmetic ring and group rotation
    pub fn spin(&mut self) {
        self.ring_angle = (self.ring_angle + self.ring_speed).rem_euclid(TAU);
        self.group_angle = (self.group_angle + self.group_speed).rem_euclid(TAU);
    }

    /// Project the anchor and write the label's style
    ///
    /// The horizontal offset follows this disc's own distance to the camera,
    /// so labels of discs near the camera spread out first.
    pub fn update_label<S: LabelSurface + ?Sized>(
        &self,
        camera: &Camera,
        viewport: Viewport,
        labels: &LabelConfigData,
        surface: &mut S,
    ) -> ScreenPoint {
        let screen = world_to_screen(self.world_anchor(), camera, viewport);
        surface.set_label_style(
            self.label,
            LabelStyle {
                top: screen.y,
                left_offset: label_x(self.camera_distance(camera), labels),
                opacity: self.opacity.clamp(0.0, 1.0),
            },
        );
        screen
    }

    pub fn camera_distance(&self, camera: &Camera) -> f32 {
        camera.position().distance(self.world_anchor())
    }

    /// Rendered position of entity `index`, including group rotation
    pub fn entity_world_position(&self, index: usize) -> Option<Vec3> {
        let entity = self.entities.get(index)?;
        Some(self.center + self.group_rotation() * (entity.position() - self.center))
    }

    pub fn group_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.group_angle)
    }

    /// Ring marker lies flat on the disc plane and spins around Y
    pub fn ring_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.ring_angle) * Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)
    }

    pub fn world_anchor(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn plane_height(&self) -> f32 {
        self.center.y
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn label(&self) -> LabelId {
        self.label
    }

    pub fn date_label(&self) -> &str {
        &self.date_label
    }

    pub fn severity(&self) -> f32 {
        self.severity
    }

    pub fn ring_angle(&self) -> f32 {
        self.ring_angle
    }

    pub fn group_angle(&self) -> f32 {
        self.group_angle
    }
}

/// Height of a record's disc: older records sit further from `y_offset`
pub fn plane_height(timestamp_ms: i64, reference_ms: i64, disc: &DiscConfigData) -> f32 {
    ((reference_ms - timestamp_ms) as f64 * disc.y_factor + disc.y_offset as f64) as f32
}

pub fn age_opacity(timestamp_ms: i64, reference_ms: i64, disc: &DiscConfigData) -> f32 {
    (disc.base_opacity as f64 - (reference_ms - timestamp_ms) as f64 * disc.opacity_damping) as f32
}

/// Uniform-area sample inside a circle on the disc plane
///
/// A non-positive radius pins the point to the center.
pub fn sample_in_circle<R: Rng + ?Sized>(rng: &mut R, center: Vec3, max_radius: f32) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let r = rng.gen::<f32>().sqrt() * max_radius.max(0.0);
    center + Vec3::new(r * theta.cos(), 0.0, r * theta.sin())
}

/// Horizontal label offset; labels spread out as the camera closes in
pub fn label_x(camera_distance: f32, labels: &LabelConfigData) -> f32 {
    if camera_distance < labels.spread_threshold {
        let closer = labels.spread_threshold - camera_distance;
        closer * closer / labels.spread_divisor + labels.base_x
    } else {
        labels.base_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::label::MemoryLabelSurface;
    use crate::timeline::record::LocalDateTime;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn record(deaths: u32, injuries: u32) -> Record {
        Record::new(LocalDateTime::parse("2019/07/18 10:00:00").unwrap(), deaths, injuries)
    }

    fn build(record: &Record, config: &TimelineConfig) -> (Disc, MemoryLabelSurface) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut surface = MemoryLabelSurface::new();
        let disc = Disc::new(record, config, record.timestamp_ms, &mut rng, &mut surface);
        (disc, surface)
    }

    #[test]
    fn test_entities_per_kind() {
        let config = TimelineConfig::default();
        let (disc, surface) = build(&record(3, 2), &config);

        let deaths = disc.entities().iter().filter(|e| e.kind() == Kind::Death).count();
        let injuries = disc.entities().iter().filter(|e| e.kind() == Kind::Injury).count();
        assert_eq!((deaths, injuries), (3, 2));
        assert_abs_diff_eq!(disc.radius(), 5.0 * config.disc.radius_factor);
        assert_eq!(surface.labels.len(), 1);
        assert_eq!(surface.labels[0].text, "2019/07/18T10:00:00+09:00");
    }

    #[test]
    fn test_height_and_opacity_at_reference() {
        let config = TimelineConfig::default();
        let (disc, _) = build(&record(1, 0), &config);
        assert_abs_diff_eq!(disc.plane_height(), config.disc.y_offset);
        assert_abs_diff_eq!(disc.opacity(), config.disc.base_opacity);
    }

    #[test]
    fn test_entities_start_on_disc_plane() {
        let config = TimelineConfig::default();
        let (disc, _) = build(&record(40, 60), &config);
        for entity in disc.entities() {
            assert_eq!(entity.position().y, disc.plane_height());
            let max = disc.radius() - entity.radius();
            assert!(entity.position().distance(disc.world_anchor()) <= max + 1e-4);
        }
    }

    #[test]
    fn test_empty_record_has_degenerate_disc() {
        let config = TimelineConfig::default();
        let (mut disc, surface) = build(&record(0, 0), &config);
        assert!(disc.entities().is_empty());
        assert_eq!(disc.radius(), 0.0);
        assert_eq!(disc.severity(), 0.0);
        assert_eq!(disc.tick(), 0);
        assert_eq!(surface.labels.len(), 1);
    }

    #[test]
    fn test_tiny_disc_pins_entities_to_center() {
        let config = TimelineConfig::default();
        // Radius 0.2 is smaller than the entity radius 0.5
        let (disc, _) = build(&record(1, 1), &config);
        for entity in disc.entities() {
            assert_eq!(entity.position(), disc.world_anchor());
        }
    }

    #[test]
    fn test_entities_stay_near_disc_over_many_ticks() {
        let config = TimelineConfig::default();
        let (mut disc, _) = build(&record(50, 50), &config);
        let speed = config.motion.max_speed * std::f32::consts::SQRT_2;
        for _ in 0..5000 {
            disc.tick();
        }
        for entity in disc.entities() {
            let reach = entity.position().distance(disc.world_anchor()) + entity.radius();
            assert!(reach <= disc.radius() + 2.0 * speed + 1e-3);
            assert_eq!(entity.position().y, disc.plane_height());
        }
    }

    #[test]
    fn test_entity_proximity_policy() {
        let mut config = TimelineConfig::default();
        config.motion.collision_policy = CollisionPolicy::EntityProximity;
        // Many points on a small disc overlap each other
        config.disc.radius_factor = 0.05;
        let (mut disc, _) = build(&record(30, 0), &config);
        assert!(disc.tick() > 0);
    }

    #[test]
    fn test_label_x_spreads_below_threshold() {
        let labels = LabelConfigData::default();
        assert_eq!(label_x(145.0, &labels), 100.0);
        assert_eq!(label_x(400.0, &labels), 100.0);
        assert_abs_diff_eq!(label_x(135.0, &labels), 102.0);
        assert!(label_x(100.0, &labels) > label_x(135.0, &labels));
    }

    #[test]
    fn test_label_offset_uses_disc_distance() {
        let config = TimelineConfig::default();
        let (disc, mut surface) = build(&record(2, 2), &config);
        let viewport = Viewport::new(800.0, 600.0);
        // Orbit radius 150 around the origin, disc 20 above it at 130
        let mut camera = Camera::new(Vec3::new(0.0, 150.0, 0.001), viewport.aspect());
        camera.look_at(Vec3::ZERO);
        assert_abs_diff_eq!(disc.camera_distance(&camera), 130.0, epsilon = 1e-3);

        disc.update_label(&camera, viewport, &config.labels, &mut surface);
        let style = surface.labels[0].style.unwrap();
        assert_abs_diff_eq!(style.left_offset, 15.0 * 15.0 / 50.0 + 100.0, epsilon = 1e-2);
    }

    #[test]
    fn test_spin_only_when_enabled() {
        let mut config = TimelineConfig::default();
        let (mut still, _) = build(&record(3, 1), &config);
        still.spin();
        assert_eq!(still.ring_angle(), 0.0);
        assert_eq!(still.group_angle(), 0.0);

        config.rotation.enabled = true;
        let (mut spinning, _) = build(&record(3, 1), &config);
        spinning.spin();
        assert_abs_diff_eq!(spinning.ring_angle(), 0.75 * 0.75 * config.rotation.ring_speed_factor);
        assert_abs_diff_eq!(spinning.group_angle(), config.rotation.group_speed);
    }

    #[test]
    fn test_group_rotation_keeps_distance_to_center() {
        let mut config = TimelineConfig::default();
        config.rotation.enabled = true;
        config.rotation.group_speed = 0.5;
        let (mut disc, _) = build(&record(20, 20), &config);
        disc.spin();
        for i in 0..disc.entities().len() {
            let rendered = disc.entity_world_position(i).unwrap();
            let physical = disc.entities()[i].position();
            assert_abs_diff_eq!(
                rendered.distance(disc.world_anchor()),
                physical.distance(disc.world_anchor()),
                epsilon = 1e-4
            );
            assert_abs_diff_eq!(rendered.y, disc.plane_height());
        }
        assert!(disc.entity_world_position(1000).is_none());
    }
}
