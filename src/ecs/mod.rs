/// Render scene
///
/// The timeline keeps its own disc and entity state; once per frame it is
/// mirrored into a hecs world that the external renderer reads through
/// [`rendering::extract_render_batch`].

pub mod components;
pub mod rendering;

use glam::{Quat, Vec3};
use hecs::World;

use crate::config::TimelineConfig;
use crate::timeline::Disc;
use components::{DiscMember, Shape, Tint, Transform};

/// Scene handles spawned for one disc
#[derive(Debug, Clone)]
struct DiscHandles {
    mesh: hecs::Entity,
    ring: Option<hecs::Entity>,
    entities: Vec<hecs::Entity>,
}

pub struct RenderScene {
    /// hecs World - stores all drawable objects
    pub world: World,
    discs: Vec<DiscHandles>,
    ring_width: f32,
}

impl RenderScene {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            discs: Vec::new(),
            ring_width: 0.0,
        }
    }

    /// Spawn the meshes for every disc
    pub fn build(discs: &[Disc], config: &TimelineConfig) -> Self {
        let mut scene = Self::new();
        scene.ring_width = config.rotation.ring_width;
        for (index, disc) in discs.iter().enumerate() {
            scene.add_disc(index, disc, config);
        }
        scene
    }

    fn add_disc(&mut self, index: usize, disc: &Disc, config: &TimelineConfig) {
        let anchor = disc.world_anchor();
        let member = DiscMember { disc: index, entity: None };

        let mesh = self.world.spawn((
            Transform {
                position: anchor,
                rotation: Quat::IDENTITY,
                scale: Vec3::new(disc.radius(), 1.0, disc.radius()),
            },
            Shape::Disc,
            Tint {
                color: config.disc.mesh_color,
                opacity: (disc.opacity() * config.disc.mesh_opacity_scale).clamp(0.0, 1.0),
            },
            member,
        ));

        let ring = config.rotation.enabled.then(|| {
            let outer = disc.radius() + self.ring_width;
            self.world.spawn((
                Transform {
                    position: anchor,
                    rotation: disc.ring_rotation(),
                    scale: Vec3::splat(outer),
                },
                Shape::Ring {
                    inner: if outer > 0.0 { disc.radius() / outer } else { 0.0 },
                },
                Tint {
                    color: config.death.color,
                    opacity: disc.opacity().clamp(0.0, 1.0),
                },
                member,
            ))
        });

        let entities = disc
            .entities()
            .iter()
            .enumerate()
            .map(|(i, entity)| {
                let style = entity.kind().style(config);
                self.world.spawn((
                    Transform {
                        position: entity.position(),
                        rotation: Quat::IDENTITY,
                        scale: Vec3::splat(entity.radius()),
                    },
                    Shape::Sphere,
                    Tint {
                        color: entity.color(),
                        opacity: (disc.opacity() * style.opacity_scale).clamp(0.0, 1.0),
                    },
                    DiscMember { disc: index, entity: Some(i) },
                ))
            })
            .collect();

        self.discs.push(DiscHandles { mesh, ring, entities });
    }

    /// Copy this frame's positions, colors and ring angles into the scene
    pub fn sync(&mut self, discs: &[Disc]) {
        for (disc, handles) in discs.iter().zip(&self.discs) {
            if let Some(ring) = handles.ring {
                if let Ok(mut transform) = self.world.get::<&mut Transform>(ring) {
                    transform.rotation = disc.ring_rotation();
                }
            }

            for (i, &handle) in handles.entities.iter().enumerate() {
                let Some(position) = disc.entity_world_position(i) else {
                    continue;
                };
                if let Ok(mut transform) = self.world.get::<&mut Transform>(handle) {
                    transform.position = position;
                }
                if let Ok(mut tint) = self.world.get::<&mut Tint>(handle) {
                    tint.color = disc.entities()[i].color();
                }
            }
        }
    }

    /// Number of spawned scene objects
    pub fn entity_count(&self) -> u32 {
        self.world.len()
    }

    pub fn disc_mesh(&self, disc: usize) -> Option<hecs::Entity> {
        self.discs.get(disc).map(|handles| handles.mesh)
    }

    pub fn disc_entity(&self, disc: usize, entity: usize) -> Option<hecs::Entity> {
        self.discs.get(disc)?.entities.get(entity).copied()
    }
}

impl Default for RenderScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::label::MemoryLabelSurface;
    use crate::timeline::record::{LocalDateTime, Record};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn discs(config: &TimelineConfig) -> Vec<Disc> {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut surface = MemoryLabelSurface::new();
        let record = Record::new(LocalDateTime::parse("2019/07/18 10:00:00").unwrap(), 20, 30);
        vec![Disc::new(&record, config, record.timestamp_ms, &mut rng, &mut surface)]
    }

    #[test]
    fn test_build_spawns_mesh_per_object() {
        let config = TimelineConfig::default();
        let discs = discs(&config);
        let scene = RenderScene::build(&discs, &config);
        // One disc mesh and fifty spheres, no ring without rotation
        assert_eq!(scene.entity_count(), 51);
        assert!(scene.disc_mesh(0).is_some());
        assert!(scene.disc_mesh(1).is_none());
    }

    #[test]
    fn test_ring_spawned_when_rotating() {
        let mut config = TimelineConfig::default();
        config.rotation.enabled = true;
        let discs = discs(&config);
        let scene = RenderScene::build(&discs, &config);
        assert_eq!(scene.entity_count(), 52);
    }

    #[test]
    fn test_sync_follows_entities() {
        let config = TimelineConfig::default();
        let mut discs = discs(&config);
        let mut scene = RenderScene::build(&discs, &config);

        for _ in 0..10 {
            discs[0].tick();
        }
        scene.sync(&discs);

        let handle = scene.disc_entity(0, 3).unwrap();
        let transform = *scene.world.get::<&Transform>(handle).unwrap();
        assert_eq!(transform.position, discs[0].entity_world_position(3).unwrap());
        let tint = *scene.world.get::<&Tint>(handle).unwrap();
        assert_eq!(tint.color, discs[0].entities()[3].color());
    }
}
