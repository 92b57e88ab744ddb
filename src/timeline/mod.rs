/// Timeline orchestrator
///
/// Holds one disc per record in chronological order and advances all of
/// them once per rendered frame. The caller owns the frame loop: call
/// [`Timeline::frame`] once for every frame signal from the host.

pub mod animation;
pub mod disc;
pub mod entity;
pub mod label;
pub mod record;

pub use animation::CollisionAnimation;
pub use disc::Disc;
pub use entity::{Entity, Kind};
pub use label::{LabelStyle, LabelSurface, MemoryLabelSurface};
pub use record::{LocalDateTime, Record};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, trace};

use crate::config::{DescriptionConfigData, TimelineConfig};
use crate::core::{Camera, ViewControls, Viewport};
use crate::ecs::rendering::{extract_render_batch, RenderBatch};
use crate::ecs::RenderScene;

/// Summary of one advanced frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub collisions: usize,
    pub camera_distance: f32,
    pub description_opacity: f32,
}

pub struct Timeline {
    config: TimelineConfig,
    discs: Vec<Disc>,
    viewport: Viewport,
    reference_ms: i64,
    description_opacity: f32,
    frame: u64,
    scene: RenderScene,
}

impl Timeline {
    /// Build one disc per record; `records` must already be oldest first
    pub fn new<S: LabelSurface + ?Sized>(
        records: &[Record],
        config: TimelineConfig,
        viewport: Viewport,
        surface: &mut S,
    ) -> Self {
        let reference_ms = config.reference_time_ms.unwrap_or_else(now_ms);
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let discs: Vec<Disc> = records
            .iter()
            .map(|record| Disc::new(record, &config, reference_ms, &mut rng, surface))
            .collect();

        // Labels start placed for the configured camera, before any frame runs
        let mut camera = Camera::from(&config.camera);
        camera.set_aspect(viewport.aspect());
        for disc in &discs {
            disc.update_label(&camera, viewport, &config.labels, surface);
        }

        let scene = RenderScene::build(&discs, &config);
        let entity_total: usize = discs.iter().map(|disc| disc.entities().len()).sum();
        info!(
            "Timeline built: {} discs, {} entities, reference {} ms",
            discs.len(),
            entity_total,
            reference_ms
        );

        Self {
            config,
            discs,
            viewport,
            reference_ms,
            description_opacity: 1.0,
            frame: 0,
            scene,
        }
    }

    /// Advance one frame: camera damping, description fade, then every disc
    pub fn frame<C, S>(&mut self, controls: &mut C, surface: &mut S) -> FrameStats
    where
        C: ViewControls + ?Sized,
        S: LabelSurface + ?Sized,
    {
        controls.update();

        let distance = controls.distance();
        self.description_opacity = description_opacity(distance, &self.config.description);
        surface.set_description_opacity(self.description_opacity);

        let mut collisions = 0;
        for disc in &mut self.discs {
            disc.update_label(controls.camera(), self.viewport, &self.config.labels, surface);
            collisions += disc.tick();
            if self.config.rotation.enabled {
                disc.spin();
            }
        }

        self.scene.sync(&self.discs);
        self.frame += 1;

        trace!("frame {} | distance={:.1} | collisions={}", self.frame, distance, collisions);

        FrameStats {
            frame: self.frame,
            collisions,
            camera_distance: distance,
            description_opacity: self.description_opacity,
        }
    }

    /// Viewport size changed; only the projection inputs move
    pub fn resize<C: ViewControls + ?Sized>(&mut self, width: f32, height: f32, controls: &mut C) {
        self.viewport = Viewport::new(width, height);
        controls.set_aspect(self.viewport.aspect());
        debug!("Viewport resized to {}x{}", width, height);
    }

    /// Instances for the external renderer, farthest first
    pub fn render_batch<C: ViewControls + ?Sized>(&self, controls: &C) -> RenderBatch {
        extract_render_batch(&self.scene.world, controls.camera().position())
    }

    pub fn discs(&self) -> &[Disc] {
        &self.discs
    }

    pub fn scene(&self) -> &RenderScene {
        &self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn reference_ms(&self) -> i64 {
        self.reference_ms
    }

    pub fn description_opacity(&self) -> f32 {
        self.description_opacity
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }
}

/// Description panel fades out as the camera zooms in past the threshold
pub fn description_opacity(camera_distance: f32, description: &DescriptionConfigData) -> f32 {
    if camera_distance >= description.fade_threshold {
        return 1.0;
    }
    let span = description.fade_threshold - description.fade_floor;
    if span <= 0.0 {
        return 0.0;
    }
    ((camera_distance - description.fade_floor) / span).clamp(0.0, 1.0)
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
