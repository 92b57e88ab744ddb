use crate::config::AnimationStyle;
use crate::core::Color;

/// Collision flash: a precomputed color ramp played one frame per tick
///
/// `current_frame == frame_count` means idle. A new collision restarts the
/// ramp from its brightest color even while a previous flash is running.
#[derive(Debug, Clone)]
pub struct CollisionAnimation {
    frame_count: u32,
    current_frame: u32,
    resting: Color,
    ramp: Vec<Color>,
}

impl CollisionAnimation {
    pub fn new(resting: Color, style: AnimationStyle) -> Self {
        let flash = resting.brighten(style.brighten).saturate(style.saturate);
        let ramp = Color::scale(flash, resting, style.frames as usize);
        Self {
            frame_count: style.frames,
            current_frame: style.frames,
            resting,
            ramp,
        }
    }

    pub fn start(&mut self) {
        self.current_frame = 0;
    }

    pub fn advance(&mut self) {
        if self.current_frame < self.frame_count {
            self.current_frame += 1;
        }
    }

    pub fn stop(&mut self) {
        self.current_frame = self.frame_count;
    }

    pub fn is_finished(&self) -> bool {
        self.current_frame >= self.frame_count
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn current_color(&self) -> Color {
        self.ramp
            .get(self.current_frame as usize)
            .copied()
            .unwrap_or(self.resting)
    }

    pub fn ramp(&self) -> &[Color] {
        &self.ramp
    }
}
