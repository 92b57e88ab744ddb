use serde::Serialize;

/// Handle to a label element owned by the overlay
pub type LabelId = usize;

/// Style values written to a label every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelStyle {
    /// Pixels from the top of the overlay
    pub top: f32,
    /// Pixels right of the viewport's horizontal center
    pub left_offset: f32,
    pub opacity: f32,
}

impl LabelStyle {
    pub fn top_css(&self) -> String {
        format!("{}px", self.top)
    }

    pub fn left_css(&self) -> String {
        format!("calc(50vw + {}px)", self.left_offset)
    }
}

/// Overlay the timeline writes date labels and the description panel into
pub trait LabelSurface {
    fn create_label(&mut self, text: &str) -> LabelId;

    fn set_label_style(&mut self, id: LabelId, style: LabelStyle);

    fn set_description_opacity(&mut self, opacity: f32);
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelElement {
    pub text: String,
    pub style: Option<LabelStyle>,
}

/// In-memory overlay, used by the host binary and tests
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryLabelSurface {
    pub labels: Vec<LabelElement>,
    pub description_opacity: f32,
}

impl MemoryLabelSurface {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            description_opacity: 1.0,
        }
    }

    pub fn get(&self, id: LabelId) -> Option<&LabelElement> {
        self.labels.get(id)
    }
}

impl LabelSurface for MemoryLabelSurface {
    fn create_label(&mut self, text: &str) -> LabelId {
        self.labels.push(LabelElement {
            text: text.to_string(),
            style: None,
        });
        self.labels.len() - 1
    }

    fn set_label_style(&mut self, id: LabelId, style: LabelStyle) {
        if let Some(label) = self.labels.get_mut(id) {
            label.style = Some(style);
        }
    }

    fn set_description_opacity(&mut self, opacity: f32) {
        self.description_opacity = opacity;
    }
}
