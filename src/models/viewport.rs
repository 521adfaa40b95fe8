/// Host-observed geometry of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportState {
    pub scroll_top: f64,
    pub container_width: f64,
    pub container_height: f64,
}

impl ViewportState {
    pub fn new(container_width: f64, container_height: f64) -> Self {
        Self {
            scroll_top: 0.0,
            container_width,
            container_height,
        }
    }

    /// Whether the container has been measured with a usable width.
    pub fn is_measured(&self) -> bool {
        self.container_width.is_finite() && self.container_width > 0.0
    }
}
