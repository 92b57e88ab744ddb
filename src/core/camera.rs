use glam::{Mat4, Vec3};
use std::f32::consts::PI;

/// Perspective camera looking at a target point
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    position: Vec3,
    /// Point the camera looks at
    target: Vec3,
    up: Vec3,
    /// Vertical field of view in radians
    fov: f32,
    aspect: f32,
    /// Near clipping plane distance
    near_plane: f32,
    /// Far clipping plane distance
    far_plane: f32,
}

impl Camera {
    /// Create a new camera at the given position looking at the origin
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 50.0_f32.to_radians(),
            aspect,
            near_plane: 1.0,
            far_plane: 5000.0,
        }
    }

    /// Create a camera with custom projection parameters
    pub fn with_projection(position: Vec3, aspect: f32, fov: f32, near_plane: f32, far_plane: f32) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov,
            aspect,
            near_plane,
            far_plane,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near_plane(&self) -> f32 {
        self.near_plane
    }

    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update aspect ratio after a viewport resize
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix (WebGL clip space, z in [-1, 1])
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.near_plane, self.far_plane)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl From<&crate::config::CameraConfigData> for Camera {
    fn from(data: &crate::config::CameraConfigData) -> Self {
        let mut camera = Self::with_projection(
            data.position,
            1.0,
            data.fov.to_radians(),
            data.near,
            data.far,
        );
        camera.look_at(data.target);
        camera
    }
}

/// What the timeline needs from whoever drives the camera
pub trait ViewControls {
    /// Current distance between camera and orbit target
    fn distance(&self) -> f32;

    /// Advance one damping step
    fn update(&mut self);

    fn camera(&self) -> &Camera;

    fn set_aspect(&mut self, aspect: f32);
}

/// Damped orbit around a fixed target, no panning
#[derive(Debug, Clone)]
pub struct OrbitControls {
    camera: Camera,
    /// Radius, polar angle from +Y, azimuth around Y
    radius: f32,
    polar: f32,
    azimuth: f32,
    /// Pending rotation, consumed over several updates when damping
    delta_azimuth: f32,
    delta_polar: f32,
    scale: f32,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
}

impl OrbitControls {
    pub fn new(camera: Camera) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        let polar = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };
        let azimuth = offset.x.atan2(offset.z);

        Self {
            camera,
            radius,
            polar,
            azimuth,
            delta_azimuth: 0.0,
            delta_polar: 0.0,
            scale: 1.0,
            damping_factor: 0.2,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
        }
    }

    pub fn from_config(data: &crate::config::CameraConfigData, aspect: f32) -> Self {
        let mut camera = Camera::from(data);
        camera.set_aspect(aspect);
        let mut controls = Self::new(camera);
        controls.damping_factor = data.damping_factor;
        controls.min_distance = data.min_distance;
        controls.max_distance = data.max_distance;
        controls.min_polar_angle = data.min_polar_angle;
        controls.max_polar_angle = data.max_polar_angle;
        controls.auto_rotate = data.auto_rotate;
        controls.auto_rotate_speed = data.auto_rotate_speed;
        controls
    }

    /// Rotate around the vertical axis
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_azimuth -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_polar -= angle;
    }

    /// Move closer by `factor` (> 1 zooms in)
    pub fn dolly_in(&mut self, factor: f32) {
        self.scale /= factor;
    }

    pub fn dolly_out(&mut self, factor: f32) {
        self.scale *= factor;
    }

    /// One full turn per minute at 60fps when speed is 1
    fn auto_rotation_angle(&self) -> f32 {
        2.0 * PI / 60.0 / 60.0 * self.auto_rotate_speed
    }
}

impl ViewControls for OrbitControls {
    fn distance(&self) -> f32 {
        self.camera.position.distance(self.camera.target)
    }

    fn update(&mut self) {
        if self.auto_rotate {
            self.rotate_left(self.auto_rotation_angle());
        }

        let damped = self.damping_factor > 0.0 && self.damping_factor < 1.0;
        if damped {
            self.azimuth += self.delta_azimuth * self.damping_factor;
            self.polar += self.delta_polar * self.damping_factor;
        } else {
            self.azimuth += self.delta_azimuth;
            self.polar += self.delta_polar;
        }

        // Never sit exactly on a pole, look_at degenerates there
        let pole_eps = 1e-6;
        let min_polar = self.min_polar_angle.max(pole_eps);
        let max_polar = self.max_polar_angle.min(PI - pole_eps);
        self.polar = self.polar.clamp(min_polar, max_polar);

        self.radius = (self.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let sin_polar = self.polar.sin();
        let offset = Vec3::new(
            self.radius * sin_polar * self.azimuth.sin(),
            self.radius * self.polar.cos(),
            self.radius * sin_polar * self.azimuth.cos(),
        );
        self.camera.position = self.camera.target + offset;

        if damped {
            self.delta_azimuth *= 1.0 - self.damping_factor;
            self.delta_polar *= 1.0 - self.damping_factor;
        } else {
            self.delta_azimuth = 0.0;
            self.delta_polar = 0.0;
        }
        self.scale = 1.0;
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }
}
