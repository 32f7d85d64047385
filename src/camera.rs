use std::f32::consts::PI;

use glam::{vec3, Mat4, Vec3};

/// Perspective parameters. `fov` is the vertical field of view in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn proj_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov.to_radians(), self.aspect_ratio, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 75.,
            aspect_ratio: 16. / 9.,
            near: 0.1,
            far: 1000.,
        }
    }
}

/// View and projection state for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraTransform {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
}

impl CameraTransform {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view,
            projection,
            view_projection: projection * view,
        }
    }

    /// Camera right axis in world space.
    pub fn right(&self) -> Vec3 {
        self.view.row(0).truncate()
    }

    /// Camera up axis in world space.
    pub fn up(&self) -> Vec3 {
        self.view.row(1).truncate()
    }
}

/// A camera circling a target point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub camera: Camera,
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitCamera {
    const MAX_PITCH: f32 = PI * 0.5 - 0.01;
    const MIN_DISTANCE: f32 = 0.5;
    const MAX_DISTANCE: f32 = 100.;

    /// Orbit that places the eye at `eye`, looking at `target`.
    pub fn looking_at(camera: Camera, eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(Self::MIN_DISTANCE);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);

        Self {
            camera,
            target,
            yaw,
            pitch: pitch.clamp(-Self::MAX_PITCH, Self::MAX_PITCH),
            distance,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + vec3(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye(), self.target, Vec3::Y)
    }

    pub fn transform(&self) -> CameraTransform {
        CameraTransform::new(self.view_matrix(), self.camera.proj_matrix())
    }

    /// Rotates the orbit by the given angles in radians. Pitch stays short of
    /// the poles.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.yaw = (self.yaw + yaw).rem_euclid(PI * 2.0);
        self.pitch = (self.pitch + pitch).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    /// Scales the orbit distance; factors below one move closer.
    pub fn zoom(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.distance = (self.distance * factor).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.camera.aspect_ratio = aspect_ratio;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_looking_at_round_trip() {
        let orbit = OrbitCamera::looking_at(Camera::default(), vec3(0., 2., 8.), Vec3::ZERO);
        let eye = orbit.eye();

        assert_abs_diff_eq!(eye.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(eye.y, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(eye.z, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_clamps_pitch() {
        let mut orbit = OrbitCamera::looking_at(Camera::default(), vec3(0., 0., 5.), Vec3::ZERO);
        orbit.rotate(0.0, 10.0);
        assert!(orbit.pitch < PI * 0.5);
        orbit.rotate(0.0, -20.0);
        assert!(orbit.pitch > -PI * 0.5);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut orbit = OrbitCamera::looking_at(Camera::default(), vec3(0., 0., 5.), Vec3::ZERO);
        orbit.zoom(0.5);
        assert_abs_diff_eq!(orbit.distance, 2.5, epsilon = 1e-5);
        orbit.zoom(0.0);
        assert_abs_diff_eq!(orbit.distance, 2.5, epsilon = 1e-5);
        orbit.zoom(1000.0);
        assert_eq!(orbit.distance, OrbitCamera::MAX_DISTANCE);
    }

    #[test]
    fn test_camera_axes() {
        let orbit = OrbitCamera::looking_at(Camera::default(), vec3(0., 0., -5.), Vec3::ZERO);
        let transform = orbit.transform();

        assert_abs_diff_eq!(transform.up().y, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(transform.right().length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(transform.right().dot(Vec3::Z), 0.0, epsilon = 1e-5);
    }
}
