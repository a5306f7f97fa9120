use cgmath::Matrix4;

/// Anything that can produce a combined view-projection matrix.
pub trait Camera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

/// Maps OpenGL clip depth [-1, 1] to wgpu's [0, 1]; x, y and w are untouched.
///
/// `Matrix4::new` takes columns, so each row below is one column.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}
