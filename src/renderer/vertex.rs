//! Vertex types and handheld geometry

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Model-space vertex. `textured` blends between the flat colour (0) and the
/// game screen texture (1).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub textured: f32,
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const F32: wgpu::BufferAddress = std::mem::size_of::<f32>() as wgpu::BufferAddress;
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 3 * F32,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 5 * F32,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 9 * F32,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// Where the game screen sits on the handheld, in model space
pub const SCREEN_CENTER: Vec3 = Vec3::new(0.0, 0.88, 0.298);
pub const SCREEN_SIZE: Vec2 = Vec2::new(1.22, 0.915);

/// Front faces of the handheld, back to front. Every face is parallel to the
/// XY plane, so drawing in this order needs no depth buffer.
pub fn handheld_quads() -> Vec<Vertex> {
    let mut out = Vec::with_capacity(6 * 5);
    // Body and lower controls section
    push_quad(&mut out, Vec3::new(0.0, 0.0, 0.275), Vec2::new(2.0, 3.6), colors::BODY, false);
    push_quad(&mut out, Vec3::new(0.0, -1.18, 0.276), Vec2::new(1.99, 1.22), colors::LOWER_BODY, false);
    // Bezel and inner recess
    push_quad(&mut out, Vec3::new(0.0, 0.88, 0.294), Vec2::new(1.72, 1.62), colors::BEZEL, false);
    push_quad(&mut out, Vec3::new(0.0, 0.88, 0.295), Vec2::new(1.38, 1.04), colors::RECESS, false);
    push_quad(&mut out, SCREEN_CENTER, SCREEN_SIZE, [1.0; 4], true);
    out
}

/// Two counter-clockwise triangles facing +Z. UV (0, 0) is the top-left
/// corner so canvas rows map top to bottom.
fn push_quad(out: &mut Vec<Vertex>, center: Vec3, size: Vec2, color: [f32; 4], textured: bool) {
    let half = size / 2.0;
    let corner = |sx: f32, sy: f32| Vertex {
        position: [center.x + sx * half.x, center.y + sy * half.y, center.z],
        uv: [(sx + 1.0) / 2.0, (1.0 - sy) / 2.0],
        color,
        textured: if textured { 1.0 } else { 0.0 },
    };
    let (bl, br, tr, tl) = (
        corner(-1.0, -1.0),
        corner(1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, 1.0),
    );
    out.extend_from_slice(&[bl, br, tr, bl, tr, tl]);
}

/// sRGB byte to linear, for colours written straight into an sRGB target
pub fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_rgba(hex: u32) -> [f32; 4] {
    [
        srgb_to_linear((hex >> 16) as u8),
        srgb_to_linear((hex >> 8) as u8),
        srgb_to_linear(hex as u8),
        1.0,
    ]
}

/// Handheld shell colours (linear)
pub mod colors {
    pub const BODY: [f32; 4] = [0.392, 0.392, 0.392, 1.0];
    pub const LOWER_BODY: [f32; 4] = [0.342, 0.342, 0.342, 1.0];
    pub const BEZEL: [f32; 4] = [0.010, 0.010, 0.010, 1.0];
    pub const RECESS: [f32; 4] = [0.0024, 0.0024, 0.0024, 1.0];
    /// Page background behind the scene
    pub const CLEAR: [f32; 4] = [0.0012, 0.0024, 0.0048, 1.0];
}
