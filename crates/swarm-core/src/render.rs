//! Boundary to the renderer.
//!
//! The engine never talks to a graphics API. Each frame it pushes instance
//! transforms, colors and visibility into a [`RenderSink`]; the host decides
//! how to draw them. [`InstanceBuffers`] is the plain CPU implementation that
//! the browser bridge hands to JS as typed-array views.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::color::Rgb;

/// Instanced mesh groups the engine drives.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MeshGroup {
    Particles = 0,
    Bowls     = 1,
    Eyes      = 2,
    Tethers   = 3,
}

impl MeshGroup {
    pub const ALL: [MeshGroup; 4] = [
        MeshGroup::Particles,
        MeshGroup::Bowls,
        MeshGroup::Eyes,
        MeshGroup::Tethers,
    ];

    pub fn from_u8(value: u8) -> Option<MeshGroup> {
        MeshGroup::ALL.get(value as usize).copied()
    }
}

/// Translation, rotation and non-uniform scale of one instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl InstanceTransform {
    /// Zero scale at the origin. Used for instance slots that draw nothing.
    pub const HIDDEN: InstanceTransform = InstanceTransform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ZERO,
    };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn at(translation: Vec3, scale: f32) -> Self {
        Self::new(translation, Quat::IDENTITY, Vec3::splat(scale))
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Re-express a camera-local transform in world space.
    pub fn in_frame(&self, world_from_local: &Mat4) -> Self {
        let (scale, rotation, translation) = (*world_from_local * self.matrix()).to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }
}

/// Camera state submitted once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

/// Narrow render contract consumed by the engine.
pub trait RenderSink {
    fn set_camera(&mut self, camera: &CameraPose);
    fn set_instance_transform(&mut self, group: MeshGroup, index: usize, transform: &InstanceTransform);
    fn set_instance_color(&mut self, group: MeshGroup, index: usize, color: Rgb);
    /// Position of a carrier particle's icon billboard (no rotation, no scale).
    fn set_billboard(&mut self, index: usize, position: Vec3);
    fn set_group_visible(&mut self, group: MeshGroup, visible: bool);
    fn set_instance_visible(&mut self, group: MeshGroup, index: usize, visible: bool);
}

/// GPU-compatible instance matrix: 64 bytes, column-major.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuInstance {
    pub matrix: [f32; 16],
}

impl GpuInstance {
    fn from_transform(t: &InstanceTransform) -> Self {
        Self {
            matrix: t.matrix().to_cols_array(),
        }
    }
}

/// One instanced group's CPU-side buffers.
#[derive(Clone, Debug)]
pub struct GroupBuffer {
    pub instances: Vec<GpuInstance>,
    pub colors: Vec<Rgb>,
    /// Per-instance visibility, 1 = drawn.
    pub visible: Vec<u8>,
    pub group_visible: bool,
}

impl GroupBuffer {
    fn new(count: usize) -> Self {
        Self {
            instances: vec![GpuInstance::from_transform(&InstanceTransform::HIDDEN); count],
            colors: vec![Rgb::WHITE; count],
            visible: vec![1; count],
            group_visible: true,
        }
    }

    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn color_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Plain CPU render target, one buffer per [`MeshGroup`].
#[derive(Clone, Debug)]
pub struct InstanceBuffers {
    groups: [GroupBuffer; 4],
    /// Billboard positions, xyz per particle (only carrier slots are written).
    pub billboards: Vec<[f32; 3]>,
    pub camera: Option<CameraPose>,
}

impl InstanceBuffers {
    pub fn new(particles: usize, bowls: usize, eyes: usize) -> Self {
        Self {
            groups: [
                GroupBuffer::new(particles),
                GroupBuffer::new(bowls),
                GroupBuffer::new(eyes),
                GroupBuffer::new(eyes),
            ],
            billboards: vec![[0.0; 3]; particles],
            camera: None,
        }
    }

    #[inline]
    pub fn group(&self, group: MeshGroup) -> &GroupBuffer {
        &self.groups[group as usize]
    }

    /// Decode an instance matrix back into a transform (used by tests and debug views).
    pub fn transform(&self, group: MeshGroup, index: usize) -> Option<InstanceTransform> {
        let instance = self.group(group).instances.get(index)?;
        let (scale, rotation, translation) = Mat4::from_cols_array(&instance.matrix).to_scale_rotation_translation();
        Some(InstanceTransform {
            translation,
            rotation,
            scale,
        })
    }

    pub fn is_visible(&self, group: MeshGroup, index: usize) -> bool {
        let g = self.group(group);
        g.group_visible && g.visible.get(index).copied().unwrap_or(0) == 1
    }
}

impl RenderSink for InstanceBuffers {
    fn set_camera(&mut self, camera: &CameraPose) {
        self.camera = Some(*camera);
    }

    fn set_instance_transform(&mut self, group: MeshGroup, index: usize, transform: &InstanceTransform) {
        if let Some(slot) = self.groups[group as usize].instances.get_mut(index) {
            *slot = GpuInstance::from_transform(transform);
        }
    }

    fn set_instance_color(&mut self, group: MeshGroup, index: usize, color: Rgb) {
        if let Some(slot) = self.groups[group as usize].colors.get_mut(index) {
            *slot = color;
        }
    }

    fn set_billboard(&mut self, index: usize, position: Vec3) {
        if let Some(slot) = self.billboards.get_mut(index) {
            *slot = position.to_array();
        }
    }

    fn set_group_visible(&mut self, group: MeshGroup, visible: bool) {
        self.groups[group as usize].group_visible = visible;
    }

    fn set_instance_visible(&mut self, group: MeshGroup, index: usize, visible: bool) {
        if let Some(slot) = self.groups[group as usize].visible.get_mut(index) {
            *slot = visible as u8;
        }
    }
}
