use broomchase_common::EntityKind;
use broomchase_kernel::FrameSnapshot;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Per-instance data consumed by the box pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    fn new(scale: Vec3, rotation: Quat, translation: Vec3, color: [f32; 4]) -> Self {
        let cols = Mat4::from_scale_rotation_translation(scale, rotation, translation)
            .to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
        }
    }
}

/// Sizes and colors of the drawn objects.
#[derive(Debug, Clone, Copy)]
pub struct SceneStyle {
    pub floor_size: Vec3,
    pub floor_color: [f32; 4],
    pub broom_size: Vec3,
    pub broom_color: [f32; 4],
    pub snitch_radius: f32,
    pub snitch_color: [f32; 4],
    pub particle_size: f32,
    pub particle_color: [f32; 4],
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            floor_size: Vec3::new(100.0, 1.0, 100.0),
            floor_color: [0.0, 0.25, 0.0, 1.0],
            broom_size: Vec3::new(0.1, 0.1, 1.5),
            broom_color: [0.4, 0.2, 0.0, 1.0],
            snitch_radius: 0.2,
            snitch_color: [0.5, 0.5, 0.0, 1.0],
            particle_size: 0.01,
            particle_color: [0.5, 0.5, 0.0, 1.0],
        }
    }
}

impl SceneStyle {
    /// Box extents for one object of `kind`.
    pub fn size(&self, kind: EntityKind) -> Vec3 {
        match kind {
            EntityKind::Broom => self.broom_size,
            EntityKind::Snitch => Vec3::splat(2.0 * self.snitch_radius),
            EntityKind::Particle => Vec3::splat(self.particle_size),
        }
    }

    pub fn color(&self, kind: EntityKind) -> [f32; 4] {
        match kind {
            EntityKind::Broom => self.broom_color,
            EntityKind::Snitch => self.snitch_color,
            EntityKind::Particle => self.particle_color,
        }
    }

    fn instance(&self, kind: EntityKind, rotation: Quat, translation: Vec3) -> InstanceData {
        InstanceData::new(self.size(kind), rotation, translation, self.color(kind))
    }
}

/// Floor, broom, snitch, then particles, truncated to `max_instances`.
pub fn build_instances(
    frame: &FrameSnapshot,
    style: &SceneStyle,
    max_instances: usize,
) -> Vec<InstanceData> {
    let mut instances = Vec::with_capacity((3 + frame.particles.len()).min(max_instances));
    instances.push(InstanceData::new(
        style.floor_size,
        Quat::IDENTITY,
        Vec3::ZERO,
        style.floor_color,
    ));
    instances.push(style.instance(
        EntityKind::Broom,
        frame.broom.rotation,
        frame.broom.position,
    ));
    instances.push(style.instance(
        EntityKind::Snitch,
        frame.snitch.rotation,
        frame.snitch.position,
    ));
    for p in &frame.particles {
        instances.push(style.instance(EntityKind::Particle, Quat::IDENTITY, p.position));
    }
    if instances.len() > max_instances {
        tracing::warn!(
            wanted = instances.len(),
            max_instances,
            "instance buffer full; dropping particles"
        );
        instances.truncate(max_instances);
    }
    instances
}
