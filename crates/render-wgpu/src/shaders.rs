//! WGSL sources. Both pipelines share the `Frame` uniform at group 0.

/// Instanced boxes: sun plus ambient lighting, fading into fog with distance
/// from the eye so the arena edge does not end in a hard line.
pub const BOX_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    fog: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

struct Corner {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct Instance {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct Lit {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) world: vec3<f32>,
};

fn fogged(rgb: vec3<f32>, world: vec3<f32>) -> vec3<f32> {
    let d = distance(world, frame.eye.xyz);
    let t = clamp((d - frame.fog.w) / (frame.eye.w - frame.fog.w), 0.0, 1.0);
    return mix(rgb, frame.fog.rgb, t);
}

@vertex
fn vs_box(corner: Corner, inst: Instance) -> Lit {
    let model = mat4x4<f32>(inst.model_0, inst.model_1, inst.model_2, inst.model_3);
    let world = model * vec4<f32>(corner.position, 1.0);

    var out: Lit;
    out.clip = frame.view_proj * world;
    out.normal = normalize((model * vec4<f32>(corner.normal, 0.0)).xyz);
    out.color = inst.color;
    out.world = world.xyz;
    return out;
}

@fragment
fn fs_box(in: Lit) -> @location(0) vec4<f32> {
    let sun = normalize(vec3<f32>(0.4, 1.0, 0.6));
    let light = 0.35 + 0.65 * max(dot(in.normal, sun), 0.0);
    return vec4<f32>(fogged(in.color.rgb * light, in.world), in.color.a);
}
"#;

/// Unlit floor grid lines with the same fog as the boxes.
pub const GRID_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    fog: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

struct LinePoint {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct Line {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) world: vec3<f32>,
};

@vertex
fn vs_grid(point: LinePoint) -> Line {
    var out: Line;
    out.clip = frame.view_proj * vec4<f32>(point.position, 1.0);
    out.color = point.color;
    out.world = point.position;
    return out;
}

@fragment
fn fs_grid(in: Line) -> @location(0) vec4<f32> {
    let d = distance(in.world, frame.eye.xyz);
    let t = clamp((d - frame.fog.w) / (frame.eye.w - frame.fog.w), 0.0, 1.0);
    return vec4<f32>(mix(in.color.rgb, frame.fog.rgb, t), in.color.a);
}
"#;
