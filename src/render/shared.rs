use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub light_position: [f32; 4],
    /// Light colour in `xyz`, intensity in `w`.
    pub light_color: [f32; 4],
    /// Camera right axis in `xyz`, ambient light level in `w`.
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    /// Particle field offset in `xyz`, billboard size in `w`.
    pub particles: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct ObjectConstants {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    /// Base colour in `xyz`, opacity in `w`.
    pub color: [f32; 4],
    /// Emissive strength in `x`.
    pub glow: [f32; 4],
}

const GLOBALS: &str = r#"
struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
    particles: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;
"#;

const MESH_BODY: &str = r#"
struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    color: vec4<f32>,
    glow: vec4<f32>,
}

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = globals.view_proj * world_position;
    out.world_pos = world_position.xyz;

    let world_normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;

    out.normal = normalize(world_normal);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(globals.light_position.xyz - input.world_pos);
    let normal = normalize(input.normal);
    let diffuse = max(dot(normal, light_dir), 0.0);
    let ambient = globals.camera_right.w;
    let intensity = globals.light_color.w;
    let light_color = globals.light_color.xyz;
    let base = object.color.rgb;
    let lit_color = (ambient + diffuse * intensity) * base * light_color + base * object.glow.x;
    return vec4<f32>(min(lit_color, vec3<f32>(1.0)), object.color.a);
}
"#;

const PARTICLE_BODY: &str = r#"
struct ParticleInput {
    @location(0) corner: vec2<f32>,
    @location(1) centre: vec3<f32>,
}

@vertex
fn vs_particle(input: ParticleInput) -> @builtin(position) vec4<f32> {
    let size = globals.particles.w;
    let centre = input.centre + globals.particles.xyz;
    let world = centre
        + globals.camera_right.xyz * (input.corner.x * size)
        + globals.camera_up.xyz * (input.corner.y * size);
    return globals.view_proj * vec4<f32>(world, 1.0);
}

@fragment
fn fs_particle() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 0.5);
}
"#;

pub(crate) fn mesh_shader() -> String {
    format!("{GLOBALS}{MESH_BODY}")
}

pub(crate) fn particle_shader() -> String {
    format!("{GLOBALS}{PARTICLE_BODY}")
}

/// Two triangles covering a unit billboard centred on the origin.
pub(crate) const PARTICLE_QUAD: &[f32] = &[
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, //
    -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layouts_are_vec4_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<ObjectConstants>() % 16, 0);
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 64 + 6 * 16);
    }

    #[test]
    fn shaders_share_the_global_block() {
        assert!(mesh_shader().contains("var<uniform> globals"));
        assert!(particle_shader().contains("fn vs_particle"));
        assert!(!particle_shader().contains("ObjectConstants"));
    }
}
