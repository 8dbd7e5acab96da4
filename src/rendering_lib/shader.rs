// src/rendering_lib/shader.rs

pub const WGSL_SHADER_SOURCE: &str = r#"
struct FrameUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    // rgb = color * intensity
    ambient: vec4<f32>,
    point_color: vec4<f32>,
    point_position: vec4<f32>,
}

struct PartUniform {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    color: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> part: PartUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
}

@vertex
fn vs_main(model: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = part.model * vec4<f32>(model.position, 1.0);
    out.world_position = world.xyz;
    out.world_normal = (part.normal_matrix * vec4<f32>(model.normal, 0.0)).xyz;
    out.clip_position = frame.view_proj * world;
    return out;
}

// Lambert: ambient plus one unattenuated point light.
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let l = normalize(frame.point_position.xyz - in.world_position);
    let diffuse = max(dot(n, l), 0.0);
    let light = frame.ambient.rgb + frame.point_color.rgb * diffuse;
    return vec4<f32>(part.color.rgb * light, part.color.a);
}
"#;
