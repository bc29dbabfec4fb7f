use hangar_render::ShaderKind;

/// Uniform block shared by every shader; mirrors `DrawUniforms`.
const UNIFORMS: &str = r#"
struct Light {
    position: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    // constant, linear, quadratic
    attenuation: vec4<f32>,
};

struct DrawUniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light: Light,
    view_position: vec4<f32>,
    // shininess, outlining
    material: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> u: DrawUniforms;
"#;

/// Vertex stage and point-light model for textured meshes.
const LIT_COMMON: &str = r#"
@group(1) @binding(0)
var diffuse_map: texture_2d<f32>;
@group(1) @binding(1)
var specular_map: texture_2d<f32>;
@group(1) @binding(2)
var material_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = u.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = u.projection * u.view * world;
    out.world_position = world.xyz;
    out.normal = normalize((u.model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.uv = vertex.uv;
    return out;
}

fn point_light(in: VertexOutput, albedo: vec3<f32>, gloss: vec3<f32>) -> vec3<f32> {
    let normal = normalize(in.normal);
    let to_light = u.light.position.xyz - in.world_position;
    let light_dir = normalize(to_light);
    let view_dir = normalize(u.view_position.xyz - in.world_position);

    let diff = max(dot(normal, light_dir), 0.0);
    let reflect_dir = reflect(-light_dir, normal);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), max(u.material.x, 1.0));

    let distance = length(to_light);
    let k = u.light.attenuation;
    let attenuation = 1.0 / (k.x + k.y * distance + k.z * distance * distance);

    let ambient = u.light.ambient.rgb * albedo;
    let diffuse = u.light.diffuse.rgb * diff * albedo;
    let specular = u.light.specular.rgb * spec * gloss;
    return (ambient + diffuse + specular) * attenuation;
}
"#;

const OPAQUE_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(diffuse_map, material_sampler, in.uv).rgb;
    let gloss = textureSample(specular_map, material_sampler, in.uv).rgb;
    return vec4<f32>(point_light(in, albedo, gloss), 1.0);
}
"#;

const TREES_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(diffuse_map, material_sampler, in.uv);
    let gloss = textureSample(specular_map, material_sampler, in.uv).rgb;
    if albedo.a < 0.1 {
        discard;
    }
    return vec4<f32>(point_light(in, albedo.rgb, gloss), albedo.a);
}
"#;

const OUTLINE: &str = r#"
const OUTLINE_WIDTH: f32 = 0.08;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> @builtin(position) vec4<f32> {
    let inflated = vertex.position + vertex.normal * OUTLINE_WIDTH * u.material.y;
    return u.projection * u.view * u.model * vec4<f32>(inflated, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.55, 0.1, 1.0);
}
"#;

const SKYBOX: &str = r#"
@group(1) @binding(0)
var sky_map: texture_cube<f32>;
@group(1) @binding(1)
var sky_sampler: sampler;

struct SkyOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) direction: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> SkyOutput {
    let clip = u.projection * u.view * vec4<f32>(position, 1.0);

    var out: SkyOutput;
    // Depth pinned to the far plane.
    out.clip_position = clip.xyww;
    // Cube lookups are left-handed.
    out.direction = vec3<f32>(position.x, position.y, -position.z);
    return out;
}

@fragment
fn fs_main(in: SkyOutput) -> @location(0) vec4<f32> {
    return textureSample(sky_map, sky_sampler, in.direction);
}
"#;

/// Full WGSL source for a shader program.
pub fn source(kind: ShaderKind) -> String {
    match kind {
        ShaderKind::Terrain | ShaderKind::Station => {
            format!("{UNIFORMS}{LIT_COMMON}{OPAQUE_FRAGMENT}")
        }
        ShaderKind::Trees => format!("{UNIFORMS}{LIT_COMMON}{TREES_FRAGMENT}"),
        ShaderKind::Outline => format!("{UNIFORMS}{OUTLINE}"),
        ShaderKind::Skybox => format!("{UNIFORMS}{SKYBOX}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shader_has_both_entry_points() {
        for kind in ShaderKind::ALL {
            let src = source(kind);
            assert!(src.contains("fn vs_main"), "{kind:?}");
            assert!(src.contains("fn fs_main"), "{kind:?}");
            assert!(src.contains("var<uniform> u: DrawUniforms"), "{kind:?}");
        }
    }

    #[test]
    fn only_trees_discard() {
        assert!(source(ShaderKind::Trees).contains("discard"));
        assert!(!source(ShaderKind::Terrain).contains("discard"));
        assert!(source(ShaderKind::Skybox).contains("texture_cube"));
    }
}
