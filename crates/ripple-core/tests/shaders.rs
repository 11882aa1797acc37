// The bundled WGSL must compile and agree with the Rust uniform layouts.

use std::mem::{offset_of, size_of};

use naga::proc::Layouter;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Handle, Module, Type, TypeInner};
use ripple_core::uniforms::{ShadeUniforms, SimUniforms, TransformUniforms};
use ripple_core::{COMPOSITE_WGSL, SIMULATION_WGSL};

fn compile(label: &str, source: &str) -> (Module, Layouter) {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{} failed to parse: {}", label, e.emit_to_string(source)));
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|e| panic!("{} failed validation: {:?}", label, e));
    let mut layouter = Layouter::default();
    layouter.update(module.to_ctx()).unwrap();
    (module, layouter)
}

fn struct_type(module: &Module, name: &str) -> Handle<Type> {
    module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some(name))
        .map(|(handle, _)| handle)
        .unwrap_or_else(|| panic!("no struct {} in shader", name))
}

fn member_offset(module: &Module, ty: Handle<Type>, field: &str) -> u32 {
    match &module.types[ty].inner {
        TypeInner::Struct { members, .. } => members
            .iter()
            .find(|m| m.name.as_deref() == Some(field))
            .map(|m| m.offset)
            .unwrap_or_else(|| panic!("no member {}", field)),
        other => panic!("not a struct: {:?}", other),
    }
}

fn entry_points(module: &Module) -> Vec<&str> {
    module.entry_points.iter().map(|ep| ep.name.as_str()).collect()
}

#[test]
fn simulation_shader_validates_and_matches_sim_uniforms() {
    let (module, layouter) = compile("simulation.wgsl", SIMULATION_WGSL);
    assert_eq!(entry_points(&module), ["vs_main", "fs_simulate"]);

    let sim = struct_type(&module, "SimUniforms");
    assert_eq!(layouter[sim].size as usize, size_of::<SimUniforms>());
    let fields = [
        ("mouse", offset_of!(SimUniforms, mouse)),
        ("resolution", offset_of!(SimUniforms, resolution)),
        ("time", offset_of!(SimUniforms, time)),
        ("frame", offset_of!(SimUniforms, frame)),
        ("mouse_active", offset_of!(SimUniforms, mouse_active)),
        ("delta", offset_of!(SimUniforms, delta)),
        ("restoring_force", offset_of!(SimUniforms, restoring_force)),
        ("velocity_damping", offset_of!(SimUniforms, velocity_damping)),
        ("pressure_decay", offset_of!(SimUniforms, pressure_decay)),
        ("disturbance_radius", offset_of!(SimUniforms, disturbance_radius)),
        ("disturbance_strength", offset_of!(SimUniforms, disturbance_strength)),
    ];
    for (name, offset) in fields {
        assert_eq!(member_offset(&module, sim, name) as usize, offset, "{}", name);
    }

    let transform = struct_type(&module, "Transform");
    assert_eq!(
        layouter[transform].size as usize,
        size_of::<TransformUniforms>()
    );
}

#[test]
fn composite_shader_validates_and_matches_shade_uniforms() {
    let (module, layouter) = compile("composite.wgsl", COMPOSITE_WGSL);
    assert_eq!(entry_points(&module), ["vs_main", "fs_composite"]);

    let shade = struct_type(&module, "ShadeUniforms");
    assert_eq!(layouter[shade].size as usize, size_of::<ShadeUniforms>());
    let fields = [
        ("light_dir", offset_of!(ShadeUniforms, light_dir)),
        ("distortion_scale", offset_of!(ShadeUniforms, distortion_scale)),
        ("normal_slope", offset_of!(ShadeUniforms, normal_slope)),
        ("normal_height", offset_of!(ShadeUniforms, normal_height)),
        ("specular_exponent", offset_of!(ShadeUniforms, specular_exponent)),
        ("specular_intensity", offset_of!(ShadeUniforms, specular_intensity)),
    ];
    for (name, offset) in fields {
        assert_eq!(member_offset(&module, shade, name) as usize, offset, "{}", name);
    }

    let transform = struct_type(&module, "Transform");
    assert_eq!(
        layouter[transform].size as usize,
        size_of::<TransformUniforms>()
    );
}
