use flow_markup::{
    context::Config,
    data_structures::{
        material::{Material, MaterialKind},
        scene_graph::Geometry,
        texture::Texture,
        value::Props,
    },
    descriptors::{
        Descriptor,
        children::{self, ChildRef, Violation},
    },
    error::DescriptorError,
    resources::ResourceReference,
};

use crate::common::test_utils::{Harness, descriptor};

mod common;

#[test]
fn textures_and_resource_references_are_valid() {
    let mut harness = Harness::new();
    let texture = harness
        .ctx
        .scene
        .add_texture(Texture::new("diffuse", "bricks.png", [64, 64]));
    let children = [
        ChildRef::from(texture),
        ChildRef::from(ResourceReference::new("sharedNormalMap")),
    ];

    assert!(children::validate(&harness.ctx.scene, &children).is_empty());

    let basic = descriptor(MaterialKind::MeshBasic);
    let controller = harness.mount(&basic, &Props::new()).unwrap();
    let id = controller.object().unwrap();
    basic
        .add_children(&mut harness.ctx, id, &children)
        .unwrap();
    basic
        .add_child(&mut harness.ctx, id, ChildRef::from(texture))
        .unwrap();
}

#[test]
fn one_invalid_child_rejects_the_whole_set() {
    let mut harness = Harness::new();
    let basic = descriptor(MaterialKind::MeshBasic);
    let controller = harness.mount(&basic, &Props::new()).unwrap();
    let id = controller.object().unwrap();
    let texture = harness
        .ctx
        .scene
        .add_texture(Texture::new("diffuse", "bricks.png", [64, 64]));
    let stray_mesh = harness.ctx.scene.add_mesh(Geometry::cuboid(1.0, 1.0, 1.0));
    let objects_before = harness.ctx.scene.len();

    let err = basic
        .add_children(
            &mut harness.ctx,
            id,
            &[ChildRef::from(texture), ChildRef::from(stray_mesh)],
        )
        .unwrap_err();

    assert!(err.is_structural());
    match err {
        DescriptorError::InvalidChildren(violations) => assert_eq!(
            violations,
            vec![Violation {
                index: 1,
                kind: "mesh".to_string(),
            }]
        ),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(harness.ctx.scene.len(), objects_before);
    assert_eq!(harness.ctx.scene.texture(texture).unwrap().user_data.parent_markup, None);
    assert_eq!(harness.ctx.scene.node(stray_mesh).unwrap().parent(), None);
}

#[test]
fn validation_lists_every_violation() {
    let mut harness = Harness::with_config(Config {
        report_invalid_children: false,
        ..Config::default()
    });
    let group = harness.ctx.scene.add_group();
    let material = harness
        .ctx
        .scene
        .add_material(Material::new(MaterialKind::MeshDepth));
    harness.ctx.scene.remove(material);
    let children = [
        ChildRef::from(group),
        ChildRef::from(ResourceReference::new("shared")),
        ChildRef::from(material),
    ];

    let violations = children::validate(&harness.ctx.scene, &children);

    assert_eq!(
        violations,
        vec![
            Violation {
                index: 0,
                kind: "group".to_string(),
            },
            Violation {
                index: 2,
                kind: format!("unknown object {}", material),
            },
        ]
    );
    let basic = descriptor(MaterialKind::MeshBasic);
    let controller = harness.mount(&basic, &Props::new()).unwrap();
    let err = basic
        .add_child(&mut harness.ctx, controller.object().unwrap(), ChildRef::from(group))
        .unwrap_err();
    assert!(err.to_string().contains("group at index 0"));
}

#[test]
fn moving_and_removing_children_changes_nothing() {
    let mut harness = Harness::new();
    let basic = descriptor(MaterialKind::MeshBasic);
    let controller = harness.mount(&basic, &Props::new()).unwrap();
    let id = controller.object().unwrap();
    let texture = harness
        .ctx
        .scene
        .add_texture(Texture::new("diffuse", "bricks.png", [64, 64]));
    let child = ChildRef::from(texture);
    let version = harness.material(id).version;

    basic.move_child(&mut harness.ctx, id, &child, 3).unwrap();
    basic.remove_child(&mut harness.ctx, id, &child).unwrap();

    assert_eq!(harness.material(id).version, version);
    assert!(harness.ctx.scene.contains(texture));
}
