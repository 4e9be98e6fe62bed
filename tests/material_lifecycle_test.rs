use std::rc::Rc;

use flow_markup::{
    data_structures::{
        material::{Color, MaterialKind, Side},
        value::Props,
    },
    descriptors::{
        Descriptor,
        lifecycle::{LifecycleController, LifecycleState},
        material::MaterialDescriptor,
    },
    error::DescriptorError,
};

use crate::common::test_utils::{Harness, descriptor};

mod common;

#[test]
fn mount_leaves_undeclared_fields_at_engine_defaults() {
    let mut harness = Harness::new();
    let controller = harness
        .mount(&descriptor(MaterialKind::MeshBasic), &Props::new())
        .unwrap();
    let material = harness.material(controller.object().unwrap());

    assert_eq!(controller.state(), LifecycleState::Mounted);
    assert_eq!(material.user_data.material_slot, "material");
    assert_eq!(material.side, Side::Front);
    assert!(material.visible);
    assert!(!material.transparent);
    assert_eq!(material.alpha_test, 0.0);
    assert_eq!(material.color, Color::WHITE);
    assert!(material.version > 0);
}

#[test]
fn mount_gives_the_material_its_own_user_data() {
    let mut harness = Harness::new();
    let basic = descriptor(MaterialKind::MeshBasic);
    let first = harness.mount(&basic, &Props::new()).unwrap();
    let second_markup = {
        let points = harness.ctx.scene.add_points(Default::default());
        harness.ctx.markups.bind(points)
    };
    let second = harness
        .mount_on(&basic, &Props::new().with("slot", "customSlot"), second_markup)
        .unwrap();

    let first = harness.material(first.object().unwrap());
    let second = harness.material(second.object().unwrap());
    assert_eq!(first.user_data.material_slot, "material");
    assert_eq!(second.user_data.material_slot, "customSlot");
    assert_eq!(first.user_data.parent_markup, Some(harness.mesh_markup));
    assert_eq!(second.user_data.parent_markup, Some(second_markup));
    let events = first.user_data.events.as_ref().unwrap();
    assert!(events.same_queue(&harness.ctx.events));
}

#[test]
fn props_are_applied_at_mount() {
    let mut harness = Harness::new();
    let props = Props::new()
        .with("transparent", true)
        .with("opacity", 0.5)
        .with("alphaTest", 0.3)
        .with("side", Side::Double)
        .with("color", 0x00ff00)
        .with("wireframe", true);
    let controller = harness
        .mount(&descriptor(MaterialKind::MeshBasic), &props)
        .unwrap();
    let material = harness.material(controller.object().unwrap());

    assert!(material.transparent);
    assert_eq!(material.opacity, 0.5);
    assert_eq!(material.alpha_test, 0.3);
    assert_eq!(material.side, Side::Double);
    assert_eq!(material.color.to_hex(), 0x00ff00);
    assert!(material.wireframe);
}

#[test]
fn slot_reverts_to_default_when_removed() {
    let mut harness = Harness::new();
    let mounted = Props::new().with("slot", "customSlot");
    let mut controller = harness
        .mount(&descriptor(MaterialKind::MeshBasic), &mounted)
        .unwrap();
    let id = controller.object().unwrap();
    assert_eq!(harness.material(id).user_data.material_slot, "customSlot");
    assert_eq!(harness.slot("customSlot"), Some(id));

    controller
        .update(&mut harness.ctx, &mounted, &Props::new())
        .unwrap();

    assert_eq!(harness.material(id).user_data.material_slot, "material");
}

#[test]
fn update_reapplies_only_changed_props() {
    let mut harness = Harness::new();
    let a = Props::new().with("opacity", 0.5).with("color", 0xff0000);
    let b = Props::new().with("opacity", 0.75).with("color", 0xff0000);
    let mut controller = harness
        .mount(&descriptor(MaterialKind::MeshBasic), &a)
        .unwrap();
    let id = controller.object().unwrap();
    let version = harness.material(id).version;

    let applied = controller.update(&mut harness.ctx, &a, &b).unwrap();

    assert_eq!(applied, 1);
    assert_eq!(controller.state(), LifecycleState::Updating(1));
    assert_eq!(harness.material(id).opacity, 0.75);
    assert_eq!(harness.material(id).version, version + 1);
}

#[test]
fn removed_props_fall_back_to_defaults() {
    let mut harness = Harness::new();
    let a = Props::new()
        .with("opacity", 0.5)
        .with("color", 0x123456)
        .with("side", Side::Back)
        .with("visible", false);
    let mut controller = harness
        .mount(&descriptor(MaterialKind::MeshBasic), &a)
        .unwrap();
    let id = controller.object().unwrap();

    controller
        .update(&mut harness.ctx, &a, &Props::new())
        .unwrap();

    let material = harness.material(id);
    assert_eq!(material.opacity, 1.0);
    assert_eq!(material.color, Color::WHITE);
    assert_eq!(material.side, Side::Front);
    assert!(material.visible);
}

#[test]
fn alpha_test_is_never_updated_after_mount() {
    let mut harness = Harness::new();
    let a = Props::new().with("alphaTest", 0.5);
    let b = Props::new().with("alphaTest", 0.9);
    let mut controller = harness
        .mount(&descriptor(MaterialKind::MeshBasic), &a)
        .unwrap();
    let id = controller.object().unwrap();

    let applied = controller.update(&mut harness.ctx, &a, &b).unwrap();
    controller
        .update(&mut harness.ctx, &b, &Props::new())
        .unwrap();

    assert_eq!(applied, 0);
    assert_eq!(harness.material(id).alpha_test, 0.5);
    assert_eq!(controller.state(), LifecycleState::Updating(2));
}

#[test]
fn wrongly_typed_value_is_rejected() {
    let mut harness = Harness::new();

    let err = harness
        .mount(
            &descriptor(MaterialKind::MeshBasic),
            &Props::new().with("opacity", "high"),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        DescriptorError::PropertyType { expected: "number", actual: "string", .. }
    ));
}

#[test]
fn unmount_disposes_exactly_once() {
    let mut harness = Harness::new();
    let mut controller = harness
        .mount(&descriptor(MaterialKind::MeshBasic), &Props::new())
        .unwrap();
    let id = controller.object().unwrap();
    let uuid = harness.material(id).uuid;
    assert_eq!(harness.slot("material"), Some(id));

    controller.unmount(&mut harness.ctx).unwrap();

    assert_eq!(controller.state(), LifecycleState::Unmounted);
    assert_eq!(harness.slot("material"), None);
    assert!(!harness.ctx.scene.contains(id));
    assert_eq!(harness.ctx.scene.drain_released(), vec![uuid]);

    let err = controller.unmount(&mut harness.ctx).unwrap_err();
    assert!(matches!(
        err,
        DescriptorError::Lifecycle { operation: "unmount", state: LifecycleState::Unmounted }
    ));
    assert!(harness.ctx.scene.drain_released().is_empty());
}

#[test]
fn calls_out_of_order_are_rejected() {
    let mut harness = Harness::new();
    let mut controller = LifecycleController::new(descriptor(MaterialKind::MeshBasic));

    let err = controller
        .update(&mut harness.ctx, &Props::new(), &Props::new())
        .unwrap_err();
    assert!(matches!(
        err,
        DescriptorError::Lifecycle { state: LifecycleState::Unconstructed, .. }
    ));

    controller.construct(&mut harness.ctx).unwrap();
    assert!(controller.construct(&mut harness.ctx).is_err());
    // the slot is unknown until the initial props are applied
    let err = controller
        .set_parent(&mut harness.ctx, harness.mesh_markup)
        .unwrap_err();
    assert!(matches!(
        err,
        DescriptorError::Lifecycle { operation: "set the parent of", state: LifecycleState::Constructed }
    ));
    assert_eq!(harness.slot("material"), None);
    assert!(
        controller
            .update(&mut harness.ctx, &Props::new(), &Props::new())
            .is_err()
    );

    controller
        .apply_initial_props(&mut harness.ctx, &Props::new())
        .unwrap();
    assert!(
        controller
            .apply_initial_props(&mut harness.ctx, &Props::new())
            .is_err()
    );
}

#[test]
fn described_construction_applies_the_color() {
    let mut harness = Harness::new();
    let phong = MaterialDescriptor::new(MaterialKind::MeshPhong);
    let props = Props::new().with("color", 0x336699).with("opacity", 0.5);

    let description = phong.material_description(&props);
    let id = phong.construct_described(&mut harness.ctx, &props).unwrap();

    assert_eq!(description, Props::new().with("color", 0x336699));
    let material = harness.material(id);
    assert_eq!(material.kind, MaterialKind::MeshPhong);
    assert_eq!(material.color.to_hex(), 0x336699);
    assert_eq!(material.opacity, 1.0);
}

#[test]
fn descriptor_is_shared_between_instances() {
    let mut harness = Harness::new();
    let basic: Rc<MaterialDescriptor> = descriptor(MaterialKind::MeshBasic);
    let first = harness.mount(&basic, &Props::new()).unwrap();
    let second = LifecycleController::new(Rc::clone(&basic));

    assert!(Rc::ptr_eq(first.descriptor(), second.descriptor()));
    assert_eq!(basic.name(), "meshBasicMaterial");
    assert_eq!(Rc::strong_count(&basic), 3);
}
