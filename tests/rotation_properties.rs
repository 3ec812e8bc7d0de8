//! Property tests for rotation and containment math

use proptest::prelude::*;

use custom_objects::objects::functions::{BlockFunction, Marker};
use custom_objects::objects::rotation::{rotate_xz, Rotation};
use custom_objects::objects::schema::ObjectSettings;
use custom_objects::objects::ObjectDefinition;
use custom_objects::placement::containment::max_allowed_outside;

fn offsets() -> impl Strategy<Value = Vec<(i32, i32, i32)>> {
    prop::collection::vec((-16..16i32, -8..8i32, -16..16i32), 1..40)
}

proptest! {
    #[test]
    fn test_four_turns_are_identity(x in -1000..1000i32, z in -1000..1000i32) {
        let mut p = (x, z);
        for _ in 0..4 {
            p = rotate_xz(p.0, p.1);
        }
        prop_assert_eq!(p, (x, z));
    }

    #[test]
    fn test_rotation_preserves_counts_and_heights(blocks in offsets(), markers in 0..5usize) {
        let mut settings = ObjectSettings::default();
        settings.blocks = blocks
            .iter()
            .map(|&(x, y, z)| BlockFunction::new(x, y, z, "stone"))
            .collect();
        settings.markers = (0..markers)
            .map(|i| Marker { x: i as i32, y: 0, z: 0, mod_id: "m".to_string(), mod_data: String::new() })
            .collect();
        let def = ObjectDefinition::from_settings("prop", settings).unwrap();
        let north = def.oriented(Rotation::North);

        for rotation in Rotation::ALL {
            let g = def.oriented(rotation);
            prop_assert_eq!(g.blocks.len(), north.blocks.len());
            prop_assert_eq!(g.function_count(), north.function_count());
            prop_assert_eq!(g.bounding_box.height, north.bounding_box.height);

            for (rotated, original) in g.blocks.iter().zip(&north.blocks) {
                prop_assert_eq!(rotated.y, original.y);
                prop_assert_eq!(&rotated.material, &original.material);
                // Distance from the origin is preserved
                prop_assert_eq!(
                    rotated.x.abs() + rotated.z.abs(),
                    original.x.abs() + original.z.abs()
                );
            }
        }
    }

    #[test]
    fn test_bounding_box_covers_rotated_blocks(blocks in offsets()) {
        let mut settings = ObjectSettings::default();
        settings.blocks = blocks
            .iter()
            .map(|&(x, y, z)| BlockFunction::new(x, y, z, "stone"))
            .collect();
        let def = ObjectDefinition::from_settings("prop", settings).unwrap();

        for rotation in Rotation::ALL {
            let g = def.oriented(rotation);
            for b in &g.blocks {
                prop_assert!(g.bounding_box.contains(b.x, b.y, b.z));
            }
        }
    }

    #[test]
    fn test_max_allowed_outside_is_ceiling(total in 0..10_000usize, pct in 0..=100u32) {
        let max = max_allowed_outside(total, pct);
        let exact = total as f64 * pct as f64 / 100.0;

        prop_assert!(max as f64 >= exact);
        prop_assert!((max as f64) < exact + 1.0);
        prop_assert!(max <= total);
    }
}

#[test]
fn test_containment_examples() {
    assert_eq!(max_allowed_outside(10, 30), 3);
    assert_eq!(max_allowed_outside(3, 50), 2);
}
