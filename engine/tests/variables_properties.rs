use engine::color::{Rgb, shade};
use engine::upgrade::{self, ThemeState};
use engine::variables::{ThemeVariableSet, deserialize, serialize};
use proptest::prelude::*;

#[cfg(test)]
mod serializer_property_tests {
    use super::*;

    fn variable_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,24}"
    }

    fn variable_value() -> impl Strategy<Value = String> {
        // no separators, line breaks or surrounding whitespace
        "[#a-zA-Z0-9(),.%\"]([#a-zA-Z0-9(),.% \"]{0,30}[#a-zA-Z0-9(),.%\"])?"
    }

    proptest! {
        #[test]
        fn test_serialize_then_deserialize_preserves_set(
            pairs in prop::collection::vec((variable_name(), variable_value()), 0..40)
        ) {
            let original: ThemeVariableSet = pairs.into_iter().collect();
            let parsed = deserialize(&serialize(&original));

            prop_assert_eq!(parsed.len(), original.len());
            for (name, value) in &original {
                prop_assert_eq!(parsed.get(name), Some(value.as_str()));
            }
            // insertion order survives as well
            let original_names: Vec<&str> = original.names().collect();
            let parsed_names: Vec<&str> = parsed.names().collect();
            prop_assert_eq!(original_names, parsed_names);
        }

        #[test]
        fn test_deserialize_never_panics(text in "\\PC*") {
            let parsed = deserialize(&text);
            // Property: keys are never empty
            for name in parsed.names() {
                prop_assert!(!name.is_empty());
            }
        }

        #[test]
        fn test_lines_without_colon_are_ignored(
            noise in prop::collection::vec("[^:\r\n]{0,40}", 0..20)
        ) {
            let text = noise.join("\r\n");
            prop_assert!(deserialize(&text).is_empty());
        }
    }
}

#[cfg(test)]
mod color_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_shade_zero_is_identity(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let color = Rgb::new(r, g, b);
            prop_assert_eq!(color.shade(0.0), color);
            prop_assert_eq!(shade(&color.to_hex(), 0.0), Some(color.to_hex()));
        }

        #[test]
        fn test_darkening_never_brightens(
            r in 0u8..=255,
            g in 0u8..=255,
            b in 0u8..=255,
            factor in 0.0f64..=1.0
        ) {
            let color = Rgb::new(r, g, b);
            let darker = color.shade(-factor);
            prop_assert!(darker.r <= r && darker.g <= g && darker.b <= b);

            let lighter = color.shade(factor);
            prop_assert!(lighter.r >= r && lighter.g >= g && lighter.b >= b);
        }
    }
}

#[cfg(test)]
mod upgrade_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_versioned_themes_are_not_rewritten(version in 2u32..1000) {
            let theme: ThemeVariableSet = [
                ("primary", "#010203".to_string()),
                ("theme-engine-version", version.to_string()),
            ]
            .into_iter()
            .collect();

            prop_assert_eq!(upgrade::classify(&theme), ThemeState::Current);
            let loaded = upgrade::load(theme.clone());
            prop_assert!(!loaded.is_old_theme);
            prop_assert_eq!(loaded.variables, theme);
        }
    }
}
