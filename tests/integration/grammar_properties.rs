use kinesis_bind::grammar::{is_binding, parse, BindingKind, StateKey};
use proptest::prelude::*;

#[test]
fn three_segment_toggle_names_attribute_and_state() {
    let descriptor = parse("cls.active.toggle", "on").unwrap();

    assert_eq!(descriptor.kind, BindingKind::Toggle);
    assert_eq!(descriptor.attribute.as_deref(), Some("cls"));
    assert_eq!(descriptor.state, StateKey::Named("active".to_string()));
    assert_eq!(descriptor.value, "on");
}

proptest! {
    #[test]
    fn parsing_is_deterministic(
        name in "[a-z]{1,6}(\\.[a-z]{1,6}){0,3}\\.(watch|toggle|action|asset)",
        value in "[a-z.]{0,12}",
    ) {
        match (parse(&name, &value), parse(&name, &value)) {
            (Ok(first), Ok(second)) => prop_assert_eq!(first, second),
            (Err(first), Err(second)) => prop_assert_eq!(first.to_string(), second.to_string()),
            _ => prop_assert!(false, "parsing `{}` gave different outcomes", name),
        }
    }

    #[test]
    fn toggles_require_exactly_three_segments(
        name in "[a-z]{1,6}(\\.[a-z]{1,6}){0,3}\\.toggle",
    ) {
        let segments = name.split('.').count();

        prop_assert_eq!(parse(&name, "x").is_ok(), segments == 3);
    }

    #[test]
    fn names_without_a_suffix_are_not_bindings(
        name in "[a-z]{1,8}(\\.[a-z]{1,8}){0,2}",
    ) {
        prop_assume!(!["watch", "toggle", "action", "asset"]
            .iter()
            .any(|suffix| name.rsplit('.').next() == Some(*suffix)));

        prop_assert!(!is_binding(&name));
        prop_assert!(parse(&name, "x").is_err());
    }
}
