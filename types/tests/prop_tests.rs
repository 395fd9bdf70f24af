use proptest::prelude::*;

use realm_types::{ParcelPosition, Realm, RealmString};

fn catalyst_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.]{0,15}"
}

fn layer_name() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_-]{0,15}"
}

proptest! {
    /// Realm string roundtrip for layer-based realms.
    #[test]
    fn layer_realm_string_roundtrip(name in catalyst_name(), layer in layer_name()) {
        let realm = Realm {
            catalyst_name: name.clone(),
            domain: format!("https://{name}.example.org"),
            layer: Some(layer.clone()),
            lighthouse_version: "1.0.0".into(),
        };
        let parsed: RealmString = realm.to_string().parse().unwrap();
        prop_assert_eq!(parsed, realm.realm_string());
    }

    /// Realm string roundtrip for islands-based realms.
    #[test]
    fn islands_realm_string_roundtrip(name in catalyst_name()) {
        let realm = Realm {
            catalyst_name: name.clone(),
            domain: format!("https://{name}.example.org"),
            layer: None,
            lighthouse_version: "2.0.0".into(),
        };
        let parsed: RealmString = realm.to_string().parse().unwrap();
        prop_assert_eq!(parsed.layer, None);
        prop_assert_eq!(parsed.catalyst_name, name);
    }

    /// Distance is symmetric and zero only for the same parcel.
    #[test]
    fn parcel_distance_symmetric(
        ax in -150i32..150, ay in -150i32..150,
        bx in -150i32..150, by in -150i32..150,
    ) {
        let a = ParcelPosition::new(ax, ay);
        let b = ParcelPosition::new(bx, by);
        prop_assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
        prop_assert_eq!(a.distance_to(&b) == 0.0, a == b);
    }
}
