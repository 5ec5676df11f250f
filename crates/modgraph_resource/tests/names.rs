//! Integration tests for resource names, property paths and requirements.

use modgraph_resource::prelude::*;

#[test]
fn resource_names_round_trip_through_the_store() {
    for kind in ResourceKind::ALL {
        if kind == ResourceKind::Mod {
            continue;
        }
        let header = ResourceHeader::new("m", kind, "x", DeclRange::default());
        let parsed = ParsedResourceName::parse(&header.full_name).unwrap();
        assert_eq!(parsed.kind, kind);
        assert_eq!(parsed.mod_name.as_deref(), Some("m"));
        assert_eq!(parsed.unqualified_name(), header.unqualified_name);
    }
}

#[test]
fn property_paths_classify_their_scope() {
    let scoped = ParsedPropertyPath::parse("self.input.i1.value").unwrap();
    assert!(scoped.is_self_scoped() && scoped.is_input());
    assert_eq!(scoped.to_full_name("m").as_deref(), Some("m.input.i1"));

    let with = ParsedPropertyPath::parse("with.w1.rows").unwrap();
    assert!(with.is_with());
    assert_eq!(with.property, ["rows"]);

    let param = ParsedPropertyPath::parse("param.p1").unwrap();
    assert!(param.is_param());
    assert_eq!(param.kind(), None);

    assert!(ParsedPropertyPath::parse("input").is_err());
}

#[test]
fn requirements_validate_as_a_whole() {
    let require = Require::new()
        .with_min_version(Version::parse("v0.21.0").unwrap())
        .with_plugin(PluginVersion::parse("aws@^0.100").unwrap())
        .with_mod(ModVersionConstraint::new("github.com/turbot/dep", Some("^1")).unwrap())
        .with_mod(ModVersionConstraint::parse("github.com/turbot/local@file:../local").unwrap());

    assert!(require.validate().is_ok());
    assert!(!require.is_empty());
    let local = require.get_mod_dependency("github.com/turbot/local");
    assert_eq!(local.and_then(ModVersionConstraint::file_path), Some("../local"));
    assert_eq!(
        require.mods.iter().map(ToString::to_string).collect::<Vec<_>>(),
        ["github.com/turbot/dep@^1", "github.com/turbot/local@file:../local"]
    );
}
