use pretty_assertions::assert_eq;

use super::*;

#[test]
fn primitive_names_round_trip() {
    for primitive in PrimitiveType::ALL {
        assert_eq!(PrimitiveType::from_name(primitive.name()), Some(primitive));
    }
    assert_eq!(PrimitiveType::from_name("Integer"), None);
}

#[test]
fn fully_qualified_names_of_compound_signatures() {
    assert_eq!(TypeSignature::slice(TypeSignature::int()).fully_qualified_name(), "$Int");
    assert_eq!(
        TypeSignature::pointer(TypeSignature::char()).fully_qualified_name(),
        "#Char"
    );
    assert_eq!(
        TypeSignature::array(TypeSignature::float(), 4).fully_qualified_name(),
        "[4]Float"
    );
    assert_eq!(
        TypeSignature::pointer(TypeSignature::array(TypeSignature::char(), 3))
            .fully_qualified_name(),
        "#[3]Char"
    );
}

#[test]
fn inline_union_name_joins_alternatives() {
    let union = TypeSignature::inline_union(vec![TypeSignature::int(), TypeSignature::float()]);
    assert_eq!(union.fully_qualified_name(), "(Int | Float)");
    assert_eq!(union.to_string(), "(Int | Float)");
}

#[test]
fn inline_union_names_keep_their_grouping() {
    let pointer_to_union = TypeSignature::pointer(TypeSignature::inline_union(vec![
        TypeSignature::int(),
        TypeSignature::float(),
    ]));
    let union_with_pointer = TypeSignature::inline_union(vec![
        TypeSignature::pointer(TypeSignature::int()),
        TypeSignature::float(),
    ]);
    assert_eq!(pointer_to_union.fully_qualified_name(), "#(Int | Float)");
    assert_eq!(union_with_pointer.fully_qualified_name(), "(#Int | Float)");

    let single = TypeSignature::inline_union(vec![TypeSignature::int()]);
    assert_eq!(single.fully_qualified_name(), "(Int)");
    assert_ne!(single.fully_qualified_name(), TypeSignature::int().fully_qualified_name());
}

#[test]
fn custom_type_names_include_package_and_type_args() {
    let plain = TypeSignature::custom("testpackage", "Number");
    assert_eq!(plain.fully_qualified_name(), "testpackage::Number");

    let generic = TypeSignature::Custom(
        CustomType::new("pkg", "Pair")
            .with_type_args(vec![TypeSignature::int(), TypeSignature::custom("pkg", "Point")]),
    );
    assert_eq!(generic.fully_qualified_name(), "pkg::Pair<Int,pkg::Point>");
}

#[test]
fn template_detection_is_deep() {
    assert!(TypeSignature::template("T").contains_template());
    assert!(TypeSignature::slice(TypeSignature::template("T")).contains_template());
    assert!(TypeSignature::inline_union(vec![
        TypeSignature::int(),
        TypeSignature::pointer(TypeSignature::template("U")),
    ])
    .contains_template());
    assert!(!TypeSignature::array(TypeSignature::int(), 2).contains_template());
}

#[test]
fn type_definition_names() {
    let def = TypeDefinition::Union(UnionDefinition {
        package: "testpackage".into(),
        name: "Number".into(),
        alternatives: vec![TypeSignature::int(), TypeSignature::float()],
        debug: DebugInfo::new("main.bt", 1, 1),
    });
    assert_eq!(def.fully_qualified_name(), "testpackage::Number");
    assert_eq!(def.name(), "Number");
    assert_eq!(def.package(), "testpackage");
}
