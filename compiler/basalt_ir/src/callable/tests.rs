use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::ast::{Argument, FunctionDefinition};

fn function(name: &str, line: u32, args: Vec<TypeSignature>, ret: Option<TypeSignature>) -> FunctionRef {
    Rc::new(FunctionDefinition {
        name: name.into(),
        package: "main".into(),
        template_generics: Vec::new(),
        arguments: args
            .into_iter()
            .enumerate()
            .map(|(i, ty)| Argument::new(format!("a{i}"), ty))
            .collect(),
        return_type: ret,
        code: Vec::new(),
        debug: DebugInfo::new("main.bt", line, 1),
    })
}

fn two_way_plan() -> CommonFeatureAdoptionPlan {
    CommonFeatureAdoptionPlan::RecursiveAdoption(RecursiveAdoptionPlan {
        argument_index: 0,
        alternatives: vec![TypeSignature::int(), TypeSignature::float()],
        nested_plans: vec![
            CommonFeatureAdoptionPlan::DirectAdoption(function(
                "show",
                1,
                vec![TypeSignature::int()],
                Some(TypeSignature::int()),
            )),
            CommonFeatureAdoptionPlan::DirectAdoption(function(
                "show",
                5,
                vec![TypeSignature::float()],
                Some(TypeSignature::float()),
            )),
        ],
    })
}

#[test]
fn function_unique_name_uses_source_coordinates() {
    let f = function("add", 3, vec![TypeSignature::int()], None);
    assert_eq!(
        CallableCodeBlock::Function(f).unique_name(),
        "add(main.bt@3:1)"
    );
}

#[test]
fn cfa_unique_name_lists_argument_types() {
    let descriptor = CommonFeatureAdoptionPlanDescriptor {
        function_name: "show".into(),
        arg_types: vec![
            TypeSignature::inline_union(vec![TypeSignature::int(), TypeSignature::float()]),
            TypeSignature::bool(),
        ],
        return_type: None,
        filename: "main.bt".into(),
        debug: DebugInfo::new("main.bt", 9, 4),
        plan: two_way_plan(),
    };
    assert_eq!(
        CallableCodeBlock::Adoption(Rc::new(descriptor)).unique_name(),
        "[CFA::main.bt]show((Int | Float),Bool)"
    );
}

#[test]
fn plan_shape_queries() {
    let plan = two_way_plan();
    assert!(plan.is_well_formed());
    assert!(!plan.is_direct_adoption());
    assert_eq!(plan.tag_test_count(), 1);
    assert_eq!(
        plan.leaf_return_types(),
        vec![Some(TypeSignature::int()), Some(TypeSignature::float())]
    );
}

#[test]
fn plan_with_mismatched_lengths_is_malformed() {
    let plan = CommonFeatureAdoptionPlan::RecursiveAdoption(RecursiveAdoptionPlan {
        argument_index: 0,
        alternatives: vec![TypeSignature::int(), TypeSignature::float()],
        nested_plans: vec![CommonFeatureAdoptionPlan::DirectAdoption(function(
            "f",
            1,
            vec![TypeSignature::int()],
            None,
        ))],
    });
    assert!(!plan.is_well_formed());
}

#[test]
fn builtin_signatures() {
    let pow = BuiltinCallable::Pow {
        operand: TypeSignature::float(),
    };
    assert_eq!(pow.unique_string_id(), "__basalt_pow_float");
    assert_eq!(pow.arg_types(), vec![TypeSignature::float(), TypeSignature::float()]);

    let is = BuiltinCallable::Is {
        union_type: TypeSignature::custom("pkg", "Number"),
        checked: TypeSignature::int(),
    };
    assert_eq!(is.unique_string_id(), "__basalt_is[pkg::Number][Int]");
    assert_eq!(is.return_type(), TypeSignature::bool());

    let callable = CallableCodeBlock::Builtin(BuiltinCallable::As {
        source: TypeSignature::custom("pkg", "Number"),
        dest: TypeSignature::float(),
    });
    assert_eq!(callable.return_type(), Some(TypeSignature::float()));
    assert_eq!(callable.arg_types(), vec![TypeSignature::custom("pkg", "Number")]);
}
