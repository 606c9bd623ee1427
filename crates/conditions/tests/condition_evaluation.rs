//! End-to-end evaluation: config in, verdict out, through the factory and
//! the full services bundle.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use parallax_conditions::prelude::*;
use parallax_value::{keys, Value};

fn services() -> ConditionServices {
    let mut services = ConditionServices::with_defaults();
    services.converters_mut().register_standard();
    services
}

fn run(config: &ConditionConfig, resolver: &StaticResolver, services: &ConditionServices) -> Verdict {
    let condition = services.factory().create(config).unwrap();
    let ctx = EvalContext::new(resolver, services);
    condition.evaluate(None, &ctx).unwrap().as_ready().unwrap()
}

fn host(name: &'static str, value: Value) -> StaticValueHost {
    StaticValueHost::new(name, Some(value))
}

// ============================================================================
// PATTERNS
// ============================================================================

#[test]
fn multiline_anchors_judge_the_middle_line() {
    let services = services();
    let resolver = StaticResolver::new()
        .with_host(host("note", Value::from("FirstLine\nABC\nLastLine")));

    let per_line = ConditionConfig::new(ConditionType::REG_EXP)
        .with_value_host_name("note")
        .with_expression("^ABC$")
        .with_multiline(true);
    assert_eq!(run(&per_line, &resolver, &services), Verdict::Match);

    let resolver = StaticResolver::new().with_host(host("note", Value::from("FirstLine\nABC")));
    let whole_text = ConditionConfig::new(ConditionType::REG_EXP)
        .with_value_host_name("note")
        .with_expression("^ABC$")
        .with_multiline(false);
    assert_eq!(run(&whole_text, &resolver, &services), Verdict::NoMatch);
}

// ============================================================================
// COMPARISONS
// ============================================================================

#[test]
fn integer_rounding_feeds_equality() {
    let services = services();
    let equal_to_100 = ConditionConfig::new(ConditionType::EQUAL_TO)
        .with_value_host_name("total")
        .with_conversion_lookup_key(keys::INTEGER.clone())
        .with_second_value(Value::from(100));

    let resolver = StaticResolver::new().with_host(host("total", Value::from(99.9)));
    assert_eq!(run(&equal_to_100, &resolver, &services), Verdict::Match);

    let resolver = StaticResolver::new().with_host(host("total", Value::from(100.6)));
    assert_eq!(run(&equal_to_100, &resolver, &services), Verdict::NoMatch);
}

#[test]
fn every_boolean_pairing_refuses_to_order() {
    let services = services();
    for left in [false, true] {
        for right in [false, true] {
            let config = ConditionConfig::new(ConditionType::GREATER_THAN)
                .with_value_host_name("flag")
                .with_second_value(Value::from(right));
            let resolver = StaticResolver::new().with_host(host("flag", Value::from(left)));
            assert_eq!(
                run(&config, &resolver, &services),
                Verdict::Undetermined,
                "{left} > {right}"
            );
        }
    }
}

#[test]
fn instants_compare_by_calendar_day_by_default() {
    let services = services();
    let morning = Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2024, 3, 9, 21, 30, 0).unwrap();
    let next_day = Utc.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap();

    let same_day = ConditionConfig::new(ConditionType::EQUAL_TO)
        .with_value_host_name("placed")
        .with_second_value(Value::from(evening));
    let resolver = StaticResolver::new().with_host(host("placed", Value::from(morning)));
    assert_eq!(run(&same_day, &resolver, &services), Verdict::Match);

    let before = ConditionConfig::new(ConditionType::LESS_THAN)
        .with_value_host_name("placed")
        .with_second_value(Value::from(next_day));
    assert_eq!(run(&before, &resolver, &services), Verdict::Match);
}

// ============================================================================
// BOUNDARIES
// ============================================================================

#[test]
fn range_boundaries_always_match() {
    let services = services();
    let config = ConditionConfig::new(ConditionType::RANGE)
        .with_value_host_name("qty")
        .with_minimum(Value::from(2))
        .with_maximum(Value::from(8));

    for boundary in [2, 8] {
        let resolver = StaticResolver::new().with_host(host("qty", Value::from(boundary)));
        assert_eq!(run(&config, &resolver, &services), Verdict::Match, "{boundary}");
    }
}

#[test]
fn string_length_boundaries_always_match() {
    let services = services();
    let config = ConditionConfig::new(ConditionType::STRING_LENGTH)
        .with_value_host_name("code")
        .with_minimum(Value::from(2))
        .with_maximum(Value::from(4));

    for boundary in ["ab", "abcd"] {
        let resolver = StaticResolver::new().with_host(host("code", Value::from(boundary)));
        assert_eq!(run(&config, &resolver, &services), Verdict::Match, "{boundary}");
    }
}

// ============================================================================
// WIRE SHAPE
// ============================================================================

#[test]
fn a_json_rule_tree_builds_and_evaluates() {
    let services = services();
    let config: ConditionConfig = serde_json::from_str(
        r#"{
            "type": "AllMatch",
            "children": [
                { "type": "RequireText", "valueHostName": "name" },
                { "type": "StringLength", "valueHostName": "name", "maximum": 10 }
            ]
        }"#,
    )
    .unwrap();

    let resolver = StaticResolver::new().with_host(host("name", Value::from("Ada")));
    assert_eq!(run(&config, &resolver, &services), Verdict::Match);

    let resolver = StaticResolver::new().with_host(host("name", Value::from("")));
    assert_eq!(run(&config, &resolver, &services), Verdict::NoMatch);

    let resolver =
        StaticResolver::new().with_host(host("name", Value::from("unreasonably long value")));
    assert_eq!(run(&config, &resolver, &services), Verdict::NoMatch);
}

// ============================================================================
// HARD VS SOFT FAILURES
// ============================================================================

#[test]
fn an_unknown_primary_host_is_a_hard_error() {
    let services = services();
    let config = ConditionConfig::new(ConditionType::NOT_NULL).with_value_host_name("ghost");
    let condition = services.factory().create(&config).unwrap();

    let resolver = StaticResolver::new();
    let ctx = EvalContext::new(&resolver, &services);
    let err = condition.evaluate(None, &ctx).unwrap_err();
    assert_eq!(
        err,
        ConditionError::UnknownValueHost {
            name: ValueHostName::new("ghost"),
        }
    );
}

#[test]
fn an_unknown_second_host_is_a_soft_gap() {
    let services = services();
    let config = ConditionConfig::new(ConditionType::EQUAL_TO)
        .with_value_host_name("total")
        .with_second_value_host_name("ghost");
    let resolver = StaticResolver::new().with_host(host("total", Value::from(5)));
    assert_eq!(run(&config, &resolver, &services), Verdict::Undetermined);
}

// ============================================================================
// CAPABILITIES
// ============================================================================

#[test]
fn capability_queries_replace_downcasting() {
    let services = services();
    let resolver = StaticResolver::new();
    let ctx = EvalContext::new(&resolver, &services);

    let length = services
        .factory()
        .create(
            &ConditionConfig::new(ConditionType::STRING_LENGTH).with_maximum(Value::from(5)),
        )
        .unwrap();
    let host = StaticValueHost::new("comment", Some(Value::from("hi there")));
    assert_eq!(
        length.evaluate(Some(&host), &ctx).unwrap().as_ready(),
        Some(Verdict::NoMatch)
    );

    let tokens = length
        .as_token_source()
        .unwrap()
        .token_values(Some(&host), &ctx);
    assert_eq!(tokens[0].label, "Length");
    assert_eq!(tokens[0].value, Some(Value::Integer(8)));

    // NotNull contributes no tokens and no during-edit pass.
    let not_null = services
        .factory()
        .create(&ConditionConfig::new(ConditionType::NOT_NULL))
        .unwrap();
    assert!(not_null.as_token_source().is_none());
    assert!(not_null.as_during_edit().is_none());
}

#[test]
fn during_edit_runs_on_raw_text_through_the_factory() {
    let services = services();
    let resolver = StaticResolver::new();
    let ctx = EvalContext::new(&resolver, &services);

    let config = ConditionConfig::new(ConditionType::REG_EXP)
        .with_value_host_name("sku")
        .with_expression(r"^[A-Z]{3}-\d{4}$")
        .with_supports_during_edit(true);
    let condition = services.factory().create(&config).unwrap();
    let editor = condition.as_during_edit().unwrap();

    let host = StaticValueHost::new("sku", None);
    assert_eq!(
        editor
            .evaluate_during_edit(" ABC-1234 ", &host, &ctx)
            .unwrap(),
        Verdict::Match
    );
    assert_eq!(
        editor
            .evaluate_during_edit("ABC-12", &host, &ctx)
            .unwrap(),
        Verdict::NoMatch
    );
}

// ============================================================================
// DEPENDENCY DISCOVERY
// ============================================================================

#[test]
fn rule_trees_report_every_named_dependency_once() {
    let services = services();
    let config = ConditionConfig::new(ConditionType::ALL_MATCH)
        .with_child(ConditionConfig::new(ConditionType::REQUIRE_TEXT).with_value_host_name("start"))
        .with_child(
            ConditionConfig::new(ConditionType::LESS_THAN_OR_EQUAL)
                .with_value_host_name("start")
                .with_second_value_host_name("end"),
        );
    let condition = services.factory().create(&config).unwrap();

    let mut names = std::collections::BTreeSet::new();
    condition.gather_value_host_names(&mut names);
    let names: Vec<&str> = names.iter().map(ValueHostName::as_str).collect();
    assert_eq!(names, ["end", "start"]);
}
