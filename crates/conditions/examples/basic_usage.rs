//! Basic condition evaluation examples demonstrating the built-in families
//!
//! Run with: cargo run --example basic_usage -p parallax-conditions

use std::collections::BTreeSet;

use parallax_conditions::prelude::*;
use parallax_value::{Value, keys};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Soft evaluation gaps are logged through `tracing`; show them on stderr
    // so example 5 below has something visible to point at.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    println!("=== Parallax Conditions - Basic Examples ===\n");

    let mut services = ConditionServices::with_defaults();
    services.converters_mut().register_standard();

    // A small order form: every example evaluates against these hosts.
    let resolver = StaticResolver::new()
        .with_host(StaticValueHost::new("name", Some(Value::from("Ada"))).with_label("Name"))
        .with_host(StaticValueHost::new("note", Some(Value::from(""))).with_label("Note"))
        .with_host(StaticValueHost::new("quantity", Some(Value::from(12))))
        .with_host(StaticValueHost::new("total", Some(Value::from(99.9))))
        .with_host(StaticValueHost::new("budget", Some(Value::from(100))));
    let ctx = EvalContext::new(&resolver, &services);

    // Example 1: Required text
    {
        println!("1. Required Text:");
        let condition = services
            .factory()
            .create(&ConditionConfig::new(ConditionType::REQUIRE_TEXT))?;

        for host_name in ["name", "note"] {
            let host = resolver.value_host(host_name).ok_or("host not found")?;
            let verdict = condition.evaluate(Some(host), &ctx)?.as_ready().ok_or("pending")?;
            println!("   '{}' -> {}", host_name, verdict);
        }
    }

    println!();

    // Example 2: Range with a configured conversion
    {
        println!("2. Range with Integer Rounding:");
        // `total` holds 99.9; the Integer conversion rounds it to 100 before
        // the bounds are checked, so a [1, 100] range matches.
        let config = ConditionConfig::new(ConditionType::RANGE)
            .with_value_host_name("total")
            .with_minimum(Value::from(1))
            .with_maximum(Value::from(100))
            .with_conversion_lookup_key(keys::INTEGER.clone());
        let condition = services.factory().create(&config)?;

        let verdict = condition.evaluate(None, &ctx)?.as_ready().ok_or("pending")?;
        println!("   total 99.9 rounded into [1, 100] -> {}", verdict);
    }

    println!();

    // Example 3: Comparing two hosts
    {
        println!("3. Comparing Two Hosts:");
        let config = ConditionConfig::new(ConditionType::LESS_THAN_OR_EQUAL)
            .with_value_host_name("total")
            .with_second_value_host_name("budget");
        let condition = services.factory().create(&config)?;

        let verdict = condition.evaluate(None, &ctx)?.as_ready().ok_or("pending")?;
        println!("   total <= budget -> {}", verdict);
    }

    println!();

    // Example 4: A rule tree from JSON
    {
        println!("4. A Rule Tree from JSON:");
        let json = r#"{
            "type": "AllMatch",
            "children": [
                { "type": "RequireText", "valueHostName": "name" },
                { "type": "StringLength", "valueHostName": "name", "maximum": 10 },
                { "type": "Range", "valueHostName": "quantity", "minimum": 1, "maximum": 99 }
            ]
        }"#;
        let config: ConditionConfig = serde_json::from_str(json)?;
        let condition = services.factory().create(&config)?;

        let verdict = condition.evaluate(None, &ctx)?.as_ready().ok_or("pending")?;
        println!("   all three rules over the form -> {}", verdict);

        // Combinators report every named dependency, for change propagation.
        let mut names = BTreeSet::new();
        condition.gather_value_host_names(&mut names);
        let names: Vec<&str> = names.iter().map(ValueHostName::as_str).collect();
        println!("   the tree depends on: {:?}", names);
    }

    println!();

    // Example 5: Soft gaps versus hard errors
    {
        println!("5. Soft Gaps vs Hard Errors:");
        // An unknown *second* host cannot be judged, so the verdict is
        // Undetermined and a warning is logged (visible above this line).
        let config = ConditionConfig::new(ConditionType::EQUAL_TO)
            .with_value_host_name("total")
            .with_second_value_host_name("discount");
        let condition = services.factory().create(&config)?;
        let verdict = condition.evaluate(None, &ctx)?.as_ready().ok_or("pending")?;
        println!("   unknown second host 'discount' -> {}", verdict);

        // An unknown *primary* host is a configuration mistake and refuses
        // to evaluate at all.
        let config = ConditionConfig::new(ConditionType::NOT_NULL).with_value_host_name("ghost");
        let condition = services.factory().create(&config)?;
        match condition.evaluate(None, &ctx) {
            Ok(_) => println!("   unknown primary host 'ghost' -> evaluated?!"),
            Err(e) => println!("   unknown primary host 'ghost' -> error: {}", e),
        }
    }

    println!();

    // Example 6: Message tokens
    {
        println!("6. Message Tokens:");
        let config = ConditionConfig::new(ConditionType::STRING_LENGTH)
            .with_value_host_name("name")
            .with_minimum(Value::from(2))
            .with_maximum(Value::from(10));
        let condition = services.factory().create(&config)?;

        // The {Length} token reports the last evaluated length, so evaluate
        // before asking for tokens.
        let verdict = condition.evaluate(None, &ctx)?.as_ready().ok_or("pending")?;
        println!("   length of 'Ada' within [2, 10] -> {}", verdict);

        if let Some(source) = condition.as_token_source() {
            for token in source.token_values(None, &ctx) {
                match token.value {
                    Some(value) => println!("   {{{}}} = {}", token.label, value),
                    None => println!("   {{{}}} = (absent)", token.label),
                }
            }
        }
    }

    println!();

    // Example 7: Evaluating while the user types
    {
        println!("7. During-Edit Evaluation:");
        let config = ConditionConfig::new(ConditionType::REG_EXP)
            .with_value_host_name("name")
            .with_expression(r"^[A-Z]{3}-\d{4}$")
            .with_trim(true)
            .with_supports_during_edit(true);
        let condition = services.factory().create(&config)?;

        let host = resolver.value_host("name").ok_or("host not found")?;
        if let Some(during_edit) = condition.as_during_edit() {
            for text in [" ABC-1234 ", "ABC-12"] {
                let verdict = during_edit.evaluate_during_edit(text, host, &ctx)?;
                println!("   typing '{}' -> {}", text, verdict);
            }
        }
    }

    println!("\n=== All examples completed ===");
    Ok(())
}
