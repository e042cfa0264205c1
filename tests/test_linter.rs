use metlint::models::{MetricFamily, MetricType, Problem};
use metlint::rules::Validation;
use metlint::Linter;

fn well_formed_counter(name: &str) -> MetricFamily {
    MetricFamily::new(name, MetricType::Counter).with_help("Some help.")
}

#[test]
fn lints_in_memory_families() {
    let families = vec![
        MetricFamily::new("foo", MetricType::Gauge),
        MetricFamily::new("bar", MetricType::Gauge).with_help("ok"),
    ];
    let mut linter = Linter::with_metric_families(families);

    let problems = linter.lint().unwrap();

    // bar contributes nothing, foo is missing help text.
    assert_eq!(problems, vec![Problem::new("foo", "no help text")]);
}

#[test]
fn empty_input_yields_empty_list() {
    let mut linter = Linter::with_metric_families(Vec::new());

    assert_eq!(linter.lint().unwrap(), Vec::new());
}

#[test]
fn clean_families_yield_no_problems() {
    let mut linter = Linter::with_metric_families(vec![
        well_formed_counter("requests_total"),
        MetricFamily::new("temperature", MetricType::Gauge).with_help("Degrees."),
    ]);

    assert_eq!(linter.lint().unwrap(), Vec::new());
}

#[test]
fn output_is_sorted_by_metric_then_text() {
    // Supplied in reverse name order, and zeta triggers two different rules.
    let families = vec![
        MetricFamily::new("zeta_total", MetricType::Gauge),
        MetricFamily::new("alpha", MetricType::Gauge),
    ];
    let mut linter = Linter::with_metric_families(families);

    let problems = linter.lint().unwrap();

    assert_eq!(
        problems,
        vec![
            Problem::new("alpha", "no help text"),
            Problem::new("zeta_total", "no help text"),
            Problem::new(
                "zeta_total",
                "non-counter metrics should not have \"_total\" suffix"
            ),
        ]
    );
}

#[test]
fn repeated_runs_are_identical() {
    let families = vec![
        MetricFamily::new("b", MetricType::Gauge),
        MetricFamily::new("a", MetricType::Gauge),
    ];

    let mut first = Linter::with_metric_families(families.clone());
    let mut second = Linter::with_metric_families(families);

    assert_eq!(first.lint().unwrap(), second.lint().unwrap());
}

#[test]
fn appending_zero_custom_rules_is_a_noop() {
    let families = vec![MetricFamily::new("foo", MetricType::Gauge)];

    let mut plain = Linter::with_metric_families(families.clone());
    let mut extended = Linter::with_metric_families(families);
    extended.add_custom_validations(Vec::new());

    assert_eq!(plain.lint().unwrap(), extended.lint().unwrap());
}

#[test]
fn custom_rules_run_after_built_ins_and_merge_into_the_sorted_list() {
    let families = vec![well_formed_counter("requests_total")];
    let mut linter = Linter::with_metric_families(families);

    let rule: Validation = Box::new(|mf: &MetricFamily| {
        if mf.name.starts_with("requests") {
            vec![Problem::new(&mf.name, "requests metrics are deprecated here")]
        } else {
            Vec::new()
        }
    });
    linter.add_custom_validations(vec![rule]);

    let problems = linter.lint().unwrap();

    assert_eq!(
        problems,
        vec![Problem::new(
            "requests_total",
            "requests metrics are deprecated here"
        )]
    );
}

#[test]
fn duplicate_custom_rules_report_twice() {
    let families = vec![well_formed_counter("requests_total")];
    let mut linter = Linter::with_metric_families(families);

    let make_rule = || -> Validation {
        Box::new(|mf: &MetricFamily| vec![Problem::new(&mf.name, "flagged")])
    };
    linter.add_custom_validations(vec![make_rule()]);
    linter.add_custom_validations(vec![make_rule()]);

    let problems = linter.lint().unwrap();

    assert_eq!(
        problems,
        vec![
            Problem::new("requests_total", "flagged"),
            Problem::new("requests_total", "flagged"),
        ]
    );
}

#[test]
fn custom_rule_registration_order_is_preserved_per_family() {
    let families = vec![MetricFamily::new("m", MetricType::Gauge).with_help("h")];
    let mut linter = Linter::with_metric_families(families);

    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

    let first_seen = seen.clone();
    let first: Validation = Box::new(move |_mf: &MetricFamily| {
        first_seen.lock().unwrap().push("first");
        Vec::new()
    });
    let second_seen = seen.clone();
    let second: Validation = Box::new(move |_mf: &MetricFamily| {
        second_seen.lock().unwrap().push("second");
        Vec::new()
    });

    linter.add_custom_validations(vec![first]);
    linter.add_custom_validations(vec![second]);
    linter.lint().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
}
