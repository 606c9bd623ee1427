//! Folding semantics under observation: a scripted condition counts its own
//! evaluations, so short-circuiting and evaluate-everything claims are
//! proven rather than assumed.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use parallax_conditions::prelude::*;
use parallax_value::Value;

static SCRIPTED: ConditionType = ConditionType::from_static("Scripted");
static STALLS: ConditionType = ConditionType::from_static("Stalls");

/// Returns a fixed verdict and counts how many times it was asked.
#[derive(Debug)]
struct Scripted {
    verdict: Verdict,
    calls: Arc<AtomicUsize>,
}

impl Condition for Scripted {
    fn condition_type(&self) -> &ConditionType {
        &SCRIPTED
    }

    fn evaluate(
        &self,
        _value_host: Option<&dyn ValueHost>,
        _ctx: &EvalContext<'_>,
    ) -> Result<Evaluation, ConditionError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.verdict.into())
    }

    fn gather_value_host_names(&self, _names: &mut BTreeSet<ValueHostName>) {}
}

/// Always answers with deferred work, which no combinator accepts.
#[derive(Debug)]
struct Stalls;

impl Condition for Stalls {
    fn condition_type(&self) -> &ConditionType {
        &STALLS
    }

    fn evaluate(
        &self,
        _value_host: Option<&dyn ValueHost>,
        _ctx: &EvalContext<'_>,
    ) -> Result<Evaluation, ConditionError> {
        Ok(Evaluation::Pending(parallax_conditions::PendingVerdict::new(
            async { Verdict::Match },
        )))
    }

    fn gather_value_host_names(&self, _names: &mut BTreeSet<ValueHostName>) {}
}

/// Services with the scripted conditions registered, plus one call counter
/// per scripted child slot.
struct Probe {
    services: ConditionServices,
    counters: Vec<Arc<AtomicUsize>>,
}

impl Probe {
    fn new(slots: usize) -> Self {
        let counters: Vec<Arc<AtomicUsize>> =
            (0..slots).map(|_| Arc::new(AtomicUsize::new(0))).collect();

        let mut services = ConditionServices::with_defaults();
        let captured = counters.clone();
        services.factory_mut().register(SCRIPTED.clone(), move |config, _| {
            let verdict = match config.extra.get("verdict").and_then(serde_json::Value::as_str) {
                Some("Match") => Verdict::Match,
                Some("NoMatch") => Verdict::NoMatch,
                _ => Verdict::Undetermined,
            };
            let slot = config
                .extra
                .get("slot")
                .and_then(serde_json::Value::as_u64)
                .map_or(0, |slot| slot as usize);
            Ok(Box::new(Scripted {
                verdict,
                calls: Arc::clone(&captured[slot]),
            }))
        });
        services
            .factory_mut()
            .register(STALLS.clone(), |_, _| Ok(Box::new(Stalls)));

        Self { services, counters }
    }

    fn run(&self, config: &ConditionConfig) -> Result<Verdict, ConditionError> {
        let condition = self.services.factory().create(config)?;
        let resolver = StaticResolver::new();
        let ctx = EvalContext::new(&resolver, &self.services);
        Ok(condition.evaluate(None, &ctx)?.as_ready().unwrap())
    }

    fn calls(&self) -> Vec<usize> {
        self.counters
            .iter()
            .map(|counter| counter.load(Ordering::Relaxed))
            .collect()
    }
}

fn scripted(slot: usize, verdict: Verdict) -> ConditionConfig {
    let mut config = ConditionConfig::new(SCRIPTED.clone());
    config
        .extra
        .insert("slot".to_owned(), serde_json::Value::from(slot));
    config
        .extra
        .insert("verdict".to_owned(), serde_json::Value::from(verdict.name()));
    config
}

fn combinator(
    kind: ConditionType,
    verdicts: &[Verdict],
    treat: Option<Verdict>,
) -> ConditionConfig {
    let mut config = ConditionConfig::new(kind).with_children(
        verdicts
            .iter()
            .enumerate()
            .map(|(slot, verdict)| scripted(slot, *verdict)),
    );
    if let Some(verdict) = treat {
        config = config.with_treat_undetermined_as(verdict);
    }
    config
}

// ============================================================================
// SHORT-CIRCUIT PROOFS
// ============================================================================

#[test]
fn all_match_stops_at_the_first_no_match() {
    let probe = Probe::new(3);
    let config = combinator(
        ConditionType::ALL_MATCH,
        &[Verdict::Match, Verdict::NoMatch, Verdict::Match],
        None,
    );
    assert_eq!(probe.run(&config).unwrap(), Verdict::NoMatch);
    assert_eq!(probe.calls(), [1, 1, 0]);
}

#[test]
fn any_match_stops_at_the_first_match() {
    let probe = Probe::new(3);
    let config = combinator(
        ConditionType::ANY_MATCH,
        &[Verdict::NoMatch, Verdict::Match, Verdict::NoMatch],
        None,
    );
    assert_eq!(probe.run(&config).unwrap(), Verdict::Match);
    assert_eq!(probe.calls(), [1, 1, 0]);
}

#[test]
fn an_undetermined_child_does_not_stop_the_fold() {
    let probe = Probe::new(3);
    let config = combinator(
        ConditionType::ALL_MATCH,
        &[Verdict::Undetermined, Verdict::Match, Verdict::Match],
        None,
    );
    assert_eq!(probe.run(&config).unwrap(), Verdict::Undetermined);
    assert_eq!(probe.calls(), [1, 1, 1]);
}

#[test]
fn count_matches_always_evaluates_every_child() {
    let probe = Probe::new(4);
    let config = combinator(
        ConditionType::COUNT_MATCHES,
        &[
            Verdict::Match,
            Verdict::Undetermined,
            Verdict::Match,
            Verdict::NoMatch,
        ],
        None,
    )
    .with_minimum(Value::from(2))
    .with_maximum(Value::from(2));
    assert_eq!(probe.run(&config).unwrap(), Verdict::Match);
    assert_eq!(probe.calls(), [1, 1, 1, 1]);
}

// ============================================================================
// FOLD TABLES
// ============================================================================

#[rstest]
#[case::empty(&[], None, Verdict::Undetermined)]
#[case::all_matching(&[Verdict::Match, Verdict::Match], None, Verdict::Match)]
#[case::one_violation(&[Verdict::Match, Verdict::NoMatch], None, Verdict::NoMatch)]
#[case::undetermined_downgrades(&[Verdict::Match, Verdict::Undetermined], None, Verdict::Undetermined)]
#[case::later_no_match_beats_undetermined(&[Verdict::Undetermined, Verdict::NoMatch], None, Verdict::NoMatch)]
#[case::substituted_as_match(&[Verdict::Match, Verdict::Undetermined], Some(Verdict::Match), Verdict::Match)]
#[case::substituted_as_no_match(&[Verdict::Undetermined, Verdict::Match], Some(Verdict::NoMatch), Verdict::NoMatch)]
fn all_match_folds(
    #[case] verdicts: &[Verdict],
    #[case] treat: Option<Verdict>,
    #[case] expected: Verdict,
) {
    let probe = Probe::new(verdicts.len().max(1));
    let config = combinator(ConditionType::ALL_MATCH, verdicts, treat);
    assert_eq!(probe.run(&config).unwrap(), expected);
}

#[rstest]
#[case::empty(&[], None, Verdict::Undetermined)]
#[case::all_violating(&[Verdict::NoMatch, Verdict::NoMatch], None, Verdict::NoMatch)]
#[case::one_hit(&[Verdict::NoMatch, Verdict::Match], None, Verdict::Match)]
#[case::undetermined_downgrades(&[Verdict::NoMatch, Verdict::Undetermined], None, Verdict::Undetermined)]
#[case::later_match_beats_undetermined(&[Verdict::Undetermined, Verdict::Match], None, Verdict::Match)]
#[case::substituted_as_match(&[Verdict::Undetermined, Verdict::NoMatch], Some(Verdict::Match), Verdict::Match)]
fn any_match_folds(
    #[case] verdicts: &[Verdict],
    #[case] treat: Option<Verdict>,
    #[case] expected: Verdict,
) {
    let probe = Probe::new(verdicts.len().max(1));
    let config = combinator(ConditionType::ANY_MATCH, verdicts, treat);
    assert_eq!(probe.run(&config).unwrap(), expected);
}

#[rstest]
#[case::tally_excludes_undetermined(&[Verdict::Match, Verdict::Undetermined, Verdict::Match], Some(3), None, None, Verdict::NoMatch)]
#[case::substitution_feeds_the_tally(&[Verdict::Match, Verdict::Undetermined, Verdict::Match], Some(3), None, Some(Verdict::Match), Verdict::Match)]
#[case::no_bounds_means_any_children_match(&[Verdict::NoMatch], None, None, None, Verdict::Match)]
#[case::upper_bound_violated(&[Verdict::Match, Verdict::Match], None, Some(1), None, Verdict::NoMatch)]
#[case::bounds_are_inclusive(&[Verdict::Match, Verdict::Match], Some(2), Some(2), None, Verdict::Match)]
fn count_matches_folds(
    #[case] verdicts: &[Verdict],
    #[case] minimum: Option<i64>,
    #[case] maximum: Option<i64>,
    #[case] treat: Option<Verdict>,
    #[case] expected: Verdict,
) {
    let probe = Probe::new(verdicts.len().max(1));
    let mut config = combinator(ConditionType::COUNT_MATCHES, verdicts, treat);
    if let Some(minimum) = minimum {
        config = config.with_minimum(Value::from(minimum));
    }
    if let Some(maximum) = maximum {
        config = config.with_maximum(Value::from(maximum));
    }
    assert_eq!(probe.run(&config).unwrap(), expected);
}

#[test]
fn empty_count_matches_is_undetermined_even_with_bounds_and_substitution() {
    let probe = Probe::new(1);
    let config = combinator(ConditionType::COUNT_MATCHES, &[], Some(Verdict::Match))
        .with_minimum(Value::from(0));
    assert_eq!(probe.run(&config).unwrap(), Verdict::Undetermined);
}

// ============================================================================
// NOT
// ============================================================================

#[rstest]
#[case::inverts_match(Verdict::Match, Verdict::NoMatch)]
#[case::inverts_no_match(Verdict::NoMatch, Verdict::Match)]
#[case::passes_undetermined(Verdict::Undetermined, Verdict::Undetermined)]
fn not_inverts_only_determined_verdicts(#[case] child: Verdict, #[case] expected: Verdict) {
    let probe = Probe::new(1);
    let config = combinator(ConditionType::NOT, &[child], None);
    assert_eq!(probe.run(&config).unwrap(), expected);
}

#[test]
fn not_ignores_substitution() {
    let probe = Probe::new(1);
    let config = combinator(ConditionType::NOT, &[Verdict::Undetermined], Some(Verdict::Match));
    assert_eq!(probe.run(&config).unwrap(), Verdict::Undetermined);
}

// ============================================================================
// BUILD AND HOST PLUMBING
// ============================================================================

#[test]
fn a_pending_child_aborts_the_fold() {
    let probe = Probe::new(1);
    let config = ConditionConfig::new(ConditionType::ALL_MATCH)
        .with_child(ConditionConfig::new(STALLS.clone()));
    assert_eq!(
        probe.run(&config).unwrap_err(),
        ConditionError::PendingChild {
            condition_type: ConditionType::ALL_MATCH,
        }
    );
}

#[test]
fn child_config_errors_surface_at_build_time() {
    let services = ConditionServices::with_defaults();
    let config = ConditionConfig::new(ConditionType::ALL_MATCH)
        .with_child(ConditionConfig::new(ConditionType::REG_EXP));

    let err = services.factory().create(&config).unwrap_err();
    assert_eq!(
        err,
        ConditionError::MissingParameter {
            condition_type: ConditionType::REG_EXP,
            field: "expression",
        }
    );
}

#[test]
fn children_inherit_the_received_host_not_the_parents_name() {
    // The parent names a host no resolver knows; the nameless child sees the
    // host under evaluation.
    let services = ConditionServices::with_defaults();
    let config = ConditionConfig::new(ConditionType::ALL_MATCH)
        .with_value_host_name("decoy")
        .with_child(ConditionConfig::new(ConditionType::NOT_NULL));
    let condition = services.factory().create(&config).unwrap();

    let resolver = StaticResolver::new();
    let ctx = EvalContext::new(&resolver, &services);
    let host = StaticValueHost::new("field", Some(Value::from(1)));
    assert_eq!(
        condition.evaluate(Some(&host), &ctx).unwrap().as_ready(),
        Some(Verdict::Match)
    );
}
