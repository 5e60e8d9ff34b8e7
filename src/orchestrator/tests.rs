use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::analysis::AnalysisRequest;
use crate::analysis::fixtures::{
    good_match_json, sample_request, truncated_analysis_json, uniform_analysis_json,
};
use crate::cache::{CacheManager, EphemeralTier, MockDurableStore};
use crate::cascade::{CascadeError, CascadeExecutor, CascadePolicy};
use crate::provider::{MockProvider, ProviderClient};
use crate::telemetry::EngineMetrics;
use crate::validation::QualityValidator;

struct Harness {
    orchestrator: AnalysisOrchestrator<MockDurableStore>,
    durable: MockDurableStore,
    low_cost: Vec<MockProvider>,
    premium: MockProvider,
}

fn policy() -> CascadePolicy {
    CascadePolicy {
        max_retries: 2,
        backoff: vec![Duration::from_millis(5)],
        attempt_timeout: Duration::from_millis(500),
        premium_timeout: Duration::from_millis(500),
        escalation_budget: Duration::from_secs(10),
    }
}

fn harness(low_cost: Vec<MockProvider>, premium: MockProvider, options: OrchestratorOptions) -> Harness {
    let durable = MockDurableStore::new();
    let cache = Arc::new(CacheManager::new(
        EphemeralTier::new(),
        durable.clone(),
        options.ttl_ephemeral,
    ));
    let providers: Vec<Arc<dyn ProviderClient>> = low_cost
        .iter()
        .map(|p| Arc::new(p.clone()) as Arc<dyn ProviderClient>)
        .collect();
    let orchestrator = AnalysisOrchestrator::new(
        cache,
        CascadeExecutor::new(policy(), QualityValidator::default()),
        providers,
        Arc::new(premium.clone()),
        options,
        Arc::new(EngineMetrics::new()),
    );
    Harness {
        orchestrator,
        durable,
        low_cost,
        premium,
    }
}

fn example_harness() -> Harness {
    harness(
        vec![
            MockProvider::returning("provider1", truncated_analysis_json(7)),
            MockProvider::returning("provider2", good_match_json()),
        ],
        MockProvider::returning("premium", good_match_json()),
        OrchestratorOptions::default(),
    )
}

#[tokio::test]
async fn test_example_scenario_generates_then_serves_from_cache() {
    let h = example_harness();
    let request = sample_request("S1", "T1");

    let first = h.orchestrator.analyze(&request).await.unwrap();
    assert_eq!(first.result.recommendation.label(), "Good Match");
    assert_eq!(first.result.overall_score, 72);
    assert_eq!(
        first.provenance,
        Provenance {
            cached: false,
            cache_source: CacheSource::Generated,
            model_used: "provider2".to_string(),
        }
    );

    let metrics = h.orchestrator.metrics();
    assert_eq!(metrics.provider_attempts, 2);
    assert_eq!(metrics.validation_failures, 1);

    let second = h.orchestrator.analyze(&request).await.unwrap();
    assert_eq!(second.result, first.result);
    assert!(second.provenance.cached);
    assert_eq!(second.provenance.cache_source, CacheSource::Ephemeral);
    assert_eq!(second.provenance.model_used, "provider2");

    assert_eq!(h.low_cost[0].calls(), 1);
    assert_eq!(h.low_cost[1].calls(), 1);
    assert_eq!(h.premium.calls(), 0);
    assert_eq!(h.orchestrator.metrics().ephemeral_hits, 1);
}

#[tokio::test]
async fn test_durable_hit_after_ephemeral_loss() {
    let h = example_harness();
    let request = sample_request("S1", "T1");
    h.orchestrator.analyze(&request).await.unwrap();

    h.orchestrator.cache().ephemeral().clear();

    let outcome = h.orchestrator.analyze(&request).await.unwrap();
    assert_eq!(outcome.provenance.cache_source, CacheSource::Durable);
    assert!(outcome.provenance.cached);
    assert_eq!(h.low_cost[1].calls(), 1);

    let again = h.orchestrator.analyze(&request).await.unwrap();
    assert_eq!(again.provenance.cache_source, CacheSource::Ephemeral);
}

#[tokio::test]
async fn test_changed_snapshot_invalidates_and_recomputes() {
    let h = example_harness();
    h.orchestrator.analyze(&sample_request("S1", "T1")).await.unwrap();

    let edited = AnalysisRequest::new("S1", "T1", "{\"name\":\"Ada\",\"years\":10}", "{}");
    let outcome = h.orchestrator.analyze(&edited).await.unwrap();

    assert!(!outcome.provenance.cached);
    assert_eq!(h.low_cost[1].calls(), 2);
    assert_eq!(h.orchestrator.metrics().stale_invalidations, 1);
}

#[tokio::test]
async fn test_cascade_disabled_uses_premium_directly() {
    let h = harness(
        vec![MockProvider::returning("provider1", good_match_json())],
        MockProvider::returning("premium", uniform_analysis_json(8)),
        OrchestratorOptions {
            cascade_enabled: false,
            ..OrchestratorOptions::default()
        },
    );

    let outcome = h.orchestrator.analyze(&sample_request("S1", "T1")).await.unwrap();

    assert_eq!(outcome.provenance.model_used, "premium");
    assert_eq!(h.low_cost[0].calls(), 0);
    assert_eq!(h.premium.calls(), 1);
}

#[tokio::test]
async fn test_total_failure_is_surfaced_and_not_cached() {
    let h = harness(
        vec![MockProvider::failing("provider1", MockProvider::unavailable)],
        MockProvider::failing("premium", MockProvider::rate_limited),
        OrchestratorOptions::default(),
    );
    let request = sample_request("S1", "T1");

    let err = h.orchestrator.analyze(&request).await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Cascade(CascadeError::PremiumFailed { .. })
    ));
    assert!(h.durable.is_empty());
    assert_eq!(h.orchestrator.metrics().failed_analyses, 1);

    h.orchestrator.analyze(&request).await.unwrap_err();
    assert_eq!(h.premium.calls(), 2);
}

#[tokio::test]
async fn test_empty_ids_are_rejected_before_any_work() {
    let h = example_harness();

    let err = h
        .orchestrator
        .analyze(&sample_request("", "T1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidRequest(_)));

    let err = h
        .orchestrator
        .analyze(&sample_request("S1", "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidRequest(_)));

    assert_eq!(h.low_cost[0].calls(), 0);
    assert_eq!(h.durable.get_count(), 0);
}

#[tokio::test]
async fn test_durable_outage_still_returns_fresh_result() {
    let h = example_harness();
    h.durable.set_unavailable(true);
    let request = sample_request("S1", "T1");

    let first = h.orchestrator.analyze(&request).await.unwrap();
    assert_eq!(first.provenance.cache_source, CacheSource::Generated);

    let second = h.orchestrator.analyze(&request).await.unwrap();
    assert_eq!(second.provenance.cache_source, CacheSource::Ephemeral);
    assert!(h.orchestrator.metrics().durable_errors >= 2);
    assert!(!h.orchestrator.is_ready().await);
}

#[tokio::test]
async fn test_invalidate_forces_recompute() {
    let h = example_harness();
    let request = sample_request("S1", "T1");
    h.orchestrator.analyze(&request).await.unwrap();

    h.orchestrator.invalidate("S1", "T1").await;

    let outcome = h.orchestrator.analyze(&request).await.unwrap();
    assert!(!outcome.provenance.cached);
    assert_eq!(h.low_cost[1].calls(), 2);
}

#[tokio::test]
async fn test_concurrent_distinct_pairs_are_independent() {
    let h = Arc::new(example_harness());

    let handles = (0..16).map(|i| {
        let h = Arc::clone(&h);
        tokio::spawn(async move {
            let request = sample_request("S1", &format!("T{i}"));
            h.orchestrator.analyze(&request).await
        })
    });

    for joined in futures::future::join_all(handles).await {
        let outcome = joined.unwrap().unwrap();
        assert_eq!(outcome.provenance.model_used, "provider2");
    }

    assert_eq!(h.durable.len(), 16);
    assert_eq!(h.orchestrator.metrics().analyses, 16);
}

#[tokio::test]
async fn test_concurrent_same_key_races_are_benign() {
    let h = Arc::new(example_harness());
    let request = sample_request("S1", "T1");

    let (a, b) = tokio::join!(
        h.orchestrator.analyze(&request),
        h.orchestrator.analyze(&request)
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.result, b.result);
    assert_eq!(h.durable.len(), 1);

    let third = h.orchestrator.analyze(&request).await.unwrap();
    assert!(third.provenance.cached);
    assert_eq!(third.result, a.result);
}

#[test]
fn test_outcome_serializes_flat_with_provenance() {
    let outcome = AnalysisOutcome {
        result: crate::validation::QualityValidator::default()
            .accept(crate::analysis::parse_candidate(&good_match_json()).unwrap())
            .unwrap(),
        provenance: Provenance {
            cached: true,
            cache_source: CacheSource::Durable,
            model_used: "provider2".to_string(),
        },
    };

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["overallScore"], 72);
    assert_eq!(json["recommendation"], "Good Match");
    assert_eq!(json["cached"], true);
    assert_eq!(json["cacheSource"], "durable");
    assert_eq!(json["modelUsed"], "provider2");
    assert_eq!(json["dimensions"]["skill_match"]["score"], 8);
}
