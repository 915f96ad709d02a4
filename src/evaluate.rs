use crate::error::{Result, ScoreError};
use crate::extract::{self, Backend};
use crate::fetch::{Retrieve, SignalCache};
use crate::score;
use crate::types::config::Settings;
use crate::types::report::Evaluation;
use crate::types::signals::{ClientSignals, Fidelity};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Upper bound on simultaneous page retrievals.
pub const FETCH_CONCURRENCY: usize = 8;

/// Scores an already-extracted record. Low-fidelity records pay the
/// configured penalty after the weighted total is computed.
pub fn evaluate_signals(
    source: &str,
    signals: ClientSignals,
    fidelity: Fidelity,
    settings: &Settings,
) -> Evaluation {
    let breakdown = score::breakdown(&signals, &settings.weights);
    let base_score = breakdown.total();
    let degraded = fidelity.is_degraded();
    let penalty = if degraded {
        settings.scoring.degraded_penalty
    } else {
        0
    };
    let final_score = score::apply_penalty(base_score, penalty);
    let tier = score::classify(final_score, &settings.thresholds);
    debug!(source, base_score, penalty, final_score, %tier, "evaluated source");

    Evaluation {
        source: source.to_string(),
        signals,
        breakdown,
        base_score,
        penalty,
        score: final_score,
        tier,
        degraded,
        note: degraded.then(|| "scored from partial card data".to_string()),
        scored_at: chrono::Utc::now(),
    }
}

pub fn evaluate_html(
    source: &str,
    markup: &str,
    backend: Backend,
    mode: Fidelity,
    settings: &Settings,
) -> Evaluation {
    let signals = extract::extract_html(markup, backend, mode);
    evaluate_signals(source, signals, mode, settings)
}

/// Fetches `source` through `cache` and scores the full page. When retrieval
/// fails the fallback record (or an empty one) is scored as degraded data.
pub async fn evaluate_remote<R: Retrieve>(
    source: &str,
    cache: &SignalCache,
    retriever: &R,
    backend: Backend,
    settings: &Settings,
    fallback: Option<&ClientSignals>,
) -> Evaluation {
    let fetched = cache
        .get_or_fetch(source, |key| async move {
            let markup = retriever.fetch(&key).await?;
            Ok::<_, ScoreError>(extract::extract_html(&markup, backend, Fidelity::Page))
        })
        .await;

    match fetched {
        Ok(signals) => evaluate_signals(source, signals, Fidelity::Page, settings),
        Err(err) => {
            warn!(source, error = %err, "falling back to degraded signals");
            let signals = fallback.cloned().unwrap_or_default();
            let mut evaluation = evaluate_signals(source, signals, Fidelity::Card, settings);
            evaluation.note = Some(format!("signals unavailable: {err}"));
            evaluation
        }
    }
}

/// Scores every source concurrently through one shared cache. Results come
/// back in input order; alias URLs for one posting are retrieved once.
pub async fn evaluate_remote_all<R: Retrieve + 'static>(
    sources: Vec<String>,
    cache: Arc<SignalCache>,
    retriever: Arc<R>,
    backend: Backend,
    settings: Arc<Settings>,
    fallback: Option<Arc<ClientSignals>>,
) -> Result<Vec<Evaluation>> {
    let semaphore = Arc::new(Semaphore::new(FETCH_CONCURRENCY));
    let total = sources.len();
    let mut tasks = JoinSet::new();

    for (index, source) in sources.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| ScoreError::Task(e.to_string()))?;
        let cache = Arc::clone(&cache);
        let retriever = Arc::clone(&retriever);
        let settings = Arc::clone(&settings);
        let fallback = fallback.clone();

        tasks.spawn(async move {
            let evaluation = evaluate_remote(
                &source,
                &cache,
                retriever.as_ref(),
                backend,
                &settings,
                fallback.as_deref(),
            )
            .await;
            drop(permit);
            (index, evaluation)
        });
    }

    let mut scored = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        scored.push(joined.map_err(|e| ScoreError::Task(e.to_string()))?);
    }
    scored.sort_by_key(|(index, _)| *index);

    let degraded = scored.iter().filter(|(_, e)| e.degraded).count();
    info!(total, degraded, cached = cache.len(), "scored remote sources");
    Ok(scored.into_iter().map(|(_, evaluation)| evaluation).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::scoring::Tier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE: &str = r#"<div>
  <p>Payment method verified</p>
  <p><strong>12</strong> jobs posted</p>
  <p>80% hire rate</p>
  <p><strong>$15K</strong> total spent</p>
  <div class="ca-item"><div class="title">Last viewed by client</div><div class="value">yesterday</div></div>
</div>"#;

    struct StubRetriever {
        body: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StubRetriever {
        fn serving(body: &'static str) -> Self {
            Self {
                body: Some(body),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Retrieve for StubRetriever {
        async fn fetch(&self, source_id: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body
                .map(str::to_string)
                .ok_or_else(|| ScoreError::Retrieval {
                    source_id: source_id.to_string(),
                    reason: "timed out".to_string(),
                })
        }
    }

    #[test]
    fn full_page_scores_ninety_one_good() {
        let settings = Settings::default();
        for backend in [Backend::Text, Backend::Tree] {
            let evaluation = evaluate_html("job.html", PAGE, backend, Fidelity::Page, &settings);
            assert_eq!(evaluation.base_score, 91, "backend {backend:?}");
            assert_eq!(evaluation.score, 91);
            assert_eq!(evaluation.penalty, 0);
            assert_eq!(evaluation.tier, Tier::Good);
            assert!(!evaluation.degraded);
            assert!(evaluation.note.is_none());
        }
    }

    #[test]
    fn card_fidelity_applies_penalty() {
        let settings = Settings::default();
        let signals = ClientSignals {
            hiring_rate: Some(100),
            payment_verified: Some(true),
            total_spending: Some(10_000.0),
            ..ClientSignals::default()
        };
        let evaluation = evaluate_signals("card", signals, Fidelity::Card, &settings);
        assert_eq!(evaluation.base_score, 70);
        assert_eq!(evaluation.penalty, 20);
        assert_eq!(evaluation.score, 50);
        assert_eq!(evaluation.tier, Tier::Average);
        assert!(evaluation.degraded);
    }

    #[test]
    fn penalty_never_goes_negative() {
        let settings = Settings::default();
        let signals = ClientSignals {
            hiring_rate: Some(25),
            ..ClientSignals::default()
        };
        let evaluation = evaluate_signals("card", signals, Fidelity::Card, &settings);
        assert_eq!(evaluation.base_score, 10);
        assert_eq!(evaluation.score, 0);
        assert_eq!(evaluation.tier, Tier::Poor);
    }

    #[test]
    fn scored_at_is_rfc3339() {
        let evaluation = evaluate_signals(
            "x",
            ClientSignals::default(),
            Fidelity::Page,
            &Settings::default(),
        );
        let json = serde_json::to_value(&evaluation).expect("evaluation should serialize");
        let stamp = json["scored_at"].as_str().expect("scored_at should be a string");
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[tokio::test]
    async fn remote_source_is_fetched_once_through_cache() {
        let settings = Settings::default();
        let cache = SignalCache::new();
        let retriever = StubRetriever::serving(PAGE);

        let first = evaluate_remote(
            "https://www.upwork.com/nx/jobs/~01",
            &cache,
            &retriever,
            Backend::Tree,
            &settings,
            None,
        )
        .await;
        let second = evaluate_remote(
            "https://www.upwork.com/jobs/~01",
            &cache,
            &retriever,
            Backend::Tree,
            &settings,
            None,
        )
        .await;

        assert_eq!(first.score, 91);
        assert_eq!(second.score, 91);
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_retrieval_scores_fallback_as_degraded() {
        let settings = Settings::default();
        let cache = SignalCache::new();
        let retriever = StubRetriever::failing();
        let card = ClientSignals {
            hiring_rate: Some(100),
            payment_verified: Some(true),
            total_spending: Some(10_000.0),
            ..ClientSignals::default()
        };

        let evaluation =
            evaluate_remote("job-9", &cache, &retriever, Backend::Text, &settings, Some(&card))
                .await;

        assert!(evaluation.degraded);
        assert_eq!(evaluation.score, 50);
        assert!(evaluation
            .note
            .as_deref()
            .is_some_and(|note| note.starts_with("signals unavailable")));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn failed_retrieval_without_fallback_scores_zero() {
        let settings = Settings::default();
        let cache = SignalCache::new();
        let evaluation = evaluate_remote(
            "job-10",
            &cache,
            &StubRetriever::failing(),
            Backend::Text,
            &settings,
            None,
        )
        .await;
        assert_eq!(evaluation.base_score, 0);
        assert_eq!(evaluation.score, 0);
        assert_eq!(evaluation.tier, Tier::Poor);
    }

    #[tokio::test]
    async fn batch_keeps_input_order_and_dedups_aliases() {
        let retriever = Arc::new(StubRetriever::serving(PAGE));
        let sources = vec![
            "https://www.upwork.com/jobs/~02".to_string(),
            "https://www.upwork.com/nx/jobs/~02".to_string(),
            " https://www.upwork.com/jobs/~02 ".to_string(),
        ];

        let evaluations = evaluate_remote_all(
            sources.clone(),
            Arc::new(SignalCache::new()),
            Arc::clone(&retriever),
            Backend::Text,
            Arc::new(Settings::default()),
            None,
        )
        .await
        .expect("batch should complete");

        let scored_sources: Vec<_> = evaluations.iter().map(|e| e.source.clone()).collect();
        assert_eq!(scored_sources, sources);
        assert!(evaluations.iter().all(|e| e.score == 91));
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 1);
    }
}
