//! Integration tests for the Synthesizer

#[cfg(test)]
mod tests {
    use crate::{PromptTemplate, SynthesisReport, Synthesizer, SynthesizerConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use threadsmith_domain::traits::LlmProvider;
    use threadsmith_domain::{
        combine, cycle_combinations, flatten, Column, Dimension, DimensionCategory, PromptCategory,
        CYCLED_CATEGORY_KEY,
    };
    use threadsmith_llm::MockProvider;

    const INTENTS: [&str; 2] = ["alpha", "beta"];
    const DOMAINS: [&str; 3] = ["gamma", "delta", "epsilon"];

    fn categories() -> Vec<DimensionCategory> {
        let dim = |n: &str| Dimension::new(n, format!("about {}", n), vec![format!("{} example", n)]);
        vec![
            DimensionCategory::new("Intent", INTENTS.into_iter().map(dim).collect()),
            DimensionCategory::new("Domain", DOMAINS.into_iter().map(dim).collect()),
        ]
    }

    /// Compact template so prompts can be matched exactly
    fn template() -> PromptTemplate {
        PromptTemplate::new("{intent_dimension}/{domain_dimension}")
    }

    /// A mock answering each combination with its own question
    fn echo_provider() -> MockProvider {
        let mut llm = MockProvider::new(r#"{"question": "fallback"}"#);
        for intent in INTENTS {
            for domain in DOMAINS {
                llm.add_response(
                    format!("{}/{}", intent, domain),
                    format!(r#"{{"question": "{} in {}?"}}"#, intent, domain),
                );
            }
        }
        llm
    }

    fn synthesizer(llm: MockProvider, config: SynthesizerConfig) -> Synthesizer<MockProvider> {
        Synthesizer::new(llm, template(), config).unwrap()
    }

    /// A slow provider that records how many calls overlap
    #[derive(Clone)]
    struct GaugedProvider {
        delay: Duration,
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl GaugedProvider {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                in_flight: Arc::new(AtomicUsize::new(0)),
                peak: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    impl LlmProvider for GaugedProvider {
        type Error = String;

        fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
            self.generate_structured(prompt, "")
        }

        fn generate_structured(&self, _prompt: &str, _schema: &str) -> Result<String, Self::Error> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(r#"{"question": "slow"}"#.to_string())
        }
    }

    fn gauged_config(max_concurrency: usize, call_timeout_ms: u64) -> SynthesizerConfig {
        SynthesizerConfig {
            max_concurrency,
            call_timeout_ms,
            ..SynthesizerConfig::default()
        }
    }

    fn questions(report: &SynthesisReport) -> Vec<String> {
        report.batch.questions().iter().map(|q| q.question.clone()).collect()
    }

    #[tokio::test]
    async fn test_full_product_in_order() {
        let report = synthesizer(echo_provider(), SynthesizerConfig::default())
            .synthesize_all(combine(&categories()))
            .await;

        assert_eq!(report.attempted, 6);
        assert_eq!(report.generated(), 6);
        assert_eq!(
            questions(&report),
            vec![
                "alpha in gamma?",
                "alpha in delta?",
                "alpha in epsilon?",
                "beta in gamma?",
                "beta in delta?",
                "beta in epsilon?",
            ]
        );

        let first = &report.batch.questions()[0];
        assert_eq!(first.selection("intent").unwrap().dimension.name, "alpha");
        assert_eq!(first.selection("domain").unwrap().dimension.name, "gamma");
    }

    #[tokio::test]
    async fn test_one_failure_yields_n_minus_one() {
        let mut llm = echo_provider();
        llm.add_error("beta/delta");
        let recorder = llm.clone();

        let report = synthesizer(llm, SynthesizerConfig::default())
            .synthesize_all(combine(&categories()))
            .await;

        assert_eq!(report.attempted, 6);
        assert_eq!(report.generated(), 5);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 4);
        assert!(!questions(&report).contains(&"beta in delta?".to_string()));

        // No retries: exactly one call per combination
        assert_eq!(recorder.call_count(), 6);
    }

    #[tokio::test]
    async fn test_malformed_output_is_a_failure() {
        let mut llm = echo_provider();
        llm.add_response("alpha/gamma", "Here's a question: what now?");
        llm.add_response("alpha/delta", r#"{"question": ""}"#);

        let report = synthesizer(llm, SynthesizerConfig::default())
            .synthesize_all(combine(&categories()))
            .await;

        assert_eq!(report.generated(), 4);
        let failed: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential_order() {
        let sequential = synthesizer(echo_provider(), SynthesizerConfig::sequential())
            .synthesize_all(combine(&categories()))
            .await;

        let mut config = SynthesizerConfig::parallel();
        config.max_concurrency = 3;
        let parallel = synthesizer(echo_provider(), config)
            .synthesize_all(combine(&categories()))
            .await;

        assert_eq!(questions(&parallel), questions(&sequential));
        assert_eq!(parallel.batch, sequential.batch);
    }

    #[tokio::test]
    async fn test_parallel_failure_accounting() {
        let mut llm = echo_provider();
        llm.add_error("alpha/epsilon");
        llm.add_error("beta/gamma");

        let report = synthesizer(llm, SynthesizerConfig::parallel())
            .synthesize_all(combine(&categories()))
            .await;

        assert_eq!(report.generated(), 4);
        let failed: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_timeout_becomes_failure() {
        let llm = MockProvider::new(r#"{"question": "late"}"#).with_delay(Duration::from_millis(300));
        let mut config = SynthesizerConfig::default();
        config.call_timeout_ms = 20;

        let combinations = combine(&categories()).into_iter().take(2).collect();
        let report = synthesizer(llm, config).synthesize_all(combinations).await;

        assert_eq!(report.generated(), 0);
        assert_eq!(report.failed(), 2);
        assert!(report.failures[0].reason.contains("timeout"));
    }

    #[tokio::test]
    async fn test_category_cycling() {
        let prompt_categories: Vec<PromptCategory> = ["Bugs", "Setup", "Billing"]
            .iter()
            .map(|name| PromptCategory {
                key: name.to_lowercase(),
                name: name.to_string(),
                instruction: format!("Ask about {}", name),
                examples: vec![],
            })
            .collect();

        let mut llm = MockProvider::default();
        for name in ["Bugs", "Setup", "Billing"] {
            llm.add_response(name, format!(r#"{{"question": "{} question"}}"#, name));
        }

        let synthesizer = Synthesizer::new(
            llm,
            PromptTemplate::new(format!("{{{}_dimension}}", CYCLED_CATEGORY_KEY)),
            SynthesizerConfig::default(),
        )
        .unwrap();

        let report = synthesizer
            .synthesize_all(cycle_combinations(&prompt_categories, 7))
            .await;

        assert_eq!(
            questions(&report),
            vec![
                "Bugs question",
                "Setup question",
                "Billing question",
                "Bugs question",
                "Setup question",
                "Billing question",
                "Bugs question",
            ]
        );

        let table = flatten(&report.batch, &Column::category_schema());
        assert_eq!(table.len(), 7);
        assert_eq!(table.rows[1], vec!["Setup question", "Setup", "Ask about Setup", ""]);
    }

    #[tokio::test]
    async fn test_empty_category_means_no_calls() {
        let llm = echo_provider();
        let recorder = llm.clone();
        let mut cats = categories();
        cats.push(DimensionCategory::new("Persona", vec![]));

        let report = synthesizer(llm, SynthesizerConfig::default())
            .synthesize_all(combine(&cats))
            .await;

        assert_eq!(report.attempted, 0);
        assert_eq!(recorder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parallel_calls_stay_within_bound() {
        let llm = GaugedProvider::new(Duration::from_millis(30));
        let recorder = llm.clone();

        let report = Synthesizer::new(llm, template(), gauged_config(2, 5_000))
            .unwrap()
            .synthesize_all(combine(&categories()))
            .await;

        assert_eq!(report.generated(), 6);
        assert!(recorder.peak() >= 1);
        assert!(recorder.peak() <= 2, "peak in-flight calls: {}", recorder.peak());
    }

    #[tokio::test]
    async fn test_timed_out_calls_keep_their_slot() {
        let llm = GaugedProvider::new(Duration::from_millis(200));
        let recorder = llm.clone();

        let report = Synthesizer::new(llm, template(), gauged_config(2, 20))
            .unwrap()
            .synthesize_all(combine(&categories()))
            .await;

        assert_eq!(report.generated(), 0);
        assert_eq!(report.failed(), 6);
        assert!(report.failures.iter().all(|f| f.reason.contains("timeout")));
        assert!(recorder.peak() <= 2, "peak in-flight calls: {}", recorder.peak());
    }

    #[tokio::test]
    async fn test_sequential_timeouts_never_overlap() {
        let llm = GaugedProvider::new(Duration::from_millis(100));
        let recorder = llm.clone();

        let combinations = combine(&categories()).into_iter().take(3).collect();
        let report = Synthesizer::new(llm, template(), gauged_config(1, 20))
            .unwrap()
            .synthesize_all(combinations)
            .await;

        assert_eq!(report.failed(), 3);
        assert_eq!(recorder.peak(), 1);
    }
}
