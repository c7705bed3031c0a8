#[cfg(test)]
mod integration_tests {
    use std::sync::Arc;

    use crate::backends::stub::StubSigner;
    use crate::config::{load_and_validate_config, RuntimeBuilder};
    use crate::engine::Item;

    /// The shipped Fibonacci config loads with the documented defaults
    #[test]
    fn test_fibonacci_yaml_loading() {
        let config = load_and_validate_config("configs/fibonacci.yaml").unwrap();

        assert_eq!(config.input, vec![0, 1, 1, 2, 3, 5, 8]);
        assert!(config.deduplicate);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.separator, "_");
        assert_eq!(config.handlers, vec!["single_digest", "multi_digest"]);
        assert_eq!(config.signer.overheat_penalty_ms, 1000);
    }

    #[test]
    fn test_slow_signer_yaml_loading() {
        let config = load_and_validate_config("configs/slow-signer.yaml").unwrap();

        assert_eq!(config.input.len(), 10);
        assert_eq!(config.signer.checksum_latency_ms, 100);
        assert_eq!(config.signer.fingerprint_latency_ms, 10);
    }

    #[test]
    fn test_toml_and_json_loading() {
        let toml = load_and_validate_config("configs/single-stage.toml").unwrap();
        assert_eq!(toml.input, vec![13, 21, 34]);
        assert!(!toml.deduplicate);
        assert_eq!(toml.queue_capacity, 2);
        assert_eq!(toml.separator, ",");

        let json = load_and_validate_config("configs/no-dedup.json").unwrap();
        assert!(!json.deduplicate);
        assert_eq!(json.handlers.len(), 2);
    }

    /// Every shipped config builds a pipeline that passes wiring validation
    #[test]
    fn test_shipped_configs_build() {
        for path in [
            "configs/fibonacci.yaml",
            "configs/slow-signer.yaml",
            "configs/single-stage.toml",
            "configs/no-dedup.json",
        ] {
            let config = load_and_validate_config(path).unwrap();
            assert!(
                RuntimeBuilder::from_config(&config).is_ok(),
                "config {} failed to build",
                path
            );
        }
    }

    #[tokio::test]
    async fn test_single_stage_toml_runs_end_to_end() {
        let config = load_and_validate_config("configs/single-stage.toml").unwrap();
        let executor = RuntimeBuilder::with_signer(&config, Arc::new(StubSigner)).unwrap();

        let tail = executor.execute_collect().await.unwrap();
        assert_eq!(
            tail,
            vec![Item::from("c(13)~c(f(13)),c(21)~c(f(21)),c(34)~c(f(34))")]
        );
    }

    /// The YAML and JSON configs differ only in deduplication and must agree
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_dedup_and_no_dedup_configs_agree() {
        let cached = load_and_validate_config("configs/fibonacci.yaml").unwrap();
        let uncached = load_and_validate_config("configs/no-dedup.json").unwrap();

        let cached = RuntimeBuilder::with_signer(&cached, Arc::new(StubSigner))
            .unwrap()
            .execute_collect()
            .await
            .unwrap();
        let uncached = RuntimeBuilder::with_signer(&uncached, Arc::new(StubSigner))
            .unwrap()
            .execute_collect()
            .await
            .unwrap();

        assert_eq!(cached, uncached);
    }
}
