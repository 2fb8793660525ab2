use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<P::Output> {
        tracing::debug!("Extracting dishes");
        let records = self.pipeline.extract().await?;
        tracing::info!("📊 Loaded {} dishes from CSV", records.len());

        let groups = self.pipeline.transform(records).await?;
        tracing::info!("🏪 Found {} restaurants", groups.len());

        let output = self.pipeline.load(groups).await?;
        tracing::info!("✅ Load complete");

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DishRecord, GroupOrder, MenuGroups};
    use crate::utils::error::EtlError;
    use async_trait::async_trait;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FixedPipeline {
        records: Vec<DishRecord>,
        loaded: AtomicBool,
        fail_extract: bool,
    }

    #[async_trait]
    impl Pipeline for FixedPipeline {
        type Output = usize;

        async fn extract(&self) -> Result<Vec<DishRecord>> {
            if self.fail_extract {
                return Err(EtlError::ValidationError {
                    message: "bad row".to_string(),
                });
            }
            Ok(self.records.clone())
        }

        async fn transform(&self, records: Vec<DishRecord>) -> Result<MenuGroups> {
            Ok(MenuGroups::group(records, GroupOrder::FirstSeen))
        }

        async fn load(&self, groups: MenuGroups) -> Result<usize> {
            self.loaded.store(true, Ordering::SeqCst);
            Ok(groups.len())
        }
    }

    fn dish(restaurant: &str) -> DishRecord {
        DishRecord {
            restaurant_name: restaurant.to_string(),
            dish_name: "Soup".to_string(),
            category: "starters".to_string(),
            price: "5".to_string(),
        }
    }

    #[test]
    fn test_run_passes_groups_to_load() {
        let engine = EtlEngine::new(FixedPipeline {
            records: vec![dish("A"), dish("B"), dish("A")],
            loaded: AtomicBool::new(false),
            fail_extract: false,
        });

        let restaurants = tokio_test::block_on(engine.run()).unwrap();
        assert_eq!(restaurants, 2);
        assert!(engine.pipeline().loaded.load(Ordering::SeqCst));
    }

    #[test]
    fn test_completion_is_logged_at_info() {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || CapturedWriter(sink.clone()))
            .finish();

        let engine = EtlEngine::new(FixedPipeline {
            records: vec![dish("A")],
            loaded: AtomicBool::new(false),
            fail_extract: false,
        });
        tracing::subscriber::with_default(subscriber, || {
            tokio_test::block_on(engine.run()).unwrap();
        });

        let logs = String::from_utf8(captured.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("Loaded 1 dishes from CSV"));
        assert!(logs.contains("Load complete"));
    }

    #[tokio::test]
    async fn test_extract_failure_skips_load() {
        let engine = EtlEngine::new(FixedPipeline {
            records: vec![],
            loaded: AtomicBool::new(false),
            fail_extract: true,
        });

        let result = engine.run().await;
        assert!(matches!(result, Err(EtlError::ValidationError { .. })));
        assert!(!engine.pipeline().loaded.load(Ordering::SeqCst));
    }
}
