use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    events::{DomainEvent, EventEmitter, MetadataWeightsUpdated},
    models::MetadataWeight,
    services::MetadataService,
};

/// Rejects the whole batch on the first weight outside [0, 1]
pub fn validate_weights(weights: &[MetadataWeight]) -> AppResult<()> {
    match weights.iter().find(|w| !w.is_in_range()) {
        Some(invalid) => Err(AppError::InvalidInput(format!(
            "Weight for {} '{}' must be between 0 and 1, got {}",
            invalid.metadata_type, invalid.name, invalid.weight
        ))),
        None => Ok(()),
    }
}

pub struct UpdateMetadataWeightsUseCase {
    metadata: Arc<dyn MetadataService>,
    events: Arc<EventEmitter>,
}

impl UpdateMetadataWeightsUseCase {
    pub fn new(metadata: Arc<dyn MetadataService>, events: Arc<EventEmitter>) -> Self {
        Self { metadata, events }
    }

    pub async fn execute(&self, user_id: &str, weights: &[MetadataWeight]) -> AppResult<()> {
        validate_weights(weights)?;

        self.metadata.update_weights(user_id, weights).await?;

        self.events
            .emit(&DomainEvent::MetadataWeightsUpdated(MetadataWeightsUpdated {
                user_id: user_id.to_string(),
                weights: weights.to_vec(),
            }));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetadataType;
    use crate::services::metadata::MockMetadataService;

    fn weights(values: &[f64]) -> Vec<MetadataWeight> {
        values
            .iter()
            .enumerate()
            .map(|(i, w)| MetadataWeight::new(MetadataType::FilmGenre, format!("genre_{}", i), *w))
            .collect()
    }

    #[tokio::test]
    async fn test_valid_weights_are_persisted() {
        let mut metadata = MockMetadataService::new();
        metadata
            .expect_update_weights()
            .withf(|user_id, weights| user_id == "user_1" && weights.len() == 3)
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = UpdateMetadataWeightsUseCase::new(
            Arc::new(metadata),
            Arc::new(EventEmitter::new()),
        );

        tokio_test::assert_ok!(use_case.execute("user_1", &weights(&[0.0, 0.5, 1.0])).await);
    }

    #[tokio::test]
    async fn test_out_of_range_weight_aborts_batch() {
        for bad in [-0.1, 1.5, f64::INFINITY] {
            let mut metadata = MockMetadataService::new();
            metadata.expect_update_weights().never();

            let use_case = UpdateMetadataWeightsUseCase::new(
                Arc::new(metadata),
                Arc::new(EventEmitter::new()),
            );

            let result = use_case
                .execute("user_1", &weights(&[0.3, bad, 0.7]))
                .await;

            match result {
                Err(AppError::InvalidInput(msg)) => assert!(msg.contains("genre_1")),
                other => panic!("expected InvalidInput for {}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_validate_reports_first_offender() {
        let err = validate_weights(&weights(&[2.0, -1.0])).unwrap_err();
        assert!(err.to_string().contains("genre_0"));
    }

    #[test]
    fn test_empty_batch_is_valid() {
        assert!(validate_weights(&[]).is_ok());
    }
}
