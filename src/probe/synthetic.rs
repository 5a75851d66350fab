//! Synthetic clock-parity probe.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use super::{Probe, ProbeError, ProbeResult};

/// Alternates between healthy and unhealthy on each wall-clock second.
///
/// Exists to exercise the aggregation pipeline and the status-to-HTTP
/// mapping without any real dependency.
pub struct EvenSecondProbe;

#[async_trait]
impl Probe for EvenSecondProbe {
    async fn execute(&self, _budget: Duration) -> Result<ProbeResult, ProbeError> {
        let second = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Ok(result_for_second(second))
    }
}

fn result_for_second(second: u64) -> ProbeResult {
    if second % 2 == 0 {
        ProbeResult::healthy().with_description("current second is even")
    } else {
        ProbeResult::unhealthy("current second is odd")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Status;

    #[test]
    fn test_even_second_is_healthy() {
        let result = result_for_second(1754550000);
        assert_eq!(result.status, Status::Healthy);
        assert_eq!(result.description.as_deref(), Some("current second is even"));
    }

    #[test]
    fn test_odd_second_is_unhealthy() {
        let result = result_for_second(1754550001);
        assert_eq!(result.status, Status::Unhealthy);
        assert_eq!(result.description.as_deref(), Some("current second is odd"));
    }

    #[tokio::test]
    async fn test_execute_matches_parity_mapping() {
        let result = EvenSecondProbe
            .execute(Duration::from_secs(1))
            .await
            .unwrap();
        assert!(matches!(result.status, Status::Healthy | Status::Unhealthy));
        assert!(result.description.is_some());
    }
}
