//! Mock driver and session for unit tests.

use super::protocol::{HiveDriver, HiveSession, PollResponse, ResultData, SessionParams};
use crate::error::TransportError;
use async_trait::async_trait;
use mockall::mock;

mock! {
    pub Session {}

    #[async_trait]
    impl HiveSession for Session {
        async fn execute_async(&mut self, sql: &str) -> Result<(), TransportError>;
        async fn poll_status(&mut self) -> Result<PollResponse, TransportError>;
        async fn fetch_logs(&mut self) -> Result<Vec<String>, TransportError>;
        async fn fetch_all(&mut self) -> Result<ResultData, TransportError>;
        async fn close(&mut self) -> Result<(), TransportError>;
    }
}

mock! {
    pub Driver {}

    #[async_trait]
    impl HiveDriver for Driver {
        async fn connect(&self, params: &SessionParams) -> Result<Box<dyn HiveSession>, TransportError>;
    }
}
