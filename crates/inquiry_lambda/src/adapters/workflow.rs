use inquiry_core::contract::ExecutionRequest;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartExecutionError {
    /// The engine already holds an execution with this name.
    #[error("execution '{0}' already exists")]
    AlreadyExists(String),
    #[error("{0}")]
    Service(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStarted {
    pub execution_arn: String,
}

pub trait WorkflowStarter {
    fn start_execution(
        &self,
        state_machine_arn: &str,
        request: &ExecutionRequest,
    ) -> Result<ExecutionStarted, StartExecutionError>;
}
