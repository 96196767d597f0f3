use aws_sdk_sfn::operation::start_execution::StartExecutionError as SfnStartExecutionError;
use inquiry_core::config::DispatchConfig;
use inquiry_core::contract::{stable_contract_json, ExecutionRequest};
use inquiry_lambda::adapters::workflow::{ExecutionStarted, StartExecutionError, WorkflowStarter};
use inquiry_lambda::handlers::dispatch::{handle_dispatch_event, DispatchResponse};
use lambda_runtime::{service_fn, tracing, Error, LambdaEvent};
use serde_json::Value;

struct StepFunctionsWorkflowStarter {
    sfn_client: aws_sdk_sfn::Client,
}

impl WorkflowStarter for StepFunctionsWorkflowStarter {
    fn start_execution(
        &self,
        state_machine_arn: &str,
        request: &ExecutionRequest,
    ) -> Result<ExecutionStarted, StartExecutionError> {
        let client = self.sfn_client.clone();
        let arn = state_machine_arn.to_string();
        let name = request.name.clone();
        let input = stable_contract_json(&request.input);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                match client
                    .start_execution()
                    .state_machine_arn(arn)
                    .name(name.clone())
                    .input(input)
                    .send()
                    .await
                {
                    Ok(output) => Ok(ExecutionStarted {
                        execution_arn: output.execution_arn().to_string(),
                    }),
                    Err(error) => {
                        if error
                            .as_service_error()
                            .is_some_and(SfnStartExecutionError::is_execution_already_exists)
                        {
                            Err(StartExecutionError::AlreadyExists(name))
                        } else {
                            Err(StartExecutionError::Service(format!(
                                "failed to start execution: {}",
                                aws_sdk_sfn::error::DisplayErrorContext(&error)
                            )))
                        }
                    }
                }
            })
        })
    }
}

struct RuntimeDependencies {
    config: DispatchConfig,
    engine: StepFunctionsWorkflowStarter,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<DispatchResponse, Error> {
    handle_dispatch_event(&event.payload, &deps.config, &deps.engine).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = DispatchConfig::from_env();
    if config.state_machine_arn.is_none() {
        tracing::error!("STATE_MACHINE_ARN is not configured; every record will be skipped");
    }

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        config,
        engine: StepFunctionsWorkflowStarter {
            sfn_client: aws_sdk_sfn::Client::new(&aws_config),
        },
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
