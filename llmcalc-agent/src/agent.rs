//! Calculator implementation - orchestrates credential -> model -> view

use llmcalc_core::{
    normalize, CalculatorConfig, CredentialFetcher, Error, EvaluationClient, EvaluationResult,
    HttpTransport, Phase, ReqwestTransport, Result, View,
};

/// A trimmed, non-empty operation submitted by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub expression: String,
}

impl OperationRequest {
    /// Trim `input`; `None` when nothing is left
    pub fn parse(input: &str) -> Option<Self> {
        let expression = input.trim();
        if expression.is_empty() {
            None
        } else {
            Some(Self {
                expression: expression.to_string(),
            })
        }
    }
}

/// The orchestrator - one pipeline run per `run` call
pub struct Calculator<T> {
    transport: T,
    config: CalculatorConfig,
}

impl Calculator<ReqwestTransport> {
    /// Calculator talking to the configured endpoints over HTTP
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        Self::with_transport(ReqwestTransport::new()?, config)
    }
}

impl<T: HttpTransport> Calculator<T> {
    /// Calculator over any transport (a `ScriptedTransport` in tests)
    pub fn with_transport(transport: T, config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    /// Evaluate `input` and reflect every step on `view`.
    ///
    /// Empty input shows the validation prompt and makes no request. Any
    /// failure after that is shown with `show_error` and returned, so the
    /// caller only decides what to do with the outcome (exit code, etc.).
    pub async fn run<V: View>(&self, input: &str, view: &mut V) -> Result<EvaluationResult> {
        let Some(request) = OperationRequest::parse(input) else {
            view.show_validation_error();
            return Err(Error::empty_input().with_operation("calculator::run"));
        };

        tracing::info!(expression = %request.expression, model = %self.config.model, "evaluating");

        match self.pipeline(&request, view).await {
            Ok(result) => {
                tracing::info!(resultado = %result.resultado, latex = %result.latex, "evaluated");
                view.show_success(&result);
                Ok(result)
            }
            Err(err) => {
                tracing::error!(error = %err, "evaluation failed");
                view.show_error(err.message());
                Err(err.with_operation("calculator::run"))
            }
        }
    }

    /// The clear trigger
    pub fn clear<V: View>(&self, view: &mut V) {
        view.reset();
    }

    async fn pipeline<V: View>(&self, request: &OperationRequest, view: &mut V) -> Result<EvaluationResult> {
        view.show_loading(Phase::Credential);
        let credential = CredentialFetcher::new(&self.transport, &self.config.credential_url)
            .fetch()
            .await?;

        view.show_loading(Phase::Evaluation);
        let raw = EvaluationClient::new(&self.transport, &self.config)
            .evaluate(&request.expression, &credential)
            .await?;

        normalize(&raw)
    }
}
