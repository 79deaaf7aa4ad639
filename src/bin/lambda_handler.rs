//! AWS Lambda handler for the optimum share calculator
//!
//! Reference data is loaded once at cold start and shared read-only by every
//! invocation. Each request is evaluated on its own: it carries the
//! selection, optional commission/overrider inputs and optional credentials,
//! and gets back either the selection domains or a presentation state.

use optimum_share::calculator::CalculationInput;
use optimum_share::format::{metric_lines, result_lines};
use optimum_share::{Authenticator, CalcError, Dashboard, PresentationState, Settings};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Input for one interaction
#[derive(Debug, Default, Deserialize)]
pub struct CalculatorRequest {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// First selection stage; omit to list categories
    #[serde(default)]
    pub risk_category: Option<String>,

    /// Second selection stage; omit to list ranges for the category
    #[serde(default)]
    pub exposure_range: Option<String>,

    /// Commission in percent (0-100)
    #[serde(default)]
    pub commission_pct: Option<f64>,

    /// Overrider in percent (0-100)
    #[serde(default)]
    pub overrider_pct: Option<f64>,
}

/// Output of one interaction
#[derive(Debug, Default, Serialize)]
pub struct CalculatorResponse {
    pub authorized: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_categories: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_ranges: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation: Option<PresentationState>,

    /// Pre-formatted label/value pairs for simple renderers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub display: Vec<(String, String)>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CalculatorResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            authorized: true,
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

fn display_lines(state: &PresentationState) -> Vec<(String, String)> {
    let mut lines = metric_lines(state.metrics());
    match state {
        PresentationState::NotRecommended { .. } => {
            lines.push(("Warning".to_string(), "This risk code is not recommended!".to_string()));
        }
        PresentationState::Calculated { result, .. } => lines.extend(result_lines(result)),
        PresentationState::RecommendedAwaitingInput { .. } => {}
    }
    lines
}

/// Evaluate one request against the shared reference data
fn respond(
    dashboard: &Dashboard,
    authenticator: &dyn Authenticator,
    request: CalculatorRequest,
) -> CalculatorResponse {
    let username = request.username.as_deref().unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();
    if !authenticator.authorize(username, password) {
        return CalculatorResponse {
            authorized: false,
            error: Some("invalid username or password".to_string()),
            ..Default::default()
        };
    }

    let risk_category = match request.risk_category {
        Some(c) => c,
        None if request.exposure_range.is_some() => {
            return CalculatorResponse::failure("risk_category is required when exposure_range is given");
        }
        None => {
            return CalculatorResponse {
                authorized: true,
                risk_categories: Some(
                    dashboard.risk_categories().into_iter().map(String::from).collect(),
                ),
                ..Default::default()
            };
        }
    };

    let exposure_range = match request.exposure_range {
        Some(r) => r,
        None => {
            let ranges = dashboard.exposure_ranges(&risk_category);
            if ranges.is_empty() {
                return CalculatorResponse::failure(format!("unknown risk category {}", risk_category));
            }
            return CalculatorResponse {
                authorized: true,
                exposure_ranges: Some(ranges.into_iter().map(String::from).collect()),
                ..Default::default()
            };
        }
    };

    let state = match dashboard.select(&risk_category, &exposure_range) {
        Ok(state) => state,
        Err(e) => return CalculatorResponse::failure(e.to_string()),
    };

    let recommended = state.metrics().is_recommended();
    let state = match (recommended, request.commission_pct, request.overrider_pct) {
        (false, _, _) => state,
        (true, Some(commission), Some(overrider)) => {
            let input = match CalculationInput::validated(commission, overrider) {
                Ok(input) => input,
                Err(e) => return CalculatorResponse::failure(e.to_string()),
            };
            match state.calculate(input, dashboard.loadings()) {
                Ok(calculated) => calculated,
                Err(e @ CalcError::MissingLossRatio { .. }) => {
                    warn!("{}", e);
                    return CalculatorResponse {
                        authorized: true,
                        display: display_lines(&state),
                        presentation: Some(state),
                        error: Some(e.to_string()),
                        ..Default::default()
                    };
                }
                Err(e) => return CalculatorResponse::failure(e.to_string()),
            }
        }
        (true, None, None) => state,
        _ => return CalculatorResponse::failure("both commission_pct and overrider_pct are required"),
    };

    CalculatorResponse {
        authorized: true,
        display: display_lines(&state),
        presentation: Some(state),
        ..Default::default()
    }
}

/// Lambda handler function
async fn handler(
    dashboard: &Dashboard,
    authenticator: &dyn Authenticator,
    event: LambdaEvent<CalculatorRequest>,
) -> Result<CalculatorResponse, Error> {
    let (request, context) = event.into_parts();
    let response = respond(dashboard, authenticator, request);
    info!(
        "request {} -> {}",
        context.request_id,
        response
            .presentation
            .as_ref()
            .map(|s| s.name())
            .or(response.error.as_deref())
            .unwrap_or("selection domains")
    );
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let settings = Settings::from_env();
    let dashboard = Dashboard::from_settings(&settings)?;
    let authenticator = settings.authenticator()?;

    let dashboard = &dashboard;
    let authenticator = authenticator.as_ref();
    run(service_fn(move |event: LambdaEvent<CalculatorRequest>| async move {
        handler(dashboard, authenticator, event).await
    }))
    .await
}
