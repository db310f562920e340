use axum::{
    Router,
    extract::Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    Charges, DEFAULT_MARGINAL_TAX_RATE, DEFAULT_NOTARY_RATE, DEFAULT_SOCIAL_CONTRIBUTION_RATE,
    DEFAULT_VACANCY_RATE, Loan, Property, Rent, SimulationError, SimulationInput, TaxProfile,
    TaxRegime, simulate,
};

const MIN_LOAN_YEARS: u32 = 1;
const MAX_LOAN_YEARS: u32 = 35;
const MAX_MARGINAL_TAX_RATE: f64 = 0.6;
const MAX_SOCIAL_CONTRIBUTION_RATE: f64 = 0.3;

/// Request body as sent by callers: everything optional, defaults applied in [`resolve_payload`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulatePayload {
    property: Option<PropertyPayload>,
    rent: Option<RentPayload>,
    charges: Option<ChargesPayload>,
    loan: Option<LoanPayload>,
    tax: Option<TaxPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PropertyPayload {
    price: Option<f64>,
    notary_rate: Option<f64>,
    works: Option<f64>,
    furnishing: Option<f64>,
    agency_fees: Option<f64>,
    is_new: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RentPayload {
    monthly: Option<f64>,
    vacancy_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChargesPayload {
    monthly: Option<f64>,
    tax_fonciere_annual: Option<f64>,
    management_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoanPayload {
    principal: Option<f64>,
    annual_rate: Option<f64>,
    years: Option<u32>,
    insurance_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TaxPayload {
    regime: Option<String>,
    tmi: Option<f64>,
    ps_rate: Option<f64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Applies defaults and field-level checks, producing the input the engine expects.
pub fn resolve_payload(payload: SimulatePayload) -> Result<SimulationInput, SimulationError> {
    let property = payload
        .property
        .ok_or_else(|| invalid("property is required"))?;
    let rent = payload.rent.ok_or_else(|| invalid("rent is required"))?;
    let loan = payload.loan.ok_or_else(|| invalid("loan is required"))?;
    let charges = payload.charges.unwrap_or_default();
    let tax = payload.tax.unwrap_or_default();

    let property = Property {
        price: non_negative(required(property.price, "property.price")?, "property.price")?,
        notary_rate: non_negative(
            property.notary_rate.unwrap_or(DEFAULT_NOTARY_RATE),
            "property.notaryRate",
        )?,
        works: non_negative(property.works.unwrap_or(0.0), "property.works")?,
        furnishing: non_negative(property.furnishing.unwrap_or(0.0), "property.furnishing")?,
        agency_fees: non_negative(property.agency_fees.unwrap_or(0.0), "property.agencyFees")?,
        is_new: property.is_new.unwrap_or(false),
    };

    let rent = Rent {
        monthly: non_negative(required(rent.monthly, "rent.monthly")?, "rent.monthly")?,
        vacancy_rate: within(
            rent.vacancy_rate.unwrap_or(DEFAULT_VACANCY_RATE),
            "rent.vacancyRate",
            0.0,
            1.0,
        )?,
    };

    let charges = Charges {
        monthly: non_negative(charges.monthly.unwrap_or(0.0), "charges.monthly")?,
        tax_fonciere_annual: non_negative(
            charges.tax_fonciere_annual.unwrap_or(0.0),
            "charges.taxFonciereAnnual",
        )?,
        management_rate: within(
            charges.management_rate.unwrap_or(0.0),
            "charges.managementRate",
            0.0,
            1.0,
        )?,
    };

    let years = loan.years.ok_or_else(|| invalid("loan.years is required"))?;
    if !(MIN_LOAN_YEARS..=MAX_LOAN_YEARS).contains(&years) {
        return Err(invalid(format!(
            "loan.years must be between {MIN_LOAN_YEARS} and {MAX_LOAN_YEARS}"
        )));
    }
    let loan = Loan {
        principal: non_negative(required(loan.principal, "loan.principal")?, "loan.principal")?,
        annual_rate: within(
            required(loan.annual_rate, "loan.annualRate")?,
            "loan.annualRate",
            0.0,
            1.0,
        )?,
        years,
        insurance_rate: non_negative(loan.insurance_rate.unwrap_or(0.0), "loan.insuranceRate")?,
    };

    let regime = match tax.regime.as_deref() {
        Some(tag) => tag.parse::<TaxRegime>()?,
        None => TaxRegime::default(),
    };
    let tax = TaxProfile {
        regime,
        tmi: within(
            tax.tmi.unwrap_or(DEFAULT_MARGINAL_TAX_RATE),
            "tax.tmi",
            0.0,
            MAX_MARGINAL_TAX_RATE,
        )?,
        ps_rate: within(
            tax.ps_rate.unwrap_or(DEFAULT_SOCIAL_CONTRIBUTION_RATE),
            "tax.psRate",
            0.0,
            MAX_SOCIAL_CONTRIBUTION_RATE,
        )?,
    };

    Ok(SimulationInput {
        property,
        rent,
        charges,
        loan,
        tax,
    })
}

fn invalid(msg: impl Into<String>) -> SimulationError {
    SimulationError::InvalidInput(msg.into())
}

fn required(value: Option<f64>, field: &str) -> Result<f64, SimulationError> {
    value.ok_or_else(|| invalid(format!("{field} is required")))
}

fn non_negative(value: f64, field: &str) -> Result<f64, SimulationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!("{field} must be >= 0")));
    }
    Ok(value)
}

fn within(value: f64, field: &str, min: f64, max: f64) -> Result<f64, SimulationError> {
    if !value.is_finite() || !(min..=max).contains(&value) {
        return Err(invalid(format!("{field} must be between {min} and {max}")));
    }
    Ok(value)
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/simulate", post(simulate_handler))
        .route("/api/simulate", post(simulate_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "rental simulator HTTP API listening");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { ok: true })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_handler(Json(payload): Json<SimulatePayload>) -> Response {
    let input = match resolve_payload(payload) {
        Ok(input) => input,
        Err(err) => {
            warn!(error = %err, "rejected simulation payload");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    let result = simulate(&input);
    debug!(
        regime = %input.tax.regime,
        annual_cash_flow = result.results.annual_cash_flow,
        net_after_tax_annual = result.results.net_after_tax_annual,
        "simulation complete"
    );
    json_response(StatusCode::OK, result)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
