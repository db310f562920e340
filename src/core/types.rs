use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::SimulationError;

pub const DEFAULT_NOTARY_RATE: f64 = 0.075;
pub const NEW_BUILD_NOTARY_RATE: f64 = 0.025;
pub const DEFAULT_VACANCY_RATE: f64 = 0.06;
pub const DEFAULT_MARGINAL_TAX_RATE: f64 = 0.11;
pub const DEFAULT_SOCIAL_CONTRIBUTION_RATE: f64 = 0.172;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub price: f64,
    pub notary_rate: f64,
    pub works: f64,
    pub furnishing: f64,
    pub agency_fees: f64,
    pub is_new: bool,
}

impl Property {
    /// Notary rate actually charged: new builds pay the reduced rate whatever was supplied.
    pub fn effective_notary_rate(&self) -> f64 {
        if self.is_new {
            NEW_BUILD_NOTARY_RATE
        } else {
            self.notary_rate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rent {
    pub monthly: f64,
    /// Fraction of the year the unit sits empty.
    pub vacancy_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charges {
    pub monthly: f64,
    pub tax_fonciere_annual: f64,
    /// Applied to net (post-vacancy) annual rent.
    pub management_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub principal: f64,
    pub annual_rate: f64,
    pub years: u32,
    /// Annual rate charged on the original principal for the whole term.
    pub insurance_rate: f64,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
pub enum TaxRegime {
    /// Unfurnished letting, flat 30% allowance.
    #[serde(rename = "micro-foncier")]
    MicroBareRental,
    /// Furnished letting, flat 50% allowance.
    #[default]
    #[serde(rename = "micro-bic")]
    MicroFurnished,
    /// Furnished letting with itemized deductions, first-year approximation.
    #[serde(rename = "lmnp-reel")]
    RealFurnishedLite,
}

impl TaxRegime {
    pub const ALL: [TaxRegime; 3] = [
        TaxRegime::MicroBareRental,
        TaxRegime::MicroFurnished,
        TaxRegime::RealFurnishedLite,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            TaxRegime::MicroBareRental => "micro-foncier",
            TaxRegime::MicroFurnished => "micro-bic",
            TaxRegime::RealFurnishedLite => "lmnp-reel",
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TaxRegime {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "micro-foncier" | "micro_foncier" | "microFoncier" => Ok(TaxRegime::MicroBareRental),
            "micro-bic" | "micro_bic" | "microBic" => Ok(TaxRegime::MicroFurnished),
            "lmnp-reel" | "lmnp_reel" | "lmnpReel" => Ok(TaxRegime::RealFurnishedLite),
            other => Err(SimulationError::UnknownTaxRegime(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxProfile {
    pub regime: TaxRegime,
    /// Marginal income tax rate.
    pub tmi: f64,
    /// Social contribution rate.
    pub ps_rate: f64,
}

impl TaxProfile {
    pub fn combined_rate(&self) -> f64 {
        self.tmi + self.ps_rate
    }
}

impl Default for TaxProfile {
    fn default() -> Self {
        Self {
            regime: TaxRegime::default(),
            tmi: DEFAULT_MARGINAL_TAX_RATE,
            ps_rate: DEFAULT_SOCIAL_CONTRIBUTION_RATE,
        }
    }
}

/// Fully resolved simulation input. Defaults are already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    pub property: Property,
    pub rent: Rent,
    pub charges: Charges,
    pub loan: Loan,
    pub tax: TaxProfile,
}

/// Figures behind the taxable base, reported for transparency only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "basis",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum TaxDisclosure {
    FlatAllowance {
        regime: TaxRegime,
        allowance_rate: f64,
        allowance: f64,
    },
    ItemizedApproximation {
        regime: TaxRegime,
        deductible_charges: f64,
        interest_year1: f64,
        insurance_annual: f64,
        depreciation_building: f64,
        depreciation_furnishings: f64,
        note: &'static str,
    },
}

/// Result keys keep the names existing clients read (`mensualite`, `brut`, `netNet`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationMetrics {
    pub notary_fee: f64,
    pub total_cost: f64,
    pub gross_annual_rent: f64,
    pub net_annual_rent: f64,
    pub operating_expenses: f64,
    #[serde(rename = "NOI")]
    pub noi: f64,
    #[serde(rename = "mensualite")]
    pub monthly_payment: f64,
    pub annual_debt_service: f64,
    #[serde(rename = "cashflowMensuel")]
    pub monthly_cash_flow: f64,
    #[serde(rename = "cashflowAnnuel")]
    pub annual_cash_flow: f64,
    pub cap_rate: f64,
    #[serde(rename = "brut")]
    pub gross_yield: f64,
    #[serde(rename = "netNet")]
    pub net_yield: f64,
    #[serde(rename = "DSCR")]
    pub dscr: f64,
    pub taxable_base: f64,
    pub annual_tax: f64,
    pub net_after_tax_annual: f64,
    pub net_after_tax_monthly: f64,
    pub tax_details: TaxDisclosure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub inputs: SimulationInput,
    pub results: SimulationMetrics,
}
