use super::engine::round_money;
use super::types::{SimulationInput, TaxDisclosure, TaxProfile, TaxRegime};

const MICRO_BARE_RENTAL_ALLOWANCE: f64 = 0.30;
const MICRO_FURNISHED_ALLOWANCE: f64 = 0.50;
/// Share of the price attributed to the building; the rest is land and is not depreciated.
const BUILDING_SHARE: f64 = 0.85;
const BUILDING_DEPRECIATION_YEARS: f64 = 30.0;
const FURNISHINGS_DEPRECIATION_YEARS: f64 = 5.0;
const ITEMIZED_NOTE: &str =
    "first-year approximation: flat interest and insurance on original principal";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TaxOutcome {
    pub taxable_base: f64,
    pub annual_tax: f64,
    pub disclosure: TaxDisclosure,
}

pub(crate) fn compute_tax(input: &SimulationInput, net_annual_rent: f64) -> TaxOutcome {
    match input.tax.regime {
        TaxRegime::MicroBareRental => micro_bare_rental(net_annual_rent, &input.tax),
        TaxRegime::MicroFurnished => micro_furnished(net_annual_rent, &input.tax),
        TaxRegime::RealFurnishedLite => real_furnished_lite(input, net_annual_rent),
    }
}

fn micro_bare_rental(net_annual_rent: f64, profile: &TaxProfile) -> TaxOutcome {
    flat_allowance(
        TaxRegime::MicroBareRental,
        MICRO_BARE_RENTAL_ALLOWANCE,
        net_annual_rent,
        profile,
    )
}

fn micro_furnished(net_annual_rent: f64, profile: &TaxProfile) -> TaxOutcome {
    flat_allowance(
        TaxRegime::MicroFurnished,
        MICRO_FURNISHED_ALLOWANCE,
        net_annual_rent,
        profile,
    )
}

fn flat_allowance(
    regime: TaxRegime,
    allowance_rate: f64,
    net_annual_rent: f64,
    profile: &TaxProfile,
) -> TaxOutcome {
    let taxable_base = (net_annual_rent * (1.0 - allowance_rate)).max(0.0);
    TaxOutcome {
        taxable_base,
        annual_tax: taxable_base * profile.combined_rate(),
        disclosure: TaxDisclosure::FlatAllowance {
            regime,
            allowance_rate,
            allowance: round_money(net_annual_rent * allowance_rate),
        },
    }
}

fn real_furnished_lite(input: &SimulationInput, net_annual_rent: f64) -> TaxOutcome {
    let charges = &input.charges;
    let loan = &input.loan;

    let deductible_charges = charges.monthly * 12.0
        + charges.tax_fonciere_annual
        + charges.management_rate * net_annual_rent;
    let interest_year1 = loan.principal * loan.annual_rate;
    let insurance_annual = loan.principal * loan.insurance_rate;
    let depreciation_building =
        input.property.price * BUILDING_SHARE / BUILDING_DEPRECIATION_YEARS;
    let depreciation_furnishings = if input.property.furnishing > 0.0 {
        input.property.furnishing / FURNISHINGS_DEPRECIATION_YEARS
    } else {
        0.0
    };

    let taxable_base = (net_annual_rent
        - deductible_charges
        - interest_year1
        - insurance_annual
        - depreciation_building
        - depreciation_furnishings)
        .max(0.0);

    TaxOutcome {
        taxable_base,
        annual_tax: taxable_base * input.tax.combined_rate(),
        disclosure: TaxDisclosure::ItemizedApproximation {
            regime: TaxRegime::RealFurnishedLite,
            deductible_charges: round_money(deductible_charges),
            interest_year1: round_money(interest_year1),
            insurance_annual: round_money(insurance_annual),
            depreciation_building: round_money(depreciation_building),
            depreciation_furnishings: round_money(depreciation_furnishings),
            note: ITEMIZED_NOTE,
        },
    }
}
