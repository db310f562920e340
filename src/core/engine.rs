use super::tax::compute_tax;
use super::types::{Loan, SimulationInput, SimulationMetrics, SimulationResult};

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy)]
struct Acquisition {
    notary_fee: f64,
    total_cost: f64,
}

#[derive(Debug, Clone, Copy)]
struct Operations {
    gross_annual_rent: f64,
    net_annual_rent: f64,
    operating_expenses: f64,
    noi: f64,
}

#[derive(Debug, Clone, Copy)]
struct Ratios {
    cap_rate: f64,
    gross_yield: f64,
    net_yield: f64,
    dscr: f64,
}

/// Runs the single-pass rental investment computation on an already resolved input.
pub fn simulate(input: &SimulationInput) -> SimulationResult {
    let acquisition = acquisition_cost(input);
    let operations = operating_income(input);

    let monthly_payment = monthly_payment(&input.loan);
    let annual_debt_service = monthly_payment * MONTHS_PER_YEAR;

    let annual_cash_flow =
        operations.net_annual_rent - operations.operating_expenses - annual_debt_service;
    let monthly_cash_flow = annual_cash_flow / MONTHS_PER_YEAR;

    let ratios = ratios(input, &acquisition, &operations, annual_debt_service);
    let tax = compute_tax(input, operations.net_annual_rent);

    let net_after_tax_annual = annual_cash_flow - tax.annual_tax;
    let net_after_tax_monthly = net_after_tax_annual / MONTHS_PER_YEAR;

    SimulationResult {
        inputs: input.clone(),
        results: SimulationMetrics {
            notary_fee: round_money(acquisition.notary_fee),
            total_cost: round_money(acquisition.total_cost),
            gross_annual_rent: round_money(operations.gross_annual_rent),
            net_annual_rent: round_money(operations.net_annual_rent),
            operating_expenses: round_money(operations.operating_expenses),
            noi: round_money(operations.noi),
            monthly_payment: round_money(monthly_payment),
            annual_debt_service: round_money(annual_debt_service),
            monthly_cash_flow: round_money(monthly_cash_flow),
            annual_cash_flow: round_money(annual_cash_flow),
            cap_rate: round_ratio(ratios.cap_rate),
            gross_yield: round_ratio(ratios.gross_yield),
            net_yield: round_ratio(ratios.net_yield),
            dscr: round_to(ratios.dscr, 3),
            taxable_base: round_money(tax.taxable_base),
            annual_tax: round_money(tax.annual_tax),
            net_after_tax_annual: round_money(net_after_tax_annual),
            net_after_tax_monthly: round_money(net_after_tax_monthly),
            tax_details: tax.disclosure,
        },
    }
}

/// Monthly instalment of a fixed-rate loan, insurance included.
///
/// Insurance is charged flat on the original principal for the whole term.
pub fn monthly_payment(loan: &Loan) -> f64 {
    let periods = f64::from(loan.years) * MONTHS_PER_YEAR;
    let monthly_rate = loan.annual_rate / MONTHS_PER_YEAR;
    let base = if periods <= 0.0 {
        0.0
    } else if monthly_rate == 0.0 {
        loan.principal / periods
    } else {
        // 1 - (1 + r)^-n, kept accurate when r is too small for 1 + r to differ from 1.
        let discount = -(-periods * monthly_rate.ln_1p()).exp_m1();
        if discount == 0.0 {
            loan.principal / periods
        } else {
            loan.principal * monthly_rate / discount
        }
    };
    let insurance = loan.principal * loan.insurance_rate / MONTHS_PER_YEAR;
    base + insurance
}

fn acquisition_cost(input: &SimulationInput) -> Acquisition {
    let property = &input.property;
    let notary_fee = property.price * property.effective_notary_rate();
    Acquisition {
        notary_fee,
        total_cost: property.price
            + notary_fee
            + property.agency_fees
            + property.works
            + property.furnishing,
    }
}

fn operating_income(input: &SimulationInput) -> Operations {
    let gross_annual_rent = input.rent.monthly * MONTHS_PER_YEAR;
    let net_annual_rent = gross_annual_rent * (1.0 - input.rent.vacancy_rate);
    let charges = &input.charges;
    let operating_expenses = charges.monthly * MONTHS_PER_YEAR
        + charges.tax_fonciere_annual
        + charges.management_rate * net_annual_rent;
    Operations {
        gross_annual_rent,
        net_annual_rent,
        operating_expenses,
        noi: net_annual_rent - operating_expenses,
    }
}

fn ratios(
    input: &SimulationInput,
    acquisition: &Acquisition,
    operations: &Operations,
    annual_debt_service: f64,
) -> Ratios {
    Ratios {
        cap_rate: safe_div(operations.noi, acquisition.total_cost),
        gross_yield: safe_div(operations.net_annual_rent, input.property.price),
        net_yield: safe_div(
            operations.net_annual_rent - operations.operating_expenses,
            acquisition.total_cost,
        ),
        dscr: safe_div(operations.noi, annual_debt_service),
    }
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub(crate) fn round_money(value: f64) -> f64 {
    round_to(value, 2)
}

fn round_ratio(value: f64) -> f64 {
    round_to(value, 4)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    // Avoid emitting -0.0 for tiny negatives.
    if rounded == 0.0 { 0.0 } else { rounded }
}
