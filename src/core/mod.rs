mod engine;
mod error;
mod tax;
mod types;

pub use engine::{monthly_payment, simulate};
pub use error::SimulationError;
pub use types::{
    Charges, DEFAULT_MARGINAL_TAX_RATE, DEFAULT_NOTARY_RATE, DEFAULT_SOCIAL_CONTRIBUTION_RATE,
    DEFAULT_VACANCY_RATE, Loan, NEW_BUILD_NOTARY_RATE, Property, Rent, SimulationInput,
    SimulationMetrics, SimulationResult, TaxDisclosure, TaxProfile, TaxRegime,
};
