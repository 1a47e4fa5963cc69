pub mod analysis;
pub mod calculator;
pub mod projection;

pub use analysis::{
    analyze_deal, analyze_investment, analyze_investment_in_region, DealAnalysis, DealInput,
};
pub use calculator::{compute_investment, InvestmentInputs, InvestmentResult};
pub use projection::{
    build_projection, project_cash_flow, ProjectionInput, ProjectionOutput,
    ProjectionPoint, DEFAULT_HORIZON_YEARS, MAX_HORIZON_YEARS,
};
