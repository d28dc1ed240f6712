pub mod closing_costs;
pub mod funding_fee;
pub mod mortgage_insurance;
