//! Qualification evaluation: back-end DTI against program ceilings, or debt
//! service coverage for investment scenarios, including the low-coverage
//! repricing rule.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanScopeError;
use crate::rules::RuleSet;
use crate::scenario::{self, LoanInputs, ScenarioResult};
use crate::types::{with_metadata, ComputationOutput, Percent, QualificationBasis, Ratio};
use crate::LoanScopeResult;

const PERCENT: Decimal = dec!(100);

/// Marginal band opens at this fraction of the program DTI ceiling.
const DTI_MARGINAL_FRACTION: Decimal = dec!(0.9);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Strong,
    Qualifies,
    Marginal,
    DoesNotQualify,
}

/// DTI-path assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiAssessment {
    /// Back-end DTI in percentage points, rounded to two decimals.
    pub back_end_dti: Percent,
    pub ceiling: Percent,
    pub verdict: Verdict,
}

/// DSCR-path assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DscrAssessment {
    /// Coverage ratio rounded to two decimals, computed at `evaluated_rate`.
    pub dscr: Ratio,
    pub verdict: Verdict,
    /// True when coverage at the requested rate fell below the trigger and
    /// the scenario was repriced once at the fallback rate.
    pub escalated: bool,
    pub evaluated_rate: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationOutput {
    Dti(DtiAssessment),
    Dscr(DscrAssessment),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate qualification for a scenario. Composes the scenario internally:
/// a verdict is never computed apart from the inputs that produced it.
pub fn evaluate_qualification(
    inputs: &LoanInputs,
    rules: &RuleSet,
) -> LoanScopeResult<ComputationOutput<QualificationOutput>> {
    let start = Instant::now();
    let (composed, mut warnings) = scenario::compose(inputs, rules)?;
    let (output, mut qualify_warnings) = qualify_composed(&composed, inputs, rules)?;
    warnings.append(&mut qualify_warnings);

    let methodology = match output {
        QualificationOutput::Dti(_) => "Back-End DTI Qualification",
        QualificationOutput::Dscr(_) => "DSCR Qualification",
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, inputs, warnings, elapsed, output))
}

/// Evaluate a scenario that has already been composed from `inputs`.
pub(crate) fn qualify_composed(
    composed: &ScenarioResult,
    inputs: &LoanInputs,
    rules: &RuleSet,
) -> LoanScopeResult<(QualificationOutput, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();

    let output = match &inputs.qualification {
        QualificationBasis::Dti {
            gross_monthly_income,
            other_monthly_debts,
        } => {
            let ceiling = rules.dti_ceilings.for_program(inputs.program);
            let back_end_dti = ((composed.total_monthly_obligation + other_monthly_debts)
                / gross_monthly_income
                * PERCENT)
                .round_dp(2);
            let verdict = if back_end_dti <= ceiling * DTI_MARGINAL_FRACTION {
                Verdict::Qualifies
            } else if back_end_dti <= ceiling {
                Verdict::Marginal
            } else {
                Verdict::DoesNotQualify
            };
            QualificationOutput::Dti(DtiAssessment {
                back_end_dti,
                ceiling,
                verdict,
            })
        }
        QualificationBasis::Dscr {
            gross_monthly_rent,
            vacancy_retention,
        } => {
            let effective_rent = gross_monthly_rent * vacancy_retention;
            let requested_dscr =
                coverage(effective_rent, composed.total_monthly_obligation)?;

            // Below the trigger the scenario is repriced once at the fallback
            // rate and reported under that rate. A single substitution, never
            // an iterative search.
            let (dscr, escalated, evaluated_rate) =
                if requested_dscr < rules.dscr.escalation_trigger {
                    let mut repriced = inputs.clone();
                    repriced.annual_rate = rules.dscr.fallback_rate;
                    let (fallback_scenario, _) = scenario::compose(&repriced, rules)?;
                    let fallback_dscr =
                        coverage(effective_rent, fallback_scenario.total_monthly_obligation)?;
                    warnings.push(format!(
                        "Coverage {requested_dscr} at the requested rate is below {}; repriced at {}%",
                        rules.dscr.escalation_trigger, rules.dscr.fallback_rate
                    ));
                    (fallback_dscr, true, rules.dscr.fallback_rate)
                } else {
                    (requested_dscr, false, inputs.annual_rate)
                };

            let verdict = if dscr >= rules.dscr.strong {
                Verdict::Strong
            } else if dscr >= rules.dscr.qualifies {
                Verdict::Qualifies
            } else if dscr >= rules.dscr.marginal {
                Verdict::Marginal
            } else {
                Verdict::DoesNotQualify
            };
            QualificationOutput::Dscr(DscrAssessment {
                dscr,
                verdict,
                escalated,
                evaluated_rate,
            })
        }
    };

    Ok((output, warnings))
}

fn coverage(effective_rent: Decimal, total_monthly_obligation: Decimal) -> LoanScopeResult<Ratio> {
    if total_monthly_obligation <= Decimal::ZERO {
        return Err(LoanScopeError::DivisionByZero {
            context: "DSCR total monthly obligation".into(),
        });
    }
    Ok((effective_rent / total_monthly_obligation).round_dp(2))
}
