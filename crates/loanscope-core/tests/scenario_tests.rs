use loanscope_core::rules::RuleSet;
use loanscope_core::scenario::{compose_scenario, LoanInputs};
use loanscope_core::types::{LoanProgram, QualificationBasis, TaxBasis, VaUsage};
use loanscope_core::LoanScopeError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Scenario composition tests
// ===========================================================================

/// $625k VA purchase, nothing down, first use, fee financed.
fn va_zero_down() -> LoanInputs {
    LoanInputs {
        purchase_price: dec!(625000),
        down_payment_pct: dec!(0),
        annual_rate: dec!(5.500),
        term_months: 360,
        interest_only: false,
        program: LoanProgram::Va,
        credit_score: 720,
        tax_basis: TaxBasis::RateOfPrice(dec!(1.1)),
        annual_insurance: dec!(2400),
        monthly_hoa: dec!(0),
        seller_credit_requested: dec!(0),
        finance_fee: true,
        va_usage: VaUsage::FirstUse,
        qualification: QualificationBasis::Dti {
            gross_monthly_income: dec!(12000),
            other_monthly_debts: dec!(0),
        },
    }
}

#[test]
fn va_financed_fee_end_to_end() {
    let out = compose_scenario(&va_zero_down(), &RuleSet::default()).unwrap();
    let s = &out.result;

    assert_eq!(s.base_loan, dec!(625000));
    assert_eq!(s.ltv, dec!(100.000));
    assert_eq!(s.funding_fee_rate, dec!(2.15));
    assert_eq!(s.funding_fee_amount, dec!(13437.50));

    // Financed: the fee rides the principal and never touches closing costs.
    assert_eq!(s.financed_fee, dec!(13437.50));
    assert_eq!(s.fee_due_at_closing, Decimal::ZERO);
    assert_eq!(s.total_loan, dec!(638437.50));

    // P&I on the financed total, within a dollar of the reference figure.
    assert!(
        (s.monthly_principal_interest - dec!(3624.70)).abs() < dec!(1),
        "got {}",
        s.monthly_principal_interest
    );

    // VA carries no MI.
    assert_eq!(s.mi_rate, Decimal::ZERO);
    assert_eq!(s.monthly_mi, Decimal::ZERO);
}

#[test]
fn va_unfinanced_fee_lands_in_closing_costs() {
    let mut inputs = va_zero_down();
    inputs.finance_fee = false;
    let out = compose_scenario(&inputs, &RuleSet::default()).unwrap();
    let s = &out.result;

    assert_eq!(s.total_loan, dec!(625000));
    assert_eq!(s.financed_fee, Decimal::ZERO);
    assert_eq!(s.fee_due_at_closing, dec!(13437.50));

    // Same composition with the fee financed: closing costs differ by
    // exactly the fee, minus the interim-interest drift from the larger loan.
    let financed = compose_scenario(&va_zero_down(), &RuleSet::default()).unwrap();
    let drift = s.interim_interest - financed.result.interim_interest;
    assert_eq!(
        s.total_closing_costs,
        financed.result.total_closing_costs + dec!(13437.50) + drift
    );
}

#[test]
fn prepaids_and_reserves_follow_policy_multipliers() {
    let out = compose_scenario(&va_zero_down(), &RuleSet::default()).unwrap();
    let s = &out.result;

    assert_eq!(s.monthly_insurance, dec!(200));
    assert_eq!(s.monthly_tax, dec!(572.92));
    assert_eq!(s.insurance_prepaid, dec!(2400));
    assert_eq!(s.insurance_reserve, dec!(1200));
    assert_eq!(s.tax_prepaid, dec!(3437.52));
    assert_eq!(s.tax_reserve, dec!(1718.76));

    // 15 days of interim interest on the financed total.
    assert_eq!(s.interim_interest, dec!(1443.04));
    assert_eq!(
        s.prepaids_and_reserves,
        dec!(2400) + dec!(1200) + dec!(3437.52) + dec!(1718.76) + dec!(1443.04)
    );

    assert_eq!(s.lender_fees_total, dec!(2415));
    assert_eq!(s.shoppable_fees_total, dec!(2120));
    assert_eq!(s.government_fees_total, dec!(185));
    assert_eq!(s.total_closing_costs, dec!(4720) + s.prepaids_and_reserves);
    assert_eq!(s.total_cash_required, s.cash_at_closing);
}

#[test]
fn composition_is_idempotent_to_the_penny() {
    let inputs = va_zero_down();
    let rules = RuleSet::default();
    let a = compose_scenario(&inputs, &rules).unwrap();
    let b = compose_scenario(&inputs, &rules).unwrap();
    assert_eq!(
        serde_json::to_value(&a.result).unwrap(),
        serde_json::to_value(&b.result).unwrap()
    );
}

#[test]
fn conventional_mi_rides_the_payment_stack() {
    let inputs = LoanInputs {
        purchase_price: dec!(400000),
        down_payment_pct: dec!(10),
        annual_rate: dec!(6.000),
        term_months: 360,
        interest_only: false,
        program: LoanProgram::Conventional,
        credit_score: 750,
        tax_basis: TaxBasis::AnnualAmount(dec!(4800)),
        annual_insurance: dec!(1500),
        monthly_hoa: dec!(120),
        seller_credit_requested: dec!(0),
        finance_fee: false,
        va_usage: VaUsage::FirstUse,
        qualification: QualificationBasis::Dti {
            gross_monthly_income: dec!(11000),
            other_monthly_debts: dec!(450),
        },
    };
    let out = compose_scenario(&inputs, &RuleSet::default()).unwrap();
    let s = &out.result;

    // 90 LTV, 740-759 credit: 0.38% annual on the base loan.
    assert_eq!(s.ltv, dec!(90.000));
    assert_eq!(s.mi_rate, dec!(0.38));
    assert_eq!(s.monthly_mi, dec!(114));
    // MI is recurring, never principal.
    assert_eq!(s.total_loan, s.base_loan);
    assert_eq!(
        s.total_monthly_obligation,
        s.monthly_principal_interest + s.monthly_tax + s.monthly_insurance + dec!(120) + dec!(114)
    );
}

#[test]
fn unmapped_mi_band_warns_and_defaults_to_zero() {
    let mut inputs = va_zero_down();
    inputs.program = LoanProgram::Conventional;
    inputs.down_payment_pct = dec!(2);
    inputs.finance_fee = false;
    let out = compose_scenario(&inputs, &RuleSet::default()).unwrap();

    assert_eq!(out.result.ltv, dec!(98.000));
    assert_eq!(out.result.mi_rate, Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.contains("No MI band")));
}

// ===========================================================================
// Seller credit
// ===========================================================================

#[test]
fn seller_credit_clamps_to_program_cap() {
    let mut inputs = va_zero_down();
    inputs.seller_credit_requested = dec!(40000);
    let out = compose_scenario(&inputs, &RuleSet::default()).unwrap();
    let s = &out.result;

    // VA cap: 4% of price.
    assert_eq!(s.seller_credit_cap, dec!(25000));
    assert_eq!(s.effective_seller_credit, dec!(25000));
    assert!(out.warnings.iter().any(|w| w.contains("clamped")));
}

#[test]
fn credit_within_cap_passes_through_unclamped() {
    let mut inputs = va_zero_down();
    inputs.seller_credit_requested = dec!(5000);
    let out = compose_scenario(&inputs, &RuleSet::default()).unwrap();

    assert_eq!(out.result.effective_seller_credit, dec!(5000));
    assert!(!out.warnings.iter().any(|w| w.contains("clamped")));
}

#[test]
fn excess_credit_zeroes_cash_at_closing() {
    let inputs = LoanInputs {
        purchase_price: dec!(800000),
        down_payment_pct: dec!(3.5),
        annual_rate: dec!(6.250),
        term_months: 360,
        interest_only: false,
        program: LoanProgram::Fha,
        credit_score: 680,
        tax_basis: TaxBasis::RateOfPrice(dec!(1.1)),
        annual_insurance: dec!(1600),
        monthly_hoa: dec!(0),
        seller_credit_requested: dec!(48000),
        finance_fee: false,
        va_usage: VaUsage::FirstUse,
        qualification: QualificationBasis::Dti {
            gross_monthly_income: dec!(20000),
            other_monthly_debts: dec!(0),
        },
    };
    let out = compose_scenario(&inputs, &RuleSet::default()).unwrap();
    let s = &out.result;

    // FHA cap is 6% of price: the full request survives the clamp and
    // overshoots closing costs.
    assert_eq!(s.effective_seller_credit, dec!(48000));
    assert!(s.excess_seller_credit > Decimal::ZERO);
    assert_eq!(s.cash_at_closing, Decimal::ZERO);
    assert_eq!(s.total_cash_required, s.down_payment);
    assert_eq!(
        s.excess_seller_credit,
        s.effective_seller_credit - s.total_closing_costs
    );
}

// ===========================================================================
// Input contract
// ===========================================================================

#[test]
fn zero_price_rejected() {
    let mut inputs = va_zero_down();
    inputs.purchase_price = Decimal::ZERO;
    let err = compose_scenario(&inputs, &RuleSet::default()).unwrap_err();
    match err {
        LoanScopeError::InvalidInput { field, .. } => assert_eq!(field, "purchase_price"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn full_down_payment_rejected() {
    let mut inputs = va_zero_down();
    inputs.down_payment_pct = dec!(100);
    let err = compose_scenario(&inputs, &RuleSet::default()).unwrap_err();
    match err {
        LoanScopeError::InvalidInput { field, .. } => assert_eq!(field, "down_payment_pct"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn out_of_range_credit_rejected() {
    let mut inputs = va_zero_down();
    inputs.credit_score = 200;
    let err = compose_scenario(&inputs, &RuleSet::default()).unwrap_err();
    match err {
        LoanScopeError::InvalidInput { field, .. } => assert_eq!(field, "credit_score"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn negative_seller_credit_rejected() {
    let mut inputs = va_zero_down();
    inputs.seller_credit_requested = dec!(-1);
    assert!(compose_scenario(&inputs, &RuleSet::default()).is_err());
}

#[test]
fn metadata_and_assumptions_populated() {
    let out = compose_scenario(&va_zero_down(), &RuleSet::default()).unwrap();
    assert_eq!(out.methodology, "Loan Scenario Composition");
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert!(out.assumptions.get("purchase_price").is_some());
}
