use assert_approx_eq::assert_approx_eq;
use lattice_pricing::analytic::{BlackScholesMerton, OptionPrice};
use lattice_pricing::common::models::DerivativeParameter;
use lattice_pricing::lattice::{BinaryTreeOption, ExerciseSchedule, RecombiningLattice, TreeOption};
use lattice_pricing::{Expiry, MarketParameters, Payoff, Pricer, PricingError};
use lattice_risk::Greeks;
use proptest::prelude::*;

/// Black-Scholes put for spot 100, strike 95, T = 1, r = 5%, q = 0, vol = 25%.
const GOLDEN_PUT: f64 = 5.413845663812477;

fn market() -> MarketParameters {
    MarketParameters::new(100.0, 0.05, 0.0, 0.25)
}

fn call() -> Payoff {
    Payoff::VanillaCall { strike: 95.0 }
}

fn put() -> Payoff {
    Payoff::VanillaPut { strike: 95.0 }
}

#[test]
fn golden_value_is_black_scholes() {
    let dp = DerivativeParameter::new(market(), 95.0, 1.0);
    assert_approx_eq!(BlackScholesMerton::put(&dp), GOLDEN_PUT, 1e-10);
}

#[test]
fn put_call_parity() {
    let market = MarketParameters::new(100.0, 0.05, 0.02, 0.25);
    let forward = 100.0 * (-0.02_f64).exp() - 95.0 * (-0.05_f64).exp();
    for steps in [10, 100, 1000] {
        let call = TreeOption::european(market, Expiry::Years(1.0), call())
            .price(Some(steps))
            .unwrap();
        let put = TreeOption::european(market, Expiry::Years(1.0), put())
            .price(Some(steps))
            .unwrap();
        assert_approx_eq!(call - put, forward, 1e-8);
    }
}

#[test]
fn european_put_converges_to_the_golden_value() {
    let option = TreeOption::european(market(), Expiry::Years(1.0), put());
    let coarse = (option.price(Some(50)).unwrap() - GOLDEN_PUT).abs();
    let fine = (option.price(Some(1000)).unwrap() - GOLDEN_PUT).abs();
    assert!(fine < coarse);
    assert!(fine < 2e-3);
}

#[test]
fn american_put_is_worth_more_than_european() {
    let european = TreeOption::european(market(), Expiry::Years(1.0), put())
        .price(None)
        .unwrap();
    let american = TreeOption::american(market(), Expiry::Years(1.0), put())
        .price(None)
        .unwrap();
    assert!(american > european);
}

#[test]
fn american_call_without_dividends_is_never_exercised_early() {
    let european = TreeOption::european(market(), Expiry::Years(1.0), call())
        .price(None)
        .unwrap();
    let american = TreeOption::american(market(), Expiry::Years(1.0), call())
        .price(None)
        .unwrap();
    assert_approx_eq!(american, european, 1e-10);

    let paying = market().with_divid(0.08);
    let european = TreeOption::european(paying, Expiry::Years(1.0), call())
        .price(None)
        .unwrap();
    let american = TreeOption::american(paying, Expiry::Years(1.0), call())
        .price(None)
        .unwrap();
    assert!(american > european);
}

#[test]
fn bermudan_is_bracketed() {
    let schedule =
        ExerciseSchedule::from_trading_days(vec![63.0, 126.0, 189.0, 252.0], 252.0).unwrap();
    let bermudan = TreeOption::bermudan(market(), schedule, put())
        .price(None)
        .unwrap();
    let european = TreeOption::european(market(), Expiry::TradingDays(252.0), put())
        .price(Some(400))
        .unwrap();
    let american = TreeOption::american(market(), Expiry::TradingDays(252.0), put())
        .price(Some(400))
        .unwrap();
    assert!(european <= bermudan);
    assert!(bermudan <= american);
}

#[test]
fn arbitrage_inconsistent_parameters_are_rejected() {
    let market = MarketParameters::new(100.0, 0.5, 0.0, 0.01);
    let option = TreeOption::european(market, Expiry::Years(1.0), call());
    assert!(matches!(
        option.price(Some(1)),
        Err(PricingError::InvalidLattice { .. })
    ));
    assert!(option.delta(Some(1)).is_err());
}

#[test]
fn non_recombining_resource_ceiling() {
    let option = BinaryTreeOption::european(market(), Expiry::Years(1.0), put());
    assert_eq!(
        option.price(Some(25)).unwrap_err(),
        PricingError::ResourceLimitExceeded {
            steps: 25,
            limit: 20
        }
    );
}

#[test]
fn delta_and_gamma_signs() {
    for steps in [Some(2), Some(101), None] {
        let call = TreeOption::european(market(), Expiry::Years(1.0), call());
        let put = TreeOption::american(market(), Expiry::Years(1.0), put());

        let call_delta = call.delta(steps).unwrap();
        let put_delta = put.delta(steps).unwrap();
        assert!((0.0..=1.0).contains(&call_delta));
        assert!((-1.0..=0.0).contains(&put_delta));
        assert!(call.gamma(steps).unwrap() >= 0.0);
        assert!(put.gamma(steps).unwrap() >= 0.0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn probability_is_valid_or_valuation_fails(
        rate in -0.2..1.0_f64,
        divid in 0.0..0.2_f64,
        vol in 0.001..0.5_f64,
        horizon in 0.1..3.0_f64,
        steps in 1usize..40,
    ) {
        let market = MarketParameters::new(100.0, rate, divid, vol);
        let lattice = RecombiningLattice::build(&market, horizon, steps, 100).unwrap();
        let p = lattice.probability();
        let price = TreeOption::european(market, Expiry::Years(horizon), put()).price(Some(steps));

        if (0.0..=1.0).contains(&p) {
            prop_assert!(price.is_ok());
        } else {
            prop_assert_eq!(price, Err(PricingError::InvalidLattice { probability: p }));
        }
    }

    #[test]
    fn exercise_rights_are_ordered(
        spot in 70.0..130.0_f64,
        vol in 0.1..0.5_f64,
        rate in 0.0..0.1_f64,
    ) {
        let market = MarketParameters::new(spot, rate, 0.0, vol);
        let schedule = ExerciseSchedule::new(vec![0.5, 1.0]).unwrap();
        let european = TreeOption::european(market, Expiry::Years(1.0), put())
            .price(Some(60))
            .unwrap();
        let bermudan = TreeOption::bermudan(market, schedule, put())
            .price(Some(30))
            .unwrap();
        let american = TreeOption::american(market, Expiry::Years(1.0), put())
            .price(Some(60))
            .unwrap();

        prop_assert!(european <= bermudan + 1e-12);
        prop_assert!(bermudan <= american + 1e-12);
    }
}
