//! Property-based tests for pool accounting.
//!
//! 1. **Invariant monotonicity**: `k` strictly grows across a fee-paying swap.
//! 2. **Zero-fee round trip**: A→B→A returns at most the input, losing at
//!    most one unit per hop.
//! 3. **Pro-rata mint**: proportional deposits mint exactly proportional
//!    shares; skewed deposits mint by the scarcer side.
//! 4. **Atomicity**: a rejected swap changes nothing.
//! 5. **Burn conservation**: burning never pays more than was deposited.
//! 6. **Integer square root**: `isqrt(x)` is the floor of `√x`.

use ethnum::U256;
use proptest::prelude::*;

use crate::config::{ExchangeConfig, PairConfig};
use crate::domain::{Address, Amount, FeeTier, Liquidity, PoolId, StrategyId};
use crate::error::AmmError;
use crate::exchange::Exchange;
use crate::factory::PairFactory;
use crate::ledger::{ShareBook, TokenVault};
use crate::math::isqrt;
use crate::traits::ManualClock;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const TOKEN_A: Address = Address::from_bytes([1u8; 32]);
const TOKEN_B: Address = Address::from_bytes([2u8; 32]);
const LP: Address = Address::from_bytes([10u8; 32]);
const LP2: Address = Address::from_bytes([11u8; 32]);
const TRADER: Address = Address::from_bytes([12u8; 32]);

const FUNDING: u128 = 1u128 << 100;

fn exchange() -> Exchange {
    let Ok(exchange) = Exchange::with_components(
        ExchangeConfig::default(),
        PairFactory::new(),
        TokenVault::new(),
        ShareBook::new(),
        ManualClock::new(1_000),
    ) else {
        panic!("valid exchange");
    };
    exchange
}

/// Creates an A/B pool seeded by `LP` with `(r0, r1)` and funds everyone.
fn seeded(fee: FeeTier, r0: u128, r1: u128) -> (Exchange, PoolId) {
    let exchange = exchange();
    let Ok(config) = PairConfig::new(TOKEN_A, TOKEN_B, fee, StrategyId::CONSTANT_PRODUCT) else {
        panic!("valid pair config");
    };
    let Ok(id) = exchange.create_pair_with(&config) else {
        panic!("pool created");
    };
    let funded = exchange.update_tokens(|vault| {
        for holder in [LP, LP2, TRADER] {
            vault.credit(TOKEN_A, holder, Amount::new(FUNDING))?;
            vault.credit(TOKEN_B, holder, Amount::new(FUNDING))?;
        }
        Ok(())
    });
    let Ok(()) = funded else {
        panic!("funded");
    };
    for holder in [LP, LP2, TRADER] {
        for token in [TOKEN_A, TOKEN_B] {
            let Ok(()) = exchange.approve(token, holder, Address::pool(id), Amount::MAX) else {
                panic!("approved");
            };
        }
    }
    let Ok(_) = exchange.add_liquidity(LP, id, Amount::new(r0), Amount::new(r1), LP) else {
        panic!("seeded");
    };
    (exchange, id)
}

fn k_of(exchange: &Exchange, id: PoolId) -> U256 {
    let Ok(pool) = exchange.pool(id) else {
        panic!("pool exists");
    };
    pool.k()
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserves in [1e6, 1e15], large enough to clear the locked minimum.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..=1_000_000_000_000_000u128
}

fn fee_strategy() -> impl Strategy<Value = FeeTier> {
    prop_oneof![
        Just(FeeTier::TIER_0_05_PERCENT),
        Just(FeeTier::TIER_0_30_PERCENT),
        Just(FeeTier::TIER_1_00_PERCENT),
        (1u16..=500u16).prop_map(FeeTier::new),
    ]
}

// ---------------------------------------------------------------------------
// Property 1: Invariant monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_k_strictly_grows_with_fee(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        fee in fee_strategy(),
        divisor in 2u128..=1_000u128,
        zero_for_one in any::<bool>(),
    ) {
        let (exchange, id) = seeded(fee, r0, r1);
        let (token_in, reserve_in) = if zero_for_one { (TOKEN_A, r0) } else { (TOKEN_B, r1) };
        let amount_in = (reserve_in / divisor).max(1);
        let k_before = k_of(&exchange, id);

        let Ok(_) = exchange.swap_exact_in(
            TRADER, id, token_in, Amount::new(amount_in), Amount::ZERO, TRADER,
        ) else {
            return Ok(());
        };

        let k_after = k_of(&exchange, id);
        prop_assert!(k_after > k_before, "k shrank or stalled: {} -> {}", k_before, k_after);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Zero-fee round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_zero_fee_round_trip_loses_at_most_one_unit_per_hop(
        reserve in reserve_strategy(),
        divisor in 10u128..=100_000u128,
    ) {
        let (exchange, id) = seeded(FeeTier::ZERO, reserve, reserve);
        let amount = (reserve / divisor).max(1);

        let Ok(out_b) = exchange.swap_exact_in(
            TRADER, id, TOKEN_A, Amount::new(amount), Amount::ZERO, TRADER,
        ) else {
            return Ok(());
        };
        let Ok(back_a) = exchange.swap_exact_in(
            TRADER, id, TOKEN_B, out_b, Amount::ZERO, TRADER,
        ) else {
            return Ok(());
        };

        prop_assert!(back_a.get() <= amount, "gained value: {} > {}", back_a, amount);
        prop_assert!(amount - back_a.get() <= 2, "lost {} on two hops", amount - back_a.get());
    }
}

// ---------------------------------------------------------------------------
// Property 3: Pro-rata mint
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_proportional_deposit_mints_exact_multiple(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        multiple in 1u128..=50u128,
    ) {
        let (exchange, id) = seeded(FeeTier::TIER_0_30_PERCENT, r0, r1);
        let total = exchange.total_shares(id);
        prop_assert_eq!(total.widen(), isqrt(Amount::new(r0).widen() * Amount::new(r1).widen()));

        let Ok(minted) = exchange.add_liquidity(
            LP2, id, Amount::new(r0 * multiple), Amount::new(r1 * multiple), LP2,
        ) else {
            panic!("proportional deposit must mint");
        };
        prop_assert_eq!(minted, Liquidity::new(total.get() * multiple));
    }

    #[test]
    fn prop_skewed_deposit_mints_by_scarcer_side(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        d0 in 1_000u128..=1_000_000_000u128,
        d1 in 1_000u128..=1_000_000_000u128,
    ) {
        let (exchange, id) = seeded(FeeTier::TIER_0_30_PERCENT, r0, r1);
        let total = exchange.total_shares(id).get();
        let expected = (d0 * total / r0).min(d1 * total / r1);

        match exchange.add_liquidity(LP2, id, Amount::new(d0), Amount::new(d1), LP2) {
            Ok(minted) => prop_assert_eq!(minted, Liquidity::new(expected)),
            Err(err) => {
                prop_assert_eq!(err, AmmError::InsufficientLiquidityMinted);
                prop_assert_eq!(expected, 0);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Atomicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rejected_swap_changes_nothing(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        divisor in 2u128..=1_000u128,
    ) {
        let (exchange, id) = seeded(FeeTier::TIER_0_30_PERCENT, r0, r1);
        let amount_in = Amount::new((r0 / divisor).max(1));
        let Ok(quote) = exchange.quote_swap(id, TOKEN_A, amount_in) else {
            return Ok(());
        };
        let _ = exchange.take_events();
        let reserves = exchange.reserves(id);
        let trader_a = exchange.balance_of(TOKEN_A, TRADER);

        let Some(too_much) = quote.checked_add(&Amount::new(1)) else {
            return Ok(());
        };
        let result = exchange.swap_exact_in(TRADER, id, TOKEN_A, amount_in, too_much, TRADER);

        prop_assert_eq!(result, Err(AmmError::InsufficientOutputAmount));
        prop_assert_eq!(exchange.reserves(id), reserves);
        prop_assert_eq!(exchange.balance_of(TOKEN_A, TRADER), trader_a);
        prop_assert!(exchange.take_events().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Property 5: Burn conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_burn_pays_no_more_than_deposited(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
    ) {
        let (exchange, id) = seeded(FeeTier::TIER_0_30_PERCENT, r0, r1);
        let shares = exchange.share_balance(LP, id);
        let Ok((a0, a1)) = exchange.burn(LP, id, shares, LP) else {
            panic!("full burn must succeed");
        };
        prop_assert!(a0.get() <= r0 && a1.get() <= r1);
        prop_assert_eq!(exchange.total_shares(id), Liquidity::MINIMUM);
        let Ok((left0, left1)) = exchange.reserves(id) else {
            panic!("pool exists");
        };
        prop_assert!(!left0.is_zero() && !left1.is_zero());
    }
}

// ---------------------------------------------------------------------------
// Property 6: Integer square root
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_isqrt_is_floor(hi in any::<u128>(), lo in any::<u128>()) {
        let x = U256::from_words(hi, lo);
        let root = isqrt(x);

        prop_assert!(root * root <= x, "isqrt({}) = {} overshoots", x, root);
        let next = root + U256::ONE;
        // (2^128)^2 does not fit, and any x is below it
        if let Some(next_sq) = next.checked_mul(next) {
            prop_assert!(next_sq > x, "isqrt({}) = {} undershoots", x, root);
        }
    }

    #[test]
    fn prop_isqrt_exact_on_squares(r in any::<u128>()) {
        let r = U256::new(r);
        prop_assert_eq!(isqrt(r * r), r);
    }
}
