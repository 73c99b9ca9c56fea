//! # Hydra Exchange
//!
//! Constant-product AMM exchange core: a registry of two-token liquidity
//! pools with share minting and burning, fee-charging swaps (including
//! flash swaps and multi-hop routes), protocol-fee accrual and
//! time-weighted price accumulators, all in exact integer arithmetic.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no | `Serialize`/`Deserialize` for domain types, events and configs |
//!
//! # Quick Start
//!
//! ```rust
//! use hydra_exchange::prelude::*;
//!
//! let weth = Address::from_bytes([1u8; 32]);
//! let usdc = Address::from_bytes([2u8; 32]);
//! let lp = Address::from_bytes([10u8; 32]);
//! let trader = Address::from_bytes([11u8; 32]);
//!
//! // 1. An exchange with in-memory ledgers and a 0.30% default fee
//! let exchange = Exchange::new(ExchangeConfig::default()).expect("valid config");
//!
//! // 2. Create a pair and fund the accounts
//! let pool = exchange.create_pair(weth, usdc).expect("pool created");
//! exchange
//!     .update_tokens(|vault| {
//!         for holder in [lp, trader] {
//!             vault.credit(weth, holder, Amount::new(10_000_000))?;
//!             vault.credit(usdc, holder, Amount::new(20_000_000))?;
//!         }
//!         Ok(())
//!     })
//!     .expect("funded");
//! for holder in [lp, trader] {
//!     for token in [weth, usdc] {
//!         exchange
//!             .approve(token, holder, Address::pool(pool), Amount::MAX)
//!             .expect("approved");
//!     }
//! }
//!
//! // 3. Provide liquidity
//! exchange
//!     .add_liquidity(lp, pool, Amount::new(1_000_000), Amount::new(2_000_000), lp)
//!     .expect("minted");
//!
//! // 4. Swap 1 000 WETH for USDC
//! let out = exchange
//!     .swap_exact_in(trader, pool, weth, Amount::new(1_000), Amount::new(1_990), trader)
//!     .expect("swapped");
//! assert_eq!(out, Amount::new(1_992));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Exchange    │  atomic entry points, reentrancy guard, events
//! └──────┬───────┘
//!        │ Transaction over a copy of the state
//!        ▼
//! ┌──────────────┐
//! │    Engine     │  mint / burn / swap / route / skim / sync
//! └──────┬───────┘
//!        │ reads balances, writes reserves
//!        ▼
//! ┌──────────────┐     ┌──────────────┐
//! │   Registry    │     │   Ledgers     │  TokenLedger, ShareLedger
//! └──────┬───────┘     └──────────────┘
//!        │ TWAP, 112-bit bound
//!        ▼
//! ┌──────────────┐
//! │     Math      │  isqrt, UQ112x112, pricing, shares
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Address`](domain::Address), [`Amount`](domain::Amount), [`Pool`](domain::Pool), [`Event`](domain::Event), etc. |
//! | [`math`] | Integer square root, fixed-point encoding, pricing and share formulas |
//! | [`registry`] | [`PoolRegistry`](registry::PoolRegistry): pool storage and accumulator updates |
//! | [`ledger`] | [`TokenLedger`](ledger::TokenLedger) and [`ShareLedger`](ledger::ShareLedger) with in-memory implementations |
//! | [`engine`] | Liquidity and swap settlement, [`ReentrancyGuard`](engine::ReentrancyGuard) |
//! | [`traits`] | [`PricingStrategy`](traits::PricingStrategy), [`SwapCallback`](traits::SwapCallback), [`Clock`](traits::Clock) |
//! | [`strategy`] | [`ConstantProductStrategy`](strategy::ConstantProductStrategy) |
//! | [`factory`] | [`PairFactory`](factory::PairFactory): pair creation and the strategy table |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig), [`PairConfig`](config::PairConfig) |
//! | [`exchange`] | [`Exchange`](exchange::Exchange), the public entry point |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod factory;
pub mod ledger;
pub mod math;
pub mod prelude;
pub mod registry;
pub mod strategy;
pub mod traits;
