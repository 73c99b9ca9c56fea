//! Exchange walkthrough.
//!
//! Creates a pair, provides liquidity, swaps exact-in, and repays a flash
//! swap from inside its callback.
//!
//! # Run
//!
//! ```bash
//! cargo run --example exchange
//! ```

use hydra_exchange::math::get_amount_in;
use hydra_exchange::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Constant-product exchange ===\n");

    // ── 1. Accounts and tokens ──────────────────────────────────────────
    let weth = Address::from_bytes([1u8; 32]);
    let usdc = Address::from_bytes([2u8; 32]);
    let lp = Address::from_bytes([10u8; 32]);
    let trader = Address::from_bytes([11u8; 32]);

    // ── 2. Exchange with in-memory ledgers, 0.30% default fee ───────────
    let exchange = Exchange::new(ExchangeConfig::default())?;
    let pool = exchange.create_pair(weth, usdc)?;
    let custody = Address::pool(pool);
    println!("Pool {pool} created, custody account {custody}");

    exchange.update_tokens(|vault| {
        for holder in [lp, trader] {
            vault.credit(weth, holder, Amount::new(10_000_000))?;
            vault.credit(usdc, holder, Amount::new(40_000_000))?;
        }
        Ok(())
    })?;
    for holder in [lp, trader] {
        for token in [weth, usdc] {
            exchange.approve(token, holder, custody, Amount::MAX)?;
        }
    }

    // ── 3. Provide liquidity ────────────────────────────────────────────
    let shares = exchange.add_liquidity(
        lp,
        pool,
        Amount::new(1_000_000),
        Amount::new(4_000_000),
        lp,
    )?;
    let (r0, r1) = exchange.reserves(pool)?;
    println!("\n--- Add Liquidity ---");
    println!("  LP shares:   {shares}");
    println!("  Locked:      {}", exchange.share_balance(Address::BURN, pool));
    println!("  Reserves:    {r0} WETH / {r1} USDC");

    // ── 4. Swap exact-in: sell 10 000 WETH ──────────────────────────────
    let quote = exchange.quote_swap(pool, weth, Amount::new(10_000))?;
    let out = exchange.swap_exact_in(trader, pool, weth, Amount::new(10_000), quote, trader)?;
    let (r0, r1) = exchange.reserves(pool)?;
    println!("\n--- Swap ---");
    println!("  Quoted:      {quote} USDC");
    println!("  Received:    {out} USDC");
    println!("  Reserves:    {r0} WETH / {r1} USDC");

    // ── 5. Flash swap: borrow USDC, repay in WETH within the callback ───
    let borrow = Amount::new(50_000);
    let owed = get_amount_in(borrow, r0, r1, FeeTier::TIER_0_30_PERCENT)?;
    let mut repay = |mut ctx: SwapContext<'_, TokenVault, ShareBook>| -> Result<(), AmmError> {
        println!("\n--- Flash Swap callback ---");
        println!("  Borrowed:    {} USDC", ctx.amount1_out());
        println!("  Repaying:    {owed} WETH");
        let to = ctx.pool_address();
        let sender = ctx.sender();
        ctx.tokens().transfer(weth, sender, to, owed)
    };
    let (in0, in1) = exchange.flash_swap(trader, pool, Amount::ZERO, borrow, trader, &mut repay, &[])?;
    println!("  Settled:     {in0} WETH + {in1} USDC in");

    // ── 6. Events and price accumulators ────────────────────────────────
    println!("\n--- Events ---");
    for event in exchange.take_events() {
        println!("  {event:?}");
    }
    let acc = exchange.accumulator(pool)?;
    println!("\nprice0 cumulative: {}", acc.price0_cumulative_last);
    println!("price1 cumulative: {}", acc.price1_cumulative_last);

    println!("\n=== Done ===");
    Ok(())
}
