//! Fee-related math helpers shared by the builders.

use solana_sdk::native_token::LAMPORTS_PER_SOL;

const MICRO_LAMPORTS_PER_LAMPORT: u128 = 1_000_000;

/// SOL to lamports, rounded to the nearest lamport. Negative and NaN
/// amounts map to zero.
pub fn sol_to_lamports(sol: f64) -> u64 {
    if !(sol > 0.0) {
        return 0;
    }
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}

/// Convert a *total* priority fee (in SOL) into the per-compute-unit price
/// `ComputeBudgetInstruction::set_compute_unit_price` expects, spreading it
/// over `cu_limit` units.
pub fn priority_fee_to_cu_price(total_sol: f64, cu_limit: u32) -> u64 {
    if cu_limit == 0 {
        return 0;
    }
    let micro_lamports = sol_to_lamports(total_sol) as u128 * MICRO_LAMPORTS_PER_LAMPORT;
    u64::try_from(micro_lamports / cu_limit as u128).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sol_to_lamports() {
        assert_eq!(sol_to_lamports(0.001), 1_000_000);
        assert_eq!(sol_to_lamports(1.0), LAMPORTS_PER_SOL);
        assert_eq!(sol_to_lamports(-1.0), 0);
        assert_eq!(sol_to_lamports(f64::NAN), 0);
    }

    #[test]
    fn test_priority_fee_spreads_over_limit() {
        // 0.0001 SOL over 100k units = 100_000 lamports * 1e6 / 100_000
        assert_eq!(priority_fee_to_cu_price(0.0001, 100_000), 1_000_000);
        assert_eq!(priority_fee_to_cu_price(0.0001, 0), 0);
        assert_eq!(priority_fee_to_cu_price(0.0, 101_337), 0);
    }
}
