//! Display helpers for amounts, timestamps and countdowns.
//!
//! Everything here is a pure function of its arguments; callers pass the
//! clock in so the same snapshot always renders the same way.

use chrono::{DateTime, Utc};
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;

use crate::packet::PacketStatus;

pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

/// `None` when the amount is negative, not finite or does not fit in a `u64`.
pub fn sol_to_lamports(sol: f64) -> Option<u64> {
    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    if !lamports.is_finite() || lamports < 0.0 || lamports >= u64::MAX as f64 {
        return None;
    }
    Some(lamports as u64)
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Fixed-point SOL string, e.g. `format_sol(1_500_000_000, 4) == "1.5000"`.
pub fn format_sol(lamports: u64, decimals: usize) -> String {
    format!("{:.*}", decimals, lamports_to_sol(lamports))
}

/// SOL string with `digits` significant digits. Large values are never
/// switched to exponent notation.
pub fn format_sol_precision(lamports: u64, digits: usize) -> String {
    let sol = lamports_to_sol(lamports);
    if lamports == 0 {
        return format!("{:.*}", digits.saturating_sub(1), 0.0);
    }
    let exponent = sol.abs().log10().floor() as i64;
    let decimals = (digits as i64 - 1 - exponent).max(0) as usize;
    format!("{sol:.decimals$}")
}

pub fn is_packet_expired(expires_at: i64, now: i64) -> bool {
    now >= expires_at
}

pub fn is_packet_completed(status: PacketStatus, remaining_count: u32) -> bool {
    status == PacketStatus::Completed || remaining_count == 0
}

pub fn remaining_percent(remaining_count: u32, total_count: u32) -> f64 {
    if total_count == 0 {
        return 0.0;
    }
    remaining_count as f64 / total_count as f64 * 100.0
}

/// `YYYY/MM/DD HH:MM` in UTC.
pub fn format_time(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y/%m/%d %H:%M").to_string(),
        None => "-".into(),
    }
}

/// Human countdown until `expires_at`. Past and present deadlines render
/// as "expired", never as a negative duration.
pub fn time_remaining(expires_at: i64, now: i64) -> String {
    let diff = expires_at.saturating_sub(now);
    if diff <= 0 {
        return "expired".into();
    }

    let days = diff / 86_400;
    let hours = (diff % 86_400) / 3_600;
    let minutes = (diff % 3_600) / 60;

    if days > 0 {
        format!("{} {}", unit(days, "day"), unit(hours, "hour"))
    } else if hours > 0 {
        format!("{} {}", unit(hours, "hour"), unit(minutes, "minute"))
    } else {
        unit(minutes, "minute")
    }
}

fn unit(n: i64, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// `AbCdEf...wXyZ`
pub fn short_address(address: &Pubkey) -> String {
    let s = address.to_string();
    if s.len() <= 10 {
        return s;
    }
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}
