//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `keepsake_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("keepsake_core ping={}", keepsake_core::ping());
    println!("keepsake_core version={}", keepsake_core::core_version());
}
