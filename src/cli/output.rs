//! CLI output formatting utilities

use colored::Colorize;

use crate::auth::Claims;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Print decoded token claims
pub fn print_claims(claims: &Claims) {
    println!("{}", "Token claims".bold());
    println!("  {:<10} {}", "Subject:".cyan(), claims.sub);
    println!("  {:<10} {}", "Issued:".cyan(), format_timestamp(claims.iat));
    println!("  {:<10} {}", "Expires:".cyan(), format_timestamp(claims.exp));
}
