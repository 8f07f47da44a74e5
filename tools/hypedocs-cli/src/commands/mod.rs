pub mod build;
pub mod chapter;
pub mod combine;
pub mod config;
pub mod images;
pub mod links;

use std::io::{BufRead, Write};

/// `1,234,567 bytes (1.18 MB)`
pub fn format_bytes(bytes: u64) -> String {
    format!(
        "{} bytes ({:.2} MB)",
        group_thousands(bytes),
        bytes as f64 / 1024.0 / 1024.0
    )
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Ask a yes/no question on stdin. Only `yes` and `y` count as yes.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} (yes/no): ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}
