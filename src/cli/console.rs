//! Colored status lines
//!
//! `[*]` announces a step, `[+]` reports success and `[!]` an error.

use colored::Colorize;

/// Turn colors off for the rest of the process
pub fn disable_colors() {
    colored::control::set_override(false);
}

/// An informational status line
pub fn info_line(text: &str) -> String {
    format!("[*] {text}").blue().to_string()
}

/// A success status line
pub fn success_line(text: &str) -> String {
    format!("[+] {text}").green().to_string()
}

/// An error status line
pub fn error_line(text: &str) -> String {
    format!("[!] {text}").red().to_string()
}

/// Print an informational line after a blank line
pub fn info(text: &str) {
    println!();
    println!("{}", info_line(text));
}

/// Print a success line
pub fn success(text: &str) {
    println!("{}", success_line(text));
}

/// Print an error line on stderr
pub fn error(text: &str) {
    eprintln!("{}", error_line(text));
}

/// The target in a shell prompt
pub fn prompt(target: &str) -> String {
    format!("{} > ", target.red())
}
