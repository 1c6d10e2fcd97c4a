//! List rules command implementation.

use nodelint_checkers::CHECKER_NAMES;
use nodelint_core::RuleCode;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<28} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(90));

    for code in RuleCode::ALL {
        let spec = code.spec();
        println!(
            "{:<8} {:<28} {:<9} {}",
            spec.id, spec.name, spec.severity, spec.description
        );
    }

    println!("\nCheckers: {}", CHECKER_NAMES.join(", "));

    println!("\nUse --checkers to run a subset, e.g.:");
    println!("  nodelint check --checkers folder-paths,security");
}
