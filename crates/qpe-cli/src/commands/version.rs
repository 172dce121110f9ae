//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum phase estimation on a statevector simulator",
        style("QPE").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qpe-ir           Gates, instructions and circuits");
    println!("  qpe-linalg       Dense complex linear algebra");
    println!("  qpe-adapter-sim  Statevector simulator");
    println!("  qpe-core         Unitaries, circuit builder, phase extraction");
    println!("  qpe-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
