use rust_i18n::t;

/// Execute version command
pub fn execute() {
    println!("dex {}", env!("CARGO_PKG_VERSION"));
    println!("{}", t!("about"));
    println!();
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
}
