//! Output formatting helpers.

use colored::Colorize;

use authwire_core::HttpResponse;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a yes/no field.
pub fn flag(label: &str, value: bool) {
    field(label, if value { "yes" } else { "no" });
}

/// Print a response body, pretty-printing JSON.
pub fn body(response: &HttpResponse) {
    if response.body.is_empty() {
        return;
    }
    match serde_json::from_slice::<serde_json::Value>(&response.body) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", response.text()),
        },
        Err(_) => println!("{}", response.text()),
    }
}
