//! Version command implementation.

use anyhow::Result;

pub fn run() -> Result<()> {
    println!("authwire {}", env!("AUTHWIRE_VERSION"));
    Ok(())
}
