//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `starspace_core` linkage.
//! - Print the configuration the core would resolve from the environment.

use starspace_core::{ClientConfig, DateEntryKind, Platform};

fn main() {
    println!("starspace_core ping={}", starspace_core::ping());
    println!("starspace_core version={}", starspace_core::core_version());

    match ClientConfig::from_env() {
        Ok(config) => {
            println!("config api_base_url={}", config.api_base_url);
            println!("config db_path={}", config.db_path.display());
            println!(
                "config request_timeout_secs={}",
                config.request_timeout.as_secs()
            );
        }
        Err(err) => {
            eprintln!("config error={err}");
            std::process::exit(2);
        }
    }

    println!(
        "date_entry mode={}",
        DateEntryKind::for_platform(Platform::current()).as_str()
    );
}
