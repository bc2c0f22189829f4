//! Shared command-line plumbing: argument macros over `clap`
//! and the `main` wrapper.

pub use clap::{App, Arg};
pub use inflector::Inflector;

use std::fmt::Display;

/// Print the error with its context chain and exit with
/// status 1.
#[inline]
pub fn unwrap_or_exit<T, E: Display>(res: Result<T, E>) -> T {
    match res {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1)
        }
        Ok(t) => t,
    }
}

/// Define `main` running `$name` after logging is set up.
#[macro_export]
macro_rules! sync_main {
    ($name:expr) => {
        fn main() {
            $crate::utils::init_logging();
            $crate::cli::unwrap_or_exit({ $name });
        }
    };
}

/// `clap` app with the crate version and the given summary.
#[macro_export]
macro_rules! args_parser {
    ($name:expr, $about:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
            .about($about)
    }};
}

/// Positional argument; the value name is the upper-cased
/// argument name.
#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

/// Option taking a value, `--kebab-case-name VALUE`.
#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Switch without a value.
#[macro_export]
macro_rules! flag {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).long(&$name.to_kebab_case())
    }};
}
