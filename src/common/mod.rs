//! Base types and functions.

pub use std::collections::{BTreeMap, BTreeSet, HashSet};
pub use std::io::{BufRead, Read, Write};
pub use std::path::{Path, PathBuf};
pub use std::time::{Duration, Instant};

pub use num::{Signed, Zero};

pub use crate::errors::*;

#[macro_use]
pub mod macros;
pub mod config;
pub mod consts;
pub mod msg;

pub use self::config::*;
pub use self::msg::Reporter;

mod revision {
    include!(concat!(env!("OUT_DIR"), "/revision.rs"));
}

lazy_static! {
    static ref version_string: String = if let Some(rev) = revision::REVISION {
        format!("{}#{}", crate_version!(), rev)
    } else {
        crate_version!().to_string()
    };
    /// Version with revision info.
    pub static ref version: &'static str = &version_string;
}

// |===| Type aliases.

/// Rationals, used for exact score computations.
pub type Rat = num::BigRational;
/// Integers.
pub type Int = num::BigInt;

// |===| Helpers.

/// Absolute version of a path, relative paths are resolved against the
/// current directory.
///
/// Does not require the path to exist, contrary to `canonicalize`.
pub fn absolute<P: AsRef<Path>>(path: P) -> Res<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let mut res = std::env::current_dir().chain_err(|| "while retrieving current directory")?;
        res.push(path);
        Ok(res)
    }
}

/// Java-style string hash: wrapping `31 * acc + byte` over the bytes of a
/// string.
///
/// Used for all identity hashes so that artifact names are stable across
/// runs and platforms.
pub fn str_hash(s: &str) -> u64 {
    s.bytes()
        .fold(0u64, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u64))
}

/// Order-sensitive hash of a list of paths, used to name the artifacts of a
/// database subset.
pub fn paths_hash<'a, I>(paths: I) -> u64
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    paths.into_iter().fold(1u64, |acc, path| {
        acc.wrapping_mul(31)
            .wrapping_add(str_hash(&path.to_string_lossy()))
    })
}

/// Renders a rational as a decimal with a fixed number of fractional digits,
/// rounding half away from zero.
///
/// # Examples
///
/// ```rust
/// # use wfolearn::common::*;
/// let rat = Rat::new((-7).into(), 3.into());
/// assert_eq! { rat_to_decimal(&rat, 5), "-2.33333" }
/// let rat = Rat::new(1.into(), 8.into());
/// assert_eq! { rat_to_decimal(&rat, 2), "0.13" }
/// assert_eq! { rat_to_decimal(&Rat::from_integer(42.into()), 0), "42" }
/// ```
pub fn rat_to_decimal(rat: &Rat, digits: usize) -> String {
    let scale: Int = num::pow::pow(Int::from(10), digits);
    let scaled = (rat * Rat::from_integer(scale.clone())).round().to_integer();
    let neg = scaled.is_negative();
    let scaled = scaled.abs();
    let int = &scaled / &scale;
    let frac = &scaled % &scale;
    let sign = if neg && !scaled.is_zero() { "-" } else { "" };
    if digits == 0 {
        format!("{}{}", sign, int)
    } else {
        format!("{}{}.{:0>width$}", sign, int, frac.to_string(), width = digits)
    }
}
