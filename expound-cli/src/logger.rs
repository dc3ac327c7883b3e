use std::str::FromStr;

use logforth::{append::Stderr, filter::EnvFilter};

use crate::args::Args;

pub(super) fn init(args: &Args) {
    let filter = EnvFilter::from_str(&args.log_filter)
        .unwrap_or_else(|_| EnvFilter::from_str("warn").expect("'warn' is a valid env filter"));

    logforth::builder()
        .dispatch(|d| d.filter(filter).append(Stderr::default()))
        .apply();
}
