use anyhow::{Result, bail};
use canonical_email::LookupMx;

use crate::args::Cli;

pub type Transport = Box<dyn LookupMx + Send + Sync>;

pub fn build(cli: &Cli) -> Result<Transport> {
    match cli.transport.as_str() {
        #[cfg(feature = "with-mx")]
        "system" => {
            use anyhow::Context;
            let resolver = canonical_email::SystemResolver::from_system_conf()
                .context("system resolver initialization")?;
            Ok(Box::new(resolver))
        }
        #[cfg(feature = "with-doh")]
        "doh" => {
            let resolver = match &cli.doh_endpoint {
                Some(endpoint) => canonical_email::DohResolver::with_endpoint(endpoint.clone()),
                None => canonical_email::DohResolver::new(),
            };
            Ok(Box::new(resolver))
        }
        other => bail!(
            "unknown or disabled --transport '{other}', use: system (with-mx) | doh (with-doh)"
        ),
    }
}
