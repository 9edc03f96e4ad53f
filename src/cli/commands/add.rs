//! `sesame add`: add a service and user and show its first passphrase.

use crate::cave::Cave;
use crate::cli::{normalise, output, show_secret, Context};
use crate::errors::Result;

/// Execute the `add` command.
pub fn execute(
    ctx: &Context,
    cave: &mut Cave,
    service: &str,
    user: &str,
    offset: Option<i64>,
) -> Result<()> {
    let revealed = cave.insert(&normalise(service), &normalise(user), offset)?;
    let item = &revealed.item;

    if !ctx.quiet {
        output::success(&format!(
            "Added {} for {} (index {})",
            item.user, item.service, item.index
        ));
    }
    show_secret("Passphrase", &revealed.passphrase, ctx)
}
