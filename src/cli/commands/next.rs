//! `sesame next`: move a service on to its next passphrase.

use crate::cave::Cave;
use crate::cli::{normalise, output, show_secret, Context};
use crate::errors::Result;

use super::pick_user;

/// Execute the `next` command.
pub fn execute(
    ctx: &Context,
    cave: &mut Cave,
    service: &str,
    user: Option<&str>,
    offset: Option<i64>,
) -> Result<()> {
    let service = normalise(service);
    let user = pick_user(cave, &service, user)?;
    let revealed = cave.update(&service, user.as_deref(), offset)?;

    if !ctx.quiet {
        let item = &revealed.item;
        output::success(&format!(
            "Updated {} for {} (now index {})",
            item.user, item.service, item.index
        ));
    }
    show_secret("Passphrase", &revealed.passphrase, ctx)
}
