//! `sesame delete`: remove a service or one of its users.

use crate::cave::Cave;
use crate::cli::{normalise, output, show_secret, Context};
use crate::errors::Result;

use super::pick_user;

/// Execute the `delete` command, showing the passphrase being retired.
pub fn execute(ctx: &Context, cave: &mut Cave, service: &str, user: Option<&str>) -> Result<()> {
    let service = normalise(service);
    let user = pick_user(cave, &service, user)?;
    let revealed = cave.delete(&service, user.as_deref())?;

    if !ctx.quiet {
        let item = &revealed.item;
        output::success(&format!("Deleted {} for {}", item.user, item.service));
    }
    show_secret("Old passphrase", &revealed.passphrase, ctx)
}
