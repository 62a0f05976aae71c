//! `trustctl assignments` - Which certificate serves the VIP and each node.

use anyhow::Result;
use trustctl::AssignmentReport;

use super::{finish, Context};
use crate::output;

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;

    let spinner = ctx.spinner("Waiting for manager API...");
    let report = AssignmentReport::fetch(&client, &ctx.policy()).await;
    finish(spinner);

    output::print_report(ctx.output_format, &report?)
}
