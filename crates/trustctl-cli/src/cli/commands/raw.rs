//! `trustctl raw` - Send an arbitrary request to the manager API.

use anyhow::Result;
use serde_json::Value;
use tracing::warn;
use trustctl::{HttpMethod, RawResponse};

use super::{finish, Context};
use crate::cli::args::RawArgs;
use crate::output::{print_structured, OutputFormat};

pub async fn execute(ctx: Context, args: RawArgs) -> Result<()> {
    call(&ctx, &args.method, &args.path, args.data.as_deref()).await
}

/// Send one request and print whatever came back
pub async fn call(ctx: &Context, method: &str, path: &str, data: Option<&str>) -> Result<()> {
    let method: HttpMethod = method.parse()?;
    let body = data.filter(|d| !d.trim().is_empty()).map(parse_body);
    let client = ctx.client()?;

    let spinner = ctx.spinner("Waiting for manager API...");
    let response = client.raw(method, path, body.as_ref()).await;
    finish(spinner);

    print_response(ctx.output_format, &response?)
}

/// JSON if it parses, otherwise the text as a JSON string
pub fn parse_body(data: &str) -> Value {
    serde_json::from_str(data).unwrap_or_else(|e| {
        warn!(error = %e, "payload is not valid JSON, sending as string");
        eprintln!("Payload is not valid JSON, sending as string.");
        Value::String(data.to_string())
    })
}

fn print_response(format: OutputFormat, response: &RawResponse) -> Result<()> {
    match response {
        RawResponse::Json(value) => {
            if !print_structured(format, value)? {
                println!("{}", serde_json::to_string_pretty(value)?);
            }
        }
        other => println!("{other}"),
    }
    Ok(())
}
