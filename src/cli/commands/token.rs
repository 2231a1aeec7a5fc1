use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "Account id the token authenticates as")]
    pub account_id: Uuid,

    #[arg(long, default_value = "local", help = "Username embedded in the claims")]
    pub username: String,

    #[arg(long, default_value_t = 24, help = "Token lifetime in hours")]
    pub ttl_hours: i64,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true, help = "Signing secret shared with the server")]
    pub secret: String,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let claims = Claims::new(args.account_id, args.username, chrono::Duration::hours(args.ttl_hours));
    let token = generate_jwt(&claims, &args.secret)?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "expires_at": claims.exp })),
        )?,
    }
    Ok(())
}
