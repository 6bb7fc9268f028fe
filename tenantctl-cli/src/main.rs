use clap::Parser;
use tokio_util::sync::CancellationToken;

mod args;
mod cmd;
mod commands;
mod config;
mod exit_codes;
mod logging;
mod output;
mod utils;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "tenantctl", version, about = "Manage identity tenants from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    output: OutputArgs,
    #[command(flatten)]
    tenant: TenantArgs,
    /// Log requests and retries to stderr.
    #[arg(long, global = true)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupted, cancelling in-flight request");
                on_interrupt.cancel();
            }
        });
        run_command(cli.command, cli.tenant, cli.output, cancel).await
    });
    std::process::exit(exit_code);
}

async fn run_command(command: Command, tenant: TenantArgs, output: OutputArgs, cancel: CancellationToken) -> i32 {
    match command {
        Command::Api {
            first,
            second,
            data,
            query,
            force,
            request,
        } => {
            let inv = cmd::api::ApiInvocation {
                first,
                second,
                data,
                query,
                force,
            };
            cmd::api::api_cmd(inv, request, tenant, output, cancel).await
        }
        Command::List { resource, request } => {
            cmd::resources::list_cmd(resource, request, tenant, output, cancel).await
        }
        Command::Show { resource, id, request } => {
            cmd::resources::show_cmd(resource, id, request, tenant, output, cancel).await
        }
    }
}
