use tenantctl_transport::{ClientError, ManagementClient, Resource};
use tokio_util::sync::CancellationToken;

use crate::config::resolve_tenant;
use crate::exit_codes;
use crate::output::print_error;
use crate::output::print_result;
use crate::utils::{build_client, exit_code_for};
use crate::{OutputArgs, RequestArgs, TenantArgs};

pub async fn list_cmd(
    resource: Resource,
    request: RequestArgs,
    tenant: TenantArgs,
    output: OutputArgs,
    cancel: CancellationToken,
) -> i32 {
    let client = match connect(&request, &tenant, &output, &cancel) {
        Ok(c) => c,
        Err(code) => return code,
    };
    respond(&output, client.list(resource).await)
}

pub async fn show_cmd(
    resource: Resource,
    id: Option<String>,
    request: RequestArgs,
    tenant: TenantArgs,
    output: OutputArgs,
    cancel: CancellationToken,
) -> i32 {
    if id.is_none() && resource.is_collection() {
        print_error(
            output.format,
            output.quiet,
            &format!("{resource} needs an id; use `tenantctl list {resource}` to find one"),
        );
        return exit_codes::INVALID_INPUT;
    }
    let client = match connect(&request, &tenant, &output, &cancel) {
        Ok(c) => c,
        Err(code) => return code,
    };
    respond(&output, client.show(resource, id.as_deref()).await)
}

fn connect(
    request: &RequestArgs,
    tenant: &TenantArgs,
    output: &OutputArgs,
    cancel: &CancellationToken,
) -> Result<ManagementClient, i32> {
    let t = resolve_tenant(tenant.config.as_deref(), tenant.tenant.as_deref()).map_err(|e| {
        print_error(output.format, output.quiet, &e.to_string());
        exit_codes::INVALID_INPUT
    })?;
    build_client(&t, request, cancel).map_err(|e| {
        print_error(output.format, output.quiet, &e.to_string());
        exit_code_for(&e)
    })
}

fn respond(output: &OutputArgs, result: Result<serde_json::Value, ClientError>) -> i32 {
    match result {
        Ok(v) => {
            print_result(output.format, output.quiet, &v);
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_code_for(&e)
        }
    }
}
