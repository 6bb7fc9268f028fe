use tenantctl_transport::ClientError;
use tenantctl_transport::client::ApiMethod;
use tokio_util::sync::CancellationToken;

use crate::config::resolve_tenant;
use crate::exit_codes;
use crate::output::{print_error, print_result, print_warning};
use crate::utils::{build_client, exit_code_for, parse_query, read_piped_stdin};
use crate::{OutputArgs, RequestArgs, TenantArgs};

pub struct ApiInvocation {
    pub first: String,
    pub second: Option<String>,
    pub data: Option<String>,
    pub query: Vec<String>,
    pub force: bool,
}

impl ApiInvocation {
    /// `(method, path)`: with two positionals the first one is the method.
    fn method_and_path(&self) -> (Option<&str>, &str) {
        match &self.second {
            Some(path) => (Some(self.first.as_str()), path.as_str()),
            None => (None, self.first.as_str()),
        }
    }

    /// Only `--data` switches the default to POST; piped input alone keeps GET.
    fn method(&self) -> Result<ApiMethod, ClientError> {
        ApiMethod::resolve(self.method_and_path().0, self.data.is_some())
    }
}

pub async fn api_cmd(
    inv: ApiInvocation,
    request: RequestArgs,
    tenant: TenantArgs,
    output: OutputArgs,
    cancel: CancellationToken,
) -> i32 {
    let piped = match read_piped_stdin() {
        Ok(b) => b,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to read stdin: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let body = match (&inv.data, piped.is_empty()) {
        (Some(flag), false) => {
            print_warning(
                output.format,
                output.quiet,
                "JSON data was provided through both --data and stdin; using --data",
            );
            flag.clone().into_bytes()
        }
        (Some(flag), true) => flag.clone().into_bytes(),
        (None, _) => piped,
    };
    let path = inv.method_and_path().1;
    let method = match inv.method() {
        Ok(m) => m,
        Err(e) => return fail(&output, &e),
    };
    if let Err(e) = tenantctl_transport::client::validate_payload(&body) {
        return fail(&output, &e);
    }
    if method == ApiMethod::Delete && !inv.force {
        print_error(
            output.format,
            output.quiet,
            "refusing to send DELETE without --force",
        );
        return exit_codes::INVALID_INPUT;
    }

    let query = match parse_query(&inv.query) {
        Ok(q) => q,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::INVALID_INPUT;
        }
    };

    let tenant = match resolve_tenant(tenant.config.as_deref(), tenant.tenant.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::INVALID_INPUT;
        }
    };
    let client = match build_client(&tenant, &request, &cancel) {
        Ok(c) => c,
        Err(e) => return fail(&output, &e),
    };

    let resp = match client.call(method, path, &query, body).await {
        Ok(r) => r,
        Err(e) => return fail(&output, &e),
    };

    if resp.body.is_empty() {
        return status_exit(resp.status);
    }
    match serde_json::from_slice::<serde_json::Value>(&resp.body) {
        Ok(json) => {
            print_result(output.format, output.quiet, &json);
            status_exit(resp.status)
        }
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("response from {path} is not JSON (status {}): {e}", resp.status),
            );
            exit_codes::RUNTIME_ERROR
        }
    }
}

/// The body has already been printed; non-2xx still fails the command.
fn status_exit(status: u16) -> i32 {
    if (200..300).contains(&status) {
        exit_codes::SUCCESS
    } else {
        exit_codes::REQUEST_FAILED
    }
}

fn fail(output: &OutputArgs, err: &ClientError) -> i32 {
    print_error(output.format, output.quiet, &err.to_string());
    exit_code_for(err)
}
