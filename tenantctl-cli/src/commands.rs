use clap::Subcommand;
use tenantctl_transport::Resource;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Makes an authenticated HTTP request to the management API and prints the response as JSON.
    ///
    /// The method is optional: without it, GET is used, or POST when data is given.
    Api {
        /// Method (get, post, put, patch, delete) or, when omitted, the path.
        #[arg(value_name = "METHOD|PATH")]
        first: String,
        /// Path under /api/v2/, e.g. "tenants/settings".
        #[arg(value_name = "PATH")]
        second: Option<String>,
        /// JSON payload. Can also be piped in on stdin, which is sent as the body
        /// but does not change the default method from GET.
        #[arg(long, short)]
        data: Option<String>,
        #[arg(long = "query", short, value_name = "KEY=VALUE")]
        query: Vec<String>,
        /// Required for DELETE requests.
        #[arg(long)]
        force: bool,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Lists a collection, or prints a tenant-wide setting.
    List {
        resource: Resource,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Shows one item of a collection by id.
    Show {
        resource: Resource,
        id: Option<String>,
        #[command(flatten)]
        request: RequestArgs,
    },
}
