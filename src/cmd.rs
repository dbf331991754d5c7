use crate::config::ClusterId;
use clap::Parser;

const ARG_SHORT_CLUSTER: char = 'c';
const ARG_SHORT_REGION: char = 'R';
const ARG_SHORT_ROLE: char = 'r';
const ARG_SHORT_DEBUG: char = 'd';

fn validate_cluster_id(s: &str) -> Result<ClusterId, String> {
    ClusterId::new(s).map_err(|err| err.to_string())
}

/// Prints a Kubernetes `ExecCredential` carrying a short-lived EKS authentication token.
#[derive(Parser, Debug)]
#[command(about, version)]
pub struct Cli {
    /// The name of the EKS cluster for which to generate the authentication token.
    #[arg(short = ARG_SHORT_CLUSTER, long, env = "EKS_CLUSTER_NAME", value_parser = validate_cluster_id)]
    pub cluster_name: ClusterId,

    /// The AWS region used to sign the token.
    /// If not provided, the region is resolved from the AWS environment and profile.
    #[arg(short = ARG_SHORT_REGION, long)]
    pub region: Option<String>,

    /// Optional IAM role ARN to assume before signing.
    #[arg(short = ARG_SHORT_ROLE, long)]
    pub role: Option<String>,

    /// Session name used when assuming `--role`.
    /// Defaults to `eks-auth`.
    #[arg(long, requires = "role")]
    pub session_name: Option<String>,

    /// Disable TLS certificate verification while resolving credentials.
    /// Only use this against endpoints you control.
    #[arg(long, default_value_t = false)]
    pub insecure_skip_tls_verify: bool,

    /// Print debug diagnostics to stderr.
    #[arg(short = ARG_SHORT_DEBUG, long, default_value_t = false)]
    pub debug: bool,
}
