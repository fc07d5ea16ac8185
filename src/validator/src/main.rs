// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Verifies the workload identities available to this pod.

use clap::Parser;
use identity_validator::args::Args;
use identity_validator::compute::ComputeClient;
use identity_validator::keyvault::KeyVaultClient;
use identity_validator::orchestrator::{Orchestrator, Report};
use std::process::ExitCode;
use std::sync::Arc;
use workload_identity_auth::TokenAcquirer;
use workload_identity_auth::endpoint::EndpointDescriptor;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    enable_tracing(&args);
    match run(args).await {
        Ok(report) => {
            tracing::info!("all identity checks passed, {report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("identity validation failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<Report> {
    tracing::info!(
        pod_namespace = args.pod_namespace.as_deref().unwrap_or_default(),
        pod_name = args.pod_name.as_deref().unwrap_or_default(),
        pod_ip = args.pod_ip.as_deref().unwrap_or_default(),
        "starting identity validator"
    );
    let config = args.run_config()?;
    tracing::debug!("Configuration: {config:?}");

    let endpoint =
        EndpointDescriptor::locate(args.msi_endpoint.as_deref())?.with_timeout(config.timeout);
    tracing::info!(endpoint = %endpoint.url(), "located the managed identity endpoint");

    let acquirer = TokenAcquirer::new(&endpoint)?;
    let http = reqwest::Client::builder().timeout(config.timeout).build()?;
    let orchestrator = Orchestrator::new(
        acquirer,
        Arc::new(ComputeClient::new(http.clone())),
        Arc::new(KeyVaultClient::new(http)),
    );
    let report = orchestrator.run(&config).await?;
    Ok(report)
}

fn enable_tracing(args: &Args) {
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("cannot install the tracing subscriber: {e}");
    }
}
