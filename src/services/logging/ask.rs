use super::spec::{
    ClusterOutputSpec, LokiSpec, LoggingSpec, OperatorSpec, OutputProviderSpec, StorageProvider,
};
use crate::codec::keep_unset;
use crate::question::{MenuChoice, Question, ask, ask_choice, ask_confirm};
use crate::services::Session;
use crate::services::ingress::{IngressAuth, ask_ingress};
use anyhow::{Context, Result};

pub fn ask_logging(session: &Session<'_>, defaults: &LoggingSpec) -> Result<LoggingSpec> {
    Ok(LoggingSpec {
        logging: ask_operator(session, &defaults.logging)
            .context("error during getting logging operator options")?,
        loki: ask_loki(session, &defaults.loki).context("error during getting Loki options")?,
        cluster_output: ask_cluster_output(session, &defaults.cluster_output)
            .context("error during getting cluster output options")?,
    })
}

fn ask_operator(session: &Session<'_>, defaults: &OperatorSpec) -> Result<OperatorSpec> {
    let mut result = OperatorSpec::default();
    ask(
        session.input,
        vec![
            Question::confirm(
                "Do you want to enable logging metrics?",
                defaults.metrics,
                &mut result.metrics,
            ),
            Question::confirm("Do you want to enable TLS?", defaults.tls, &mut result.tls),
        ],
    )?;
    Ok(result)
}

fn ask_loki(session: &Session<'_>, defaults: &LokiSpec) -> Result<LokiSpec> {
    let enabled = ask_confirm(session.input, "Do you want to enable Loki?", defaults.enabled)
        .context("error during getting Loki enabled")?;

    let mut result = LokiSpec {
        enabled,
        ..LokiSpec::default()
    };
    if !enabled {
        return Ok(result);
    }

    let ingress = ask_ingress(
        session,
        "Loki",
        &defaults.ingress.clone().unwrap_or_default(),
        IngressAuth::Required,
    )?;
    result.ingress = keep_unset(&defaults.ingress, ingress);

    Ok(result)
}

fn ask_cluster_output(
    session: &Session<'_>,
    defaults: &ClusterOutputSpec,
) -> Result<ClusterOutputSpec> {
    let enabled = ask_confirm(
        session.input,
        "Do you want to enable cluster output?",
        defaults.enabled,
    )
    .context("error during getting cluster output enabled")?;

    let mut result = ClusterOutputSpec {
        enabled,
        ..ClusterOutputSpec::default()
    };
    if !enabled {
        return Ok(result);
    }

    let provider_defaults = defaults.provider.clone().unwrap_or_default();
    let name = ask_choice(
        session.input,
        "Select cluster output provider:",
        "cluster output provider",
        Some(provider_defaults.name.unwrap_or(StorageProvider::AmazonS3)),
        false,
    )
    .context("error during getting cluster output provider")?;

    let mut provider = OutputProviderSpec {
        name,
        ..OutputProviderSpec::default()
    };
    ask(
        session.input,
        vec![Question::input(
            "Please provide bucket name:",
            provider_defaults.bucket.as_str(),
            &mut provider.bucket,
        )],
    )
    .context("error during getting bucket name")?;

    if let Some(name) = name {
        // A stored credential only makes sense for the provider it was chosen for
        let current = if provider_defaults.name == Some(name) {
            provider_defaults.secret_id.as_str()
        } else {
            ""
        };
        provider.secret_id = session
            .secrets
            .resolve(name.secret_kind(), current, false)
            .with_context(|| format!("error during getting {} secret", name.label()))?;
    }

    result.provider = keep_unset(&defaults.provider, provider);
    Ok(result)
}
