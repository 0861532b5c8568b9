//! Logging stack: logging operator, Loki and cluster-wide log output.

mod ask;
pub mod spec;

use crate::codec::{Decode, Document, Fields, decode, encode, merge_owned};
use crate::error::ServiceError;
use crate::question::MenuChoice;
use crate::services::schema::check_schema;
use crate::services::{BaseOutput, ServiceManager, Session, ingress_secret};
use crate::table::{DisplayTable, Section};
use crate::traits::{ServiceDetails, ServiceStatus};
use anyhow::{Context, Result};
use ask::ask_logging;
use spec::LoggingSpec;
use tracing::warn;

pub struct LoggingManager;

impl LoggingManager {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct LoggingOutput {
    loki: BaseOutput,
    logging_operator_version: String,
}

impl Decode for LoggingOutput {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            loki: fields.decode("loki")?,
            logging_operator_version: fields.object("loggingOperator")?.string("version")?,
        })
    }
}

impl ServiceManager for LoggingManager {
    fn readable_name(&self) -> &'static str {
        "Logging"
    }

    fn service_name(&self) -> &'static str {
        "logging"
    }

    fn build_activate_request(&self, session: &Session<'_>) -> Result<Document> {
        let spec = ask_logging(session, &LoggingSpec::baseline())?;
        encode(&spec)
    }

    fn build_update_request(&self, session: &Session<'_>, spec: &mut Document) -> Result<()> {
        let current: LoggingSpec =
            decode(spec).context("service specification does not conform to schema")?;
        let updated = ask_logging(session, &current)?;

        merge_owned(spec, encode(&updated)?, &LoggingSpec::schema());
        Ok(())
    }

    fn validate_spec(&self, spec: &Document) -> Result<()> {
        let typed: LoggingSpec = decode(spec)?;
        check_schema(&LoggingSpec::schema(), &encode(&typed)?)?;
        typed.validate()?;
        Ok(())
    }

    fn write_details_table(&self, details: &ServiceDetails) -> DisplayTable {
        let mut table = DisplayTable::new();
        table.push(
            "Logging",
            Section::new().row("Status", &details.status),
        );

        if details.status == ServiceStatus::Inactive {
            return table;
        }

        let (output, spec) = match (
            decode::<LoggingOutput>(&details.output),
            decode::<LoggingSpec>(&details.spec),
        ) {
            (Ok(output), Ok(spec)) => (output, spec),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "failed to decode logging details");
                return table;
            }
        };

        table.push(
            "Logging_operator",
            Section::new()
                .row("version", &output.logging_operator_version)
                .row("metrics", spec.logging.metrics)
                .row("tls", spec.logging.tls),
        );

        if spec.loki.enabled {
            let ingress = spec.loki.ingress.as_ref();
            table.push(
                "Loki",
                output.loki.section(ingress_secret(ingress), ingress),
            );
        }

        if spec.cluster_output.enabled {
            let provider = spec.cluster_output.provider.unwrap_or_default();
            table.push(
                "Cluster_output",
                Section::new()
                    .row("provider", provider.name.map(|n| n.label()).unwrap_or_default())
                    .row("bucket", provider.bucket)
                    .row("secretID", provider.secret_id),
            );
        }

        table
    }
}
