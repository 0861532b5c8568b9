//! Monitoring stack: Grafana, Prometheus, Alertmanager, Pushgateway and exporters.

mod ask;
pub mod spec;

use crate::codec::{Decode, Document, Fields, decode, encode, merge_owned};
use crate::error::ServiceError;
use crate::services::schema::check_schema;
use crate::services::{BaseOutput, ServiceManager, Session, ingress_secret};
use crate::table::{DisplayTable, Section};
use crate::traits::{ServiceDetails, ServiceStatus};
use anyhow::{Context, Result};
use ask::ask_monitoring;
use spec::MonitoringSpec;
use tracing::warn;

pub struct MonitoringManager;

impl MonitoringManager {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MonitoringManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Live output reported by the backend
#[derive(Debug, Default)]
struct MonitoringOutput {
    grafana: BaseOutput,
    prometheus: BaseOutput,
    alertmanager: BaseOutput,
    pushgateway: BaseOutput,
    prometheus_operator_version: String,
}

impl Decode for MonitoringOutput {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            grafana: fields.decode("grafana")?,
            prometheus: fields.decode("prometheus")?,
            alertmanager: fields.decode("alertmanager")?,
            pushgateway: fields.decode("pushgateway")?,
            prometheus_operator_version: fields.object("prometheusOperator")?.string("version")?,
        })
    }
}

impl ServiceManager for MonitoringManager {
    fn readable_name(&self) -> &'static str {
        "Monitoring"
    }

    fn service_name(&self) -> &'static str {
        "monitoring"
    }

    fn build_activate_request(&self, session: &Session<'_>) -> Result<Document> {
        let spec = ask_monitoring(session, &MonitoringSpec::baseline())?;
        encode(&spec)
    }

    fn build_update_request(&self, session: &Session<'_>, spec: &mut Document) -> Result<()> {
        let current: MonitoringSpec =
            decode(spec).context("service specification does not conform to schema")?;
        let updated = ask_monitoring(session, &current)?;

        merge_owned(spec, encode(&updated)?, &MonitoringSpec::schema());
        Ok(())
    }

    fn validate_spec(&self, spec: &Document) -> Result<()> {
        let typed: MonitoringSpec = decode(spec)?;
        check_schema(&MonitoringSpec::schema(), &encode(&typed)?)?;
        typed.validate()?;
        Ok(())
    }

    fn write_details_table(&self, details: &ServiceDetails) -> DisplayTable {
        let mut table = DisplayTable::new();
        table.push(
            "Monitoring",
            Section::new().row("Status", &details.status),
        );

        if details.status == ServiceStatus::Inactive {
            return table;
        }

        let output: MonitoringOutput = match decode(&details.output) {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "failed to decode monitoring output");
                return table;
            }
        };
        let spec: MonitoringSpec = match decode(&details.spec) {
            Ok(spec) => spec,
            Err(e) => {
                warn!(error = %e, "failed to decode monitoring specification");
                return table;
            }
        };

        if spec.grafana.enabled {
            table.push(
                "Grafana",
                output
                    .grafana
                    .section(&spec.grafana.secret_id, spec.grafana.ingress.as_ref()),
            );
        }

        if spec.prometheus.enabled {
            let ingress = spec.prometheus.ingress.as_ref();
            table.push(
                "Prometheus",
                output
                    .prometheus
                    .section(ingress_secret(ingress), ingress),
            );

            let storage = spec.prometheus.storage.clone().unwrap_or_default();
            table.push(
                "Prometheus_storage",
                Section::new()
                    .row("class", storage.class)
                    .row("size", storage.size)
                    .row("retention", storage.retention),
            );
        }

        if spec.alertmanager.enabled {
            let ingress = spec.alertmanager.ingress.as_ref();
            table.push(
                "Alertmanager",
                output
                    .alertmanager
                    .section(ingress_secret(ingress), ingress),
            );

            if let Some(provider) = &spec.alertmanager.provider {
                if provider.pager_duty.enabled {
                    table.push(
                        "Alertmanager_provider",
                        Section::new()
                            .row("provider", "PagerDuty")
                            .row("url", &provider.pager_duty.url)
                            .row("secretID", &provider.pager_duty.secret_id)
                            .row("sendResolved", provider.pager_duty.send_resolved),
                    );
                } else if provider.slack.enabled {
                    table.push(
                        "Alertmanager_provider",
                        Section::new()
                            .row("provider", "Slack")
                            .row("channel", &provider.slack.channel)
                            .row("secretID", &provider.slack.secret_id)
                            .row("sendResolved", provider.slack.send_resolved),
                    );
                }
            }
        }

        if spec.pushgateway.enabled {
            let ingress = spec.pushgateway.ingress.as_ref();
            table.push(
                "Pushgateway",
                output
                    .pushgateway
                    .section(ingress_secret(ingress), ingress),
            );
        }

        if spec.exporters.enabled {
            let enabled = |e: &Option<spec::ExporterSpec>| e.as_ref().is_some_and(|e| e.enabled);
            table.push(
                "Exporters",
                Section::new()
                    .row("nodeExporter", enabled(&spec.exporters.node_exporter))
                    .row("kubeStateMetrics", enabled(&spec.exporters.kube_state_metrics)),
            );
        }

        table.push(
            "Prometheus_operator",
            Section::new().row("version", &output.prometheus_operator_version),
        );

        table
    }
}
