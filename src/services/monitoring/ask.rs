use super::spec::{
    AlertmanagerSpec, ExporterSpec, ExportersSpec, GrafanaSpec, MonitoringSpec,
    NotificationProvider, PagerDutyIntegration, PagerDutySpec, PrometheusSpec, ProviderSpecs,
    PushgatewaySpec, SlackSpec, StorageSpec,
};
use crate::codec::keep_unset;
use crate::error::ServiceError;
use crate::question::{Question, ask, ask_choice, ask_confirm};
use crate::secrets::SecretKind;
use crate::services::Session;
use crate::services::ingress::{IngressAuth, ask_ingress};
use anyhow::{Context, Result};

/// Walk every component, using `defaults` for the offered answers
pub fn ask_monitoring(session: &Session<'_>, defaults: &MonitoringSpec) -> Result<MonitoringSpec> {
    Ok(MonitoringSpec {
        grafana: ask_grafana(session, &defaults.grafana)
            .context("error during getting Grafana options")?,
        prometheus: ask_prometheus(session, &defaults.prometheus)
            .context("error during getting Prometheus options")?,
        alertmanager: ask_alertmanager(session, &defaults.alertmanager)
            .context("error during getting Alertmanager options")?,
        pushgateway: ask_pushgateway(session, &defaults.pushgateway)
            .context("error during getting Pushgateway options")?,
        exporters: ask_exporters(session, &defaults.exporters)
            .context("error during getting exporter options")?,
    })
}

fn ask_grafana(session: &Session<'_>, defaults: &GrafanaSpec) -> Result<GrafanaSpec> {
    let enabled = ask_confirm(session.input, "Do you want to enable Grafana?", defaults.enabled)
        .context("error during getting Grafana enabled")?;

    let mut result = GrafanaSpec {
        enabled,
        ..GrafanaSpec::default()
    };
    if !enabled {
        return Ok(result);
    }

    result.secret_id = session
        .secrets
        .resolve(SecretKind::Password, &defaults.secret_id, true)
        .context("error during getting Grafana secret")?;

    let ingress = ask_ingress(
        session,
        "Grafana",
        &defaults.ingress.clone().unwrap_or_default(),
        IngressAuth::None,
    )
    .context("error during getting Grafana ingress options")?;
    result.ingress = keep_unset(&defaults.ingress, ingress);

    result.dashboards = ask_confirm(
        session.input,
        "Do you want to add default dashboards to Grafana?",
        defaults.dashboards,
    )
    .context("error during getting default dashboards")?;

    Ok(result)
}

fn ask_prometheus(session: &Session<'_>, defaults: &PrometheusSpec) -> Result<PrometheusSpec> {
    let enabled = ask_confirm(
        session.input,
        "Do you want to enable Prometheus?",
        defaults.enabled,
    )
    .context("error during getting Prometheus enabled")?;

    let mut result = PrometheusSpec {
        enabled,
        ..PrometheusSpec::default()
    };
    if !enabled {
        return Ok(result);
    }

    let storage_defaults = defaults.storage.clone().unwrap_or_default();
    let mut storage = StorageSpec::default();
    let mut storage_size = String::new();
    ask(
        session.input,
        vec![
            Question::input(
                "Please provide storage class name for Prometheus:",
                storage_defaults.class.as_str(),
                &mut storage.class,
            )
            .with_help("Leave empty to use default storage class"),
            Question::input(
                "Please provide storage size for Prometheus:",
                storage_defaults.size.to_string(),
                &mut storage_size,
            ),
            Question::input(
                "Please provide retention for Prometheus:",
                storage_defaults.retention.as_str(),
                &mut storage.retention,
            ),
        ],
    )
    .context("error during getting Prometheus storage options")?;

    storage.size = parse_size(&storage_size).context("failed to parse storage size")?;
    result.storage = keep_unset(&defaults.storage, storage);

    let ingress = ask_ingress(
        session,
        "Prometheus",
        &defaults.ingress.clone().unwrap_or_default(),
        IngressAuth::Optional,
    )
    .context("error during getting Prometheus ingress options")?;
    result.ingress = keep_unset(&defaults.ingress, ingress);

    Ok(result)
}

fn parse_size(raw: &str) -> Result<u64, ServiceError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ServiceError::InvalidNumeric {
            field: "Prometheus storage size".to_string(),
            value: raw.to_string(),
        })
}

fn ask_alertmanager(
    session: &Session<'_>,
    defaults: &AlertmanagerSpec,
) -> Result<AlertmanagerSpec> {
    let enabled = ask_confirm(
        session.input,
        "Do you want to enable Alertmanager?",
        defaults.enabled,
    )
    .context("error during getting Alertmanager enabled")?;

    let mut result = AlertmanagerSpec {
        enabled,
        ..AlertmanagerSpec::default()
    };
    if !enabled {
        return Ok(result);
    }

    let provider_defaults = defaults.provider.clone().unwrap_or_default();
    let mut providers = ProviderSpecs::default();

    let chosen = ask_choice(
        session.input,
        "Select notification provider",
        "notification provider",
        provider_defaults.enabled_provider(),
        true,
    )
    .context("error during getting notification provider")?;

    match chosen {
        Some(NotificationProvider::Slack) => {
            providers.slack = ask_slack(session, &provider_defaults.slack)
                .context("error during getting Slack provider options")?;
        }
        Some(NotificationProvider::PagerDuty) => {
            providers.pager_duty = ask_pager_duty(session, &provider_defaults.pager_duty)
                .context("error during getting PagerDuty provider options")?;
        }
        None => {}
    }
    result.provider = keep_unset(&defaults.provider, providers);

    let ingress = ask_ingress(
        session,
        "Alertmanager",
        &defaults.ingress.clone().unwrap_or_default(),
        IngressAuth::Optional,
    )
    .context("error during getting Alertmanager ingress options")?;
    result.ingress = keep_unset(&defaults.ingress, ingress);

    Ok(result)
}

fn ask_slack(session: &Session<'_>, defaults: &SlackSpec) -> Result<SlackSpec> {
    let mut result = SlackSpec {
        enabled: true,
        ..SlackSpec::default()
    };

    result.secret_id = session
        .secrets
        .resolve(SecretKind::Slack, &defaults.secret_id, false)
        .context("error during getting Slack secret")?;

    ask(
        session.input,
        vec![
            Question::input(
                "Provide Slack channel name for the alerts:",
                defaults.channel.as_str(),
                &mut result.channel,
            ),
            Question::confirm(
                "Send resolved notifications as well",
                defaults.send_resolved,
                &mut result.send_resolved,
            ),
        ],
    )
    .context("error during getting Slack options")?;

    Ok(result)
}

fn ask_pager_duty(session: &Session<'_>, defaults: &PagerDutySpec) -> Result<PagerDutySpec> {
    let mut result = PagerDutySpec {
        enabled: true,
        ..PagerDutySpec::default()
    };

    ask(
        session.input,
        vec![Question::input(
            "Provide PagerDuty service endpoint:",
            defaults.url.as_str(),
            &mut result.url,
        )],
    )
    .context("error during getting PagerDuty url")?;

    result.integration_type = ask_choice(
        session.input,
        "Select PagerDuty integration type:",
        "PagerDuty integration type",
        Some(
            defaults
                .integration_type
                .unwrap_or(PagerDutyIntegration::Prometheus),
        ),
        false,
    )
    .context("error during getting PagerDuty integration type")?;

    result.secret_id = session
        .secrets
        .resolve(SecretKind::PagerDuty, &defaults.secret_id, false)
        .context("error during getting PagerDuty secret")?;

    result.send_resolved = ask_confirm(
        session.input,
        "Send resolved notifications as well",
        defaults.send_resolved,
    )
    .context("error during getting PagerDuty send resolved option")?;

    Ok(result)
}

fn ask_pushgateway(session: &Session<'_>, defaults: &PushgatewaySpec) -> Result<PushgatewaySpec> {
    let enabled = ask_confirm(
        session.input,
        "Do you want to enable Pushgateway?",
        defaults.enabled,
    )
    .context("error during getting Pushgateway enabled")?;

    let mut result = PushgatewaySpec {
        enabled,
        ..PushgatewaySpec::default()
    };
    if !enabled {
        return Ok(result);
    }

    let ingress = ask_ingress(
        session,
        "Pushgateway",
        &defaults.ingress.clone().unwrap_or_default(),
        IngressAuth::Optional,
    )
    .context("error during getting Pushgateway ingress options")?;
    result.ingress = keep_unset(&defaults.ingress, ingress);

    Ok(result)
}

fn ask_exporters(session: &Session<'_>, defaults: &ExportersSpec) -> Result<ExportersSpec> {
    let enabled = ask_confirm(
        session.input,
        "Do you want to enable exporters?",
        defaults.enabled,
    )
    .context("error during getting exporters enabled")?;

    let mut result = ExportersSpec {
        enabled,
        ..ExportersSpec::default()
    };
    if !enabled {
        return Ok(result);
    }

    let mut node_exporter = false;
    let mut kube_state_metrics = false;
    ask(
        session.input,
        vec![
            Question::confirm(
                "Do you want to enable node exporter?",
                defaults.node_exporter.as_ref().is_some_and(|e| e.enabled),
                &mut node_exporter,
            ),
            Question::confirm(
                "Do you want to enable kube-state-metrics?",
                defaults.kube_state_metrics.as_ref().is_some_and(|e| e.enabled),
                &mut kube_state_metrics,
            ),
        ],
    )
    .context("error during getting exporter options")?;

    result.node_exporter = keep_unset(
        &defaults.node_exporter,
        ExporterSpec {
            enabled: node_exporter,
        },
    );
    result.kube_state_metrics = keep_unset(
        &defaults.kube_state_metrics,
        ExporterSpec {
            enabled: kube_state_metrics,
        },
    );

    Ok(result)
}
