use crate::codec::{Decode, Fields, is_false};
use crate::error::ServiceError;
use crate::question::MenuChoice;
use crate::services::ingress::{IngressAuth, IngressSpec, validate_ingress};
use crate::services::schema::{RETENTION_PATTERN, ingress_schema, when_enabled};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSpec {
    pub grafana: GrafanaSpec,
    pub prometheus: PrometheusSpec,
    pub alertmanager: AlertmanagerSpec,
    pub pushgateway: PushgatewaySpec,
    pub exporters: ExportersSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrafanaSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_id: String,
    #[serde(skip_serializing_if = "is_false")]
    pub dashboards: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class: String,
    pub size: u64,
    pub retention: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertmanagerSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderSpecs>,
}

/// Notification providers of Alertmanager; at most one is expected to be enabled
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSpecs {
    pub slack: SlackSpec,
    pub pager_duty: PagerDutySpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_id: String,
    pub send_resolved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagerDutySpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_type: Option<PagerDutyIntegration>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_id: String,
    pub send_resolved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushgatewaySpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportersSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_exporter: Option<ExporterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kube_state_metrics: Option<ExporterSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExporterSpec {
    pub enabled: bool,
}

/// Alertmanager notification provider menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationProvider {
    Slack,
    PagerDuty,
}

impl MenuChoice for NotificationProvider {
    const ALL: &'static [Self] = &[NotificationProvider::Slack, NotificationProvider::PagerDuty];

    fn label(self) -> &'static str {
        match self {
            NotificationProvider::Slack => "Slack",
            NotificationProvider::PagerDuty => "PagerDuty",
        }
    }

    fn wire(self) -> &'static str {
        match self {
            NotificationProvider::Slack => "slack",
            NotificationProvider::PagerDuty => "pagerDuty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PagerDutyIntegration {
    #[serde(rename = "prometheus")]
    Prometheus,
    #[serde(rename = "eventsApiV2")]
    EventsApiV2,
}

impl MenuChoice for PagerDutyIntegration {
    const ALL: &'static [Self] = &[
        PagerDutyIntegration::Prometheus,
        PagerDutyIntegration::EventsApiV2,
    ];

    fn label(self) -> &'static str {
        match self {
            PagerDutyIntegration::Prometheus => "Prometheus",
            PagerDutyIntegration::EventsApiV2 => "Events API v2",
        }
    }

    fn wire(self) -> &'static str {
        match self {
            PagerDutyIntegration::Prometheus => "prometheus",
            PagerDutyIntegration::EventsApiV2 => "eventsApiV2",
        }
    }
}

impl ProviderSpecs {
    /// Provider to preselect when re-configuring: PagerDuty wins over Slack
    pub fn enabled_provider(&self) -> Option<NotificationProvider> {
        if self.pager_duty.enabled {
            Some(NotificationProvider::PagerDuty)
        } else if self.slack.enabled {
            Some(NotificationProvider::Slack)
        } else {
            None
        }
    }
}

impl Decode for MonitoringSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            grafana: fields.decode("grafana")?,
            prometheus: fields.decode("prometheus")?,
            alertmanager: fields.decode("alertmanager")?,
            pushgateway: fields.decode("pushgateway")?,
            exporters: fields.decode("exporters")?,
        })
    }
}

impl Decode for GrafanaSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            secret_id: fields.string("secretId")?,
            dashboards: fields.bool("dashboards")?,
            ingress: fields.decode_optional("ingress")?,
        })
    }
}

impl Decode for PrometheusSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            storage: fields.decode_optional("storage")?,
            ingress: fields.decode_optional("ingress")?,
        })
    }
}

impl Decode for StorageSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            class: fields.string("class")?,
            size: fields.uint("size")?,
            retention: fields.string("retention")?,
        })
    }
}

impl Decode for AlertmanagerSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            ingress: fields.decode_optional("ingress")?,
            provider: fields.decode_optional("provider")?,
        })
    }
}

impl Decode for ProviderSpecs {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            slack: fields.decode(NotificationProvider::Slack.wire())?,
            pager_duty: fields.decode(NotificationProvider::PagerDuty.wire())?,
        })
    }
}

impl Decode for SlackSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            channel: fields.string("channel")?,
            secret_id: fields.string("secretId")?,
            send_resolved: fields.bool("sendResolved")?,
        })
    }
}

impl Decode for PagerDutySpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            url: fields.string("url")?,
            integration_type: fields.choice("integrationType")?,
            secret_id: fields.string("secretId")?,
            send_resolved: fields.bool("sendResolved")?,
        })
    }
}

impl Decode for PushgatewaySpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            ingress: fields.decode_optional("ingress")?,
        })
    }
}

impl Decode for ExportersSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            node_exporter: fields.decode_optional("nodeExporter")?,
            kube_state_metrics: fields.decode_optional("kubeStateMetrics")?,
        })
    }
}

impl Decode for ExporterSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
        })
    }
}

impl MonitoringSpec {
    /// Defaults offered when the service is activated for the first time
    pub fn baseline() -> Self {
        Self {
            grafana: GrafanaSpec {
                enabled: true,
                dashboards: true,
                ingress: Some(IngressSpec::at("/grafana")),
                ..GrafanaSpec::default()
            },
            prometheus: PrometheusSpec {
                enabled: true,
                storage: Some(StorageSpec {
                    class: String::new(),
                    size: 100,
                    retention: "10d".to_string(),
                }),
                ingress: Some(IngressSpec::at("/prometheus")),
            },
            alertmanager: AlertmanagerSpec {
                enabled: true,
                ingress: Some(IngressSpec::at("/alertmanager")),
                provider: Some(ProviderSpecs {
                    slack: SlackSpec {
                        send_resolved: true,
                        ..SlackSpec::default()
                    },
                    pager_duty: PagerDutySpec {
                        send_resolved: true,
                        ..PagerDutySpec::default()
                    },
                }),
            },
            pushgateway: PushgatewaySpec {
                enabled: false,
                ingress: Some(IngressSpec::disabled_at("/pushgateway")),
            },
            exporters: ExportersSpec {
                enabled: true,
                node_exporter: Some(ExporterSpec { enabled: true }),
                kube_state_metrics: Some(ExporterSpec { enabled: true }),
            },
        }
    }

    /// Conditional business rules; the first violation is reported
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.grafana.enabled {
            if let Some(ingress) = &self.grafana.ingress {
                validate_ingress("Grafana", ingress, IngressAuth::None)?;
            }
        }

        if self.prometheus.enabled {
            match &self.prometheus.storage {
                None => {
                    return Err(ServiceError::validation(
                        "Prometheus storage is required when Prometheus is enabled",
                    ));
                }
                Some(storage) if storage.size == 0 => {
                    return Err(ServiceError::validation(
                        "Prometheus storage size must be at least 1",
                    ));
                }
                Some(storage) if storage.retention.is_empty() => {
                    return Err(ServiceError::validation("Prometheus retention is required"));
                }
                Some(_) => {}
            }
            if let Some(ingress) = &self.prometheus.ingress {
                validate_ingress("Prometheus", ingress, IngressAuth::Optional)?;
            }
        }

        if self.alertmanager.enabled {
            if let Some(ingress) = &self.alertmanager.ingress {
                validate_ingress("Alertmanager", ingress, IngressAuth::Optional)?;
            }
            if let Some(provider) = &self.alertmanager.provider {
                provider.validate()?;
            }
        }

        if self.pushgateway.enabled {
            if let Some(ingress) = &self.pushgateway.ingress {
                validate_ingress("Pushgateway", ingress, IngressAuth::Optional)?;
            }
        }

        Ok(())
    }

    /// JSON Schema for the canonical monitoring document
    pub fn schema() -> Value {
        let integrations: Vec<&str> = PagerDutyIntegration::ALL.iter().map(|i| i.wire()).collect();
        let exporter = json!({
            "type": "object",
            "properties": {"enabled": {"type": "boolean"}}
        });
        let component = |extra: Value| {
            let mut schema = json!({
                "type": "object",
                "properties": {
                    "enabled": {"type": "boolean"},
                    "ingress": ingress_schema()
                }
            });
            if let (Some(props), Value::Object(extra)) =
                (schema["properties"].as_object_mut(), extra)
            {
                props.extend(extra);
            }
            schema
        };

        let mut prometheus = component(json!({
            "storage": {
                "type": "object",
                "properties": {
                    "class": {"type": "string"},
                    "size": {"type": "integer", "minimum": 0},
                    "retention": {"type": "string"}
                }
            }
        }));
        prometheus["allOf"] = json!([when_enabled(json!({
            "required": ["storage"],
            "properties": {
                "storage": {
                    "required": ["size", "retention"],
                    "properties": {
                        "size": {"minimum": 1},
                        "retention": {"pattern": RETENTION_PATTERN}
                    }
                }
            }
        }))]);

        json!({
            "type": "object",
            "properties": {
                "grafana": component(json!({
                    "secretId": {"type": "string"},
                    "dashboards": {"type": "boolean"}
                })),
                "prometheus": prometheus,
                "alertmanager": component(json!({
                    "provider": {
                        "type": "object",
                        "properties": {
                            "slack": {
                                "type": "object",
                                "properties": {
                                    "enabled": {"type": "boolean"},
                                    "channel": {"type": "string"},
                                    "secretId": {"type": "string"},
                                    "sendResolved": {"type": "boolean"}
                                }
                            },
                            "pagerDuty": {
                                "type": "object",
                                "properties": {
                                    "enabled": {"type": "boolean"},
                                    "url": {"type": "string", "pattern": "^$|^https?://"},
                                    "integrationType": {"enum": integrations},
                                    "secretId": {"type": "string"},
                                    "sendResolved": {"type": "boolean"}
                                }
                            }
                        }
                    }
                })),
                "pushgateway": component(json!({})),
                "exporters": {
                    "type": "object",
                    "properties": {
                        "enabled": {"type": "boolean"},
                        "nodeExporter": exporter.clone(),
                        "kubeStateMetrics": exporter
                    }
                }
            }
        })
    }
}

impl ProviderSpecs {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.slack.enabled {
            if self.slack.channel.is_empty() {
                return Err(ServiceError::validation("Slack channel is required"));
            }
            if self.slack.secret_id.is_empty() {
                return Err(ServiceError::validation("Slack requires a webhook secret"));
            }
        }
        if self.pager_duty.enabled {
            if self.pager_duty.url.is_empty() {
                return Err(ServiceError::validation(
                    "PagerDuty service endpoint is required",
                ));
            }
            if self.pager_duty.integration_type.is_none() {
                return Err(ServiceError::validation(
                    "PagerDuty integration type is required",
                ));
            }
            if self.pager_duty.secret_id.is_empty() {
                return Err(ServiceError::validation(
                    "PagerDuty requires an integration key secret",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};

    #[test]
    fn test_baseline_round_trips() {
        let spec = MonitoringSpec::baseline();
        let document = encode(&spec).unwrap();
        assert_eq!(decode::<MonitoringSpec>(&document).unwrap(), spec);
    }

    #[test]
    fn test_baseline_is_valid() {
        let spec = MonitoringSpec::baseline();
        assert!(spec.validate().is_ok());

        let document = encode(&spec).unwrap();
        assert!(crate::services::schema::check_schema(&MonitoringSpec::schema(), &document).is_ok());
    }

    #[test]
    fn test_provider_wire_keys() {
        let document = encode(&MonitoringSpec::baseline()).unwrap();
        let provider = &document["alertmanager"]["provider"];
        assert!(provider.get("slack").is_some());
        assert!(provider.get("pagerDuty").is_some());
    }

    #[test]
    fn test_enabled_provider_prefers_pagerduty() {
        let mut providers = ProviderSpecs::default();
        assert_eq!(providers.enabled_provider(), None);

        providers.slack.enabled = true;
        assert_eq!(providers.enabled_provider(), Some(NotificationProvider::Slack));

        providers.pager_duty.enabled = true;
        assert_eq!(
            providers.enabled_provider(),
            Some(NotificationProvider::PagerDuty)
        );
    }

    #[test]
    fn test_unknown_integration_type_is_rejected() {
        let document = serde_json::json!({
            "alertmanager": {"provider": {"pagerDuty": {"integrationType": "email"}}}
        });
        let err = decode::<MonitoringSpec>(document.as_object().unwrap()).unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidEnumChoice {
                field: "alertmanager.provider.pagerDuty.integrationType".to_string(),
                value: "email".to_string(),
            }
        );
    }

    #[test]
    fn test_integration_type_serializes_as_wire() {
        for integration in PagerDutyIntegration::ALL {
            let value = serde_json::to_value(integration).unwrap();
            assert_eq!(value, Value::String(integration.wire().to_string()));
        }
    }

    #[test]
    fn test_zero_storage_size_is_invalid() {
        let mut spec = MonitoringSpec::baseline();
        spec.prometheus.storage.as_mut().unwrap().size = 0;
        assert!(matches!(spec.validate(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_enabled_slack_needs_secret() {
        let mut spec = MonitoringSpec::baseline();
        let provider = spec.alertmanager.provider.as_mut().unwrap();
        provider.slack.enabled = true;
        provider.slack.channel = "#alerts".to_string();
        assert!(spec.validate().is_err());

        spec.alertmanager.provider.as_mut().unwrap().slack.secret_id = "slack-id".to_string();
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_disabled_component_is_not_validated() {
        let mut spec = MonitoringSpec::baseline();
        spec.prometheus.enabled = false;
        spec.prometheus.storage = None;
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_schema_rejects_bad_retention() {
        let mut spec = MonitoringSpec::baseline();
        spec.prometheus.storage.as_mut().unwrap().retention = "ten days".to_string();
        let document = encode(&spec).unwrap();
        assert!(crate::services::schema::check_schema(&MonitoringSpec::schema(), &document).is_err());
    }
}
