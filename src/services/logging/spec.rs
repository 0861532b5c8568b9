use crate::codec::{Decode, Fields};
use crate::error::ServiceError;
use crate::question::MenuChoice;
use crate::secrets::SecretKind;
use crate::services::ingress::{IngressAuth, IngressSpec, validate_ingress};
use crate::services::schema::{ingress_schema, when_enabled};
use serde::Serialize;
use serde_json::{Value, json};

/// Object storage bucket name, empty while unset
pub const BUCKET_PATTERN: &str = "^$|^[a-z0-9][a-z0-9._-]*[a-z0-9]$";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSpec {
    pub logging: OperatorSpec,
    pub loki: LokiSpec,
    pub cluster_output: ClusterOutputSpec,
}

/// Logging operator settings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperatorSpec {
    pub metrics: bool,
    pub tls: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LokiSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterOutputSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<OutputProviderSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputProviderSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<StorageProvider>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bucket: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_id: String,
}

/// Object storage the cluster output ships logs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StorageProvider {
    #[serde(rename = "s3")]
    AmazonS3,
    #[serde(rename = "gcs")]
    GoogleGcs,
    #[serde(rename = "oss")]
    AlibabaOss,
    #[serde(rename = "azure")]
    AzureBlob,
}

impl StorageProvider {
    /// Kind of credential that grants access to the bucket
    pub fn secret_kind(self) -> SecretKind {
        match self {
            StorageProvider::AmazonS3 => SecretKind::Amazon,
            StorageProvider::GoogleGcs => SecretKind::Google,
            StorageProvider::AlibabaOss => SecretKind::Alibaba,
            StorageProvider::AzureBlob => SecretKind::Azure,
        }
    }
}

impl MenuChoice for StorageProvider {
    const ALL: &'static [Self] = &[
        StorageProvider::AmazonS3,
        StorageProvider::GoogleGcs,
        StorageProvider::AlibabaOss,
        StorageProvider::AzureBlob,
    ];

    fn label(self) -> &'static str {
        match self {
            StorageProvider::AmazonS3 => "Amazon S3",
            StorageProvider::GoogleGcs => "Google Cloud Storage",
            StorageProvider::AlibabaOss => "Alibaba Object Storage",
            StorageProvider::AzureBlob => "Azure Blob Storage",
        }
    }

    fn wire(self) -> &'static str {
        match self {
            StorageProvider::AmazonS3 => "s3",
            StorageProvider::GoogleGcs => "gcs",
            StorageProvider::AlibabaOss => "oss",
            StorageProvider::AzureBlob => "azure",
        }
    }
}

impl Decode for LoggingSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            logging: fields.decode("logging")?,
            loki: fields.decode("loki")?,
            cluster_output: fields.decode("clusterOutput")?,
        })
    }
}

impl Decode for OperatorSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            metrics: fields.bool("metrics")?,
            tls: fields.bool("tls")?,
        })
    }
}

impl Decode for LokiSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            ingress: fields.decode_optional("ingress")?,
        })
    }
}

impl Decode for ClusterOutputSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            provider: fields.decode_optional("provider")?,
        })
    }
}

impl Decode for OutputProviderSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            name: fields.choice("name")?,
            bucket: fields.string("bucket")?,
            secret_id: fields.string("secretId")?,
        })
    }
}

impl LoggingSpec {
    /// Defaults offered when the service is activated for the first time
    pub fn baseline() -> Self {
        Self {
            logging: OperatorSpec {
                metrics: true,
                tls: true,
            },
            loki: LokiSpec {
                enabled: true,
                ingress: Some(IngressSpec::disabled_at("/loki")),
            },
            cluster_output: ClusterOutputSpec::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.loki.enabled {
            if let Some(ingress) = &self.loki.ingress {
                validate_ingress("Loki", ingress, IngressAuth::Required)?;
            }
        }

        if self.cluster_output.enabled {
            let provider = self.cluster_output.provider.as_ref().ok_or_else(|| {
                ServiceError::validation("cluster output requires a storage provider")
            })?;
            let name = provider.name.ok_or_else(|| {
                ServiceError::validation("cluster output storage provider name is required")
            })?;
            if provider.bucket.is_empty() {
                return Err(ServiceError::validation(format!(
                    "{} bucket name is required",
                    name.label()
                )));
            }
            if provider.secret_id.is_empty() {
                return Err(ServiceError::validation(format!(
                    "{} requires a {} secret",
                    name.label(),
                    name.secret_kind().label()
                )));
            }
        }

        Ok(())
    }

    /// JSON Schema for the canonical logging document
    pub fn schema() -> Value {
        let providers: Vec<&str> = StorageProvider::ALL.iter().map(|p| p.wire()).collect();

        json!({
            "type": "object",
            "properties": {
                "logging": {
                    "type": "object",
                    "properties": {
                        "metrics": {"type": "boolean"},
                        "tls": {"type": "boolean"}
                    }
                },
                "loki": {
                    "type": "object",
                    "properties": {
                        "enabled": {"type": "boolean"},
                        "ingress": ingress_schema()
                    }
                },
                "clusterOutput": {
                    "type": "object",
                    "properties": {
                        "enabled": {"type": "boolean"},
                        "provider": {
                            "type": "object",
                            "properties": {
                                "name": {"enum": providers},
                                "bucket": {"type": "string", "pattern": BUCKET_PATTERN},
                                "secretId": {"type": "string"}
                            }
                        }
                    },
                    "allOf": [when_enabled(json!({"required": ["provider"]}))]
                }
            }
        })
    }
}
