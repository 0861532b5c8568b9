//! Ingress configuration shared by every externally reachable component

use super::Session;
use crate::codec::{Decode, Fields};
use crate::error::ServiceError;
use crate::question::{Question, ask, ask_confirm};
use crate::secrets::SecretKind;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_id: String,
}

impl IngressSpec {
    /// Enabled ingress on `path` with no domain or credential
    pub fn at(path: &str) -> Self {
        Self {
            enabled: true,
            path: path.to_string(),
            ..Self::default()
        }
    }

    /// Disabled ingress that still suggests `path` if the operator turns it on
    pub fn disabled_at(path: &str) -> Self {
        Self {
            enabled: false,
            ..Self::at(path)
        }
    }
}

impl Decode for IngressSpec {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            enabled: fields.bool("enabled")?,
            domain: fields.string("domain")?,
            path: fields.string("path")?,
            secret_id: fields.string("secretId")?,
        })
    }
}

/// Whether an ingress is protected by an htpasswd credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressAuth {
    /// No credential is asked for
    None,
    /// The operator may skip; the backend then generates one
    Optional,
    /// A credential must be selected
    Required,
}

/// Ask whether `component` gets an ingress and, if so, its domain, path and credential
pub fn ask_ingress(
    session: &Session<'_>,
    component: &str,
    defaults: &IngressSpec,
    auth: IngressAuth,
) -> Result<IngressSpec> {
    let enabled = ask_confirm(
        session.input,
        format!("Do you want to enable {} Ingress?", component),
        defaults.enabled,
    )
    .with_context(|| format!("error during getting {} ingress enabled", component))?;

    let mut result = IngressSpec {
        enabled,
        ..IngressSpec::default()
    };
    if !enabled {
        return Ok(result);
    }

    ask(
        session.input,
        vec![
            Question::input(
                format!("Please provide {} Ingress domain:", component),
                defaults.domain.as_str(),
                &mut result.domain,
            )
            .with_help("Leave empty to use cluster's IP"),
            Question::input(
                format!("Please provide {} Ingress path:", component),
                defaults.path.as_str(),
                &mut result.path,
            ),
        ],
    )
    .context("error during asking ingress fields")?;

    if auth != IngressAuth::None {
        result.secret_id = session
            .secrets
            .resolve(
                SecretKind::Htpasswd,
                &defaults.secret_id,
                auth == IngressAuth::Optional,
            )
            .with_context(|| format!("error during getting secret for {} ingress", component))?;
    }

    Ok(result)
}

/// Business rules for an ingress of `component`
pub fn validate_ingress(
    component: &str,
    ingress: &IngressSpec,
    auth: IngressAuth,
) -> Result<(), ServiceError> {
    if !ingress.enabled {
        return Ok(());
    }
    if ingress.path.is_empty() {
        return Err(ServiceError::validation(format!(
            "{} ingress path is required when ingress is enabled",
            component
        )));
    }
    if auth == IngressAuth::Required && ingress.secret_id.is_empty() {
        return Err(ServiceError::validation(format!(
            "{} ingress requires an htpasswd secret",
            component
        )));
    }
    Ok(())
}
