use super::ingress::IngressSpec;
use crate::codec::{Decode, Fields};
use crate::error::ServiceError;
use crate::table::Section;

/// Live fields the backend reports for every externally reachable component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseOutput {
    pub url: String,
    pub secret_id: String,
    pub version: String,
    pub service_url: String,
}

impl Decode for BaseOutput {
    fn decode(fields: &Fields<'_>) -> Result<Self, ServiceError> {
        Ok(Self {
            url: fields.string("url")?,
            secret_id: fields.string("secretId")?,
            version: fields.string("version")?,
            service_url: fields.string("serviceUrl")?,
        })
    }
}

impl BaseOutput {
    /// Table section for a component, preferring the operator's secret over a generated one
    pub fn section(&self, chosen_secret_id: &str, ingress: Option<&IngressSpec>) -> Section {
        let secret_id: &str = if chosen_secret_id.is_empty() {
            &self.secret_id
        } else {
            chosen_secret_id
        };
        let ingress = ingress.cloned().unwrap_or_default();

        Section::new()
            .row("url", &self.url)
            .row("version", &self.version)
            .row("serviceUrl", &self.service_url)
            .row("secretID", secret_id)
            .row("path", ingress.path)
            .row("domain", ingress.domain)
    }
}

/// Operator-chosen ingress secret, only while that ingress is enabled
pub fn ingress_secret(ingress: Option<&IngressSpec>) -> &str {
    match ingress {
        Some(ingress) if ingress.enabled => &ingress.secret_id,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn output() -> BaseOutput {
        BaseOutput {
            url: "https://example.com/grafana".to_string(),
            secret_id: "generated".to_string(),
            version: "7.1.0".to_string(),
            service_url: "http://grafana.svc:80".to_string(),
        }
    }

    #[test]
    fn test_operator_secret_wins() {
        let section = output().section("chosen", None);
        assert_eq!(section.get("secretID"), Some(&Cell::from("chosen")));
    }

    #[test]
    fn test_generated_secret_is_fallback() {
        let section = output().section("", Some(&IngressSpec::at("/grafana")));
        assert_eq!(section.get("secretID"), Some(&Cell::from("generated")));
        assert_eq!(section.get("path"), Some(&Cell::from("/grafana")));
    }

    #[test]
    fn test_disabled_ingress_hides_secret() {
        let mut ingress = IngressSpec::disabled_at("/loki");
        ingress.secret_id = "h1".to_string();
        assert_eq!(ingress_secret(Some(&ingress)), "");

        ingress.enabled = true;
        assert_eq!(ingress_secret(Some(&ingress)), "h1");
        assert_eq!(ingress_secret(None), "");
    }
}
