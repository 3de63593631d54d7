//! Vision service configuration.

/// Settings for the Rekognition client.
///
/// Every field is optional so the server can start without credentials;
/// missing settings surface when a detection request is made.
#[derive(Debug, Clone, Default)]
pub struct VisionConfig {
    /// AWS region (e.g. "us-east-1")
    pub region: Option<String>,
    /// Access key ID
    pub access_key_id: Option<String>,
    /// Secret access key
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
    /// Endpoint override (local emulators, VPC endpoints)
    pub endpoint_url: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl VisionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            region: non_empty_var("AWS_REGION"),
            access_key_id: non_empty_var("AWS_ACCESS_KEY_ID"),
            secret_access_key: non_empty_var("AWS_SECRET_ACCESS_KEY"),
            session_token: non_empty_var("AWS_SESSION_TOKEN"),
            endpoint_url: non_empty_var("REKOGNITION_ENDPOINT_URL"),
        }
    }

    /// Names of required settings that are not set.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.region.is_none() {
            missing.push("AWS_REGION");
        }
        if self.access_key_id.is_none() {
            missing.push("AWS_ACCESS_KEY_ID");
        }
        if self.secret_access_key.is_none() {
            missing.push("AWS_SECRET_ACCESS_KEY");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_settings().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings() {
        let config = VisionConfig::default();
        assert_eq!(
            config.missing_settings(),
            vec!["AWS_REGION", "AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"]
        );
        assert!(!config.is_complete());

        let config = VisionConfig {
            region: Some("us-east-1".into()),
            access_key_id: Some("AKIA".into()),
            secret_access_key: Some("secret".into()),
            ..Default::default()
        };
        assert!(config.is_complete());
    }
}
