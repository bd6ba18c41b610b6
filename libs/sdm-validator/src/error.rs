use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_issues must be at least 1")]
    ZeroMaxIssues,
}
