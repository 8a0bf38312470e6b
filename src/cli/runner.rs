//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, ClientConfig};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClient, QuerySerializer};
use crate::resource::{Filters, ResourceCapabilities, ResourceClient};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Index {
                resource,
                filters,
                length,
                offset,
            } => {
                let client = self.client(&config, resource)?;
                let mut query = build_filters(Filters::default(), filters);
                if let Some(length) = length {
                    query = query.length(*length);
                }
                if let Some(offset) = offset {
                    query = query.offset(*offset);
                }
                let page = client.index(query).await?;
                self.emit(&serde_json::to_value(page)?)
            }

            Commands::Get {
                resource,
                id,
                no_cache,
                ttl_ms,
            } => {
                let client = self.client(&config, resource)?;
                let mut options = config.get_options();
                if *no_cache {
                    options.use_cache = false;
                }
                if let Some(ms) = ttl_ms {
                    options.ttl = Duration::from_millis(*ms);
                }
                let record = client.get_with_options(id, options).await?;
                self.emit(&record)
            }

            Commands::All {
                resource,
                filters,
                page_size,
            } => {
                let client = self.client(&config, resource)?;
                let query = build_filters(Filters::empty(), filters);
                let records = client.try_get_all_pages_base_list(query, *page_size).await?;
                debug!(count = records.len(), "Fetched all pages");
                self.emit(&Value::Array(records))
            }

            Commands::Create { resource, json } => {
                let client = self.client(&config, resource)?;
                let record = parse_record(json)?;
                let id = client.create(&record).await?;
                self.emit(&json!({ "id": id }))
            }

            Commands::Update { resource, id, json } => {
                let client = self.client(&config, resource)?;
                let record = parse_record(json)?;
                client.update(id, &record).await?;
                self.emit(&json!({ "updated": id }))
            }

            Commands::Delete { resource, id } => {
                let client = self.client(&config, resource)?;
                client.delete(id).await?;
                self.emit(&json!({ "deleted": id }))
            }

            Commands::Resources => self.emit(&serde_json::to_value(&config.resources)?),
        }
    }

    /// Load the client config named by `-c`
    fn load_config(&self) -> Result<ClientConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Client config not specified (use -c flag)"))?;
        load_config(path)
    }

    /// Build a client for a configured resource
    fn client(&self, config: &ClientConfig, resource: &str) -> Result<ResourceClient<Value>> {
        let path = config.resource_path(resource)?;
        let http = HttpClient::with_auth(config.http_client_config(), config.auth_config())?;
        let capabilities = ResourceCapabilities::from_http_client(http)
            .with_query_serializer(QuerySerializer::new(config.array_format));

        Ok(
            ResourceClient::new(path, capabilities, Value::Object(Default::default()))
                .with_pagination(config.pagination),
        )
    }

    /// Print a result in the selected format
    fn emit(&self, value: &Value) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Add `key=value` pairs to `base`, parsing values as JSON where possible
fn build_filters(base: Filters, pairs: &[(String, String)]) -> Filters {
    pairs
        .iter()
        .fold(base, |filters, (key, raw)| filters.set(key.as_str(), filter_value(raw)))
}

/// `5`, `true` and `[1,2]` become JSON values; anything else stays a string
fn filter_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_record(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).context("Invalid record JSON")?;
    if !value.is_object() {
        return Err(Error::config("Record must be a JSON object"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_value_parsing() {
        assert_eq!(filter_value("5"), json!(5));
        assert_eq!(filter_value("true"), json!(true));
        assert_eq!(filter_value("[1,2]"), json!([1, 2]));
        assert_eq!(filter_value("open"), json!("open"));
        assert_eq!(filter_value(""), json!(""));
    }

    #[test]
    fn test_build_filters_keeps_base() {
        let pairs = vec![("status".to_string(), "open".to_string())];
        let filters = build_filters(Filters::default(), &pairs);

        assert_eq!(filters.get_u64("length"), Some(10));
        assert_eq!(filters.get("status"), Some(&json!("open")));
    }

    #[test]
    fn test_parse_record_requires_object() {
        assert!(parse_record(r#"{"name": "x"}"#).is_ok());
        assert!(parse_record("[1]").is_err());
        assert!(parse_record("not json").is_err());
    }
}
