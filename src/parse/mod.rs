//! Manifest decoding: named byte sources in, typed resources out.

pub mod sources;

use crate::domain::pod::PodSpec;
use crate::domain::{
    CronJobSpec, NetworkPolicySpec, ObjectMeta, Resource, ResourceBody, ServiceAccountSpec,
    ServiceSpec, WorkloadSpec,
};
use crate::error::{KubescoreError, Result};
use crate::types::scorecard::FileLocation;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value;

/// A readable input, named for provenance.
#[derive(Debug, Clone)]
pub struct NamedSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Header {
    api_version: String,
    kind: String,
    metadata: ObjectMeta,
}

#[derive(Debug, Deserialize)]
struct WithSpec<S> {
    #[serde(default)]
    spec: S,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListItems {
    items: Vec<Value>,
}

/// Decodes every document of every source, in input order.
pub fn parse_sources(sources: &[NamedSource]) -> Result<Vec<Resource>> {
    let mut objects = Vec::new();
    for source in sources {
        let parsed = parse_source(source)?;
        tracing::debug!(source = %source.name, objects = parsed.len(), "parsed source");
        objects.extend(parsed);
    }
    Ok(objects)
}

fn parse_source(source: &NamedSource) -> Result<Vec<Resource>> {
    let text = std::str::from_utf8(&source.bytes).map_err(|e| KubescoreError::Parse {
        name: source.name.clone(),
        line: 1,
        message: e.to_string(),
    })?;

    let mut objects = Vec::new();
    for (line, document) in split_documents(text) {
        let location = FileLocation {
            name: source.name.clone(),
            line,
        };
        let value: Value = serde_yaml::from_str(&document).map_err(|e| {
            let offset = e.location().map_or(0, |at| at.line().saturating_sub(1));
            parse_error(&location, offset, e)
        })?;
        collect_objects(value, &location, &mut objects)?;
    }
    Ok(objects)
}

/// Splits on lines that are exactly `---`. Yields (1-based start line, text),
/// skipping documents with no content besides comments.
fn split_documents(text: &str) -> Vec<(usize, String)> {
    let mut documents = Vec::new();
    let mut current = String::new();
    let mut start = 1;

    for (number, line) in text.lines().enumerate() {
        if line.trim_end() == "---" {
            push_document(&mut documents, start, std::mem::take(&mut current));
            start = number + 2;
            continue;
        }
        current.push_str(line);
        current.push('\n');
    }
    push_document(&mut documents, start, current);
    documents
}

fn push_document(documents: &mut Vec<(usize, String)>, start: usize, text: String) {
    let has_content = text.lines().any(|line| {
        let trimmed = line.trim();
        !trimmed.is_empty() && !trimmed.starts_with('#')
    });
    if has_content {
        documents.push((start, text));
    }
}

fn collect_objects(value: Value, location: &FileLocation, out: &mut Vec<Resource>) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    let header: Header = from_value(value.clone(), location)?;
    if header.kind == "List" {
        let list: ListItems = from_value(value, location)?;
        for item in list.items {
            collect_objects(item, location, out)?;
        }
        return Ok(());
    }

    let body = match header.kind.as_str() {
        "Pod" => ResourceBody::Pod(spec_of::<PodSpec>(value, location)?),
        "Deployment" => ResourceBody::Deployment(spec_of::<WorkloadSpec>(value, location)?),
        "StatefulSet" => ResourceBody::StatefulSet(spec_of::<WorkloadSpec>(value, location)?),
        "DaemonSet" => ResourceBody::DaemonSet(spec_of::<WorkloadSpec>(value, location)?),
        "ReplicaSet" => ResourceBody::ReplicaSet(spec_of::<WorkloadSpec>(value, location)?),
        "Job" => ResourceBody::Job(spec_of::<WorkloadSpec>(value, location)?),
        "CronJob" => ResourceBody::CronJob(spec_of::<CronJobSpec>(value, location)?),
        "Service" => ResourceBody::Service(spec_of::<ServiceSpec>(value, location)?),
        "NetworkPolicy" => {
            ResourceBody::NetworkPolicy(spec_of::<NetworkPolicySpec>(value, location)?)
        }
        // automountServiceAccountToken sits at the top level, not under spec
        "ServiceAccount" => {
            ResourceBody::ServiceAccount(from_value::<ServiceAccountSpec>(value, location)?)
        }
        _ => ResourceBody::Other,
    };

    out.push(Resource {
        api_version: header.api_version,
        kind_name: header.kind,
        metadata: header.metadata,
        body,
        location: location.clone(),
    });
    Ok(())
}

fn spec_of<S: DeserializeOwned + Default>(value: Value, location: &FileLocation) -> Result<S> {
    from_value::<WithSpec<S>>(value, location).map(|wrapper| wrapper.spec)
}

fn from_value<T: DeserializeOwned>(value: Value, location: &FileLocation) -> Result<T> {
    serde_yaml::from_value(value).map_err(|e| parse_error(location, 0, e))
}

fn parse_error(location: &FileLocation, offset: usize, error: serde_yaml::Error) -> KubescoreError {
    KubescoreError::Parse {
        name: location.name.clone(),
        line: location.line + offset,
        message: error.to_string(),
    }
}
