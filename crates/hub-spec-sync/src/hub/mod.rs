//! Access to instances on the hub cluster.
//!
//! The reconciler only needs two calls: read an instance by key and persist
//! an instance's finalizer list. [`HubApi`] captures that boundary and
//! [`KubeHub`] implements it over `kube::Api`.
//!
//! Finalizer changes are sent as a JSON merge patch on `metadata` so that
//! fields the typed views do not model are never written back.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

pub mod error;

pub use error::HubError;

/// Result type for hub operations.
pub type Result<T> = std::result::Result<T, HubError>;

/// Identifies one instance on the hub. Cluster-scoped instances have no namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectKey {
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    pub fn cluster(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// Builds the key of an instance from its metadata.
    pub fn from_resource<K: Resource>(instance: &K) -> Self {
        Self {
            namespace: instance.namespace(),
            name: instance.name_any(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}/{}", namespace, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Read/write access to instances of one kind on the hub.
#[async_trait]
pub trait HubApi<K>: Send + Sync {
    /// Fetches the live instance, or `None` if it does not exist.
    async fn get(&self, key: &ObjectKey) -> Result<Option<K>>;

    /// Writes the instance's finalizer list to the hub and returns the
    /// stored version. Fails with a conflict if the instance changed since
    /// its resource version was read.
    async fn update_finalizers(&self, instance: &K) -> Result<K>;
}

/// Merge patch setting `metadata.finalizers`, guarded by the resource version
/// when one is known.
pub fn finalizer_patch(meta: &ObjectMeta) -> Value {
    let mut metadata = Map::new();
    metadata.insert(
        "finalizers".to_string(),
        json!(meta.finalizers.clone().unwrap_or_default()),
    );
    if let Some(version) = &meta.resource_version {
        metadata.insert("resourceVersion".to_string(), json!(version));
    }
    json!({ "metadata": metadata })
}

/// [`HubApi`] backed by the Kubernetes API server.
pub struct KubeHub<K> {
    client: Client,
    scoped: fn(Client, Option<&str>) -> Api<K>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> KubeHub<K>
where
    K: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
{
    /// Hub access for a namespaced kind.
    pub fn namespaced(client: Client) -> Self {
        Self {
            client,
            scoped: |client, namespace| match namespace {
                Some(namespace) => Api::namespaced(client, namespace),
                None => Api::all(client),
            },
            _kind: PhantomData,
        }
    }
}

impl<K> KubeHub<K>
where
    K: Resource<DynamicType = (), Scope = ClusterResourceScope>,
{
    /// Hub access for a cluster-scoped kind.
    pub fn cluster(client: Client) -> Self {
        Self {
            client,
            scoped: |client, _| Api::all(client),
            _kind: PhantomData,
        }
    }
}

impl<K> KubeHub<K> {
    fn api(&self, namespace: Option<&str>) -> Api<K> {
        (self.scoped)(self.client.clone(), namespace)
    }
}

#[async_trait]
impl<K> HubApi<K> for KubeHub<K>
where
    K: Resource<DynamicType = ()>
        + Clone
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
{
    async fn get(&self, key: &ObjectKey) -> Result<Option<K>> {
        let api = self.api(key.namespace.as_deref());
        Ok(api.get_opt(&key.name).await?)
    }

    async fn update_finalizers(&self, instance: &K) -> Result<K> {
        let name = instance
            .meta()
            .name
            .as_deref()
            .ok_or_else(|| HubError::MissingName {
                kind: K::kind(&()).into_owned(),
            })?;
        let namespace = instance.namespace();
        let api = self.api(namespace.as_deref());
        let patch = finalizer_patch(instance.meta());
        Ok(api
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?)
    }
}
