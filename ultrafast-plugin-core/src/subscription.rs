//! # Subscription Builder Module
//!
//! Builds transport-level subscriptions to outside services (the spec's
//! running example is gRPC streams) from a declarative config plus
//! injected discovery/filter/TLS providers, the same "inject the transport
//! concerns, keep the business type generic" shape
//! `ultrafast_models_sdk::providers::http_client` uses for pooled upstream
//! clients and `auth.rs` uses for its JWT/TLS provider slot. This crate
//! does not itself speak gRPC, so the built connection type is a caller
//!-supplied generic rather than a concrete `tonic::Channel`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SubscriptionError;
use crate::runtime::Runtime;

/// Resolves a logical service name to its candidate connectable addresses.
/// Injected so tests can substitute a static map instead of a real discovery
/// backend. Returns every known endpoint rather than one so a `FilterFactory`
/// has something to bias between.
#[async_trait]
pub trait ServiceDiscovery: Send + Sync {
    async fn resolve(&self, service: &str) -> Result<Vec<String>, SubscriptionError>;
}

/// Produces a transport-specific connection from a resolved address and,
/// when the spec requested TLS, the material a `TlsProvider` resolved for
/// it.
#[async_trait]
pub trait ConnectionFactory<C, T = ()>: Send + Sync {
    async fn connect(&self, address: &str, tls: Option<&ResolvedTls<T>>) -> Result<C, SubscriptionError>;
}

/// Biases which of a service's candidate endpoints a subscription connects
/// to (e.g. toward a particular version, region, or health state).
pub trait NodeFilter: Send + Sync {
    fn matches(&self, endpoint: &str) -> bool;
}

/// Produces a per-service `NodeFilter`. Injected the same way
/// `ServiceDiscovery` is; omitting one from the builder falls back to "first
/// endpoint wins".
pub trait FilterFactory: Send + Sync {
    fn build(&self, service: &str) -> Arc<dyn NodeFilter>;
}

/// TLS material resolved for one subscription: a per-`(caName, caGroup)`
/// certificate source plus the shared root CA, mirroring spec.md §4.6's "an
/// injected pair of providers — `(caName, caGroup) -> CertificateSource` and
/// `() -> rootCA`".
#[derive(Clone)]
pub struct ResolvedTls<T> {
    pub certificate_source: T,
    pub root_ca: T,
}

/// Supplies the TLS material a `tls = true` subscription needs. Required iff
/// at least one [`SubscriptionSpec`] passed to `build` has `tls = true`.
#[async_trait]
pub trait TlsProvider<T>: Send + Sync {
    async fn certificate_source(&self, ca_name: &str, ca_group: &str) -> Result<T, SubscriptionError>;
    async fn root_ca(&self) -> Result<T, SubscriptionError>;
}

/// One declared subscription target.
#[derive(Debug, Clone)]
pub struct SubscriptionSpec {
    pub service: String,
    /// Fail `build` if this subscription cannot be established, rather than
    /// returning a partial set (spec.md §4.6 "required fail-fast").
    pub required: bool,
    pub tls: bool,
    pub ca_name: Option<String>,
    pub ca_group: Option<String>,
}

impl SubscriptionSpec {
    pub fn required(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            required: true,
            tls: false,
            ca_name: None,
            ca_group: None,
        }
    }

    pub fn optional(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            required: false,
            tls: false,
            ca_name: None,
            ca_group: None,
        }
    }

    /// Mark this subscription as requiring TLS, resolved via the given CA
    /// name/group at build time.
    pub fn with_tls(mut self, ca_name: impl Into<String>, ca_group: impl Into<String>) -> Self {
        self.tls = true;
        self.ca_name = Some(ca_name.into());
        self.ca_group = Some(ca_group.into());
        self
    }
}

/// Builds a set of subscriptions from specs plus injected discovery,
/// node-filter, and TLS providers.
pub struct SubscriptionBuilder<C, T = ()> {
    discovery: Arc<dyn ServiceDiscovery>,
    factory: Arc<dyn ConnectionFactory<C, T>>,
    filter_factory: Option<Arc<dyn FilterFactory>>,
    tls_provider: Option<Arc<dyn TlsProvider<T>>>,
}

impl<C, T> SubscriptionBuilder<C, T> {
    pub fn new(discovery: Arc<dyn ServiceDiscovery>, factory: Arc<dyn ConnectionFactory<C, T>>) -> Self {
        Self {
            discovery,
            factory,
            filter_factory: None,
            tls_provider: None,
        }
    }

    pub fn with_filter_factory(mut self, filter_factory: Arc<dyn FilterFactory>) -> Self {
        self.filter_factory = Some(filter_factory);
        self
    }

    pub fn with_tls_provider(mut self, tls_provider: Arc<dyn TlsProvider<T>>) -> Self {
        self.tls_provider = Some(tls_provider);
        self
    }

    /// Resolve and connect every spec. Required subscriptions that fail
    /// abort the whole build; optional failures are logged and omitted
    /// from the result map. Fails fast, before resolving anything, if any
    /// spec requests TLS but no `TlsProvider` was installed.
    pub async fn build(&self, specs: &[SubscriptionSpec]) -> Result<HashMap<String, C>, SubscriptionError> {
        if self.tls_provider.is_none() && specs.iter().any(|spec| spec.tls) {
            return Err(SubscriptionError::TlsProviderMissing);
        }

        let mut connections = HashMap::new();

        for spec in specs {
            match self.connect_one(spec).await {
                Ok(connection) => {
                    connections.insert(spec.service.clone(), connection);
                }
                Err(err) if spec.required => {
                    return Err(SubscriptionError::Required {
                        service: spec.service.clone(),
                        cause: err.to_string(),
                    });
                }
                Err(err) => {
                    tracing::warn!(service = %spec.service, error = %err, "optional subscription could not be established");
                }
            }
        }

        Ok(connections)
    }

    async fn connect_one(&self, spec: &SubscriptionSpec) -> Result<C, SubscriptionError> {
        let endpoints = self.discovery.resolve(&spec.service).await?;
        let address = self.select_endpoint(&spec.service, &endpoints)?;

        let tls = if spec.tls {
            let provider = self
                .tls_provider
                .as_ref()
                .expect("checked for a TLS provider at the top of build");
            let ca_name = spec.ca_name.as_deref().unwrap_or_default();
            let ca_group = spec.ca_group.as_deref().unwrap_or_default();
            Some(ResolvedTls {
                certificate_source: provider.certificate_source(ca_name, ca_group).await?,
                root_ca: provider.root_ca().await?,
            })
        } else {
            None
        };

        self.factory.connect(&address, tls.as_ref()).await
    }

    fn select_endpoint(&self, service: &str, endpoints: &[String]) -> Result<String, SubscriptionError> {
        let Some(first) = endpoints.first() else {
            return Err(SubscriptionError::NoEndpoints {
                service: service.to_string(),
            });
        };
        match &self.filter_factory {
            Some(factory) => {
                let filter = factory.build(service);
                Ok(endpoints
                    .iter()
                    .find(|endpoint| filter.matches(endpoint))
                    .cloned()
                    .unwrap_or_else(|| first.clone()))
            }
            None => Ok(first.clone()),
        }
    }

    /// Build subscriptions and register the resulting map as the
    /// `"grpc.subscriptions"` shared resource, the name spec.md §4.6/§9
    /// specifies verbatim so any plugin can discover what's already been
    /// subscribed to without re-resolving.
    pub async fn build_and_publish(
        &self,
        specs: &[SubscriptionSpec],
        runtime: &Runtime,
    ) -> Result<(), SubscriptionError>
    where
        C: Send + Sync + 'static,
    {
        let connections = self.build(specs).await?;
        let _ = runtime.register_shared_resource(
            "grpc.subscriptions",
            Arc::new(connections),
            HashMap::new(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use parking_lot::Mutex;

    struct StaticDiscovery(HashMap<String, Vec<String>>);

    #[async_trait]
    impl ServiceDiscovery for StaticDiscovery {
        async fn resolve(&self, service: &str) -> Result<Vec<String>, SubscriptionError> {
            self.0
                .get(service)
                .cloned()
                .ok_or_else(|| SubscriptionError::Required {
                    service: service.to_string(),
                    cause: "not found in discovery map".to_string(),
                })
        }
    }

    struct RecordingFactory(Mutex<Vec<String>>);

    #[async_trait]
    impl ConnectionFactory<String> for RecordingFactory {
        async fn connect(&self, address: &str, _tls: Option<&ResolvedTls<()>>) -> Result<String, SubscriptionError> {
            self.0.lock().push(address.to_string());
            Ok(address.to_string())
        }
    }

    struct StubTlsProvider;

    #[async_trait]
    impl TlsProvider<()> for StubTlsProvider {
        async fn certificate_source(&self, _ca_name: &str, _ca_group: &str) -> Result<(), SubscriptionError> {
            Ok(())
        }
        async fn root_ca(&self) -> Result<(), SubscriptionError> {
            Ok(())
        }
    }

    struct PreferSuffix(String);

    impl NodeFilter for PreferSuffix {
        fn matches(&self, endpoint: &str) -> bool {
            endpoint.ends_with(&self.0)
        }
    }

    struct PreferSuffixFactory(String);

    impl FilterFactory for PreferSuffixFactory {
        fn build(&self, _service: &str) -> Arc<dyn NodeFilter> {
            Arc::new(PreferSuffix(self.0.clone()))
        }
    }

    fn builder(known: &[(&str, &[&str])]) -> SubscriptionBuilder<String> {
        let map = known
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect();
        SubscriptionBuilder::new(
            Arc::new(StaticDiscovery(map)),
            Arc::new(RecordingFactory(Mutex::new(Vec::new()))),
        )
    }

    #[tokio::test]
    async fn builds_all_resolvable_subscriptions() {
        let builder = builder(&[("billing", &["10.0.0.1:443"]), ("auth", &["10.0.0.2:443"])]);
        let specs = vec![
            SubscriptionSpec::required("billing"),
            SubscriptionSpec::required("auth"),
        ];
        let connections = builder.build(&specs).await.unwrap();
        assert_eq!(connections.len(), 2);
    }

    #[tokio::test]
    async fn required_failure_aborts_whole_build() {
        let builder = builder(&[("billing", &["10.0.0.1:443"])]);
        let specs = vec![
            SubscriptionSpec::required("billing"),
            SubscriptionSpec::required("missing"),
        ];
        let err = builder.build(&specs).await.unwrap_err();
        assert!(matches!(err, SubscriptionError::Required { service, .. } if service == "missing"));
    }

    #[tokio::test]
    async fn optional_failure_is_omitted_not_fatal() {
        let builder = builder(&[("billing", &["10.0.0.1:443"])]);
        let specs = vec![
            SubscriptionSpec::required("billing"),
            SubscriptionSpec::optional("missing"),
        ];
        let connections = builder.build(&specs).await.unwrap();
        assert_eq!(connections.len(), 1);
        assert!(!connections.contains_key("missing"));
    }

    #[tokio::test]
    async fn empty_discovery_result_is_a_required_failure() {
        let builder = builder(&[("billing", &[])]);
        let specs = vec![SubscriptionSpec::required("billing")];
        let err = builder.build(&specs).await.unwrap_err();
        assert!(matches!(err, SubscriptionError::Required { service, .. } if service == "billing"));
    }

    #[tokio::test]
    async fn filter_factory_biases_endpoint_selection() {
        let builder = builder(&[("billing", &["10.0.0.1:443", "10.0.0.2:443"])])
            .with_filter_factory(Arc::new(PreferSuffixFactory(".2:443".to_string())));
        let specs = vec![SubscriptionSpec::required("billing")];
        let connections = builder.build(&specs).await.unwrap();
        assert_eq!(connections.get("billing").unwrap(), "10.0.0.2:443");
    }

    #[tokio::test]
    async fn tls_spec_without_provider_fails_fast() {
        let builder = builder(&[("billing", &["10.0.0.1:443"])]);
        let specs = vec![SubscriptionSpec::required("billing").with_tls("ca", "group")];
        let err = builder.build(&specs).await.unwrap_err();
        assert!(matches!(err, SubscriptionError::TlsProviderMissing));
    }

    #[tokio::test]
    async fn tls_spec_with_provider_resolves_material() {
        let builder = builder(&[("billing", &["10.0.0.1:443"])]).with_tls_provider(Arc::new(StubTlsProvider));
        let specs = vec![SubscriptionSpec::required("billing").with_tls("ca", "group")];
        let connections = builder.build(&specs).await.unwrap();
        assert_eq!(connections.len(), 1);
    }

    #[tokio::test]
    async fn build_and_publish_registers_shared_resource() {
        let builder = builder(&[("billing", &["10.0.0.1:443"])]);
        let specs = vec![SubscriptionSpec::required("billing")];
        let runtime = Runtime::new(EventBus::default());
        builder.build_and_publish(&specs, &runtime).await.unwrap();
        assert!(runtime.get_shared_resource("grpc.subscriptions").is_ok());
    }
}
