use batch_loader::LoaderConfig;

use crate::domains::webhooks::models::Requestor;
use crate::kernel::ServerDeps;
use crate::server::graphql::DataLoaders;

/// GraphQL request context
///
/// Built once per incoming request and dropped with it, taking the loader
/// caches along.
pub struct GraphQLContext {
    pub deps: ServerDeps,
    pub requestor: Requestor,
    pub loaders: DataLoaders,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(deps: ServerDeps, requestor: Requestor, loader_config: LoaderConfig) -> Self {
        let loaders = DataLoaders::new(&deps, requestor, loader_config);
        Self {
            deps,
            requestor,
            loaders,
        }
    }
}
