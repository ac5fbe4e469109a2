pub mod api;
pub mod cli;

use claim_assembler_client::Client;
use poem::{middleware::Tracing, Endpoint, EndpointExt as _, Route};
use poem_openapi::OpenApiService;

pub use cli::Cli;

/// Builds the service routes.
///
/// The claim endpoint is served on `/`, the API documentation on `/docs` and `/spec`. Failed
/// requests are answered with a JSON error body.
pub fn app(client: Client, server: &str) -> impl Endpoint {
    let api_service =
        OpenApiService::new(api::Api, env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            .server(server);

    Route::new()
        .nest("/docs", api_service.swagger_ui())
        .nest("/spec", api_service.spec_endpoint())
        .nest("/spec/yaml", api_service.spec_endpoint_yaml())
        .nest("/", api_service)
        .catch_all_error(api::error_response)
        .with(Tracing)
        .data(client)
}
