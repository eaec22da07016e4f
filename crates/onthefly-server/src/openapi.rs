use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "onthefly API",
        version = "0.2.0",
        description = "Edge handler serving on-the-fly pages, versioned assets, and link-preview metadata."
    ),
    paths(
        crate::routes::scrape,
        crate::routes::decompress,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::ScrapeResponse,
        crate::dto::DecompressRequest,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "scrape", description = "Link-preview metadata extraction"),
        (name = "pages", description = "Payload decompression and rendering"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
